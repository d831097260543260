//! Per-run record of what the pipeline did

use crate::error::MaterializeError;
use crate::integrations::{Integration, IntegrationSet, ProjectDescriptor};
use std::path::PathBuf;

/// Result of one pipeline stage that does not abort the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Ok,
    Skipped,
    Failed(String),
}

impl StageOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, StageOutcome::Failed(_))
    }
}

/// Settled result of one integration's setup routine
#[derive(Debug)]
pub struct IntegrationOutcome {
    pub integration: Integration,
    /// Copied files relative to the project root, or the reason setup failed
    pub result: Result<Vec<PathBuf>, MaterializeError>,
}

impl IntegrationOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Everything a scaffold run produced
#[derive(Debug)]
pub struct ScaffoldReport {
    pub project: ProjectDescriptor,
    pub integrations: IntegrationSet,
    /// Directories and files created by the scaffold builder, relative to the project root
    pub created: Vec<PathBuf>,
    /// Build pipeline files, relative to the project root
    pub pipeline_files: Vec<PathBuf>,
    pub install: StageOutcome,
    pub outcomes: Vec<IntegrationOutcome>,
    pub entry_file: PathBuf,
    pub cleanup: StageOutcome,
}

impl ScaffoldReport {
    /// Integrations whose setup succeeded
    pub fn succeeded(&self) -> Vec<Integration> {
        self.outcomes
            .iter()
            .filter(|o| o.is_ok())
            .map(|o| o.integration)
            .collect()
    }

    /// Setup failures, in catalog order
    pub fn failures(&self) -> Vec<&MaterializeError> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err())
            .collect()
    }

    /// True when every started integration succeeded
    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(IntegrationOutcome::is_ok)
    }

    /// e.g. "3 of 5 integrations set up"
    pub fn summary(&self) -> String {
        format!(
            "{} of {} integrations set up",
            self.succeeded().len(),
            self.outcomes.len()
        )
    }

    /// Integrations that made it into the project: tooling plus successful libraries
    ///
    /// A failed jQuery stays out even when Bootstrap succeeded, so nothing
    /// links a file that was never copied.
    pub fn installed_integrations(&self) -> IntegrationSet {
        let succeeded = self.succeeded();
        IntegrationSet::exact(
            self.integrations
                .iter()
                .filter(|i| !i.is_library() || succeeded.contains(i)),
        )
    }
}
