//! Scratch directory removal

use crate::scaffold::report::StageOutcome;
use std::io::ErrorKind;
use std::path::Path;

/// Remove the scratch directory; never fails the run
pub async fn remove_scratch(scratch: &Path) -> StageOutcome {
    match tokio::fs::remove_dir_all(scratch).await {
        Ok(()) => StageOutcome::Ok,
        Err(e) if e.kind() == ErrorKind::NotFound => StageOutcome::Skipped,
        Err(e) => StageOutcome::Failed(format!(
            "Could not remove {}: {}",
            scratch.display(),
            e
        )),
    }
}
