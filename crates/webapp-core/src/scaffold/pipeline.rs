//! Scaffold orchestration: structure, install, assets, entry file, cleanup

use crate::config::generator::{self, npm_package_name};
use crate::config::Settings;
use crate::error::ScaffoldError;
use crate::integrations::{Delivery, IntegrationSet, ProjectDescriptor};
use crate::runtime::Installer;
use crate::scaffold::materializer::{self, MaterializeContext};
use crate::scaffold::report::{ScaffoldReport, StageOutcome};
use crate::scaffold::reporter::Reporter;
use crate::scaffold::{builder, cleanup, renderer};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Runs the scaffold pipeline for one project
///
/// Stage errors (structure, install, entry file) abort with `ScaffoldError`;
/// integration failures are contained and recorded in the report.
pub struct ProjectBuilder<'a, I, R> {
    settings: &'a Settings,
    installer: &'a I,
    reporter: &'a R,
}

impl<'a, I: Installer, R: Reporter> ProjectBuilder<'a, I, R> {
    pub fn new(settings: &'a Settings, installer: &'a I, reporter: &'a R) -> Self {
        Self {
            settings,
            installer,
            reporter,
        }
    }

    /// Generate the project described by `project` with `integrations`
    pub async fn build(
        &self,
        project: &ProjectDescriptor,
        integrations: &IntegrationSet,
    ) -> Result<ScaffoldReport, ScaffoldError> {
        let root = project.destination_path();
        let scratch = project.scratch_dir();

        // Structure
        self.reporter.stage("Creating project structure...");
        let created = match builder::build_scaffold(project, integrations).await {
            Ok(created) => {
                self.reporter
                    .stage_done(&format!("Created {}", root.display()));
                created
            }
            Err(e) => {
                self.reporter.stage_failed("Could not create project structure");
                return Err(e);
            }
        };

        // Packages
        let mut pipeline_files = Vec::new();
        let (source_root, install) = match integrations.delivery() {
            Delivery::Direct => {
                let packages = integrations.packages();
                if packages.is_empty() {
                    (scratch.clone(), StageOutcome::Skipped)
                } else {
                    write_scratch_manifest(project).await?;
                    self.install(&packages, &scratch, &scratch).await?;
                    (scratch.clone(), StageOutcome::Ok)
                }
            }
            Delivery::BuildPipeline => {
                pipeline_files = generator::write_pipeline(project, integrations).await?;
                self.reporter.info("Wrote package.json, gulpfile.js and gulp tasks");
                self.install(&[], root, &scratch).await?;
                (root.to_path_buf(), StageOutcome::Ok)
            }
        };

        // Assets
        let outcomes = if integrations.libraries().is_empty() {
            Vec::new()
        } else {
            self.reporter.stage("Setting up integrations...");
            let ctx = MaterializeContext::new(project, &source_root, integrations.uses_sass());
            let outcomes = materializer::materialize_all(integrations, &ctx).await;

            let succeeded = outcomes.iter().filter(|o| o.is_ok()).count();
            let summary = format!("{} of {} integrations set up", succeeded, outcomes.len());
            if succeeded == outcomes.len() {
                self.reporter.stage_done(&summary);
            } else {
                self.reporter.stage_failed(&summary);
            }
            for outcome in &outcomes {
                if let Err(e) = &outcome.result {
                    self.reporter.warning(&e.to_string());
                }
            }
            outcomes
        };

        let mut report = ScaffoldReport {
            project: project.clone(),
            integrations: integrations.clone(),
            created,
            pipeline_files,
            install,
            outcomes,
            entry_file: root.join("index.html"),
            cleanup: StageOutcome::Skipped,
        };

        // Entry file, rendered for what actually made it into the project
        let template = renderer::load_template(self.settings.template_path.as_deref()).await?;
        let html = renderer::render(&template, &report.installed_integrations());
        fs::write(&report.entry_file, html)
            .await
            .map_err(|source| ScaffoldError::Write {
                path: report.entry_file.clone(),
                source,
            })?;
        self.reporter.info("Created index.html");

        // Scratch space
        report.cleanup = cleanup::remove_scratch(&scratch).await;
        if let StageOutcome::Failed(reason) = &report.cleanup {
            self.reporter.warning(reason);
        }

        Ok(report)
    }

    /// Add the build pipeline files to an existing project and install its tooling
    pub async fn add_build_pipeline(
        &self,
        project: &ProjectDescriptor,
        integrations: &IntegrationSet,
    ) -> Result<Vec<PathBuf>, ScaffoldError> {
        let root = project.destination_path();
        if !root.is_dir() {
            return Err(ScaffoldError::MissingProject {
                path: root.to_path_buf(),
            });
        }

        if let Some(style) = builder::ensure_main_style(project, integrations).await? {
            self.reporter.warning(&format!(
                "Created {} for the styles task",
                style.display()
            ));
        }

        let files = generator::write_pipeline(project, integrations).await?;
        self.reporter.info("Wrote package.json, gulpfile.js and gulp tasks");
        self.install(&[], root, &project.scratch_dir()).await?;

        Ok(files)
    }

    /// Run the installer; on failure the scratch directory is removed before returning
    async fn install(
        &self,
        packages: &[String],
        cwd: &Path,
        scratch: &Path,
    ) -> Result<(), ScaffoldError> {
        let label = if packages.is_empty() {
            "Installing build pipeline packages...".to_string()
        } else {
            format!("Installing {}...", packages.join(", "))
        };
        self.reporter.stage(&label);

        match self.installer.install(packages, cwd).await {
            Ok(()) => {
                self.reporter.stage_done("Packages installed");
                Ok(())
            }
            Err(e) => {
                self.reporter.stage_failed("Package installation failed");
                if let StageOutcome::Failed(reason) = cleanup::remove_scratch(scratch).await {
                    self.reporter.warning(&reason);
                }
                Err(e.into())
            }
        }
    }
}

/// Minimal manifest so the package manager treats the scratch dir as its own project
async fn write_scratch_manifest(project: &ProjectDescriptor) -> Result<(), ScaffoldError> {
    let manifest = serde_json::json!({
        "name": format!("{}-scratch", npm_package_name(project.name())),
        "private": true,
    });
    let path = project.scratch_dir().join("package.json");
    let content = serde_json::to_string_pretty(&manifest)?;
    fs::write(&path, content)
        .await
        .map_err(|source| ScaffoldError::Write { path, source })
}
