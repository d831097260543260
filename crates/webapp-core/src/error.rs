//! Typed errors for each pipeline stage

use crate::integrations::Integration;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Stage-level failures that abort a scaffold run
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Invalid project name '{name}': {reason}")]
    InvalidName { name: String, reason: &'static str },

    #[error("Project directory {} does not exist", path.display())]
    MissingProject { path: PathBuf },

    #[error("Failed to clear existing directory {}: {source}", path.display())]
    Clear { path: PathBuf, source: io::Error },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to read entry-file template {}: {source}", path.display())]
    Template { path: PathBuf, source: io::Error },

    #[error("Failed to generate package.json: {0}")]
    PackageJson(#[from] serde_json::Error),

    #[error(transparent)]
    Install(#[from] InstallError),
}

/// Package manager invocation failures
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Package manager '{program}' could not be started: {source}")]
    Spawn { program: String, source: io::Error },

    #[error("'{program} install' failed with exit code {code}\n{stderr}")]
    Failed {
        program: String,
        code: i32,
        stderr: String,
    },

    #[error("'{program} install' timed out after {secs} seconds")]
    TimedOut { program: String, secs: u64 },

    #[error("Failed to wait for '{program}': {source}")]
    Wait { program: String, source: io::Error },
}

/// Per-integration failures; contained to the integration that raised them
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("Error setting up {0}")]
    MissingPackage(Integration),

    #[error("Error setting up {integration}: invalid package.json ({reason})")]
    Manifest {
        integration: Integration,
        reason: String,
    },

    #[error("Error setting up {integration}: failed to copy {}: {source}", from.display())]
    Copy {
        integration: Integration,
        from: PathBuf,
        source: io::Error,
    },

    #[error("Error setting up {integration}: build failed: {output}")]
    Build {
        integration: Integration,
        output: String,
    },

    #[error("Error setting up {0}: setup task aborted")]
    Aborted(Integration),
}

impl MaterializeError {
    /// The integration this failure belongs to
    pub fn integration(&self) -> Integration {
        match self {
            MaterializeError::MissingPackage(integration) | MaterializeError::Aborted(integration) => {
                *integration
            }
            MaterializeError::Manifest { integration, .. }
            | MaterializeError::Copy { integration, .. }
            | MaterializeError::Build { integration, .. } => *integration,
        }
    }
}
