//! Package installation through an external package manager
//!
//! The pipeline talks to the `Installer` trait so tests can stand in a fake
//! that lays out `node_modules` without touching the network.

use crate::config::Settings;
use crate::error::InstallError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

/// Fetches packages into a working directory
#[allow(async_fn_in_trait)]
pub trait Installer {
    /// Install `packages` into `cwd`/node_modules
    ///
    /// An empty list installs whatever `cwd`/package.json declares.
    async fn install(&self, packages: &[String], cwd: &Path) -> Result<(), InstallError>;
}

/// Installer backed by a real package manager program (npm by default)
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
    timeout: Duration,
}

impl PackageManager {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.package_manager.clone(), settings.install_timeout)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Installer for PackageManager {
    async fn install(&self, packages: &[String], cwd: &Path) -> Result<(), InstallError> {
        let mut child = TokioCommand::new(&self.program)
            .arg("install")
            .args(packages)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| InstallError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let mut stderr_pipe = child.stderr.take();

        // Drain stderr while waiting so a chatty installer cannot block on a full pipe
        let waited = timeout(self.timeout, async {
            let mut stderr = String::new();
            if let Some(pipe) = stderr_pipe.as_mut() {
                let _ = pipe.read_to_string(&mut stderr).await;
            }
            (child.wait().await, stderr)
        })
        .await;

        match waited {
            Ok((Ok(status), stderr)) => {
                if status.success() {
                    Ok(())
                } else {
                    Err(InstallError::Failed {
                        program: self.program.clone(),
                        code: status.code().unwrap_or(-1),
                        stderr: stderr.trim().to_string(),
                    })
                }
            }
            Ok((Err(source), _)) => Err(InstallError::Wait {
                program: self.program.clone(),
                source,
            }),
            Err(_) => {
                let _ = child.kill().await;
                Err(InstallError::TimedOut {
                    program: self.program.clone(),
                    secs: self.timeout.as_secs(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            package_manager: "pnpm".to_string(),
            install_timeout: Duration::from_secs(9),
            template_path: None,
        };
        let pm = PackageManager::from_settings(&settings);
        assert_eq!(pm.program(), "pnpm");
        assert_eq!(pm.timeout, Duration::from_secs(9));
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let temp = tempfile::tempdir().unwrap();
        let pm = PackageManager::new("definitely-not-a-package-manager-xyz", Duration::from_secs(5));
        let err = pm.install(&[], temp.path()).await.unwrap_err();
        assert!(matches!(err, InstallError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_program_reports_exit_code() {
        let temp = tempfile::tempdir().unwrap();
        let pm = PackageManager::new("false", Duration::from_secs(5));
        let err = pm.install(&["jquery".to_string()], temp.path()).await.unwrap_err();
        assert!(matches!(err, InstallError::Failed { code: 1, .. }));
    }
}
