//! Runtime detection for Node.js and the package manager

use crate::integrations::{Integration, IntegrationSet};
use anyhow::Result;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: String,
    pub version: Option<String>,
    pub available: bool,
}

fn probe(name: &str, program: &str) -> RuntimeInfo {
    let output = Command::new(program).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name: name.to_string(),
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: name.to_string(),
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

/// Check if the package manager program is available
pub fn check_package_manager(program: &str) -> RuntimeInfo {
    probe(program, program)
}

/// What a scaffold run needs from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeNeeds {
    pub package_manager: bool,
    pub node: bool,
}

impl RuntimeNeeds {
    /// Packages need fetching for any library or the build pipeline; Modernizr
    /// and Gulp additionally need Node.js to run
    pub fn for_integrations(integrations: &IntegrationSet) -> Self {
        Self {
            package_manager: !integrations.packages().is_empty()
                || integrations.contains(Integration::Gulp),
            node: integrations.contains(Integration::Modernizr)
                || integrations.contains(Integration::Gulp),
        }
    }

    pub fn any(&self) -> bool {
        self.package_manager || self.node
    }
}

/// Check the runtimes the selected integrations need, failing with a list of missing ones
pub fn check_runtimes(integrations: &IntegrationSet, package_manager: &str) -> Result<Vec<RuntimeInfo>> {
    let needs = RuntimeNeeds::for_integrations(integrations);
    let mut results = Vec::new();
    let mut missing = Vec::new();

    if needs.node {
        let node = check_node();
        if node.available {
            results.push(node);
        } else {
            missing.push("Node.js (install from https://nodejs.org)".to_string());
        }
    }

    if needs.package_manager {
        let pm = check_package_manager(package_manager);
        if pm.available {
            results.push(pm);
        } else {
            missing.push(format!("{} (ships with Node.js)", package_manager));
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required runtimes:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}
