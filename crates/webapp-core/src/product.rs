//! Product configuration trait for CLI binaries
//!
//! This trait defines the interface a scaffolding binary implements to
//! configure naming, environment overrides and post-setup instructions.

use crate::integrations::{IntegrationSet, ProjectDescriptor, DEFAULT_PROJECT_NAME};

/// Configuration trait for CLI products
///
/// Each product implements this trait to define:
/// - Product identity (name, display name)
/// - Environment variable names for overrides
/// - Documentation links
/// - Post-setup instructions
pub trait ProductConfig: Clone + Send + Sync + 'static {
    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Project name used when the user gives none
    fn default_project_name(&self) -> &'static str {
        DEFAULT_PROJECT_NAME
    }

    /// Environment variable overriding the package manager program
    fn package_manager_env(&self) -> &'static str;

    /// Environment variable overriding the install timeout (seconds)
    fn install_timeout_env(&self) -> &'static str;

    /// Environment variable pointing at a custom index.html template
    fn template_env(&self) -> &'static str;

    /// URL shown when Node.js or npm is missing
    fn runtime_docs_url(&self) -> &'static str {
        "https://nodejs.org/en/download"
    }

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, project: &ProjectDescriptor, integrations: &IntegrationSet)
        -> Vec<String>;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;
}
