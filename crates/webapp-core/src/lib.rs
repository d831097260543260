//! Webapp Core - Shared library for the HTML5 webapp scaffolder
//!
//! This library asks which front-end integrations a project needs and
//! materializes the project on disk: directory tree, library assets copied
//! out of npm packages, an `index.html` wired to them, and optionally a Gulp
//! build pipeline.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Catalog, answer resolution, directory creation,
//!   package installation, asset copying, entry-file rendering
//! - **Layer 2: Workflow Orchestration** - `ProductConfig` trait and `ProjectBuilder`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts and the interrupt guard
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use webapp_core::{resolve, Answers, ConsoleReporter, PackageManager, ProjectBuilder, Settings};
//!
//! let answers = Answers { bootstrap: true, ..Default::default() };
//! let (project, integrations) = resolve(&answers, &std::env::current_dir()?)?;
//!
//! let settings = Settings::default();
//! let npm = PackageManager::from_settings(&settings);
//! let report = ProjectBuilder::new(&settings, &npm, &ConsoleReporter)
//!     .build(&project, &integrations)
//!     .await?;
//! println!("{}", report.summary());
//! ```

pub mod config;
pub mod error;
pub mod integrations;
pub mod product;
pub mod runtime;
pub mod scaffold;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use config::Settings;
pub use error::{InstallError, MaterializeError, ScaffoldError};
pub use integrations::{
    resolve, Answers, BuildTool, Integration, IntegrationSet, Library, ProjectDescriptor,
};
pub use product::ProductConfig;
pub use runtime::{Installer, PackageManager};
pub use scaffold::{ConsoleReporter, ProjectBuilder, Reporter, ScaffoldReport, SilentReporter};

#[cfg(feature = "tui")]
pub use tui::run;
