//! Project generation stages
//!
//! This module provides:
//! - Directory tree creation (`builder`)
//! - Asset copying from fetched packages (`materializer`)
//! - Entry-file rendering (`renderer`)
//! - Scratch cleanup (`cleanup`)
//! - The `ProjectBuilder` that runs them in order, reporting through a `Reporter`

pub mod builder;
pub mod cleanup;
pub mod materializer;
pub mod pipeline;
pub mod renderer;
pub mod report;
pub mod reporter;

pub use pipeline::ProjectBuilder;
pub use report::{IntegrationOutcome, ScaffoldReport, StageOutcome};
pub use reporter::{ConsoleReporter, Reporter, SilentReporter};
