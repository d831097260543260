//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

mod interrupt;
mod prompts;
mod reporter;

pub use interrupt::{InterruptGuard, INTERRUPTED_EXIT_CODE};
pub use prompts::{run, run_gulp, CreateArgs, GulpArgs};
pub use reporter::SpinnerReporter;
