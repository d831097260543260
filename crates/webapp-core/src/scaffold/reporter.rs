//! Progress reporting for pipeline stages
//!
//! The pipeline never prints directly; it reports through a `Reporter`
//! passed in by the caller.

use colored::Colorize;

pub trait Reporter {
    /// A long-running stage has started
    fn stage(&self, message: &str);

    /// The current stage finished
    fn stage_done(&self, message: &str);

    /// The current stage failed
    fn stage_failed(&self, message: &str);

    fn info(&self, message: &str);

    fn warning(&self, message: &str);
}

/// Plain colored output for non-interactive use
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn stage(&self, message: &str) {
        println!("  {} {}", "->".blue(), message);
    }

    fn stage_done(&self, message: &str) {
        println!("  {} {}", "done".green(), message);
    }

    fn stage_failed(&self, message: &str) {
        eprintln!("  {} {}", "failed".red(), message);
    }

    fn info(&self, message: &str) {
        println!("  {}", message.dimmed());
    }

    fn warning(&self, message: &str) {
        eprintln!("{} {}", "Warning:".yellow(), message);
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn stage(&self, _: &str) {}
    fn stage_done(&self, _: &str) {}
    fn stage_failed(&self, _: &str) {}
    fn info(&self, _: &str) {}
    fn warning(&self, _: &str) {}
}
