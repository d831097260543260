//! Spinner-backed reporter for interactive runs

use crate::scaffold::Reporter;
use std::cell::RefCell;

/// Shows each stage as a cliclack spinner and logs the rest inline
#[derive(Default)]
pub struct SpinnerReporter {
    spinner: RefCell<Option<cliclack::ProgressBar>>,
}

impl SpinnerReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for SpinnerReporter {
    fn stage(&self, message: &str) {
        let spinner = cliclack::spinner();
        spinner.start(message);
        if let Some(previous) = self.spinner.replace(Some(spinner)) {
            previous.stop("");
        }
    }

    fn stage_done(&self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => {
                let _ = cliclack::log::success(message);
            }
        }
    }

    fn stage_failed(&self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => {
                let _ = cliclack::log::error(message);
            }
        }
    }

    fn info(&self, message: &str) {
        let _ = cliclack::log::info(message);
    }

    fn warning(&self, message: &str) {
        let _ = cliclack::log::warning(message);
    }
}
