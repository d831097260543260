//! Runtime detection and package installation
//!
//! This module provides:
//! - Node.js and package manager detection
//! - The `Installer` seam and its npm-backed implementation

pub mod check;
pub mod installer;

pub use check::{check_node, check_package_manager, check_runtimes, RuntimeInfo, RuntimeNeeds};
pub use installer::{Installer, PackageManager};
