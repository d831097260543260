//! Integration catalog and answer resolution
//!
//! This module provides:
//! - The static catalog of integrations and their package assets
//! - Resolution of raw answers into a project descriptor and integration set

pub mod catalog;
pub mod resolver;

pub use catalog::{CatalogEntry, EntryKind, Integration, ScriptSource, StyleSource, CATALOG};
pub use resolver::{
    project_name, resolve, Answers, BuildTool, Delivery, IntegrationSet, Library,
    ProjectDescriptor, DEFAULT_PROJECT_NAME,
};
