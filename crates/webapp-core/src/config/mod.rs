//! Configuration: runtime settings and generated build pipeline files

pub mod generator;
pub mod settings;

pub use settings::Settings;
