//! CLI library for testing purposes

pub mod config;
pub mod convert;
pub mod inspect;

pub use config::{FileConfig, Settings, load_config, resolve_settings};
