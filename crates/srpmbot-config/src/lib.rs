//! Configuration management for Srpmbot.
//!
//! This crate handles loading and validating the `srpmbot.toml` configuration
//! file, and writing back the last processed commit of each project.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{CONFIG_FILE_NAME, default_config_path, load_config, record_commit};
pub use schema::{Config, MainConfig, ProjectConfig};
