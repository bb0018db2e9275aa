//! Copr build service client for Srpmbot.
//!
//! This crate provides:
//! - [`BuildService`]: submit a source package, query a build's status
//! - [`BuildStatus`]: the states a submitted build moves through
//! - [`CoprClient`]: the Copr v3 API implementation
//! - [`CoprCredentials`]: the `~/.config/copr` credentials file

mod client;
mod credentials;
mod error;
mod service;
mod status;

pub use client::{CoprClient, normalize_base_url, select_base_url};
pub use credentials::{COPR_SECTION, CoprCredentials, DEFAULT_COPR_URL};
pub use error::{CoprError, CoprResult};
pub use service::BuildService;
pub use status::{BuildId, BuildStatus};
