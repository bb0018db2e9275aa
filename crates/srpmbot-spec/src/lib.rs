//! RPM spec file handling for Srpmbot.
//!
//! This crate provides:
//! - [`ReleaseState`]: the parsed `Release:` tag and how it advances
//! - [`update_spec`]: the in-place release bump and changelog entry

mod error;
mod release;
mod update;

pub use error::{SpecError, SpecResult};
pub use release::{DIST_MACRO, ReleaseState};
pub use update::{SpecChange, SpecUpdate, rewrite_spec, update_spec};
