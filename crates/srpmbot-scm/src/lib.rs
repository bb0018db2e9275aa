//! Version control abstraction layer for Srpmbot.
//!
//! This crate provides one contract over several version control systems:
//! - [`SourceProvider`]: clone, pull, commit identifier and archive command
//! - [`GitProvider`] and [`MercurialProvider`]: the two backends
//! - [`process`]: synchronous command execution with explicit working directories

mod error;
mod git;
mod kind;
mod mercurial;
pub mod process;
mod provider;

pub use error::{ScmError, ScmResult};
pub use git::GitProvider;
pub use kind::ScmKind;
pub use mercurial::MercurialProvider;
pub use process::CommandOutput;
pub use provider::{CommitId, SourceProvider, provider_for};
