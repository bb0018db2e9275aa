//! Core library for Srpmbot.
//!
//! This crate drives a project from its upstream repository to a source RPM,
//! submits the results to the build service and follows the builds.

mod archive;
mod dispatch;
mod error;
mod monitor;
mod packaging;
mod patches;
mod pipeline;
mod project;

pub use archive::{ArchiveHandle, ArchiveResolver, find_archive_name};
pub use dispatch::{BuildDispatcher, BuildHandle, BuiltPackage};
pub use error::{CoreError, CoreResult};
pub use monitor::{BuildMonitor, DEFAULT_POLL_INTERVAL, MonitorReport};
pub use packaging::{PackageTool, RpmTool, parse_written_path};
pub use patches::copy_patches;
pub use pipeline::{Packager, ProjectOutcome, ProjectPipeline};
pub use project::{ProjectDescriptor, expand_tilde};
