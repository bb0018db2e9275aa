//! Build monitoring.

use std::thread;
use std::time::Duration;

use srpmbot_copr::{BuildService, BuildStatus};
use tracing::{info, warn};

use crate::BuildHandle;

/// Pause between two status rounds.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(45);

/// What the monitor observed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorReport {
    /// Number of status rounds performed.
    pub polls: usize,
    /// Builds in the order they reached a final state.
    pub finished: Vec<(BuildHandle, BuildStatus)>,
}

impl MonitorReport {
    /// Number of builds that did not succeed.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.finished
            .iter()
            .filter(|(_, status)| *status != BuildStatus::Succeeded)
            .count()
    }
}

/// Polls builds until every one of them reaches a final state.
pub struct BuildMonitor<'a> {
    service: &'a dyn BuildService,
    interval: Duration,
}

impl<'a> BuildMonitor<'a> {
    #[must_use]
    pub fn new(service: &'a dyn BuildService) -> Self {
        Self {
            service,
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Waits, then queries every pending build once.
    ///
    /// Returns the builds still pending; finished ones are appended to
    /// `finished`. A failed query keeps the build pending, unless the service
    /// rejected it for good (e.g. unknown build, expired token), in which
    /// case the build counts as failed.
    pub fn poll(
        &self,
        pending: Vec<BuildHandle>,
        finished: &mut Vec<(BuildHandle, BuildStatus)>,
    ) -> Vec<BuildHandle> {
        thread::sleep(self.interval);

        let mut still_pending = Vec::with_capacity(pending.len());
        for handle in pending {
            match self.service.status(handle.id) {
                Ok(status) if status.is_terminal() => {
                    info!(project = %handle.project, build = %handle.id, %status, "build finished");
                    finished.push((handle, status));
                }
                Ok(status) => {
                    info!(project = %handle.project, build = %handle.id, %status, "build in progress");
                    still_pending.push(handle);
                }
                Err(e) if e.is_permanent() => {
                    warn!(project = %handle.project, build = %handle.id, error = %e, "build can no longer be queried, counting it as failed");
                    finished.push((handle, BuildStatus::Failed));
                }
                Err(e) => {
                    warn!(project = %handle.project, build = %handle.id, error = %e, "status query failed");
                    still_pending.push(handle);
                }
            }
        }
        still_pending
    }

    /// Polls until no build is pending.
    pub fn run(&self, handles: Vec<BuildHandle>) -> MonitorReport {
        let mut report = MonitorReport::default();
        let mut pending = handles;
        if pending.is_empty() {
            return report;
        }

        info!(count = pending.len(), interval = ?self.interval, "monitoring builds");
        while !pending.is_empty() {
            pending = self.poll(pending, &mut report.finished);
            report.polls += 1;
        }

        info!(
            polls = report.polls,
            failures = report.failures(),
            "all builds finished"
        );
        report
    }
}
