//! CLI definition.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use srpmbot_config::default_config_path;
use srpmbot_copr::CoprCredentials;

use crate::run;

/// Rebuild source RPMs from upstream snapshots and submit them to Copr.
#[derive(Debug, Parser)]
#[command(name = "srpmbot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file [default: <config dir>/srpmbot.toml]
    #[arg(short, long, env = "SRPMBOT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Only build the source RPMs, do not submit them
    #[arg(long)]
    pub srpm_only: bool,

    /// Submit the builds without waiting for them
    #[arg(long)]
    pub no_monitoring: bool,

    /// Copr credentials file [default: <config dir>/copr]
    #[arg(long, env = "SRPMBOT_COPR_CONFIG")]
    pub copr_config: Option<PathBuf>,

    /// Seconds between two build status checks
    #[arg(long, default_value_t = 45)]
    pub poll_interval: u64,

    /// Seconds before a Copr status query is abandoned
    #[arg(long, default_value_t = 30)]
    pub http_timeout: u64,
}

impl Cli {
    /// Runs every configured project, then submits and follows the builds.
    pub fn run(self) -> Result<()> {
        run::run(&self)
    }

    /// Resolves the configuration file path.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path().context("cannot determine the configuration directory"),
        }
    }

    /// Resolves the Copr credentials file path.
    pub fn copr_config_path(&self) -> Result<PathBuf> {
        match &self.copr_config {
            Some(path) => Ok(path.clone()),
            None => CoprCredentials::default_path()
                .context("cannot determine the Copr credentials location"),
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["srpmbot"]);
        assert!(!cli.debug);
        assert!(!cli.srpm_only);
        assert!(!cli.no_monitoring);
        assert_eq!(cli.poll_interval(), Duration::from_secs(45));
        assert_eq!(cli.http_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from([
            "srpmbot",
            "--config",
            "/etc/srpmbot.toml",
            "--debug",
            "--srpm-only",
            "--no-monitoring",
            "--poll-interval",
            "5",
            "--http-timeout",
            "10",
        ]);
        assert_eq!(cli.config_path().unwrap(), PathBuf::from("/etc/srpmbot.toml"));
        assert!(cli.debug);
        assert!(cli.srpm_only);
        assert!(cli.no_monitoring);
        assert_eq!(cli.poll_interval(), Duration::from_secs(5));
        assert_eq!(cli.http_timeout(), Duration::from_secs(10));
    }
}
