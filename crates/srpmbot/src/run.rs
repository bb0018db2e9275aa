//! The srpmbot run: build every project, submit, monitor.

use std::path::Path;

use anyhow::{Context, Result};
use srpmbot_config::{Config, ProjectConfig, load_config, record_commit};
use srpmbot_copr::{CoprClient, CoprCredentials, select_base_url};
use srpmbot_core::{
    BuildDispatcher, BuildMonitor, BuiltPackage, PackageTool, Packager, ProjectDescriptor,
    ProjectOutcome, ProjectPipeline, RpmTool,
};
use srpmbot_scm::provider_for;
use tracing::{error, info, warn};

use crate::cli::Cli;

pub fn run(cli: &Cli) -> Result<()> {
    let config_path = cli.config_path()?;
    info!(config = %config_path.display(), "loading configuration");
    let config = load_config(&config_path)
        .with_context(|| format!("failed to load configuration {}", config_path.display()))?;

    let packages = build_packages(&config_path, &config, &RpmTool::new());
    info!(count = packages.len(), "source rpms generated");

    if cli.srpm_only {
        for package in &packages {
            info!(project = %package.project, srpm = %package.srpm.display(), "not submitted");
        }
        return Ok(());
    }
    if packages.is_empty() {
        info!("nothing to submit");
        return Ok(());
    }

    let credentials_path = cli.copr_config_path()?;
    let credentials = CoprCredentials::load(&credentials_path).with_context(|| {
        format!(
            "failed to load Copr credentials {}",
            credentials_path.display()
        )
    })?;
    let base_url = select_base_url(config.main.copr_url.as_deref(), &credentials);
    let client = CoprClient::with_timeout(&base_url, credentials, cli.http_timeout())
        .context("failed to set up the Copr client")?;
    info!(url = client.base_url(), "submitting to Copr");

    let handles = BuildDispatcher::new(&client).dispatch(&packages);
    if cli.no_monitoring || handles.is_empty() {
        info!(count = handles.len(), "builds submitted");
        return Ok(());
    }

    let report = BuildMonitor::new(&client)
        .with_interval(cli.poll_interval())
        .run(handles);
    for (handle, status) in &report.finished {
        info!(project = %handle.project, build = %handle.id, %status, "final status");
    }
    if report.failures() > 0 {
        warn!(failures = report.failures(), "some builds did not succeed");
    }
    Ok(())
}

/// Runs the pipeline of every project in section order.
///
/// A failing project is logged and skipped.
fn build_packages(config_path: &Path, config: &Config, tool: &dyn PackageTool) -> Vec<BuiltPackage> {
    let packager = Packager {
        name: config.main.username.clone(),
        email: config.main.email.clone(),
    };

    let mut packages = Vec::new();
    for (name, project) in &config.projects {
        match build_project(config_path, name, project, &packager, tool) {
            Ok(Some(package)) => packages.push(package),
            Ok(None) => {}
            Err(e) => error!(project = %name, "{e:#}"),
        }
    }
    packages
}

fn build_project(
    config_path: &Path,
    name: &str,
    config: &ProjectConfig,
    packager: &Packager,
    tool: &dyn PackageTool,
) -> Result<Option<BuiltPackage>> {
    let project = ProjectDescriptor::from_config(name, config)?;
    let provider = provider_for(project.scm);
    let outcome = ProjectPipeline::new(provider.as_ref(), tool, packager)
        .run(&project)
        .with_context(|| format!("failed to generate the source rpm of {name}"))?;

    if outcome.should_record() {
        let commit = outcome.commit();
        if let Err(e) = record_commit(config_path, name, project.scm.short(), commit.as_str()) {
            warn!(project = %name, %commit, error = %e, "failed to record the last commit");
        }
    }

    Ok(match outcome {
        ProjectOutcome::Built { srpm, .. } => Some(BuiltPackage {
            project: name.to_string(),
            target: project.build_target().to_string(),
            srpm,
        }),
        ProjectOutcome::Unchanged { .. } | ProjectOutcome::AlreadyCurrent { .. } => None,
    })
}
