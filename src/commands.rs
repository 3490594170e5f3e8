//! Executes the actions requested on the command line.
//!
//! Stop, remove and attach are best effort: their failures are logged and
//! never change control flow.  Only the hosts synchronization can fail a
//! run.

use anyhow::Result;
use log::{info, warn};

use crate::cli::Action;
use crate::config::Config;
use crate::hosts::HostsFile;
use crate::runtime::ContainerRuntime;
use crate::sync::{synchronize, Outcome, SyncReport};

/// Runs every action in order against `runtime`.
pub async fn run(
    actions: Vec<Action>,
    config: Config,
    runtime: &dyn ContainerRuntime,
) -> Result<()> {
    let hosts = HostsFile::new(config.hosts_file.clone(), config.atomic_write);
    for action in actions {
        match action {
            Action::Kill(name) => kill(runtime, &hosts, &name).await?,
            Action::Connect(name) => connect(runtime, &config.shell, &name).await,
            Action::UpdateHosts => update_hosts(runtime, &hosts).await?,
        }
    }
    Ok(())
}

/// Stops and removes the named container, then resyncs the hosts file.
pub async fn kill(runtime: &dyn ContainerRuntime, hosts: &HostsFile, name: &str) -> Result<()> {
    info!("Killing container {}", name);
    if let Err(e) = runtime.stop(name).await {
        warn!("Failed to stop {}: {:#}", name, e);
    }
    if let Err(e) = runtime.remove(name).await {
        warn!("Failed to remove {}: {:#}", name, e);
    }
    synchronize(runtime, hosts).await?;
    Ok(())
}

/// Opens an interactive shell inside the named container.
pub async fn connect(runtime: &dyn ContainerRuntime, shell: &str, name: &str) {
    info!("Connecting to {} with {}", name, shell);
    if let Err(e) = runtime.exec_interactive(name, shell).await {
        warn!("Failed to connect to {}: {:#}", name, e);
    }
}

pub async fn update_hosts(runtime: &dyn ContainerRuntime, hosts: &HostsFile) -> Result<()> {
    let report = synchronize(runtime, hosts).await?;
    println!("{}", summary(&report, hosts));
    Ok(())
}

fn summary(report: &SyncReport, hosts: &HostsFile) -> String {
    match report.outcome {
        Outcome::Written => format!(
            "Updated {} with {} container(s), skipped {}",
            hosts.path().display(),
            report.entries.len(),
            report.skipped.len()
        ),
        Outcome::LeftUntouched => format!(
            "No container addresses found, {} left untouched",
            hosts.path().display()
        ),
    }
}
