//! dt entry point.

use std::process;

use clap::Parser;
use colored::Colorize;
use log::{debug, info};
use nix::unistd::geteuid;

mod cli;
mod commands;
mod config;
mod error;
mod hosts;
mod runtime;
mod sync;
mod types;

use cli::Cli;
use config::Config;
use error::DtError;
use runtime::DockerRuntime;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG still wins when set
    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("{:#}", e).red());
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if !geteuid().is_root() {
        return Err(DtError::NotPrivileged.into());
    }

    let mut cfg = Config::load()?;
    if let Some(path) = &cli.hosts_file {
        cfg.hosts_file = path.clone();
    }
    debug!("Loaded config: {:?}", cfg);

    let actions = cli.actions();
    if actions.is_empty() {
        info!("No action requested");
        return Ok(());
    }

    let runtime = DockerRuntime::connect(cfg.network_name.clone(), cfg.stop_timeout)?;
    commands::run(actions, cfg, &runtime).await
}
