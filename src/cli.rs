//! Command line flags.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "dt")]
#[command(about = "Docker tools: kill, connect and keep /etc/hosts in sync with container IPs")]
#[command(version)]
pub struct Cli {
    /// Stop and remove the named container
    #[arg(short, long, value_name = "NAME")]
    pub kill: Option<String>,

    /// Connect to the named container
    #[arg(short, long, value_name = "NAME")]
    pub connect: Option<String>,

    /// Update hosts file with container ips
    #[arg(short = 'u', long = "update_hosts")]
    pub update_hosts: bool,

    /// Hosts file to rewrite instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub hosts_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// One unit of work requested on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Kill(String),
    Connect(String),
    UpdateHosts,
}

impl Cli {
    /// Requested actions, always in kill → connect → update_hosts order.
    pub fn actions(&self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Some(name) = &self.kill {
            actions.push(Action::Kill(name.clone()));
        }
        if let Some(name) = &self.connect {
            actions.push(Action::Connect(name.clone()));
        }
        if self.update_hosts {
            actions.push(Action::UpdateHosts);
        }
        actions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("dt").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn actions_follow_fixed_order() {
        let cli = parse(&["-u", "--connect", "db", "-k", "web"]);
        assert_eq!(
            cli.actions(),
            vec![
                Action::Kill("web".into()),
                Action::Connect("db".into()),
                Action::UpdateHosts
            ]
        );
    }

    #[test]
    fn long_update_flag_uses_underscore() {
        assert_eq!(parse(&["--update_hosts"]).actions(), vec![Action::UpdateHosts]);
        assert!(Cli::try_parse_from(["dt", "--update-hosts"]).is_err());
    }

    #[test]
    fn no_flags_means_no_actions() {
        assert!(parse(&[]).actions().is_empty());
    }

    #[test]
    fn kill_requires_a_name() {
        assert!(Cli::try_parse_from(["dt", "--kill"]).is_err());
    }
}
