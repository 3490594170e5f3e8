use figment::{
    providers::{Env, Format, Json, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// File that receives the generated block.
    pub hosts_file: PathBuf,
    /// Shell started by `--connect`.
    pub shell: String,
    /// Take container IPs from this network instead of the default bridge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
    /// Seconds Docker waits before killing a stopping container.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_timeout: Option<i64>,
    /// Write through a temp file + rename instead of overwriting in place.
    pub atomic_write: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts_file: PathBuf::from("/etc/hosts"),
            shell: "bash".into(),
            network_name: None,
            stop_timeout: None,
            atomic_write: true,
        }
    }
}

impl Config {
    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file("dt.toml"))
            .merge(Json::file("dt.json"))
            .merge(Env::prefixed("DT_"))
    }

    pub fn load() -> anyhow::Result<Self> {
        let config: Config = Self::figment()
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        if config.shell.trim().is_empty() {
            anyhow::bail!("Invalid configuration: shell must not be empty");
        }

        Ok(config)
    }
}
