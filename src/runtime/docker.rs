use super::ContainerRuntime;
use crate::error::DtError;
use crate::types::ContainerRecord;
use anyhow::Result;
use async_trait::async_trait;
use bollard::container::{ListContainersOptions, LogOutput, StopContainerOptions};
use bollard::exec::{CreateExecOptions, ResizeExecOptions, StartExecResults};
use bollard::models::ContainerInspectResponse;
use bollard::Docker;
use crossterm::terminal;
use futures_util::stream::StreamExt;
use log::{debug, warn};
use std::io::{IsTerminal, Read};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;

pub struct DockerRuntime {
    docker: Docker,
    network_name: Option<String>,
    stop_timeout: Option<i64>,
}

impl DockerRuntime {
    /// Connects to the local Docker daemon (unix socket on Linux, or
    /// whatever `DOCKER_HOST` points at).
    pub fn connect(
        network_name: Option<String>,
        stop_timeout: Option<i64>,
    ) -> std::result::Result<Self, DtError> {
        let docker = Docker::connect_with_local_defaults()?;
        Ok(Self {
            docker,
            network_name,
            stop_timeout,
        })
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_container_ids(&self) -> Result<Vec<String>> {
        let opts = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let containers = self.docker.list_containers(Some(opts)).await?;
        Ok(containers.into_iter().filter_map(|c| c.id).collect())
    }

    async fn inspect(&self, id: &str) -> Result<ContainerRecord> {
        let detail = self.docker.inspect_container(id, None).await?;
        let ip = container_ip(&detail, self.network_name.as_deref());
        Ok(ContainerRecord {
            id: id.to_string(),
            name: detail.name,
            ip,
        })
    }

    async fn stop(&self, name: &str) -> Result<()> {
        let opts = self.stop_timeout.map(|t| StopContainerOptions { t });
        self.docker.stop_container(name, opts).await?;
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<()> {
        self.docker.remove_container(name, None).await?;
        Ok(())
    }

    async fn exec_interactive(&self, name: &str, command: &str) -> Result<()> {
        let tty = std::io::stdin().is_terminal() && std::io::stdout().is_terminal();
        let exec = self
            .docker
            .create_exec(
                name,
                CreateExecOptions {
                    attach_stdin: Some(true),
                    attach_stdout: Some(true),
                    attach_stderr: Some(true),
                    tty: Some(tty),
                    cmd: Some(vec![command]),
                    ..Default::default()
                },
            )
            .await?
            .id;

        if let StartExecResults::Attached {
            mut output,
            mut input,
        } = self.docker.start_exec(&exec, None).await?
        {
            let _raw = if tty { Some(RawMode::enable()?) } else { None };
            if tty {
                self.resize(&exec).await;
            }

            let (stdin_tx, mut stdin_rx) = mpsc::channel::<Vec<u8>>(32);
            // Plain thread: a blocked stdin read must not hold up runtime shutdown.
            // It keeps the stdin lock and one pending read after the exec ends and
            // only goes away with the process, so no later action may read stdin.
            std::thread::spawn(move || pump_stdin(stdin_tx));
            let forward = tokio::spawn(async move {
                while let Some(chunk) = stdin_rx.recv().await {
                    if input.write_all(&chunk).await.is_err() {
                        break;
                    }
                }
            });

            let mut stdout = tokio::io::stdout();
            let mut stderr = tokio::io::stderr();
            while let Some(msg) = output.next().await {
                match msg {
                    Ok(LogOutput::StdErr { message }) => {
                        stderr.write_all(&message).await?;
                        stderr.flush().await?;
                    }
                    Ok(out) => {
                        stdout.write_all(&out.into_bytes()).await?;
                        stdout.flush().await?;
                    }
                    Err(e) => {
                        warn!("Exec stream for {} failed: {}", name, e);
                        break;
                    }
                }
            }
            forward.abort();
        }

        match self.docker.inspect_exec(&exec).await {
            Ok(info) => debug!("{} in {} exited with {:?}", command, name, info.exit_code),
            Err(e) => debug!("Could not inspect exec {}: {}", exec, e),
        }
        Ok(())
    }
}

impl DockerRuntime {
    async fn resize(&self, exec: &str) {
        let (width, height) = match terminal::size() {
            Ok(size) => size,
            Err(e) => {
                debug!("Could not read terminal size: {}", e);
                return;
            }
        };
        if let Err(e) = self
            .docker
            .resize_exec(exec, ResizeExecOptions { height, width })
            .await
        {
            debug!("Failed to resize exec {}: {}", exec, e);
        }
    }
}

/// Puts the local terminal in raw mode until dropped.
struct RawMode;

impl RawMode {
    fn enable() -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
}

fn pump_stdin(tx: mpsc::Sender<Vec<u8>>) {
    let mut stdin = std::io::stdin().lock();
    let mut buf = [0u8; 1024];
    loop {
        match stdin.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.blocking_send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

/// Address of the container on `network_name`, or on the default bridge
/// when no network is configured.
fn container_ip(detail: &ContainerInspectResponse, network_name: Option<&str>) -> Option<String> {
    let settings = detail.network_settings.as_ref()?;
    let Some(network_name) = network_name else {
        return settings.ip_address.clone().filter(|ip| !ip.is_empty());
    };

    let net = settings.networks.as_ref()?.get(network_name)?;
    if let Some(ipv4) = &net.ip_address {
        if !ipv4.is_empty() {
            return Some(ipv4.clone());
        }
    }
    if let Some(ipv6) = &net.global_ipv6_address {
        if !ipv6.is_empty() {
            return Some(ipv6.clone());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bollard::models::{EndpointSettings, NetworkSettings};
    use std::collections::HashMap;

    fn detail(bridge_ip: &str, networks: &[(&str, &str, &str)]) -> ContainerInspectResponse {
        let networks: HashMap<String, EndpointSettings> = networks
            .iter()
            .map(|(name, v4, v6)| {
                (
                    name.to_string(),
                    EndpointSettings {
                        ip_address: Some(v4.to_string()),
                        global_ipv6_address: Some(v6.to_string()),
                        ..Default::default()
                    },
                )
            })
            .collect();
        ContainerInspectResponse {
            name: Some("/web".into()),
            network_settings: Some(NetworkSettings {
                ip_address: Some(bridge_ip.to_string()),
                networks: Some(networks),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn default_bridge_ip_is_used_without_network() {
        let d = detail("172.17.0.2", &[("backend", "10.1.0.4", "")]);
        assert_eq!(container_ip(&d, None).as_deref(), Some("172.17.0.2"));
        assert_eq!(container_ip(&detail("", &[]), None), None);
    }

    #[test]
    fn named_network_prefers_ipv4_then_ipv6() {
        let d = detail("172.17.0.2", &[("backend", "10.1.0.4", "fd00::4")]);
        assert_eq!(container_ip(&d, Some("backend")).as_deref(), Some("10.1.0.4"));

        let d = detail("", &[("backend", "", "fd00::4")]);
        assert_eq!(container_ip(&d, Some("backend")).as_deref(), Some("fd00::4"));
    }

    #[test]
    fn unknown_network_has_no_ip() {
        let d = detail("172.17.0.2", &[("backend", "10.1.0.4", "")]);
        assert_eq!(container_ip(&d, Some("frontend")), None);
    }
}
