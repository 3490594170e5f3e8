use crate::types::ContainerRecord;
use anyhow::Result;
use async_trait::async_trait;

pub mod docker;
pub use docker::DockerRuntime;

/// The container operations `dt` needs from the runtime.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Full IDs of every container, stopped ones included.
    async fn list_container_ids(&self) -> Result<Vec<String>>;

    /// Name and address of a single container.
    async fn inspect(&self, id: &str) -> Result<ContainerRecord>;

    async fn stop(&self, name: &str) -> Result<()>;

    async fn remove(&self, name: &str) -> Result<()>;

    /// Attach the caller's terminal to `command` running inside `name`.
    /// Returns once the remote process exits.
    async fn exec_interactive(&self, name: &str, command: &str) -> Result<()>;
}
