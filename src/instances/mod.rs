pub mod manager;
pub mod modelfile;
pub mod ollama;
pub mod stubs;

use crate::error::RemoteError;
use async_trait::async_trait;
use std::path::Path;

pub use manager::{BatchReport, InstanceManager, InstanceOptions, ItemOutcome, ItemStatus};
pub use modelfile::resolve_local_paths;
pub use ollama::OllamaClient;
pub use stubs::{instance_name, qualify_name, read_stubs, StubFile};

/// Model operations on a serving daemon
#[async_trait]
pub trait ServingClient: Send + Sync {
    /// Make a local file available to the daemon, returning its `sha256:<hex>` digest
    async fn create_blob(&self, path: &Path) -> Result<String, RemoteError>;

    /// Create (or overwrite) model `name` from modelfile text
    async fn create(&self, name: &str, modelfile: &str) -> Result<(), RemoteError>;

    /// Copy model `source` to `destination`
    async fn copy(&self, source: &str, destination: &str) -> Result<(), RemoteError>;

    /// Delete model `name`
    async fn delete(&self, name: &str) -> Result<(), RemoteError>;
}
