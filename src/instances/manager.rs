use crate::error::{ModelariumError, RemoteError, Result};
use crate::instances::modelfile::resolve_local_paths;
use crate::instances::stubs::{instance_name, qualify_name, StubFile};
use crate::instances::ServingClient;

/// Settings shared by every instance operation
#[derive(Debug, Clone, Default)]
pub struct InstanceOptions {
    pub namespace: String,
    pub dry_run: bool,
}

/// Result of one item in a batch
#[derive(Debug)]
pub enum ItemStatus {
    Created,
    Skipped,
    Failed(RemoteError),
}

#[derive(Debug)]
pub struct ItemOutcome {
    pub filename: String,
    pub name: String,
    pub status: ItemStatus,
}

/// Per-item results of a batch create, in processing order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Created))
    }

    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Skipped))
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ItemStatus::Failed(_)))
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&ItemStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Creates, renames and deletes Ollama models
pub struct InstanceManager<C> {
    client: C,
    options: InstanceOptions,
}

impl<C: ServingClient> InstanceManager<C> {
    pub const fn new(client: C, options: InstanceOptions) -> Self {
        Self { client, options }
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Create one model per modelfile, carrying on past failures
    pub async fn create_all(&self, stubs: &[StubFile]) -> BatchReport {
        let mut report = BatchReport::default();

        for stub in stubs {
            let name = instance_name(&stub.filename, &self.options.namespace);
            tracing::info!("Creating model from {} with name {name}", stub.filename);

            let status = if self.options.dry_run {
                ItemStatus::Skipped
            } else {
                match self.register(&name, stub).await {
                    Ok(()) => ItemStatus::Created,
                    Err(e) => {
                        tracing::warn!("Error creating model {name}: {e}");
                        ItemStatus::Failed(e)
                    }
                }
            };

            report.outcomes.push(ItemOutcome {
                filename: stub.filename.clone(),
                name,
                status,
            });
        }

        report
    }

    /// Push local weights referenced by the modelfile, then create the model
    async fn register(&self, name: &str, stub: &StubFile) -> std::result::Result<(), RemoteError> {
        let modelfile = resolve_local_paths(&self.client, &stub.contents, stub.base_dir()).await?;
        self.client.create(name, &modelfile).await
    }

    /// Copy `source` to `dest` and delete `source`
    ///
    /// A `dest` without a namespace is put in the configured one.
    /// Returns the resolved destination name.
    pub async fn rename(&self, source: Option<&str>, dest: Option<&str>) -> Result<String> {
        let source = required(source, "--source is required for rename")?;
        let dest = required(dest, "--dest is required for rename")?;

        let resolved = qualify_name(dest, &self.options.namespace);
        if resolved != dest {
            tracing::info!(
                "Destination {dest} should include a namespace. Adding {}.",
                self.options.namespace
            );
        }

        tracing::info!("Copying model {source} to {resolved} and deleting {source}.");

        if self.options.dry_run {
            return Ok(resolved);
        }

        let result = match self.client.copy(source, &resolved).await {
            Ok(()) => self.client.delete(source).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            tracing::error!("Error copying model {source} to {resolved}: {e}");
            return Err(e.into());
        }

        Ok(resolved)
    }

    /// Delete a single model by its full name
    pub async fn delete(&self, name: Option<&str>) -> Result<()> {
        let name = required(name, "--source is required for delete")?;

        tracing::info!("Deleting model {name}.");

        if self.options.dry_run {
            return Ok(());
        }

        self.client.delete(name).await.map_err(|e| {
            tracing::error!("Error deleting model {name}: {e}");
            ModelariumError::from(e)
        })
    }
}

fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ModelariumError::InvalidArgument(message.to_string()))
}
