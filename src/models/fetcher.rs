use crate::error::Result;
use crate::models::artifact::ModelArtifact;
use crate::models::download::HubClient;
use crate::models::layout::Layout;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Inputs for a single fetch
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub repo_id: String,
    pub filename: String,
    pub output_dir: PathBuf,
    pub redownload: bool,
}

/// What happened to the weights file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded { bytes: u64 },
    AlreadyPresent,
}

/// What happened to a generated companion file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Created,
    AlreadyExists,
}

/// Summary of a fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    pub download: DownloadOutcome,
    pub modelfile: FileOutcome,
    pub note: FileOutcome,
    pub model_path: PathBuf,
    pub modelfile_path: PathBuf,
    pub note_path: PathBuf,
}

/// Downloads a model file and scaffolds its modelfile and note
pub struct Fetcher<H> {
    hub: H,
}

impl<H: HubClient> Fetcher<H> {
    pub const fn new(hub: H) -> Self {
        Self { hub }
    }

    #[must_use]
    pub const fn hub(&self) -> &H {
        &self.hub
    }

    /// Download the model if needed, then create its modelfile and note if missing
    pub async fn fetch(&self, options: &FetchOptions) -> Result<FetchReport> {
        let artifact = ModelArtifact::new(options.repo_id.as_str(), options.filename.as_str())?;
        let layout = Layout::new(&options.output_dir);
        layout.ensure()?;

        let models_dir = layout.models_dir();
        let model_path = models_dir.join(&artifact.filename);

        let download = if !model_path.exists() || options.redownload {
            // Repository subfolders are mirrored under models/
            if let Some(parent) = model_path.parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
            tracing::info!(
                "Downloading {} from {} to {}",
                artifact.filename,
                artifact.repo_id,
                models_dir.display()
            );
            let bytes = self
                .hub
                .fetch(&artifact.repo_id, &artifact.filename, &model_path)
                .await?;
            DownloadOutcome::Downloaded { bytes }
        } else {
            tracing::info!(
                "File {} already exists in {}",
                artifact.filename,
                models_dir.display()
            );
            DownloadOutcome::AlreadyPresent
        };

        let modelfile_path = layout.modelfiles_dir().join(artifact.modelfile_name());
        let modelfile = create_if_absent(&modelfile_path, &artifact.modelfile_template()).await?;
        log_outcome("Modelfile", &modelfile_path, modelfile);

        let note_path = layout.notes_dir().join(artifact.note_name());
        let note = create_if_absent(&note_path, &artifact.note_template()).await?;
        log_outcome("Note", &note_path, note);

        Ok(FetchReport {
            download,
            modelfile,
            note,
            model_path,
            modelfile_path,
            note_path,
        })
    }
}

/// Write `contents` to `path` unless something is already there
async fn create_if_absent(path: &Path, contents: &str) -> Result<FileOutcome> {
    let file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await;

    match file {
        Ok(mut file) => {
            file.write_all(contents.as_bytes()).await?;
            file.flush().await?;
            Ok(FileOutcome::Created)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(FileOutcome::AlreadyExists),
        Err(e) => Err(e.into()),
    }
}

fn log_outcome(kind: &str, path: &Path, outcome: FileOutcome) {
    match outcome {
        FileOutcome::Created => tracing::info!("Created {kind} {}", path.display()),
        FileOutcome::AlreadyExists => {
            tracing::info!("{kind} {} already exists, leaving it untouched", path.display());
        }
    }
}
