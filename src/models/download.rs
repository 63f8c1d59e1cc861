//! Model download from the Hugging Face Hub
//!
//! The hub client resolves file URLs and tokens the same way the Python
//! `huggingface_hub` tooling does (via hf-hub), then streams the file
//! straight into the models directory instead of the shared HF cache.

use crate::error::{ModelariumError, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use hf_hub::api::tokio::ApiBuilder;
use hf_hub::{Cache, Repo, RepoType};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::StatusCode;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Source of model files
#[async_trait]
pub trait HubClient: Send + Sync {
    /// Download `filename` from `repo_id` to `dest`, returning the number of bytes written
    ///
    /// `dest` is either fully written or left untouched.
    async fn fetch(&self, repo_id: &str, filename: &str, dest: &Path) -> Result<u64>;
}

/// Hugging Face Hub client
pub struct HfHubClient {
    client: reqwest::Client,
    revision: String,
    token: Option<String>,
    show_progress: bool,
}

impl std::fmt::Debug for HfHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HfHubClient")
            .field("client", &"Client { ... }")
            .field("revision", &self.revision)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .field("show_progress", &self.show_progress)
            .finish()
    }
}

impl HfHubClient {
    /// Create a client for the given revision, picking up `HF_TOKEN` or the cached login token
    #[must_use]
    pub fn new(revision: impl Into<String>) -> Self {
        let token = std::env::var("HF_TOKEN")
            .ok()
            .filter(|t| !t.is_empty())
            .or_else(|| Cache::from_env().token());

        Self {
            client: reqwest::Client::new(),
            revision: revision.into(),
            token,
            show_progress: true,
        }
    }

    /// Toggle the terminal progress bar
    #[must_use]
    pub const fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Resolve the download URL of a file, honouring `HF_ENDPOINT`
    pub fn file_url(&self, repo_id: &str, filename: &str) -> Result<String> {
        let api = ApiBuilder::from_env()
            .with_token(self.token.clone())
            .build()
            .map_err(|e| {
                ModelariumError::Download(format!("Failed to initialize HuggingFace API: {e}"))
            })?;

        let repo = api.repo(Repo::with_revision(
            repo_id.to_string(),
            RepoType::Model,
            self.revision.clone(),
        ));

        Ok(repo.url(filename))
    }

    fn progress_bar(&self, total_size: Option<u64>) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = total_size.map_or_else(ProgressBar::new_spinner, ProgressBar::new);
        if let Ok(style) = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
        ) {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    }

    async fn stream_to(
        &self,
        response: reqwest::Response,
        filename: &str,
        partial: &Path,
    ) -> Result<u64> {
        let progress = self.progress_bar(response.content_length());
        let mut file = tokio::fs::File::create(partial).await?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| {
                ModelariumError::Download(format!("Failed while downloading {filename}: {e}"))
            })?;

            file.write_all(&chunk).await?;

            downloaded += chunk.len() as u64;
            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        Ok(downloaded)
    }
}

#[async_trait]
impl HubClient for HfHubClient {
    async fn fetch(&self, repo_id: &str, filename: &str, dest: &Path) -> Result<u64> {
        let url = self.file_url(repo_id, filename)?;
        tracing::debug!(url = %url, "Resolved download URL");

        let mut request = self.client.get(&url);
        if let Some(ref token) = self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ModelariumError::Download(format!("Request to {url} failed: {e}")))?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(ModelariumError::Download(format!(
                    "Access to {repo_id} denied ({}). The repository may be gated or private",
                    response.status()
                )));
            }
            StatusCode::NOT_FOUND => {
                return Err(ModelariumError::Download(format!(
                    "{filename} not found in {repo_id} (revision {})",
                    self.revision
                )));
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(ModelariumError::Download(format!(
                    "Unexpected response ({status}) for {url}: {body}"
                )));
            }
        }

        // Download to a sibling file first so `dest` only ever holds a complete file
        let partial = partial_path(dest);
        let downloaded = match self.stream_to(response, filename, &partial).await {
            Ok(n) => n,
            Err(e) => {
                let _ = tokio::fs::remove_file(&partial).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&partial, dest).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        tracing::info!(
            "Downloaded {filename} ({})",
            format_bytes(downloaded)
        );

        Ok(downloaded)
    }
}

/// `<dest>.part`
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Format bytes as human-readable string
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
