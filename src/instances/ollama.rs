use crate::error::RemoteError;
use crate::instances::ServingClient;
use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::StatusCode;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

/// Ollama REST API client
pub struct OllamaClient {
    client: reqwest::Client,
    host: String,
    timeout: Duration,
}

impl std::fmt::Debug for OllamaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClient")
            .field("client", &"Client { ... }")
            .field("host", &self.host)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[derive(Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    modelfile: &'a str,
    stream: bool,
}

#[derive(Serialize)]
struct CopyRequest<'a> {
    source: &'a str,
    destination: &'a str,
}

#[derive(Serialize)]
struct DeleteRequest<'a> {
    name: &'a str,
}

impl OllamaClient {
    /// Create a client for the daemon at `host` (e.g. `http://localhost:11434`)
    #[must_use]
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            host: host.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{path}", self.host)
    }

    /// Send a request and map the daemon's answer, `name` is the model the error refers to
    async fn send(&self, request: reqwest::RequestBuilder, name: &str) -> Result<(), RemoteError> {
        self.execute(request.timeout(self.timeout), name).await
    }

    async fn execute(&self, request: reqwest::RequestBuilder, name: &str) -> Result<(), RemoteError> {
        let response = request
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound(name.to_string())),
            _ => Err(RemoteError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            }),
        }
    }
}

/// `sha256:<hex>` of a file's contents, the blob name Ollama expects
pub async fn file_digest(path: &Path) -> std::io::Result<String> {
    let mut file = tokio::fs::File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 1 << 20];

    loop {
        let n = file.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(format!("sha256:{:x}", hasher.finalize()))
}

/// Ollama reports failures as `{"error": "..."}`; fall back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

#[async_trait]
impl ServingClient for OllamaClient {
    async fn create_blob(&self, path: &Path) -> Result<String, RemoteError> {
        let upload_error = |e: std::io::Error| RemoteError::Upload(format!("{}: {e}", path.display()));

        let digest = file_digest(path).await.map_err(upload_error)?;
        let url = self.endpoint(&format!("blobs/{digest}"));

        let head = self
            .client
            .head(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        match head.status() {
            status if status.is_success() => {
                tracing::debug!(digest = %digest, "Blob already present on {}", self.host);
                return Ok(digest);
            }
            StatusCode::NOT_FOUND => {}
            status => {
                return Err(RemoteError::Api {
                    status: status.as_u16(),
                    message: format!("unexpected answer checking blob {digest}"),
                });
            }
        }

        let file = tokio::fs::File::open(path).await.map_err(upload_error)?;
        let len = file.metadata().await.map_err(upload_error)?.len();

        tracing::info!("Uploading {} to {}", path.display(), self.host);

        // Uploads run without the request timeout, weights can be tens of GB
        let request = self
            .client
            .post(&url)
            .header(CONTENT_LENGTH, len)
            .body(reqwest::Body::wrap_stream(ReaderStream::new(file)));
        self.execute(request, &digest).await?;

        Ok(digest)
    }

    async fn create(&self, name: &str, modelfile: &str) -> Result<(), RemoteError> {
        tracing::debug!(host = %self.host, model = %name, "POST /api/create");
        let request = self.client.post(self.endpoint("create")).json(&CreateRequest {
            name,
            modelfile,
            stream: false,
        });
        self.send(request, name).await
    }

    async fn copy(&self, source: &str, destination: &str) -> Result<(), RemoteError> {
        tracing::debug!(host = %self.host, source = %source, destination = %destination, "POST /api/copy");
        let request = self
            .client
            .post(self.endpoint("copy"))
            .json(&CopyRequest {
                source,
                destination,
            });
        self.send(request, source).await
    }

    async fn delete(&self, name: &str) -> Result<(), RemoteError> {
        tracing::debug!(host = %self.host, model = %name, "DELETE /api/delete");
        let request = self
            .client
            .delete(self.endpoint("delete"))
            .json(&DeleteRequest { name });
        self.send(request, name).await
    }
}
