use thiserror::Error;

/// Main error type for Modelarium
#[derive(Error, Debug)]
pub enum ModelariumError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Download error: {0}\n\nTroubleshooting:\n- Check the repository id and file name on https://huggingface.co\n- Gated or private repositories need HF_TOKEN (or `huggingface-cli login`)\n- Check internet connection and try again with --redownload")]
    Download(String),

    #[error("Ollama error: {0}")]
    RemoteOperation(#[from] RemoteError),

    #[error("Config error: {0}\n\nTroubleshooting:\n- Check config file: ~/.config/modelarium/config.toml\n- Run with RUST_LOG=debug for more details")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by the Ollama daemon or the transport in front of it
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}\n\nTroubleshooting:\n- Is Ollama running? Start with: ollama serve\n- Check --host (default http://localhost:11434)")]
    Network(String),
}

pub type Result<T> = std::result::Result<T, ModelariumError>;
