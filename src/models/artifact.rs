use crate::error::{ModelariumError, Result};
use std::path::{Component, Path};

/// Extension stripped from weight files when naming their modelfile
pub const WEIGHTS_EXTENSION: &str = ".gguf";

/// Extension of generated Ollama modelfiles
pub const MODELFILE_EXTENSION: &str = ".modelfile";

const HUB_URL: &str = "https://huggingface.co";

/// A single file in a Hugging Face model repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelArtifact {
    pub repo_id: String,
    pub filename: String,
}

impl ModelArtifact {
    /// Create an artifact, rejecting empty repository ids and file names
    ///
    /// The file name may sit in a repository subfolder (`Q4_K_M/x.gguf`) but
    /// must stay relative and never climb out with `..`.
    pub fn new(repo_id: impl Into<String>, filename: impl Into<String>) -> Result<Self> {
        let repo_id = repo_id.into();
        let filename = filename.into();

        if repo_id.trim().is_empty() {
            return Err(ModelariumError::InvalidArgument(
                "repository id is required".to_string(),
            ));
        }
        if filename.trim().is_empty() {
            return Err(ModelariumError::InvalidArgument(
                "file name is required".to_string(),
            ));
        }
        if !Path::new(&filename)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(ModelariumError::InvalidArgument(format!(
                "file name '{filename}' must be a relative path inside the repository"
            )));
        }

        Ok(Self { repo_id, filename })
    }

    /// Last path segment of the file name (`Q4_K_M/x.gguf` -> `x.gguf`)
    #[must_use]
    pub fn basename(&self) -> &str {
        self.filename
            .rsplit('/')
            .next()
            .unwrap_or(&self.filename)
    }

    /// Name of the modelfile for this artifact (`x.Q4.gguf` -> `x.Q4.modelfile`)
    ///
    /// Only the last path segment is used so every modelfile lands directly in
    /// the modelfiles directory. Names without a `.gguf` suffix keep the whole
    /// segment as the base.
    #[must_use]
    pub fn modelfile_name(&self) -> String {
        let basename = self.basename();
        let base = basename
            .strip_suffix(WEIGHTS_EXTENSION)
            .unwrap_or(basename);
        format!("{base}{MODELFILE_EXTENSION}")
    }

    /// Name of the markdown note for this artifact (`org/model` -> `org_model.md`)
    #[must_use]
    pub fn note_name(&self) -> String {
        format!("{}.md", self.repo_id.replace('/', "_"))
    }

    /// Repository page on the hub
    #[must_use]
    pub fn hub_url(&self) -> String {
        format!("{HUB_URL}/{}", self.repo_id)
    }

    /// Starting Ollama modelfile, pointing at the weights relative to the modelfiles dir
    #[must_use]
    pub fn modelfile_template(&self) -> String {
        format!(
            "FROM ../models/{}\nTEMPLATE \"\"\"\n<your template here>\n\"\"\"\nSYSTEM \"\"\"\nYou are a helpful assistant.\n\"\"\"\n",
            self.filename
        )
    }

    /// Markdown note skeleton for documenting the model
    #[must_use]
    pub fn note_template(&self) -> String {
        format!(
            "# Notes for {repo}\n[{repo}]({url})\n\n## Quants\n<quants go here>\n\n## Notes\n<notes here>\n",
            repo = self.repo_id,
            url = self.hub_url()
        )
    }
}
