use crate::error::Result;
use std::fs;
use std::path::PathBuf;

/// On-disk layout under an output directory
///
/// ```text
/// <output_dir>/models/<file>.gguf
/// <output_dir>/modelfiles/<file>.modelfile
/// <output_dir>/notes/<org>_<repo>.md
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: output_dir.into(),
        }
    }

    #[must_use]
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    #[must_use]
    pub fn modelfiles_dir(&self) -> PathBuf {
        self.root.join("modelfiles")
    }

    #[must_use]
    pub fn notes_dir(&self) -> PathBuf {
        self.root.join("notes")
    }

    /// Create all three directories if missing
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(self.models_dir())?;
        fs::create_dir_all(self.modelfiles_dir())?;
        fs::create_dir_all(self.notes_dir())?;
        Ok(())
    }
}
