use crate::error::{ModelariumError, Result};
use crate::models::artifact::MODELFILE_EXTENSION;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// A modelfile read from disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubFile {
    pub filename: String,
    pub path: PathBuf,
    pub contents: String,
}

impl StubFile {
    /// Directory that relative `FROM` paths are resolved against
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Read every file in `directory` whose name matches `pattern`, sorted by name
///
/// The pattern only has to match at the start of the name, so `.*\.modelfile`
/// also picks up `x.modelfile.bak`. Anchor it with `$` to be strict.
pub fn read_stubs(directory: &Path, pattern: &str) -> Result<Vec<StubFile>> {
    let regex = Regex::new(&format!("^(?:{pattern})")).map_err(|e| {
        ModelariumError::InvalidArgument(format!("Invalid pattern '{pattern}': {e}"))
    })?;

    let mut stubs = Vec::new();
    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let Some(filename) = entry.file_name().to_str().map(str::to_string) else {
            tracing::debug!("Skipping non UTF-8 file name {:?}", entry.file_name());
            continue;
        };

        if regex.is_match(&filename) {
            let path = entry.path();
            let contents = fs::read_to_string(&path)?;
            stubs.push(StubFile {
                filename,
                path,
                contents,
            });
        }
    }

    stubs.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(stubs)
}

/// Model name for a modelfile: suffix stripped, namespace prepended when set
#[must_use]
pub fn instance_name(filename: &str, namespace: &str) -> String {
    let name = filename
        .strip_suffix(MODELFILE_EXTENSION)
        .unwrap_or(filename);

    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}

/// Prepend `namespace/` unless the name already carries a namespace
#[must_use]
pub fn qualify_name(name: &str, namespace: &str) -> String {
    if name.contains('/') || namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}/{name}")
    }
}
