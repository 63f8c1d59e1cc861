//! Local file references in modelfiles
//!
//! A `FROM` or `ADAPTER` line may point at a file on this machine. The daemon
//! cannot read it, so the file is pushed as a blob and the line rewritten to
//! `FROM @sha256:<hex>`. Relative paths resolve against the modelfile's own
//! directory, which is what `FROM ../models/x.gguf` in a generated stub expects.

use crate::error::RemoteError;
use crate::instances::ServingClient;
use std::path::{Path, PathBuf};

/// Upload every locally referenced file and return the rewritten modelfile
///
/// Lines that name a library model (`FROM llama3`) or a missing path are left as is.
pub async fn resolve_local_paths<C: ServingClient + ?Sized>(
    client: &C,
    modelfile: &str,
    base_dir: &Path,
) -> Result<String, RemoteError> {
    let mut resolved = String::with_capacity(modelfile.len());

    for line in modelfile.split_inclusive('\n') {
        match local_reference(line, base_dir) {
            Some((command, path)) => {
                let digest = client.create_blob(&path).await?;
                tracing::debug!("{command} {} -> @{digest}", path.display());
                resolved.push_str(&format!("{command} @{digest}\n"));
            }
            None => resolved.push_str(line),
        }
    }

    Ok(resolved)
}

/// The command and existing local file of a `FROM`/`ADAPTER` line
fn local_reference<'a>(line: &'a str, base_dir: &Path) -> Option<(&'a str, PathBuf)> {
    let (command, args) = line.split_once(' ')?;
    if !command.eq_ignore_ascii_case("FROM") && !command.eq_ignore_ascii_case("ADAPTER") {
        return None;
    }

    let path = expand_home(args.trim());
    let path = if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    };

    path.is_file().then_some((command, path))
}

fn expand_home(arg: &str) -> PathBuf {
    if let Some(rest) = arg.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(arg)
}
