// ABOUTME: Local document storage with deterministic discovery and atomic writes
// ABOUTME: Finds markdown files under a directory and reads/writes post documents

use crate::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map_or(false, |ext| MARKDOWN_EXTENSIONS.contains(&ext))
}

/// Every markdown file under `root`, depth first, sorted by name at each level.
///
/// A `root` that is itself a markdown file yields just that file.
pub fn discover_markdown(root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    if fs::metadata(root)?.is_file() {
        if is_markdown(root) {
            found.push(root.to_path_buf());
        }
        return Ok(found);
    }

    walk(root, &mut found)?;
    Ok(found)
}

fn walk(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            walk(&path, found)?;
        } else if is_markdown(&path) {
            found.push(path);
        }
    }
    Ok(())
}

pub fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::Filesystem(std::io::Error::new(
            e.kind(),
            format!("'{}': {}", path.display(), e),
        ))
    })
}

pub fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    use rand::Rng;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // Temp file beside the target so the rename stays on one filesystem
    let random: u32 = rand::thread_rng().gen();
    let tmp_path = dir.join(format!(".{:x}.part", random));

    fs::write(&tmp_path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(&tmp_path, perms)?;
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}
