// ABOUTME: Edit a remote post in the user's editor
// ABOUTME: Fetches the post, writes it to a temp document, pushes back any change

use crate::{
    api::PostsApi,
    convert::{from_markdown, to_markdown, DecodeMode},
    storage::{read_document, write_atomic},
    util::slugify,
    Error, Result,
};
use rand::Rng;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// `$VISUAL`, falling back to `$EDITOR`.
pub fn editor_from_env() -> Result<String> {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .ok_or_else(|| Error::Editor("$EDITOR environment variable not set".into()))
}

/// Opens `slug` in `editor` and updates it remotely when the document changed.
///
/// Returns `true` if an update was sent.
pub fn edit_post(api: &impl PostsApi, slug: &str, editor: &str) -> Result<bool> {
    let original = api.get_post(slug)?;

    let path = temp_document_path(slug);
    write_atomic(&path, to_markdown(&original)?.as_bytes())?;

    let edited = run_editor(editor, &path).and_then(|_| read_document(&path));
    if let Err(e) = fs::remove_file(&path) {
        debug!(path = %path.display(), "could not remove temp file: {}", e);
    }

    let mut post = from_markdown(&edited?, DecodeMode::Lenient)?;
    post.url = original.url.clone();

    if post == original {
        return Ok(false);
    }

    api.update_post(slug, &post)?;
    Ok(true)
}

fn temp_document_path(slug: &str) -> PathBuf {
    let random: u32 = rand::thread_rng().gen();
    env::temp_dir().join(format!("mata-{}-{:x}.md", slugify(slug), random))
}

fn run_editor(editor: &str, path: &Path) -> Result<()> {
    // Editors are often configured with arguments, e.g. "code --wait"
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Editor("empty editor command".into()))?;

    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| Error::Editor(format!("error while spawning '{}': {}", editor, e)))?;

    if !status.success() {
        return Err(Error::Editor(format!("'{}' exited with {}", editor, status)));
    }
    Ok(())
}
