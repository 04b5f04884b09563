// ABOUTME: Single-post command handlers behind the `posts` subcommand
// ABOUTME: Each handler takes the API client and an output writer

use crate::{
    api::PostsApi,
    convert::{from_markdown, to_markdown, DecodeMode},
    storage::{read_document, write_atomic},
    util::{file_name_for, scaffold_post},
    Error, Post, PostReceipt, Result,
};
use std::io::Write;
use std::path::{Path, PathBuf};

pub fn list_posts(api: &impl PostsApi, json: bool, out: &mut impl Write) -> Result<()> {
    let posts = api.list_posts()?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&posts)?)?;
        return Ok(());
    }

    for post in &posts {
        writeln!(out, "{}", format_post_line(post))?;
        writeln!(out, "{}", post.url)?;
        writeln!(out)?;
    }
    Ok(())
}

fn format_post_line(post: &Post) -> String {
    let date = if post.is_draft() {
        "draft"
    } else {
        post.published_at.as_str()
    };
    format!("{}\t{}\t{}", date, post.slug, post.title)
}

pub fn get_post(
    api: &impl PostsApi,
    slug: &str,
    json: bool,
    output: Option<&Path>,
    out: &mut impl Write,
) -> Result<()> {
    let post = api.get_post(slug)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&post)?)?;
        return Ok(());
    }

    let document = to_markdown(&post)?;
    match output {
        Some(path) => {
            write_atomic(path, document.as_bytes())?;
            writeln!(out, "post '{}' written to '{}'", slug, path.display())?;
        }
        None => write!(out, "{}", document)?,
    }
    Ok(())
}

/// Slug is optional here: the server assigns one from the title.
pub fn create_post(api: &impl PostsApi, file: &Path, out: &mut impl Write) -> Result<PostReceipt> {
    let post = read_post(file, DecodeMode::Lenient)?;
    let receipt = api.create_post(&post)?;
    writeln!(out, "'{}' created successfully: {}", receipt.slug, receipt.url)?;
    Ok(receipt)
}

pub fn update_post(
    api: &impl PostsApi,
    slug: &str,
    file: &Path,
    out: &mut impl Write,
) -> Result<PostReceipt> {
    let post = read_post(file, DecodeMode::Lenient)?;
    let receipt = api.update_post(slug, &post)?;
    writeln!(out, "post '{}' updated successfully", slug)?;
    Ok(receipt)
}

pub fn delete_post(api: &impl PostsApi, slug: &str, out: &mut impl Write) -> Result<()> {
    api.delete_post(slug)?;
    writeln!(out, "post '{}' deleted successfully", slug)?;
    Ok(())
}

/// Writes a draft document for `title` into `dir`. Never overwrites.
pub fn new_post(title: &str, dir: &Path, out: &mut impl Write) -> Result<PathBuf> {
    let post = scaffold_post(title);
    if post.title.is_empty() {
        return Err(Error::MissingField("title"));
    }

    let path = dir.join(file_name_for(&post));
    if path.exists() {
        return Err(Error::Filesystem(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("'{}' already exists", path.display()),
        )));
    }

    write_atomic(&path, to_markdown(&post)?.as_bytes())?;
    writeln!(out, "'{}' created", path.display())?;
    Ok(path)
}

fn read_post(file: &Path, mode: DecodeMode) -> Result<Post> {
    from_markdown(&read_document(file)?, mode)
}
