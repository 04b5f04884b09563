// ABOUTME: Converts markdown documents with YAML frontmatter to posts and back
// ABOUTME: Validates title, slug and publication date while decoding

use crate::{Error, Post, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DELIMITER: &str = "---";

/// Whether a document must carry a slug to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeMode {
    /// Slug required: sync and anything else that matches on identity.
    Strict,
    /// Slug optional: create lets the server pick one.
    Lenient,
}

/// Every key is read as the literal scalar text, so `slug: 0x1F` stays `0x1F`.
#[derive(Debug, Default, Deserialize)]
struct FrontmatterIn {
    title: Option<String>,
    slug: Option<String>,
    published_at: Option<String>,
    date: Option<String>,
}

#[derive(Serialize)]
struct FrontmatterOut<'a> {
    title: &'a str,
    slug: &'a str,
    published_at: &'a str,
}

/// Decodes a document into a [`Post`].
///
/// The body is everything after the closing `---` line, byte for byte.
/// `published_at` (or its alias `date`) must be a `YYYY-MM-DD` date when set.
pub fn from_markdown(content: &str, mode: DecodeMode) -> Result<Post> {
    let (yaml, body) = split_frontmatter(content)?;

    let frontmatter: FrontmatterIn = if yaml.trim().is_empty() {
        FrontmatterIn::default()
    } else {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::Frontmatter(format!("invalid frontmatter: {}", e)))?
    };

    let title = frontmatter
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or(Error::MissingField("title"))?;

    let slug = frontmatter.slug.unwrap_or_default();
    if slug.is_empty() && mode == DecodeMode::Strict {
        return Err(Error::MissingField("slug"));
    }

    let published_at = match frontmatter.published_at.or(frontmatter.date) {
        None => String::new(),
        Some(date) if date.is_empty() => String::new(),
        Some(date) => normalize_date(&date)?,
    };

    Ok(Post {
        title,
        slug,
        body: body.to_string(),
        published_at,
        url: String::new(),
    })
}

/// Encodes a post as a document: `title`, `slug`, `published_at`, then the raw body.
///
/// Values are quoted by `serde_yaml` only when a plain scalar would read back
/// as something else, so [`from_markdown`] returns the same post.
pub fn to_markdown(post: &Post) -> Result<String> {
    let frontmatter = FrontmatterOut {
        title: &post.title,
        slug: &post.slug,
        published_at: &post.published_at,
    };

    let yaml = serde_yaml::to_string(&frontmatter)
        .map_err(|e| Error::Frontmatter(format!("Failed to serialize frontmatter: {}", e)))?;

    Ok(format!("{}\n{}{}\n{}", DELIMITER, yaml, DELIMITER, post.body))
}

/// Accepts only the zero-padded `dddd-dd-dd` layout before asking chrono
/// whether the day exists.
fn normalize_date(raw: &str) -> Result<String> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return Err(Error::InvalidDate(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(|d| d.format(DATE_FORMAT).to_string())
        .map_err(|_| Error::InvalidDate(raw.to_string()))
}

fn split_frontmatter(content: &str) -> Result<(&str, &str)> {
    let content = content.trim_start_matches(['\n', '\r', ' ', '\t']);

    let rest = match content.split_once('\n') {
        Some((first, rest)) if first.trim_end() == DELIMITER => rest,
        _ => return Err(Error::Frontmatter("document must start with '---'".into())),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\n', '\r']) == DELIMITER {
            let yaml = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((yaml, body));
        }
        offset += line.len();
    }

    Err(Error::Frontmatter("missing closing '---'".into()))
}
