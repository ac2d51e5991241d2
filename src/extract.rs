//! Post metadata extraction.
//!
//! `PostRecord` is the **primary metadata structure** for published posts:
//! one record per document, constructed once during the scan pass and
//! never mutated afterwards. Everything downstream (the listing module,
//! the RSS feed) works from these records.
//!
//! # Resolution order
//!
//! | Field | Explicit source | Structural fallback |
//! |-------|-----------------|---------------------|
//! | `title` | front matter `title` | first run of the first depth-1 heading |
//! | `description` | front matter `description` | first run of the first paragraph |
//! | `date` | front matter `date` | the scan's wall-clock time |
//!
//! Title and description have no silent fallback past the structure: a
//! document providing neither is a fatal extraction error naming the path
//! and the missing field. A front-matter date that fails to parse is fatal
//! too, rather than a silently-invalid timestamp that would drop the post
//! from the feed.

use crate::{
    compiler::{Block, BlockKind, Document},
    config::SiteConfig,
    utils::date::DateTimeUtc,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    sync::LazyLock,
};
use thiserror::Error;

/// Errors raised while deriving a post record from a compiled document.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("`{0}`: no title in front matter and no top-level `#` heading")]
    MissingTitle(PathBuf),

    #[error("`{0}`: no description in front matter and no leading paragraph")]
    MissingDescription(PathBuf),

    #[error("`{0}`: front matter date is not a valid datetime: `{1}`")]
    InvalidDate(PathBuf, String),

    #[error("`{0}`: path is not valid UTF-8")]
    PathEncoding(PathBuf),
}

/// Normalized metadata for one published document.
///
/// Serializes with the camelCase field names the listing module's
/// JavaScript consumers expect; `date` renders as an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    /// Root-relative source path, as scanned
    pub file_path: String,
    /// Derived path of the published page
    pub url_path: String,
    pub title: String,
    pub date: DateTimeUtc,
    pub description: String,
}

/// Derive a [`PostRecord`] from a compiled document.
///
/// `now` is the scan's wall-clock timestamp, used when no explicit date is
/// declared. No side effects beyond the returned record.
pub fn extract(
    path: &Path,
    document: &Document,
    config: &SiteConfig,
    now: DateTimeUtc,
) -> Result<PostRecord, MetadataError> {
    let rel = path.strip_prefix(config.get_root()).unwrap_or(path);
    let file_path = rel
        .to_str()
        .ok_or_else(|| MetadataError::PathEncoding(path.to_path_buf()))?
        .to_owned();

    let meta = document.meta.as_ref();

    let title = meta
        .and_then(|m| m.title.clone())
        .or_else(|| first_block_text(document, |b| b.kind == BlockKind::Heading && b.depth == 1))
        .ok_or_else(|| MetadataError::MissingTitle(path.to_path_buf()))?;

    let description = meta
        .and_then(|m| m.description.clone())
        .or_else(|| first_block_text(document, |b| b.kind == BlockKind::Paragraph))
        .ok_or_else(|| MetadataError::MissingDescription(path.to_path_buf()))?;

    let date = match meta.and_then(|m| m.date.as_deref()) {
        Some(raw) => DateTimeUtc::parse(raw)
            .ok_or_else(|| MetadataError::InvalidDate(path.to_path_buf(), raw.to_owned()))?,
        None => now,
    };

    let url_path = url_path_from(&file_path, &config.build.pages.to_string_lossy());

    Ok(PostRecord {
        file_path,
        url_path,
        title,
        date,
        description,
    })
}

/// First text run of the first block matching `pred`.
fn first_block_text(document: &Document, pred: impl Fn(&Block) -> bool) -> Option<String> {
    document
        .blocks
        .iter()
        .find(|block| pred(block))
        .and_then(Block::first_text)
        .map(str::to_owned)
}

/// Derive the published URL path from a root-relative source path.
///
/// Pure string transform: rewrite the **first** backslash only (a single,
/// non-global replacement), strip the leading published-pages prefix, and
/// strip a trailing `.md`/`.mdx` extension.
pub fn url_path_from(path: &str, pages_prefix: &str) -> String {
    static RE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.mdx?$").unwrap());

    let slashed = path.replacen('\\', "/", 1);
    let stripped = slashed.strip_prefix(pages_prefix).unwrap_or(&slashed);
    RE_EXTENSION.replace(stripped, "").into_owned()
}
