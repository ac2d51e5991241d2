//! Front matter parsing.
//!
//! A document may declare its metadata explicitly in a TOML fence at the
//! very top of the file:
//!
//! ```text
//! +++
//! title = "Hello"
//! description = "A first post"
//! date = "2024-01-01"
//! +++
//! ```
//!
//! Every field is optional; whatever is absent falls back to structural
//! extraction from the document body.

use super::CompileError;
use serde::Deserialize;

/// The front matter fence marker, alone on its line.
const FENCE: &str = "+++";

/// Explicit document metadata.
///
/// `date` stays a raw string here; it is parsed (and rejected) at
/// extraction time, where the offending file path is known.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
}

/// Split a source text into its optional front matter and the body.
///
/// A document participates in front matter iff its first line is exactly
/// the fence. An opened fence that is never closed is a compile error
/// rather than silently treating the rest of the file as metadata.
pub fn split(source: &str) -> Result<(Option<FrontMatter>, &str), CompileError> {
    let mut lines = source.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok((None, source));
    };
    if first.trim_end() != FENCE {
        return Ok((None, source));
    }

    let fence_start = first.len();
    let mut offset = fence_start;
    for line in lines {
        if line.trim_end() == FENCE {
            let meta: FrontMatter = toml::from_str(&source[fence_start..offset])?;
            let body = &source[offset + line.len()..];
            return Ok((Some(meta), body));
        }
        offset += line.len();
    }

    Err(CompileError::UnterminatedFrontMatter)
}
