//! Document compilation.
//!
//! Turns a document's raw source text into everything the metadata
//! extractor needs:
//!
//! - **frontmatter**: explicit metadata from a leading `+++` TOML fence
//! - **blocks**: the document's top-level content blocks (headings,
//!   paragraphs, ...), used as a fallback metadata source
//!
//! `compile` is a pure function of its input: no module cache, no
//! process-wide state, no I/O. Compiling the same source twice yields the
//! same document.

pub mod blocks;
pub mod frontmatter;

pub use blocks::{Block, BlockKind};
pub use frontmatter::FrontMatter;

use thiserror::Error;

/// Errors raised while compiling a document source.
///
/// The offending path is attached by the caller; compilation itself only
/// sees the source text.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("front matter fence `+++` is never closed")]
    UnterminatedFrontMatter,

    #[error("front matter is not valid TOML")]
    FrontMatter(#[from] toml::de::Error),
}

/// A compiled document: optional explicit metadata plus the structural
/// tree of top-level content blocks.
#[derive(Debug, Clone)]
pub struct Document {
    pub meta: Option<FrontMatter>,
    pub blocks: Vec<Block>,
}

/// Compile raw source text into a [`Document`].
pub fn compile(source: &str) -> Result<Document, CompileError> {
    let (meta, body) = frontmatter::split(source)?;
    let blocks = blocks::parse(body);
    Ok(Document { meta, blocks })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_with_front_matter() {
        let source = "+++\ntitle = \"Hello\"\ndate = \"2024-01-01\"\n+++\n\nBody text.\n";
        let doc = compile(source).unwrap();

        let meta = doc.meta.unwrap();
        assert_eq!(meta.title.as_deref(), Some("Hello"));
        assert_eq!(meta.date.as_deref(), Some("2024-01-01"));
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].kind, BlockKind::Paragraph);
    }

    #[test]
    fn test_compile_without_front_matter() {
        let doc = compile("# Title\n\nFirst paragraph.\n").unwrap();
        assert!(doc.meta.is_none());
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_compile_is_pure() {
        let source = "+++\ntitle = \"Same\"\n+++\n# Same\n";
        let first = compile(source).unwrap();
        let second = compile(source).unwrap();
        assert_eq!(first.meta.unwrap().title, second.meta.unwrap().title);
        assert_eq!(first.blocks.len(), second.blocks.len());
    }

    #[test]
    fn test_compile_rejects_unterminated_fence() {
        let err = compile("+++\ntitle = \"Hello\"\n").unwrap_err();
        assert!(matches!(err, CompileError::UnterminatedFrontMatter));
    }

    #[test]
    fn test_compile_rejects_bad_toml() {
        let err = compile("+++\ntitle = not quoted\n+++\n").unwrap_err();
        assert!(matches!(err, CompileError::FrontMatter(_)));
    }
}
