//! Structural block tree extraction.
//!
//! Parses a Markdown body with `pulldown-cmark` and keeps just enough
//! structure for metadata fallback: the sequence of **top-level** blocks,
//! each with a kind, a heading depth, and its plain-text runs. Blocks
//! nested inside containers (lists, blockquotes, tables, footnote
//! definitions) are not top-level and never contribute.
//!
//! Text runs behave like the child list of a markdown AST node:
//! consecutive text joins into one run (soft breaks included), while
//! inline markup boundaries start a new run. `# Hello *world*` has the
//! runs `["Hello ", "world"]`, so a first-run lookup sees `"Hello "`.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// Kind of a top-level content block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Paragraph,
    Code,
    /// Containers (lists, blockquotes, tables, ...) and raw HTML; present
    /// in the tree to keep block order honest, text not collected
    Other,
}

/// A top-level content block.
#[derive(Debug, Clone)]
pub struct Block {
    pub kind: BlockKind,
    /// Heading level (1-6); 0 for everything else
    pub depth: u8,
    /// Plain-text runs in order
    pub spans: Vec<String>,
}

impl Block {
    fn new(kind: BlockKind, depth: u8) -> Self {
        Self {
            kind,
            depth,
            spans: Vec::new(),
        }
    }

    /// Text of the block's first run.
    pub fn first_text(&self) -> Option<&str> {
        self.spans.first().map(String::as_str)
    }
}

/// Parse a Markdown body into its top-level blocks.
pub fn parse(source: &str) -> Vec<Block> {
    let options =
        Options::ENABLE_TABLES | Options::ENABLE_FOOTNOTES | Options::ENABLE_STRIKETHROUGH;

    let mut blocks: Vec<Block> = Vec::new();
    // Leaf block currently collecting text (only at container depth 0)
    let mut open: Option<Block> = None;
    // Nesting level of container blocks; anything inside is not top-level
    let mut container = 0usize;
    // Whether the next text event continues the last run
    let mut joined = false;

    for event in Parser::new_ext(source, options) {
        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { level, .. } if container == 0 => {
                    open = Some(Block::new(BlockKind::Heading, level as u8));
                    joined = false;
                }
                Tag::Paragraph if container == 0 => {
                    open = Some(Block::new(BlockKind::Paragraph, 0));
                    joined = false;
                }
                Tag::CodeBlock(_) if container == 0 => {
                    open = Some(Block::new(BlockKind::Code, 0));
                    joined = false;
                }
                Tag::BlockQuote(_)
                | Tag::List(_)
                | Tag::Item
                | Tag::Table(_)
                | Tag::TableHead
                | Tag::TableRow
                | Tag::TableCell
                | Tag::FootnoteDefinition(_)
                | Tag::HtmlBlock => {
                    if container == 0 {
                        blocks.push(Block::new(BlockKind::Other, 0));
                    }
                    container += 1;
                }
                // Inline markup: its text still flows, but as a new run
                _ => joined = false,
            },
            Event::End(tag) => match tag {
                TagEnd::Heading(_) | TagEnd::Paragraph | TagEnd::CodeBlock if container == 0 => {
                    if let Some(block) = open.take() {
                        blocks.push(block);
                    }
                }
                TagEnd::BlockQuote(_)
                | TagEnd::List(_)
                | TagEnd::Item
                | TagEnd::Table
                | TagEnd::TableHead
                | TagEnd::TableRow
                | TagEnd::TableCell
                | TagEnd::FootnoteDefinition
                | TagEnd::HtmlBlock => {
                    container = container.saturating_sub(1);
                }
                _ => joined = false,
            },
            Event::Text(text) => {
                if container == 0
                    && let Some(block) = open.as_mut()
                {
                    if joined && let Some(last) = block.spans.last_mut() {
                        last.push_str(&text);
                    } else {
                        block.spans.push(text.into_string());
                        joined = true;
                    }
                }
            }
            Event::Code(code) => {
                // Inline code is always its own run
                if container == 0
                    && let Some(block) = open.as_mut()
                {
                    block.spans.push(code.into_string());
                    joined = false;
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if container == 0
                    && joined
                    && let Some(last) = open.as_mut().and_then(|b| b.spans.last_mut())
                {
                    last.push('\n');
                }
            }
            _ => {}
        }
    }

    blocks
}
