//! MDX document parser.

use std::collections::HashMap;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::codeblock::Fence;
use crate::frontmatter::{extract_frontmatter, Frontmatter, FrontmatterError};

/// Average reading speed used for `time_to_read`.
const WORDS_PER_MINUTE: usize = 265;

/// A parsed MDX document.
#[derive(Debug, Clone)]
pub struct ParsedDoc {
    /// Parsed frontmatter (if present)
    pub frontmatter: Option<Frontmatter>,

    /// Markdown content (without frontmatter)
    pub content: String,

    /// Code fences and preformatted blocks, in document order
    pub fences: Vec<Fence>,

    /// Table of contents entries
    pub toc: Vec<TocEntry>,
}

impl ParsedDoc {
    /// Estimated reading time in whole minutes (at least one).
    pub fn time_to_read(&self) -> usize {
        let words = self.content.split_whitespace().count();
        ((words + WORDS_PER_MINUTE / 2) / WORDS_PER_MINUTE).max(1)
    }

    /// Title from frontmatter, if any.
    pub fn title(&self) -> Option<&str> {
        self.frontmatter.as_ref().map(|f| f.title.as_str())
    }
}

/// A table of contents entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocEntry {
    /// Heading text
    pub title: String,
    /// Anchor ID, unique within the document
    pub id: String,
    /// Heading level (1-6)
    pub level: u8,
}

/// Errors that can occur when parsing MDX.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Frontmatter error: {0}")]
    Frontmatter(#[from] FrontmatterError),
}

/// Markdown extensions enabled for blog content.
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
}

/// Parse an MDX document.
///
/// Extracts frontmatter, classifies code fences, and generates a table of contents.
pub fn parse_mdx(source: &str) -> Result<ParsedDoc, ParseError> {
    let (frontmatter, content) = extract_frontmatter(source)?;

    // Content is always a suffix of source
    let content_offset = source.len() - content.len();
    let line_at = |offset: usize| source[..content_offset + offset].matches('\n').count() + 1;

    let mut fences = Vec::new();
    let mut toc = Vec::new();
    let mut slugs = SlugCounter::default();

    let mut current_fence: Option<(CodeBlockKind<'_>, String, usize)> = None;
    let mut current_heading: Option<(u8, String)> = None;

    for (event, range) in Parser::new_ext(content, markdown_options()).into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(kind)) => {
                current_fence = Some((kind, String::new(), line_at(range.start)));
            }

            Event::End(TagEnd::CodeBlock) => {
                if let Some((kind, text, line)) = current_fence.take() {
                    fences.push(Fence::from_kind(&kind, text, line));
                }
            }

            Event::Start(Tag::Heading { level, .. }) => {
                current_heading = Some((level as u8, String::new()));
            }

            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, title)) = current_heading.take() {
                    let id = slugs.unique(&title);
                    toc.push(TocEntry { title, id, level });
                }
            }

            Event::Text(text) | Event::Code(text) => {
                if let Some((_, ref mut buf, _)) = current_fence {
                    buf.push_str(&text);
                } else if let Some((_, ref mut heading_text)) = current_heading {
                    heading_text.push_str(&text);
                }
            }

            _ => {}
        }
    }

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
        fences,
        toc,
    })
}

/// Hands out unique slugs: repeats get a `-1`, `-2`, ... suffix.
#[derive(Debug, Default)]
pub struct SlugCounter {
    seen: HashMap<String, usize>,
}

impl SlugCounter {
    /// Slugify `text`, disambiguating against earlier calls.
    pub fn unique(&mut self, text: &str) -> String {
        let base = slugify(text);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

/// Convert a heading to a URL-safe slug.
pub fn slugify(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c.is_whitespace() || c == '-' || c == '_' {
                Some('-')
            } else {
                None
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
