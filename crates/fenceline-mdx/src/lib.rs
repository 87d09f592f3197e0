//! MDX parser with frontmatter extraction and code fence classification.
//!
//! This crate parses blog posts written in MDX/markdown, extracts YAML frontmatter,
//! and classifies every literal block as either a fenced code block or plain
//! preformatted text before it reaches the highlighter.

pub mod codeblock;
pub mod frontmatter;
pub mod parser;

pub use codeblock::{language_from_class, CodeBlock, Fence, Preformatted};
pub use frontmatter::{Frontmatter, FrontmatterError};
pub use parser::{markdown_options, parse_mdx, slugify, ParseError, ParsedDoc, SlugCounter, TocEntry};
