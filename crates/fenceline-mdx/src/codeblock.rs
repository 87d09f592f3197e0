//! Code fence classification and parsing.

use pulldown_cmark::CodeBlockKind;

/// Class prefix the MDX pipeline puts on fenced `<code>` elements.
const LANGUAGE_CLASS_PREFIX: &str = "language-";

/// A fenced code block ready for highlighting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Source code content
    pub source: String,

    /// Language tag (empty when the fence has none)
    pub language: String,

    /// Free-text annotation after the language tag, e.g. `{2,4-6} no-line-numbers`
    pub metastring: Option<String>,

    /// Line number where the fence opens (1-indexed)
    pub line_number: usize,
}

impl CodeBlock {
    /// Create a new code block.
    pub fn new(
        source: impl Into<String>,
        language: impl Into<String>,
        metastring: Option<String>,
        line_number: usize,
    ) -> Self {
        Self {
            source: normalize_source(&source.into()),
            language: language.into(),
            metastring,
            line_number,
        }
    }

    /// Build a block from a markdown fence info string such as `js {2} no-line-numbers`.
    pub fn from_info(info: &str, source: impl Into<String>, line_number: usize) -> Self {
        let (language, metastring) = split_info(info);
        Self::new(source, language, metastring, line_number)
    }

    /// Build a block from MDX-style element attributes (`className="language-js"`).
    pub fn from_class_name(
        class_name: &str,
        source: impl Into<String>,
        metastring: Option<String>,
    ) -> Self {
        Self::new(source, language_from_class(class_name), metastring, 1)
    }
}

/// A preformatted block that is not a fenced code block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preformatted {
    /// Raw text content
    pub text: String,

    /// Line number where the block starts (1-indexed)
    pub line_number: usize,
}

/// A block of literal text found in content, classified by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fence {
    /// Fenced code block: tokenized and highlighted
    Code(CodeBlock),
    /// Anything else: rendered verbatim
    Preformatted(Preformatted),
}

impl Fence {
    /// Classify a pulldown-cmark code block and its collected text.
    ///
    /// Indented blocks carry no annotation and fall back to preformatted text.
    pub fn from_kind(kind: &CodeBlockKind<'_>, text: String, line_number: usize) -> Self {
        match kind {
            CodeBlockKind::Fenced(info) => Self::Code(CodeBlock::from_info(info, text, line_number)),
            CodeBlockKind::Indented => Self::Preformatted(Preformatted { text, line_number }),
        }
    }

    /// Line number where the block starts (1-indexed).
    pub fn line_number(&self) -> usize {
        match self {
            Self::Code(block) => block.line_number,
            Self::Preformatted(pre) => pre.line_number,
        }
    }

    /// The code block, if this is a fenced one.
    pub fn as_code(&self) -> Option<&CodeBlock> {
        match self {
            Self::Code(block) => Some(block),
            Self::Preformatted(_) => None,
        }
    }
}

/// Extract the language from a `language-xxx` class name.
///
/// Returns an empty string when the prefix is absent.
pub fn language_from_class(class_name: &str) -> &str {
    class_name
        .split_whitespace()
        .find_map(|class| class.strip_prefix(LANGUAGE_CLASS_PREFIX))
        .unwrap_or("")
}

/// Split a fence info string into language tag and metastring.
pub fn split_info(info: &str) -> (&str, Option<String>) {
    let info = info.trim();
    match info.split_once(char::is_whitespace) {
        Some((language, rest)) => {
            let rest = rest.trim();
            let meta = (!rest.is_empty()).then(|| rest.to_string());
            (language, meta)
        }
        None => (info, None),
    }
}

// Drops leading blank lines and trailing whitespace. Indentation of the first
// kept line is content and stays. Line numbers and `{n}` ranges count from that
// first kept line as line 1.
fn normalize_source(source: &str) -> String {
    let trimmed_end = source.trim_end();
    let start: usize = trimmed_end
        .split_inclusive('\n')
        .take_while(|line| line.trim().is_empty())
        .map(str::len)
        .sum();
    trimmed_end[start..].to_string()
}
