//! Assembly of tokenized lines into renderable lines.

use serde::Serialize;

use fenceline_mdx::{CodeBlock, Fence};

use crate::html::fence_to_html;
use crate::options::BlockOptions;
use crate::tokenizer::{BlockStyle, PlainTokenizer, StyledToken, SyntectTokenizer, Tokenizer};
use crate::HighlightError;

/// One output line of a highlighted block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLine {
    /// 1-based line number
    pub index: usize,
    pub is_highlighted: bool,
    pub show_line_number: bool,
    pub tokens: Vec<StyledToken>,
}

/// A code block after highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedBlock {
    pub language: String,
    pub style: BlockStyle,
    pub lines: Vec<RenderLine>,
}

/// Output for any fence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderedFence {
    Highlighted(RenderedBlock),
    Preformatted { text: String },
}

/// Zip tokenized lines with the block options.
///
/// The result has one entry per input line, in input order.
pub fn render_lines(lines: Vec<Vec<StyledToken>>, options: &BlockOptions) -> Vec<RenderLine> {
    lines
        .into_iter()
        .enumerate()
        .map(|(i, tokens)| {
            let index = i + 1;
            RenderLine {
                index,
                is_highlighted: options.highlight.contains(index),
                show_line_number: options.show_line_numbers,
                tokens,
            }
        })
        .collect()
}

/// Renders code fences with a tokenizer.
pub struct Highlighter {
    tokenizer: Box<dyn Tokenizer>,
}

impl Highlighter {
    pub fn new<T: Tokenizer + 'static>(tokenizer: T) -> Self {
        Self {
            tokenizer: Box::new(tokenizer),
        }
    }

    /// Syntect highlighter with the named theme.
    pub fn syntect(theme: &str) -> Result<Self, HighlightError> {
        Ok(Self::new(SyntectTokenizer::with_theme(theme)?))
    }

    /// Highlighter that emits unstyled tokens.
    pub fn plain() -> Self {
        Self::new(PlainTokenizer)
    }

    pub fn tokenizer_name(&self) -> &'static str {
        self.tokenizer.name()
    }

    /// Highlight a fenced code block.
    pub fn highlight(&self, block: &CodeBlock) -> RenderedBlock {
        let options = BlockOptions::from_metastring(block.metastring.as_deref());
        let tokenized = self.tokenizer.tokenize(&block.source, &block.language);

        tracing::debug!(
            "Highlighted {} lines of {:?} (fence at line {})",
            tokenized.lines.len(),
            block.language,
            block.line_number
        );

        RenderedBlock {
            language: block.language.clone(),
            style: tokenized.style,
            lines: render_lines(tokenized.lines, &options),
        }
    }

    /// Render any fence; preformatted blocks skip tokenization entirely.
    pub fn render_fence(&self, fence: &Fence) -> RenderedFence {
        match fence {
            Fence::Code(block) => RenderedFence::Highlighted(self.highlight(block)),
            Fence::Preformatted(pre) => RenderedFence::Preformatted {
                text: pre.text.clone(),
            },
        }
    }

    /// Render a fence straight to HTML.
    pub fn fence_html(&self, fence: &Fence) -> String {
        fence_to_html(&self.render_fence(fence))
    }
}
