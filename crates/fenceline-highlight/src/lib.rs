//! Syntax highlighting for code fences with line-range highlighting.
//!
//! A fence metastring such as `{3,5-8} no-line-numbers` selects lines to
//! highlight and toggles the line-number gutter. [`Highlighter`] combines
//! those options with a [`Tokenizer`] to produce [`RenderLine`]s, which
//! [`html`] turns into markup.

pub mod html;
pub mod lines;
pub mod options;
pub mod render;
pub mod tokenizer;

pub use html::{block_to_html, escape_html, fence_to_html};
pub use lines::{LineRange, LineRangeSpec, RangeError};
pub use options::{show_line_numbers, BlockOptions};
pub use render::{render_lines, Highlighter, RenderLine, RenderedBlock, RenderedFence};
pub use tokenizer::{
    BlockStyle, Color, PlainTokenizer, StyledToken, SyntectTokenizer, TokenStyle, TokenizedBlock,
    Tokenizer, DEFAULT_THEME,
};

/// Errors from setting up a highlighter.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),
}
