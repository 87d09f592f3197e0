//! Tokenizers that split source into lines of styled tokens.
//!
//! The renderer only needs the [`Tokenizer`] trait. [`SyntectTokenizer`] is the
//! default implementation; [`PlainTokenizer`] produces unstyled output and is
//! also the fallback for languages syntect does not know.

use serde::Serialize;
use syntect::easy::HighlightLines;
use syntect::highlighting::{Color as SynColor, FontStyle, Style as SynStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::HighlightError;

/// Theme used when none is configured.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Fence tags syntect's bundled syntaxes do not know, mapped to ones it does.
const LANGUAGE_ALIASES: &[(&str, &str)] = &[
    ("jsx", "js"),
    ("mjs", "js"),
    ("cjs", "js"),
    ("ts", "js"),
    ("tsx", "js"),
    ("typescript", "js"),
    ("shell", "sh"),
    ("console", "sh"),
    ("zsh", "sh"),
    ("yml", "yaml"),
];

/// An RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// CSS hex notation, e.g. `#c0c5ce`.
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<SynColor> for Color {
    fn from(c: SynColor) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
        }
    }
}

/// Presentation attributes of a token. Opaque to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenStyle {
    pub color: Option<Color>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl TokenStyle {
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }
}

impl From<SynStyle> for TokenStyle {
    fn from(style: SynStyle) -> Self {
        Self {
            color: Some(style.foreground.into()),
            bold: style.font_style.contains(FontStyle::BOLD),
            italic: style.font_style.contains(FontStyle::ITALIC),
            underline: style.font_style.contains(FontStyle::UNDERLINE),
        }
    }
}

/// A run of source text with its style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledToken {
    pub text: String,
    pub style: TokenStyle,
}

impl StyledToken {
    pub fn new(text: impl Into<String>, style: TokenStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// An unstyled token.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, TokenStyle::default())
    }
}

/// Block-level colours from the theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlockStyle {
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

/// Tokenizer output: lines of tokens plus the block style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizedBlock {
    pub lines: Vec<Vec<StyledToken>>,
    pub style: BlockStyle,
}

/// Splits source text into lines of styled tokens.
pub trait Tokenizer: Send + Sync {
    /// Tokenizer identifier (e.g., "plain", "syntect")
    fn name(&self) -> &'static str;

    /// Tokenize `source` as `language`.
    ///
    /// Must return exactly one entry per line of `source` (as split by
    /// [`str::lines`]), in order. Unknown languages yield unstyled tokens.
    fn tokenize(&self, source: &str, language: &str) -> TokenizedBlock;
}

/// Unstyled tokenizer: one plain token per non-empty line.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTokenizer;

impl Tokenizer for PlainTokenizer {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn tokenize(&self, source: &str, _language: &str) -> TokenizedBlock {
        TokenizedBlock {
            lines: plain_lines(source),
            style: BlockStyle::default(),
        }
    }
}

fn plain_lines(source: &str) -> Vec<Vec<StyledToken>> {
    source
        .lines()
        .map(|line| {
            if line.is_empty() {
                Vec::new()
            } else {
                vec![StyledToken::plain(line)]
            }
        })
        .collect()
}

/// Tokenizer backed by syntect's bundled syntaxes and themes.
pub struct SyntectTokenizer {
    syntaxes: SyntaxSet,
    theme: Theme,
}

impl SyntectTokenizer {
    /// Load the bundled syntaxes with the named bundled theme.
    pub fn with_theme(name: &str) -> Result<Self, HighlightError> {
        let mut themes = ThemeSet::load_defaults();
        let theme = themes
            .themes
            .remove(name)
            .ok_or_else(|| HighlightError::UnknownTheme(name.to_string()))?;

        Ok(Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Names of the bundled themes.
    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeSet::load_defaults().themes.into_keys().collect();
        names.sort();
        names
    }

    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }
        let lower = language.to_lowercase();
        let token = LANGUAGE_ALIASES
            .iter()
            .find(|(alias, _)| *alias == lower)
            .map_or(lower.as_str(), |(_, target)| *target);

        self.syntaxes.find_syntax_by_token(token)
    }

    fn block_style(&self) -> BlockStyle {
        BlockStyle {
            foreground: self.theme.settings.foreground.map(Color::from),
            background: self.theme.settings.background.map(Color::from),
        }
    }

    fn highlight(
        &self,
        source: &str,
        syntax: &SyntaxReference,
    ) -> Result<Vec<Vec<StyledToken>>, syntect::Error> {
        let mut highlighter = HighlightLines::new(syntax, &self.theme);
        let mut lines = Vec::new();

        for line in LinesWithEndings::from(source) {
            let ranges = highlighter.highlight_line(line, &self.syntaxes)?;
            let tokens = ranges
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches(['\n', '\r']);
                    (!text.is_empty()).then(|| StyledToken::new(text, style.into()))
                })
                .collect();
            lines.push(tokens);
        }

        Ok(lines)
    }
}

impl Default for SyntectTokenizer {
    fn default() -> Self {
        Self::with_theme(DEFAULT_THEME).expect("Bundled default theme is missing")
    }
}

impl Tokenizer for SyntectTokenizer {
    fn name(&self) -> &'static str {
        "syntect"
    }

    fn tokenize(&self, source: &str, language: &str) -> TokenizedBlock {
        let style = self.block_style();

        let Some(syntax) = self.find_syntax(language) else {
            tracing::debug!("No syntax for language {:?}, rendering unstyled", language);
            return TokenizedBlock {
                lines: plain_lines(source),
                style,
            };
        };

        match self.highlight(source, syntax) {
            Ok(lines) => TokenizedBlock { lines, style },
            Err(e) => {
                tracing::warn!("Highlighting {} failed, rendering unstyled: {}", syntax.name, e);
                TokenizedBlock {
                    lines: plain_lines(source),
                    style,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line_text(line: &[StyledToken]) -> String {
        line.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn plain_tokenizer_one_entry_per_line() {
        let block = PlainTokenizer.tokenize("a\n\nc", "js");
        assert_eq!(
            block.lines,
            vec![
                vec![StyledToken::plain("a")],
                vec![],
                vec![StyledToken::plain("c")],
            ]
        );
        assert_eq!(block.style, BlockStyle::default());
    }

    #[test]
    fn plain_tokenizer_empty_source() {
        assert!(PlainTokenizer.tokenize("", "js").lines.is_empty());
    }

    #[test]
    fn syntect_preserves_line_text() {
        let tokenizer = SyntectTokenizer::default();
        let source = "const a = 1\n\nfunction f() {\n  return a\n}";

        let block = tokenizer.tokenize(source, "js");

        let texts: Vec<String> = block.lines.iter().map(|l| line_text(l)).collect();
        let expected: Vec<String> = source.lines().map(str::to_string).collect();
        assert_eq!(texts, expected);
        assert!(block.style.background.is_some());
    }

    #[test]
    fn syntect_styles_known_language() {
        let tokenizer = SyntectTokenizer::default();
        let block = tokenizer.tokenize("fn main() {}", "rust");

        assert!(block.lines[0].len() > 1);
        assert!(block.lines[0].iter().all(|t| t.style.color.is_some()));
    }

    #[test]
    fn syntect_resolves_aliases() {
        let tokenizer = SyntectTokenizer::default();
        assert!(tokenizer.find_syntax("jsx").is_some());
        assert!(tokenizer.find_syntax("TSX").is_some());
        assert!(tokenizer.find_syntax("").is_none());
    }

    #[test]
    fn syntect_unknown_language_is_unstyled() {
        let tokenizer = SyntectTokenizer::default();
        let block = tokenizer.tokenize("x\ny", "no-such-language");

        assert_eq!(
            block.lines,
            vec![vec![StyledToken::plain("x")], vec![StyledToken::plain("y")]]
        );
    }

    #[test]
    fn unknown_theme_is_an_error() {
        assert!(matches!(
            SyntectTokenizer::with_theme("night-owl-but-not-bundled"),
            Err(HighlightError::UnknownTheme(_))
        ));
        assert!(SyntectTokenizer::available_themes().contains(&DEFAULT_THEME.to_string()));
    }

    #[test]
    fn color_to_css() {
        assert_eq!(Color { r: 201, g: 167, b: 255 }.to_css(), "#c9a7ff");
    }
}
