//! HTML output for rendered fences.
//!
//! Produces:
//! ```html
//! <div class="code-block"><pre class="language-js" style="...">
//!   <div class="token-line highlight-line"><span class="line-number">1</span><span style="...">...</span></div>
//! </pre></div>
//! ```
//! Preformatted blocks become a bare `<pre>`.

use crate::render::{RenderLine, RenderedBlock, RenderedFence};
use crate::tokenizer::{BlockStyle, TokenStyle};

/// Class added to highlighted lines.
pub const HIGHLIGHT_LINE_CLASS: &str = "highlight-line";

/// Render a fence to HTML.
pub fn fence_to_html(fence: &RenderedFence) -> String {
    match fence {
        RenderedFence::Highlighted(block) => block_to_html(block),
        RenderedFence::Preformatted { text } => format!("<pre>{}</pre>", escape_html(text)),
    }
}

/// Render a highlighted block to HTML.
pub fn block_to_html(block: &RenderedBlock) -> String {
    let mut out = String::from(r#"<div class="code-block"><pre"#);

    if block.language.is_empty() {
        out.push_str(r#" class="language-none""#);
    } else {
        out.push_str(&format!(
            r#" class="language-{}""#,
            escape_html(&block.language)
        ));
    }

    let pre_style = block_css(&block.style);
    if !pre_style.is_empty() {
        out.push_str(&format!(r#" style="{}""#, pre_style));
    }
    out.push('>');

    for line in &block.lines {
        push_line(line, &mut out);
    }

    out.push_str("</pre></div>");
    out
}

fn push_line(line: &RenderLine, out: &mut String) {
    if line.is_highlighted {
        out.push_str(r#"<div class="token-line highlight-line">"#);
    } else {
        out.push_str(r#"<div class="token-line">"#);
    }

    if line.show_line_number {
        out.push_str(&format!(r#"<span class="line-number">{}</span>"#, line.index));
    }

    for token in &line.tokens {
        let text = escape_html(&token.text);
        if token.style.is_plain() {
            out.push_str(&format!("<span>{}</span>", text));
        } else {
            out.push_str(&format!(
                r#"<span style="{}">{}</span>"#,
                token_css(&token.style),
                text
            ));
        }
    }

    // Keeps empty lines at full height
    if line.tokens.is_empty() {
        out.push('\n');
    }

    out.push_str("</div>");
}

fn block_css(style: &BlockStyle) -> String {
    let mut decls = Vec::new();
    if let Some(fg) = style.foreground {
        decls.push(format!("color:{}", fg.to_css()));
    }
    if let Some(bg) = style.background {
        decls.push(format!("background-color:{}", bg.to_css()));
    }
    decls.join(";")
}

fn token_css(style: &TokenStyle) -> String {
    let mut decls = Vec::new();
    if let Some(color) = style.color {
        decls.push(format!("color:{}", color.to_css()));
    }
    if style.bold {
        decls.push("font-weight:bold".to_string());
    }
    if style.italic {
        decls.push("font-style:italic".to_string());
    }
    if style.underline {
        decls.push("text-decoration:underline".to_string());
    }
    decls.join(";")
}

/// Escape text for use in HTML content and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
