//! Stylesheet for highlighted code blocks.

/// Asset pipeline utilities.
pub struct AssetPipeline;

impl AssetPipeline {
    /// Generate the code block stylesheet.
    pub fn generate_css() -> String {
        CODE_CSS.to_string()
    }

    /// Minify CSS using lightningcss.
    pub fn minify_css(css: &str) -> Result<String, String> {
        use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};

        let stylesheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| format!("CSS parse error: {}", e))?;

        let minified = stylesheet
            .to_css(PrinterOptions {
                minify: true,
                ..Default::default()
            })
            .map_err(|e| format!("CSS minify error: {}", e))?;

        Ok(minified.code)
    }
}

const CODE_CSS: &str = r#"/* Highlighted code blocks */

:root {
  --code-font: SFMono-Regular, Menlo, Monaco, Consolas, "Liberation Mono", "Courier New", monospace;
  --highlight-line-bg: rgba(201, 167, 255, 0.2);
  --highlight-line-border: #c9a7ff;
}

.code-block {
  overflow: auto;
  max-width: 100vw;
}

.code-block pre {
  float: left;
  min-width: 100%;
  overflow: initial;
  padding: 16px;
  border-radius: 4px;
  font-family: var(--code-font);
}

.token-line {
  min-height: 1em;
}

.highlight-line {
  background-color: var(--highlight-line-bg);
  margin: 0 -10px;
  padding: 0 5px;
  border-left: 5px solid var(--highlight-line-border);
}

.line-number {
  display: inline-block;
  width: 2em;
  user-select: none;
  opacity: 0.3;
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_css() {
        let css = AssetPipeline::generate_css();
        assert!(css.contains(".highlight-line"));
        assert!(css.contains(".line-number"));
        assert!(css.contains("user-select: none"));
    }

    #[test]
    fn minifies_generated_css() {
        let minified = AssetPipeline::minify_css(&AssetPipeline::generate_css()).unwrap();

        assert!(!minified.contains('\n'));
        assert!(minified.contains(".highlight-line"));
    }
}
