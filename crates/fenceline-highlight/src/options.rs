//! Per-block rendering options read from the fence metastring.

use serde::Serialize;

use crate::lines::LineRangeSpec;

/// Marker that hides the line-number gutter for a block.
pub const NO_LINE_NUMBERS: &str = "no-line-numbers";

/// Rendering options for one code block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockOptions {
    /// Lines to highlight
    pub highlight: LineRangeSpec,

    /// Whether the line-number gutter is shown
    pub show_line_numbers: bool,
}

impl Default for BlockOptions {
    fn default() -> Self {
        Self {
            highlight: LineRangeSpec::default(),
            show_line_numbers: true,
        }
    }
}

impl BlockOptions {
    /// Parse both flags independently from an optional metastring.
    pub fn from_metastring(meta: Option<&str>) -> Self {
        Self {
            highlight: LineRangeSpec::from_metastring(meta),
            show_line_numbers: show_line_numbers(meta),
        }
    }
}

/// Line numbers are shown unless the metastring contains the marker.
pub fn show_line_numbers(meta: Option<&str>) -> bool {
    !meta.is_some_and(|m| m.contains(NO_LINE_NUMBERS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_numbers_shown_by_default() {
        assert!(show_line_numbers(None));
        assert!(show_line_numbers(Some("")));
        assert!(show_line_numbers(Some("{1-3}")));
    }

    #[test]
    fn marker_anywhere_hides_line_numbers() {
        assert!(!show_line_numbers(Some("no-line-numbers")));
        assert!(!show_line_numbers(Some("{2} no-line-numbers")));
        assert!(!show_line_numbers(Some("title=x no-line-numbers {4}")));
    }

    #[test]
    fn flags_are_independent() {
        let opts = BlockOptions::from_metastring(Some("{2} no-line-numbers"));
        assert!(!opts.show_line_numbers);
        assert!(opts.highlight.contains(2));
        assert!(!opts.highlight.contains(1));
    }

    #[test]
    fn malformed_range_keeps_line_number_flag() {
        let opts = BlockOptions::from_metastring(Some("{5-1} no-line-numbers"));
        assert!(opts.highlight.is_empty());
        assert!(!opts.show_line_numbers);
    }
}
