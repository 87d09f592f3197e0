//! Line-range selection from fence metadata.
//!
//! A metastring such as `{3,5-8}` selects lines 3 and 5 through 8. The
//! brace group may appear anywhere in the metastring; only digits, commas and
//! hyphens are allowed inside it.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static RANGE_GROUP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([\d,-]+)\}").expect("Invalid range group regex"));

/// A closed interval of 1-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub end: usize,
}

impl LineRange {
    /// A range covering a single line.
    pub fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn contains(&self, line: usize) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Set of highlighted line ranges parsed from a metastring.
///
/// Ranges keep their written order and may overlap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineRangeSpec {
    ranges: Vec<LineRange>,
}

/// Errors for a brace group that matched but does not describe valid lines.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    #[error("Empty entry in line range group {group:?}")]
    EmptyEntry { group: String },

    #[error("Invalid line number {value:?} in line range group {group:?}")]
    InvalidNumber { value: String, group: String },

    #[error("Line numbers start at 1, got 0 in line range group {group:?}")]
    ZeroLine { group: String },

    #[error("Too many '-' separators in {entry:?}")]
    TooManyBounds { entry: String },

    #[error("Range {start}-{end} ends before it starts")]
    Reversed { start: usize, end: usize },
}

impl LineRangeSpec {
    /// Build a spec from already validated ranges.
    pub fn new(ranges: Vec<LineRange>) -> Self {
        Self { ranges }
    }

    /// Parse the first `{...}` group found in `meta`.
    ///
    /// A metastring without a group yields an empty spec.
    pub fn parse(meta: &str) -> Result<Self, RangeError> {
        let Some(caps) = RANGE_GROUP_RE.captures(meta) else {
            return Ok(Self::default());
        };
        let group = &caps[1];

        let ranges = group
            .split(',')
            .map(|entry| parse_entry(entry, group))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { ranges })
    }

    /// Lenient parse: a malformed group highlights nothing.
    pub fn from_metastring(meta: Option<&str>) -> Self {
        let Some(meta) = meta else {
            return Self::default();
        };
        match Self::parse(meta) {
            Ok(spec) => spec,
            Err(e) => {
                tracing::warn!("Ignoring line highlights in {:?}: {}", meta, e);
                Self::default()
            }
        }
    }

    /// Whether the 1-based `line` falls inside any range.
    pub fn contains(&self, line: usize) -> bool {
        self.ranges.iter().any(|range| range.contains(line))
    }

    pub fn ranges(&self) -> &[LineRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}

fn parse_entry(entry: &str, group: &str) -> Result<LineRange, RangeError> {
    let bounds: Vec<&str> = entry.split('-').collect();
    match bounds.as_slice() {
        [line] => parse_line(line, group).map(LineRange::single),
        [start, end] => {
            let start = parse_line(start, group)?;
            let end = parse_line(end, group)?;
            if start > end {
                return Err(RangeError::Reversed { start, end });
            }
            Ok(LineRange { start, end })
        }
        _ => Err(RangeError::TooManyBounds {
            entry: entry.to_string(),
        }),
    }
}

fn parse_line(value: &str, group: &str) -> Result<usize, RangeError> {
    if value.is_empty() {
        return Err(RangeError::EmptyEntry {
            group: group.to_string(),
        });
    }
    match value.parse::<usize>() {
        Ok(0) => Err(RangeError::ZeroLine {
            group: group.to_string(),
        }),
        Ok(line) => Ok(line),
        Err(_) => Err(RangeError::InvalidNumber {
            value: value.to_string(),
            group: group.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn highlighted(meta: &str, upto: usize) -> Vec<usize> {
        let spec = LineRangeSpec::parse(meta).unwrap();
        (1..=upto).filter(|&line| spec.contains(line)).collect()
    }

    #[test]
    fn no_group_highlights_nothing() {
        for meta in ["", "no-line-numbers", "title=\"app.js\"", "{}", "{a,b}", "[1,2]"] {
            let spec = LineRangeSpec::parse(meta).unwrap();
            assert!(spec.is_empty(), "{meta:?}");
            assert!((1..=50).all(|line| !spec.contains(line)), "{meta:?}");
        }
    }

    #[test]
    fn singles_and_ranges() {
        assert_eq!(highlighted("{3,5-8}", 10), vec![3, 5, 6, 7, 8]);
        assert_eq!(highlighted("{1}", 10), vec![1]);
    }

    #[test]
    fn group_found_anywhere_in_meta() {
        assert_eq!(highlighted("title=\"a.js\" {2} no-line-numbers", 5), vec![2]);
    }

    #[test]
    fn unordered_and_overlapping_ranges() {
        assert_eq!(highlighted("{7,2-4,3-5}", 8), vec![2, 3, 4, 5, 7]);
    }

    #[test]
    fn keeps_written_order() {
        let spec = LineRangeSpec::parse("{9,1-2}").unwrap();
        assert_eq!(
            spec.ranges(),
            &[LineRange::single(9), LineRange { start: 1, end: 2 }]
        );
    }

    #[test]
    fn first_group_wins() {
        assert_eq!(highlighted("{1} {4}", 5), vec![1]);
    }

    #[test]
    fn rejects_malformed_groups() {
        assert!(matches!(
            LineRangeSpec::parse("{1,,3}"),
            Err(RangeError::EmptyEntry { .. })
        ));
        assert!(matches!(
            LineRangeSpec::parse("{3-}"),
            Err(RangeError::EmptyEntry { .. })
        ));
        assert!(matches!(
            LineRangeSpec::parse("{1-2-3}"),
            Err(RangeError::TooManyBounds { .. })
        ));
        assert!(matches!(
            LineRangeSpec::parse("{0}"),
            Err(RangeError::ZeroLine { .. })
        ));
        assert_eq!(
            LineRangeSpec::parse("{8-5}"),
            Err(RangeError::Reversed { start: 8, end: 5 })
        );
        assert!(matches!(
            LineRangeSpec::parse("{99999999999999999999999}"),
            Err(RangeError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn lenient_parse_falls_back_to_no_highlight() {
        let spec = LineRangeSpec::from_metastring(Some("{8-5}"));
        assert!(spec.is_empty());

        let spec = LineRangeSpec::from_metastring(None);
        assert!(spec.is_empty());

        let spec = LineRangeSpec::from_metastring(Some("{2}"));
        assert!(spec.contains(2));
    }
}
