//! Physical line classification and effective line counting.

use std::fmt;

/// Marker that starts a single-line comment.
const COMMENT_MARKER: char = '#';

/// Kind of a physical source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    Comment,
    Docstring,
    Code,
}

impl LineKind {
    /// Convert to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineKind::Blank => "blank",
            LineKind::Comment => "comment",
            LineKind::Docstring => "docstring",
            LineKind::Code => "code",
        }
    }

    /// Check if this line counts toward the effective line total.
    pub fn is_effective(&self) -> bool {
        matches!(self, LineKind::Code)
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inclusive range of 0-indexed line indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineSpan {
    /// First line index (0-indexed).
    pub first: usize,
    /// Last line index (0-indexed, inclusive).
    pub last: usize,
}

impl LineSpan {
    pub fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.first <= index && index <= self.last
    }
}

/// Set of docstring line spans found in one file.
///
/// Spans come from distinct statements so they never overlap. They are kept
/// sorted, so membership is a binary search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocstringRanges {
    spans: Vec<LineSpan>,
}

impl DocstringRanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, span: LineSpan) {
        if let Err(pos) = self.spans.binary_search(&span) {
            self.spans.insert(pos, span);
        }
    }

    /// Check whether a 0-indexed line lies inside any docstring.
    pub fn contains(&self, index: usize) -> bool {
        // Spans are sorted and disjoint: only the last span starting at or
        // before `index` can hold it.
        let pos = self.spans.partition_point(|s| s.first <= index);
        pos > 0 && self.spans[pos - 1].contains(index)
    }

    /// Spans in ascending order.
    pub fn spans(&self) -> &[LineSpan] {
        &self.spans
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

impl FromIterator<LineSpan> for DocstringRanges {
    fn from_iter<I: IntoIterator<Item = LineSpan>>(iter: I) -> Self {
        let mut ranges = Self::new();
        for span in iter {
            ranges.insert(span);
        }
        ranges
    }
}

/// Classify a single line given its index.
pub fn classify_line(index: usize, line: &str, docstrings: &DocstringRanges) -> LineKind {
    if docstrings.contains(index) {
        return LineKind::Docstring;
    }

    let stripped = line.trim();
    if stripped.is_empty() {
        LineKind::Blank
    } else if stripped.starts_with(COMMENT_MARKER) {
        LineKind::Comment
    } else {
        LineKind::Code
    }
}

/// Classify every physical line.
pub fn classify<S: AsRef<str>>(lines: &[S], docstrings: &DocstringRanges) -> Vec<LineKind> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| classify_line(i, line.as_ref(), docstrings))
        .collect()
}

/// Count code lines in the half-open range `[start, end)`.
///
/// `end` is clamped to the number of lines, so an oversized range is safe.
pub fn count_effective<S: AsRef<str>>(
    lines: &[S],
    docstrings: &DocstringRanges,
    start: usize,
    end: usize,
) -> usize {
    let end = end.min(lines.len());
    if start >= end {
        return 0;
    }

    lines[start..end]
        .iter()
        .enumerate()
        .filter(|(offset, line)| {
            classify_line(start + offset, line.as_ref(), docstrings).is_effective()
        })
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_basic_kinds() {
        let lines = ["x = 1", "", "   \t", "# note", "    # indented", "y = 2  # trailing"];
        let kinds = classify(&lines, &DocstringRanges::new());
        assert_eq!(
            kinds,
            vec![
                LineKind::Code,
                LineKind::Blank,
                LineKind::Blank,
                LineKind::Comment,
                LineKind::Comment,
                LineKind::Code,
            ]
        );
    }

    #[test]
    fn test_docstring_takes_priority() {
        let lines = ["\"\"\"", "x = 1", "# not a comment here", "", "\"\"\"", "y = 2"];
        let ranges: DocstringRanges = [LineSpan::new(0, 4)].into_iter().collect();
        let kinds = classify(&lines, &ranges);

        assert!(kinds[..5].iter().all(|k| *k == LineKind::Docstring));
        assert_eq!(kinds[5], LineKind::Code);
    }

    #[test]
    fn test_count_effective_ranges() {
        let lines = ["a = 1", "", "# c", "b = 2", "c = 3"];
        let ranges = DocstringRanges::new();

        assert_eq!(count_effective(&lines, &ranges, 0, lines.len()), 3);
        assert_eq!(count_effective(&lines, &ranges, 1, 4), 1);
        assert_eq!(count_effective(&lines, &ranges, 0, 100), 3);
        assert_eq!(count_effective(&lines, &ranges, 4, 2), 0);
        assert_eq!(count_effective(&lines, &ranges, 10, 20), 0);
    }

    #[test]
    fn test_effective_never_exceeds_total() {
        let samples: [&[&str]; 3] = [
            &["x = 1", "y = 2"],
            &["", "# only comments", ""],
            &["def f():", "    '''doc'''", "    return 1", ""],
        ];
        for lines in samples {
            let total = lines.len();
            let effective = count_effective(lines, &DocstringRanges::new(), 0, total);
            assert!(effective <= total);
        }

        let all_code = ["a", "b", "c"];
        assert_eq!(count_effective(&all_code, &DocstringRanges::new(), 0, 3), 3);
    }

    #[test]
    fn test_docstring_ranges_dedup() {
        let mut ranges = DocstringRanges::new();
        ranges.insert(LineSpan::new(4, 6));
        ranges.insert(LineSpan::new(0, 0));
        ranges.insert(LineSpan::new(4, 6));

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges.spans()[0], LineSpan::new(0, 0));
        assert!(ranges.contains(5));
        assert!(!ranges.contains(3));
    }

    #[test]
    fn test_docstring_ranges_lookup_many_spans() {
        // Three-line spans every ten lines: 0..=2, 10..=12, ...
        let ranges: DocstringRanges = (0..1000)
            .map(|i| LineSpan::new(i * 10, i * 10 + 2))
            .collect();

        assert_eq!(ranges.len(), 1000);
        for line in 0..10_010 {
            let expected = line < 10_000 && line % 10 <= 2;
            assert_eq!(ranges.contains(line), expected, "line {}", line);
        }
        assert!(!DocstringRanges::new().contains(0));
    }
}
