//! Case-insensitive search over the body cells of a render model

use crate::render::RenderModel;
use std::ops::Range;
use tracing::{debug, trace};

/// A body cell containing the search term
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Match {
    /// 0-based position among the body rows
    pub row: usize,
    /// 0-based column
    pub column: usize,
    /// First occurrence of the term in the cell, in the cell's own casing
    pub text: String,
}

/// Ordered matches for one search term plus a navigation cursor
///
/// Matches are ordered by row, then by column; a cell produces at most one
/// match. The cursor is `None` when there is no active match, which is
/// exactly when the index is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchIndex {
    term: String,
    matches: Vec<Match>,
    cursor: Option<usize>,
}

impl SearchIndex {
    /// Index with no matches and no active cursor
    pub fn empty() -> Self {
        SearchIndex::default()
    }

    /// Search every body cell of `model` for `term`
    ///
    /// Matching is done on raw cell text, never on escaped markup. The header
    /// row is not searched. An empty term gives an empty index.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvpreview::render::RenderModel;
    /// use csvpreview::search::SearchIndex;
    /// use csvpreview::types::Grid;
    ///
    /// let grid = Grid::from_rows(vec![
    ///     vec!["a", "b"],
    ///     vec!["foo", "BAR"],
    ///     vec!["baz", "foobar"],
    /// ]);
    /// let model = RenderModel::build(&grid);
    ///
    /// let mut index = SearchIndex::build(&model, "FOO");
    /// assert_eq!(index.len(), 2);
    /// assert_eq!(index.cursor(), Some(0));
    /// assert_eq!(index.next(), Some(1));
    /// assert_eq!(index.next(), Some(0));
    /// ```
    pub fn build(model: &RenderModel, term: &str) -> Self {
        if term.is_empty() {
            return SearchIndex::empty();
        }

        let needle = lowercase_chars(term);
        let mut matches = Vec::new();
        for (row_idx, row) in model.body().iter().enumerate() {
            for (col_idx, cell) in row.cells.iter().enumerate() {
                if let Some(range) = find_match(cell, 0, &needle) {
                    matches.push(Match {
                        row: row_idx,
                        column: col_idx,
                        text: cell[range].to_string(),
                    });
                }
            }
        }

        debug!(term, matches = matches.len(), "Search index rebuilt");

        let cursor = if matches.is_empty() { None } else { Some(0) };
        SearchIndex {
            term: term.to_string(),
            matches,
            cursor,
        }
    }

    /// Term this index was built for (empty for an empty index)
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Position of the active match
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Active match
    pub fn current(&self) -> Option<&Match> {
        self.cursor.and_then(|i| self.matches.get(i))
    }

    /// Advance to the next match, wrapping to the first after the last
    ///
    /// No-op returning `None` on an empty index.
    pub fn next(&mut self) -> Option<usize> {
        self.step(1)
    }

    /// Go back to the previous match, wrapping to the last before the first
    ///
    /// No-op returning `None` on an empty index.
    pub fn previous(&mut self) -> Option<usize> {
        self.step(-1)
    }

    fn step(&mut self, step: isize) -> Option<usize> {
        let total = self.matches.len();
        if total == 0 {
            return None;
        }

        let current = self.cursor.unwrap_or(0) as isize;
        let next = (current + step).rem_euclid(total as isize) as usize;
        self.cursor = Some(next);
        trace!("Selecting search result {}/{}", next + 1, total);
        self.cursor
    }

    /// True when `(row, column)` is the active match
    pub fn is_current(&self, row: usize, column: usize) -> bool {
        self.current()
            .is_some_and(|m| m.row == row && m.column == column)
    }

    /// Status line for the search bar
    pub fn status(&self) -> String {
        match self.cursor {
            Some(i) if !self.matches.is_empty() => {
                format!("{} of {} matches", i + 1, self.matches.len())
            }
            _ => "No matches found".to_string(),
        }
    }
}

/// Build a [`SearchIndex`] for `term` over the body rows of `model`
pub fn search(model: &RenderModel, term: &str) -> SearchIndex {
    SearchIndex::build(model, term)
}

/// Byte ranges of every non-overlapping, case-insensitive occurrence of
/// `term` in `cell`, left to right
///
/// ```
/// use csvpreview::search::highlight_ranges;
///
/// assert_eq!(highlight_ranges("Foo and foo", "FOO"), vec![0..3, 8..11]);
/// ```
pub fn highlight_ranges(cell: &str, term: &str) -> Vec<Range<usize>> {
    let needle = lowercase_chars(term);
    let mut ranges = Vec::new();
    if needle.is_empty() {
        return ranges;
    }

    let mut from = 0;
    while let Some(range) = find_match(cell, from, &needle) {
        from = range.end;
        ranges.push(range);
    }
    ranges
}

fn lowercase_chars(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// First occurrence of `needle` in `haystack` starting at byte `from`
fn find_match(haystack: &str, from: usize, needle: &[char]) -> Option<Range<usize>> {
    haystack[from..].char_indices().find_map(|(offset, _)| {
        let start = from + offset;
        match_len_at(&haystack[start..], needle).map(|len| start..start + len)
    })
}

/// Byte length of the shortest prefix of `text` whose lowercase form starts
/// with `needle`
///
/// A match may end partway through a character that lowercases to several
/// characters (`İ` is `i` plus a combining dot); the whole character is then
/// part of the match.
fn match_len_at(text: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, ch) in text.char_indices() {
        for lower in ch.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
            // Needle used up, possibly mid-expansion
            if matched == needle.len() {
                return Some(offset + ch.len_utf8());
            }
        }
    }
    None
}
