//! Type definitions for parsed CSV data

use crate::error::{PreviewError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Raw text of a document handed to the preview
///
/// The crate never owns the source of the text; callers either pass a string
/// they already have (editor buffer) or read one from disk with [`RawDocument::open`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    text: String,
    path: Option<PathBuf>,
}

impl RawDocument {
    /// Wrap text that is already in memory
    pub fn new(text: impl Into<String>) -> Self {
        RawDocument {
            text: text.into(),
            path: None,
        }
    }

    /// Read a document from disk
    ///
    /// The file must be valid UTF-8. A leading byte order mark is stripped.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use csvpreview::types::RawDocument;
    ///
    /// let doc = RawDocument::open("data.csv").unwrap();
    /// println!("{} bytes", doc.byte_len());
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let bytes = fs::read(path_ref).map_err(|e| {
            PreviewError::Read(format!("Failed to open {}: {}", path_ref.display(), e))
        })?;
        let mut text = String::from_utf8(bytes).map_err(|e| {
            PreviewError::Read(format!("{} is not valid UTF-8: {}", path_ref.display(), e))
        })?;

        if text.starts_with('\u{feff}') {
            text.replace_range(..'\u{feff}'.len_utf8(), "");
        }

        Ok(RawDocument {
            text,
            path: Some(path_ref.to_path_buf()),
        })
    }

    /// Document text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Path the document was read from, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Length in bytes
    pub fn byte_len(&self) -> usize {
        self.text.len()
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// One parsed CSV record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Row {
    /// Cells in this row, in source order
    pub cells: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(cells: Vec<String>) -> Self {
        Row { cells }
    }

    /// Get cell at column index
    pub fn get(&self, col: usize) -> Option<&str> {
        self.cells.get(col).map(String::as_str)
    }

    /// Get number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert row to vector of strings
    pub fn to_strings(&self) -> Vec<String> {
        self.cells.clone()
    }
}

impl From<Vec<String>> for Row {
    fn from(cells: Vec<String>) -> Self {
        Row { cells }
    }
}

impl From<Vec<&str>> for Row {
    fn from(cells: Vec<&str>) -> Self {
        Row {
            cells: cells.into_iter().map(str::to_string).collect(),
        }
    }
}

/// Parsed CSV content: rows of string cells in source order
///
/// Rows are not required to share a width. The first row is the header by
/// position only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    /// Create a grid from parsed rows
    pub fn new(rows: Vec<Row>) -> Self {
        Grid { rows }
    }

    /// Build a grid from anything that yields rows of string-like cells
    ///
    /// ```
    /// use csvpreview::types::Grid;
    ///
    /// let grid = Grid::from_rows(vec![vec!["id", "name"], vec!["1", "Alice"]]);
    /// assert_eq!(grid.len(), 2);
    /// ```
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Grid {
            rows: rows
                .into_iter()
                .map(|r| Row::new(r.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    /// All rows, header included
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// First row, if any
    pub fn header(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Number of rows, header included
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the header row (0 for an empty grid)
    pub fn width(&self) -> usize {
        self.header().map_or(0, Row::len)
    }

    /// True when every row has the header's width
    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.rows.iter().all(|r| r.len() == width)
    }

    /// Rows as plain string vectors
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.rows.iter().map(Row::to_strings).collect()
    }

    /// Take ownership of the rows
    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }
}
