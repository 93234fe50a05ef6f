//! Render-ready table structure built from a parsed grid

use crate::types::Grid;
use tracing::debug;

/// A data row with its 1-based display number
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BodyRow {
    /// Display number shown in the row-number column (first data row is 1)
    pub index: usize,
    /// Cells, padded with empty strings up to the header width
    pub cells: Vec<String>,
}

impl BodyRow {
    pub fn get(&self, col: usize) -> Option<&str> {
        self.cells.get(col).map(String::as_str)
    }
}

/// Header plus numbered body rows, ready for display
///
/// Body rows shorter than the header are padded so every header column has a
/// cell. Longer rows are kept as they are and render with extra columns.
///
/// # Examples
///
/// ```
/// use csvpreview::csv;
/// use csvpreview::render::RenderModel;
///
/// let grid = csv::parse("id,name\n1,Alice\n2,\"Bob, Jr.\"\n").unwrap();
/// let model = RenderModel::build(&grid);
///
/// assert_eq!(model.header(), ["id", "name"]);
/// assert_eq!(model.body()[1].index, 2);
/// assert_eq!(model.body()[1].cells, ["2", "Bob, Jr."]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RenderModel {
    header: Vec<String>,
    body: Vec<BodyRow>,
}

impl RenderModel {
    /// Split a grid into header and numbered, padded body rows
    ///
    /// An empty grid yields an empty model so callers can show a "no data" state.
    pub fn build(grid: &Grid) -> Self {
        let Some((header, rest)) = grid.rows().split_first() else {
            return RenderModel::default();
        };

        let width = header.len();
        let body: Vec<BodyRow> = rest
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut cells = row.cells.clone();
                if cells.len() < width {
                    cells.resize(width, String::new());
                }
                BodyRow { index: i + 1, cells }
            })
            .collect();

        debug!(
            columns = width,
            rows = body.len(),
            "Built render model"
        );

        RenderModel {
            header: header.cells.clone(),
            body,
        }
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn body(&self) -> &[BodyRow] {
        &self.body
    }

    /// Body row by its 0-based position
    pub fn row(&self, row: usize) -> Option<&BodyRow> {
        self.body.get(row)
    }

    /// Header width
    pub fn width(&self) -> usize {
        self.header.len()
    }

    /// Widest row in the model, header included
    ///
    /// Larger than [`width`](Self::width) only when some body row carries
    /// extra cells beyond the header.
    pub fn max_width(&self) -> usize {
        self.body
            .iter()
            .map(|r| r.cells.len())
            .max()
            .unwrap_or(0)
            .max(self.header.len())
    }

    /// True when there is neither a header nor any body row
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.body.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_indices() {
        let grid = Grid::from_rows(vec![
            vec!["id", "name"],
            vec!["1", "Alice"],
            vec!["2", "Bob, Jr."],
        ]);
        let model = RenderModel::build(&grid);

        assert_eq!(model.header(), ["id", "name"]);
        assert_eq!(model.body().len(), 2);
        assert_eq!(model.body()[0].index, 1);
        assert_eq!(model.body()[0].cells, ["1", "Alice"]);
        assert_eq!(model.body()[1].index, 2);
        assert_eq!(model.body()[1].cells, ["2", "Bob, Jr."]);
    }

    #[test]
    fn test_short_row_padded() {
        let grid = Grid::from_rows(vec![vec!["a", "b", "c", "d"], vec!["1", "2"]]);
        let model = RenderModel::build(&grid);
        assert_eq!(model.body()[0].cells, ["1", "2", "", ""]);
    }

    #[test]
    fn test_long_row_not_truncated() {
        let grid = Grid::from_rows(vec![vec!["a", "b"], vec!["1", "2", "3"]]);
        let model = RenderModel::build(&grid);
        assert_eq!(model.width(), 2);
        assert_eq!(model.max_width(), 3);
        assert_eq!(model.body()[0].get(2), Some("3"));
    }

    #[test]
    fn test_empty_grid() {
        let model = RenderModel::build(&Grid::default());
        assert!(model.is_empty());
        assert_eq!(model.width(), 0);
        assert!(model.row(0).is_none());
    }

    #[test]
    fn test_header_only() {
        let model = RenderModel::build(&Grid::from_rows(vec![vec!["a", "b"]]));
        assert!(!model.is_empty());
        assert!(model.body().is_empty());
    }
}
