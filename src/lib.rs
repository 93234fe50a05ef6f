//! # csvpreview
//!
//! Turn CSV text into a searchable table preview.
//!
//! The pipeline is: sniff ([`csv::looks_like_csv`]) → parse ([`csv::parse`])
//! → [`RenderModel::build`] → [`search::search`] → [`HtmlRenderer`].
//! [`PreviewSession`] ties the steps together for an editor panel that shows a
//! single preview at a time.
//!
//! ## Quick Start
//!
//! ```
//! use csvpreview::{csv, RenderModel, SearchIndex};
//!
//! let grid = csv::parse("id,name\n1,Alice\n2,\"Bob, Jr.\"\n").unwrap();
//! let model = RenderModel::build(&grid);
//! assert_eq!(model.header(), ["id", "name"]);
//!
//! let mut index = SearchIndex::build(&model, "bob");
//! assert_eq!(index.current().map(|m| (m.row, m.column)), Some((1, 1)));
//! assert_eq!(index.next(), Some(0));
//! ```
//!
//! ## Features
//!
//! - `serde`: `Serialize`/`Deserialize` for the data model, search index,
//!   panel state and panel messages.

pub mod csv;
pub mod error;
pub mod html;
pub mod preview;
pub mod render;
pub mod search;
pub mod types;

pub use error::{ParseErrorReason, PreviewError, Result};
pub use html::{escape_html, HtmlRenderer};
pub use preview::{DocumentInfo, HostAction, PanelMessage, PreviewPanel, PreviewSession, PreviewState};
pub use render::{BodyRow, RenderModel};
pub use search::{search, Match, SearchIndex};
pub use types::{Grid, RawDocument, Row};
