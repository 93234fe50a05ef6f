//! CSV utilities for sniffing, parsing and encoding

mod encoder;
mod parser;
mod sniffer;

pub use encoder::CsvEncoder;
pub use parser::CsvParser;
pub use sniffer::{is_csv_document, looks_like_csv, CsvSniffer};

use crate::error::Result;
use crate::types::Grid;

/// Parse CSV text with the default comma / double-quote dialect
pub fn parse(text: &str) -> Result<Grid> {
    CsvParser::default().parse(text)
}
