//! CSV encoding with RFC 4180-like behavior

use crate::types::Grid;

/// CSV encoder turning a [`Grid`] back into CSV text
///
/// Used for exporting a previewed table (copy as CSV) and as the reference
/// serializer the parser is checked against.
pub struct CsvEncoder {
    delimiter: char,
    quote_char: char,
    line_ending: &'static str,
}

impl Default for CsvEncoder {
    fn default() -> Self {
        Self::new(b',', b'"')
    }
}

impl CsvEncoder {
    /// Create a new CSV encoder with custom delimiter and quote character
    pub fn new(delimiter: u8, quote_char: u8) -> Self {
        Self {
            delimiter: delimiter as char,
            quote_char: quote_char as char,
            line_ending: "\n",
        }
    }

    /// Use `\r\n` between records instead of `\n` (builder pattern)
    pub fn crlf(mut self, enabled: bool) -> Self {
        self.line_ending = if enabled { "\r\n" } else { "\n" };
        self
    }

    /// Encode a whole grid, one record per line, with a trailing line ending
    pub fn encode_grid(&self, grid: &Grid) -> String {
        let mut out = String::new();
        for row in grid.rows() {
            self.encode_row(row.cells.as_slice(), &mut out);
            out.push_str(self.line_ending);
        }
        out
    }

    /// Encode a single row into `out` without a line ending
    pub fn encode_row<S: AsRef<str>>(&self, fields: &[S], out: &mut String) {
        // A lone empty field would read back as an empty line and be skipped
        if let [only] = fields {
            if only.as_ref().is_empty() {
                out.push(self.quote_char);
                out.push(self.quote_char);
                return;
            }
        }

        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                out.push(self.delimiter);
            }
            self.encode_field(field.as_ref(), out);
        }
    }

    fn encode_field(&self, field: &str, out: &mut String) {
        if self.needs_quoting(field) {
            out.push(self.quote_char);
            for ch in field.chars() {
                if ch == self.quote_char {
                    out.push(self.quote_char);
                }
                out.push(ch);
            }
            out.push(self.quote_char);
        } else {
            out.push_str(field);
        }
    }

    /// Check if field requires quoting
    fn needs_quoting(&self, field: &str) -> bool {
        field.starts_with(self.quote_char)
            || field
                .chars()
                .any(|c| c == self.delimiter || c == self.quote_char || c == '\n' || c == '\r')
    }
}
