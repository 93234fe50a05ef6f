//! CSV parsing with RFC 4180-like behavior

use crate::error::{ParseErrorReason, PreviewError, Result};
use crate::types::{Grid, Row};
use tracing::debug;

/// CSV parser for reading CSV text into a [`Grid`]
///
/// Handles quoted fields, doubled quotes as an escaped quote, newlines inside
/// quoted fields and `\r\n` line endings. Fully empty physical lines between
/// records are skipped. Rows are returned at whatever width they have.
pub struct CsvParser {
    delimiter: u8,
    quote_char: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',', b'"')
    }
}

impl CsvParser {
    /// Create a new CSV parser with custom delimiter and quote character
    pub fn new(delimiter: u8, quote_char: u8) -> Self {
        Self {
            delimiter,
            quote_char,
        }
    }

    /// Parse a whole document into rows
    ///
    /// A quote only opens a quoted field when it is the first character of the
    /// field; anywhere else it is kept as a literal character. Input that ends
    /// inside a quoted field is rejected with
    /// [`ParseErrorReason::UnterminatedQuote`] rather than closed implicitly.
    ///
    /// # Examples
    ///
    /// ```
    /// use csvpreview::csv::CsvParser;
    ///
    /// let grid = CsvParser::default().parse("a,\"b,c\",d\n").unwrap();
    /// assert_eq!(grid.to_strings(), vec![vec!["a", "b,c", "d"]]);
    /// ```
    pub fn parse(&self, text: &str) -> Result<Grid> {
        let quote = self.quote_char as char;
        let delimiter = self.delimiter as char;

        let mut rows: Vec<Row> = Vec::new();
        let mut record: Vec<String> = Vec::new();
        let mut field = String::new();

        let mut in_quotes = false;
        // No character of the current field consumed yet
        let mut at_field_start = true;
        // Something (even a lone delimiter) seen since the last record ended
        let mut record_started = false;

        let mut line = 1usize;
        let mut record_line = 1usize;
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if in_quotes {
                if ch == quote {
                    // Check for escaped quote
                    if chars.peek() == Some(&quote) {
                        field.push(quote);
                        chars.next(); // Skip second quote
                    } else {
                        // End of quoted field
                        in_quotes = false;
                    }
                } else {
                    // Newlines inside quotes are cell content
                    if ch == '\n' {
                        line += 1;
                    }
                    field.push(ch);
                }
                continue;
            }

            let is_line_end = ch == '\n' || (ch == '\r' && chars.peek() == Some(&'\n'));
            if is_line_end {
                if ch == '\r' {
                    chars.next(); // Skip '\n' of CRLF
                }
                line += 1;

                // Empty lines produce no record
                if record_started {
                    record.push(std::mem::take(&mut field));
                    rows.push(Row::new(std::mem::take(&mut record)));
                }
                record_started = false;
                at_field_start = true;
                record_line = line;
                continue;
            }

            record_started = true;
            if ch == quote && at_field_start {
                // Start of quoted field
                in_quotes = true;
                at_field_start = false;
            } else if ch == delimiter {
                record.push(std::mem::take(&mut field));
                at_field_start = true;
            } else {
                // Plain character; a stray quote mid-field is data
                field.push(ch);
                at_field_start = false;
            }
        }

        if in_quotes {
            return Err(PreviewError::Parse {
                reason: ParseErrorReason::UnterminatedQuote,
                line: record_line,
            });
        }

        // Final record without a trailing newline
        if record_started {
            record.push(field);
            rows.push(Row::new(record));
        }

        debug!(
            rows = rows.len(),
            bytes = text.len(),
            "Parsed CSV document"
        );
        Ok(Grid::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<Vec<String>> {
        CsvParser::default().parse(text).unwrap().to_strings()
    }

    #[test]
    fn test_simple() {
        assert_eq!(parse("a,b,c"), vec![vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(parse("a,\"b,c\",d\n"), vec![vec!["a", "b,c", "d"]]);
    }

    #[test]
    fn test_escaped_quotes() {
        assert_eq!(parse(r#""he said ""hi""""#), vec![vec![r#"he said "hi""#]]);
        assert_eq!(
            parse(r#""Say ""Hello""",world"#),
            vec![vec![r#"Say "Hello""#, "world"]]
        );
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(parse("a,,c"), vec![vec!["a", "", "c"]]);
        assert_eq!(parse(",,"), vec![vec!["", "", ""]]);
    }

    #[test]
    fn test_quoted_with_newline() {
        assert_eq!(
            parse("a,\"line1\nline2\",b"),
            vec![vec!["a", "line1\nline2", "b"]]
        );
    }

    #[test]
    fn test_quoted_newline_spans_rows() {
        assert_eq!(
            parse("h1,h2\n\"x\ny\",2\n3,4\n"),
            vec![vec!["h1", "h2"], vec!["x\ny", "2"], vec!["3", "4"]]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let parser = CsvParser::new(b';', b'"');
        let grid = parser.parse(r#"a;"b;c";d"#).unwrap();
        assert_eq!(grid.to_strings(), vec![vec!["a", "b;c", "d"]]);
    }

    #[test]
    fn test_skips_empty_lines() {
        assert_eq!(
            parse("a,b\n\n\n1,2\n\n"),
            vec![vec!["a", "b"], vec!["1", "2"]]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        assert_eq!(
            parse("a,b\r\n1,2\r\n"),
            vec![vec!["a", "b"], vec!["1", "2"]]
        );
    }

    #[test]
    fn test_lone_carriage_return_is_data() {
        assert_eq!(parse("a\rb,c"), vec![vec!["a\rb", "c"]]);
    }

    #[test]
    fn test_whitespace_preserved() {
        assert_eq!(parse(" a , b "), vec![vec![" a ", " b "]]);
    }

    #[test]
    fn test_missing_trailing_newline() {
        assert_eq!(parse("a,b\n1,2"), vec![vec!["a", "b"], vec!["1", "2"]]);
    }

    #[test]
    fn test_ragged_rows_kept() {
        assert_eq!(
            parse("a,b,c,d\n1,2\n1,2,3,4,5"),
            vec![
                vec!["a", "b", "c", "d"],
                vec!["1", "2"],
                vec!["1", "2", "3", "4", "5"],
            ]
        );
    }

    #[test]
    fn test_quoted_empty() {
        assert_eq!(parse(r#""","""#), vec![vec!["", ""]]);
        assert_eq!(parse("\"\"\n"), vec![vec![""]]);
    }

    #[test]
    fn test_stray_quotes_are_literal() {
        assert_eq!(parse(r#"ab"c,d"#), vec![vec![r#"ab"c"#, "d"]]);
        assert_eq!(parse(r#""ab"c,d"#), vec![vec!["abc", "d"]]);
    }

    #[test]
    fn test_unterminated_quote() {
        let err = CsvParser::default()
            .parse("a,b\n1,\"open\n2,3\n")
            .unwrap_err();
        match err {
            PreviewError::Parse { reason, line } => {
                assert_eq!(reason, ParseErrorReason::UnterminatedQuote);
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_multibyte_content() {
        assert_eq!(parse("名前,值\n\"ü,ö\",✓"), vec![vec!["名前", "值"], vec!["ü,ö", "✓"]]);
    }
}
