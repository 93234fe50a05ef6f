//! Heuristic detection of CSV-shaped text

use tracing::trace;

/// Language identifiers that are treated as CSV without sniffing
const CSV_LANGUAGE_IDS: &[&str] = &["csv", "dynamic-csv"];

/// Cheap check for "does this text look like CSV"
///
/// Samples the first lines of the text and requires each to split into the
/// same number of delimiter-separated fields as the first line. Quoting is
/// ignored: a quoted field containing the delimiter makes a real CSV file look
/// inconsistent and the check answers `false`.
#[derive(Debug, Clone)]
pub struct CsvSniffer {
    delimiter: char,
    sample_lines: usize,
}

impl Default for CsvSniffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvSniffer {
    /// Sniffer sampling 5 lines split on commas
    pub fn new() -> Self {
        CsvSniffer {
            delimiter: ',',
            sample_lines: 5,
        }
    }

    /// Set the field delimiter (builder pattern)
    pub fn delimiter(mut self, delim: u8) -> Self {
        self.delimiter = delim as char;
        self
    }

    /// Set how many leading lines are compared (builder pattern)
    ///
    /// Values below 2 can never establish consistency, so every input is rejected.
    pub fn sample_lines(mut self, lines: usize) -> Self {
        self.sample_lines = lines;
        self
    }

    /// Decide whether `text` is plausibly CSV
    pub fn looks_like_csv(&self, text: &str) -> bool {
        let lines: Vec<&str> = text.split('\n').take(self.sample_lines).collect();
        if lines.len() < 2 {
            return false;
        }

        let expected = self.field_count(lines[0]);
        let consistent = lines.iter().all(|line| self.field_count(line) == expected);
        trace!(
            sampled = lines.len(),
            fields = expected,
            consistent,
            "Sniffed document"
        );
        consistent
    }

    fn field_count(&self, line: &str) -> usize {
        line.split(self.delimiter).count()
    }
}

/// [`CsvSniffer::looks_like_csv`] with the default settings
///
/// ```
/// use csvpreview::csv::looks_like_csv;
///
/// assert!(looks_like_csv("a,b\n1,2"));
/// assert!(!looks_like_csv("a,b"));
/// ```
pub fn looks_like_csv(text: &str) -> bool {
    CsvSniffer::new().looks_like_csv(text)
}

/// Gate used before opening a preview
///
/// A declared CSV language id or a `.csv` file name wins outright; only
/// undeclared documents fall back to sniffing their content.
pub fn is_csv_document(language_id: &str, file_name: &str, text: &str) -> bool {
    if CSV_LANGUAGE_IDS.contains(&language_id) {
        return true;
    }
    if file_name.to_lowercase().ends_with(".csv") {
        return true;
    }
    looks_like_csv(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_rejected() {
        assert!(!looks_like_csv(""));
        assert!(!looks_like_csv("a,b,c"));
    }

    #[test]
    fn test_consistent_lines() {
        assert!(looks_like_csv("a,b,c\n1,2,3\n4,5,6"));
        assert!(looks_like_csv("id,name\n1,Alice\n2,Bob\n3,Carol\n4,Dan"));
    }

    #[test]
    fn test_inconsistent_line() {
        assert!(!looks_like_csv("a,b,c\n1,2\n4,5,6"));
    }

    #[test]
    fn test_only_first_five_lines_sampled() {
        assert!(looks_like_csv("a,b\n1,2\n3,4\n5,6\n7,8\nbroken\n"));
    }

    #[test]
    fn test_trailing_newline_counts_as_line() {
        // The empty piece after the final newline has one field
        assert!(!looks_like_csv("a,b\n1,2\n"));
        assert!(looks_like_csv("a,b\n1,2\n3,4\n5,6\n7,8\n"));
    }

    #[test]
    fn test_quoted_comma_is_false_negative() {
        assert!(!looks_like_csv("id,name\n1,\"Bob, Jr.\"\n"));
    }

    #[test]
    fn test_plain_prose_without_commas() {
        // No delimiters anywhere still counts as consistent
        assert!(looks_like_csv("hello\nworld"));
    }

    #[test]
    fn test_custom_delimiter_and_sample() {
        let sniffer = CsvSniffer::new().delimiter(b';').sample_lines(2);
        assert!(sniffer.looks_like_csv("a;b\n1;2\nbroken"));
        assert!(!sniffer.looks_like_csv("a;b\n1,2"));
    }

    #[test]
    fn test_document_gate() {
        assert!(is_csv_document("csv", "notes.txt", "not csv"));
        assert!(is_csv_document("dynamic-csv", "", ""));
        assert!(is_csv_document("plaintext", "DATA.CSV", ""));
        assert!(is_csv_document("plaintext", "dump.txt", "a,b\n1,2"));
        assert!(!is_csv_document("plaintext", "dump.txt", "a,b\n1"));
    }
}
