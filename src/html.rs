//! HTML rendering of a render model for the preview panel
//!
//! This is the only place cell text turns into markup, so it is also the only
//! place escaping happens. Search works on raw text and hands byte ranges to
//! the renderer.

use crate::error::Result;
use crate::render::RenderModel;
use crate::search::{highlight_ranges, SearchIndex};
use std::io::Write;

const PLACEHOLDER_TEXT: &str = "No CSV file selected";

const STYLES: &str = r#"
body { font-family: Arial, sans-serif; margin: 0; padding: 0; }
.container { display: flex; flex-direction: column; height: 100vh; }
.search-container { padding: 10px; background-color: #f0f0f0; display: flex; align-items: center; }
#searchInput { flex-grow: 1; margin-right: 10px; padding: 5px; }
#searchInfo { margin-right: 10px; }
.table-container { flex-grow: 1; overflow: auto; }
table { border-collapse: collapse; }
th, td { border: 1px solid #ddd; padding: 8px; min-width: 200px; max-width: 200px; }
th { background-color: black; color: white; position: sticky; top: 0; z-index: 10; }
.row-number { position: sticky; left: 0; background-color: black; color: white; z-index: 5; width: 50px; min-width: 50px; max-width: 50px; }
th.row-number { z-index: 15; }
tr { height: 1.2em; }
tr.expanded { height: auto; }
td { vertical-align: top; }
.cell-content { white-space: pre-wrap; overflow: hidden; text-overflow: ellipsis; max-height: 1.2em; transition: max-height 0.3s ease-out; }
tr.expanded .cell-content { max-height: none; }
.highlight { background-color: yellow; }
.highlight.current { background-color: orange; }
.error { color: #b00020; padding: 10px; }
"#;

/// Page script: forwards user actions to the host as `command` messages
const SCRIPT: &str = r#"
const host = typeof acquireVsCodeApi === 'function'
    ? acquireVsCodeApi()
    : { postMessage: (message) => window.parent.postMessage(message, '*') };
const searchInput = document.getElementById('searchInput');

document.querySelectorAll('tbody tr').forEach(row => {
    row.querySelectorAll('td:not(.row-number)').forEach(cell => {
        cell.addEventListener('click', () => {
            // Selecting text is not a click
            if (window.getSelection().toString().length === 0) {
                host.postMessage({ command: 'toggleRow', row: Number(row.dataset.row) });
            }
        });
    });
});

searchInput.addEventListener('input', () => {
    host.postMessage({ command: 'search', term: searchInput.value });
});
document.getElementById('prevButton').addEventListener('click', () => {
    host.postMessage({ command: 'previous' });
});
document.getElementById('nextButton').addEventListener('click', () => {
    host.postMessage({ command: 'next' });
});

// Cmd+F (or Ctrl+F) focuses the search box
document.addEventListener('keydown', (e) => {
    if ((e.metaKey || e.ctrlKey) && e.key === 'f') {
        e.preventDefault();
        searchInput.focus();
    }
});

// Keep typing where the previous page left off
if (searchInput.value) {
    searchInput.focus();
    searchInput.setSelectionRange(searchInput.value.length, searchInput.value.length);
}
const current = document.querySelector('.highlight.current') || document.querySelector('tr.expanded');
if (current) {
    current.scrollIntoView({ block: 'center' });
}
"#;

/// Escape cell text for use inside HTML
///
/// Escapes `& < > " '` and turns every newline into `<br>`.
///
/// ```
/// use csvpreview::html::escape_html;
///
/// assert_eq!(escape_html("a<b>\n\"c\" & 'd'"), "a&lt;b&gt;<br>&quot;c&quot; &amp; &#039;d&#039;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match escape_char(ch) {
            Some(entity) => out.push_str(entity),
            None => out.push(ch),
        }
    }
    out
}

#[inline]
fn escape_char(ch: char) -> Option<&'static str> {
    match ch {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&#039;"),
        '\n' => Some("<br>"),
        _ => None,
    }
}

/// Buffered HTML writer over any `io::Write`
pub struct HtmlWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
    flush_threshold: usize,
}

impl<W: Write> HtmlWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, 8192)
    }

    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        HtmlWriter {
            writer,
            buffer: Vec::with_capacity(capacity),
            // Flush at 50% capacity
            flush_threshold: capacity / 2,
        }
    }

    #[inline]
    fn auto_flush(&mut self) -> Result<()> {
        if self.buffer.len() >= self.flush_threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Write markup as-is
    #[inline]
    pub fn write_raw(&mut self, s: &str) -> Result<()> {
        self.buffer.extend_from_slice(s.as_bytes());
        self.auto_flush()
    }

    /// Write `<name` without closing the tag
    pub fn open_tag(&mut self, name: &str) -> Result<()> {
        self.write_raw("<")?;
        self.write_raw(name)
    }

    /// Write ` name="value"` with the value escaped
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_raw(" ")?;
        self.write_raw(name)?;
        self.write_raw("=\"")?;
        self.write_escaped(value)?;
        self.write_raw("\"")
    }

    pub fn attribute_int(&mut self, name: &str, value: usize) -> Result<()> {
        self.attribute(name, &value.to_string())
    }

    /// Close a start tag opened with [`open_tag`](Self::open_tag)
    pub fn close_start_tag(&mut self) -> Result<()> {
        self.write_raw(">")
    }

    /// `<name>` with no attributes
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.open_tag(name)?;
        self.close_start_tag()
    }

    pub fn end_element(&mut self, name: &str) -> Result<()> {
        self.write_raw("</")?;
        self.write_raw(name)?;
        self.write_raw(">")
    }

    /// Write text with HTML escaping, newlines become `<br>`
    pub fn write_escaped(&mut self, text: &str) -> Result<()> {
        for ch in text.chars() {
            match escape_char(ch) {
                Some(entity) => self.buffer.extend_from_slice(entity.as_bytes()),
                None => {
                    // UTF-8 bytes of the character, no allocation
                    let mut buf = [0u8; 4];
                    self.buffer.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
            }
        }
        self.auto_flush()
    }

    /// Write cell text, wrapping each highlighted byte range in a span
    ///
    /// Ranges must be sorted, non-overlapping and on character boundaries, as
    /// returned by [`highlight_ranges`].
    pub fn write_highlighted(
        &mut self,
        text: &str,
        ranges: &[std::ops::Range<usize>],
        class: &str,
    ) -> Result<()> {
        let mut last = 0;
        for range in ranges {
            // Unhighlighted text before this range
            self.write_escaped(&text[last..range.start])?;
            self.open_tag("span")?;
            self.attribute("class", class)?;
            self.close_start_tag()?;
            self.write_escaped(&text[range.clone()])?;
            self.end_element("span")?;
            last = range.end;
        }
        self.write_escaped(&text[last..])
    }

    /// Flush buffer to underlying writer
    pub fn flush(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Renders full preview documents
///
/// # Examples
///
/// ```
/// use csvpreview::csv;
/// use csvpreview::html::HtmlRenderer;
/// use csvpreview::render::RenderModel;
///
/// let grid = csv::parse("id,name\n1,<b>Alice</b>\n").unwrap();
/// let model = RenderModel::build(&grid);
/// let page = HtmlRenderer::new().render(&model, None, None).unwrap();
///
/// assert!(page.contains("&lt;b&gt;Alice&lt;/b&gt;"));
/// ```
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    title: String,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer {
            title: "CSV Preview".to_string(),
        }
    }

    /// Set the document title (builder pattern)
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Render the table page into a string
    ///
    /// `expanded_row` is a 0-based body row position.
    pub fn render(
        &self,
        model: &RenderModel,
        search: Option<&SearchIndex>,
        expanded_row: Option<usize>,
    ) -> Result<String> {
        let mut out = Vec::new();
        self.render_to(&mut out, model, search, expanded_row)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Render the table page into any writer
    pub fn render_to<W: Write>(
        &self,
        writer: W,
        model: &RenderModel,
        search: Option<&SearchIndex>,
        expanded_row: Option<usize>,
    ) -> Result<()> {
        let mut html = HtmlWriter::new(writer);
        self.write_head(&mut html)?;
        html.write_raw("<body><div class=\"container\">")?;
        self.write_search_bar(&mut html, search)?;

        html.write_raw("<div class=\"table-container\"><table><thead><tr>")?;
        html.write_raw("<th class=\"row-number\">#</th>")?;
        for name in model.header() {
            html.start_element("th")?;
            html.write_escaped(name)?;
            html.end_element("th")?;
        }
        html.write_raw("</tr></thead><tbody>")?;

        let term = search.map(SearchIndex::term).unwrap_or("");
        for (pos, row) in model.body().iter().enumerate() {
            html.open_tag("tr")?;
            html.attribute_int("data-row", pos)?;
            if expanded_row == Some(pos) {
                html.attribute("class", "expanded")?;
            }
            html.close_start_tag()?;

            html.write_raw("<td class=\"row-number\">")?;
            html.write_raw(&row.index.to_string())?;
            html.end_element("td")?;

            for (col, cell) in row.cells.iter().enumerate() {
                html.write_raw("<td><div class=\"cell-content\">")?;
                let ranges = highlight_ranges(cell, term);
                let class = match search {
                    Some(index) if index.is_current(pos, col) => "highlight current",
                    _ => "highlight",
                };
                html.write_highlighted(cell, &ranges, class)?;
                html.write_raw("</div></td>")?;
            }
            html.end_element("tr")?;
        }

        html.write_raw("</tbody></table></div></div>")?;
        html.start_element("script")?;
        html.write_raw(SCRIPT)?;
        html.end_element("script")?;
        html.write_raw("</body></html>")?;
        html.flush()
    }

    /// Page shown when no document is attached to the panel
    pub fn render_placeholder(&self) -> String {
        format!("<html><body>{}</body></html>", PLACEHOLDER_TEXT)
    }

    /// Page shown when the document could not be loaded
    pub fn render_error(&self, message: &str) -> String {
        format!(
            "<html><body><div class=\"error\">{}</div></body></html>",
            escape_html(message)
        )
    }

    fn write_head<W: Write>(&self, html: &mut HtmlWriter<W>) -> Result<()> {
        html.write_raw("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\">")?;
        html.write_raw(
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">",
        )?;
        html.start_element("title")?;
        html.write_escaped(&self.title)?;
        html.end_element("title")?;
        html.start_element("style")?;
        html.write_raw(STYLES)?;
        html.end_element("style")?;
        html.write_raw("</head>")
    }

    fn write_search_bar<W: Write>(
        &self,
        html: &mut HtmlWriter<W>,
        search: Option<&SearchIndex>,
    ) -> Result<()> {
        html.write_raw("<div class=\"search-container\">")?;
        html.open_tag("input")?;
        html.attribute("type", "text")?;
        html.attribute("id", "searchInput")?;
        html.attribute("placeholder", "Search...")?;
        if let Some(index) = search {
            html.attribute("value", index.term())?;
        }
        html.close_start_tag()?;

        html.write_raw("<span id=\"searchInfo\">")?;
        if let Some(index) = search.filter(|s| !s.term().is_empty()) {
            html.write_escaped(&index.status())?;
        }
        html.end_element("span")?;
        html.write_raw("<button id=\"prevButton\">Previous</button>")?;
        html.write_raw("<button id=\"nextButton\">Next</button>")?;
        html.end_element("div")
    }
}
