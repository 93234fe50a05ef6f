//! Preview panel state, independent of any particular editor host
//!
//! A [`PreviewSession`] owns at most one [`PreviewPanel`]. Opening a preview
//! while one is active reveals and reloads that panel instead of creating a
//! second one. The host keeps the session, forwards panel messages to it and
//! displays whatever [`PreviewPanel::html`] returns.

use crate::csv::{self, is_csv_document};
use crate::error::{PreviewError, Result};
use crate::html::HtmlRenderer;
use crate::render::RenderModel;
use crate::search::SearchIndex;
use crate::types::RawDocument;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Document the host wants previewed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentInfo {
    path: PathBuf,
    language_id: String,
    text: Option<String>,
}

impl DocumentInfo {
    /// Document identified by path and editor language id
    ///
    /// Without [`with_text`](Self::with_text) the content is read from disk.
    pub fn new(path: impl Into<PathBuf>, language_id: impl Into<String>) -> Self {
        DocumentInfo {
            path: path.into(),
            language_id: language_id.into(),
            text: None,
        }
    }

    /// Use an in-memory buffer instead of the file on disk (builder pattern)
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    fn load(&self) -> Result<RawDocument> {
        match &self.text {
            Some(text) => Ok(RawDocument::new(text.clone())),
            None => RawDocument::open(&self.path),
        }
    }

    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Persisted panel state, restored with [`PreviewSession::revive`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreviewState {
    pub document: Option<PathBuf>,
    pub search_term: String,
    pub expanded_row: Option<usize>,
}

/// Message sent from the panel's page to the host
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "command", rename_all = "camelCase"))]
pub enum PanelMessage {
    /// Show `text` to the user as an error
    Alert { text: String },
    /// Search input changed
    Search { term: String },
    /// "Next" button
    Next,
    /// "Previous" button
    Previous,
    /// A cell of body row `row` (0-based) was clicked
    ToggleRow { row: usize },
}

/// What the host should do after a panel message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// Show an error notification
    ShowError(String),
    /// Panel state changed; fetch [`PreviewPanel::html`] again
    Rerender,
}

#[derive(Debug, Clone)]
enum PanelContent {
    Placeholder,
    Table(RenderModel),
    Failed(String),
}

/// The preview panel: a loaded table plus its interactive state
#[derive(Debug)]
pub struct PreviewPanel {
    document: Option<PathBuf>,
    content: PanelContent,
    search: Option<SearchIndex>,
    expanded_row: Option<usize>,
    reveal_count: usize,
    renderer: HtmlRenderer,
}

impl PreviewPanel {
    fn new(renderer: HtmlRenderer) -> Self {
        PreviewPanel {
            document: None,
            content: PanelContent::Placeholder,
            search: None,
            expanded_row: None,
            reveal_count: 0,
            renderer,
        }
    }

    /// Replace the panel's document, dropping search and expansion state
    fn update(&mut self, path: Option<PathBuf>, loaded: Result<RenderModel>) -> Result<()> {
        self.document = path;
        self.search = None;
        self.expanded_row = None;
        match loaded {
            Ok(model) => {
                self.content = PanelContent::Table(model);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Preview failed to load document");
                self.content = PanelContent::Failed(e.to_string());
                Err(e)
            }
        }
    }

    /// Path of the previewed document, if any
    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    /// Loaded table, if the panel shows one
    pub fn model(&self) -> Option<&RenderModel> {
        match &self.content {
            PanelContent::Table(model) => Some(model),
            _ => None,
        }
    }

    /// Active search, if a non-empty term is set
    pub fn search(&self) -> Option<&SearchIndex> {
        self.search.as_ref()
    }

    /// 0-based body row currently expanded
    pub fn expanded_row(&self) -> Option<usize> {
        self.expanded_row
    }

    /// How many times an existing panel was brought back to the front
    pub fn reveal_count(&self) -> usize {
        self.reveal_count
    }

    /// Replace the search term and jump to the first match
    ///
    /// Collapses any expanded row; the row holding the first match is
    /// expanded instead. An empty term clears the search.
    pub fn set_search_term(&mut self, term: &str) -> Option<usize> {
        if term.is_empty() {
            self.search = None;
            self.expanded_row = None;
            return None;
        }

        let index = self.model().map(|model| SearchIndex::build(model, term));
        self.expanded_row = index.as_ref().and_then(|i| i.current()).map(|m| m.row);
        let cursor = index.as_ref().and_then(SearchIndex::cursor);
        self.search = index;
        cursor
    }

    /// Move to the next match and expand its row
    pub fn next_match(&mut self) -> Option<usize> {
        let index = self.search.as_mut()?;
        let cursor = index.next();
        self.follow_cursor();
        cursor
    }

    /// Move to the previous match and expand its row
    pub fn previous_match(&mut self) -> Option<usize> {
        let index = self.search.as_mut()?;
        let cursor = index.previous();
        self.follow_cursor();
        cursor
    }

    fn follow_cursor(&mut self) {
        if let Some(row) = self.search.as_ref().and_then(|s| s.current()).map(|m| m.row) {
            self.expanded_row = Some(row);
        }
    }

    /// Expand `row`, or collapse it if it is already expanded
    ///
    /// Only one row is expanded at a time. Rows outside the table are ignored.
    pub fn toggle_row(&mut self, row: usize) -> Option<usize> {
        let in_table = self.model().is_some_and(|m| row < m.body().len());
        if !in_table {
            return self.expanded_row;
        }

        self.expanded_row = if self.expanded_row == Some(row) {
            None
        } else {
            Some(row)
        };
        self.expanded_row
    }

    /// React to a message from the panel's page
    pub fn handle_message(&mut self, message: PanelMessage) -> Option<HostAction> {
        debug!(?message, "Panel message");
        match message {
            PanelMessage::Alert { text } => Some(HostAction::ShowError(text)),
            // Placeholder and error pages have nothing to search
            PanelMessage::Search { .. } if self.model().is_none() => None,
            PanelMessage::Search { term } => {
                self.set_search_term(&term);
                Some(HostAction::Rerender)
            }
            PanelMessage::Next => self.next_match().map(|_| HostAction::Rerender),
            PanelMessage::Previous => self.previous_match().map(|_| HostAction::Rerender),
            PanelMessage::ToggleRow { row } => {
                let before = self.expanded_row;
                (self.toggle_row(row) != before).then_some(HostAction::Rerender)
            }
        }
    }

    /// Markup for the panel's current state
    pub fn html(&self) -> Result<String> {
        match &self.content {
            PanelContent::Placeholder => Ok(self.renderer.render_placeholder()),
            PanelContent::Failed(message) => Ok(self.renderer.render_error(message)),
            PanelContent::Table(model) => {
                self.renderer
                    .render(model, self.search.as_ref(), self.expanded_row)
            }
        }
    }

    /// Snapshot to persist across host restarts
    pub fn state(&self) -> PreviewState {
        PreviewState {
            document: self.document.clone(),
            search_term: self
                .search
                .as_ref()
                .map(|s| s.term().to_string())
                .unwrap_or_default(),
            expanded_row: self.expanded_row,
        }
    }
}

/// Owner of the single active preview panel
#[derive(Debug, Default)]
pub struct PreviewSession {
    active: Option<PreviewPanel>,
    renderer: HtmlRenderer,
}

impl PreviewSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom renderer for panels created by this session (builder pattern)
    pub fn with_renderer(mut self, renderer: HtmlRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    /// Create the preview, or reveal and reload the existing one
    ///
    /// Documents that are neither declared CSV nor look like CSV are rejected
    /// with [`PreviewError::NotCsv`] and leave the session untouched. Read and
    /// parse failures are shown in the panel and also returned.
    pub fn open(&mut self, doc: &DocumentInfo) -> Result<&mut PreviewPanel> {
        let raw = doc.load();

        // Unreadable documents still get a panel that reports the failure
        if let Ok(raw) = &raw {
            if !is_csv_document(doc.language_id(), &doc.file_name(), raw.text()) {
                debug!(path = %doc.path().display(), "Document does not look like CSV");
                return Err(PreviewError::NotCsv(doc.file_name()));
            }
        }

        let panel = match self.active.take() {
            Some(mut panel) => {
                panel.reveal_count += 1;
                debug!(path = %doc.path().display(), "Revealing existing preview");
                panel
            }
            None => {
                debug!(path = %doc.path().display(), "Creating preview");
                PreviewPanel::new(self.renderer.clone())
            }
        };
        let panel = self.active.insert(panel);

        let loaded = raw.and_then(|raw| Ok(RenderModel::build(&csv::parse(raw.text())?)));
        panel.update(Some(doc.path().to_path_buf()), loaded)?;
        Ok(panel)
    }

    /// Recreate the panel from persisted state
    ///
    /// Load failures are rendered into the panel rather than returned, since
    /// there is no user action to report them to.
    pub fn revive(&mut self, state: PreviewState) -> &mut PreviewPanel {
        debug!(document = ?state.document, "Reviving preview");
        let mut panel = PreviewPanel::new(self.renderer.clone());

        if let Some(path) = state.document {
            let loaded = RawDocument::open(&path)
                .and_then(|raw| Ok(RenderModel::build(&csv::parse(raw.text())?)));
            if panel.update(Some(path), loaded).is_ok() {
                panel.set_search_term(&state.search_term);
                // Saved expansion wins over the one implied by the first match
                let rows = panel.model().map_or(0, |model| model.body().len());
                panel.expanded_row = state.expanded_row.filter(|&row| row < rows);
            }
        }

        self.active.insert(panel)
    }

    pub fn active(&self) -> Option<&PreviewPanel> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut PreviewPanel> {
        self.active.as_mut()
    }

    /// Close the active panel; returns whether one was open
    pub fn dispose(&mut self) -> bool {
        let closed = self.active.take().is_some();
        if closed {
            debug!("Preview disposed");
        }
        closed
    }
}
