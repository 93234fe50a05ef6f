//! Integration tests for csvpreview

use csvpreview::csv::{self, CsvEncoder};
use csvpreview::{
    DocumentInfo, Grid, HostAction, PanelMessage, PreviewError, PreviewSession, PreviewState,
    RawDocument, RenderModel, SearchIndex,
};
use std::io::Write;
use tempfile::NamedTempFile;

fn csv_file(content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_end_to_end_example() {
    let text = "id,name\n1,Alice\n2,\"Bob, Jr.\"\n";
    let grid = csv::parse(text).unwrap();
    assert_eq!(
        grid.to_strings(),
        vec![vec!["id", "name"], vec!["1", "Alice"], vec!["2", "Bob, Jr."]]
    );

    let model = RenderModel::build(&grid);
    assert_eq!(model.header(), ["id", "name"]);
    let body: Vec<(usize, Vec<String>)> = model
        .body()
        .iter()
        .map(|r| (r.index, r.cells.clone()))
        .collect();
    assert_eq!(
        body,
        vec![
            (1, vec!["1".to_string(), "Alice".to_string()]),
            (2, vec!["2".to_string(), "Bob, Jr.".to_string()]),
        ]
    );
}

#[test]
fn test_ragged_grid_through_pipeline() {
    let grid = csv::parse("a,b,c,d\n1,2\n").unwrap();
    assert!(!grid.is_rectangular());

    let model = RenderModel::build(&grid);
    assert_eq!(model.body()[0].cells, ["1", "2", "", ""]);
}

#[test]
fn test_search_navigation() {
    let grid = Grid::from_rows(vec![
        vec!["x", "y"],
        vec!["foo", "BAR"],
        vec!["baz", "foobar"],
    ]);
    let model = RenderModel::build(&grid);
    let mut index = SearchIndex::build(&model, "FoO");

    let found: Vec<(usize, usize)> = index.matches().iter().map(|m| (m.row, m.column)).collect();
    assert_eq!(found, vec![(0, 0), (1, 1)]);
    assert_eq!(index.cursor(), Some(0));
    assert_eq!(index.next(), Some(1));
    assert_eq!(index.next(), Some(0));

    let mut empty = SearchIndex::build(&model, "");
    assert_eq!(empty.cursor(), None);
    assert_eq!(empty.previous(), None);
}

#[test]
fn test_plain_round_trip() {
    let grid = Grid::from_rows(vec![
        vec!["city", "country", "population"],
        vec!["Hanoi", "Vietnam", "8000000"],
        vec!["Oslo", "Norway", "700000"],
    ]);
    let text = CsvEncoder::default().encode_grid(&grid);
    assert_eq!(text.lines().count(), 3);
    assert_eq!(csv::parse(&text).unwrap(), grid);
}

#[test]
fn test_read_document_from_disk() {
    let file = csv_file("\u{feff}name,age\nAlice,30\n");
    let doc = RawDocument::open(file.path()).unwrap();

    assert_eq!(doc.text(), "name,age\nAlice,30\n");
    assert_eq!(doc.path(), Some(file.path()));
    assert_eq!(csv::parse(doc.text()).unwrap().len(), 2);
}

#[test]
fn test_read_invalid_utf8() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[b'a', b',', 0xff, b'\n']).unwrap();
    file.flush().unwrap();

    let err = RawDocument::open(file.path()).unwrap_err();
    assert!(matches!(err, PreviewError::Read(msg) if msg.contains("UTF-8")));
}

#[test]
fn test_session_loads_from_disk() {
    let file = csv_file("id,note\n1,\"multi\nline\"\n2,<tag>\n");
    let mut session = PreviewSession::new();

    let panel = session
        .open(&DocumentInfo::new(file.path(), "csv"))
        .unwrap();
    let html = panel.html().unwrap();
    assert!(html.contains("multi<br>line"));
    assert!(html.contains("&lt;tag&gt;"));
    assert!(html.contains("<td class=\"row-number\">2</td>"));
}

#[test]
fn test_session_missing_file() {
    let mut session = PreviewSession::new();
    let err = session
        .open(&DocumentInfo::new("/nonexistent/dir/data.csv", "csv"))
        .unwrap_err();
    assert!(matches!(err, PreviewError::Read(_)));

    let html = session.active().unwrap().html().unwrap();
    assert!(html.contains("class=\"error\""));
}

#[test]
fn test_revive_restores_search() {
    let file = csv_file("k,v\na,apple\nb,banana\nc,cherry\n");
    let mut session = PreviewSession::new();
    {
        let panel = session
            .open(&DocumentInfo::new(file.path(), "csv"))
            .unwrap();
        panel.set_search_term("an");
        assert_eq!(
            panel.handle_message(PanelMessage::Next),
            Some(HostAction::Rerender)
        );
    }
    let state = session.active().unwrap().state();
    assert_eq!(state.search_term, "an");
    session.dispose();

    let revived = session.revive(PreviewState {
        document: state.document.clone(),
        search_term: state.search_term.clone(),
        expanded_row: Some(2),
    });
    assert_eq!(revived.search().map(|s| s.len()), Some(1));
    assert_eq!(revived.expanded_row(), Some(2));
    assert!(revived.html().unwrap().contains("<tr data-row=\"2\" class=\"expanded\">"));
}

#[test]
fn test_revive_keeps_collapsed_row() {
    let file = csv_file("id,name\n1,Alice\n2,\"Bob, Jr.\"\n3,alison\n");
    let mut session = PreviewSession::new();
    let saved = {
        let panel = session
            .open(&DocumentInfo::new(file.path(), "csv"))
            .unwrap();
        panel.set_search_term("bob");
        assert_eq!(panel.expanded_row(), Some(1));
        assert_eq!(panel.toggle_row(1), None);
        panel.state()
    };
    assert_eq!(saved.expanded_row, None);
    session.dispose();

    let revived = session.revive(saved.clone());
    assert_eq!(revived.state(), saved);
    assert!(!revived.html().unwrap().contains("class=\"expanded\""));
}

#[test]
fn test_revive_drops_out_of_range_row() {
    let file = csv_file("k,v\na,1\n");
    let mut session = PreviewSession::new();
    let revived = session.revive(PreviewState {
        document: Some(file.path().to_path_buf()),
        search_term: String::new(),
        expanded_row: Some(5),
    });
    assert_eq!(revived.expanded_row(), None);
}

#[cfg(feature = "serde")]
#[test]
fn test_state_and_messages_serialize() {
    let state = PreviewState {
        document: Some("data.csv".into()),
        search_term: "x".to_string(),
        expanded_row: None,
    };
    let json = serde_json::to_string(&state).unwrap();
    let back: PreviewState = serde_json::from_str(&json).unwrap();
    assert_eq!(back, state);

    let message: PanelMessage =
        serde_json::from_str(r#"{"command":"alert","text":"hi"}"#).unwrap();
    assert_eq!(message, PanelMessage::Alert { text: "hi".to_string() });
}
