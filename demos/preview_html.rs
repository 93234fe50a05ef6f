//! Render a CSV file as a standalone HTML preview
//!
//! Usage: cargo run --example preview_html -- data.csv [search term] > preview.html

use csvpreview::{DocumentInfo, PreviewSession};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let path = args.next().ok_or("usage: preview_html <file.csv> [search term]")?;
    let term = args.next();

    let mut session = PreviewSession::new();
    let panel = session.open(&DocumentInfo::new(&path, "csv"))?;

    if let Some(term) = term {
        panel.set_search_term(&term);
        if let Some(index) = panel.search() {
            eprintln!("{}", index.status());
        }
    }

    if let Some(model) = panel.model() {
        eprintln!(
            "{} columns, {} rows",
            model.width(),
            model.body().len()
        );
    }

    println!("{}", panel.html()?);
    Ok(())
}
