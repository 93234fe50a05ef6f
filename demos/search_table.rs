//! Sniff, parse and search CSV text without any panel

use csvpreview::csv::{self, looks_like_csv};
use csvpreview::{RenderModel, SearchIndex};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let text = "id,name,city\n1,Alice,Hanoi\n2,\"Bob, Jr.\",Oslo\n3,Alison\n";

    println!("Looks like CSV: {}", looks_like_csv(text));

    let grid = csv::parse(text)?;
    println!("Rectangular: {}", grid.is_rectangular());

    let model = RenderModel::build(&grid);
    println!("Header: {:?}", model.header());
    for row in model.body() {
        println!("{:>3} | {}", row.index, row.cells.join(" | "));
    }

    let mut index = SearchIndex::build(&model, "ali");
    println!("\nSearch 'ali': {}", index.status());
    for _ in 0..index.len() {
        if let Some(m) = index.current() {
            println!("  row {} col {} -> {:?}", m.row + 1, m.column, m.text);
        }
        index.next();
    }

    Ok(())
}
