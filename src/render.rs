//! Console rendering for the inventory commands.

use colored::*;
use comfy_table::{presets::NOTHING, Cell, CellAlignment, Row, Table};

use crate::catalog::DefinerObject;

const HEADERS: [&str; 3] = ["NAME", "TYPE", "DEFINER"];

/// Borderless NAME/TYPE/DEFINER table, left-aligned.
pub fn object_table(objects: &[DefinerObject]) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING).set_header(Row::from(
        HEADERS
            .iter()
            .map(|h| Cell::new(h).set_alignment(CellAlignment::Left))
            .collect::<Vec<_>>(),
    ));

    for object in objects {
        table.add_row(vec![
            Cell::new(&object.name),
            Cell::new(object.kind.as_str()),
            Cell::new(&object.definer),
        ]);
    }
    table
}

/// Rendered table lines (header first) with trailing padding removed.
pub fn table_lines(objects: &[DefinerObject]) -> Vec<String> {
    object_table(objects)
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// `Total: N`, then the object table with a green header.
pub fn print_objects(objects: &[DefinerObject]) {
    println!("{}: {}", "Total".yellow(), objects.len());
    println!();
    println!("{}", "Objects:".green());

    let mut lines = table_lines(objects).into_iter();
    if let Some(header) = lines.next() {
        println!("{}", header.green().bold());
    }
    for line in lines {
        println!("{}", line);
    }
}

pub fn print_databases(databases: &[String]) {
    println!("{}", "Databases:".green());
    for database in databases {
        println!("{}", database);
    }
}

pub fn objects_json(objects: &[DefinerObject]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(objects)
}
