//! Terminal output helpers

use colored::Colorize;
use comfy_table::{Cell, Color, Table};
use std::path::Path;

use clemens_parser::Document;

/// One row per document
pub fn documents_table(documents: &[Document]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "File", "Kind", "Title", "Words", "Sections", "Emojis", "Protocol",
    ]);

    for doc in documents {
        let (kind, protocol) = match doc.as_protocol() {
            Some(protocol) => (
                Cell::new("protocol").fg(Color::Cyan),
                protocol.protocol_id.clone().unwrap_or_else(|| "-".to_string()),
            ),
            None => (Cell::new("document"), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(&doc.filename),
            kind,
            Cell::new(doc.display_title()),
            Cell::new(doc.word_count),
            Cell::new(doc.all_sections().count()),
            Cell::new(doc.emoji_count()),
            Cell::new(protocol),
        ]);
    }
    table
}

pub fn print_documents(documents: &[Document]) {
    if documents.is_empty() {
        println!("{}", "No documents found".yellow());
        return;
    }
    println!("{}", documents_table(documents));
    println!("{}", format!("{} documents", documents.len()).dimmed());
}

pub fn success(message: &str) {
    println!("{} {}", "Success:".green().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", "Warning:".yellow().bold(), message);
}

pub fn wrote(path: &Path) {
    println!("  {} {}", "wrote".dimmed(), path.display());
}
