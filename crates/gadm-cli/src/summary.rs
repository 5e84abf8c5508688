use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use gadm_ingest::LoadReport;
use gadm_model::{Match, MatchSet};

use crate::commands::{Destination, MatchOutcome, TableStatus};

pub const NO_MATCHES: &str =
    "No matches found. Try adjusting the threshold or check your input format.";

pub fn print_match_summary(outcome: &MatchOutcome) {
    print_load_failures(&outcome.report);
    if !outcome.matches.is_complete() {
        eprintln!(
            "Time budget expired: {} table scans skipped, results are partial.",
            outcome.matches.skipped_scans
        );
    }
    match &outcome.destination {
        Destination::Table => {
            if outcome.matches.is_empty() {
                println!("{NO_MATCHES}");
                return;
            }
            println!("{}", match_table(&outcome.matches, outcome.threshold));
            println!(
                "{} matches for {} of {} queries across {} tables",
                outcome.matches.len(),
                outcome.matches.query_count(),
                outcome.query_count,
                outcome.table_count
            );
        }
        Destination::Stdout(_) => {
            if outcome.matches.is_empty() {
                eprintln!("{NO_MATCHES}");
            }
        }
        Destination::File { path, .. } => {
            if outcome.matches.is_empty() {
                println!("{NO_MATCHES}");
            }
            println!(
                "Wrote {} matches to {}",
                outcome.matches.len(),
                path.display()
            );
        }
    }
}

fn print_load_failures(report: &LoadReport) {
    for failure in &report.failures {
        eprintln!("Loading failed: {}: {}", failure.path.display(), failure.error);
    }
}

fn match_table(matches: &MatchSet, threshold: u8) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Query"),
        header_cell("Version"),
        header_cell("Level"),
        header_cell("GID_0"),
        header_cell("GID"),
        header_cell("Matched name"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 6, CellAlignment::Right);

    let mut previous: Option<&str> = None;
    for entry in matches {
        let query_cell = if previous == Some(entry.query.as_str()) {
            dim_cell(&entry.query)
        } else {
            Cell::new(&entry.query).add_attribute(Attribute::Bold)
        };
        previous = Some(entry.query.as_str());
        table.add_row(vec![
            query_cell,
            Cell::new(&entry.version),
            Cell::new(entry.level),
            gid_cell(&entry.gid_0),
            gid_cell(&entry.gid),
            Cell::new(&entry.matched_name),
            score_cell(entry, threshold),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn status_cell(status: TableStatus) -> Cell {
    match status {
        TableStatus::Usable => Cell::new("usable").fg(Color::Green),
        TableStatus::MissingColumns => Cell::new("missing columns").fg(Color::Yellow),
        TableStatus::LoadFailed => Cell::new("load failed").fg(Color::Red),
    }
}

fn gid_cell(gid: &str) -> Cell {
    if gid.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(gid)
    }
}

/// Exact matches stand out; scores just over the threshold are muted.
fn score_cell(entry: &Match, threshold: u8) -> Cell {
    let cell = Cell::new(entry.score);
    match entry.score {
        100 => cell.fg(Color::Green).add_attribute(Attribute::Bold),
        score if score < threshold.saturating_add(10) => cell.fg(Color::Yellow),
        _ => cell,
    }
}
