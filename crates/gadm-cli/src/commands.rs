use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Read};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, CellAlignment, Table};
use tracing::{debug, info, info_span};

use gadm_cli::export::{ExportFormat, write_matches};
use gadm_ingest::{
    LoadOptions, LoadReport, TableSource, discovered_sources, load_sources, parse_queries,
    parse_query_line, read_queries,
};
use gadm_match::BatchMatchEngine;
use gadm_model::{MatchOptions, MatchSet, Query, ReferenceTable, TokenNormalization};

use crate::cli::{DataArgs, MatchArgs, OutputFormatArg, TablesArgs};
use crate::summary::{align_column, apply_table_style, dim_cell, header_cell, status_cell};

pub const NO_QUERIES: &str = "Please enter at least one place name.";

/// Where the match results went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Rendered as a table on stdout by the summary.
    Table,
    Stdout(ExportFormat),
    File { path: PathBuf, format: ExportFormat },
}

pub struct MatchOutcome {
    pub query_count: usize,
    pub table_count: usize,
    pub threshold: u8,
    pub matches: MatchSet,
    pub report: LoadReport,
    pub destination: Destination,
}

pub fn run_match(args: &MatchArgs) -> Result<MatchOutcome> {
    let queries = collect_queries(args)?;
    if queries.is_empty() {
        bail!(NO_QUERIES);
    }

    let options = MatchOptions::new()
        .with_threshold(args.threshold)
        .with_normalization(if args.normalize {
            TokenNormalization::Processed
        } else {
            TokenNormalization::None
        })
        .with_parallel(!args.sequential)
        .with_time_budget(args.time_budget_ms.map(Duration::from_millis));
    options.validate().context("invalid match options")?;

    let span = info_span!("match_command", query_count = queries.len());
    let _guard = span.enter();
    let start = Instant::now();

    let sources = resolve_sources(&args.data)?;
    let loaded = load_sources(&sources);
    let engine = BatchMatchEngine::new(options);
    let matches = engine.run(&queries, &loaded.repository);

    let destination = resolve_destination(args);
    match &destination {
        Destination::Table => {}
        Destination::Stdout(format) => {
            let stdout = io::stdout().lock();
            write_matches(stdout, *format, &matches).context("write matches to stdout")?;
        }
        Destination::File { path, format } => {
            let file = File::create(path)
                .with_context(|| format!("create output file {}", path.display()))?;
            write_matches(BufWriter::new(file), *format, &matches)
                .with_context(|| format!("write matches to {}", path.display()))?;
        }
    }

    info!(
        match_count = matches.len(),
        duration_ms = start.elapsed().as_millis(),
        "match command finished"
    );
    Ok(MatchOutcome {
        query_count: queries.len(),
        table_count: loaded.repository.len(),
        threshold: args.threshold,
        matches,
        report: loaded.report,
        destination,
    })
}

pub fn run_tables(args: &TablesArgs) -> Result<()> {
    let sources = resolve_sources(&args.data)?;
    if sources.is_empty() {
        println!("No reference tables configured.");
        return Ok(());
    }
    let loaded = load_sources(&sources);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Version"),
        header_cell("Level"),
        header_cell("File"),
        header_cell("Records"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);

    for source in &sources {
        let failed = loaded
            .report
            .failures
            .iter()
            .any(|failure| failure.key == source.key);
        let table_data = loaded.repository.get(&source.key);
        let records = table_data.map_or(0, ReferenceTable::len);
        let status = if failed {
            TableStatus::LoadFailed
        } else if table_data.is_some_and(|data| data.is_usable_at(source.key.level)) {
            TableStatus::Usable
        } else {
            TableStatus::MissingColumns
        };
        table.add_row(vec![
            Cell::new(&source.key.version),
            Cell::new(source.key.level),
            dim_cell(source.path.display()),
            if failed {
                dim_cell("-")
            } else {
                Cell::new(records)
            },
            status_cell(status),
        ]);
    }
    println!("{table}");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Usable,
    MissingColumns,
    LoadFailed,
}

/// Positional queries win, then `--input`, then piped stdin.
fn collect_queries(args: &MatchArgs) -> Result<Vec<Query>> {
    if !args.queries.is_empty() {
        return Ok(args
            .queries
            .iter()
            .filter_map(|line| parse_query_line(line, args.delimiter))
            .collect());
    }
    if let Some(path) = &args.input {
        return read_queries(path, args.delimiter)
            .with_context(|| format!("read queries from {}", path.display()));
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut text = String::new();
    stdin
        .lock()
        .read_to_string(&mut text)
        .context("read queries from stdin")?;
    let queries = parse_queries(&text, args.delimiter);
    debug!(query_count = queries.len(), "read queries from stdin");
    Ok(queries)
}

fn resolve_sources(data: &DataArgs) -> Result<Vec<TableSource>> {
    if data.discover {
        return discovered_sources(&data.data_dir)
            .with_context(|| format!("scan {}", data.data_dir.display()));
    }
    let mut options = LoadOptions::new(&data.data_dir);
    if let Some(versions) = &data.versions {
        options = options.with_versions(versions.iter().cloned());
    }
    if let Some(levels) = &data.levels {
        options = options.with_levels(levels.iter().copied());
    }
    Ok(options.sources())
}

fn resolve_destination(args: &MatchArgs) -> Destination {
    match (&args.output, args.format) {
        (Some(path), format) => Destination::File {
            path: path.clone(),
            format: match format {
                Some(OutputFormatArg::Json) => ExportFormat::Json,
                Some(OutputFormatArg::Csv) => ExportFormat::Csv,
                Some(OutputFormatArg::Table) | None => ExportFormat::from_path(path),
            },
        },
        (None, Some(OutputFormatArg::Csv)) => Destination::Stdout(ExportFormat::Csv),
        (None, Some(OutputFormatArg::Json)) => Destination::Stdout(ExportFormat::Json),
        (None, Some(OutputFormatArg::Table) | None) => Destination::Table,
    }
}
