//! CSV and JSON export of match results.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use gadm_model::MatchSet;

/// Column order of the CSV export.
pub const CSV_HEADER: [&str; 7] = [
    "query",
    "version",
    "level",
    "GID_0",
    "GID",
    "matched_name",
    "score",
];

/// File format for exported matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// JSON for a `.json` extension, CSV otherwise.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

/// Write one row per match. The header is written even when there are no
/// matches.
pub fn write_csv<W: Write>(writer: W, matches: &MatchSet) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(CSV_HEADER)?;
    for entry in matches {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(mut writer: W, matches: &MatchSet) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, matches)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_matches<W: Write>(writer: W, format: ExportFormat, matches: &MatchSet) -> Result<()> {
    match format {
        ExportFormat::Csv => write_csv(writer, matches),
        ExportFormat::Json => write_json(writer, matches),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(
            ExportFormat::from_path(Path::new("out/matches.JSON")),
            ExportFormat::Json
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("matches.csv")),
            ExportFormat::Csv
        );
        assert_eq!(
            ExportFormat::from_path(Path::new("matches")),
            ExportFormat::Csv
        );
    }

    #[test]
    fn empty_csv_still_has_header() {
        let mut buffer = Vec::new();
        write_csv(&mut buffer, &MatchSet::default()).expect("write csv");
        assert_eq!(
            String::from_utf8(buffer).expect("utf8"),
            "query,version,level,GID_0,GID,matched_name,score\n"
        );
    }
}
