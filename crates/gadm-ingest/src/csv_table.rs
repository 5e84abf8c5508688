use std::path::Path;

use csv::ReaderBuilder;
use gadm_model::ReferenceTable;

use crate::error::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().to_string()
}

/// Read one GADM level file into a [`ReferenceTable`].
///
/// The first row is the header. Cells are trimmed, rows are padded or cut to
/// the header width, and rows with no content are dropped.
pub fn read_reference_table(path: &Path) -> Result<ReferenceTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| IngestError::Record {
            path: path.to_path_buf(),
            source,
        })?
        .iter()
        .map(normalize_header)
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::MissingHeader {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Record {
            path: path.to_path_buf(),
            source,
        })?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        let row: Vec<String> = (0..headers.len())
            .map(|idx| record.get(idx).map(normalize_cell).unwrap_or_default())
            .collect();
        rows.push(row);
    }

    Ok(ReferenceTable::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_bom_and_padding_are_trimmed() {
        assert_eq!(normalize_header("\u{feff}GID_0 "), "GID_0");
        assert_eq!(normalize_header("  NAME_1"), "NAME_1");
        assert_eq!(normalize_cell("  Mexico "), "Mexico");
    }
}
