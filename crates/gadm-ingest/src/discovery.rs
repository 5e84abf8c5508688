//! Reference file naming and discovery.
//!
//! GADM level files follow the `gad{version}_level{level}.csv` convention,
//! e.g. `gad41_level2.csv` holds version 41 at level 2.

use std::path::{Path, PathBuf};

use gadm_model::TableKey;

use crate::error::{IngestError, Result};

/// Path of the level file for one (version, level) pair under `dir`.
pub fn reference_table_path(dir: &Path, version: &str, level: u8) -> PathBuf {
    dir.join(format!("gad{version}_level{level}.csv"))
}

/// Parse a level file name back into its table key.
///
/// Matching is case-insensitive on the extension only.
pub fn parse_table_file_name(file_name: &str) -> Option<TableKey> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    if !extension.eq_ignore_ascii_case("csv") {
        return None;
    }
    let rest = stem.strip_prefix("gad")?;
    let (version, level) = rest.split_once("_level")?;
    if version.is_empty() || !version.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return None;
    }
    let level = level.parse::<u8>().ok()?;
    Some(TableKey::new(version, level))
}

/// Lists every level file in a directory, sorted by table key.
pub fn discover_reference_files(dir: &Path) -> Result<Vec<(TableKey, PathBuf)>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(key) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(parse_table_file_name)
        else {
            continue;
        };
        files.push((key, path));
    }

    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_follows_naming_convention() {
        let path = reference_table_path(Path::new("data"), "41", 2);
        assert_eq!(path, Path::new("data").join("gad41_level2.csv"));
    }

    #[test]
    fn parses_level_file_names() {
        assert_eq!(
            parse_table_file_name("gad36_level0.csv"),
            Some(TableKey::new("36", 0))
        );
        assert_eq!(
            parse_table_file_name("gad41_level5.CSV"),
            Some(TableKey::new("41", 5))
        );
        assert_eq!(parse_table_file_name("gad41_level5.xlsx"), None);
        assert_eq!(parse_table_file_name("gad_level1.csv"), None);
        assert_eq!(parse_table_file_name("gad41_levelX.csv"), None);
        assert_eq!(parse_table_file_name("cities.csv"), None);
    }
}
