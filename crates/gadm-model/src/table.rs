//! Reference tables keyed by dataset version and hierarchy level.
//!
//! A [`ReferenceTable`] holds the rows of one GADM-style level file
//! (e.g. `gad41_level2.csv`). Cells are plain strings; a column the table
//! does not carry, or a cell past the end of a short row, reads as absent.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Top-level region code column, used for scoping.
pub const GID_0: &str = "GID_0";

/// Name column for a hierarchy level (`NAME_2` for level 2).
pub fn name_column(level: u8) -> String {
    format!("NAME_{level}")
}

/// Identifier column for a hierarchy level (`GID_2` for level 2).
pub fn gid_column(level: u8) -> String {
    format!("GID_{level}")
}

/// Identifies one reference table: a dataset version at a hierarchy level.
///
/// Ordering is version first, then level, which is the order tables are
/// searched in. Plain-number versions compare numerically ("36" before
/// "100") and sort ahead of any other version label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableKey {
    pub version: String,
    pub level: u8,
}

impl TableKey {
    pub fn new(version: impl Into<String>, level: u8) -> Self {
        Self {
            version: version.into(),
            level,
        }
    }
}

impl Ord for TableKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_versions(&self.version, &other.version).then(self.level.cmp(&other.level))
    }
}

impl PartialOrd for TableKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numeric versions come first, in numeric order; the rest follow as text.
/// Numeric ties ("036" vs "36") fall back to text so the order stays
/// consistent with equality.
fn compare_versions(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

impl fmt::Display for TableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{} level {}", self.version, self.level)
    }
}

/// Column positions needed to match against a table at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColumns {
    pub name: usize,
    pub gid: usize,
    pub gid_0: Option<usize>,
}

/// An ordered, immutable sequence of records for one (version, level) pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl ReferenceTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// A table with no columns and no rows. Never produces matches.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from column-to-value maps.
    ///
    /// Columns appear in first-seen order. A record lacking a column gets an
    /// empty cell for it.
    pub fn from_records<I, R, K, V>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut headers: Vec<String> = Vec::new();
        let mut maps: Vec<BTreeMap<String, String>> = Vec::new();
        for record in records {
            let mut map = BTreeMap::new();
            for (key, value) in record {
                let key = key.into();
                if !headers.contains(&key) {
                    headers.push(key.clone());
                }
                map.insert(key, value.into());
            }
            maps.push(map);
        }
        let rows = maps
            .into_iter()
            .map(|mut map| {
                headers
                    .iter()
                    .map(|header| map.remove(header).unwrap_or_default())
                    .collect()
            })
            .collect();
        Self { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == column)
    }

    /// Resolve the `NAME_{level}`, `GID_{level}` and `GID_0` columns.
    ///
    /// Returns `None` when either required column is missing.
    pub fn level_columns(&self, level: u8) -> Option<LevelColumns> {
        let name = self.column_index(&name_column(level))?;
        let gid = self.column_index(&gid_column(level))?;
        Some(LevelColumns {
            name,
            gid,
            gid_0: self.column_index(GID_0),
        })
    }

    pub fn is_usable_at(&self, level: u8) -> bool {
        self.level_columns(level).is_some()
    }

    pub fn records(&self) -> impl ExactSizeIterator<Item = Record<'_>> {
        self.rows.iter().map(|cells| Record {
            headers: &self.headers,
            cells,
        })
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    cells: &'a [String],
}

impl<'a> Record<'a> {
    /// Cell at a column position; `None` when the row is short.
    pub fn cell(&self, index: usize) -> Option<&'a str> {
        self.cells.get(index).map(String::as_str)
    }

    /// Cell by column name; `None` when the column is absent.
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.headers.iter().position(|header| header == column)?;
        self.cell(index)
    }

    /// Cell by column name, with absent columns read as the empty string.
    pub fn get_or_empty(&self, column: &str) -> &'a str {
        self.get(column).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ReferenceTable {
        ReferenceTable::from_records(vec![
            vec![("GID_0", "USA"), ("NAME_0", "United States of America")],
            vec![("GID_0", "MEX"), ("NAME_0", "Mexico")],
        ])
    }

    #[test]
    fn from_records_keeps_first_seen_column_order() {
        let table = ReferenceTable::from_records(vec![
            vec![("B", "1")],
            vec![("A", "2"), ("B", "3")],
        ]);
        assert_eq!(table.headers(), ["B", "A"]);
        let first: Vec<_> = table.records().map(|r| r.get_or_empty("A")).collect();
        assert_eq!(first, vec!["", "2"]);
    }

    #[test]
    fn level_columns_require_name_and_gid() {
        let table = sample();
        let columns = table.level_columns(0).expect("level 0 columns");
        assert_eq!(columns.name, 1);
        assert_eq!(columns.gid, 0);
        assert_eq!(columns.gid_0, Some(0));
        assert!(table.level_columns(1).is_none());
        assert!(!ReferenceTable::empty().is_usable_at(0));
    }

    #[test]
    fn short_rows_read_as_absent() {
        let table = ReferenceTable::new(
            vec!["GID_1".into(), "NAME_1".into()],
            vec![vec!["USA.1_1".into()]],
        );
        let record = table.records().next().expect("one record");
        assert_eq!(record.get("GID_1"), Some("USA.1_1"));
        assert_eq!(record.get("NAME_1"), None);
        assert_eq!(record.get_or_empty("GID_0"), "");
    }

    #[test]
    fn table_keys_order_by_version_then_level() {
        let mut keys = vec![
            TableKey::new("41", 0),
            TableKey::new("36", 2),
            TableKey::new("36", 0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                TableKey::new("36", 0),
                TableKey::new("36", 2),
                TableKey::new("41", 0),
            ]
        );
        assert_eq!(TableKey::new("41", 3).to_string(), "v41 level 3");
    }

    #[test]
    fn numeric_versions_compare_as_numbers() {
        let mut keys = vec![
            TableKey::new("100", 0),
            TableKey::new("4a", 0),
            TableKey::new("beta", 0),
            TableKey::new("36", 1),
            TableKey::new("036", 0),
            TableKey::new("36", 0),
        ];
        keys.sort();
        let versions: Vec<(&str, u8)> = keys
            .iter()
            .map(|key| (key.version.as_str(), key.level))
            .collect();
        assert_eq!(
            versions,
            vec![
                ("036", 0),
                ("36", 0),
                ("36", 1),
                ("100", 0),
                ("4a", 0),
                ("beta", 0),
            ]
        );
        assert_ne!(TableKey::new("036", 0), TableKey::new("36", 0));
    }
}
