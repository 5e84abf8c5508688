//! In-memory collection of reference tables.
//!
//! The repository is filled once by a loader at process start and then
//! shared by reference with every match run. Nothing here re-fetches or
//! caches behind the caller's back.

use std::collections::BTreeMap;

use crate::table::{ReferenceTable, TableKey};

/// Reference tables keyed by (version, level), iterated in key order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTableRepository {
    tables: BTreeMap<TableKey, ReferenceTable>,
}

impl ReferenceTableRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table, returning the previous one.
    pub fn insert(&mut self, key: TableKey, table: ReferenceTable) -> Option<ReferenceTable> {
        self.tables.insert(key, table)
    }

    pub fn get(&self, key: &TableKey) -> Option<&ReferenceTable> {
        self.tables.get(key)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &TableKey> {
        self.tables.keys()
    }

    /// Tables in search order (version, then level).
    pub fn iter(&self) -> impl Iterator<Item = (&TableKey, &ReferenceTable)> {
        self.tables.iter()
    }

    /// Total number of records across all tables.
    pub fn record_count(&self) -> usize {
        self.tables.values().map(ReferenceTable::len).sum()
    }
}

impl FromIterator<(TableKey, ReferenceTable)> for ReferenceTableRepository {
    fn from_iter<I: IntoIterator<Item = (TableKey, ReferenceTable)>>(iter: I) -> Self {
        Self {
            tables: iter.into_iter().collect(),
        }
    }
}
