//! Populate a [`ReferenceTableRepository`] from level files on disk.
//!
//! Loading never fails as a whole. A missing or unreadable file is logged,
//! recorded in the [`LoadReport`], and stored as an empty table so the match
//! engine simply finds nothing there.

use std::path::{Path, PathBuf};
use std::time::Instant;

use gadm_model::{ReferenceTable, ReferenceTableRepository, TableKey};
use tracing::{debug, info, info_span, warn};

use crate::csv_table::read_reference_table;
use crate::discovery::{discover_reference_files, reference_table_path};
use crate::error::{IngestError, Result};

/// Dataset versions searched when none are configured.
pub const DEFAULT_VERSIONS: &[&str] = &["36", "41"];

/// Deepest hierarchy level searched when none are configured.
pub const DEFAULT_MAX_LEVEL: u8 = 5;

/// Which level files to load and from where.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub data_dir: PathBuf,
    pub versions: Vec<String>,
    pub levels: Vec<u8>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            versions: DEFAULT_VERSIONS.iter().map(ToString::to_string).collect(),
            levels: (0..=DEFAULT_MAX_LEVEL).collect(),
        }
    }
}

impl LoadOptions {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_versions<I, S>(mut self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.versions = versions.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_levels(mut self, levels: impl IntoIterator<Item = u8>) -> Self {
        self.levels = levels.into_iter().collect();
        self
    }

    /// One source per configured (version, level) pair, in key order.
    pub fn sources(&self) -> Vec<TableSource> {
        let mut sources: Vec<TableSource> = self
            .versions
            .iter()
            .flat_map(|version| {
                self.levels.iter().map(move |&level| TableSource {
                    key: TableKey::new(version.clone(), level),
                    path: reference_table_path(&self.data_dir, version, level),
                })
            })
            .collect();
        sources.sort_by(|a, b| a.key.cmp(&b.key));
        sources.dedup_by(|a, b| a.key == b.key);
        sources
    }
}

/// A level file and the table key it is loaded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSource {
    pub key: TableKey,
    pub path: PathBuf,
}

/// A table that could not be loaded and was replaced by an empty one.
#[derive(Debug)]
pub struct LoadFailure {
    pub key: TableKey,
    pub path: PathBuf,
    pub error: IngestError,
}

/// Outcome of a repository load.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Sources that loaded, with their record counts.
    pub loaded: Vec<(TableSource, usize)>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct LoadResult {
    pub repository: ReferenceTableRepository,
    pub report: LoadReport,
}

/// Load every configured (version, level) file.
pub fn load_repository(options: &LoadOptions) -> LoadResult {
    load_sources(&options.sources())
}

/// Sources for every level file present in `dir`, whatever its version or
/// level.
pub fn discovered_sources(dir: &Path) -> Result<Vec<TableSource>> {
    let sources: Vec<TableSource> = discover_reference_files(dir)?
        .into_iter()
        .map(|(key, path)| TableSource { key, path })
        .collect();
    debug!(dir = %dir.display(), file_count = sources.len(), "discovered level files");
    Ok(sources)
}

/// Load the given sources; failures become empty tables.
pub fn load_sources(sources: &[TableSource]) -> LoadResult {
    let span = info_span!("load", table_count = sources.len());
    let _guard = span.enter();
    let start = Instant::now();

    let mut repository = ReferenceTableRepository::new();
    let mut report = LoadReport::default();

    for source in sources {
        match read_reference_table(&source.path) {
            Ok(table) => {
                debug!(
                    table = %source.key,
                    path = %source.path.display(),
                    records = table.len(),
                    usable = table.is_usable_at(source.key.level),
                    "loaded reference table"
                );
                report.loaded.push((source.clone(), table.len()));
                repository.insert(source.key.clone(), table);
            }
            Err(error) => {
                warn!(
                    table = %source.key,
                    path = %source.path.display(),
                    %error,
                    "loading failed; using empty table"
                );
                repository.insert(source.key.clone(), ReferenceTable::empty());
                report.failures.push(LoadFailure {
                    key: source.key.clone(),
                    path: source.path.clone(),
                    error,
                });
            }
        }
    }

    info!(
        table_count = repository.len(),
        record_count = repository.record_count(),
        failure_count = report.failures.len(),
        duration_ms = start.elapsed().as_millis(),
        "reference tables loaded"
    );
    LoadResult { repository, report }
}
