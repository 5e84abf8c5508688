//! Data model for resolving place names against GADM-style reference tables.

pub mod error;
pub mod matching;
pub mod options;
pub mod repository;
pub mod table;

pub use error::{GadmError, Result};
pub use matching::{Match, MatchSet, Query};
pub use options::{DEFAULT_THRESHOLD, MatchOptions, TokenNormalization};
pub use repository::ReferenceTableRepository;
pub use table::{GID_0, LevelColumns, Record, ReferenceTable, TableKey, gid_column, name_column};
