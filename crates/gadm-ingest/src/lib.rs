//! Loading GADM level files and parsing place-name query lists.

pub mod csv_table;
pub mod discovery;
pub mod error;
pub mod loader;
pub mod query;

pub use csv_table::read_reference_table;
pub use discovery::{discover_reference_files, parse_table_file_name, reference_table_path};
pub use error::{IngestError, Result};
pub use loader::{
    DEFAULT_MAX_LEVEL, DEFAULT_VERSIONS, LoadFailure, LoadOptions, LoadReport, LoadResult,
    TableSource, discovered_sources, load_repository, load_sources,
};
pub use query::{DEFAULT_DELIMITER, parse_queries, parse_query_line, read_queries};
