//! Library components of the `gadm` command-line tool.

pub mod export;
pub mod logging;
