//! Parse user-supplied place-name lists into queries.
//!
//! One query per line, written `Name` or `Name|GID_0`. Blank lines are
//! skipped and both parts are trimmed.

use std::path::Path;

use gadm_model::Query;

use crate::error::{IngestError, Result};

/// Separator between a place name and its scope code.
pub const DEFAULT_DELIMITER: char = '|';

/// Parse one line; `None` for blank lines.
///
/// The line is split at the first delimiter only. An empty scope part is
/// treated as no scope.
pub fn parse_query_line(line: &str, delimiter: char) -> Option<Query> {
    if line.trim().is_empty() {
        return None;
    }
    let query = match line.split_once(delimiter) {
        Some((name, scope)) => {
            let scope = scope.trim();
            Query {
                text: name.trim().to_string(),
                scope: (!scope.is_empty()).then(|| scope.to_string()),
            }
        }
        None => Query::new(line.trim()),
    };
    Some(query)
}

/// Parse a multi-line list, keeping input order.
pub fn parse_queries(text: &str, delimiter: char) -> Vec<Query> {
    text.lines()
        .filter_map(|line| parse_query_line(line, delimiter))
        .collect()
}

/// Read and parse a query list file.
pub fn read_queries(path: &Path, delimiter: char) -> Result<Vec<Query>> {
    let text = std::fs::read_to_string(path).map_err(|source| IngestError::QueryFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_queries(&text, delimiter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_with_and_without_scope() {
        let queries = parse_queries(
            "New York City|USA\n  New York  \n\nCiudad de México | MEX\n",
            DEFAULT_DELIMITER,
        );
        assert_eq!(
            queries,
            vec![
                Query::scoped("New York City", "USA"),
                Query::new("New York"),
                Query::scoped("Ciudad de México", "MEX"),
            ]
        );
    }

    #[test]
    fn splits_at_first_delimiter_only() {
        let query = parse_query_line("A|B|C", '|').expect("query");
        assert_eq!(query.text, "A");
        assert_eq!(query.scope.as_deref(), Some("B|C"));
    }

    #[test]
    fn empty_scope_becomes_none() {
        let query = parse_query_line("Paris |  ", '|').expect("query");
        assert_eq!(query, Query::new("Paris"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        assert!(parse_query_line("   \t", '|').is_none());
        assert!(parse_queries("\n\n  \n", '|').is_empty());
    }

    #[test]
    fn custom_delimiter() {
        let queries = parse_queries("Lyon;FRA\nParis", ';');
        assert_eq!(queries, vec![Query::scoped("Lyon", "FRA"), Query::new("Paris")]);
    }

    #[test]
    fn name_may_be_empty_when_only_scope_is_given() {
        let query = parse_query_line("|USA", '|').expect("query");
        assert_eq!(query, Query::scoped("", "USA"));
    }
}
