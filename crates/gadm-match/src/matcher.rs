//! Single-table matching: scan one (version, level) table for one query.

use gadm_model::{Match, ReferenceTable};
use tracing::trace;

use crate::score::{SimilarityScorer, TokenSetScorer};

/// Scans one reference table and emits every record scoring at or above a
/// threshold, in table order.
#[derive(Debug, Clone, Copy)]
pub struct TableMatcher<'s, S: ?Sized> {
    scorer: &'s S,
}

impl<'s, S: SimilarityScorer + ?Sized> TableMatcher<'s, S> {
    pub fn new(scorer: &'s S) -> Self {
        Self { scorer }
    }

    /// Match `query` against the `NAME_{level}` column of `table`.
    ///
    /// A table without `NAME_{level}` or `GID_{level}` yields nothing. With a
    /// non-empty `scope`, records whose `GID_0` is absent or differs are
    /// skipped before scoring.
    pub fn find_matches(
        &self,
        query: &str,
        table: &ReferenceTable,
        level: u8,
        version: &str,
        threshold: u8,
        scope: Option<&str>,
    ) -> Vec<Match> {
        let Some(columns) = table.level_columns(level) else {
            return Vec::new();
        };
        let scope = scope.filter(|scope| !scope.is_empty());

        let mut matches = Vec::new();
        for record in table.records() {
            let gid_0 = columns.gid_0.and_then(|idx| record.cell(idx));
            if let Some(scope) = scope
                && gid_0 != Some(scope)
            {
                continue;
            }

            let name = record.cell(columns.name).unwrap_or("");
            let score = self.scorer.score(query, name);
            if score < threshold {
                continue;
            }
            matches.push(Match {
                query: query.to_string(),
                version: version.to_string(),
                level,
                gid_0: gid_0.unwrap_or("").to_string(),
                gid: record.cell(columns.gid).unwrap_or("").to_string(),
                matched_name: name.to_string(),
                score,
            });
        }

        trace!(
            version,
            level,
            records = table.len(),
            matches = matches.len(),
            "table scan complete"
        );
        matches
    }
}

/// Match one query against one table with the default token-set scorer.
pub fn find_matches(
    query: &str,
    table: &ReferenceTable,
    level: u8,
    version: &str,
    threshold: u8,
    scope: Option<&str>,
) -> Vec<Match> {
    TableMatcher::new(&TokenSetScorer::new()).find_matches(
        query, table, level, version, threshold, scope,
    )
}
