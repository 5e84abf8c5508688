//! Query and match types for place-name resolution.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A place name to resolve, optionally scoped to one top-level region code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Free-text place name as supplied by the user.
    pub text: String,
    /// Exact-match filter on `GID_0` (e.g. "USA").
    pub scope: Option<String>,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scope: None,
        }
    }

    pub fn scoped(text: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            scope: Some(scope.into()),
        }
    }

    /// The scope filter to apply, treating an empty scope as none.
    pub fn effective_scope(&self) -> Option<&str> {
        self.scope.as_deref().filter(|scope| !scope.is_empty())
    }
}

/// One query scored against one reference record.
///
/// Field names follow the export columns of the match report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub query: String,
    pub version: String,
    pub level: u8,
    /// Scope code of the matched record (empty when the table has no `GID_0`).
    #[serde(rename = "GID_0")]
    pub gid_0: String,
    /// Identifier of the matched record at its level.
    #[serde(rename = "GID")]
    pub gid: String,
    pub matched_name: String,
    /// Similarity score, 0 to 100.
    pub score: u8,
}

/// The ranked result of a batch run.
///
/// Matches are grouped by query text (ascending) and ordered by score
/// (descending) within each group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSet {
    pub matches: Vec<Match>,
    /// Table scans not executed because the run's time budget expired.
    #[serde(default)]
    pub skipped_scans: usize,
}

impl MatchSet {
    pub fn new(matches: Vec<Match>) -> Self {
        Self {
            matches,
            skipped_scans: 0,
        }
    }

    pub fn partial(matches: Vec<Match>, skipped_scans: usize) -> Self {
        Self {
            matches,
            skipped_scans,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// True when every scheduled scan ran.
    pub fn is_complete(&self) -> bool {
        self.skipped_scans == 0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Match> {
        self.matches.iter()
    }

    /// Number of distinct query texts with at least one match.
    pub fn query_count(&self) -> usize {
        self.matches
            .iter()
            .map(|m| m.query.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Check the ranking order: query ascending, then score descending.
    pub fn is_ranked(&self) -> bool {
        self.matches.windows(2).all(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            a.query < b.query || (a.query == b.query && a.score >= b.score)
        })
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a Match;
    type IntoIter = std::slice::Iter<'a, Match>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(query: &str, score: u8) -> Match {
        Match {
            query: query.to_string(),
            version: "41".to_string(),
            level: 0,
            gid_0: "USA".to_string(),
            gid: "USA".to_string(),
            matched_name: "United States".to_string(),
            score,
        }
    }

    #[test]
    fn empty_scope_is_not_a_filter() {
        assert_eq!(Query::scoped("Paris", "").effective_scope(), None);
        assert_eq!(Query::scoped("Paris", "FRA").effective_scope(), Some("FRA"));
        assert_eq!(Query::new("Paris").effective_scope(), None);
    }

    #[test]
    fn ranking_check_detects_out_of_order_scores() {
        let ranked = MatchSet::new(vec![hit("a", 90), hit("a", 80), hit("b", 100)]);
        assert!(ranked.is_ranked());
        assert_eq!(ranked.query_count(), 2);

        let unranked = MatchSet::new(vec![hit("a", 80), hit("a", 90)]);
        assert!(!unranked.is_ranked());

        let wrong_group = MatchSet::new(vec![hit("b", 80), hit("a", 90)]);
        assert!(!wrong_group.is_ranked());
    }

    #[test]
    fn match_serializes_with_report_column_names() {
        let json = serde_json::to_value(hit("x", 77)).expect("serialize match");
        assert_eq!(json["GID_0"], "USA");
        assert_eq!(json["GID"], "USA");
        assert_eq!(json["score"], 77);
    }
}
