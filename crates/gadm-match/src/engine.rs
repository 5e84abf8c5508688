//! Batch matching across every query and every reference table.
//!
//! The engine schedules one scan per (table, query) pair, tables in
//! (version, level) order and queries in batch order, then ranks the
//! combined output by query text ascending and score descending. The sort is
//! stable, so equal-score matches for one query keep scan order.

use std::time::{Duration, Instant};

use gadm_model::{
    Match, MatchOptions, MatchSet, Query, ReferenceTable, ReferenceTableRepository, TableKey,
};
use rayon::prelude::*;
use tracing::{debug, info, info_span, trace, warn};

use crate::matcher::TableMatcher;
use crate::score::{SimilarityScorer, TokenSetScorer};

/// Orchestrates [`TableMatcher`] over a batch of queries and a repository of
/// reference tables.
#[derive(Debug, Clone)]
pub struct BatchMatchEngine<S = TokenSetScorer> {
    scorer: S,
    options: MatchOptions,
}

impl BatchMatchEngine<TokenSetScorer> {
    /// Engine with the default token-set scorer, configured from `options`.
    pub fn new(options: MatchOptions) -> Self {
        let scorer = TokenSetScorer::with_normalization(options.normalization);
        Self { scorer, options }
    }
}

impl Default for BatchMatchEngine<TokenSetScorer> {
    fn default() -> Self {
        Self::new(MatchOptions::default())
    }
}

struct ScanJob<'a> {
    key: &'a TableKey,
    table: &'a ReferenceTable,
    query: &'a Query,
}

impl<S: SimilarityScorer> BatchMatchEngine<S> {
    pub fn with_scorer(scorer: S, options: MatchOptions) -> Self {
        Self { scorer, options }
    }

    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Run every query against every table and rank the results.
    ///
    /// Never fails: unusable tables contribute nothing and an empty batch
    /// yields an empty set. When a time budget is configured and runs out,
    /// the matches found so far are returned and the remaining scans are
    /// counted in [`MatchSet::skipped_scans`].
    pub fn run(&self, queries: &[Query], tables: &ReferenceTableRepository) -> MatchSet {
        let span = info_span!(
            "match_run",
            queries = queries.len(),
            tables = tables.len(),
            threshold = self.options.threshold
        );
        let _guard = span.enter();

        if queries.is_empty() {
            debug!("empty query batch");
            return MatchSet::default();
        }

        for (key, table) in tables.iter() {
            if !table.is_usable_at(key.level) {
                debug!(
                    table = %key,
                    records = table.len(),
                    "table lacks level columns; it cannot match"
                );
            }
        }

        let start = Instant::now();
        let deadline = self
            .options
            .time_budget
            .and_then(|budget| start.checked_add(budget));

        let jobs: Vec<ScanJob<'_>> = tables
            .iter()
            .flat_map(|(key, table)| queries.iter().map(move |query| ScanJob { key, table, query }))
            .collect();

        let results: Vec<Option<Vec<Match>>> = if self.options.parallel {
            jobs.par_iter().map(|job| self.scan(job, deadline)).collect()
        } else {
            jobs.iter().map(|job| self.scan(job, deadline)).collect()
        };

        let mut matches = Vec::new();
        let mut skipped_scans = 0usize;
        for result in results {
            match result {
                Some(found) => matches.extend(found),
                None => skipped_scans += 1,
            }
        }
        rank(&mut matches);

        if skipped_scans > 0 {
            warn!(
                skipped_scans,
                scheduled_scans = jobs.len(),
                budget_ms = self.options.time_budget.map(|budget| budget.as_millis()),
                "time budget exhausted; returning partial results"
            );
        }
        info!(
            match_count = matches.len(),
            scans = jobs.len() - skipped_scans,
            duration_ms = start.elapsed().as_millis(),
            "match run complete"
        );
        MatchSet::partial(matches, skipped_scans)
    }

    fn scan(&self, job: &ScanJob<'_>, deadline: Option<Instant>) -> Option<Vec<Match>> {
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return None;
        }
        trace!(table = %job.key, query = %job.query.text, "scanning");
        Some(TableMatcher::new(&self.scorer).find_matches(
            &job.query.text,
            job.table,
            job.key.level,
            &job.key.version,
            self.options.threshold,
            job.query.effective_scope(),
        ))
    }
}

/// Stable sort: query text ascending, then score descending.
pub fn rank(matches: &mut [Match]) {
    matches.sort_by(|a, b| a.query.cmp(&b.query).then_with(|| b.score.cmp(&a.score)));
}

/// Run a batch with the default scorer and the given threshold.
pub fn run(queries: &[Query], tables: &ReferenceTableRepository, threshold: u8) -> MatchSet {
    BatchMatchEngine::new(MatchOptions::default().with_threshold(threshold)).run(queries, tables)
}

/// Run a batch, stopping new scans once `budget` has elapsed.
pub fn run_with_budget(
    queries: &[Query],
    tables: &ReferenceTableRepository,
    threshold: u8,
    budget: Duration,
) -> MatchSet {
    let options = MatchOptions::default()
        .with_threshold(threshold)
        .with_time_budget(Some(budget));
    BatchMatchEngine::new(options).run(queries, tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(query: &str, gid: &str, score: u8) -> Match {
        Match {
            query: query.to_string(),
            version: "41".to_string(),
            level: 0,
            gid_0: String::new(),
            gid: gid.to_string(),
            matched_name: String::new(),
            score,
        }
    }

    #[test]
    fn rank_groups_by_query_then_score() {
        let mut matches = vec![
            hit("b", "1", 90),
            hit("a", "2", 80),
            hit("a", "3", 95),
            hit("b", "4", 99),
        ];
        rank(&mut matches);
        let order: Vec<&str> = matches.iter().map(|m| m.gid.as_str()).collect();
        assert_eq!(order, vec!["3", "2", "4", "1"]);
    }

    #[test]
    fn rank_keeps_insertion_order_for_ties() {
        let mut matches = vec![
            hit("a", "first", 90),
            hit("a", "second", 90),
            hit("a", "top", 100),
        ];
        rank(&mut matches);
        let order: Vec<&str> = matches.iter().map(|m| m.gid.as_str()).collect();
        assert_eq!(order, vec!["top", "first", "second"]);
    }

    #[test]
    fn default_engine_uses_raw_token_set_scoring() {
        let engine = BatchMatchEngine::<TokenSetScorer>::default();
        assert_eq!(engine.options().threshold, 80);
        assert_eq!(engine.scorer().normalization(), gadm_model::TokenNormalization::None);
    }
}
