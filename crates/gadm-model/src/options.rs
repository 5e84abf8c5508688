//! Configuration options for match runs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{GadmError, Result};

/// Threshold used when none is configured.
pub const DEFAULT_THRESHOLD: u8 = 80;

/// Text preparation applied by the scorer before tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TokenNormalization {
    /// Compare the strings as given (case-sensitive).
    #[default]
    None,
    /// Lowercase and replace non-alphanumeric characters with spaces.
    Processed,
}

/// Options controlling a batch match run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Minimum score (0 to 100) a candidate needs to be reported.
    pub threshold: u8,

    /// Preprocessing applied by the default scorer.
    pub normalization: TokenNormalization,

    /// Scan (table, query) pairs on the rayon thread pool.
    pub parallel: bool,

    /// Wall-clock budget for the whole run. Scans that would start after
    /// the budget is spent are skipped; finished scans are kept.
    pub time_budget: Option<Duration>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            normalization: TokenNormalization::None,
            parallel: true,
            time_budget: None,
        }
    }
}

impl MatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_normalization(mut self, normalization: TokenNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, enable: bool) -> Self {
        self.parallel = enable;
        self
    }

    #[must_use]
    pub fn with_time_budget(mut self, budget: Option<Duration>) -> Self {
        self.time_budget = budget;
        self
    }

    /// Strict validation for callers that want out-of-range input rejected.
    ///
    /// The engine itself accepts any threshold; above 100 nothing matches.
    pub fn validate(&self) -> Result<()> {
        if self.threshold > 100 {
            return Err(GadmError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_interactive_tool() {
        let options = MatchOptions::default();
        assert_eq!(options.threshold, 80);
        assert_eq!(options.normalization, TokenNormalization::None);
        assert!(options.parallel);
        assert!(options.time_budget.is_none());
    }

    #[test]
    fn validate_rejects_thresholds_above_100() {
        assert!(MatchOptions::new().with_threshold(100).validate().is_ok());
        assert_eq!(
            MatchOptions::new().with_threshold(101).validate(),
            Err(GadmError::InvalidThreshold(101))
        );
    }
}
