use std::path::PathBuf;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::core::entry::DatabaseEntry;
use crate::core::sequence::MoveSequence;
use crate::core::types::EntryId;
use crate::database::store::GameDatabase;
use crate::matching::scoring::similarity;
use crate::matching::symmetry::{expand, SymmetryVariant};

/// Default number of opening moves compared
pub const DEFAULT_MAX_MOVES: usize = 500;

/// Default number of ranked results returned
pub const DEFAULT_RESULT_LIMIT: usize = 10;

/// Best score of the query against one database entry
#[derive(Debug, Clone, Serialize)]
pub struct ScoreRow {
    /// Identifier of the database entry
    pub id: EntryId,

    /// Originating file, if the entry was read from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Best similarity over all query variants, in `[0, 100]`
    pub score: f64,

    /// Label of the first variant that reached `score`, if any scored above 0
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

/// Configuration for one matching run
#[derive(Debug, Clone, Serialize)]
pub struct MatchingConfig {
    /// Number of opening moves of the query that are compared
    pub max_moves: usize,
    /// Number of ranked results returned by [`MatchingEngine::find_matches`]
    pub result_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_moves: DEFAULT_MAX_MOVES,
            result_limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// The ranking engine: scores a query against every database entry
pub struct MatchingEngine<'a> {
    database: &'a GameDatabase,
    /// Configuration including move cutoff and result limit
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(database: &'a GameDatabase) -> Self {
        Self {
            database,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(database: &'a GameDatabase, config: MatchingConfig) -> Self {
        Self { database, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// The 16 symmetry variants of the query, cut to the configured move count
    pub fn expand_query(&self, query: &MoveSequence) -> Vec<SymmetryVariant> {
        expand(&query.truncated(self.config.max_moves))
    }

    /// Score every database entry against a set of query variants
    ///
    /// Each entry's score is the maximum similarity reached by any variant,
    /// starting from 0. Rows are returned in database order.
    pub fn score_variants(&self, variants: &[SymmetryVariant]) -> Vec<ScoreRow> {
        debug!(
            variants = variants.len(),
            entries = self.database.len(),
            "Scoring query variants against database"
        );

        self.database
            .entries()
            .par_iter()
            .map(|entry| best_row(entry, variants))
            .collect()
    }

    /// Find the best matching entries for a query
    ///
    /// Scores are sorted descending; entries with equal scores keep their
    /// database order. At most `limit` rows are returned.
    pub fn find_matches(&self, query: &MoveSequence, limit: usize) -> Vec<ScoreRow> {
        let variants = self.expand_query(query);
        let rows = self.score_variants(&variants);
        rank(rows, limit)
    }

    /// Find matches using the configured result limit
    pub fn find_top_matches(&self, query: &MoveSequence) -> Vec<ScoreRow> {
        self.find_matches(query, self.config.result_limit)
    }
}

fn best_row(entry: &DatabaseEntry, variants: &[SymmetryVariant]) -> ScoreRow {
    let mut score = 0.0;
    let mut best: Option<&SymmetryVariant> = None;

    for variant in variants {
        let candidate = similarity(&variant.moves, &entry.moves);
        // Keep the running score unless the new one is strictly higher
        if candidate > score {
            score = candidate;
            best = Some(variant);
        }
    }

    ScoreRow {
        id: entry.id.clone(),
        path: entry.path.clone(),
        score,
        variant: best.map(SymmetryVariant::label),
    }
}

/// Stable sort by score descending, then keep the first `limit` rows
pub fn rank(mut rows: Vec<ScoreRow>, limit: usize) -> Vec<ScoreRow> {
    rows.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    rows.truncate(limit);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::sgf::parse_record_text;

    fn seq(text: &str) -> MoveSequence {
        parse_record_text(text, 500).unwrap()
    }

    fn make_test_database() -> GameDatabase {
        GameDatabase::from_entries(vec![
            DatabaseEntry::new("upper-right.sgf", seq("(;B[pd])")),
            DatabaseEntry::new("lower-left.sgf", seq("(;B[dp])")),
            DatabaseEntry::new("corner.sgf", seq("(;B[aa])")),
        ])
    }

    #[test]
    fn test_rotation_siblings_tie_at_top() {
        let database = make_test_database();
        let engine = MatchingEngine::new(&database);

        let matches = engine.find_matches(&seq("(;B[pd])"), 3);
        assert_eq!(matches.len(), 3);

        assert_eq!(matches[0].id, EntryId::new("upper-right.sgf"));
        assert_eq!(matches[1].id, EntryId::new("lower-left.sgf"));
        assert_eq!(matches[2].id, EntryId::new("corner.sgf"));

        assert!((matches[0].score - 100.0).abs() < 1e-9);
        assert!((matches[1].score - 100.0).abs() < 1e-9);
        assert!(matches[2].score < matches[1].score);
    }

    #[test]
    fn test_score_variants_keeps_database_order() {
        let database = make_test_database();
        let engine = MatchingEngine::new(&database);

        let rows = engine.score_variants(&engine.expand_query(&seq("(;B[aa])")));
        let ids: Vec<&str> = rows.iter().map(|r| r.id.0.as_str()).collect();
        assert_eq!(ids, vec!["upper-right.sgf", "lower-left.sgf", "corner.sgf"]);
        assert!((rows[2].score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_best_variant_label() {
        let database = make_test_database();
        let engine = MatchingEngine::new(&database);

        let rows = engine.score_variants(&engine.expand_query(&seq("(;B[pd])")));
        assert_eq!(rows[0].variant.as_deref(), Some("identity"));
        // pd -> dp: first reached by the transpose
        assert_eq!(rows[1].variant.as_deref(), Some("t"));
        // Nothing scores above zero against the corner
        assert_eq!(rows[2].variant, None);
        assert!(rows[2].score.abs() < 1e-9);
    }

    #[test]
    fn test_color_swapped_record_scores_full() {
        let database = GameDatabase::from_entries(vec![DatabaseEntry::new(
            "swapped.sgf",
            seq("(;B[dd];W[pd];B[dp];W[pp])"),
        )]);
        let engine = MatchingEngine::new(&database);

        let matches = engine.find_matches(&seq("(;B[pd];W[dd];B[pp];W[dp])"), 1);
        assert!((matches[0].score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_find_matches_limit() {
        let database = make_test_database();
        let engine = MatchingEngine::new(&database);
        assert_eq!(engine.find_matches(&seq("(;B[pd])"), 1).len(), 1);
        assert!(engine.find_matches(&seq("(;B[pd])"), 0).is_empty());
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let database = make_test_database();
        let engine = MatchingEngine::new(&database);
        let query = seq("(;B[pd];W[dd])");

        let first: Vec<(EntryId, u64)> = engine
            .find_matches(&query, 3)
            .into_iter()
            .map(|r| (r.id, r.score.to_bits()))
            .collect();
        let second: Vec<(EntryId, u64)> = engine
            .find_matches(&query, 3)
            .into_iter()
            .map(|r| (r.id, r.score.to_bits()))
            .collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_query_truncated_to_config() {
        let database = GameDatabase::from_entries(vec![DatabaseEntry::new(
            "short.sgf",
            seq("(;B[pd])"),
        )]);
        let config = MatchingConfig {
            max_moves: 1,
            result_limit: 5,
        };
        let engine = MatchingEngine::with_config(&database, config);

        let matches = engine.find_top_matches(&seq("(;B[pd];W[dd];B[pp])"));
        assert!((matches[0].score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_database() {
        let database = GameDatabase::default();
        let engine = MatchingEngine::new(&database);
        assert!(engine.find_matches(&seq("(;B[pd])"), 10).is_empty());
    }
}
