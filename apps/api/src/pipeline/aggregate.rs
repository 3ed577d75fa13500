//! Result Aggregator & Ranker — deterministic merge and ordering.
//!
//! Entries are built in arrival order by the scheduler and sorted by
//! descending score here. `sort_by` is stable, so equal scores keep their
//! arrival order. The outcome is read-only once produced.

use super::DocumentError;
use crate::intake::identifier::DocId;

/// One line of the final scorecard.
#[derive(Debug, Clone)]
pub struct RankedEntry {
    pub document_id: DocId,
    pub display_name: String,
    pub numeric_score: u32,
    /// Stage-1 aspects, kept for persistence. Absent when stage 1 failed.
    pub key_aspects: Option<String>,
    pub error: Option<DocumentError>,
}

/// The externally visible result of one batch: exactly one entry per input
/// document, ranked best-first.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub entries: Vec<RankedEntry>,
}

/// Ranks entries by descending score, stable on ties.
pub fn rank(mut entries: Vec<RankedEntry>) -> BatchOutcome {
    entries.sort_by(|a, b| b.numeric_score.cmp(&a.numeric_score));
    BatchOutcome { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, score: u32) -> RankedEntry {
        RankedEntry {
            document_id: DocId::fixed(name),
            display_name: name.to_string(),
            numeric_score: score,
            key_aspects: None,
            error: None,
        }
    }

    #[test]
    fn test_sorted_by_descending_score() {
        let outcome = rank(vec![entry("low", 10), entry("high", 90), entry("mid", 50)]);
        let names: Vec<&str> = outcome
            .entries
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_arrival_order() {
        let outcome = rank(vec![
            entry("first", 40),
            entry("second", 40),
            entry("third", 40),
            entry("winner", 41),
        ]);
        let names: Vec<&str> = outcome
            .entries
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(names, vec!["winner", "first", "second", "third"]);
    }

    #[test]
    fn test_entry_count_is_preserved() {
        let entries: Vec<RankedEntry> = (0..25)
            .map(|i| entry(&format!("doc-{i}"), (i * 7 % 100) as u32))
            .collect();
        assert_eq!(rank(entries).entries.len(), 25);
    }

    #[test]
    fn test_empty_batch_is_an_empty_scorecard() {
        assert!(rank(Vec::new()).entries.is_empty());
    }
}
