//! Observation records and the stores that supply them
//!
//! An [`ObservationSequence`] holds one entity's most recent records, most
//! recent first. Each record maps metric name to value. The graph builder only
//! reads sequences through the [`ObservationStore`] trait, so game logs can
//! come from CSV files on disk ([`CsvLogStore`]) or be constructed in memory
//! ([`InMemoryStore`]).

use crate::config::TrackedProp;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// One observation: metric name → numeric value
pub type Observation = HashMap<String, f64>;

/// Ordered records for one entity, most recent first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationSequence {
    records: Vec<Observation>,
}

impl ObservationSequence {
    pub fn new(records: Vec<Observation>) -> Self {
        Self { records }
    }

    /// Build a sequence holding a single metric, one record per value
    pub fn from_metric(metric: &str, values: &[f64]) -> Self {
        Self {
            records: values
                .iter()
                .map(|&v| Observation::from([(metric.to_string(), v)]))
                .collect(),
        }
    }

    /// Keep only the `window` most recent records
    pub fn truncated(mut self, window: usize) -> Self {
        self.records.truncate(window);
        self
    }

    pub fn records(&self) -> &[Observation] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any record carries `metric`
    pub fn has_metric(&self, metric: &str) -> bool {
        self.records.iter().any(|r| r.contains_key(metric))
    }

    /// Per-record hit flags for `prop`, with absent values counting as misses
    pub fn hits(&self, prop: &TrackedProp) -> Vec<bool> {
        self.records
            .iter()
            .map(|r| r.get(&prop.metric).is_some_and(|&v| prop.is_hit(v)))
            .collect()
    }
}

/// Source of per-entity observation sequences
pub trait ObservationStore {
    /// Sequence for `entity`, or `None` when the store has no data for it
    fn sequence(&self, entity: &str) -> Option<ObservationSequence>;
}

/// HashMap-backed store
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    sequences: HashMap<String, ObservationSequence>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity: impl Into<String>, sequence: ObservationSequence) {
        self.sequences.insert(entity.into(), sequence);
    }

    pub fn with(mut self, entity: impl Into<String>, sequence: ObservationSequence) -> Self {
        self.insert(entity, sequence);
        self
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl ObservationStore for InMemoryStore {
    fn sequence(&self, entity: &str) -> Option<ObservationSequence> {
        self.sequences.get(entity).cloned()
    }
}

/// Store backed by a directory of per-entity CSV game logs
///
/// `LeBron_James.csv` holds the logs for `LeBron James`. The first row is the
/// header; later rows are games, most recent first. Only numeric cells are
/// kept, so date and matchup columns simply never appear as metrics.
#[derive(Debug, Clone, Default)]
pub struct CsvLogStore {
    inner: InMemoryStore,
}

impl CsvLogStore {
    /// Load every `*.csv` file in `dir`, keeping the `window` most recent rows
    ///
    /// # Errors
    /// Returns error if `dir` can't be read. Individual files that can't be read
    /// are skipped with a warning.
    pub fn from_dir<P: AsRef<Path>>(dir: P, window: usize) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir)
            .with_context(|| format!("Failed to read log directory: {}", dir.display()))?;

        let mut inner = InMemoryStore::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list log directory: {}", dir.display()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            let Some(entity) = entity_from_file_stem(&path) else {
                continue;
            };

            match fs::read_to_string(&path) {
                Ok(content) => {
                    let sequence = parse_csv_log(&content).truncated(window);
                    tracing::debug!(
                        "Loaded {} record(s) for {} from {}",
                        sequence.len(),
                        entity,
                        path.display()
                    );
                    inner.insert(entity, sequence);
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable log {}: {}", path.display(), e);
                }
            }
        }

        Ok(Self { inner })
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl ObservationStore for CsvLogStore {
    fn sequence(&self, entity: &str) -> Option<ObservationSequence> {
        self.inner.sequence(entity)
    }
}

/// `Jamal_Murray.csv` → `Jamal Murray`
fn entity_from_file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.replace('_', " "))
}

/// Parse CSV text with a header row into an observation sequence
pub fn parse_csv_log(content: &str) -> ObservationSequence {
    let mut lines = content.lines().filter(|l| !l.trim().is_empty());
    let Some(header) = lines.next() else {
        return ObservationSequence::default();
    };
    let columns = split_csv_row(header);

    let records = lines
        .map(|line| {
            columns
                .iter()
                .zip(split_csv_row(line))
                .filter_map(|(column, cell)| {
                    cell.trim()
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| (column.trim().to_string(), v))
                })
                .collect()
        })
        .collect();

    ObservationSequence::new(records)
}

/// Split one CSV row (handles quoted fields, embedded commas and doubled quotes)
fn split_csv_row(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            ('"', _) => in_quotes = !in_quotes,
            (',', false) => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_metric() {
        let seq = ObservationSequence::from_metric("PTS", &[30.0, 20.0]);
        assert_eq!(seq.len(), 2);
        assert!(seq.has_metric("PTS"));
        assert!(!seq.has_metric("REB"));
        assert_eq!(seq.hits(&TrackedProp::new("A", "PTS", 25.5)), vec![true, false]);
    }

    #[test]
    fn test_hits_absent_value_is_miss() {
        let seq = ObservationSequence::new(vec![
            Observation::from([("PTS".to_string(), 30.0)]),
            Observation::new(),
        ]);
        assert_eq!(seq.hits(&TrackedProp::new("A", "PTS", 10.0)), vec![true, false]);
    }

    #[test]
    fn test_hits_require_strictly_greater() {
        let seq = ObservationSequence::from_metric("FG3M", &[3.5, 4.0, 3.0]);
        let prop = TrackedProp::new("Derrick White", "FG3M", 3.5);
        assert_eq!(seq.hits(&prop), vec![false, true, false]);
        assert!(seq.hits(&TrackedProp::new("Derrick White", "AST", 0.0)).iter().all(|h| !h));
    }

    #[test]
    fn test_truncated() {
        let seq = ObservationSequence::from_metric("PTS", &[1.0, 2.0, 3.0]).truncated(2);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.records()[1]["PTS"], 2.0);
    }

    #[test]
    fn test_split_csv_row_quotes() {
        let fields = split_csv_row(r#"a,"b, c","say ""hi""",d"#);
        assert_eq!(fields, vec!["a", "b, c", r#"say "hi""#, "d"]);
    }

    #[test]
    fn test_parse_csv_log_keeps_numeric_cells() {
        let csv = "GAME_DATE,MATCHUP,PTS,REB\n\
                   \"APR 14, 2024\",LAL @ NOP,28,8\n\
                   \"APR 12, 2024\",LAL vs. MEM,,11\n";
        let seq = parse_csv_log(csv);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.records()[0]["PTS"], 28.0);
        assert!(!seq.records()[0].contains_key("MATCHUP"));
        assert!(!seq.records()[0].contains_key("GAME_DATE"));
        assert!(!seq.records()[1].contains_key("PTS"));
        assert_eq!(seq.records()[1]["REB"], 11.0);
    }

    #[test]
    fn test_parse_csv_log_empty() {
        assert!(parse_csv_log("").is_empty());
        assert!(parse_csv_log("PTS,REB\n").is_empty());
    }

    #[test]
    fn test_entity_from_file_stem() {
        assert_eq!(
            entity_from_file_stem(Path::new("logs/D'Angelo_Russell.csv")).as_deref(),
            Some("D'Angelo Russell")
        );
    }

    #[test]
    fn test_in_memory_store() {
        let store = InMemoryStore::new().with("A", ObservationSequence::from_metric("PTS", &[1.0]));
        assert_eq!(store.len(), 1);
        assert!(store.sequence("A").is_some());
        assert!(store.sequence("B").is_none());
    }

    #[test]
    fn test_csv_store_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Jalen_Brunson.csv"),
            "GAME_DATE,PTS\n\"MAR 02, 2025\",31\nMAR 01,22\nFEB 27,28\n",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let store = CsvLogStore::from_dir(dir.path(), 2).unwrap();
        assert_eq!(store.len(), 1);
        let seq = store.sequence("Jalen Brunson").unwrap();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.records()[0]["PTS"], 31.0);
    }

    #[test]
    fn test_csv_store_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = CsvLogStore::from_dir(dir.path().join("missing"), 10).unwrap_err();
        assert!(err.to_string().contains("Failed to read log directory"));
    }
}
