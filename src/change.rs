//! Change detection: decides whether freshly arrived provider values are
//! "new enough" to fire, and produces the snapshot for the next run.

use crate::value::Value;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// How individual change flags combine into one verdict.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DetectionMode {
    /// At least one connected provider changed.
    #[default]
    Or,
    /// Every connected provider changed.
    And,
}

/// Configuration of a change detection node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangeDetectionConfig {
    pub mode: DetectionMode,
    pub active: bool,
    pub time_window_enabled: bool,
    pub time_window_millis: i64,
}

impl Default for ChangeDetectionConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Or,
            active: true,
            time_window_enabled: false,
            time_window_millis: 0,
        }
    }
}

impl ChangeDetectionConfig {
    pub fn any_change() -> Self {
        Self::default()
    }

    pub fn all_changed() -> Self {
        Self {
            mode: DetectionMode::And,
            ..Self::default()
        }
    }

    pub fn within(mut self, window_millis: i64) -> Self {
        self.time_window_enabled = true;
        self.time_window_millis = window_millis;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// The remembered value of one provider path and when it last changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub value: Option<Value>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

/// Per-path state carried from one evaluation to the next. The engine never
/// persists it; callers store it and hand it back on the next run.
pub type Snapshot = AHashMap<String, SnapshotEntry>;

/// What a change detection node decided in one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeReport {
    pub fired: bool,
    pub changed: usize,
    pub snapshot: Snapshot,
}

/// Compares live provider values against `previous` and builds the next snapshot.
///
/// `observed` holds one `(json_path, live value)` pair per connected provider.
/// A path without a previous entry always counts as changed, so the first run
/// fires. An unchanged path keeps its old entry and timestamp.
pub fn detect_changes(
    config: &ChangeDetectionConfig,
    observed: &[(&str, Option<&Value>)],
    previous: &Snapshot,
    now: i64,
) -> ChangeReport {
    let mut snapshot = Snapshot::with_capacity(observed.len());
    let mut changed = 0;

    for (path, live) in observed {
        let entry = match previous.get(*path) {
            Some(old) if old.value.as_ref() == *live => old.clone(),
            _ => {
                changed += 1;
                SnapshotEntry {
                    value: (*live).cloned(),
                    timestamp: now,
                }
            }
        };
        snapshot.insert((*path).to_string(), entry);
    }

    let total = observed.len();
    let fired = if !config.active {
        false
    } else if total == 0 {
        true
    } else if config.time_window_enabled {
        let window_start = now.saturating_sub(config.time_window_millis);
        let recent = observed
            .iter()
            .filter(|(path, _)| {
                snapshot
                    .get(*path)
                    .is_some_and(|e| e.timestamp >= window_start && e.timestamp <= now)
            })
            .count();
        combine(config.mode, recent, total)
    } else {
        combine(config.mode, changed, total)
    };

    ChangeReport {
        fired,
        changed,
        snapshot,
    }
}

fn combine(mode: DetectionMode, hits: usize, total: usize) -> bool {
    match mode {
        DetectionMode::Or => hits > 0,
        DetectionMode::And => hits == total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(value: i64, timestamp: i64) -> SnapshotEntry {
        SnapshotEntry {
            value: Some(Value::Integer(value)),
            timestamp,
        }
    }

    #[test]
    fn first_run_fires_and_records_every_path() {
        let v = Value::Integer(1);
        let report = detect_changes(
            &ChangeDetectionConfig::all_changed(),
            &[("source.a.x", Some(&v)), ("source.a.y", None)],
            &Snapshot::new(),
            100,
        );
        assert!(report.fired);
        assert_eq!(report.changed, 2);
        assert_eq!(report.snapshot["source.a.y"].value, None);
        assert_eq!(report.snapshot["source.a.x"].timestamp, 100);
    }

    #[test]
    fn unchanged_values_keep_their_old_entry() {
        let v = Value::Integer(1);
        let previous = Snapshot::from_iter([("source.a.x".to_string(), entry(1, 5))]);
        let report = detect_changes(
            &ChangeDetectionConfig::any_change(),
            &[("source.a.x", Some(&v))],
            &previous,
            100,
        );
        assert!(!report.fired);
        assert_eq!(report.snapshot["source.a.x"].timestamp, 5);
    }

    #[test]
    fn remembered_null_differs_from_no_entry() {
        let previous = Snapshot::from_iter([(
            "source.a.x".to_string(),
            SnapshotEntry {
                value: None,
                timestamp: 5,
            },
        )]);
        let report = detect_changes(
            &ChangeDetectionConfig::any_change(),
            &[("source.a.x", None)],
            &previous,
            100,
        );
        assert!(!report.fired);

        let report = detect_changes(
            &ChangeDetectionConfig::any_change(),
            &[("source.a.x", None)],
            &Snapshot::new(),
            100,
        );
        assert!(report.fired);
    }

    #[test]
    fn inactive_node_refreshes_snapshot_but_never_fires() {
        let v = Value::Integer(2);
        let previous = Snapshot::from_iter([("source.a.x".to_string(), entry(1, 5))]);
        let report = detect_changes(
            &ChangeDetectionConfig::any_change().inactive(),
            &[("source.a.x", Some(&v))],
            &previous,
            100,
        );
        assert!(!report.fired);
        assert_eq!(report.snapshot["source.a.x"], entry(2, 100));
    }

    #[test]
    fn no_providers_is_a_pass_through() {
        let report = detect_changes(
            &ChangeDetectionConfig::all_changed(),
            &[],
            &Snapshot::new(),
            100,
        );
        assert!(report.fired);
        assert!(report.snapshot.is_empty());
    }

    #[test]
    fn window_counts_recent_entries_instead_of_raw_changes() {
        let config = ChangeDetectionConfig::all_changed().within(10_000);
        let x = Value::Integer(2);
        let y = Value::Integer(1);
        // x changes now, y changed 5s ago.
        let previous = Snapshot::from_iter([
            ("source.a.x".to_string(), entry(1, 0)),
            ("source.a.y".to_string(), entry(1, 20_000)),
        ]);
        let report = detect_changes(
            &config,
            &[("source.a.x", Some(&x)), ("source.a.y", Some(&y))],
            &previous,
            25_000,
        );
        assert_eq!(report.changed, 1);
        assert!(report.fired);

        // Same situation, but y changed 12s ago.
        let previous = Snapshot::from_iter([
            ("source.a.x".to_string(), entry(1, 0)),
            ("source.a.y".to_string(), entry(1, 13_000)),
        ]);
        let report = detect_changes(
            &config,
            &[("source.a.x", Some(&x)), ("source.a.y", Some(&y))],
            &previous,
            25_000,
        );
        assert!(!report.fired);
    }
}
