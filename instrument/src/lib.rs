//! Instrumentation for recording what the labor controller changed.
//!
//! A `tracing` subscriber picks up the controller's structured events and
//! keeps them as typed rows:
//! - `assignment`: one row per labor flag flipped
//! - `pass`: one row per completed pass
//!
//! # Usage
//!
//! ```ignore
//! // In controller code:
//! tracing::info!(target: "assignment", tick, unit, labor = "cook", enabled = true, reason = "deficit");
//!
//! // In test:
//! let log = instrument::record(|| {
//!     // ... run passes ...
//! });
//! let per_labor = log.changes_by_labor()?;
//! ```

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Record};
use tracing::{Event, Id, Metadata, Subscriber};

pub const ASSIGNMENT_TARGET: &str = "assignment";
pub const PASS_TARGET: &str = "pass";

// === ROWS ===

/// One labor flag flipped on one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentRow {
    pub tick: u64,
    pub unit: u64,
    pub labor: String,
    pub enabled: bool,
    pub reason: String,
}

/// Totals for one completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRow {
    pub tick: u64,
    pub eligible: u64,
    pub enabled: u64,
    pub disabled: u64,
    pub fallback: u64,
}

impl PassRow {
    pub fn changes(&self) -> u64 {
        self.enabled + self.disabled + self.fallback
    }
}

/// Everything recorded on this thread since the last drain.
#[derive(Debug, Clone, Default)]
pub struct PassLog {
    pub assignments: Vec<AssignmentRow>,
    pub passes: Vec<PassRow>,
}

impl PassLog {
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.passes.is_empty()
    }

    /// Assignment rows for one labor, in recording order.
    pub fn changes_for<'a>(&'a self, labor: &'a str) -> impl Iterator<Item = &'a AssignmentRow> {
        self.assignments.iter().filter(move |row| row.labor == labor)
    }
}

thread_local! {
    static LOG: RefCell<PassLog> = RefCell::default();
}

// === EVENT DECODING ===

/// Field values captured from one event, keyed by field name.
#[derive(Default)]
struct EventFields {
    numbers: HashMap<&'static str, u64>,
    flags: HashMap<&'static str, bool>,
    text: HashMap<&'static str, String>,
}

impl EventFields {
    fn number(&self, name: &str) -> u64 {
        self.numbers.get(name).copied().unwrap_or(0)
    }

    fn flag(&self, name: &str) -> bool {
        self.flags.get(name).copied().unwrap_or(false)
    }

    fn text(&self, name: &str) -> String {
        self.text.get(name).cloned().unwrap_or_default()
    }
}

impl Visit for EventFields {
    fn record_u64(&mut self, field: &Field, value: u64) {
        self.numbers.insert(field.name(), value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        // Counters are never negative; clamp anything odd to zero.
        self.numbers.insert(field.name(), value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.flags.insert(field.name(), value);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.text.insert(field.name(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.text.insert(field.name(), format!("{:?}", value));
    }
}

// === SUBSCRIBER ===

/// Tracing subscriber that turns controller events into `PassLog` rows.
pub struct PassLogSubscriber;

impl Subscriber for PassLogSubscriber {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.is_event()
            && *metadata.level() <= tracing::Level::INFO
            && matches!(metadata.target(), ASSIGNMENT_TARGET | PASS_TARGET)
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        // Spans are not tracked
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, event: &Event<'_>) {
        let mut fields = EventFields::default();
        event.record(&mut fields);

        LOG.with(|log| {
            let mut log = log.borrow_mut();
            match event.metadata().target() {
                ASSIGNMENT_TARGET => log.assignments.push(AssignmentRow {
                    tick: fields.number("tick"),
                    unit: fields.number("unit"),
                    labor: fields.text("labor"),
                    enabled: fields.flag("enabled"),
                    reason: fields.text("reason"),
                }),
                PASS_TARGET => log.passes.push(PassRow {
                    tick: fields.number("tick"),
                    eligible: fields.number("eligible"),
                    enabled: fields.number("enabled"),
                    disabled: fields.number("disabled"),
                    fallback: fields.number("fallback"),
                }),
                _ => {}
            }
        });
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

/// Install the `PassLogSubscriber` as the global default.
pub fn install_subscriber() {
    let _ = tracing::subscriber::set_global_default(PassLogSubscriber);
}

/// Take everything recorded on this thread.
pub fn drain() -> PassLog {
    LOG.with(|log| std::mem::take(&mut *log.borrow_mut()))
}

/// Discard everything recorded on this thread.
pub fn clear() {
    LOG.with(|log| *log.borrow_mut() = PassLog::default());
}

/// Run `f` with a scoped `PassLogSubscriber` and return what it recorded.
pub fn record<T>(f: impl FnOnce() -> T) -> (T, PassLog) {
    clear();
    let out = tracing::subscriber::with_default(PassLogSubscriber, f);
    (out, drain())
}

// === Polars Integration ===

use polars::prelude::*;

impl PassLog {
    /// One row per recorded assignment change.
    pub fn assignments_frame(&self) -> PolarsResult<DataFrame> {
        let ticks: Vec<u64> = self.assignments.iter().map(|r| r.tick).collect();
        let units: Vec<u64> = self.assignments.iter().map(|r| r.unit).collect();
        let labors: Vec<&str> = self.assignments.iter().map(|r| r.labor.as_str()).collect();
        let enabled: Vec<bool> = self.assignments.iter().map(|r| r.enabled).collect();
        let reasons: Vec<&str> = self.assignments.iter().map(|r| r.reason.as_str()).collect();

        DataFrame::new(vec![
            Column::new("tick".into(), ticks),
            Column::new("unit".into(), units),
            Column::new("labor".into(), labors),
            Column::new("enabled".into(), enabled),
            Column::new("reason".into(), reasons),
        ])
    }

    /// One row per pass.
    pub fn passes_frame(&self) -> PolarsResult<DataFrame> {
        let column = |name: &str, f: fn(&PassRow) -> u64| {
            let values: Vec<u64> = self.passes.iter().map(f).collect();
            Column::new(name.into(), values)
        };

        DataFrame::new(vec![
            column("tick", |r| r.tick),
            column("eligible", |r| r.eligible),
            column("enabled", |r| r.enabled),
            column("disabled", |r| r.disabled),
            column("fallback", |r| r.fallback),
        ])
    }

    /// Number of changes per labor, one row per labor that changed.
    pub fn changes_by_labor(&self) -> PolarsResult<DataFrame> {
        self.assignments_frame()?
            .lazy()
            .group_by([col("labor")])
            .agg([len().alias("changes")])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_events_become_rows() {
        let (_, log) = record(|| {
            tracing::info!(
                target: "assignment",
                tick = 1200u64,
                unit = 7u64,
                labor = "cook",
                enabled = true,
                reason = "deficit",
            );
            tracing::info!(
                target: "assignment",
                tick = 1200u64,
                unit = 9u64,
                labor = "mine",
                enabled = false,
                reason = "surplus",
            );
        });

        assert_eq!(log.assignments.len(), 2);
        assert_eq!(
            log.assignments[0],
            AssignmentRow {
                tick: 1200,
                unit: 7,
                labor: "cook".to_string(),
                enabled: true,
                reason: "deficit".to_string(),
            }
        );
        assert!(!log.assignments[1].enabled);
        assert_eq!(log.changes_for("mine").count(), 1);
    }

    #[test]
    fn pass_events_become_rows() {
        let (_, log) = record(|| {
            tracing::info!(
                target: "pass",
                tick = 2400u64,
                eligible = 12u64,
                enabled = 3u32,
                disabled = 1u32,
                fallback = 0u32,
            );
        });

        assert_eq!(
            log.passes,
            vec![PassRow {
                tick: 2400,
                eligible: 12,
                enabled: 3,
                disabled: 1,
                fallback: 0,
            }]
        );
        assert_eq!(log.passes[0].changes(), 4);
    }

    #[test]
    fn other_targets_are_ignored() {
        let (_, log) = record(|| {
            tracing::info!(target: "schedule", tick = 5u64);
            tracing::debug!(target: "assignment", tick = 5u64);
        });
        assert!(log.is_empty());
    }

    #[test]
    fn missing_fields_default() {
        let (_, log) = record(|| {
            tracing::info!(target: "assignment", labor = "fish");
        });
        let row = &log.assignments[0];
        assert_eq!(row.tick, 0);
        assert_eq!(row.reason, "");
        assert!(!row.enabled);
    }

    #[test]
    fn frames_have_one_row_per_record() {
        let mut log = PassLog::default();
        for (unit, labor) in [(1, "cook"), (2, "cook"), (3, "mine")] {
            log.assignments.push(AssignmentRow {
                tick: 1200,
                unit,
                labor: labor.to_string(),
                enabled: true,
                reason: "deficit".to_string(),
            });
        }
        log.passes.push(PassRow {
            tick: 1200,
            eligible: 3,
            enabled: 3,
            disabled: 0,
            fallback: 0,
        });

        let assignments = log.assignments_frame().unwrap();
        assert_eq!(assignments.height(), 3);
        assert_eq!(assignments.width(), 5);

        let passes = log.passes_frame().unwrap();
        assert_eq!(passes.height(), 1);

        let by_labor = log.changes_by_labor().unwrap();
        assert_eq!(by_labor.height(), 2);
    }

    #[test]
    fn drain_empties_the_log() {
        let _ = record(|| {
            tracing::info!(target: "pass", tick = 1u64);
        });
        assert!(drain().is_empty());
    }
}
