pub mod board;
pub mod column;
pub mod member;
pub mod notify;
pub mod task;

use serde::Serialize;
use taskboard_domain::{NoOpReason, ReconcileKind};

/// What a move command did, and whether the board had to be reloaded
/// because persisting it failed.
#[derive(Serialize)]
pub struct MoveOutcome<T: Serialize> {
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<&'static str>,
    pub reloaded: bool,
    pub result: T,
}

impl<T: Serialize> MoveOutcome<T> {
    pub fn new(kind: Option<ReconcileKind>, reloaded: bool, result: T) -> Self {
        let (outcome, reason) = match kind {
            Some(ReconcileKind::ColumnReorder) => ("column-reorder", None),
            Some(ReconcileKind::TaskReorder) => ("task-reorder", None),
            Some(ReconcileKind::TaskMove) => ("task-move", None),
            Some(ReconcileKind::NoOp(reason)) => ("no-op", Some(reason_name(reason))),
            None => ("no-op", Some("same-item")),
        };
        Self {
            outcome,
            reason,
            reloaded,
            result,
        }
    }
}

fn reason_name(reason: NoOpReason) -> &'static str {
    match reason {
        NoOpReason::SameItem => "same-item",
        NoOpReason::UnresolvedTarget => "unresolved-target",
        NoOpReason::UnknownItem => "unknown-item",
        NoOpReason::SamePosition => "same-position",
    }
}

pub fn parse_datetime(s: &str) -> anyhow::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .or_else(|_| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map_err(|_| ())
                .and_then(|d| d.and_hms_opt(0, 0, 0).ok_or(()))
                .map(|dt| dt.and_utc())
        })
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid date '{}'. Supported formats: YYYY-MM-DD or RFC 3339 (e.g., 2024-01-15T10:30:00Z)",
                s
            )
        })
}
