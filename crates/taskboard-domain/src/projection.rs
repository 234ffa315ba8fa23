//! Grouping of tasks into column lanes.
//!
//! A task belongs to the column named by its `column_id`. Tasks without a
//! `column_id`, or whose `column_id` no longer exists, fall back to the
//! first column (in display order) whose id or title matches their legacy
//! status. Tasks that resolve to nothing are left out of the board.

use std::collections::HashMap;

use crate::column::{Column, ColumnId};
use crate::task::{Task, TaskId};

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub column: Column,
    pub tasks: Vec<Task>,
}

/// Lanes in column display order, each with its tasks sorted by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardProjection {
    pub lanes: Vec<Lane>,
}

impl BoardProjection {
    pub fn lane(&self, column_id: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.column.id == column_id)
    }

    pub fn tasks_in(&self, column_id: &str) -> &[Task] {
        self.lane(column_id).map(|l| l.tasks.as_slice()).unwrap_or(&[])
    }

    pub fn task_count(&self) -> usize {
        self.lanes.iter().map(|l| l.tasks.len()).sum()
    }

    /// Tasks keyed by column id. Every column has an entry, empty lanes
    /// included.
    pub fn into_map(self) -> HashMap<ColumnId, Vec<Task>> {
        self.lanes
            .into_iter()
            .map(|lane| (lane.column.id, lane.tasks))
            .collect()
    }
}

/// Columns sorted by position. Ties keep their input order.
pub fn ordered_columns(columns: &[Column]) -> Vec<&Column> {
    let mut ordered: Vec<&Column> = columns.iter().collect();
    ordered.sort_by_key(|c| c.position);
    ordered
}

/// The column a task is displayed in, if any.
pub fn resolve_column<'a>(task: &Task, ordered: &[&'a Column]) -> Option<&'a Column> {
    if let Some(column_id) = task.column_id.as_deref() {
        if let Some(column) = ordered.iter().find(|c| c.id == column_id) {
            return Some(*column);
        }
    }
    ordered
        .iter()
        .find(|c| c.matches_status(task.status.as_str()))
        .copied()
}

pub fn resolve_column_id(task: &Task, columns: &[Column]) -> Option<ColumnId> {
    resolve_column(task, &ordered_columns(columns)).map(|c| c.id.clone())
}

pub fn project(tasks: &[Task], columns: &[Column]) -> BoardProjection {
    let ordered = ordered_columns(columns);
    let mut lanes: Vec<Lane> = ordered
        .iter()
        .map(|c| Lane {
            column: (*c).clone(),
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        if let Some(column) = resolve_column(task, &ordered) {
            if let Some(lane) = lanes.iter_mut().find(|l| l.column.id == column.id) {
                lane.tasks.push(task.clone());
            }
        }
    }

    for lane in &mut lanes {
        lane.tasks.sort_by_key(|t| t.position);
    }

    BoardProjection { lanes }
}

/// Give every task without a `column_id` the column its status resolves
/// to. Returns the ids of the tasks that changed.
pub fn backfill_column_ids(tasks: &mut [Task], columns: &[Column]) -> Vec<TaskId> {
    let ordered = ordered_columns(columns);
    let mut changed = Vec::new();
    for task in tasks.iter_mut().filter(|t| t.column_id.is_none()) {
        if let Some(column) = resolve_column(task, &ordered) {
            task.column_id = Some(column.id.clone());
            changed.push(task.id.clone());
        }
    }
    changed
}

/// Tasks that no column claims.
pub fn orphaned_tasks<'a>(tasks: &'a [Task], columns: &[Column]) -> Vec<&'a Task> {
    let ordered = ordered_columns(columns);
    tasks
        .iter()
        .filter(|t| resolve_column(t, &ordered).is_none())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::LegacyStatus;

    fn board() -> Vec<Column> {
        Column::defaults("org")
    }

    fn task(title: &str, position: i32) -> Task {
        Task::new("org".into(), title.into(), position)
    }

    #[test]
    fn test_column_id_takes_precedence_over_status() {
        let cols = board();
        let mut t = task("A", 0);
        t.status = LegacyStatus::Done;
        t.column_id = Some(cols[1].id.clone());

        let p = project(&[t], &cols);
        assert_eq!(p.tasks_in(&cols[1].id).len(), 1);
        assert!(p.tasks_in(&cols[3].id).is_empty());
    }

    #[test]
    fn test_status_fallback_matches_default_titles() {
        let cols = board();
        let mut a = task("A", 1);
        a.status = LegacyStatus::InProgress;
        let mut b = task("B", 0);
        b.status = LegacyStatus::InProgress;

        let p = project(&[a, b], &cols);
        let lane = p.lane(&cols[1].id).unwrap();
        assert_eq!(
            lane.tasks.iter().map(|t| t.title.as_str()).collect::<Vec<_>>(),
            vec!["B", "A"]
        );
    }

    #[test]
    fn test_into_map_keys_every_column() {
        let cols = board();
        let mut t = task("A", 0);
        t.column_id = Some(cols[2].id.clone());

        let map = project(&[t], &cols).into_map();
        assert_eq!(map.len(), 4);
        assert_eq!(map[&cols[2].id].len(), 1);
        assert!(map[&cols[0].id].is_empty());
    }

    #[test]
    fn test_dangling_task_hidden() {
        let mut cols = board();
        cols.retain(|c| c.title != "Review");
        let mut t = task("Lost", 0);
        t.column_id = Some("gone".into());
        t.status = LegacyStatus::Review;

        let p = project(std::slice::from_ref(&t), &cols);
        assert_eq!(p.task_count(), 0);
        assert_eq!(orphaned_tasks(std::slice::from_ref(&t), &cols).len(), 1);
    }

    #[test]
    fn test_dangling_column_id_falls_back_to_status() {
        let cols = board();
        let mut t = task("Moved", 0);
        t.column_id = Some("deleted-column".into());
        t.status = LegacyStatus::Todo;

        let p = project(&[t], &cols);
        assert_eq!(p.tasks_in(&cols[0].id).len(), 1);
    }

    #[test]
    fn test_lanes_follow_column_position() {
        let mut cols = board();
        cols.reverse();
        let p = project(&[], &cols);
        let titles: Vec<_> = p.lanes.iter().map(|l| l.column.title.as_str()).collect();
        assert_eq!(titles, vec!["To Do", "In Progress", "Review", "Done"]);
    }

    #[test]
    fn test_project_is_idempotent() {
        let cols = board();
        let mut tasks = Vec::new();
        for (i, status) in LegacyStatus::ALL.iter().enumerate() {
            let mut t = task(&format!("T{i}"), (3 - i) as i32);
            t.status = *status;
            tasks.push(t);
        }
        let first = project(&tasks, &cols);
        let flattened: Vec<Task> = first
            .lanes
            .iter()
            .flat_map(|l| l.tasks.iter().cloned())
            .collect();
        assert_eq!(project(&flattened, &cols), first);
    }

    #[test]
    fn test_backfill_sets_missing_column_ids_only() {
        let cols = board();
        let mut legacy = task("Legacy", 0);
        legacy.status = LegacyStatus::Review;
        let mut dangling = task("Dangling", 0);
        dangling.column_id = Some("gone".into());
        let mut tasks = vec![legacy, dangling];

        let changed = backfill_column_ids(&mut tasks, &cols);
        assert_eq!(changed, vec![tasks[0].id.clone()]);
        assert_eq!(tasks[0].column_id.as_deref(), Some(cols[2].id.as_str()));
        assert_eq!(tasks[1].column_id.as_deref(), Some("gone"));

        assert!(backfill_column_ids(&mut tasks, &cols).is_empty());
    }
}
