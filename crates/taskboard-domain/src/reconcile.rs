//! Turns the outcome of a drag (dragged id, drop target id) into a new
//! board ordering plus the persistence calls that make it durable.
//!
//! Reconciliation is pure: it takes the current lists and returns updated
//! copies. Callers apply the result locally first and hand the intents to
//! the outbox. Every intent carries absolute values, so intents from one
//! reconciliation can run in any order.

use std::collections::HashMap;

use crate::column::{Column, ColumnId};
use crate::patch::{ColumnPatch, TaskPatch};
use crate::projection::{ordered_columns, resolve_column};
use crate::task::{Task, TaskId};

/// Drag ids of column headers carry this prefix so they cannot collide
/// with task ids in the same drag context.
pub const COLUMN_DRAG_PREFIX: &str = "column-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragItem {
    Task(TaskId),
    Column(ColumnId),
}

impl DragItem {
    pub fn parse(drag_id: &str) -> Self {
        match drag_id.strip_prefix(COLUMN_DRAG_PREFIX) {
            Some(column_id) => Self::Column(column_id.to_string()),
            None => Self::Task(drag_id.to_string()),
        }
    }

    pub fn drag_id(&self) -> String {
        match self {
            Self::Task(id) => id.clone(),
            Self::Column(id) => format!("{COLUMN_DRAG_PREFIX}{id}"),
        }
    }
}

/// What a drop landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A column header (`column-<id>`).
    ColumnHeader(ColumnId),
    /// The body of a column, addressed by its bare id.
    Container(ColumnId),
    /// Anything else is taken to be a task.
    Task(TaskId),
}

impl DropTarget {
    pub fn parse(drop_id: &str, columns: &[Column]) -> Self {
        if let Some(column_id) = drop_id.strip_prefix(COLUMN_DRAG_PREFIX) {
            return Self::ColumnHeader(column_id.to_string());
        }
        if columns.iter().any(|c| c.id == drop_id) {
            return Self::Container(drop_id.to_string());
        }
        Self::Task(drop_id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    SameItem,
    UnresolvedTarget,
    UnknownItem,
    SamePosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileKind {
    NoOp(NoOpReason),
    ColumnReorder,
    TaskReorder,
    TaskMove,
}

/// What to do when an intent still fails after its retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Throw away optimistic state and reload the board.
    Reload,
    /// Log and keep going.
    LogOnly,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    UpdateTask { task_id: TaskId, patch: TaskPatch },
    UpdateColumn { column_id: ColumnId, patch: ColumnPatch },
}

impl Intent {
    pub fn failure_policy(&self) -> FailurePolicy {
        match self {
            Self::UpdateTask { .. } => FailurePolicy::Reload,
            Self::UpdateColumn { .. } => FailurePolicy::LogOnly,
        }
    }

    pub fn entity_id(&self) -> &str {
        match self {
            Self::UpdateTask { task_id, .. } => task_id,
            Self::UpdateColumn { column_id, .. } => column_id,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::UpdateTask { task_id, patch } => {
                format!("update task {} [{}]", task_id, patch.changed_fields().join(", "))
            }
            Self::UpdateColumn { column_id, patch } => match patch.position {
                Some(position) => format!("update column {} [position={}]", column_id, position),
                None => format!("update column {}", column_id),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub kind: ReconcileKind,
    pub tasks: Vec<Task>,
    pub columns: Vec<Column>,
    pub intents: Vec<Intent>,
}

impl Reconciliation {
    fn no_op(reason: NoOpReason, tasks: &[Task], columns: &[Column]) -> Self {
        Self {
            kind: ReconcileKind::NoOp(reason),
            tasks: tasks.to_vec(),
            columns: columns.to_vec(),
            intents: Vec::new(),
        }
    }

    pub fn is_no_op(&self) -> bool {
        matches!(self.kind, ReconcileKind::NoOp(_))
    }
}

/// Move the element at `from` so it ends up at index `to`, shifting the
/// elements in between. Out-of-range indices leave the list untouched.
pub fn array_move<T>(mut items: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= items.len() || to >= items.len() || from == to {
        return items;
    }
    let item = items.remove(from);
    items.insert(to, item);
    items
}

pub fn reconcile(dragged: &str, target: &str, tasks: &[Task], columns: &[Column]) -> Reconciliation {
    if dragged == target {
        return Reconciliation::no_op(NoOpReason::SameItem, tasks, columns);
    }
    match DragItem::parse(dragged) {
        DragItem::Column(column_id) => reorder_columns(&column_id, target, tasks, columns),
        DragItem::Task(task_id) => place_task(&task_id, target, tasks, columns),
    }
}

fn reorder_columns(
    column_id: &str,
    target: &str,
    tasks: &[Task],
    columns: &[Column],
) -> Reconciliation {
    let target_id = target.strip_prefix(COLUMN_DRAG_PREFIX).unwrap_or(target);
    if target_id == column_id {
        return Reconciliation::no_op(NoOpReason::SameItem, tasks, columns);
    }

    let ordered: Vec<Column> = ordered_columns(columns).into_iter().cloned().collect();
    let Some(from) = ordered.iter().position(|c| c.id == column_id) else {
        return Reconciliation::no_op(NoOpReason::UnknownItem, tasks, columns);
    };
    let Some(to) = ordered.iter().position(|c| c.id == target_id) else {
        return Reconciliation::no_op(NoOpReason::UnresolvedTarget, tasks, columns);
    };

    let mut reordered = array_move(ordered, from, to);
    let mut intents = Vec::new();
    for (index, column) in reordered.iter_mut().enumerate() {
        let index = index as i32;
        if column.position != index {
            column.update_position(index);
            intents.push(Intent::UpdateColumn {
                column_id: column.id.clone(),
                patch: ColumnPatch::position(index),
            });
        }
    }

    Reconciliation {
        kind: ReconcileKind::ColumnReorder,
        tasks: tasks.to_vec(),
        columns: reordered,
        intents,
    }
}

/// Ids of the tasks shown in `column_id`, in display order.
fn lane_ids(tasks: &[Task], ordered: &[&Column], column_id: &str) -> Vec<TaskId> {
    let mut lane: Vec<&Task> = tasks
        .iter()
        .filter(|t| resolve_column(t, ordered).is_some_and(|c| c.id == column_id))
        .collect();
    lane.sort_by_key(|t| t.position);
    lane.into_iter().map(|t| t.id.clone()).collect()
}

fn place_task(task_id: &str, target: &str, tasks: &[Task], columns: &[Column]) -> Reconciliation {
    let ordered = ordered_columns(columns);
    let Some(active) = tasks.iter().find(|t| t.id == task_id) else {
        return Reconciliation::no_op(NoOpReason::UnknownItem, tasks, columns);
    };

    let (destination, before) = match DropTarget::parse(target, columns) {
        DropTarget::ColumnHeader(id) | DropTarget::Container(id) => {
            match ordered.iter().find(|c| c.id == id) {
                Some(column) => (*column, None),
                None => return Reconciliation::no_op(NoOpReason::UnresolvedTarget, tasks, columns),
            }
        }
        DropTarget::Task(id) => {
            let resolved = tasks
                .iter()
                .find(|t| t.id == id)
                .and_then(|t| resolve_column(t, &ordered));
            match resolved {
                Some(column) => (column, Some(id)),
                None => return Reconciliation::no_op(NoOpReason::UnresolvedTarget, tasks, columns),
            }
        }
    };

    let source = resolve_column(active, &ordered);
    let mut updated = tasks.to_vec();
    let index: HashMap<TaskId, usize> = updated
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id.clone(), i))
        .collect();

    if source.is_some_and(|s| s.id == destination.id) {
        let Some(before) = before else {
            return Reconciliation::no_op(NoOpReason::SamePosition, tasks, columns);
        };
        let lane = lane_ids(tasks, &ordered, &destination.id);
        let from = lane.iter().position(|id| id == task_id);
        let to = lane.iter().position(|id| *id == before);
        let (Some(from), Some(to)) = (from, to) else {
            return Reconciliation::no_op(NoOpReason::UnresolvedTarget, tasks, columns);
        };
        if from == to {
            return Reconciliation::no_op(NoOpReason::SamePosition, tasks, columns);
        }

        let lane = array_move(lane, from, to);
        let intents = renumber(&mut updated, &index, &lane);
        return Reconciliation {
            kind: ReconcileKind::TaskReorder,
            tasks: updated,
            columns: columns.to_vec(),
            intents,
        };
    }

    let mut source_lane = match source {
        Some(column) => lane_ids(tasks, &ordered, &column.id),
        None => Vec::new(),
    };
    source_lane.retain(|id| id != task_id);

    let mut destination_lane = lane_ids(tasks, &ordered, &destination.id);
    let insert_at = before
        .and_then(|b| destination_lane.iter().position(|id| *id == b))
        .unwrap_or(destination_lane.len());
    destination_lane.insert(insert_at, task_id.to_string());

    let status = destination.legacy_status();
    let moved = &mut updated[index[task_id]];
    moved.move_to_column(destination.id.clone(), insert_at as i32);
    if let Some(status) = status {
        moved.update_status(status);
    }

    let mut intents = vec![Intent::UpdateTask {
        task_id: task_id.to_string(),
        patch: TaskPatch::relocate(destination.id.clone(), insert_at as i32, status),
    }];
    intents.extend(renumber(&mut updated, &index, &source_lane));
    destination_lane.retain(|id| id != task_id);
    intents.extend(renumber_skipping(&mut updated, &index, &destination_lane, insert_at));

    Reconciliation {
        kind: ReconcileKind::TaskMove,
        tasks: updated,
        columns: columns.to_vec(),
        intents,
    }
}

/// Give each task in `lane` its index as position, emitting a
/// position-only intent for every task that actually moved.
fn renumber(tasks: &mut [Task], index: &HashMap<TaskId, usize>, lane: &[TaskId]) -> Vec<Intent> {
    let mut intents = Vec::new();
    for (position, id) in lane.iter().enumerate() {
        let position = position as i32;
        let task = &mut tasks[index[id]];
        if task.position != position {
            task.update_position(position);
            intents.push(Intent::UpdateTask {
                task_id: id.clone(),
                patch: TaskPatch::position(position),
            });
        }
    }
    intents
}

/// Renumber the destination lane around the slot the moved task took.
fn renumber_skipping(
    tasks: &mut [Task],
    index: &HashMap<TaskId, usize>,
    siblings: &[TaskId],
    taken: usize,
) -> Vec<Intent> {
    let mut intents = Vec::new();
    for (i, id) in siblings.iter().enumerate() {
        let slot = if i < taken { i } else { i + 1 };
        let position = slot as i32;
        let task = &mut tasks[index[id]];
        if task.position != position {
            task.update_position(position);
            intents.push(Intent::UpdateTask {
                task_id: id.clone(),
                patch: TaskPatch::position(position),
            });
        }
    }
    intents
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::project;
    use crate::task::LegacyStatus;
    use proptest::prelude::*;

    fn board() -> Vec<Column> {
        Column::defaults("org")
    }

    fn lane(columns: &[Column], column: usize, titles: &[&str]) -> Vec<Task> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| {
                let mut t = Task::new("org".into(), title.to_string(), i as i32);
                t.id = title.to_string();
                t.column_id = Some(columns[column].id.clone());
                t
            })
            .collect()
    }

    fn titles_in(r: &Reconciliation, column: &Column) -> Vec<String> {
        project(&r.tasks, &r.columns)
            .tasks_in(&column.id)
            .iter()
            .map(|t| t.title.clone())
            .collect()
    }

    fn positions_in(r: &Reconciliation, column: &Column) -> Vec<i32> {
        project(&r.tasks, &r.columns)
            .tasks_in(&column.id)
            .iter()
            .map(|t| t.position)
            .collect()
    }

    fn column_id_intents(r: &Reconciliation) -> Vec<&Intent> {
        r.intents
            .iter()
            .filter(|i| matches!(i, Intent::UpdateTask { patch, .. } if patch.column_id.is_some()))
            .collect()
    }

    #[test]
    fn test_array_move() {
        assert_eq!(array_move(vec![1, 2, 3, 4], 3, 0), vec![4, 1, 2, 3]);
        assert_eq!(array_move(vec![1, 2, 3, 4], 0, 2), vec![2, 3, 1, 4]);
        assert_eq!(array_move(vec![1, 2], 0, 5), vec![1, 2]);
    }

    #[test]
    fn test_drag_item_parse() {
        assert_eq!(DragItem::parse("column-abc"), DragItem::Column("abc".into()));
        assert_eq!(DragItem::parse("abc"), DragItem::Task("abc".into()));
        assert_eq!(DragItem::Column("abc".into()).drag_id(), "column-abc");
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let cols = board();
        let tasks = lane(&cols, 0, &["a", "b"]);
        let r = reconcile("a", "a", &tasks, &cols);
        assert_eq!(r.kind, ReconcileKind::NoOp(NoOpReason::SameItem));
        assert!(r.intents.is_empty());
        assert_eq!(r.tasks, tasks);
    }

    #[test]
    fn test_unknown_dragged_task_is_noop() {
        let cols = board();
        let tasks = lane(&cols, 0, &["a"]);
        let r = reconcile("ghost", &cols[1].id, &tasks, &cols);
        assert_eq!(r.kind, ReconcileKind::NoOp(NoOpReason::UnknownItem));
    }

    #[test]
    fn test_unresolvable_target_is_noop() {
        let cols = board();
        let tasks = lane(&cols, 0, &["a"]);
        let r = reconcile("a", "nowhere", &tasks, &cols);
        assert_eq!(r.kind, ReconcileKind::NoOp(NoOpReason::UnresolvedTarget));
        let r = reconcile("a", "column-nowhere", &tasks, &cols);
        assert_eq!(r.kind, ReconcileKind::NoOp(NoOpReason::UnresolvedTarget));
    }

    #[test]
    fn test_column_reorder_done_to_front() {
        let cols = board();
        let done = cols[3].id.clone();
        let todo = cols[0].id.clone();
        let r = reconcile(
            &format!("column-{done}"),
            &format!("column-{todo}"),
            &[],
            &cols,
        );

        assert_eq!(r.kind, ReconcileKind::ColumnReorder);
        let titles: Vec<_> = r.columns.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Done", "To Do", "In Progress", "Review"]);
        let positions: Vec<_> = r.columns.iter().map(|c| c.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3]);
        assert_eq!(r.intents.len(), 4);
        assert!(r
            .intents
            .iter()
            .all(|i| i.failure_policy() == FailurePolicy::LogOnly));
    }

    #[test]
    fn test_column_reorder_only_touches_changed_columns() {
        let cols = board();
        let r = reconcile(
            &format!("column-{}", cols[1].id),
            &cols[2].id,
            &[],
            &cols,
        );
        assert_eq!(r.intents.len(), 2);
    }

    #[test]
    fn test_column_dropped_on_task_is_noop() {
        let cols = board();
        let tasks = lane(&cols, 0, &["a"]);
        let r = reconcile(&format!("column-{}", cols[1].id), "a", &tasks, &cols);
        assert_eq!(r.kind, ReconcileKind::NoOp(NoOpReason::UnresolvedTarget));
    }

    #[test]
    fn test_cross_column_move_onto_task() {
        let cols = board();
        let mut tasks = lane(&cols, 0, &["a0", "t", "a2", "a3"]);
        tasks.extend(lane(&cols, 2, &["b0", "b1"]));

        let r = reconcile("t", "b1", &tasks, &cols);

        assert_eq!(r.kind, ReconcileKind::TaskMove);
        assert_eq!(titles_in(&r, &cols[0]), vec!["a0", "a2", "a3"]);
        assert_eq!(positions_in(&r, &cols[0]), vec![0, 1, 2]);
        assert_eq!(titles_in(&r, &cols[2]), vec!["b0", "t", "b1"]);
        assert_eq!(positions_in(&r, &cols[2]), vec![0, 1, 2]);

        let carrying = column_id_intents(&r);
        assert_eq!(carrying.len(), 1);
        match carrying[0] {
            Intent::UpdateTask { task_id, patch } => {
                assert_eq!(task_id, "t");
                assert_eq!(patch.column_id.as_deref(), Some(cols[2].id.as_str()));
                assert_eq!(patch.status, Some(LegacyStatus::Review));
                assert_eq!(patch.position, Some(1));
            }
            other => panic!("unexpected intent {other:?}"),
        }
        let moved = r.tasks.iter().find(|t| t.id == "t").unwrap();
        assert_eq!(moved.status, LegacyStatus::Review);
    }

    #[test]
    fn test_cross_column_move_into_container_appends() {
        let cols = board();
        let mut tasks = lane(&cols, 0, &["t"]);
        tasks.extend(lane(&cols, 1, &["b0", "b1"]));

        let r = reconcile("t", &cols[1].id, &tasks, &cols);
        assert_eq!(titles_in(&r, &cols[1]), vec!["b0", "b1", "t"]);
        assert_eq!(r.intents.len(), 1);
    }

    #[test]
    fn test_move_to_custom_column_keeps_status() {
        let mut cols = board();
        cols.push(Column::new("org".into(), "Blocked".into(), 4, "red".into()));
        let tasks = lane(&cols, 1, &["t"]);

        let r = reconcile("t", &format!("column-{}", cols[4].id), &tasks, &cols);
        match &r.intents[0] {
            Intent::UpdateTask { patch, .. } => assert_eq!(patch.status, None),
            other => panic!("unexpected intent {other:?}"),
        }
        assert_eq!(r.tasks[0].status, LegacyStatus::Todo);
        assert_eq!(r.tasks[0].column_id.as_deref(), Some(cols[4].id.as_str()));
    }

    #[test]
    fn test_status_sent_only_for_canonical_slug() {
        let mut cols = board();
        cols.push(Column::new("org".into(), "D.O.N.E".into(), 4, "green".into()));
        let mut tasks = lane(&cols, 1, &["t"]);
        tasks[0].status = LegacyStatus::InProgress;

        let sent_status = |r: &Reconciliation| match &r.intents[0] {
            Intent::UpdateTask { patch, .. } => patch.status,
            other => panic!("unexpected intent {other:?}"),
        };

        let r = reconcile("t", &cols[4].id, &tasks, &cols);
        assert_eq!(sent_status(&r), None);
        assert_eq!(r.tasks[0].status, LegacyStatus::InProgress);

        // "To Do" slugs to `to-do`, not `todo`.
        let r = reconcile("t", &cols[0].id, &tasks, &cols);
        assert_eq!(sent_status(&r), None);
        assert_eq!(r.tasks[0].column_id.as_deref(), Some(cols[0].id.as_str()));

        let r = reconcile("t", &cols[3].id, &tasks, &cols);
        assert_eq!(sent_status(&r), Some(LegacyStatus::Done));
    }

    #[test]
    fn test_same_column_container_drop_is_noop() {
        let cols = board();
        let tasks = lane(&cols, 0, &["a", "b"]);
        let r = reconcile("a", &cols[0].id, &tasks, &cols);
        assert_eq!(r.kind, ReconcileKind::NoOp(NoOpReason::SamePosition));
        let r = reconcile("a", &format!("column-{}", cols[0].id), &tasks, &cols);
        assert!(r.is_no_op());
    }

    #[test]
    fn test_intra_column_reorder_is_persisted() {
        let cols = board();
        let tasks = lane(&cols, 0, &["a", "b", "c", "d"]);
        let r = reconcile("d", "b", &tasks, &cols);

        assert_eq!(r.kind, ReconcileKind::TaskReorder);
        assert_eq!(titles_in(&r, &cols[0]), vec!["a", "d", "b", "c"]);
        assert_eq!(positions_in(&r, &cols[0]), vec![0, 1, 2, 3]);
        assert_eq!(r.intents.len(), 3);
        assert!(column_id_intents(&r).is_empty());
    }

    #[test]
    fn test_legacy_task_without_column_id_moves() {
        let cols = board();
        let mut legacy = Task::new("org".into(), "legacy".into(), 0);
        legacy.id = "legacy".into();
        legacy.status = LegacyStatus::Todo;

        let r = reconcile("legacy", &cols[3].id, &[legacy], &cols);
        assert_eq!(r.kind, ReconcileKind::TaskMove);
        assert_eq!(r.tasks[0].status, LegacyStatus::Done);
        assert_eq!(r.tasks[0].column_id.as_deref(), Some(cols[3].id.as_str()));
    }

    fn arb_board() -> impl Strategy<Value = (Vec<Column>, Vec<Task>)> {
        (1usize..5, prop::collection::vec(0usize..4, 0..12)).prop_map(|(n, assignment)| {
            let columns: Vec<Column> = (0..n)
                .map(|i| {
                    let mut c = Column::new("org".into(), format!("Lane {i}"), i as i32, "gray".into());
                    c.id = format!("c{i}");
                    c
                })
                .collect();
            let mut counts = vec![0i32; n];
            let tasks = assignment
                .into_iter()
                .enumerate()
                .map(|(i, col)| {
                    let col = col % n;
                    let mut t = Task::new("org".into(), format!("t{i}"), counts[col]);
                    counts[col] += 1;
                    t.id = format!("t{i}");
                    t.column_id = Some(columns[col].id.clone());
                    t
                })
                .collect();
            (columns, tasks)
        })
    }

    fn drag_ids(columns: &[Column], tasks: &[Task]) -> Vec<String> {
        let mut ids: Vec<String> = tasks.iter().map(|t| t.id.clone()).collect();
        for c in columns {
            ids.push(c.id.clone());
            ids.push(format!("column-{}", c.id));
        }
        ids
    }

    proptest! {
        #[test]
        fn prop_positions_stay_dense((columns, tasks) in arb_board(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
            let ids = drag_ids(&columns, &tasks);
            let dragged: &String = a.get(&ids);
            let target: &String = b.get(&ids);

            let r = reconcile(dragged, target, &tasks, &columns);

            let projection = project(&r.tasks, &r.columns);
            prop_assert_eq!(projection.task_count(), tasks.len());
            for lane in &projection.lanes {
                let positions: Vec<i32> = lane.tasks.iter().map(|t| t.position).collect();
                let expected: Vec<i32> = (0..lane.tasks.len() as i32).collect();
                prop_assert_eq!(positions, expected);
            }
            let column_positions: Vec<i32> = ordered_columns(&r.columns).iter().map(|c| c.position).collect();
            let expected: Vec<i32> = (0..r.columns.len() as i32).collect();
            prop_assert_eq!(column_positions, expected);
            prop_assert!(column_id_intents(&r).len() <= 1);
        }

        #[test]
        fn prop_intents_replay_to_same_state((columns, tasks) in arb_board(), a in any::<prop::sample::Index>(), b in any::<prop::sample::Index>()) {
            let ids = drag_ids(&columns, &tasks);
            let r = reconcile(a.get::<String>(&ids), b.get::<String>(&ids), &tasks, &columns);

            let mut replayed_tasks = tasks.clone();
            let mut replayed_columns = columns.clone();
            for intent in r.intents.iter().rev() {
                match intent {
                    Intent::UpdateTask { task_id, patch } => {
                        let t = replayed_tasks.iter_mut().find(|t| &t.id == task_id).unwrap();
                        patch.apply_to(t);
                    }
                    Intent::UpdateColumn { column_id, patch } => {
                        let c = replayed_columns.iter_mut().find(|c| &c.id == column_id).unwrap();
                        patch.apply_to(c);
                    }
                }
            }

            let a = project(&replayed_tasks, &replayed_columns);
            let b = project(&r.tasks, &r.columns);
            let ids = |p: &crate::projection::BoardProjection| -> Vec<(String, Vec<String>, Vec<i32>)> {
                p.lanes.iter().map(|l| (
                    l.column.id.clone(),
                    l.tasks.iter().map(|t| t.id.clone()).collect(),
                    l.tasks.iter().map(|t| t.position).collect(),
                )).collect()
            };
            prop_assert_eq!(ids(&a), ids(&b));
        }
    }
}
