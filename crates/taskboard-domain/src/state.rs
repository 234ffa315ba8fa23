use crate::column::Column;
use crate::member::TeamMember;
use crate::projection::{
    backfill_column_ids, ordered_columns, orphaned_tasks, project, resolve_column,
    BoardProjection,
};
use crate::reconcile::{reconcile, Reconciliation};
use crate::task::{OrganizationId, Task, TaskId};

/// The local copy of one organization's board.
///
/// Owned by a single session. It changes only by a full [`BoardState::replace`]
/// or an optimistic [`BoardState::apply`]; the projection is recomputed on
/// demand.
#[derive(Debug, Clone, Default)]
pub struct BoardState {
    organization_id: OrganizationId,
    tasks: Vec<Task>,
    columns: Vec<Column>,
    members: Vec<TeamMember>,
}

impl BoardState {
    pub fn new(organization_id: OrganizationId) -> Self {
        Self {
            organization_id,
            ..Default::default()
        }
    }

    pub fn organization_id(&self) -> &str {
        &self.organization_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    /// Swap in freshly fetched lists. Columns are kept in position order and
    /// tasks missing a `column_id` are backfilled from their status. Returns
    /// the backfilled task ids.
    pub fn replace(
        &mut self,
        tasks: Vec<Task>,
        mut columns: Vec<Column>,
        members: Vec<TeamMember>,
    ) -> Vec<TaskId> {
        columns.sort_by_key(|c| c.position);
        let mut tasks = tasks;
        let backfilled = backfill_column_ids(&mut tasks, &columns);
        if !backfilled.is_empty() {
            tracing::debug!("Backfilled column for {} legacy tasks", backfilled.len());
        }
        self.tasks = tasks;
        self.columns = columns;
        self.members = members;
        backfilled
    }

    pub fn reconcile(&self, dragged: &str, target: &str) -> Reconciliation {
        reconcile(dragged, target, &self.tasks, &self.columns)
    }

    /// Adopt the optimistic result of a reconciliation.
    pub fn apply(&mut self, reconciliation: &Reconciliation) {
        if reconciliation.is_no_op() {
            return;
        }
        self.tasks = reconciliation.tasks.clone();
        self.columns = reconciliation.columns.clone();
        self.columns.sort_by_key(|c| c.position);
    }

    pub fn projection(&self) -> BoardProjection {
        project(&self.tasks, &self.columns)
    }

    pub fn orphaned(&self) -> Vec<&Task> {
        orphaned_tasks(&self.tasks, &self.columns)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn column(&self, id: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Look a column up by id, or failing that by case-insensitive title.
    pub fn find_column(&self, key: &str) -> Option<&Column> {
        self.column(key).or_else(|| {
            self.columns
                .iter()
                .find(|c| c.title.eq_ignore_ascii_case(key))
        })
    }

    pub fn member(&self, id: &str) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn member_by_user(&self, user_id: &str) -> Option<&TeamMember> {
        self.members
            .iter()
            .find(|m| m.user_id.as_deref() == Some(user_id))
    }

    pub fn column_of(&self, task: &Task) -> Option<&Column> {
        resolve_column(task, &ordered_columns(&self.columns))
    }

    pub fn tasks_in_column(&self, column_id: &str) -> Vec<&Task> {
        let ordered = ordered_columns(&self.columns);
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| resolve_column(t, &ordered).is_some_and(|c| c.id == column_id))
            .collect();
        tasks.sort_by_key(|t| t.position);
        tasks
    }

    /// New tasks go to the end of their column.
    pub fn next_position_in_column(&self, column_id: &str) -> i32 {
        self.tasks_in_column(column_id).len() as i32
    }
}
