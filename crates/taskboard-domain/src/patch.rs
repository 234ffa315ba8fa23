use chrono::{DateTime, Utc};

use crate::column::{Column, ColumnId};
use crate::field_update::FieldUpdate;
use crate::member::MemberId;
use crate::task::{LegacyStatus, Task, TaskPriority};

/// Partial update for a task. Every field carries an absolute value, so
/// applying the same patch twice is harmless.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: FieldUpdate<String>,
    pub status: Option<LegacyStatus>,
    pub column_id: Option<ColumnId>,
    pub priority: Option<TaskPriority>,
    pub assignees: Option<Vec<MemberId>>,
    pub due_date: FieldUpdate<DateTime<Utc>>,
    pub position: Option<i32>,
    pub completed: Option<bool>,
    pub completed_at: FieldUpdate<DateTime<Utc>>,
}

impl TaskPatch {
    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    /// The single update a cross-column move sends for the moved task.
    pub fn relocate(column_id: ColumnId, position: i32, status: Option<LegacyStatus>) -> Self {
        Self {
            column_id: Some(column_id),
            position: Some(position),
            status,
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Names of the fields this patch touches, in a stable order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.title.is_some() {
            fields.push("title");
        }
        if self.description.is_change() {
            fields.push("description");
        }
        if self.status.is_some() {
            fields.push("status");
        }
        if self.column_id.is_some() {
            fields.push("column");
        }
        if self.priority.is_some() {
            fields.push("priority");
        }
        if self.assignees.is_some() {
            fields.push("assignees");
        }
        if self.due_date.is_change() {
            fields.push("due date");
        }
        if self.position.is_some() {
            fields.push("position");
        }
        if self.completed.is_some() {
            fields.push("completed");
        }
        fields
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        self.description.clone().apply_to(&mut task.description);
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(column_id) = &self.column_id {
            task.column_id = Some(column_id.clone());
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(assignees) = &self.assignees {
            task.set_assignees(assignees.clone());
        }
        self.due_date.clone().apply_to(&mut task.due_date);
        if let Some(position) = self.position {
            task.position = position;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        self.completed_at.clone().apply_to(&mut task.completed_at);
        task.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnPatch {
    pub title: Option<String>,
    pub position: Option<i32>,
    pub color: Option<String>,
}

impl ColumnPatch {
    pub fn position(position: i32) -> Self {
        Self {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn apply_to(&self, column: &mut Column) {
        if let Some(title) = &self.title {
            column.title = title.clone();
        }
        if let Some(position) = self.position {
            column.position = position;
        }
        if let Some(color) = &self.color {
            column.color = color.clone();
        }
        column.updated_at = Utc::now();
    }
}

/// Fields for creating a task. Position is assigned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub column_id: Option<ColumnId>,
    pub status: Option<LegacyStatus>,
    pub assignees: Vec<MemberId>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Fields for creating a column. New columns are appended after the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewColumn {
    pub title: String,
    pub color: String,
}

impl NewColumn {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: "gray".to_string(),
        }
    }
}
