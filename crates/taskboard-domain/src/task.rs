use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::column::{normalize_key, ColumnId};
use crate::member::MemberId;
use crate::patch::NewTask;

pub type TaskId = String;
pub type OrganizationId = String;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "critical" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// The four-value status that predates explicit column entities.
///
/// Kept on every task for older boards. It is derived from the task's
/// column whenever that column maps onto one of the four values, and is
/// left alone otherwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegacyStatus {
    #[default]
    Todo,
    InProgress,
    Review,
    Done,
}

impl LegacyStatus {
    pub const ALL: [LegacyStatus; 4] = [Self::Todo, Self::InProgress, Self::Review, Self::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Exact match on the wire value.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == slug)
    }

    /// Case and separator insensitive match, so "To Do", "to-do" and
    /// "TODO" all map to `Todo`.
    pub fn from_label(label: &str) -> Option<Self> {
        let key = normalize_key(label);
        Self::ALL
            .into_iter()
            .find(|s| normalize_key(s.as_str()) == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub organization_id: OrganizationId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: LegacyStatus,
    #[serde(default)]
    pub column_id: Option<ColumnId>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignee_id: Option<MemberId>,
    #[serde(default)]
    pub assignees: Vec<MemberId>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub position: i32,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(organization_id: OrganizationId, title: String, position: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            organization_id,
            title,
            description: None,
            status: LegacyStatus::Todo,
            column_id: None,
            priority: TaskPriority::Medium,
            assignee_id: None,
            assignees: Vec::new(),
            due_date: None,
            position,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_new(organization_id: OrganizationId, fields: NewTask, position: i32) -> Self {
        let mut task = Self::new(organization_id, fields.title, position);
        task.description = fields.description;
        task.priority = fields.priority;
        task.column_id = fields.column_id;
        if let Some(status) = fields.status {
            task.status = status;
        }
        task.set_assignees(fields.assignees);
        task.due_date = fields.due_date;
        task
    }

    /// Every member assigned to this task. Older rows only carry the
    /// single `assignee_id`.
    pub fn assignee_ids(&self) -> Vec<&MemberId> {
        if self.assignees.is_empty() {
            self.assignee_id.iter().collect()
        } else {
            self.assignees.iter().collect()
        }
    }

    pub fn is_assigned_to(&self, member_id: &str) -> bool {
        self.assignee_ids().iter().any(|id| id.as_str() == member_id)
    }

    pub fn set_assignees(&mut self, assignees: Vec<MemberId>) {
        self.assignee_id = assignees.first().cloned();
        self.assignees = assignees;
        self.updated_at = Utc::now();
    }

    pub fn move_to_column(&mut self, column_id: ColumnId, position: i32) {
        self.column_id = Some(column_id);
        self.position = position;
        self.updated_at = Utc::now();
    }

    pub fn update_position(&mut self, position: i32) {
        self.position = position;
        self.updated_at = Utc::now();
    }

    pub fn update_status(&mut self, status: LegacyStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    /// Flip completion, stamping or clearing `completed_at`.
    pub fn toggle_completed(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
        self.updated_at = now;
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < now)
    }

    /// Due between `now` and `now + window`, and still open.
    pub fn is_due_within(&self, now: DateTime<Utc>, window: chrono::Duration) -> bool {
        !self.completed
            && self
                .due_date
                .is_some_and(|due| due >= now && due <= now + window)
    }
}
