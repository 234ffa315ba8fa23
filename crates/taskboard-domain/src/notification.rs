//! Notification requests handed to the notification collaborator.
//!
//! The wire shape is `{"type": "<kind>", "data": {...}}` with camelCase
//! data fields. Each kind names one recipient address that must be present.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use taskboard_core::{BoardError, BoardResult};

use crate::member::TeamMember;
use crate::task::Task;

const DEFAULT_RECIPIENT_NAME: &str = "Team Member";
const DEFAULT_ACTOR_NAME: &str = "A team member";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    TaskAssigned,
    TaskUpdated,
    TaskDueSoon,
    TaskCompleted,
    TaskComment,
    TaskChecklist,
    ChecklistCompleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TaskAssigned => "task-assigned",
            Self::TaskUpdated => "task-updated",
            Self::TaskDueSoon => "task-due-soon",
            Self::TaskCompleted => "task-completed",
            Self::TaskComment => "task-comment",
            Self::TaskChecklist => "task-checklist",
            Self::ChecklistCompleted => "checklist-completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAssigned {
    pub assignee_name: Option<String>,
    pub assignee_email: Option<String>,
    pub task_title: String,
    pub assigner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdated {
    pub assignee_name: Option<String>,
    pub assignee_email: Option<String>,
    pub task_title: String,
    pub updater_name: Option<String>,
    pub changes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDueSoon {
    pub assignee_name: Option<String>,
    pub assignee_email: Option<String>,
    pub task_title: String,
    pub due_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskCompleted {
    pub creator_name: Option<String>,
    pub creator_email: Option<String>,
    pub task_title: String,
    pub completed_by_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub recipient_name: Option<String>,
    pub recipient_email: Option<String>,
    pub task_title: String,
    pub commenter_name: Option<String>,
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskChecklist {
    pub recipient_name: Option<String>,
    pub recipient_email: Option<String>,
    pub task_title: String,
    pub adder_name: Option<String>,
    pub checklist_item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistCompleted {
    pub recipient_name: Option<String>,
    pub recipient_email: Option<String>,
    pub task_title: String,
    pub completer_name: Option<String>,
    pub checklist_item: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "kebab-case")]
pub enum NotificationRequest {
    TaskAssigned(TaskAssigned),
    TaskUpdated(TaskUpdated),
    TaskDueSoon(TaskDueSoon),
    TaskCompleted(TaskCompleted),
    TaskComment(TaskComment),
    TaskChecklist(TaskChecklist),
    ChecklistCompleted(ChecklistCompleted),
}

fn present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn or_default(value: &mut Option<String>, default: &str) {
    if !present(value) {
        *value = Some(default.to_string());
    }
}

impl NotificationRequest {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Self::TaskAssigned(_) => NotificationKind::TaskAssigned,
            Self::TaskUpdated(_) => NotificationKind::TaskUpdated,
            Self::TaskDueSoon(_) => NotificationKind::TaskDueSoon,
            Self::TaskCompleted(_) => NotificationKind::TaskCompleted,
            Self::TaskComment(_) => NotificationKind::TaskComment,
            Self::TaskChecklist(_) => NotificationKind::TaskChecklist,
            Self::ChecklistCompleted(_) => NotificationKind::ChecklistCompleted,
        }
    }

    pub fn recipient(&self) -> Option<&str> {
        match self {
            Self::TaskAssigned(d) => d.assignee_email.as_deref(),
            Self::TaskUpdated(d) => d.assignee_email.as_deref(),
            Self::TaskDueSoon(d) => d.assignee_email.as_deref(),
            Self::TaskCompleted(d) => d.creator_email.as_deref(),
            Self::TaskComment(d) => d.recipient_email.as_deref(),
            Self::TaskChecklist(d) => d.recipient_email.as_deref(),
            Self::ChecklistCompleted(d) => d.recipient_email.as_deref(),
        }
    }

    pub fn task_title(&self) -> &str {
        match self {
            Self::TaskAssigned(d) => &d.task_title,
            Self::TaskUpdated(d) => &d.task_title,
            Self::TaskDueSoon(d) => &d.task_title,
            Self::TaskCompleted(d) => &d.task_title,
            Self::TaskComment(d) => &d.task_title,
            Self::TaskChecklist(d) => &d.task_title,
            Self::ChecklistCompleted(d) => &d.task_title,
        }
    }

    /// Reject requests without a recipient address and fill in missing
    /// display names.
    pub fn validated(mut self) -> BoardResult<Self> {
        let missing = match &self {
            Self::TaskAssigned(_) | Self::TaskUpdated(_) | Self::TaskDueSoon(_) => {
                "Assignee email not provided"
            }
            Self::TaskCompleted(_) => "Creator email not provided",
            Self::TaskComment(_) | Self::TaskChecklist(_) | Self::ChecklistCompleted(_) => {
                "Recipient email not provided"
            }
        };
        if !self.recipient().is_some_and(|r| !r.trim().is_empty()) {
            return Err(BoardError::Validation(missing.to_string()));
        }

        match &mut self {
            Self::TaskAssigned(d) => {
                or_default(&mut d.assignee_name, DEFAULT_RECIPIENT_NAME);
                or_default(&mut d.assigner_name, DEFAULT_ACTOR_NAME);
            }
            Self::TaskUpdated(d) => {
                or_default(&mut d.assignee_name, DEFAULT_RECIPIENT_NAME);
                or_default(&mut d.updater_name, DEFAULT_ACTOR_NAME);
            }
            Self::TaskDueSoon(d) => {
                or_default(&mut d.assignee_name, DEFAULT_RECIPIENT_NAME);
            }
            Self::TaskCompleted(d) => {
                or_default(&mut d.creator_name, DEFAULT_RECIPIENT_NAME);
                or_default(&mut d.completed_by_name, DEFAULT_ACTOR_NAME);
            }
            Self::TaskComment(d) => {
                or_default(&mut d.recipient_name, DEFAULT_RECIPIENT_NAME);
                or_default(&mut d.commenter_name, DEFAULT_ACTOR_NAME);
            }
            Self::TaskChecklist(d) => {
                or_default(&mut d.recipient_name, DEFAULT_RECIPIENT_NAME);
                or_default(&mut d.adder_name, DEFAULT_ACTOR_NAME);
            }
            Self::ChecklistCompleted(d) => {
                or_default(&mut d.recipient_name, DEFAULT_RECIPIENT_NAME);
                or_default(&mut d.completer_name, DEFAULT_ACTOR_NAME);
            }
        }
        Ok(self)
    }

    pub fn task_assigned(
        task: &Task,
        assignee: &TeamMember,
        assigner: Option<&TeamMember>,
        task_url: Option<String>,
    ) -> Self {
        Self::TaskAssigned(TaskAssigned {
            assignee_name: Some(assignee.name.clone()),
            assignee_email: assignee.email.clone(),
            task_title: task.title.clone(),
            assigner_name: assigner.map(|m| m.name.clone()),
            task_url,
        })
    }

    pub fn task_updated(
        task: &Task,
        assignee: &TeamMember,
        updater: Option<&TeamMember>,
        changes: String,
        task_url: Option<String>,
    ) -> Self {
        Self::TaskUpdated(TaskUpdated {
            assignee_name: Some(assignee.name.clone()),
            assignee_email: assignee.email.clone(),
            task_title: task.title.clone(),
            updater_name: updater.map(|m| m.name.clone()),
            changes,
            task_url,
        })
    }

    /// `None` when the task has no due date.
    pub fn task_due_soon(task: &Task, assignee: &TeamMember, task_url: Option<String>) -> Option<Self> {
        let due = task.due_date?;
        Some(Self::TaskDueSoon(TaskDueSoon {
            assignee_name: Some(assignee.name.clone()),
            assignee_email: assignee.email.clone(),
            task_title: task.title.clone(),
            due_date: due.format("%Y-%m-%d").to_string(),
            task_url,
        }))
    }

    pub fn task_completed(
        task: &Task,
        recipient: &TeamMember,
        completed_by: Option<&TeamMember>,
        task_url: Option<String>,
    ) -> Self {
        Self::TaskCompleted(TaskCompleted {
            creator_name: Some(recipient.name.clone()),
            creator_email: recipient.email.clone(),
            task_title: task.title.clone(),
            completed_by_name: completed_by.map(|m| m.name.clone()),
            task_url,
        })
    }
}

/// Open tasks due between `now` and `now + window`, soonest first.
pub fn due_soon(tasks: &[Task], now: DateTime<Utc>, window: Duration) -> Vec<&Task> {
    let mut due: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.is_due_within(now, window))
        .collect();
    due.sort_by_key(|t| t.due_date);
    due
}
