use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use taskboard_core::BoardResult;
use taskboard_domain::{
    Column, ColumnPatch, NewColumn, NewTask, Task, TaskPatch, TeamMember,
};
use uuid::Uuid;

/// Written alongside the data in every file store envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceMetadata {
    pub format_version: u32,
    /// The store instance that performed the save.
    pub instance_id: Uuid,
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(format_version: u32, instance_id: Uuid) -> Self {
        Self {
            format_version,
            instance_id,
            saved_at: Utc::now(),
        }
    }
}

/// Authoritative task, column and member lists, scoped by organization.
///
/// Calls may fail with a human-readable error; callers treat every failure
/// the same way regardless of its cause.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn list_tasks(&self, organization_id: &str) -> BoardResult<Vec<Task>>;

    /// Columns in position order.
    async fn list_columns(&self, organization_id: &str) -> BoardResult<Vec<Column>>;

    async fn list_members(&self, organization_id: &str) -> BoardResult<Vec<TeamMember>>;

    async fn update_task(&self, task_id: &str, patch: TaskPatch) -> BoardResult<Task>;

    async fn update_column(&self, column_id: &str, patch: ColumnPatch) -> BoardResult<Column>;

    /// Appends the column after the organization's last one.
    async fn create_column(&self, organization_id: &str, fields: NewColumn) -> BoardResult<Column>;

    async fn delete_column(&self, column_id: &str) -> BoardResult<()>;

    /// Places the task at the end of its column.
    async fn create_task(&self, organization_id: &str, fields: NewTask) -> BoardResult<Task>;

    async fn delete_task(&self, task_id: &str) -> BoardResult<()>;

    /// Create the default columns when the organization has none. Returns
    /// the organization's columns either way.
    async fn ensure_default_columns(&self, organization_id: &str) -> BoardResult<Vec<Column>>;
}

/// Reports writes to a store's backing file made by someone else.
#[async_trait]
pub trait ChangeDetector: Send + Sync {
    async fn start_watching(&self, path: PathBuf) -> BoardResult<()>;

    async fn stop_watching(&self) -> BoardResult<()>;

    fn subscribe(&self) -> tokio::sync::broadcast::Receiver<ChangeEvent>;

    fn is_watching(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub detected_at: DateTime<Utc>,
}
