use crate::store::board_data::BoardData;
use crate::traits::EntityStore;
use async_trait::async_trait;
use taskboard_core::BoardResult;
use taskboard_domain::{Column, ColumnPatch, NewColumn, NewTask, Task, TaskPatch, TeamMember};
use tokio::sync::RwLock;

/// Entity store held entirely in memory. Used by tests and by embedders
/// that bring their own durability.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<BoardData>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: BoardData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    pub async fn snapshot(&self) -> BoardData {
        self.data.read().await.clone()
    }

    /// Seed a member row. Team management lives outside the board, so
    /// this is not part of [`EntityStore`].
    pub async fn insert_member(&self, member: TeamMember) {
        self.data.write().await.members.push(member);
    }

    /// Seed a raw task row as-is, bypassing position assignment.
    pub async fn insert_task(&self, task: Task) {
        self.data.write().await.tasks.push(task);
    }
}

#[async_trait]
impl EntityStore for InMemoryStore {
    async fn list_tasks(&self, organization_id: &str) -> BoardResult<Vec<Task>> {
        Ok(self.data.read().await.tasks_for(organization_id))
    }

    async fn list_columns(&self, organization_id: &str) -> BoardResult<Vec<Column>> {
        Ok(self.data.read().await.columns_for(organization_id))
    }

    async fn list_members(&self, organization_id: &str) -> BoardResult<Vec<TeamMember>> {
        Ok(self.data.read().await.members_for(organization_id))
    }

    async fn update_task(&self, task_id: &str, patch: TaskPatch) -> BoardResult<Task> {
        self.data.write().await.update_task(task_id, patch)
    }

    async fn update_column(&self, column_id: &str, patch: ColumnPatch) -> BoardResult<Column> {
        self.data.write().await.update_column(column_id, patch)
    }

    async fn create_column(&self, organization_id: &str, fields: NewColumn) -> BoardResult<Column> {
        self.data.write().await.create_column(organization_id, fields)
    }

    async fn delete_column(&self, column_id: &str) -> BoardResult<()> {
        self.data.write().await.delete_column(column_id)
    }

    async fn create_task(&self, organization_id: &str, fields: NewTask) -> BoardResult<Task> {
        self.data.write().await.create_task(organization_id, fields)
    }

    async fn delete_task(&self, task_id: &str) -> BoardResult<()> {
        self.data.write().await.delete_task(task_id)
    }

    async fn ensure_default_columns(&self, organization_id: &str) -> BoardResult<Vec<Column>> {
        let (columns, _) = self
            .data
            .write()
            .await
            .ensure_default_columns(organization_id)?;
        Ok(columns)
    }
}
