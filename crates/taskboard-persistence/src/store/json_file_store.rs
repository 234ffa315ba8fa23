use crate::store::atomic_writer::AtomicWriter;
use crate::store::board_data::BoardData;
use crate::traits::{EntityStore, PersistenceMetadata};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::{Column, ColumnPatch, NewColumn, NewTask, Task, TaskPatch, TeamMember};
use tokio::sync::Mutex;
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// On-disk layout: `{ "version": 1, "metadata": {...}, "data": {...} }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: BoardData,
}

/// Entity store backed by a single JSON file.
///
/// Every mutation is a locked read-modify-write of the whole file, so
/// concurrent calls from one process never lose each other's updates. A
/// missing file reads as an empty board.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_instance_id(path, Uuid::new_v4())
    }

    pub fn with_instance_id(path: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id,
            lock: Mutex::new(()),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    pub async fn load(&self) -> BoardResult<BoardData> {
        let _guard = self.lock.lock().await;
        self.read().await
    }

    pub async fn save(&self, data: &BoardData) -> BoardResult<PersistenceMetadata> {
        let _guard = self.lock.lock().await;
        self.write(data).await
    }

    async fn read(&self) -> BoardResult<BoardData> {
        let Some(bytes) = AtomicWriter::read_if_exists(&self.path).await? else {
            return Ok(BoardData::default());
        };
        let envelope: JsonEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        if envelope.version != FORMAT_VERSION {
            return Err(BoardError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }
        Ok(envelope.data)
    }

    async fn write(&self, data: &BoardData) -> BoardResult<PersistenceMetadata> {
        let metadata = PersistenceMetadata::new(FORMAT_VERSION, self.instance_id);
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: metadata.clone(),
            data: data.clone(),
        };
        let bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| BoardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;
        tracing::info!("Saved {} bytes to {}", bytes.len(), self.path.display());
        Ok(metadata)
    }

    async fn query<T>(&self, f: impl FnOnce(&BoardData) -> T) -> BoardResult<T> {
        let _guard = self.lock.lock().await;
        let data = self.read().await?;
        Ok(f(&data))
    }

    /// Runs `f` against the current rows and writes them back if it
    /// succeeds. Nothing is written on error.
    async fn mutate<T>(&self, f: impl FnOnce(&mut BoardData) -> BoardResult<T>) -> BoardResult<T> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let out = f(&mut data)?;
        self.write(&data).await?;
        Ok(out)
    }
}

#[async_trait]
impl EntityStore for JsonFileStore {
    async fn list_tasks(&self, organization_id: &str) -> BoardResult<Vec<Task>> {
        self.query(|d| d.tasks_for(organization_id)).await
    }

    async fn list_columns(&self, organization_id: &str) -> BoardResult<Vec<Column>> {
        self.query(|d| d.columns_for(organization_id)).await
    }

    async fn list_members(&self, organization_id: &str) -> BoardResult<Vec<TeamMember>> {
        self.query(|d| d.members_for(organization_id)).await
    }

    async fn update_task(&self, task_id: &str, patch: TaskPatch) -> BoardResult<Task> {
        self.mutate(|d| d.update_task(task_id, patch)).await
    }

    async fn update_column(&self, column_id: &str, patch: ColumnPatch) -> BoardResult<Column> {
        self.mutate(|d| d.update_column(column_id, patch)).await
    }

    async fn create_column(&self, organization_id: &str, fields: NewColumn) -> BoardResult<Column> {
        self.mutate(|d| d.create_column(organization_id, fields)).await
    }

    async fn delete_column(&self, column_id: &str) -> BoardResult<()> {
        self.mutate(|d| d.delete_column(column_id)).await
    }

    async fn create_task(&self, organization_id: &str, fields: NewTask) -> BoardResult<Task> {
        self.mutate(|d| d.create_task(organization_id, fields)).await
    }

    async fn delete_task(&self, task_id: &str) -> BoardResult<()> {
        self.mutate(|d| d.delete_task(task_id)).await
    }

    async fn ensure_default_columns(&self, organization_id: &str) -> BoardResult<Vec<Column>> {
        let _guard = self.lock.lock().await;
        let mut data = self.read().await?;
        let (columns, created) = data.ensure_default_columns(organization_id)?;
        if created {
            tracing::info!("Created default columns for organization {}", organization_id);
            self.write(&data).await?;
        }
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty_board() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("board.json"));
        assert!(!store.exists().await);
        assert!(store.list_tasks("org").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");

        let store = JsonFileStore::new(&path);
        let columns = store.ensure_default_columns("org").await.unwrap();
        let task = store
            .create_task("org", NewTask::titled("persist me"))
            .await
            .unwrap();
        store
            .update_task(&task.id, TaskPatch::relocate(columns[2].id.clone(), 0, None))
            .await
            .unwrap();

        let reopened = JsonFileStore::new(&path);
        let tasks = reopened.list_tasks("org").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].column_id.as_deref(), Some(columns[2].id.as_str()));
        assert_eq!(reopened.list_columns("org").await.unwrap(), columns);
    }

    #[tokio::test]
    async fn test_envelope_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        let store = JsonFileStore::new(&path);
        store.ensure_default_columns("org").await.unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(
            raw["metadata"]["instance_id"],
            store.instance_id().to_string()
        );
        assert_eq!(raw["data"]["columns"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_failed_mutation_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        let store = JsonFileStore::new(&path);
        store.ensure_default_columns("org").await.unwrap();
        let before = std::fs::read(&path).unwrap();

        assert!(store.delete_task("ghost").await.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn test_unsupported_version_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("board.json");
        std::fs::write(
            &path,
            r#"{"version": 9, "metadata": {"format_version": 9, "instance_id": "00000000-0000-0000-0000-000000000000", "saved_at": "2024-01-01T00:00:00Z"}, "data": {}}"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);
        assert!(matches!(
            store.list_tasks("org").await,
            Err(BoardError::Serialization(_))
        ));
    }

    #[tokio::test]
    async fn test_concurrent_creates_do_not_clobber() {
        let dir = tempdir().unwrap();
        let store = std::sync::Arc::new(JsonFileStore::new(dir.path().join("board.json")));
        store.ensure_default_columns("org").await.unwrap();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store
                        .create_task("org", NewTask::titled(format!("task {i}")))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut positions: Vec<i32> = store
            .list_tasks("org")
            .await
            .unwrap()
            .iter()
            .map(|t| t.position)
            .collect();
        positions.sort();
        assert_eq!(positions, (0..8).collect::<Vec<_>>());
    }
}
