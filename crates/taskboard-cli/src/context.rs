use std::path::Path;
use std::sync::Arc;

use taskboard_core::{AppConfig, BoardError, BoardResult};
use taskboard_domain::{ColumnId, TeamMember};
use taskboard_persistence::JsonFileStore;
use taskboard_sync::{BoardSession, LogNotifier, SessionContext};

/// A board session over a JSON data file, plus the lookups commands share.
pub struct CliContext {
    pub session: BoardSession,
    store: Arc<JsonFileStore>,
}

impl CliContext {
    pub async fn open(file_path: &str, org: String, user: Option<String>) -> BoardResult<Self> {
        let config = AppConfig::load();
        let store = Arc::new(JsonFileStore::new(file_path));

        let mut context = SessionContext::new(org);
        if let Some(user) = user {
            context = context.with_user(user);
        }
        let session =
            BoardSession::open(context, store.clone(), Arc::new(LogNotifier), config).await?;
        Ok(Self { session, store })
    }

    pub fn path(&self) -> &Path {
        self.store.path()
    }

    /// Resolve a column given by id or by title.
    pub fn column_id(&self, key: &str) -> BoardResult<ColumnId> {
        self.session
            .state()
            .find_column(key)
            .map(|c| c.id.clone())
            .ok_or_else(|| BoardError::not_found("column", key))
    }

    pub fn require_task(&self, id: &str) -> BoardResult<()> {
        match self.session.state().task(id) {
            Some(_) => Ok(()),
            None => Err(BoardError::not_found("task", id)),
        }
    }

    /// Members are managed outside the entity store, so they are written to
    /// the data file directly and the board is reloaded afterwards.
    pub async fn add_member(&mut self, member: TeamMember) -> BoardResult<TeamMember> {
        self.session.settle().await;
        let mut data = self.store.load().await?;
        data.members.push(member.clone());
        self.store.save(&data).await?;
        self.session.load().await?;
        Ok(member)
    }

    /// Wait for background writes before the process exits.
    pub async fn finish(self) {
        self.session.shutdown().await;
    }
}
