//! One user's live view of an organization's board.
//!
//! Drag results are applied to local state immediately and persisted in
//! the background through the outbox. CRUD operations go to the store
//! first and re-fetch the whole board once they succeed.

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use taskboard_core::{AppConfig, BoardError, BoardResult};
use taskboard_domain::{
    due_soon, ActivationConstraints, BoardState, Column, ColumnPatch, DragController, DragItem,
    FieldUpdate, InputModality, Intent, MemberId, NewColumn, NewTask,
    NotificationRequest, OrganizationId, Point, ReconcileKind, Task, TaskPatch, TeamMember, UserId,
};
use taskboard_persistence::EntityStore;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::notifier::Notifier;
use crate::outbox::{Outbox, SyncEvent};
use crate::retry::RetryPolicy;

/// Who is looking at the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub organization_id: OrganizationId,
    pub user_id: Option<UserId>,
}

impl SessionContext {
    pub fn new(organization_id: impl Into<OrganizationId>) -> Self {
        Self {
            organization_id: organization_id.into(),
            user_id: None,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<UserId>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

pub struct BoardSession {
    context: SessionContext,
    config: AppConfig,
    state: BoardState,
    store: Arc<dyn EntityStore>,
    notifier: Arc<dyn Notifier>,
    outbox: Outbox,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    worker: JoinHandle<()>,
    in_flight: usize,
    reloads: u64,
    drag: DragController,
    notifications: Vec<JoinHandle<()>>,
}

impl BoardSession {
    /// Start the outbox worker and load the board.
    pub async fn open(
        context: SessionContext,
        store: Arc<dyn EntityStore>,
        notifier: Arc<dyn Notifier>,
        config: AppConfig,
    ) -> BoardResult<Self> {
        let (outbox, events, worker) =
            Outbox::spawn(store.clone(), RetryPolicy::from(&config.sync));
        let drag = DragController::headless(ActivationConstraints::from(&config.drag));
        let mut session = Self {
            state: BoardState::new(context.organization_id.clone()),
            context,
            config,
            store,
            notifier,
            outbox,
            events,
            worker,
            in_flight: 0,
            reloads: 0,
            drag,
            notifications: Vec::new(),
        };
        session.load().await?;
        Ok(session)
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Number of full reloads triggered by failed background updates.
    pub fn reload_count(&self) -> u64 {
        self.reloads
    }

    /// Batches handed to the outbox that have not reported back yet.
    pub fn pending_batches(&self) -> usize {
        self.in_flight
    }

    /// Fetch the full board, creating the default columns for a new
    /// organization. Legacy tasks without a column get one assigned, which
    /// is written back when configured to.
    pub async fn load(&mut self) -> BoardResult<()> {
        let org = self.context.organization_id.clone();
        let columns = self.store.ensure_default_columns(&org).await?;
        let (tasks, members) =
            futures::try_join!(self.store.list_tasks(&org), self.store.list_members(&org))?;

        let backfilled = self.state.replace(tasks, columns, members);
        info!(
            "Loaded board for {}: {} columns, {} tasks",
            org,
            self.state.columns().len(),
            self.state.tasks().len()
        );

        let hidden = self.state.orphaned().len();
        if hidden > 0 {
            debug!("{} tasks match no column and are hidden", hidden);
        }

        if self.config.sync.persist_backfill && !backfilled.is_empty() {
            let intents = backfilled
                .iter()
                .filter_map(|id| self.state.task(id))
                .filter_map(|task| {
                    task.column_id.clone().map(|column_id| Intent::UpdateTask {
                        task_id: task.id.clone(),
                        patch: TaskPatch {
                            column_id: Some(column_id),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            // A rejected backfill must not reload, or the reload would
            // backfill and fail again.
            if self.outbox.enqueue_log_only(intents).is_some() {
                self.in_flight += 1;
            }
        }
        Ok(())
    }

    fn enqueue(&mut self, intents: Vec<Intent>) {
        if self.outbox.enqueue(intents).is_some() {
            self.in_flight += 1;
        }
    }

    // Drag and drop

    pub fn begin_drag(&mut self, drag_id: &str, modality: InputModality, at: Point) -> bool {
        self.drag
            .press(DragItem::parse(drag_id), modality, at, Instant::now())
    }

    pub fn drag_to(&mut self, at: Point) -> bool {
        self.drag.move_to(at, Instant::now())
    }

    pub fn tick(&mut self) -> bool {
        self.drag.tick(Instant::now())
    }

    pub fn hover(&mut self, target: Option<&str>) {
        self.drag.hover(target.map(str::to_string));
    }

    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Finish the current gesture, reconciling at most once.
    pub fn end_drag(&mut self) -> Option<ReconcileKind> {
        let request = self.drag.release()?;
        Some(self.drop_item(&request.dragged, &request.target))
    }

    /// A complete keyboard lift, hover and drop.
    pub fn keyboard_drop(&mut self, dragged: &str, target: &str) -> Option<ReconcileKind> {
        self.begin_drag(dragged, InputModality::Keyboard, Point::new(0.0, 0.0));
        self.hover(Some(target));
        self.end_drag()
    }

    /// Apply a drop optimistically and queue its persistence.
    pub fn drop_item(&mut self, dragged: &str, target: &str) -> ReconcileKind {
        let reconciliation = self.state.reconcile(dragged, target);
        if let ReconcileKind::NoOp(reason) = reconciliation.kind {
            debug!(?reason, dragged, target, "Drop ignored");
            return reconciliation.kind;
        }
        debug!(
            kind = ?reconciliation.kind,
            intents = reconciliation.intents.len(),
            "Reconciled drop of {} onto {}",
            dragged,
            target
        );
        self.state.apply(&reconciliation);
        self.enqueue(reconciliation.intents);
        reconciliation.kind
    }

    // Background results

    async fn handle_event(&mut self, event: SyncEvent) {
        self.in_flight = self.in_flight.saturating_sub(1);
        let reload = event.needs_reload();
        let SyncEvent::BatchSettled {
            batch_id, failures, ..
        } = event;
        for failure in &failures {
            warn!(
                "Batch {}: {} failed after {} attempts: {}",
                batch_id,
                failure.intent.describe(),
                failure.attempts,
                failure.error
            );
        }
        if reload {
            self.reloads += 1;
            info!("Reloading board after failed update");
            if let Err(e) = self.load().await {
                warn!("Reload failed, board stays stale: {}", e);
            }
        }
    }

    /// Wait until every queued batch has reported back and every
    /// notification has been handed off.
    pub async fn settle(&mut self) {
        while self.in_flight > 0 {
            match self.events.recv().await {
                Some(event) => self.handle_event(event).await,
                None => {
                    error!(
                        "Outbox worker stopped with {} batches outstanding",
                        self.in_flight
                    );
                    self.in_flight = 0;
                }
            }
        }
        for handle in self.notifications.drain(..) {
            if let Err(e) = handle.await {
                warn!("Notification task failed: {}", e);
            }
        }
    }

    /// Settle, then stop the outbox worker.
    pub async fn shutdown(mut self) {
        self.settle().await;
        let Self { outbox, worker, .. } = self;
        drop(outbox);
        if let Err(e) = worker.await {
            error!("Outbox worker ended abnormally: {}", e);
        }
    }

    // Tasks

    fn column_for_new_task(&self, fields: &NewTask) -> BoardResult<Option<Column>> {
        if let Some(column_id) = fields.column_id.as_deref() {
            return self
                .state
                .column(column_id)
                .cloned()
                .map(Some)
                .ok_or_else(|| BoardError::not_found("column", column_id));
        }
        let by_status = fields.status.and_then(|status| {
            self.state
                .columns()
                .iter()
                .find(|c| c.matches_status(status.as_str()))
        });
        Ok(by_status
            .or_else(|| self.state.columns().first())
            .cloned())
    }

    pub async fn create_task(&mut self, mut fields: NewTask) -> BoardResult<Task> {
        if let Some(column) = self.column_for_new_task(&fields)? {
            if let Some(status) = column.legacy_status() {
                fields.status = Some(status);
            }
            fields.column_id = Some(column.id);
        }
        let task = self
            .store
            .create_task(&self.context.organization_id, fields)
            .await?;
        info!("Created task {} '{}'", task.id, task.title);
        self.load().await?;

        let assignees: Vec<MemberId> = task.assignee_ids().into_iter().cloned().collect();
        self.notify_assigned(&task, &assignees);
        Ok(task)
    }

    /// Keep column and legacy status in step: a new column derives the
    /// status, a new status alone moves the task to that status's column.
    fn align_column_and_status(&self, current: &Task, patch: &mut TaskPatch) -> BoardResult<()> {
        let target = match (&patch.column_id, patch.status) {
            (Some(column_id), _) => Some(
                self.state
                    .column(column_id)
                    .ok_or_else(|| BoardError::not_found("column", column_id))?,
            ),
            (None, Some(status)) => self.state.columns().iter().find(|c| {
                c.matches_status(status.as_str())
            }),
            (None, None) => None,
        };
        let Some(target) = target else {
            return Ok(());
        };

        if patch.status.is_none() {
            patch.status = target.legacy_status();
        }
        let moving = self
            .state
            .column_of(current)
            .map_or(true, |c| c.id != target.id);
        if moving {
            patch.column_id = Some(target.id.clone());
            if patch.position.is_none() {
                patch.position = Some(self.state.next_position_in_column(&target.id));
            }
        }
        Ok(())
    }

    pub async fn update_task(&mut self, task_id: &str, mut patch: TaskPatch) -> BoardResult<Task> {
        let before = self
            .state
            .task(task_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("task", task_id))?;
        if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
            return Err(BoardError::Validation("task title must not be empty".into()));
        }
        self.align_column_and_status(&before, &mut patch)?;

        let updated = self.store.update_task(task_id, patch.clone()).await?;
        self.load().await?;

        let previous: Vec<MemberId> = before.assignee_ids().into_iter().cloned().collect();
        if let Some(assignees) = &patch.assignees {
            let added: Vec<MemberId> = assignees
                .iter()
                .filter(|id| !previous.contains(id))
                .cloned()
                .collect();
            self.notify_assigned(&updated, &added);
        }

        let changes: Vec<&str> = patch
            .changed_fields()
            .into_iter()
            .filter(|f| *f != "assignees" && *f != "position")
            .collect();
        if !changes.is_empty() {
            let kept: Vec<MemberId> = previous
                .into_iter()
                .filter(|id| updated.is_assigned_to(id))
                .collect();
            let summary = format!("Updated {}", changes.join(", "));
            self.notify_updated(&updated, &kept, summary);
        }
        Ok(updated)
    }

    /// Flip completion. Completing notifies the task's assignees.
    pub async fn toggle_complete(&mut self, task_id: &str) -> BoardResult<Task> {
        let task = self
            .state
            .task(task_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("task", task_id))?;
        let completing = !task.completed;
        let patch = TaskPatch {
            completed: Some(completing),
            completed_at: if completing {
                FieldUpdate::Set(Utc::now())
            } else {
                FieldUpdate::Clear
            },
            ..Default::default()
        };
        let updated = self.store.update_task(task_id, patch).await?;
        self.load().await?;
        if completing {
            self.notify_completed(&updated);
        }
        Ok(updated)
    }

    pub async fn delete_task(&mut self, task_id: &str) -> BoardResult<()> {
        self.store.delete_task(task_id).await?;
        info!("Deleted task {}", task_id);
        self.load().await
    }

    // Columns

    pub async fn create_column(&mut self, title: &str, color: Option<String>) -> BoardResult<Column> {
        let mut fields = NewColumn::new(title.trim());
        if let Some(color) = color {
            fields.color = color;
        }
        let column = self
            .store
            .create_column(&self.context.organization_id, fields)
            .await?;
        info!("Created column {} '{}'", column.id, column.title);
        self.load().await?;
        Ok(column)
    }

    pub async fn rename_column(&mut self, column_id: &str, title: &str) -> BoardResult<Column> {
        let title = title.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("column title must not be empty".into()));
        }
        let patch = ColumnPatch {
            title: Some(title.to_string()),
            ..Default::default()
        };
        let column = self.store.update_column(column_id, patch).await?;
        self.load().await?;
        Ok(column)
    }

    /// Delete a column. Its tasks must be moved somewhere first, so a
    /// non-empty column needs `reassign_to`.
    pub async fn delete_column(&mut self, column_id: &str, reassign_to: Option<&str>) -> BoardResult<()> {
        let column = self
            .state
            .column(column_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("column", column_id))?;
        let tasks: Vec<Task> = self
            .state
            .tasks_in_column(column_id)
            .into_iter()
            .cloned()
            .collect();

        let target = if !tasks.is_empty() {
            let Some(target_id) = reassign_to else {
                return Err(BoardError::Validation(format!(
                    "column '{}' still has {} tasks; choose a column to move them to",
                    column.title,
                    tasks.len()
                )));
            };
            if target_id == column_id {
                return Err(BoardError::Validation(
                    "tasks cannot be moved into the column being deleted".into(),
                ));
            }
            let target = self
                .state
                .column(target_id)
                .cloned()
                .ok_or_else(|| BoardError::not_found("column", target_id))?;
            Some(target)
        } else {
            None
        };

        if let Err(e) = self.remove_column(&column, &tasks, target.as_ref()).await {
            warn!("Deleting column {} stopped partway: {}", column.id, e);
            if let Err(reload) = self.load().await {
                warn!("Reload failed, board stays stale: {}", reload);
            }
            return Err(e);
        }
        info!("Deleted column {} '{}'", column.id, column.title);
        self.load().await
    }

    /// Move `tasks` to the end of `target`, delete `column` and close the
    /// gap in column positions.
    async fn remove_column(
        &self,
        column: &Column,
        tasks: &[Task],
        target: Option<&Column>,
    ) -> BoardResult<()> {
        if let Some(target) = target {
            let status = target.legacy_status();
            let mut position = self.state.next_position_in_column(&target.id);
            for task in tasks {
                let patch = TaskPatch::relocate(target.id.clone(), position, status);
                self.store.update_task(&task.id, patch).await?;
                position += 1;
            }
        }

        self.store.delete_column(&column.id).await?;

        let remaining = self.state.columns().iter().filter(|c| c.id != column.id);
        for (index, c) in remaining.enumerate() {
            let index = index as i32;
            if c.position != index {
                self.store
                    .update_column(&c.id, ColumnPatch::position(index))
                    .await?;
            }
        }
        Ok(())
    }

    // Notifications

    fn actor(&self) -> Option<&TeamMember> {
        self.context
            .user_id
            .as_deref()
            .and_then(|user_id| self.state.member_by_user(user_id))
    }

    /// Members among `ids` other than the acting user who have an address.
    fn recipients(&self, ids: &[MemberId]) -> Vec<TeamMember> {
        let actor_id = self.actor().map(|a| a.id.clone());
        ids.iter()
            .filter_map(|id| self.state.member(id))
            .filter(|m| actor_id.as_deref() != Some(m.id.as_str()))
            .filter(|m| m.has_email())
            .cloned()
            .collect()
    }

    fn notify_assigned(&mut self, task: &Task, ids: &[MemberId]) {
        let actor = self.actor().cloned();
        let url = self.config.notifications.task_url(&task.id);
        let requests: Vec<NotificationRequest> = self
            .recipients(ids)
            .iter()
            .map(|m| NotificationRequest::task_assigned(task, m, actor.as_ref(), url.clone()))
            .collect();
        for request in requests {
            self.dispatch_notification(request);
        }
    }

    fn notify_updated(&mut self, task: &Task, ids: &[MemberId], changes: String) {
        let actor = self.actor().cloned();
        let url = self.config.notifications.task_url(&task.id);
        let requests: Vec<NotificationRequest> = self
            .recipients(ids)
            .iter()
            .map(|m| {
                NotificationRequest::task_updated(task, m, actor.as_ref(), changes.clone(), url.clone())
            })
            .collect();
        for request in requests {
            self.dispatch_notification(request);
        }
    }

    fn notify_completed(&mut self, task: &Task) {
        let actor = self.actor().cloned();
        let url = self.config.notifications.task_url(&task.id);
        let ids: Vec<MemberId> = task.assignee_ids().into_iter().cloned().collect();
        let requests: Vec<NotificationRequest> = self
            .recipients(&ids)
            .iter()
            .map(|m| NotificationRequest::task_completed(task, m, actor.as_ref(), url.clone()))
            .collect();
        for request in requests {
            self.dispatch_notification(request);
        }
    }

    /// Send `task-due-soon` for every open task due within the configured
    /// window. Returns how many notifications were queued.
    pub fn notify_due_soon(&mut self, now: DateTime<Utc>) -> usize {
        let window = ChronoDuration::hours(i64::from(self.config.notifications.due_soon_hours));
        let mut requests = Vec::new();
        for task in due_soon(self.state.tasks(), now, window) {
            let url = self.config.notifications.task_url(&task.id);
            let ids: Vec<MemberId> = task.assignee_ids().into_iter().cloned().collect();
            for member in self.recipients(&ids) {
                if let Some(request) = NotificationRequest::task_due_soon(task, &member, url.clone()) {
                    requests.push(request);
                }
            }
        }
        let mut queued = 0;
        for request in requests {
            if self.dispatch_notification(request) {
                queued += 1;
            }
        }
        queued
    }

    /// Validate and hand off without waiting. Returns whether it was queued.
    fn dispatch_notification(&mut self, request: NotificationRequest) -> bool {
        if !self.config.notifications.enabled {
            return false;
        }
        let kind = request.kind();
        let request = match request.validated() {
            Ok(request) => request,
            Err(e) => {
                warn!("Skipping {} notification: {}", kind.as_str(), e);
                return false;
            }
        };
        let notifier = self.notifier.clone();
        self.notifications.push(tokio::spawn(async move {
            if let Err(e) = notifier.notify(request).await {
                warn!("Failed to send {} notification: {}", kind.as_str(), e);
            }
        }));
        true
    }
}
