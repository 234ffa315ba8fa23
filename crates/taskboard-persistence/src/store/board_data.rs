use serde::{Deserialize, Serialize};
use taskboard_core::{BoardError, BoardResult};
use taskboard_domain::commands::{
    Command, CommandContext, DeleteColumn, DeleteTask, InsertColumn, InsertTask, UpdateColumn,
    UpdateTask,
};
use taskboard_domain::{
    resolve_column_id, Column, ColumnPatch, NewColumn, NewTask, Task, TaskPatch, TeamMember,
};

/// The canonical rows behind a store, for every organization at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardData {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub columns: Vec<Column>,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

impl BoardData {
    fn execute(&mut self, command: &dyn Command) -> BoardResult<()> {
        tracing::debug!("Store executing: {}", command.description());
        let mut context = CommandContext {
            tasks: &mut self.tasks,
            columns: &mut self.columns,
        };
        command.execute(&mut context)
    }

    pub fn tasks_for(&self, organization_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.organization_id == organization_id)
            .cloned()
            .collect()
    }

    pub fn columns_for(&self, organization_id: &str) -> Vec<Column> {
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| c.organization_id == organization_id)
            .cloned()
            .collect();
        columns.sort_by_key(|c| c.position);
        columns
    }

    pub fn members_for(&self, organization_id: &str) -> Vec<TeamMember> {
        self.members
            .iter()
            .filter(|m| m.organization_id == organization_id)
            .cloned()
            .collect()
    }

    pub fn update_task(&mut self, task_id: &str, patch: TaskPatch) -> BoardResult<Task> {
        if let Some(column_id) = patch.column_id.as_deref() {
            if !self.columns.iter().any(|c| c.id == column_id) {
                return Err(BoardError::Validation(format!(
                    "column {} does not exist",
                    column_id
                )));
            }
        }
        self.execute(&UpdateTask {
            task_id: task_id.to_string(),
            patch,
        })?;
        self.find_task(task_id)
    }

    pub fn update_column(&mut self, column_id: &str, patch: ColumnPatch) -> BoardResult<Column> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(BoardError::Validation("column title must not be empty".into()));
        }
        self.execute(&UpdateColumn {
            column_id: column_id.to_string(),
            patch,
        })?;
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("column", column_id))
    }

    pub fn create_column(&mut self, organization_id: &str, fields: NewColumn) -> BoardResult<Column> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Err(BoardError::Validation("column title must not be empty".into()));
        }
        let position = self
            .columns
            .iter()
            .filter(|c| c.organization_id == organization_id)
            .count() as i32;
        let column = Column::new(
            organization_id.to_string(),
            title.to_string(),
            position,
            fields.color,
        );
        self.execute(&InsertColumn {
            column: column.clone(),
        })?;
        Ok(column)
    }

    pub fn delete_column(&mut self, column_id: &str) -> BoardResult<()> {
        self.execute(&DeleteColumn {
            column_id: column_id.to_string(),
        })
    }

    pub fn create_task(&mut self, organization_id: &str, fields: NewTask) -> BoardResult<Task> {
        if fields.title.trim().is_empty() {
            return Err(BoardError::Validation("task title must not be empty".into()));
        }
        if let Some(column_id) = fields.column_id.as_deref() {
            if !self.columns.iter().any(|c| c.id == column_id) {
                return Err(BoardError::Validation(format!(
                    "column {} does not exist",
                    column_id
                )));
            }
        }

        let columns = self.columns_for(organization_id);
        let mut task = Task::from_new(organization_id.to_string(), fields, 0);
        let lane = resolve_column_id(&task, &columns);
        task.position = self
            .tasks
            .iter()
            .filter(|t| t.organization_id == organization_id)
            .filter(|t| lane.is_some() && resolve_column_id(t, &columns) == lane)
            .count() as i32;
        if task.column_id.is_none() {
            task.column_id = lane;
        }

        self.execute(&InsertTask { task: task.clone() })?;
        Ok(task)
    }

    pub fn delete_task(&mut self, task_id: &str) -> BoardResult<()> {
        self.execute(&DeleteTask {
            task_id: task_id.to_string(),
        })
    }

    /// Returns the organization's columns and whether defaults were created.
    pub fn ensure_default_columns(&mut self, organization_id: &str) -> BoardResult<(Vec<Column>, bool)> {
        let existing = self.columns_for(organization_id);
        if !existing.is_empty() {
            return Ok((existing, false));
        }
        for column in Column::defaults(organization_id) {
            self.execute(&InsertColumn { column })?;
        }
        Ok((self.columns_for(organization_id), true))
    }

    fn find_task(&self, task_id: &str) -> BoardResult<Task> {
        self.tasks
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| BoardError::not_found("task", task_id))
    }
}
