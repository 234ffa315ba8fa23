use super::{Command, CommandContext};
use crate::{Column, ColumnId, ColumnPatch};
use taskboard_core::{BoardError, BoardResult};

pub struct InsertColumn {
    pub column: Column,
}

impl Command for InsertColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if context.columns.iter().any(|c| c.id == self.column.id) {
            return Err(BoardError::Validation(format!(
                "column {} already exists",
                self.column.id
            )));
        }
        context.columns.push(self.column.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Insert column: '{}'", self.column.title)
    }
}

/// Update column properties (title, position, color)
pub struct UpdateColumn {
    pub column_id: ColumnId,
    pub patch: ColumnPatch,
}

impl Command for UpdateColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let column = context
            .columns
            .iter_mut()
            .find(|c| c.id == self.column_id)
            .ok_or_else(|| BoardError::not_found("column", &self.column_id))?;
        self.patch.apply_to(column);
        Ok(())
    }

    fn description(&self) -> String {
        format!("Update column {}", self.column_id)
    }
}

/// Removes only the column row. Reassigning its tasks is the caller's job.
pub struct DeleteColumn {
    pub column_id: ColumnId,
}

impl Command for DeleteColumn {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let before = context.columns.len();
        context.columns.retain(|c| c.id != self.column_id);
        if context.columns.len() == before {
            return Err(BoardError::not_found("column", &self.column_id));
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete column {}", self.column_id)
    }
}
