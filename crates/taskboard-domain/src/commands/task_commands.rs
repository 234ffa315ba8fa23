use super::{Command, CommandContext};
use crate::{Task, TaskId, TaskPatch};
use taskboard_core::{BoardError, BoardResult};

pub struct InsertTask {
    pub task: Task,
}

impl Command for InsertTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        if context.tasks.iter().any(|t| t.id == self.task.id) {
            return Err(BoardError::Validation(format!(
                "task {} already exists",
                self.task.id
            )));
        }
        context.tasks.push(self.task.clone());
        Ok(())
    }

    fn description(&self) -> String {
        format!("Insert task: '{}'", self.task.title)
    }
}

pub struct UpdateTask {
    pub task_id: TaskId,
    pub patch: TaskPatch,
}

impl Command for UpdateTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let task = context
            .tasks
            .iter_mut()
            .find(|t| t.id == self.task_id)
            .ok_or_else(|| BoardError::not_found("task", &self.task_id))?;
        self.patch.apply_to(task);
        Ok(())
    }

    fn description(&self) -> String {
        format!(
            "Update task {} ({})",
            self.task_id,
            self.patch.changed_fields().join(", ")
        )
    }
}

pub struct DeleteTask {
    pub task_id: TaskId,
}

impl Command for DeleteTask {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()> {
        let before = context.tasks.len();
        context.tasks.retain(|t| t.id != self.task_id);
        if context.tasks.len() == before {
            return Err(BoardError::not_found("task", &self.task_id));
        }
        Ok(())
    }

    fn description(&self) -> String {
        format!("Delete task {}", self.task_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;

    #[test]
    fn test_insert_update_delete() {
        let mut tasks = Vec::new();
        let mut columns: Vec<Column> = Vec::new();
        let task = Task::new("org".into(), "Write".into(), 0);
        let id = task.id.clone();

        let mut ctx = CommandContext {
            tasks: &mut tasks,
            columns: &mut columns,
        };
        InsertTask { task }.execute(&mut ctx).unwrap();
        UpdateTask {
            task_id: id.clone(),
            patch: TaskPatch::position(2),
        }
        .execute(&mut ctx)
        .unwrap();
        assert_eq!(ctx.tasks[0].position, 2);

        DeleteTask { task_id: id.clone() }.execute(&mut ctx).unwrap();
        assert!(ctx.tasks.is_empty());

        let err = DeleteTask { task_id: id }.execute(&mut ctx).unwrap_err();
        assert!(matches!(err, BoardError::NotFound(_)));
    }

    #[test]
    fn test_update_missing_task() {
        let mut tasks = Vec::new();
        let mut columns = Vec::new();
        let mut ctx = CommandContext {
            tasks: &mut tasks,
            columns: &mut columns,
        };
        let err = UpdateTask {
            task_id: "nope".into(),
            patch: TaskPatch::position(0),
        }
        .execute(&mut ctx)
        .unwrap_err();
        assert_eq!(err.to_string(), "Not found: task nope");
    }
}
