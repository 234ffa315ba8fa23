use taskboard_core::BoardResult;

pub mod column_commands;
pub mod task_commands;

pub use column_commands::*;
pub use task_commands::*;

/// A mutation of board state.
///
/// Stores run the same commands against their canonical lists that the
/// board state runs against its local copy, so both sides share one
/// definition of what an update means.
pub trait Command: Send + Sync {
    fn execute(&self, context: &mut CommandContext) -> BoardResult<()>;

    fn description(&self) -> String;
}

pub struct CommandContext<'a> {
    pub tasks: &'a mut Vec<crate::Task>,
    pub columns: &'a mut Vec<crate::Column>,
}
