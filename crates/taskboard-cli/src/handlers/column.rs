use taskboard_domain::COLUMN_DRAG_PREFIX;

use super::MoveOutcome;
use crate::cli::ColumnAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: ColumnAction) -> anyhow::Result<()> {
    match action {
        ColumnAction::List => {
            output::output_list(ctx.session.state().columns().to_vec());
        }
        ColumnAction::Create { title, color } => {
            let column = ctx.session.create_column(&title, color).await?;
            output::output_success(&column);
        }
        ColumnAction::Rename { id, title } => {
            let id = ctx.column_id(&id)?;
            let column = ctx.session.rename_column(&id, &title).await?;
            output::output_success(&column);
        }
        ColumnAction::Delete { id, move_tasks_to } => {
            let id = ctx.column_id(&id)?;
            let target = match move_tasks_to {
                Some(key) => Some(ctx.column_id(&key)?),
                None => None,
            };
            ctx.session.delete_column(&id, target.as_deref()).await?;
            output::output_success(serde_json::json!({"deleted": id}));
        }
        ColumnAction::Move { id, to } => {
            let dragged = ctx.column_id(&id)?;
            let target = ctx.column_id(&to)?;
            let reloads = ctx.session.reload_count();

            let kind = ctx.session.keyboard_drop(
                &format!("{}{}", COLUMN_DRAG_PREFIX, dragged),
                &format!("{}{}", COLUMN_DRAG_PREFIX, target),
            );
            ctx.session.settle().await;

            let reloaded = ctx.session.reload_count() > reloads;
            let columns = ctx.session.state().columns().to_vec();
            output::output_success(MoveOutcome::new(kind, reloaded, columns));
        }
    }
    Ok(())
}
