use chrono::Utc;

use crate::cli::NotifyAction;
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: NotifyAction) -> anyhow::Result<()> {
    match action {
        NotifyAction::DueSoon => {
            let queued = ctx.session.notify_due_soon(Utc::now());
            ctx.session.settle().await;
            output::output_success(serde_json::json!({"queued": queued}));
        }
    }
    Ok(())
}
