use serde::Serialize;
use taskboard_domain::{BoardState, Column, Task};
use taskboard_persistence::{ChangeDetector, FileWatcher};
use tokio::sync::broadcast::error::RecvError;

use crate::cli::BoardAction;
use crate::context::CliContext;
use crate::output;

#[derive(Serialize)]
pub struct LaneView {
    pub column: Column,
    pub count: usize,
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct BoardView {
    pub organization_id: String,
    pub lanes: Vec<LaneView>,
    /// Tasks that match no column and are not shown.
    pub hidden_tasks: usize,
}

impl BoardView {
    pub fn from_state(state: &BoardState) -> Self {
        let lanes = state
            .projection()
            .lanes
            .into_iter()
            .map(|lane| LaneView {
                count: lane.tasks.len(),
                column: lane.column,
                tasks: lane.tasks,
            })
            .collect();
        Self {
            organization_id: state.organization_id().to_string(),
            lanes,
            hidden_tasks: state.orphaned().len(),
        }
    }
}

pub async fn handle(ctx: &mut CliContext, action: BoardAction) -> anyhow::Result<()> {
    match action {
        BoardAction::Show => {
            ctx.session.settle().await;
            output::output_success(BoardView::from_state(ctx.session.state()));
        }
        BoardAction::Watch { limit } => watch(ctx, limit).await?,
    }
    Ok(())
}

async fn watch(ctx: &mut CliContext, limit: Option<usize>) -> anyhow::Result<()> {
    ctx.session.settle().await;
    let watcher = FileWatcher::new();
    let mut changes = watcher.subscribe();
    watcher.start_watching(ctx.path().to_path_buf()).await?;
    output::output_success(BoardView::from_state(ctx.session.state()));

    let mut seen = 0;
    while limit.map_or(true, |limit| seen < limit) {
        tokio::select! {
            change = changes.recv() => match change {
                Ok(change) => {
                    tracing::debug!("Board file changed at {}", change.detected_at);
                    ctx.session.load().await?;
                    ctx.session.settle().await;
                    output::output_success(BoardView::from_state(ctx.session.state()));
                    seen += 1;
                }
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!("Missed {} change notifications", missed);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    watcher.stop_watching().await?;
    Ok(())
}
