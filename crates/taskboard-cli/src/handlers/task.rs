use taskboard_domain::{FieldUpdate, LegacyStatus, NewTask, Task, TaskPatch, TaskPriority};

use super::{parse_datetime, MoveOutcome};
use crate::cli::{TaskAction, TaskCreateArgs, TaskUpdateArgs};
use crate::context::CliContext;
use crate::output;

pub async fn handle(ctx: &mut CliContext, action: TaskAction) -> anyhow::Result<()> {
    match action {
        TaskAction::List { column } => {
            let tasks: Vec<Task> = match column {
                Some(key) => {
                    let column_id = ctx.column_id(&key)?;
                    ctx.session
                        .state()
                        .tasks_in_column(&column_id)
                        .into_iter()
                        .cloned()
                        .collect()
                }
                None => ctx
                    .session
                    .state()
                    .projection()
                    .lanes
                    .into_iter()
                    .flat_map(|lane| lane.tasks)
                    .collect(),
            };
            output::output_list(tasks);
        }
        TaskAction::Create(args) => {
            let fields = build_new_task(ctx, args)?;
            let task = ctx.session.create_task(fields).await?;
            output::output_success(&task);
        }
        TaskAction::Update(args) => {
            let id = args.id.clone();
            let patch = build_task_patch(ctx, args)?;
            let task = ctx.session.update_task(&id, patch).await?;
            output::output_success(&task);
        }
        TaskAction::Complete { id } => {
            let task = ctx.session.toggle_complete(&id).await?;
            output::output_success(&task);
        }
        TaskAction::Delete { id } => {
            ctx.session.delete_task(&id).await?;
            output::output_success(serde_json::json!({"deleted": id}));
        }
        TaskAction::Move { id, to, onto } => {
            ctx.require_task(&id)?;
            let target = match (to, onto) {
                (Some(column), _) => ctx.column_id(&column)?,
                (None, Some(task_id)) => {
                    ctx.require_task(&task_id)?;
                    task_id
                }
                (None, None) => anyhow::bail!("Either --to or --onto is required"),
            };
            let reloads = ctx.session.reload_count();

            let kind = ctx.session.keyboard_drop(&id, &target);
            ctx.session.settle().await;

            let reloaded = ctx.session.reload_count() > reloads;
            let task = ctx.session.state().task(&id).cloned();
            output::output_success(MoveOutcome::new(kind, reloaded, task));
        }
    }
    Ok(())
}

fn parse_priority(s: &str) -> anyhow::Result<TaskPriority> {
    TaskPriority::parse(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid priority '{}'. Valid values: low, medium, high, critical",
            s
        )
    })
}

fn parse_status(s: &str) -> anyhow::Result<LegacyStatus> {
    LegacyStatus::from_label(s).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid status '{}'. Valid values: todo, in-progress, review, done",
            s
        )
    })
}

fn build_new_task(ctx: &CliContext, args: TaskCreateArgs) -> anyhow::Result<NewTask> {
    Ok(NewTask {
        title: args.title,
        description: args.description,
        priority: match &args.priority {
            Some(p) => parse_priority(p)?,
            None => TaskPriority::default(),
        },
        column_id: match &args.column {
            Some(key) => Some(ctx.column_id(key)?),
            None => None,
        },
        status: match &args.status {
            Some(s) => Some(parse_status(s)?),
            None => None,
        },
        assignees: args.assignees,
        due_date: match &args.due_date {
            Some(d) => Some(parse_datetime(d)?),
            None => None,
        },
    })
}

fn build_task_patch(ctx: &CliContext, args: TaskUpdateArgs) -> anyhow::Result<TaskPatch> {
    Ok(TaskPatch {
        title: args.title,
        description: if args.clear_description {
            FieldUpdate::Clear
        } else {
            args.description
                .map(FieldUpdate::Set)
                .unwrap_or(FieldUpdate::NoChange)
        },
        priority: match &args.priority {
            Some(p) => Some(parse_priority(p)?),
            None => None,
        },
        column_id: match &args.column {
            Some(key) => Some(ctx.column_id(key)?),
            None => None,
        },
        status: match &args.status {
            Some(s) => Some(parse_status(s)?),
            None => None,
        },
        assignees: args.assignees,
        due_date: if args.clear_due_date {
            FieldUpdate::Clear
        } else {
            match &args.due_date {
                Some(d) => FieldUpdate::Set(parse_datetime(d)?),
                None => FieldUpdate::NoChange,
            }
        },
        ..Default::default()
    })
}
