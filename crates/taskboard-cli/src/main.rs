mod cli;
mod context;
mod handlers;
mod output;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::CliContext;
use tracing_subscriber::EnvFilter;

fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TASKBOARD_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
            )
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "taskboard", &mut std::io::stdout());
            return Ok(());
        }
        other => other,
    };

    let Some(file_path) = cli.file else {
        output::output_usage_error("--file is required (or set TASKBOARD_FILE)");
    };

    let mut ctx = match CliContext::open(&file_path, cli.org, cli.user).await {
        Ok(ctx) => ctx,
        Err(e) => output::output_error(&anyhow::Error::from(e)),
    };

    let result = match command {
        Commands::Board(board_cmd) => handlers::board::handle(&mut ctx, board_cmd.action).await,
        Commands::Column(column_cmd) => {
            handlers::column::handle(&mut ctx, column_cmd.action).await
        }
        Commands::Task(task_cmd) => handlers::task::handle(&mut ctx, task_cmd.action).await,
        Commands::Member(member_cmd) => {
            handlers::member::handle(&mut ctx, member_cmd.action).await
        }
        Commands::Notify(notify_cmd) => {
            handlers::notify::handle(&mut ctx, notify_cmd.action).await
        }
        Commands::Completions { .. } => Ok(()),
    };

    ctx.finish().await;
    if let Err(e) = result {
        output::output_error(&e);
    }
    Ok(())
}
