//! Command-line entry point.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskherd::api;
use taskherd::cli;
use taskherd::config::Config;
use taskherd::store::TaskStore;
use taskherd::task::{parse_deadline, DoneChange, TaskPatch};

#[derive(Parser)]
#[command(name = "taskherd", about = "Personal task tracker", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new task interactively
    Add,
    /// List tasks
    List {
        /// Include completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Delete every task with a matching summary
    Delete {
        /// Summary of the task(s) to delete
        summary: String,
    },
    /// Update every task with a matching summary
    Set {
        /// Summary of the task(s) to update
        #[arg(value_name = "MATCH")]
        match_summary: String,
        /// Set the completion state explicitly
        #[arg(long)]
        done: Option<bool>,
        /// Flip the completion state instead of setting it
        #[arg(long, conflicts_with = "done")]
        toggle: bool,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        details: Option<String>,
        #[arg(long)]
        priority: Option<i64>,
        /// New deadline, YYYY-MM-DD
        #[arg(long)]
        deadline: Option<String>,
    },
    /// Start the local web server
    Serve,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let store = Arc::new(TaskStore::new(config.data_file.clone()));

    match args.command {
        Command::Add => {
            let input = cli::prompt_new_task()?;
            let task = store
                .create(&input.summary, &input.details, &input.deadline, &input.priority)
                .await?;
            println!("task added: {:?}", task.summary);
        }

        Command::List { all } => {
            let tasks = store.list().await;
            cli::print_list(&tasks, all);
        }

        Command::Delete { summary } => {
            let removed = store.delete(&summary).await;
            if removed == 0 {
                println!("no task found with summary: {summary:?}");
            } else {
                println!("deleted {removed} task(s) with summary {summary:?}");
            }
        }

        Command::Set {
            match_summary,
            done,
            toggle,
            summary,
            details,
            priority,
            deadline,
        } => {
            let deadline = match deadline.as_deref() {
                Some(text) => parse_deadline(text)?,
                None => None,
            };
            let patch = TaskPatch {
                done: if toggle {
                    Some(DoneChange::Toggle)
                } else {
                    done.map(DoneChange::Set)
                },
                summary,
                details,
                priority,
                deadline,
            };
            if patch.is_empty() {
                anyhow::bail!(
                    "no fields provided; use --done/--toggle/--summary/--details/--priority/--deadline"
                );
            }

            let updated = store.patch(&match_summary, &patch).await?;
            if updated == 0 {
                println!("no task found with summary: {match_summary:?}");
            } else {
                println!("updated {updated} task(s) with summary {match_summary:?}");
            }
        }

        Command::Serve => {
            api::serve(config, store).await?;
        }
    }

    Ok(())
}
