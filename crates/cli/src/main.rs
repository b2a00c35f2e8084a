// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod commands;

use clap::Parser;
use commands::{Command, Context};
use ideaflow::{WorkflowConfig, WorkflowService};
use ideaflow_audit::Cause;
use ideaflow_persistence::Persistence;
use std::io::Write;
use tracing::{error, info};

/// ideaflow - operator command line for the innovation workflow
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// How many times a lost compare-and-set is retried before giving up
    #[arg(long, default_value_t = ideaflow::DEFAULT_MAX_CONFLICT_RETRIES)]
    max_retries: u32,

    /// Numeric ID of the user performing the request
    #[arg(short, long)]
    actor: Option<i64>,

    /// Roles of the acting user, comma separated
    #[arg(short, long, value_delimiter = ',', default_value = "user")]
    roles: Vec<String>,

    /// Reason recorded in the audit trail
    #[arg(long, default_value = "Operator request")]
    reason: String,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let config: WorkflowConfig =
        WorkflowConfig::default().with_max_conflict_retries(args.max_retries);
    let workflow = WorkflowService::new(&persistence, &persistence, config)?;
    let context: Context<'_, '_> = Context {
        workflow: &workflow,
        persistence: &persistence,
        actor_id: args.actor,
        roles: args.roles,
        cause: Cause::new(String::from("cli"), args.reason),
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match commands::execute(&context, args.command, &mut out) {
        Ok(Some(response)) => {
            serde_json::to_writer_pretty(&mut out, &response)?;
            writeln!(out)?;
            Ok(())
        }
        Ok(None) => Ok(()),
        Err(err) => {
            error!(error = %err, "Command failed");
            Err(Box::new(err) as Box<dyn std::error::Error>)
        }
    }
}
