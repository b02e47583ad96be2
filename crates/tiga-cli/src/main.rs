//! Tiga CLI - tasks and notes from the command line
//!
//! Quick capture plus the full todo surface against the hosted backend.

mod auth;
mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};
use tiga_core::config::AppConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tiga=info".parse().unwrap()),
        )
        .init();

    let args = Cli::parse();
    let config = AppConfig::from_env();

    match args.command {
        Some(Commands::Add {
            title,
            due,
            folder,
            doc,
            content,
        }) => {
            commands::add::run_add(
                &config,
                &title,
                due.as_deref(),
                folder,
                doc,
                content.as_deref(),
            )
            .await?;
        }
        Some(Commands::List {
            limit,
            docs,
            doc_tasks,
            json,
        }) => {
            commands::list::run_list(&config, limit, docs, doc_tasks, json).await?;
        }
        Some(Commands::Done { id }) => {
            commands::toggle::run_set_completed(&config, id, true).await?;
        }
        Some(Commands::Reopen { id }) => {
            commands::toggle::run_set_completed(&config, id, false).await?;
        }
        Some(Commands::Check { id, line }) => {
            commands::toggle::run_set_doc_task(&config, id, line, true).await?;
        }
        Some(Commands::Uncheck { id, line }) => {
            commands::toggle::run_set_doc_task(&config, id, line, false).await?;
        }
        Some(Commands::Edit { id, title, content }) => {
            commands::edit::run_edit(&config, id, title, content).await?;
        }
        Some(Commands::Due { id, date, clear }) => {
            commands::due::run_due(&config, id, date.as_deref(), clear).await?;
        }
        Some(Commands::Delete { id }) => {
            commands::delete::run_delete(&config, id).await?;
        }
        Some(Commands::Folder { command }) => {
            commands::folder::run_folder(&config, command).await?;
        }
        Some(Commands::Timeline { limit, json }) => {
            commands::timeline::run_timeline(&config, limit, json).await?;
        }
        Some(Commands::Export { output }) => {
            commands::export::run_export(&config, output.as_deref()).await?;
        }
        Some(Commands::Avatar { file }) => {
            commands::avatar::run_avatar(&config, &file).await?;
        }
        Some(Commands::Register {
            nickname,
            email,
            password,
        }) => {
            commands::register::run_register(&config, &nickname, &email, &password).await?;
        }
        Some(Commands::Auth { command }) => {
            commands::auth_cmd::run_auth(&config, command).await?;
        }
        Some(Commands::Completions { shell, output }) => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
        None => {
            // Quick capture mode: tiga "buy milk"
            if args.title.is_empty() {
                Cli::command().print_help().map_err(CliError::Io)?;
                println!();
            } else {
                commands::add::run_add(&config, &args.title, None, None, false, None).await?;
            }
        }
    }

    Ok(())
}
