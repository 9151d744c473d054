// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `patchboard`: the Router CLI client (spec.md §6) — `run`, `status`,
//! `routes`, `link`, `unlink`, `quit`.

mod commands;
mod mailbox;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "patchboard", about = "Client for the Patchboard router daemon")]
struct Cli {
    /// Router project directory.
    #[arg(long, global = true)]
    project: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start `patchboardd` against this project and wait for it to exit.
    Run {
        /// Optional TOML config file (`[router]` table).
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the router's published `status.json`.
    Status,
    /// Print the router's published `routes.json`.
    Routes,
    /// Submit a `link` request onto the router's `INBOX`.
    Link {
        #[arg(long = "sf")]
        source_folder: String,
        #[arg(long = "sc")]
        source_channel: String,
        #[arg(long = "df")]
        destination_folder: String,
        #[arg(long = "dc")]
        destination_channel: String,
        /// Path to wait for an acknowledgement at, if given.
        #[arg(long)]
        ack: Option<String>,
    },
    /// Submit an `unlink` request onto the router's `INBOX`.
    Unlink {
        #[arg(long = "sf")]
        source_folder: String,
        #[arg(long = "sc")]
        source_channel: String,
        #[arg(long = "df")]
        destination_folder: String,
        #[arg(long = "dc")]
        destination_channel: String,
        #[arg(long)]
        ack: Option<String>,
    },
    /// Submit a `quit` request onto the router's `INBOX`.
    Quit,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run { config } => commands::run(&cli.project, config.as_deref()).map(|code| {
            if code == 0 {
                None
            } else {
                Some(code)
            }
        }),
        Command::Status => commands::status(&cli.project).map(|()| None),
        Command::Routes => commands::routes(&cli.project).map(|()| None),
        Command::Link { source_folder, source_channel, destination_folder, destination_channel, ack } => {
            commands::link(&cli.project, source_folder, source_channel, destination_folder, destination_channel, ack)
                .map(|()| None)
        }
        Command::Unlink { source_folder, source_channel, destination_folder, destination_channel, ack } => {
            commands::unlink(&cli.project, source_folder, source_channel, destination_folder, destination_channel, ack)
                .map(|()| None)
        }
        Command::Quit => commands::quit(&cli.project).map(|()| None),
    };

    match result {
        Ok(Some(code)) => exit_code_from(code),
        Ok(None) => ExitCode::SUCCESS,
        Err(source) => {
            eprintln!("patchboard: {source:#}");
            ExitCode::FAILURE
        }
    }
}

fn exit_code_from(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
