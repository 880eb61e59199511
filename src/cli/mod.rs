// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;
pub mod sessions;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "kotoba", about = "Language-learning chat with an AI partner", version)]
pub struct Cli {
    /// Config file path
    #[arg(long)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Interactive chat session (default command)
    Chat {
        /// Session id to resume (defaults to the last active session)
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Manage chat sessions
    Sessions {
        #[command(subcommand)]
        action: Option<SessionAction>,
    },
}

#[derive(Subcommand, Clone)]
pub enum SessionAction {
    /// List all sessions
    List,
    /// Create a new session and make it active
    New {
        /// Native language (defaults from config)
        #[arg(long)]
        native: Option<String>,
        /// Language being learned (defaults from config)
        #[arg(long)]
        learning: Option<String>,
    },
    /// Delete a session — interactive picker if no id given
    Delete { id: Option<String> },
    /// Make a session active
    Use { id: String },
}
