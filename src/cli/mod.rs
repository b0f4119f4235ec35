//! CLI module - Command-line interface for Frases
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::import::ImportFormat;

/// Frases - canned rejection-letter phrase library
#[derive(Parser)]
#[command(name = "frases")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "web")]
    Serve,

    /// Import phrases from a CSV or XLSX file
    Import {
        /// File to import
        path: PathBuf,
        /// User recorded as importer and default reviewer
        #[arg(long, short)]
        user: String,
        /// File format (guessed from the extension by default)
        #[arg(long, value_enum)]
        format: Option<ImportFormatArg>,
        /// Report what would be imported without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Write a CSV backup of every phrase
    Export {
        /// Output file (defaults to frases_backup_<date>.csv)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Search phrases with linked company and document-type filters
    #[command(alias = "s")]
    Search {
        /// Search text
        query: Vec<String>,
        /// Restrict to one company
        #[arg(long)]
        company: Option<String>,
        /// Restrict to one document type
        #[arg(long)]
        document_type: Option<String>,
    },

    /// Manage user accounts
    Users {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// List all users
    #[command(alias = "ls")]
    List,
    /// Create a user (must change password on first login)
    Add {
        username: String,
        /// Initial password (a temporary one is generated if omitted)
        #[arg(long)]
        password: Option<String>,
        /// Grant administrator rights
        #[arg(long)]
        admin: bool,
    },
    /// Delete a user
    #[command(alias = "rm")]
    Remove { username: String },
    /// Replace a user's password with a temporary one
    ResetPassword { username: String },
}

#[derive(Clone, Copy, clap::ValueEnum)]
pub enum ImportFormatArg {
    Csv,
    Xlsx,
}

impl From<ImportFormatArg> for ImportFormat {
    fn from(arg: ImportFormatArg) -> Self {
        match arg {
            ImportFormatArg::Csv => Self::Csv,
            ImportFormatArg::Xlsx => Self::Xlsx,
        }
    }
}

pub use commands::*;
