//! Command-line argument parsing for EpiGuard
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::config::ContactKind;
use crate::types::Language;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// EpiGuard - conversational symptom tracker
#[derive(Parser, Debug)]
#[command(name = "epiguard")]
#[command(version)]
#[command(about = "Chat about how you feel; EpiGuard keeps your symptom timeline", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Display language (en, es, fr)
    #[arg(short, long)]
    pub language: Option<Language>,

    /// Chat model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Base URL of the OpenAI-compatible chat endpoint
    #[arg(long)]
    pub base_url: Option<String>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (only warnings and errors are logged)
    #[arg(short, long)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start an interactive tracking session (default)
    Chat,

    /// Display current configuration
    Config,

    /// Show the advice given for a severity label
    Advice {
        /// Severity label, e.g. Severe, Moderate, Mild
        severity: String,
    },

    /// Manage emergency contacts
    Contacts {
        #[command(subcommand)]
        command: Option<ContactsCommand>,
    },
}

/// Emergency contact subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ContactsCommand {
    /// List contacts (default)
    List,

    /// Add a contact
    Add {
        name: String,
        number: String,
        #[arg(long, value_enum, default_value_t = KindArg::Personal)]
        kind: KindArg,
    },

    /// Remove a contact by its number in the list
    Remove { position: usize },
}

/// Contact kind as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindArg {
    Medical,
    Personal,
    Emergency,
}

impl From<KindArg> for ContactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Medical => ContactKind::Medical,
            KindArg::Personal => ContactKind::Personal,
            KindArg::Emergency => ContactKind::Emergency,
        }
    }
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Subcommand to run, `Chat` when none was given
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default log filter directive for this level
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "epiguard=info,warn",
            Verbosity::VeryVerbose => "epiguard=debug,info",
        }
    }

    /// Check if should show the thinking spinner
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
