//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `resolve`: Dictionary key and field read at a source position
//! - `hover`: Hover details for a source position
//! - `definition`: Content declaration of the field read at a source position
//! - `usages`: Every file reading a dictionary key
//! - `references`: Reads of the field under a position in a content file
//! - `unused`: Unused fields of a content declaration file
//! - `previews`: Inline default-locale text for a source file
//! - `locate`: Position of a field path inside a file
//! - `watch`: Re-run the unused report when a content file changes
//! - `init`: Initialize dictscope configuration file
//! - `serve`: Start MCP server for AI integration

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::data::Position;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        self.common().is_some_and(|common| common.verbose)
    }

    pub fn common(&self) -> Option<&CommonArgs> {
        match self.command.as_ref()? {
            Command::Resolve(cmd)
            | Command::Hover(cmd)
            | Command::Definition(cmd)
            | Command::References(cmd) => Some(&cmd.common),
            Command::Usages(cmd) => Some(&cmd.common),
            Command::Unused(cmd) | Command::Previews(cmd) | Command::Watch(cmd) => Some(&cmd.common),
            Command::Locate(cmd) => Some(&cmd.common),
            Command::Init | Command::Serve => None,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Workspace root directory (default: current directory)
    #[arg(long, env = "DICTSCOPE_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// A file plus a 1-based line and column, as editors and compilers print them.
#[derive(Debug, Args)]
pub struct PositionCommand {
    /// Source file
    pub file: PathBuf,
    /// Line number (1-based)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub line: u32,
    /// Column (1-based, in UTF-16 code units)
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub column: u32,
    #[command(flatten)]
    pub common: CommonArgs,
}

impl PositionCommand {
    pub fn position(&self) -> Position {
        Position::new(self.line - 1, self.column - 1)
    }
}

#[derive(Debug, Args)]
pub struct FileCommand {
    pub file: PathBuf,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct UsagesCommand {
    /// Dictionary key
    pub key: String,
    /// Project root to scan (default: the workspace root)
    #[arg(long)]
    pub project: Option<PathBuf>,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct LocateCommand {
    /// Dictionary or content declaration file
    pub file: PathBuf,
    /// Dotted field path, e.g. `content.hero.title`
    pub field: String,
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the dictionary key and field read at a position
    Resolve(PositionCommand),
    /// Show type and content of the dictionary field read at a position
    Hover(PositionCommand),
    /// Find where the field read at a position is declared
    Definition(PositionCommand),
    /// List every file that reads a dictionary key
    Usages(UsagesCommand),
    /// From a content declaration file, list reads of the field under a position
    References(PositionCommand),
    /// Report unused fields of a content declaration file
    Unused(FileCommand),
    /// Show inline previews of the content read in a source file
    Previews(FileCommand),
    /// Find the position of a field path in a dictionary or content file
    Locate(LocateCommand),
    /// Watch a content declaration file and report unused fields on change
    Watch(FileCommand),
    /// Initialize a new .dictscoperc.json configuration file
    Init,
    /// Start MCP server for AI coding agents
    Serve,
}
