//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

/// Derive trees from graph documents and resolve their mount points
#[derive(Parser, Debug)]
#[command(name = "graftree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the tree of a document
    Tree(LoadArgs),

    /// List non-tree edges
    Edges(LoadArgs),

    /// List mount points and their state
    Mounts(LoadArgs),

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// How to load a document.
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Graph document (TOML)
    #[arg(value_hint = ValueHint::FilePath)]
    pub file: PathBuf,

    /// Root node id (default: selected from the graph)
    #[arg(short, long)]
    pub root: Option<String>,

    /// Leave "now" mount points unresolved
    #[arg(long)]
    pub no_auto_mount: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a config template
    Template,
    /// Show the global config file location
    Path,
}
