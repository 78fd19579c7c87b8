//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Organization team hierarchy: list, add and remove teams level by level
#[derive(Parser, Debug)]
#[command(name = "teamtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output, repeat for more (-d -d -d)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Seed snapshot (TOML) the session starts from
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub seed: Option<PathBuf>,

    /// Organization context (default: from config)
    #[arg(short, long, global = true)]
    pub org: Option<String>,

    /// Directory holding the local .teamtree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List one level: root teams, or children of --parent
    Ls {
        /// Parent team name
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Show the hierarchy as a tree
    Tree {
        /// Maximum levels to expand (default: from config)
        #[arg(long)]
        depth: Option<usize>,
    },

    /// List teams whose parent no longer exists
    Orphans,

    /// Add a team and show its level (not persisted)
    Add {
        /// Team name
        name: String,
        /// Parent team name
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Remove all teams with this name and show the roots (not persisted)
    Rm {
        /// Team name
        name: String,
    },

    /// Run a session script (stdin when no file is given)
    Session {
        /// Script with one command per line
        #[arg(value_hint = ValueHint::FilePath)]
        script: Option<PathBuf>,
    },

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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}
