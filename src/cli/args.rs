//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Ordered key/value strings and navigable outline trees
#[derive(Parser, Debug)]
#[command(name = "kvtree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file, layered over the global config
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode, decode and format serialized maps
    Map {
        #[command(subcommand)]
        command: MapCommands,
    },

    /// Inspect outline files as trees
    Tree {
        #[command(subcommand)]
        command: TreeCommands,
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

/// Map subcommands
#[derive(Subcommand, Debug)]
pub enum MapCommands {
    /// Serialize KEY=VALUE pairs (later keys replace earlier ones)
    Encode {
        /// Entries as KEY=VALUE
        #[arg(required = true)]
        entries: Vec<String>,

        /// Delimiter between keys and values (default: key=value pairs)
        #[arg(long)]
        delim: Option<String>,
    },

    /// Print the entries of a serialized map
    Decode {
        /// Serialized map text
        text: String,

        /// Delimiter between keys and values (default: key=value pairs)
        #[arg(long)]
        delim: Option<String>,
    },

    /// Expand the `{i}` placeholders of the template stored under KEY
    Format {
        /// Serialized map text
        text: String,

        /// Key of the template
        key: String,

        /// Placeholder arguments, `{0}` is the first
        args: Vec<String>,

        /// Delimiter between keys and values (default: key=value pairs)
        #[arg(long)]
        delim: Option<String>,
    },
}

/// Tree subcommands
#[derive(Subcommand, Debug)]
pub enum TreeCommands {
    /// Render an outline file as a tree
    Show {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List nodes in preorder, one step at a time
    Walk {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        /// Walk backwards from the last node
        #[arg(short, long)]
        reverse: bool,
    },

    /// List leaves left to right
    Leaves {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Print a commented default config
    Template,
    /// Show the global config file path
    Path,
}
