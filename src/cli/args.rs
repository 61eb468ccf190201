//! CLI argument definitions using clap
//!
//! Commands:
//! - typedstore create <type> <name> [--data <json>]
//! - typedstore update <type> <name> [--data <json>]
//! - typedstore delete | exists | get | lookup <type> <name>
//! - typedstore list <type>
//! - typedstore schemas

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// typedstore - typed, schema-validated record storage
#[derive(Parser, Debug)]
#[command(name = "typedstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "./typedstore.json")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create a new record
    Create {
        /// Record type
        #[arg(value_name = "TYPE")]
        type_name: String,
        /// Record name
        name: String,
        /// JSON payload; read from stdin when omitted
        #[arg(long)]
        data: Option<String>,
    },

    /// Replace an existing record
    Update {
        #[arg(value_name = "TYPE")]
        type_name: String,
        name: String,
        /// JSON payload; read from stdin when omitted
        #[arg(long)]
        data: Option<String>,
    },

    /// Delete an existing record
    Delete {
        #[arg(value_name = "TYPE")]
        type_name: String,
        name: String,
    },

    /// Report whether a record exists
    Exists {
        #[arg(value_name = "TYPE")]
        type_name: String,
        name: String,
    },

    /// Print an existing record
    Get {
        #[arg(value_name = "TYPE")]
        type_name: String,
        name: String,
    },

    /// Print a record, or null when it does not exist
    Lookup {
        #[arg(value_name = "TYPE")]
        type_name: String,
        name: String,
    },

    /// List record names of a type
    List {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// List registered types
    Schemas,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
