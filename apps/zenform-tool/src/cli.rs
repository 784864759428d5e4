use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load a schema file and report its tables and fields
    Check {
        /// Schema file to validate
        schema: PathBuf,

        /// Print the built tables as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the built-in field types
    Types {
        /// Print the descriptors as JSON
        #[arg(long)]
        json: bool,
    },
}
