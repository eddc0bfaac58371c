use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "emo")]
#[command(about = "Outcome definitions for exploratory modeling runs", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the outcomes defined by a table or definitions file
    List {
        /// CSV table with `name` and `type` columns, or a `.toml` definitions file
        table: PathBuf,

        /// Field delimiter for CSV tables
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Process one run's raw output into outcome values
    Process {
        /// CSV table with `name` and `type` columns, or a `.toml` definitions file
        table: PathBuf,

        /// JSON object mapping variable names to raw values
        run: PathBuf,

        /// Field delimiter for CSV tables
        #[arg(long, default_value_t = ',')]
        delimiter: char,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
