use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// A tool to filter network request logs with free-text queries
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short = 'F', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the rendered output to a file as well as stdout
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Filter records in a request log by a query string
    Filter {
        /// Request log file (JSON array or one JSON record per line)
        file: PathBuf,

        /// Query, e.g. "method:GET -status-code:404 api"
        query: String,

        /// Print only the number of matching records
        #[arg(short, long)]
        count: bool,
    },
    /// Show how a query string is parsed into terms and clauses
    Explain {
        /// Query to parse
        query: String,
    },
    /// List every flag key the query syntax recognizes
    Keys,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
