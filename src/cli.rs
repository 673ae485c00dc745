use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "docqa", version)]
#[command(about = "Ask questions about a folder of documents")]
pub(crate) struct Cli {
    /// Path to the TOML config file (default: $DOCQA_CONFIG or config/default.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Run the HTTP API
    Serve,

    /// Rebuild the search index from the document folder
    Ingest,

    /// Create the search collection without ingesting
    SetupIndex,

    /// Answer a question from the indexed documents
    Ask {
        question: String,
        /// Print the answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Split a file or folder into chunks and print them
    Chunk {
        path: PathBuf,
        #[arg(long)]
        chunk_size: Option<usize>,
        #[arg(long)]
        chunk_overlap: Option<usize>,
        /// Disable sentence-boundary snapping
        #[arg(long)]
        hard_cuts: bool,
        #[arg(long)]
        json: bool,
    },

    /// Split a document into header-delimited sections
    Sections {
        path: PathBuf,
        /// Header prefix; repeatable. Defaults to "#", "##", "###"
        #[arg(long = "marker")]
        markers: Vec<String>,
        #[arg(long)]
        json: bool,
    },

    /// Summarize the documents in the configured folder
    Stats,

    /// Print the effective non-sensitive configuration
    Config,
}
