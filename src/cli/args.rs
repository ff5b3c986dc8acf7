//! CLI argument definitions using clap
//!
//! Commands:
//! - schemaform generate <schema> [--spec FILE | --spec-id ID] [--out FILE]
//! - schemaform infer <schema>
//! - schemaform validate <schema> --spec FILE
//! - schemaform batch --input DIR --output DIR
//! - schemaform spec save|show|list|delete
//! - schemaform serve [--port N]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// schemaform - turn JSON Schemas into laid-out HTML forms
#[derive(Parser, Debug)]
#[command(name = "schemaform")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (optional; defaults apply when absent)
    #[arg(long, global = true, default_value = "./schemaform.json")]
    pub config: PathBuf,

    /// Log every event, including per-schema tracing
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render one schema into an HTML form
    Generate {
        /// Schema file
        schema: PathBuf,

        /// Layout specification file to use instead of inferring one
        #[arg(long, conflicts_with = "spec_id")]
        spec: Option<PathBuf>,

        /// Stored specification to use instead of inferring one
        #[arg(long)]
        spec_id: Option<String>,

        /// Write the page here instead of into the response
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the applied specification here
        #[arg(long)]
        emit_spec: Option<PathBuf>,

        /// Templates directory (page.html, optional form.css)
        #[arg(long)]
        templates: Option<PathBuf>,

        /// Stop at the first violation
        #[arg(long)]
        strict: bool,
    },

    /// Print the inferred layout specification for a schema
    Infer {
        /// Schema file
        schema: PathBuf,
    },

    /// Check a layout specification against a schema
    Validate {
        /// Schema file
        schema: PathBuf,

        /// Layout specification file
        #[arg(long)]
        spec: PathBuf,
    },

    /// Render every schema in a directory
    Batch {
        /// Directory of *.json schemas
        #[arg(long)]
        input: PathBuf,

        /// Directory for the generated forms
        #[arg(long)]
        output: PathBuf,

        /// Files per shard
        #[arg(long)]
        batch_size: Option<usize>,

        /// Maximum concurrent shards
        #[arg(long)]
        workers: Option<usize>,

        /// Templates directory
        #[arg(long)]
        templates: Option<PathBuf>,
    },

    /// Manage stored layout specifications
    Spec {
        #[command(subcommand)]
        action: SpecAction,
    },

    /// Start the playground HTTP server
    Serve {
        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
pub enum SpecAction {
    /// Store a specification file under an id
    Save { id: String, file: PathBuf },
    /// Print a stored specification
    Show { id: String },
    /// List stored ids
    List,
    /// Remove a stored specification
    Delete { id: String },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
