//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// offerbase: catalog ingestion and dedupe tooling for affiliate content sites
#[derive(Parser, Debug)]
#[command(name = "offerbase")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest a catalog feed into the product store
    Ingest(IngestArgs),

    /// One-shot dedupe key derivation for a title
    Dedupe(DedupeArgs),

    /// Generate a product description via the completion API
    Describe(DescribeArgs),

    /// Inspect and resolve site configurations
    Sites(SitesArgs),

    /// Configuration management
    Config(ConfigArgs),

    /// Validate configuration and show status
    Doctor(DoctorArgs),
}

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Feed file with one JSON listing per line (use - for stdin)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Apply writes instead of reporting what would happen
    #[arg(long)]
    pub apply: bool,

    /// Override catalog database path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Output per-listing outcomes as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DedupeArgs {
    /// Product title to derive the key for
    #[arg(long, conflicts_with = "file")]
    pub title: Option<String>,

    /// File containing the title (use - for stdin)
    #[arg(long, conflicts_with = "title")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Product title to describe
    #[arg(long)]
    pub title: String,

    /// Merchant name for context
    #[arg(long)]
    pub merchant: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommands,
}

#[derive(Subcommand, Debug)]
pub enum SitesCommands {
    /// List all configured sites
    List {
        /// Override sites directory
        #[arg(long)]
        sites_dir: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single site configuration
    Show {
        /// Site id to show
        site_id: String,

        /// Override sites directory
        #[arg(long)]
        sites_dir: Option<PathBuf>,
    },

    /// Resolve a site id from request-like inputs
    Resolve {
        /// Explicit site id (highest priority)
        #[arg(long)]
        site: Option<String>,

        /// Raw Cookie header value
        #[arg(long)]
        cookie: Option<String>,

        /// Request host
        #[arg(long)]
        host: Option<String>,

        /// Override sites directory
        #[arg(long)]
        sites_dir: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Init {
        /// Path to write config file
        #[arg(long, default_value = "./config.toml")]
        path: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
