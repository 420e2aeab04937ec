//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::constants::{
    DB_PATH, DB_PATH_ENV, DEFAULT_DOWNLOAD_PATH, DEFAULT_SOURCE_URL, HTTP_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Command-line interface of the `public_dns` binary.
#[derive(Debug, Parser)]
#[command(name = "public_dns", version, about)]
pub struct Cli {
    /// SQLite database holding the resolver list
    #[arg(long, global = true, env = DB_PATH_ENV, default_value = DB_PATH)]
    pub db_path: PathBuf,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// HTTP timeout in seconds when downloading the resolver list
    #[arg(long, global = true, default_value_t = HTTP_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Print results as JSON lines instead of tab-separated text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands of the `public_dns` binary.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the resolver list and replace the contents of the database
    Ingest {
        /// Read the list from a local CSV file
        #[arg(long, conflicts_with = "url")]
        file: Option<PathBuf>,

        /// Download the list from this URL (defaults to public-dns.info)
        #[arg(long)]
        url: Option<String>,

        /// Where the downloaded list is staged before decoding
        #[arg(long, default_value = DEFAULT_DOWNLOAD_PATH)]
        download_to: PathBuf,

        /// Skip rows whose IP address was already inserted instead of aborting
        #[arg(long)]
        ignore_duplicates: bool,
    },

    /// List every resolver of a country
    All {
        /// Two-letter ISO 3166-1 alpha-2 country code
        country: String,
    },

    /// Show the most reliable resolver of a country
    Best {
        /// Two-letter ISO 3166-1 alpha-2 country code
        country: String,
    },

    /// Show one fully reliable resolver for each of the given countries
    BestPerCountry {
        /// Two-letter ISO 3166-1 alpha-2 country codes
        #[arg(required = true)]
        countries: Vec<String>,
    },

    /// Count the good resolvers of every country
    Tally,
}

/// Where the ingest command reads the resolver list from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestSource {
    /// A CSV file already on disk
    File(PathBuf),
    /// A URL that is downloaded to a local file first
    Url(String),
}

impl IngestSource {
    /// Picks the source from the `--file` and `--url` flags, falling back to
    /// [`DEFAULT_SOURCE_URL`] when neither was given.
    pub fn resolve(file: Option<PathBuf>, url: Option<String>) -> Self {
        match (file, url) {
            (Some(path), _) => IngestSource::File(path),
            (None, Some(url)) => IngestSource::Url(url),
            (None, None) => IngestSource::Url(DEFAULT_SOURCE_URL.to_string()),
        }
    }
}
