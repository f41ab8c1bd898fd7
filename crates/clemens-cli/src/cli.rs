use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level for CLI output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// How `parse` prints its results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Parser)]
#[command(name = "clemens")]
#[command(about = "clemens - parse Markdown protocol documents and export reports, vaults and PDFs")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Set log level (off, error, warn, info, debug, trace)
    /// If not specified, uses the config file value or defaults to 'warn'
    #[arg(short = 'l', long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file path (defaults to ~/.config/clemens/config.toml)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a file or folder and print what was found
    Parse {
        /// Markdown file or folder
        path: PathBuf,

        /// Extract protocol metadata as well
        #[arg(long)]
        protocol: bool,

        /// Descend into subfolders
        #[arg(short, long)]
        recursive: bool,

        /// File name glob (defaults to the configured pattern)
        #[arg(long)]
        pattern: Option<String>,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Write Markdown/JSON summaries and folder reports
    Export {
        /// Folder of Markdown documents
        folder: PathBuf,

        /// Output folder
        #[arg(short, long)]
        output: PathBuf,

        /// Only export files matching the protocol prefixes
        #[arg(long)]
        protocols: bool,
    },

    /// Build an Obsidian vault
    Vault {
        /// Folder of Markdown documents
        folder: PathBuf,

        /// Vault root
        #[arg(short, long)]
        output: PathBuf,

        /// Vault name (overrides config)
        #[arg(long)]
        name: Option<String>,
    },

    /// Bind the folder's protocols into a PDF
    Pdf {
        /// Folder of protocol documents
        folder: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Write a one-table summary instead of the full volume
        #[arg(long)]
        summary: bool,

        /// Title of the summary report
        #[arg(long, requires = "summary")]
        title: Option<String>,
    },

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a commented example config
    Init {
        /// Where to write it (defaults to ~/.config/clemens/config.toml)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show {
        /// Output format (toml, json)
        #[arg(short, long, default_value = "toml")]
        format: String,
    },
}
