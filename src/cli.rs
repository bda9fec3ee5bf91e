//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// TinyLink - short-code URL registry
#[derive(Parser, Debug)]
#[command(name = "tinylink")]
#[command(version)]
#[command(about = "A small URL shortener with atomic click counting", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (default: config.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    /// Write a sample config to the given path and exit
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands. Without one the HTTP server starts.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server
    Serve,

    /// Add a short link
    ///
    /// Usage: add [SHORT_CODE] <TARGET_URL>
    /// - If only URL provided, generates random short code
    /// - If both provided, uses specified short code
    Add {
        /// Positional args: [short_code] <target_url>
        #[arg(required = true, num_args = 1..=2)]
        args: Vec<String>,
    },

    /// Show one short link
    Get {
        short_code: String,
    },

    /// Remove a short link
    Remove {
        /// Short code to remove
        short_code: String,
    },

    /// List all short links, newest first
    List,
}

impl Commands {
    /// Parse add command args into (short_code, target_url)
    pub fn parse_add_args(args: &[String]) -> (Option<String>, String) {
        match args {
            [url] => (None, url.clone()),
            [code, url, ..] => (Some(code.clone()), url.clone()),
            [] => (None, String::new()),
        }
    }
}
