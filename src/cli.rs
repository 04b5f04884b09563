// ABOUTME: Command-line interface definitions using clap
// ABOUTME: Defines all subcommands and global flags

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mata")]
#[command(about = "mata is a CLI tool for mataroa.blog", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API endpoint (overrides env/config file)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// API key (overrides env/config file)
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Override config file location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 10)]
    pub timeout: u64,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a starter config file
    #[command(visible_alias = "i")]
    Init,

    /// Manage posts
    #[command(visible_alias = "p")]
    Posts {
        #[command(subcommand)]
        command: PostsCommand,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum PostsCommand {
    /// List posts
    #[command(visible_alias = "l")]
    List {
        /// Print the raw post list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a post as a markdown document
    #[command(visible_alias = "g")]
    Get {
        slug: String,

        /// Print JSON instead of markdown
        #[arg(long, conflicts_with = "output")]
        json: bool,

        /// Write the document to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Create a post from a markdown file
    #[command(visible_alias = "c")]
    Create {
        file: PathBuf,

        /// Open the new post in a browser
        #[arg(long)]
        open: bool,
    },

    /// Update a post from a markdown file
    #[command(visible_alias = "u")]
    Update { slug: String, file: PathBuf },

    /// Delete a post
    #[command(visible_alias = "d")]
    Delete { slug: String },

    /// Edit a post in $EDITOR
    #[command(visible_alias = "e")]
    Edit { slug: String },

    /// Scaffold a new draft document
    #[command(visible_alias = "n")]
    New {
        title: String,

        /// Directory to write the document into
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },

    /// Sync all markdown files under a directory
    #[command(visible_alias = "s")]
    Sync {
        #[arg(default_value = ".")]
        directory: PathBuf,
    },
}
