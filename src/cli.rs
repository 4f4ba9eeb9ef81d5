use clap::Parser;
use std::path::PathBuf;

use crate::config::{DuplicatePolicy, OutputFormat};

#[derive(Parser, Debug)]
#[command(author, version, about = "Package bookmarklet definitions into an importable bookmarks file")]
pub struct Cli {
    /// Bookmarklet definition document
    pub input: PathBuf,
    /// Output file (stdout when omitted)
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Sort every folder by name, as if the document had a SORT line
    #[arg(long)]
    pub sort: bool,
    /// Blocks without FOLDER inherit the previous entry's folder
    #[arg(long)]
    pub sticky_folders: bool,
    /// What to do with duplicate names within one folder
    #[arg(long, value_enum)]
    pub duplicates: Option<DuplicatePolicy>,
    /// Extra TOML configuration layered over the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Parse and report problems without writing anything
    #[arg(long)]
    pub check: bool,

    /// More logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    /// No logging at all
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}
