//! Command-line interface

use clap::Parser;
use std::path::PathBuf;

use crate::cleaner::CleanupRequest;
use crate::config::{Config, CONFIG_DIR_ENV};
use crate::query::FilterSpec;

#[derive(Parser, Debug)]
#[command(name = "gmail-cleaner")]
#[command(version)]
#[command(
    about = "Trash or delete old Gmail threads under a label",
    long_about = "Searches for threads carrying a label that are older than a given age, \
                  logs each one, and optionally moves them to trash or deletes them. \
                  Nothing is modified unless --trash or --delete-permanently is given."
)]
pub struct Cli {
    /// Label to clean
    #[arg(long)]
    pub label: String,

    /// Gmail-style "older than" search string (eg. '1y' for 1 year, '3m' for 3 months)
    #[arg(long)]
    pub older: String,

    /// Additional Gmail-style search string specifying results to exclude
    #[arg(long, default_value = "")]
    pub exclude: String,

    /// Cap on the number of threads to act on. If the estimated result count
    /// exceeds this, no data is modified [default: 500, or search.cap from config.toml]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub cap: Option<u64>,

    /// Move discovered threads to trash. By default, no data is modified
    #[arg(long)]
    pub trash: bool,

    /// Irreversibly delete discovered threads. You should probably use --trash instead
    #[arg(long, alias = "irreversibly-delete", conflicts_with = "trash")]
    pub delete_permanently: bool,

    /// Include threads in Spam and Trash in the search. `--include-spam-trash=false`
    /// turns off search.include_spam_trash from config.toml
    #[arg(
        long,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub include_spam_trash: Option<bool>,

    /// Directory holding credentials.json, token.json and an optional config.toml
    #[arg(long, env = CONFIG_DIR_ENV)]
    pub config_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Combine flags with file configuration; flags win
    pub fn to_request(&self, config: &Config) -> CleanupRequest {
        CleanupRequest {
            filter: FilterSpec {
                label: self.label.clone(),
                older_than: self.older.clone(),
                exclude: self.exclude.clone(),
            },
            cap: self.cap.unwrap_or(config.search.cap),
            include_spam_trash: self
                .include_spam_trash
                .unwrap_or(config.search.include_spam_trash),
            trash: self.trash,
            delete_permanently: self.delete_permanently,
        }
    }
}
