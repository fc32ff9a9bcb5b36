//! Gmail Cleaner
//!
//! Finds old threads under a Gmail label and, when asked to, moves them to
//! trash or deletes them permanently.
//!
//! # Overview
//!
//! - **Query building**: label, age and exclusion filters become a Gmail
//!   search query; inputs that could escape their clause are rejected
//! - **Capped search**: results are paged lazily and the run aborts before
//!   any change if Gmail's estimate exceeds the cap
//! - **Sequential action**: each thread is fetched, logged, then trashed or
//!   deleted; the first failure stops the run
//!
//! Dry run is the default; nothing is modified without `--trash` or
//! `--delete-permanently`.
//!
//! # Example Usage
//!
//! ```no_run
//! use gmail_cleaner::{auth, Cleaner, CleanupPlan, CleanupRequest, FilterSpec, ProductionGmailClient, QueryStyle};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let request = CleanupRequest {
//!         filter: FilterSpec {
//!             label: "Promotions".to_string(),
//!             older_than: "1y".to_string(),
//!             exclude: String::new(),
//!         },
//!         cap: 500,
//!         include_spam_trash: false,
//!         trash: true,
//!         delete_permanently: false,
//!     };
//!     let plan = CleanupPlan::new(&request, &QueryStyle::default())?;
//!
//!     let hub = auth::initialize_gmail_hub(
//!         "credentials.json".as_ref(),
//!         "token.json".as_ref(),
//!         auth::MODIFY_SCOPE,
//!     )
//!     .await?;
//!
//!     let cleaner = Cleaner::new(ProductionGmailClient::new(hub, auth::MODIFY_SCOPE));
//!     let result = cleaner.run(&plan).await?;
//!     println!("{}", result.summary());
//!     Ok(())
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`auth`] - OAuth2 authentication and Gmail API initialization
//! - [`cleaner`] - Run orchestration
//! - [`cli`] - Command-line flags
//! - [`client`] - Mailbox operations trait and Gmail implementation
//! - [`config`] - Configuration file and directory layout
//! - [`error`] - Error types and result aliases
//! - [`models`] - Thread, summary and run result types
//! - [`query`] - Search query validation and rendering
//! - [`search`] - Lazy, capped pagination of search results

pub mod auth;
pub mod cleaner;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod search;

pub use error::{ApiError, CleanerError, Result};

pub use models::{
    derive_subject, ActionMode, MessageDetail, RunResult, ThreadDetail, ThreadPage, ThreadSummary,
};

pub use query::{build_query, ExclusionSyntax, FilterSpec, QueryStyle, SearchQuery};

pub use cleaner::{Cleaner, CleanupPlan, CleanupRequest};

pub use client::{MailClient, ProductionGmailClient};

pub use config::{Config, ConfigPaths};
