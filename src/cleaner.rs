//! Cleanup orchestration: search under a cap, report each thread, act on it
//!
//! A run is strictly sequential. Each thread is fetched, logged and acted on
//! before the next one is touched, and the first failure ends the run with
//! the number of threads already handled.

use tracing::{info, warn};

use crate::client::MailClient;
use crate::error::{CleanerError, Result};
use crate::models::{progress_line, ActionMode, RunResult, ThreadSummary};
use crate::query::{build_query, FilterSpec, QueryStyle, SearchQuery};
use crate::search::{collect_thread_ids, thread_pages};

/// Operator input for one run, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupRequest {
    pub filter: FilterSpec,
    /// Abort when the provider's estimated match count exceeds this
    pub cap: u64,
    pub include_spam_trash: bool,
    pub trash: bool,
    pub delete_permanently: bool,
}

/// A validated run: the query to send and what to do with the matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupPlan {
    pub query: SearchQuery,
    pub mode: ActionMode,
    pub cap: u64,
    pub include_spam_trash: bool,
}

impl CleanupPlan {
    /// Validate `request` without touching the network
    pub fn new(request: &CleanupRequest, style: &QueryStyle) -> Result<Self> {
        let mode = ActionMode::from_flags(request.trash, request.delete_permanently).ok_or_else(
            || {
                CleanerError::Validation(
                    "only one of --trash or --delete-permanently may be used".to_string(),
                )
            },
        )?;

        if request.cap == 0 {
            return Err(CleanerError::Validation(
                "cap must be at least 1".to_string(),
            ));
        }

        let query = build_query(&request.filter, style)?;

        Ok(Self {
            query,
            mode,
            cap: request.cap,
            include_spam_trash: request.include_spam_trash,
        })
    }
}

/// Drives a cleanup run against a mail client
pub struct Cleaner<C: MailClient> {
    client: C,
}

impl<C: MailClient> Cleaner<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Validate `request` and run it
    pub async fn execute(&self, request: &CleanupRequest, style: &QueryStyle) -> Result<RunResult> {
        let plan = CleanupPlan::new(request, style)?;
        self.run(&plan).await
    }

    /// Run a validated plan to completion or to the first failure
    pub async fn run(&self, plan: &CleanupPlan) -> Result<RunResult> {
        info!("search query: \"{}\"", plan.query);
        info!("gmail search: {}", plan.query.web_search_url());

        let thread_ids = self.search(plan).await?;

        info!("found {} threads", thread_ids.len());
        match plan.mode {
            ActionMode::DryRun => info!(
                "not modifying anything (flags --trash or --delete-permanently are missing)"
            ),
            ActionMode::Trash => info!("matching threads will be moved to trash"),
            ActionMode::PermanentDelete => warn!(
                "matching threads will be irreversibly deleted, not moved to trash (flag --delete-permanently is present)"
            ),
        }

        let mut result = RunResult {
            matched_count: thread_ids.len(),
            acted_count: 0,
            mode: plan.mode,
        };

        for thread_id in &thread_ids {
            let thread = self
                .client
                .get_thread(thread_id)
                .await
                .map_err(|source| CleanerError::Fetch {
                    thread_id: thread_id.clone(),
                    source,
                })?;

            let summary = ThreadSummary::from_detail(&thread);
            info!("{}", summary.log_line());

            self.act(plan.mode, &summary, result.acted_count).await?;
            if plan.mode.is_destructive() {
                result.acted_count += 1;
            }
        }

        info!("{}", result.summary());
        Ok(result)
    }

    /// Page through the search, enforcing the cap before any ID is kept
    async fn search(&self, plan: &CleanupPlan) -> Result<Vec<String>> {
        let pages = thread_pages(&self.client, &plan.query, plan.include_spam_trash);
        collect_thread_ids(pages, plan.cap).await
    }

    /// Apply `mode` to one thread; `acted` is the count handled before it
    async fn act(&self, mode: ActionMode, summary: &ThreadSummary, acted: usize) -> Result<()> {
        let outcome = match mode {
            ActionMode::DryRun => return Ok(()),
            ActionMode::Trash => self.client.trash_thread(&summary.id).await,
            ActionMode::PermanentDelete => self.client.delete_thread(&summary.id).await,
        };

        outcome.map_err(|source| {
            warn!("{}", progress_line(mode, acted));
            CleanerError::Action {
                action: mode,
                subject: summary.subject.clone(),
                acted,
                source,
            }
        })
    }
}
