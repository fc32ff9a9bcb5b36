use chrono::{DateTime, Utc};

/// What the cleaner does with each matched thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionMode {
    /// Discover and report only
    DryRun,
    /// Move threads to Trash (recoverable for 30 days)
    Trash,
    /// Delete threads immediately and irreversibly
    PermanentDelete,
}

impl ActionMode {
    /// Resolve the mode from the two mutually exclusive destructive flags
    pub fn from_flags(trash: bool, delete_permanently: bool) -> Option<Self> {
        match (trash, delete_permanently) {
            (false, false) => Some(ActionMode::DryRun),
            (true, false) => Some(ActionMode::Trash),
            (false, true) => Some(ActionMode::PermanentDelete),
            (true, true) => None,
        }
    }

    pub fn is_destructive(&self) -> bool {
        !matches!(self, ActionMode::DryRun)
    }

    pub fn verb(&self) -> &'static str {
        match self {
            ActionMode::DryRun => "inspect",
            ActionMode::Trash => "trash",
            ActionMode::PermanentDelete => "delete",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            ActionMode::DryRun => "inspected",
            ActionMode::Trash => "trashed",
            ActionMode::PermanentDelete => "irreversibly deleted",
        }
    }
}

/// One page of a thread search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadPage {
    /// Provider's estimate of the total result count
    pub result_size_estimate: u64,
    pub thread_ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// A fetched thread, reduced to what the cleaner reports on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThreadDetail {
    pub id: String,
    pub snippet: String,
    pub messages: Vec<MessageDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDetail {
    /// Header name/value pairs in payload order
    pub headers: Vec<(String, String)>,
    /// Internal delivery timestamp, milliseconds since epoch
    pub internal_date_ms: i64,
}

impl MessageDetail {
    /// Value of the first header named `name`, compared case-insensitively
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Human-readable digest of one thread, used for the per-thread log line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadSummary {
    pub id: String,
    pub subject: String,
    /// Latest internal timestamp across the thread's messages (ms)
    pub latest_message_ms: i64,
    pub message_count: usize,
}

impl ThreadSummary {
    pub fn from_detail(thread: &ThreadDetail) -> Self {
        let mut subject = derive_subject(&thread.messages);
        if subject.is_empty() {
            subject = thread.snippet.clone();
        }

        let latest_message_ms = thread
            .messages
            .iter()
            .map(|m| m.internal_date_ms)
            .max()
            .unwrap_or(0)
            .max(0);

        Self {
            id: thread.id.clone(),
            subject,
            latest_message_ms,
            message_count: thread.messages.len(),
        }
    }

    /// Latest message time at second precision
    pub fn latest_message_time(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.latest_message_ms / 1000, 0).unwrap_or_default()
    }

    /// `"<subject>" (<YYYY-MM-DD>, <n> messages)`
    pub fn log_line(&self) -> String {
        format!(
            "\"{}\" ({}, {} messages)",
            self.subject,
            self.latest_message_time().format("%Y-%m-%d"),
            self.message_count
        )
    }
}

/// Subject of the first message carrying a non-empty `Subject` header
pub fn derive_subject(messages: &[MessageDetail]) -> String {
    messages
        .iter()
        .filter_map(|m| m.header("subject"))
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub matched_count: usize,
    pub acted_count: usize,
    pub mode: ActionMode,
}

impl RunResult {
    /// The single summary line reported at the end of a run
    pub fn summary(&self) -> String {
        match self.mode {
            ActionMode::DryRun => format!(
                "matched {} threads, but did not act on any (dry run: pass --trash or --delete-permanently).",
                self.matched_count
            ),
            mode => progress_line(mode, self.acted_count),
        }
    }
}

/// `trashed N threads.` / `irreversibly deleted N threads.`
pub fn progress_line(mode: ActionMode, acted: usize) -> String {
    format!("{} {} threads.", mode.past_tense(), acted)
}
