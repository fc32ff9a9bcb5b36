//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use gmail_cleaner::client::{ApiResult, MailClient};
use gmail_cleaner::error::ApiError;
use gmail_cleaner::models::{MessageDetail, ThreadDetail, ThreadPage};
use gmail_cleaner::{CleanupRequest, FilterSpec};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

/// A remote call as seen by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List {
        query: String,
        include_spam_trash: bool,
        page_token: Option<String>,
    },
    Get(String),
    Trash(String),
    Delete(String),
}

/// In-memory mailbox that records every call made against it
#[derive(Default)]
pub struct StubMailClient {
    pages: Vec<ThreadPage>,
    threads: HashMap<String, ThreadDetail>,
    failing_actions: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl StubMailClient {
    /// Serve `pages` in order; page N links to page N+1 by token `page-{N+1}`
    pub fn with_pages(mut pages: Vec<ThreadPage>) -> Self {
        let count = pages.len();
        for (i, page) in pages.iter_mut().enumerate() {
            page.next_page_token = if i + 1 < count {
                Some(format!("page-{}", i + 1))
            } else {
                None
            };
        }
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn with_thread(mut self, thread: ThreadDetail) -> Self {
        self.threads.insert(thread.id.clone(), thread);
        self
    }

    /// Make trash/delete of `id` fail with a 500
    pub fn failing_action_on(mut self, id: &str) -> Self {
        self.failing_actions.insert(id.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutation_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Trash(_) | Call::Delete(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn action_result(&self, id: &str) -> ApiResult<()> {
        if self.failing_actions.contains(id) {
            Err(ApiError::Server {
                status: 500,
                message: "HTTP 500: Internal Server Error".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MailClient for StubMailClient {
    async fn list_threads_page(
        &self,
        query: &str,
        include_spam_trash: bool,
        page_token: Option<String>,
    ) -> ApiResult<ThreadPage> {
        self.record(Call::List {
            query: query.to_string(),
            include_spam_trash,
            page_token: page_token.clone(),
        });

        let index = match page_token {
            None => 0,
            Some(token) => token
                .strip_prefix("page-")
                .and_then(|n| n.parse::<usize>().ok())
                .ok_or_else(|| ApiError::BadRequest(format!("bad page token {}", token)))?,
        };

        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }

    async fn get_thread(&self, id: &str) -> ApiResult<ThreadDetail> {
        self.record(Call::Get(id.to_string()));
        self.threads
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("thread {}", id)))
    }

    async fn trash_thread(&self, id: &str) -> ApiResult<()> {
        self.record(Call::Trash(id.to_string()));
        self.action_result(id)
    }

    async fn delete_thread(&self, id: &str) -> ApiResult<()> {
        self.record(Call::Delete(id.to_string()));
        self.action_result(id)
    }
}

/// A page listing `ids` with the given estimate
pub fn page(estimate: u64, ids: &[&str]) -> ThreadPage {
    ThreadPage {
        result_size_estimate: estimate,
        thread_ids: ids.iter().map(|s| s.to_string()).collect(),
        next_page_token: None,
    }
}

/// Build a message with the given headers and internal timestamp
pub fn message(headers: &[(&str, &str)], internal_date_ms: i64) -> MessageDetail {
    MessageDetail {
        headers: headers
            .iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect(),
        internal_date_ms,
    }
}

/// Single-message thread with a subject
pub fn thread_with_subject(id: &str, subject: &str) -> ThreadDetail {
    ThreadDetail {
        id: id.to_string(),
        snippet: format!("snippet of {}", id),
        messages: vec![message(&[("Subject", subject)], 1_600_000_000_000)],
    }
}

/// Request for the `Promotions` / `1y` filter with a cap of 500
pub fn promotions_request(trash: bool, delete_permanently: bool) -> CleanupRequest {
    CleanupRequest {
        filter: FilterSpec {
            label: "Promotions".to_string(),
            older_than: "1y".to_string(),
            exclude: String::new(),
        },
        cap: 500,
        include_spam_trash: false,
        trash,
        delete_permanently,
    }
}

/// Collects formatted log output so tests can assert on operator-facing lines
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route `tracing` events on the current thread into this capture until
    /// the returned guard is dropped
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_target(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
