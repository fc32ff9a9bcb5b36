//! Gmail thread operations behind a mockable trait

use async_trait::async_trait;
use google_gmail1::api::{ListThreadsResponse, Message, Thread};
use tracing::debug;

use crate::auth::GmailHub;
use crate::error::ApiError;
use crate::models::{MessageDetail, ThreadDetail, ThreadPage};

/// Result type for single remote calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Upper bound Gmail accepts for `maxResults` on threads.list
const PAGE_SIZE: u32 = 500;

/// Trait defining the mailbox operations the cleaner needs, for easier testing
#[async_trait]
pub trait MailClient: Send + Sync {
    /// Fetch one page of threads matching `query`
    async fn list_threads_page(
        &self,
        query: &str,
        include_spam_trash: bool,
        page_token: Option<String>,
    ) -> ApiResult<ThreadPage>;

    /// Fetch a thread with its messages' headers and timestamps
    async fn get_thread(&self, id: &str) -> ApiResult<ThreadDetail>;

    /// Move a thread to Trash
    async fn trash_thread(&self, id: &str) -> ApiResult<()>;

    /// Delete a thread immediately and permanently
    async fn delete_thread(&self, id: &str) -> ApiResult<()>;
}

/// Gmail API client acting on the authenticated user's mailbox
pub struct ProductionGmailClient {
    hub: GmailHub,
    scope: String,
}

impl ProductionGmailClient {
    /// Create a client that requests `scope` on every call
    ///
    /// The scope must match the one the token was obtained for, otherwise
    /// the authenticator starts a new consent flow.
    pub fn new(hub: GmailHub, scope: impl Into<String>) -> Self {
        Self {
            hub,
            scope: scope.into(),
        }
    }
}

#[async_trait]
impl MailClient for ProductionGmailClient {
    async fn list_threads_page(
        &self,
        query: &str,
        include_spam_trash: bool,
        page_token: Option<String>,
    ) -> ApiResult<ThreadPage> {
        let mut call = self
            .hub
            .users()
            .threads_list("me")
            .q(query)
            .include_spam_trash(include_spam_trash)
            .max_results(PAGE_SIZE);

        if let Some(token) = page_token.as_ref() {
            call = call.page_token(token);
        }

        let (_, response) = call.add_scope(self.scope.as_str()).doit().await?;
        Ok(parse_thread_page(response))
    }

    async fn get_thread(&self, id: &str) -> ApiResult<ThreadDetail> {
        let (_, thread) = self
            .hub
            .users()
            .threads_get("me", id)
            .format("metadata")
            .add_metadata_headers("Subject")
            .add_scope(self.scope.as_str())
            .doit()
            .await?;

        parse_thread_detail(thread)
    }

    async fn trash_thread(&self, id: &str) -> ApiResult<()> {
        self.hub
            .users()
            .threads_trash("me", id)
            .add_scope(self.scope.as_str())
            .doit()
            .await?;
        Ok(())
    }

    async fn delete_thread(&self, id: &str) -> ApiResult<()> {
        self.hub
            .users()
            .threads_delete("me", id)
            .add_scope(self.scope.as_str())
            .doit()
            .await?;
        Ok(())
    }
}

/// Convert a threads.list response into a ThreadPage
fn parse_thread_page(response: ListThreadsResponse) -> ThreadPage {
    let thread_ids = response
        .threads
        .unwrap_or_default()
        .into_iter()
        .filter_map(|t| {
            if t.id.is_none() {
                debug!("Skipping thread reference without an ID");
            }
            t.id
        })
        .collect();

    ThreadPage {
        result_size_estimate: response.result_size_estimate.map(u64::from).unwrap_or(0),
        thread_ids,
        next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
    }
}

/// Convert a threads.get response into a ThreadDetail
fn parse_thread_detail(thread: Thread) -> ApiResult<ThreadDetail> {
    let id = thread
        .id
        .ok_or_else(|| ApiError::InvalidResponse("Missing thread ID".to_string()))?;

    Ok(ThreadDetail {
        id,
        snippet: thread.snippet.unwrap_or_default(),
        messages: thread
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(parse_message_detail)
            .collect(),
    })
}

fn parse_message_detail(msg: Message) -> MessageDetail {
    let headers = msg
        .payload
        .and_then(|p| p.headers)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|h| match (h.name, h.value) {
            (Some(name), Some(value)) => Some((name, value)),
            _ => None,
        })
        .collect();

    MessageDetail {
        headers,
        internal_date_ms: msg.internal_date.unwrap_or(0),
    }
}
