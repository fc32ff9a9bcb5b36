//! Paging through thread search results under a safety cap

use async_stream::stream;
use futures::stream::{Stream, StreamExt};
use std::pin::Pin;
use tracing::debug;

use crate::client::{ApiResult, MailClient};
use crate::error::{CleanerError, Result};
use crate::models::ThreadPage;
use crate::query::SearchQuery;

/// Boxed stream of search result pages
pub type PageStream<'a> = Pin<Box<dyn Stream<Item = ApiResult<ThreadPage>> + Send + 'a>>;

/// Lazily page through the threads matching `query`
///
/// The next page is requested only when the previous one has been consumed,
/// so dropping the stream stops the search. The stream ends after the last
/// page or after the first error.
pub fn thread_pages<'a, C>(
    client: &'a C,
    query: &'a SearchQuery,
    include_spam_trash: bool,
) -> PageStream<'a>
where
    C: MailClient + ?Sized,
{
    Box::pin(stream! {
        let mut page_token: Option<String> = None;
        let mut page_number = 0usize;

        loop {
            page_number += 1;
            debug!("Requesting search page {}", page_number);

            match client
                .list_threads_page(query.as_str(), include_spam_trash, page_token.take())
                .await
            {
                Ok(page) => {
                    let next = page.next_page_token.clone();
                    yield Ok(page);

                    match next {
                        Some(token) => page_token = Some(token),
                        None => break,
                    }
                }
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    })
}

/// Collect thread IDs from `pages`, aborting as soon as a page's estimate exceeds `cap`
///
/// IDs keep the provider's order. A page over the cap contributes nothing.
pub async fn collect_thread_ids<S>(mut pages: S, cap: u64) -> Result<Vec<String>>
where
    S: Stream<Item = ApiResult<ThreadPage>> + Unpin,
{
    let mut thread_ids = Vec::new();

    while let Some(page) = pages.next().await {
        let page = page.map_err(CleanerError::Search)?;

        if page.result_size_estimate > cap {
            return Err(CleanerError::OverCap {
                estimate: page.result_size_estimate,
                cap,
            });
        }

        debug!(
            "Page with {} threads (estimate {})",
            page.thread_ids.len(),
            page.result_size_estimate
        );
        thread_ids.extend(page.thread_ids);
    }

    Ok(thread_ids)
}
