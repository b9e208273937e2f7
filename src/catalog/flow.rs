//! Flow control for the catalog listings.
//!
//! [`paced`] slows a store cursor down to one element per emit delay. [`rate_limited`]
//! puts a bounded window between that cursor and a slow consumer: a producer task only
//! pulls the next element after it has reserved one of `limit` delivery slots, so at most
//! `limit` elements are ever waiting to be taken.

use std::time::Duration;

use futures::stream::BoxStream;
use futures::StreamExt;
use tokio::sync::{mpsc, Semaphore};
use tokio_stream::wrappers::ReceiverStream;
use tracing::debug;

use crate::books::dto::BookDto;
use crate::core::library::{CatalogError, CatalogResult};

/// Lazy, paced sequence of books handed to catalog consumers.
pub(crate) type BookStream = BoxStream<'static, CatalogResult<BookDto>>;

// rate_window validates a requested limit and picks the channel capacity for it. Any limit
// of at least 1 is accepted; the capacity is the limit capped by `max_window` and by what a
// Tokio channel can hold, so fewer than `limit` books may be in flight but never more.
pub(crate) fn rate_window(limit: i64, max_window: i64) -> CatalogResult<usize> {
    if limit < 1 {
        return Err(CatalogError::invalid_argument(
            format!("rate limit must be at least 1 but was {}", limit).as_str(), Some("limit".to_string())));
    }
    let window = limit.min(max_window).max(1);
    Ok(usize::try_from(window).unwrap_or(Semaphore::MAX_PERMITS).min(Semaphore::MAX_PERMITS))
}

// paced waits `delay` before handing out each element. Errors are passed on without delay.
pub(crate) fn paced<T: Send + 'static>(source: BoxStream<'static, CatalogResult<T>>,
                                       delay: Duration) -> BoxStream<'static, CatalogResult<T>> {
    source.then(move |item| async move {
        if item.is_ok() {
            tokio::time::sleep(delay).await;
        }
        item
    }).boxed()
}

// rate_limited must be called from within a Tokio runtime: it spawns the producer task.
// The task ends at the first error, at the end of the source, or as soon as the returned
// stream is dropped, releasing the source with it.
pub(crate) fn rate_limited<T: Send + 'static>(mut source: BoxStream<'static, CatalogResult<T>>,
                                              limit: usize) -> BoxStream<'static, CatalogResult<T>> {
    let (tx, rx) = mpsc::channel::<CatalogResult<T>>(limit);
    tokio::spawn(async move {
        loop {
            let permit = match tx.reserve().await {
                Ok(permit) => permit,
                Err(_) => {
                    debug!(limit, "consumer detached before requesting more books");
                    return;
                }
            };
            let next = tokio::select! {
                _ = tx.closed() => {
                    debug!(limit, "consumer detached while next book was pending");
                    return;
                }
                next = source.next() => next,
            };
            match next {
                Some(Ok(item)) => permit.send(Ok(item)),
                Some(Err(err)) => {
                    permit.send(Err(err));
                    return;
                }
                None => return,
            }
        }
    });
    ReceiverStream::new(rx).boxed()
}
