//! Order-preserving bounded concurrency

use envsnag_core::Result;
use futures::stream::{self, StreamExt, TryStreamExt};
use std::future::Future;

/// Run `f` over every item with at most `limit` futures in flight.
///
/// Results come back in input order. The first error, in input order, is
/// returned and the remaining futures are dropped.
pub async fn try_join_ordered<I, F, Fut, T>(items: I, limit: usize, f: F) -> Result<Vec<T>>
where
    I: IntoIterator,
    F: FnMut(I::Item) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    stream::iter(items)
        .map(f)
        .buffered(limit.max(1))
        .try_collect()
        .await
}
