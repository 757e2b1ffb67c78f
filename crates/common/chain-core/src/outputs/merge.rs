//! Folding streamed chunks into a single value.
//!
//! Concatenation has no identity element, so every fold starts from the
//! first chunk and an empty stream merges to `None`.

use std::pin::pin;

use async_stream::stream;
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};

use crate::error::Result;
use crate::messages::concat::Concat;

/// Left fold of `chunks` with [`Concat`]. Returns `None` for no chunks.
pub fn merge_chunks<T, I>(chunks: I) -> Option<T>
where
    T: Concat,
    I: IntoIterator<Item = T>,
{
    chunks.into_iter().reduce(|acc, chunk| acc.concat(&chunk))
}

/// Consume a chunk stream and fold it.
///
/// The first error ends consumption and is returned unchanged; chunks seen
/// before it are discarded.
pub async fn collect_and_merge_stream<T, S>(stream: S) -> Result<Option<T>>
where
    T: Concat,
    S: Stream<Item = Result<T>>,
{
    let mut stream = pin!(stream);
    let mut merged: Option<T> = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        merged = Some(match merged {
            Some(acc) => acc.concat(&chunk),
            None => chunk,
        });
    }
    Ok(merged)
}

/// Re-emit a chunk stream as running totals.
///
/// After each chunk the stream yields the fold of every chunk so far. An
/// error is forwarded and ends the stream.
pub fn accumulate<'a, T, S>(stream: S) -> BoxStream<'a, Result<T>>
where
    T: Concat + Send + 'a,
    S: Stream<Item = Result<T>> + Send + 'a,
{
    Box::pin(stream! {
        let mut stream = pin!(stream);
        let mut merged: Option<T> = None;
        while let Some(chunk) = stream.next().await {
            match chunk {
                Ok(chunk) => {
                    let total = match merged.take() {
                        Some(acc) => acc.concat(&chunk),
                        None => chunk,
                    };
                    merged = Some(total.clone());
                    yield Ok(total);
                }
                Err(err) => {
                    yield Err(err);
                    break;
                }
            }
        }
    })
}
