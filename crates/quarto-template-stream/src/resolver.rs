/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Value resolution.
//!
//! [`resolve`] flattens one interpolated [`Value`] into a lazy stream of text
//! segments. Resolution of a single value repeats two normalization steps
//! until neither applies:
//!
//! 1. a deferred value is awaited and replaced by its settled result
//! 2. a callable value is invoked and replaced by its return value
//!
//! What remains is either a scalar, which becomes exactly one segment, or a
//! sequence, whose elements are each resolved in turn, depth first. Any
//! other object is an error.
//!
//! The stream is a pull-driven state machine over a stack of open sequences,
//! so nesting depth does not consume call stack and no nested sequence is
//! ever materialized. Each poll does only the work needed for the next
//! segment; dropping the stream abandons the rest unevaluated.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{self, BoxStream, FusedStream, Stream, StreamExt};
use tracing::{debug, trace};

use crate::error::{StreamError, StreamResult};
use crate::options::ResolveOptions;
use crate::text::scalar_text;
use crate::value::{BoxValueIter, BoxValueStream, Value};

/// Resolve a value into a stream of text segments with default options.
pub fn resolve(value: Value) -> Resolve {
    resolve_with(value, ResolveOptions::default())
}

/// Resolve a value into a stream of text segments.
pub fn resolve_with(value: Value, options: ResolveOptions) -> Resolve {
    let state = ResolveState {
        pending: Some(value),
        open: Vec::new(),
        options,
        finished: false,
    };
    Resolve {
        inner: stream::unfold(state, next_segment).boxed().fuse(),
    }
}

/// Lazy stream of the segments of one resolved value.
///
/// Yields `Ok` segments in depth-first order. After the first `Err` the
/// stream ends.
pub struct Resolve {
    inner: stream::Fuse<BoxStream<'static, StreamResult<String>>>,
}

impl Stream for Resolve {
    type Item = StreamResult<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl FusedStream for Resolve {
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}

/// A sequence whose elements are being resolved.
enum Sequence {
    Sync(BoxValueIter),
    Async(BoxValueStream),
}

impl Sequence {
    async fn next(&mut self) -> Option<StreamResult<Value>> {
        match self {
            Sequence::Sync(iter) => iter.next(),
            Sequence::Async(stream) => stream.next().await,
        }
    }
}

/// A value that is neither deferred nor callable.
enum Normalized {
    Text(String),
    Sequence(Sequence),
}

struct ResolveState {
    /// Value to resolve before pulling from the innermost open sequence.
    pending: Option<Value>,
    /// Open sequences, innermost last.
    open: Vec<Sequence>,
    options: ResolveOptions,
    finished: bool,
}

impl ResolveState {
    fn fail(mut self, error: StreamError) -> Option<(StreamResult<String>, Self)> {
        debug!(error = %error, depth = self.open.len(), "Resolution failed");
        self.finished = true;
        self.pending = None;
        self.open.clear();
        Some((Err(error), self))
    }
}

async fn next_segment(mut state: ResolveState) -> Option<(StreamResult<String>, ResolveState)> {
    if state.finished {
        return None;
    }

    loop {
        let value = match state.pending.take() {
            Some(value) => value,
            None => {
                let sequence = state.open.last_mut()?;
                let next = sequence.next().await;
                match next {
                    Some(Ok(value)) => value,
                    Some(Err(error)) => return state.fail(error),
                    None => {
                        state.open.pop();
                        trace!(depth = state.open.len(), "Sequence exhausted");
                        continue;
                    }
                }
            }
        };

        match normalize(value).await {
            Ok(Normalized::Text(text)) => return Some((Ok(text), state)),
            Ok(Normalized::Sequence(sequence)) => {
                if let Some(max_depth) = state.options.max_depth {
                    if state.open.len() >= max_depth {
                        return state.fail(StreamError::DepthExceeded { max_depth });
                    }
                }
                state.open.push(sequence);
                trace!(depth = state.open.len(), "Sequence opened");
            }
            Err(error) => return state.fail(error),
        }
    }
}

/// Await and invoke until the value is a scalar or a sequence.
async fn normalize(mut value: Value) -> StreamResult<Normalized> {
    loop {
        trace!(role = %value.role(), "Normalizing value");
        value = match value {
            Value::Deferred(future) => future.await?,
            Value::Callable(f) => f()?,
            Value::Iterable(iter) => return Ok(Normalized::Sequence(Sequence::Sync(iter))),
            Value::AsyncIterable(stream) => {
                return Ok(Normalized::Sequence(Sequence::Async(stream)));
            }
            Value::Object(mut object) => {
                if let Some(future) = object.settle() {
                    future.await?
                } else if let Some(result) = object.invoke() {
                    result?
                } else if let Some(stream) = object.iter_async() {
                    return Ok(Normalized::Sequence(Sequence::Async(stream)));
                } else if let Some(iter) = object.iter() {
                    return Ok(Normalized::Sequence(Sequence::Sync(iter)));
                } else {
                    return Err(StreamError::InvalidTerminal {
                        description: object.describe(),
                    });
                }
            }
            scalar => {
                return match scalar_text(&scalar) {
                    Some(text) => text.map(Normalized::Text),
                    None => Err(StreamError::InvalidTerminal {
                        description: format!("{scalar:?}"),
                    }),
                };
            }
        };
    }
}
