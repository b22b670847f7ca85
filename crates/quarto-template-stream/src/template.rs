/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template interleaving.
//!
//! A template is a list of `n + 1` literal fragments and `n` interpolated
//! values, as produced by a tagged template literal. Streaming it yields
//! `fragments[0]`, then for each slot every segment of the resolved value
//! followed by the next fragment.
//!
//! Nothing is done ahead of demand: a slot is not resolved until the
//! fragment before it has been yielded, and the first failing slot ends the
//! stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::future;
use futures::stream::{self, BoxStream, FusedStream, Stream, StreamExt, TryStreamExt};

use crate::error::{StreamError, StreamResult};
use crate::options::ResolveOptions;
use crate::resolver::resolve_with;
use crate::value::Value;

/// Literal fragments interleaved with interpolated values.
#[derive(Debug)]
pub struct Template {
    fragments: Vec<String>,
    values: Vec<Value>,
    options: ResolveOptions,
}

impl Template {
    /// Create a template from its fragments and values.
    ///
    /// There must be exactly one more fragment than values.
    pub fn new(
        fragments: impl IntoIterator<Item = impl Into<String>>,
        values: impl IntoIterator<Item = Value>,
    ) -> StreamResult<Self> {
        let fragments: Vec<String> = fragments.into_iter().map(Into::into).collect();
        let values: Vec<Value> = values.into_iter().collect();

        if fragments.len() != values.len() + 1 {
            return Err(StreamError::FragmentCount {
                fragments: fragments.len(),
                values: values.len(),
            });
        }

        Ok(Self::from_parts(fragments, values))
    }

    /// Build from parts whose lengths are already known to match.
    ///
    /// Used by the [`template!`](crate::template!) macro.
    #[doc(hidden)]
    pub fn from_parts(fragments: Vec<String>, values: Vec<Value>) -> Self {
        debug_assert_eq!(fragments.len(), values.len() + 1);
        Self {
            fragments,
            values,
            options: ResolveOptions::default(),
        }
    }

    /// Resolve every slot with the given options.
    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Turn the template into a lazy stream of segments.
    pub fn into_stream(self) -> TemplateStream {
        let Template {
            fragments,
            values,
            options,
        } = self;

        let mut fragments = fragments.into_iter();
        let head = fragments.next().unwrap_or_default();

        let slots = values.into_iter().zip(fragments).map(move |(value, fragment)| {
            resolve_with(value, options).chain(stream::once(future::ready(Ok(fragment))))
        });

        let inner = stream::once(future::ready(Ok(head)))
            .chain(stream::iter(slots).flatten())
            .scan(false, |failed, item: StreamResult<String>| {
                if *failed {
                    return future::ready(None);
                }
                *failed = item.is_err();
                future::ready(Some(item))
            })
            .boxed()
            .fuse();

        TemplateStream { inner }
    }
}

/// Stream fragments and resolved values of a template.
///
/// Fails with [`StreamError::FragmentCount`] unless there is exactly one
/// more fragment than values.
pub fn stream(
    fragments: impl IntoIterator<Item = impl Into<String>>,
    values: impl IntoIterator<Item = Value>,
) -> StreamResult<TemplateStream> {
    Template::new(fragments, values).map(Template::into_stream)
}

/// Lazy stream of the segments of a template.
pub struct TemplateStream {
    inner: stream::Fuse<BoxStream<'static, StreamResult<String>>>,
}

impl TemplateStream {
    /// Drain the stream, concatenating every segment.
    pub async fn into_string(self) -> StreamResult<String> {
        self.try_fold(String::new(), |mut out, segment| {
            out.push_str(&segment);
            future::ready(Ok(out))
        })
        .await
    }

    /// Drain the stream into its individual segments.
    pub async fn collect_segments(self) -> StreamResult<Vec<String>> {
        self.try_collect().await
    }
}

impl Stream for TemplateStream {
    type Item = StreamResult<String>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.poll_next_unpin(cx)
    }
}

impl FusedStream for TemplateStream {
    fn is_terminated(&self) -> bool {
        self.inner.is_terminated()
    }
}

impl std::fmt::Debug for TemplateStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateStream")
            .field("terminated", &self.inner.is_terminated())
            .finish()
    }
}

/// A nested template interpolates as the sequence of its own segments.
impl From<TemplateStream> for Value {
    fn from(stream: TemplateStream) -> Self {
        Value::stream(stream.map_ok(Value::String))
    }
}

impl From<Template> for Value {
    fn from(template: Template) -> Self {
        Value::from(template.into_stream())
    }
}

/// Build a [`Template`] in the shape of a template literal.
///
/// Arguments alternate between fragments and values, starting and ending
/// with a fragment. Fragments are anything `String: From` accepts; values
/// anything [`Value: From`](Value) accepts.
///
/// ```ignore
/// use quarto_template_stream::template;
///
/// let name = "World";
/// let out = template!("Hello, ", name, "!").into_stream().into_string().await?;
/// assert_eq!(out, "Hello, World!");
/// ```
#[macro_export]
macro_rules! template {
    ($head:expr $(, $value:expr, $fragment:expr)*) => {
        $crate::Template::from_parts(
            ::std::vec![
                ::std::string::String::from($head)
                $(, ::std::string::String::from($fragment))*
            ],
            ::std::vec![$($crate::Value::from($value)),*],
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_fragment_count_mismatch() {
        let err = Template::new(["a", "b"], vec![]).unwrap_err();
        assert!(matches!(
            err,
            StreamError::FragmentCount {
                fragments: 2,
                values: 0
            }
        ));

        let err = Template::new(Vec::<String>::new(), vec![]).unwrap_err();
        assert!(matches!(
            err,
            StreamError::FragmentCount {
                fragments: 0,
                values: 0
            }
        ));
    }

    #[test]
    fn test_macro_builds_alternating_parts() {
        let template = template!("a", 1, "b", "x", "c");
        assert_eq!(template.fragments(), &["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_literal_only() {
        let segments = template!("just text")
            .into_stream()
            .collect_segments()
            .await
            .unwrap();
        assert_eq!(segments, vec!["just text"]);
    }

    #[tokio::test]
    async fn test_into_string() {
        let out = stream(["<b>", "</b>"], [Value::from("bold")])
            .unwrap()
            .into_string()
            .await
            .unwrap();
        assert_eq!(out, "<b>bold</b>");
    }

    #[tokio::test]
    async fn test_failure_stops_before_next_fragment() {
        let segments: Vec<_> = template!("a", Value::symbol("s"), "b", "c", "d")
            .into_stream()
            .collect()
            .await;
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].as_ref().unwrap(), "a");
        assert!(segments[1].is_err());
    }

    #[tokio::test]
    async fn test_later_slots_not_touched_before_demand() {
        let touched = Arc::new(AtomicBool::new(false));
        let flag = touched.clone();
        let second = Value::callable(move || {
            flag.store(true, Ordering::SeqCst);
            Ok(Value::from("second"))
        });

        let mut stream = template!("", "first", "|", second, "").into_stream();
        assert_eq!(stream.next().await.unwrap().unwrap(), "");
        assert_eq!(stream.next().await.unwrap().unwrap(), "first");
        assert_eq!(stream.next().await.unwrap().unwrap(), "|");
        assert!(!touched.load(Ordering::SeqCst));

        assert_eq!(stream.next().await.unwrap().unwrap(), "second");
        assert!(touched.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_options_apply_to_every_slot() {
        let deep = || Value::iter(vec![Value::iter(["x"])]);
        let err = template!("", deep(), "")
            .with_options(ResolveOptions::new().with_max_depth(1))
            .into_stream()
            .into_string()
            .await
            .unwrap_err();
        assert!(matches!(err, StreamError::DepthExceeded { max_depth: 1 }));
    }
}
