/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Lazy asynchronous template interpolation for Quarto.
//!
//! This crate renders tagged-template-style templates (literal fragments
//! interleaved with interpolated values) to a stream of text segments.
//! Interpolated values may be:
//!
//! - Primitives: strings, numbers, booleans, `undefined`, `null`
//! - Deferred: futures, awaited when reached
//! - Callable: zero-argument functions, invoked when reached
//! - Sequences: iterators and streams of further values, flattened in order
//! - Objects: user types exposing any of the above through [`Capabilities`]
//!
//! Values nest arbitrarily, so a template can interpolate another template
//! (or a stream of them) and the output is as if the nested segments had
//! been written inline.
//!
//! # Architecture
//!
//! - [`resolver`] reduces one value to a lazy stream of segments
//! - [`template`] interleaves fragments with resolved values
//! - [`text`] defines the exact text form of every primitive
//!
//! Output is produced on demand. Consumers may start writing segments
//! before later values have settled, and dropping the stream stops all
//! further evaluation.
//!
//! # Example
//!
//! ```ignore
//! use quarto_template_stream::{template, Value};
//!
//! let items = Value::iter(["a", "b", "c"].map(|k| template!("<li>", k, "</li>\n")));
//! let page = template!("<ul>\n", items, "</ul>\n");
//!
//! let html = page.into_stream().into_string().await?;
//! assert_eq!(html, "<ul>\n<li>a</li>\n<li>b</li>\n<li>c</li>\n</ul>\n");
//! ```

pub mod error;
pub mod options;
pub mod resolver;
pub mod template;
pub mod text;
pub mod value;

// Re-export main types at crate root
pub use error::{StreamError, StreamResult};
pub use options::ResolveOptions;
pub use resolver::{Resolve, resolve, resolve_with};
pub use template::{Template, TemplateStream, stream};
pub use value::{Capabilities, PlainObject, Role, Symbol, Value};
