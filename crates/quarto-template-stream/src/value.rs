/*
 * value.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Interpolated values.
//!
//! A [`Value`] is anything that can fill an interpolation slot. Each variant
//! corresponds to one role the resolver knows how to reduce:
//!
//! - primitives (`Undefined`, `Null`, `Bool`, `Number`, `BigInt`, `String`,
//!   `Symbol`) become a single text segment (symbols fail instead)
//! - `Deferred` is awaited and replaced by what it settles to
//! - `Callable` is invoked with no arguments and replaced by its result
//! - `Iterable` and `AsyncIterable` are expanded element by element
//! - `Object` is a duck-typed value whose role is found by probing its
//!   [`Capabilities`]
//!
//! Values are consumed by resolution. Nothing here is ever resolved twice.

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use futures::stream::{BoxStream, Stream, StreamExt};
use futures::FutureExt;

use crate::error::StreamResult;

/// A future settling to a replacement value.
pub type BoxValueFuture = BoxFuture<'static, StreamResult<Value>>;

/// An asynchronous sequence of values.
pub type BoxValueStream = BoxStream<'static, StreamResult<Value>>;

/// A synchronous sequence of values.
pub type BoxValueIter = Box<dyn Iterator<Item = StreamResult<Value>> + Send>;

/// A zero-argument invocation producing a value.
pub type BoxCallable = Box<dyn FnOnce() -> StreamResult<Value> + Send>;

/// A value occupying one interpolation slot.
pub enum Value {
    /// The absent value. Renders as `undefined`.
    Undefined,

    /// The null value. Renders as `null`.
    Null,

    /// A boolean. Renders as `true` or `false`.
    Bool(bool),

    /// A double-precision number, rendered with ECMAScript number formatting.
    Number(f64),

    /// An integer of arbitrary sign, rendered as plain decimal digits.
    BigInt(i128),

    /// A string, passed through unchanged.
    String(String),

    /// A symbol. Interpolating one is an error.
    Symbol(Symbol),

    /// A value that is not available yet.
    Deferred(BoxValueFuture),

    /// A zero-argument function whose result takes the place of this value.
    Callable(BoxCallable),

    /// A synchronous sequence of further values.
    Iterable(BoxValueIter),

    /// An asynchronous sequence of further values.
    AsyncIterable(BoxValueStream),

    /// A duck-typed object whose role is discovered by capability probing.
    Object(Box<dyn Capabilities>),
}

/// The role a value currently plays during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Deferred,
    Callable,
    Sequential,
    Scalar,
    /// An [`Object`](Value::Object) that has not been probed yet.
    Unprobed,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Deferred => "deferred",
            Role::Callable => "callable",
            Role::Sequential => "sequential",
            Role::Scalar => "scalar",
            Role::Unprobed => "object",
        };
        f.write_str(name)
    }
}

impl Value {
    /// Wrap a future as a deferred value.
    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = StreamResult<Value>> + Send + 'static,
    {
        Value::Deferred(future.boxed())
    }

    /// Wrap a zero-argument function as a callable value.
    pub fn callable<F>(f: F) -> Self
    where
        F: FnOnce() -> StreamResult<Value> + Send + 'static,
    {
        Value::Callable(Box::new(f))
    }

    /// Wrap an async function: a callable whose result is deferred.
    pub fn async_callable<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = StreamResult<Value>> + Send + 'static,
    {
        Value::callable(move || Ok(Value::deferred(f())))
    }

    /// Wrap an infallible iterator as a sequential value.
    pub fn iter<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
        I::IntoIter: Send + 'static,
    {
        Value::Iterable(Box::new(items.into_iter().map(|item| Ok(item.into()))))
    }

    /// Wrap an iterator whose steps may fail as a sequential value.
    pub fn try_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = StreamResult<Value>>,
        I::IntoIter: Send + 'static,
    {
        Value::Iterable(Box::new(items.into_iter()))
    }

    /// Wrap a stream as an asynchronously sequential value.
    pub fn stream<S>(stream: S) -> Self
    where
        S: Stream<Item = StreamResult<Value>> + Send + 'static,
    {
        Value::AsyncIterable(stream.boxed())
    }

    /// Wrap a duck-typed object.
    pub fn object<C: Capabilities + 'static>(object: C) -> Self {
        Value::Object(Box::new(object))
    }

    /// Create a symbol with a description.
    pub fn symbol(description: impl Into<String>) -> Self {
        Value::Symbol(Symbol::new(Some(description.into())))
    }

    /// The role this value plays before any probing or awaiting.
    pub fn role(&self) -> Role {
        match self {
            Value::Deferred(_) => Role::Deferred,
            Value::Callable(_) => Role::Callable,
            Value::Iterable(_) | Value::AsyncIterable(_) => Role::Sequential,
            Value::Object(_) => Role::Unprobed,
            _ => Role::Scalar,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::BigInt(n) => f.debug_tuple("BigInt").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Symbol(s) => f.debug_tuple("Symbol").field(s).finish(),
            Value::Deferred(_) => f.write_str("Deferred(..)"),
            Value::Callable(_) => f.write_str("Callable(..)"),
            Value::Iterable(_) => f.write_str("Iterable(..)"),
            Value::AsyncIterable(_) => f.write_str("AsyncIterable(..)"),
            Value::Object(o) => f.debug_tuple("Object").field(&o.describe()).finish(),
        }
    }
}

/// A unique, non-stringifiable token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Symbol {
    description: Option<String>,
}

impl Symbol {
    pub fn new(description: Option<String>) -> Self {
        Self { description }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description.as_deref().unwrap_or(""))
    }
}

/// Capability probes for duck-typed objects.
///
/// The resolver asks an object for its capabilities in a fixed order and
/// uses the first one offered:
///
/// 1. [`settle`](Capabilities::settle): the object is awaitable
/// 2. [`invoke`](Capabilities::invoke): the object is callable with no arguments
/// 3. [`iter_async`](Capabilities::iter_async): the object is asynchronously iterable
/// 4. [`iter`](Capabilities::iter): the object is synchronously iterable
///
/// An object that offers none of them cannot be rendered and fails resolution.
/// Each probe is made at most once per occurrence, and the probe that
/// answers `Some` hands over ownership of that capability.
pub trait Capabilities: Send {
    /// Name of the object for error messages.
    fn describe(&self) -> String {
        "[object Object]".to_string()
    }

    fn settle(&mut self) -> Option<BoxValueFuture> {
        None
    }

    fn invoke(&mut self) -> Option<StreamResult<Value>> {
        None
    }

    fn iter_async(&mut self) -> Option<BoxValueStream> {
        None
    }

    fn iter(&mut self) -> Option<BoxValueIter> {
        None
    }
}

/// An object with no capabilities at all, like `{}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainObject;

impl Capabilities for PlainObject {}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::BigInt(i128::from(n))
    }
}

impl From<i128> for Value {
    fn from(n: i128) -> Self {
        Value::BigInt(n)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Undefined
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value> + Send + 'static,
{
    fn from(items: Vec<T>) -> Self {
        Value::iter(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        assert_eq!(Value::Undefined.role(), Role::Scalar);
        assert_eq!(Value::from("x").role(), Role::Scalar);
        assert_eq!(Value::symbol("s").role(), Role::Scalar);
        assert_eq!(Value::callable(|| Ok(Value::Null)).role(), Role::Callable);
        assert_eq!(
            Value::deferred(async { Ok(Value::Null) }).role(),
            Role::Deferred
        );
        assert_eq!(Value::iter(["a", "b"]).role(), Role::Sequential);
        assert_eq!(
            Value::stream(futures::stream::empty()).role(),
            Role::Sequential
        );
        assert_eq!(Value::object(PlainObject).role(), Role::Unprobed);
    }

    #[test]
    fn test_async_callable_is_callable_returning_deferred() {
        let value = Value::async_callable(|| async { Ok(Value::from("later")) });
        let Value::Callable(f) = value else {
            panic!("expected a callable");
        };
        assert_eq!(f().unwrap().role(), Role::Deferred);
    }

    #[test]
    fn test_option_conversion() {
        assert!(matches!(Value::from(None::<&str>), Value::Null));
        assert!(matches!(Value::from(Some(true)), Value::Bool(true)));
    }

    #[test]
    fn test_integer_conversions() {
        assert!(matches!(Value::from(7), Value::Number(n) if n == 7.0));
        assert!(matches!(Value::from(7_i64), Value::BigInt(7)));
    }

    #[test]
    fn test_symbol_display() {
        assert_eq!(Symbol::new(Some("id".into())).to_string(), "Symbol(id)");
        assert_eq!(Symbol::default().to_string(), "Symbol()");
    }

    #[test]
    fn test_debug_hides_capabilities() {
        let value = Value::object(PlainObject);
        assert_eq!(format!("{value:?}"), "Object(\"[object Object]\")");
        assert_eq!(format!("{:?}", Value::iter(["a"])), "Iterable(..)");
    }
}
