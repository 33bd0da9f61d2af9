//! Pipeline stages wrapped around handler invocation.

mod logging;

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::request::MessageRef;

pub use logging::LoggingDecorator;

/// Type-erased value travelling back out of a pipeline.
///
/// An empty response is how a pipeline reports that it produced nothing; the
/// dispatcher turns it into [`crate::DispatchError::NullResult`].
pub struct Response {
    value: Option<Box<dyn Any + Send>>,
    type_name: &'static str,
}

impl Response {
    pub fn new<T: Send + 'static>(value: T) -> Self {
        Self {
            value: Some(Box::new(value)),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn unit() -> Self {
        Self::new(())
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            value: None,
            type_name: "<empty>",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none()
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.as_ref().is_some_and(|v| v.is::<T>())
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.as_ref().and_then(|v| v.downcast_ref::<T>())
    }

    /// Takes the value out, handing the response back untouched when it is
    /// empty or holds another type.
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let Self { value, type_name } = self;

        match value {
            Some(value) => value.downcast::<T>().map(|v| *v).map_err(|value| Self {
                value: Some(value),
                type_name,
            }),
            None => Err(Self::empty()),
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("type", &self.type_name)
            .field("empty", &self.is_empty())
            .finish()
    }
}

type Continuation<'a> =
    dyn Fn(CancellationToken) -> BoxFuture<'a, anyhow::Result<Response>> + Send + Sync + 'a;

/// The rest of the pipeline, as seen from one decorator.
///
/// Calling [`Next::run`] zero times short-circuits the pipeline; calling it
/// again re-runs everything inside this decorator.
#[derive(Clone)]
pub struct Next<'a> {
    inner: Arc<Continuation<'a>>,
}

impl<'a> Next<'a> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(CancellationToken) -> BoxFuture<'a, anyhow::Result<Response>> + Send + Sync + 'a,
    {
        Self { inner: Arc::new(f) }
    }

    pub fn run(&self, cancel: CancellationToken) -> BoxFuture<'a, anyhow::Result<Response>> {
        (self.inner)(cancel)
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

/// A decorator applying to every request and notification. Use
/// [`MessageRef::kind`] or [`MessageRef::downcast_ref`] to act selectively.
#[async_trait]
pub trait Decorator: Send + Sync + 'static {
    async fn decorate(
        &self,
        message: MessageRef<'_>,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response>;
}

/// A decorator scoped to one concrete message type `M`.
#[async_trait]
pub trait TypedDecorator<M: Send + Sync + 'static>: Send + Sync + 'static {
    async fn decorate(
        &self,
        message: &M,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response>;
}

/// Adapts a [`TypedDecorator`] to the open [`Decorator`] shape. Messages of any
/// other type pass straight through.
pub struct Scoped<M, D> {
    inner: D,
    _message: PhantomData<fn() -> M>,
}

impl<M, D> Scoped<M, D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            _message: PhantomData,
        }
    }
}

#[async_trait]
impl<M, D> Decorator for Scoped<M, D>
where
    M: Send + Sync + 'static,
    D: TypedDecorator<M>,
{
    async fn decorate(
        &self,
        message: MessageRef<'_>,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response> {
        match message.downcast_ref::<M>() {
            Some(typed) => self.inner.decorate(typed, next, cancel).await,
            None => next.run(cancel).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use futures_util::FutureExt;

    use super::*;

    #[test]
    fn test_response_downcast_to_matching_type() {
        let response = Response::new(42i32);

        assert!(response.is::<i32>());
        assert_eq!(response.type_name(), "i32");
        assert_eq!(response.downcast::<i32>().unwrap(), 42);
    }

    #[test]
    fn test_response_downcast_to_other_type_keeps_value() {
        let response = Response::new("forty-two");

        let response = response.downcast::<i32>().unwrap_err();

        assert_eq!(response.type_name(), "&str");
        assert_eq!(response.downcast_ref::<&str>(), Some(&"forty-two"));
    }

    #[test]
    fn test_empty_response() {
        let response = Response::empty();

        assert!(response.is_empty());
        assert!(!response.is::<()>());
        assert!(response.downcast::<()>().is_err());
    }

    #[tokio::test]
    async fn test_next_can_run_more_than_once() {
        let next = Next::new(|_cancel| async { Ok(Response::new(1u8)) }.boxed());

        let first = next.run(CancellationToken::new()).await.unwrap();
        let second = next.run(CancellationToken::new()).await.unwrap();

        assert_eq!(first.downcast::<u8>().unwrap(), 1);
        assert_eq!(second.downcast::<u8>().unwrap(), 1);
    }
}
