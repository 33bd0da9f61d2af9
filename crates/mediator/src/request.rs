use std::any::Any;
use std::fmt;

use crate::registry::TypeKey;

/// Runtime tag carried by every message, used by open decorators to tell
/// commands, queries and notifications apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Request,
    Command,
    Query,
    Notification,
}

/// Type-level kind tags. A request names one through [`Request::Kind`];
/// [`Command`] and [`Query`] require theirs, so the runtime tag cannot
/// disagree with the marker trait.
pub mod kind {
    pub enum Plain {}
    pub enum Command {}
    pub enum Query {}
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::kind::Plain {}
    impl Sealed for super::kind::Command {}
    impl Sealed for super::kind::Query {}
}

pub trait KindTag: sealed::Sealed + 'static {
    const KIND: RequestKind;
}

impl KindTag for kind::Plain {
    const KIND: RequestKind = RequestKind::Request;
}

impl KindTag for kind::Command {
    const KIND: RequestKind = RequestKind::Command;
}

impl KindTag for kind::Query {
    const KIND: RequestKind = RequestKind::Query;
}

impl RequestKind {
    pub fn of<R: Request>() -> Self {
        <R::Kind as KindTag>::KIND
    }
}

/// A message routed to exactly one handler.
///
/// `Response = ()` is a fire-and-forget request; any other response type makes
/// it a typed request.
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;
    type Kind: KindTag;
}

pub trait Command: Request<Kind = kind::Command> {}

pub trait Query: Request<Kind = kind::Query> {}

/// A message routed to zero or more handlers. Unrelated to [`Request`].
pub trait Notification: Send + Sync + 'static {}

/// Borrowed, type-erased view of the message travelling through a pipeline.
#[derive(Clone, Copy)]
pub struct MessageRef<'a> {
    value: &'a (dyn Any + Send + Sync),
    key: TypeKey,
    kind: RequestKind,
}

impl<'a> MessageRef<'a> {
    pub fn request<R: Request>(request: &'a R) -> Self {
        Self {
            value: request,
            key: TypeKey::of::<R>(),
            kind: RequestKind::of::<R>(),
        }
    }

    pub fn notification<N: Notification>(notification: &'a N) -> Self {
        Self {
            value: notification,
            key: TypeKey::of::<N>(),
            kind: RequestKind::Notification,
        }
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    pub fn is_command(&self) -> bool {
        self.kind == RequestKind::Command
    }

    pub fn is_query(&self) -> bool {
        self.kind == RequestKind::Query
    }

    pub fn is_notification(&self) -> bool {
        self.kind == RequestKind::Notification
    }

    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    pub fn type_name(&self) -> &'static str {
        self.key.name()
    }

    /// Last path segment of the type name, e.g. `GetIntQuery`.
    pub fn short_name(&self) -> &'static str {
        self.key.short_name()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&'a T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for MessageRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRef")
            .field("type", &self.key.name())
            .field("kind", &self.kind)
            .finish()
    }
}
