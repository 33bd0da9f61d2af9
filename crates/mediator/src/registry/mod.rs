//! Type-keyed lookup of handlers and decorators.
//!
//! The dispatcher only talks to the [`Registry`] trait. [`HandlerRegistry`] is
//! the in-memory implementation populated through [`RegistryBuilder`].

mod memory;

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::decorator::Decorator;
use crate::request::{Notification, Request};

pub use memory::{HandlerRegistry, RegistryBuilder};

/// A resolved handler instance. Its concrete type is a handler slot created by
/// [`crate::handler::erase_request_handler`] or
/// [`crate::handler::erase_notification_handler`].
pub type Instance = Arc<dyn Any + Send + Sync>;

/// Stable identifier of a concrete Rust type.
///
/// Equality and hashing use the `TypeId` only; the name is kept for messages.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn short_name(&self) -> &'static str {
        let path = self.name.split('<').next().unwrap_or(self.name);
        path.rsplit("::").next().unwrap_or(path)
    }

    fn unit() -> Self {
        Self::of::<()>()
    }

    fn is_unit(&self) -> bool {
        self.id == TypeId::of::<()>()
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Key under which handlers are registered and resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerKey {
    request: TypeKey,
    response: Option<TypeKey>,
    notification: bool,
}

impl HandlerKey {
    /// `Handler<R>` for void requests, `Handler<R, R::Response>` otherwise.
    pub fn request<R: Request>() -> Self {
        let response = TypeKey::of::<R::Response>();

        Self {
            request: TypeKey::of::<R>(),
            response: (!response.is_unit()).then_some(response),
            notification: false,
        }
    }

    pub fn notification<N: Notification>() -> Self {
        Self {
            request: TypeKey::of::<N>(),
            response: None,
            notification: true,
        }
    }

    pub fn request_type(&self) -> TypeKey {
        self.request
    }

    pub fn response_type(&self) -> Option<TypeKey> {
        self.response
    }

    pub fn is_notification(&self) -> bool {
        self.notification
    }
}

/// The (request type, response type) pair decorators are resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    request: TypeKey,
    response: TypeKey,
}

impl PipelineKey {
    pub fn request<R: Request>() -> Self {
        Self {
            request: TypeKey::of::<R>(),
            response: TypeKey::of::<R::Response>(),
        }
    }

    pub fn notification<N: Notification>() -> Self {
        Self {
            request: TypeKey::of::<N>(),
            response: TypeKey::unit(),
        }
    }

    pub fn request_type(&self) -> TypeKey {
        self.request
    }

    pub fn response_type(&self) -> TypeKey {
        self.response
    }
}

/// Lookup capabilities the dispatcher consumes.
///
/// Implementations must be safe for concurrent reads; the dispatcher never
/// writes to a registry.
pub trait Registry: Send + Sync {
    /// The single handler for a request key, if any.
    fn resolve_one(&self, key: &HandlerKey) -> Option<Instance>;

    /// All handlers for a notification key, in registration order.
    ///
    /// `None` means the notification type is unknown to the registry;
    /// `Some(vec![])` means it is known but has no handlers.
    fn resolve_many(&self, key: &HandlerKey) -> Option<Vec<Instance>>;

    /// Decorators applying to the pair, in registration order.
    fn resolve_decorators(&self, key: &PipelineKey) -> Vec<Arc<dyn Decorator>>;
}

impl<G: Registry + ?Sized> Registry for Arc<G> {
    fn resolve_one(&self, key: &HandlerKey) -> Option<Instance> {
        (**self).resolve_one(key)
    }

    fn resolve_many(&self, key: &HandlerKey) -> Option<Vec<Instance>> {
        (**self).resolve_many(key)
    }

    fn resolve_decorators(&self, key: &PipelineKey) -> Vec<Arc<dyn Decorator>> {
        (**self).resolve_decorators(key)
    }
}
