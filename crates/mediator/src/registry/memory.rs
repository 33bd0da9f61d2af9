use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    decorator::{Decorator, Scoped, TypedDecorator},
    handler::{
        NotificationHandler, RequestHandler, erase_notification_handler, erase_request_handler,
    },
    registry::{HandlerKey, Instance, PipelineKey, Registry, TypeKey},
    request::{Notification, Request},
};

type Factory = Arc<dyn Fn() -> Instance + Send + Sync>;

#[derive(Clone)]
enum Provider {
    /// One instance shared by every resolution.
    Shared(Instance),
    /// A fresh instance per resolution.
    Factory(Factory),
}

impl Provider {
    fn get(&self) -> Instance {
        match self {
            Provider::Shared(instance) => Arc::clone(instance),
            Provider::Factory(factory) => factory(),
        }
    }
}

#[derive(Clone)]
struct DecoratorEntry {
    /// `None` for open decorators.
    scope: Option<TypeId>,
    decorator: Arc<dyn Decorator>,
}

impl DecoratorEntry {
    fn applies_to(&self, key: &PipelineKey) -> bool {
        self.scope.is_none_or(|id| id == key.request_type().id())
    }
}

/// Collects registrations and freezes them into a [`HandlerRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    requests: HashMap<HandlerKey, Provider>,
    notifications: HashMap<HandlerKey, Vec<Provider>>,
    decorators: Vec<DecoratorEntry>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a group of registrations, e.g. one per application module.
    pub fn configure<F>(self, f: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        f(self)
    }

    /// Registers the handler for `R`, replacing any earlier one.
    pub fn handler<R, H>(self, handler: H) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.insert_request::<R>(Provider::Shared(erase_request_handler(handler)))
    }

    /// Registers a factory invoked on every resolution of `R`.
    pub fn handler_factory<R, H, F>(self, factory: F) -> Self
    where
        R: Request,
        H: RequestHandler<R>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || {
            let handler: Arc<dyn RequestHandler<R>> = Arc::new(factory());
            erase_request_handler(handler)
        });
        self.insert_request::<R>(Provider::Factory(factory))
    }

    pub fn notification_handler<N, H>(self, handler: H) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
    {
        let handler: Arc<dyn NotificationHandler<N>> = Arc::new(handler);
        self.push_notification::<N>(Provider::Shared(erase_notification_handler(handler)))
    }

    pub fn notification_handler_factory<N, H, F>(self, factory: F) -> Self
    where
        N: Notification,
        H: NotificationHandler<N>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || {
            let handler: Arc<dyn NotificationHandler<N>> = Arc::new(factory());
            erase_notification_handler(handler)
        });
        self.push_notification::<N>(Provider::Factory(factory))
    }

    /// Makes `N` known without attaching a handler.
    pub fn declare_notification<N: Notification>(mut self) -> Self {
        self.notifications
            .entry(HandlerKey::notification::<N>())
            .or_default();
        self
    }

    /// Registers a decorator for every request and notification.
    pub fn decorator<D: Decorator>(mut self, decorator: D) -> Self {
        self.decorators.push(DecoratorEntry {
            scope: None,
            decorator: Arc::new(decorator),
        });
        self
    }

    /// Registers a decorator that only wraps pipelines for messages of type `M`.
    ///
    /// Scoping is by type alone: when `M` is both a [`Request`] and a
    /// [`Notification`], the decorator wraps its `send` and its `notify`
    /// pipelines alike.
    pub fn typed_decorator<M, D>(mut self, decorator: D) -> Self
    where
        M: Send + Sync + 'static,
        D: TypedDecorator<M>,
    {
        self.decorators.push(DecoratorEntry {
            scope: Some(TypeId::of::<M>()),
            decorator: Arc::new(Scoped::<M, D>::new(decorator)),
        });
        self
    }

    #[must_use]
    pub fn build(self) -> HandlerRegistry {
        debug!(
            requests = self.requests.len(),
            notifications = self.notifications.len(),
            decorators = self.decorators.len(),
            "registry built"
        );

        HandlerRegistry {
            requests: self.requests,
            notifications: self.notifications,
            decorators: self.decorators,
        }
    }

    fn insert_request<R: Request>(mut self, provider: Provider) -> Self {
        let key = HandlerKey::request::<R>();
        if self.requests.insert(key, provider).is_some() {
            warn!("replacing handler for request {}", TypeKey::of::<R>());
        }
        self
    }

    fn push_notification<N: Notification>(mut self, provider: Provider) -> Self {
        self.notifications
            .entry(HandlerKey::notification::<N>())
            .or_default()
            .push(provider);
        self
    }
}

/// Immutable, in-memory [`Registry`].
#[derive(Clone)]
pub struct HandlerRegistry {
    requests: HashMap<HandlerKey, Provider>,
    notifications: HashMap<HandlerKey, Vec<Provider>>,
    decorators: Vec<DecoratorEntry>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn contains(&self, key: &HandlerKey) -> bool {
        if key.is_notification() {
            self.notifications.contains_key(key)
        } else {
            self.requests.contains_key(key)
        }
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("requests", &self.requests.keys().collect::<Vec<_>>())
            .field("notifications", &self.notifications.keys().collect::<Vec<_>>())
            .field("decorators", &self.decorators.len())
            .finish()
    }
}

impl Registry for HandlerRegistry {
    fn resolve_one(&self, key: &HandlerKey) -> Option<Instance> {
        self.requests.get(key).map(Provider::get)
    }

    fn resolve_many(&self, key: &HandlerKey) -> Option<Vec<Instance>> {
        self.notifications
            .get(key)
            .map(|providers| providers.iter().map(Provider::get).collect())
    }

    fn resolve_decorators(&self, key: &PipelineKey) -> Vec<Arc<dyn Decorator>> {
        self.decorators
            .iter()
            .filter(|entry| entry.applies_to(key))
            .map(|entry| Arc::clone(&entry.decorator))
            .collect()
    }
}
