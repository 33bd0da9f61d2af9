use std::any::type_name;
use std::fmt;
use std::sync::Arc;

use futures_util::{FutureExt, future::join_all};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::{
    config::{MediatorOptions, MissingHandlers, NotifyStrategy},
    decorator::{Next, Response},
    error::DispatchError,
    handler::{
        NotificationHandler, RequestHandler, downcast_notification_handler,
        downcast_request_handler,
    },
    pipeline,
    registry::{HandlerKey, PipelineKey, Registry, TypeKey},
    request::{MessageRef, Notification, Request},
};

/// Routes requests and notifications to the handlers a [`Registry`] resolves
/// for their concrete type.
///
/// Holds no per-call state: clones share the registry and every call builds
/// and drops its own pipeline.
#[derive(Clone)]
pub struct Sender {
    registry: Arc<dyn Registry>,
    options: MediatorOptions,
}

impl Sender {
    pub fn new<G: Registry + 'static>(registry: G) -> Self {
        Self::builder(registry).build()
    }

    pub fn builder<G: Registry + 'static>(registry: G) -> SenderBuilder {
        SenderBuilder {
            registry: Arc::new(registry),
            options: MediatorOptions::default(),
        }
    }

    pub fn options(&self) -> MediatorOptions {
        self.options
    }

    /// Sends `request` to its single handler through the decorator pipeline.
    ///
    /// Errors raised by the handler or a decorator are returned as produced.
    /// Failures of the dispatch itself are [`DispatchError`]s.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: CancellationToken,
    ) -> anyhow::Result<R::Response> {
        self.send_ref(&request, cancel).await
    }

    pub async fn send_ref<R: Request>(
        &self,
        request: &R,
        cancel: CancellationToken,
    ) -> anyhow::Result<R::Response> {
        let key = HandlerKey::request::<R>();
        let request_type = key.request_type();

        let instance =
            self.registry
                .resolve_one(&key)
                .ok_or_else(|| DispatchError::HandlerNotFound {
                    request: request_type.name(),
                    response: key.response_type().map(|r| r.name()),
                })?;
        let handler = downcast_request_handler::<R>(instance).ok_or_else(|| {
            DispatchError::HandlerShapeMismatch {
                request: request_type.name(),
                expected: type_name::<dyn RequestHandler<R>>(),
            }
        })?;

        let decorators = self.registry.resolve_decorators(&PipelineKey::request::<R>());
        debug!(
            request = request_type.short_name(),
            decorators = decorators.len(),
            "sending request"
        );

        let terminal = Next::new(move |cancel| {
            let handler = Arc::clone(&handler);
            async move { handler.handle(request, cancel).await.map(Response::new) }.boxed()
        });

        let response = pipeline::wrap(MessageRef::request(request), terminal, &decorators)
            .run(cancel)
            .await?;

        Ok(into_value::<R::Response>(response, request_type)?)
    }

    /// Publishes `notification` to every handler registered for its type, each
    /// through its own decorator pipeline.
    pub async fn notify<N: Notification>(
        &self,
        notification: N,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        self.notify_ref(&notification, cancel).await
    }

    pub async fn notify_ref<N: Notification>(
        &self,
        notification: &N,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let key = HandlerKey::notification::<N>();
        let notification_type = key.request_type();
        let policy = self.options.missing_notification_handlers;

        let Some(instances) = self.registry.resolve_many(&key) else {
            if policy == MissingHandlers::Ignore {
                trace!(
                    notification = notification_type.short_name(),
                    "unknown notification, nothing to do"
                );
                return Ok(());
            }
            return Err(handlers_not_found(notification_type).into());
        };

        if instances.is_empty() {
            if policy == MissingHandlers::ErrorIfEmpty {
                return Err(handlers_not_found(notification_type).into());
            }
            trace!(
                notification = notification_type.short_name(),
                "no handlers, nothing to do"
            );
            return Ok(());
        }

        let handlers = instances
            .into_iter()
            .map(|instance| {
                downcast_notification_handler::<N>(instance).ok_or_else(|| {
                    DispatchError::HandlerShapeMismatch {
                        request: notification_type.name(),
                        expected: type_name::<dyn NotificationHandler<N>>(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            notification = notification_type.short_name(),
            handlers = handlers.len(),
            strategy = ?self.options.notify_strategy,
            "publishing notification"
        );

        match self.options.notify_strategy {
            NotifyStrategy::Sequential => {
                for handler in handlers {
                    self.publish_to(notification, handler, cancel.clone())
                        .await?;
                }
                Ok(())
            }
            NotifyStrategy::Concurrent => {
                let results = join_all(
                    handlers
                        .into_iter()
                        .map(|handler| self.publish_to(notification, handler, cancel.clone())),
                )
                .await;

                let mut errors: Vec<anyhow::Error> =
                    results.into_iter().filter_map(Result::err).collect();
                match errors.len() {
                    0 => Ok(()),
                    1 => Err(errors.remove(0)),
                    _ => Err(DispatchError::Aggregate {
                        notification: notification_type.name(),
                        errors,
                    }
                    .into()),
                }
            }
        }
    }

    async fn publish_to<N: Notification>(
        &self,
        notification: &N,
        handler: Arc<dyn NotificationHandler<N>>,
        cancel: CancellationToken,
    ) -> anyhow::Result<()> {
        let decorators = self
            .registry
            .resolve_decorators(&PipelineKey::notification::<N>());

        let terminal = Next::new(move |cancel| {
            let handler = Arc::clone(&handler);
            async move {
                handler
                    .handle(notification, cancel)
                    .await
                    .map(|()| Response::unit())
            }
            .boxed()
        });

        let response = pipeline::wrap(MessageRef::notification(notification), terminal, &decorators)
            .run(cancel)
            .await?;

        Ok(into_value::<()>(response, TypeKey::of::<N>())?)
    }
}

impl fmt::Debug for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sender")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

pub struct SenderBuilder {
    registry: Arc<dyn Registry>,
    options: MediatorOptions,
}

impl SenderBuilder {
    #[must_use]
    pub fn options(mut self, options: MediatorOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn notify_strategy(mut self, strategy: NotifyStrategy) -> Self {
        self.options.notify_strategy = strategy;
        self
    }

    #[must_use]
    pub fn missing_notification_handlers(mut self, policy: MissingHandlers) -> Self {
        self.options.missing_notification_handlers = policy;
        self
    }

    #[must_use]
    pub fn build(self) -> Sender {
        Sender {
            registry: self.registry,
            options: self.options,
        }
    }
}

fn handlers_not_found(notification: TypeKey) -> DispatchError {
    DispatchError::NotificationHandlersNotFound {
        notification: notification.name(),
    }
}

/// Checks the envelope a pipeline produced against the type its caller
/// expects.
fn into_value<T: Send + 'static>(response: Response, request: TypeKey) -> Result<T, DispatchError> {
    if response.is_empty() {
        return Err(DispatchError::NullResult {
            request: request.name(),
        });
    }

    response
        .downcast::<T>()
        .map_err(|response| DispatchError::TypeContractViolation {
            request: request.name(),
            expected: type_name::<T>(),
            actual: response.type_name(),
        })
}
