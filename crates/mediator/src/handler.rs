use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::registry::Instance;
use crate::request::{Notification, Request};

#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync + 'static {
    async fn handle(&self, request: &R, cancel: CancellationToken) -> anyhow::Result<R::Response>;
}

#[async_trait]
pub trait NotificationHandler<N: Notification>: Send + Sync + 'static {
    async fn handle(&self, notification: &N, cancel: CancellationToken) -> anyhow::Result<()>;
}

struct RequestHandlerSlot<R: Request>(Arc<dyn RequestHandler<R>>);

struct NotificationHandlerSlot<N: Notification>(Arc<dyn NotificationHandler<N>>);

/// Packs a request handler into the form registries hand back from
/// `resolve_one`.
pub fn erase_request_handler<R: Request>(handler: Arc<dyn RequestHandler<R>>) -> Instance {
    Arc::new(RequestHandlerSlot(handler))
}

pub fn erase_notification_handler<N: Notification>(
    handler: Arc<dyn NotificationHandler<N>>,
) -> Instance {
    Arc::new(NotificationHandlerSlot(handler))
}

pub(crate) fn downcast_request_handler<R: Request>(
    instance: Instance,
) -> Option<Arc<dyn RequestHandler<R>>> {
    instance
        .downcast::<RequestHandlerSlot<R>>()
        .ok()
        .map(|slot| Arc::clone(&slot.0))
}

pub(crate) fn downcast_notification_handler<N: Notification>(
    instance: Instance,
) -> Option<Arc<dyn NotificationHandler<N>>> {
    instance
        .downcast::<NotificationHandlerSlot<N>>()
        .ok()
        .map(|slot| Arc::clone(&slot.0))
}
