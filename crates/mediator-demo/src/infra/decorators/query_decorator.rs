use std::time::Instant;

use async_trait::async_trait;
use mediator::{CancellationToken, Decorator, MessageRef, Next, Response};
use tracing::info;

/// Reports how long each query took.
#[non_exhaustive]
pub struct QueryDecorator;

impl QueryDecorator {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for QueryDecorator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Decorator for QueryDecorator {
    async fn decorate(
        &self,
        message: MessageRef<'_>,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response> {
        if !message.is_query() {
            return next.run(cancel).await;
        }

        info!("decorating query of type {}", message.short_name());
        let started = Instant::now();
        let res = next.run(cancel).await;
        info!(
            elapsed = ?started.elapsed(),
            "finished decorating query of type {}",
            message.short_name()
        );

        res
    }
}
