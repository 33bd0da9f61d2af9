use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{
    decorator::{Decorator, Next, Response},
    request::MessageRef,
};

#[non_exhaustive]
#[derive(Debug, Clone, Copy)]
pub struct LoggingDecorator;

impl LoggingDecorator {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for LoggingDecorator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Decorator for LoggingDecorator {
    async fn decorate(
        &self,
        message: MessageRef<'_>,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response> {
        info!(kind = ?message.kind(), "handling {}", message.short_name());
        let res = next.run(cancel).await;
        match &res {
            Ok(_) => info!("handled {}", message.short_name()),
            Err(e) => error!("{} failed: {}", message.short_name(), e),
        }

        res
    }
}
