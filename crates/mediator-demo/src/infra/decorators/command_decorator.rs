use async_trait::async_trait;
use mediator::{CancellationToken, Decorator, MessageRef, Next, Response};
use tracing::info;

#[non_exhaustive]
pub struct CommandDecorator;

impl CommandDecorator {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for CommandDecorator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Decorator for CommandDecorator {
    async fn decorate(
        &self,
        message: MessageRef<'_>,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response> {
        if !message.is_command() {
            return next.run(cancel).await;
        }

        info!("decorating command of type {}", message.short_name());
        let res = next.run(cancel).await;
        info!("finished decorating command of type {}", message.short_name());

        res
    }
}
