use async_trait::async_trait;
use mediator::{CancellationToken, Next, Response, TypedDecorator};
use tracing::debug;

use crate::domain::Validate;

/// Rejects invalid requests before anything further down the pipeline runs.
#[non_exhaustive]
pub struct ValidationDecorator;

impl ValidationDecorator {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for ValidationDecorator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<M> TypedDecorator<M> for ValidationDecorator
where
    M: Validate + Send + Sync + 'static,
{
    async fn decorate(
        &self,
        message: &M,
        next: Next<'_>,
        cancel: CancellationToken,
    ) -> anyhow::Result<Response> {
        debug!("validating {}", std::any::type_name::<M>());
        message.validate()?;

        next.run(cancel).await
    }
}
