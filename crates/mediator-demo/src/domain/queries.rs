use async_trait::async_trait;
use mediator::{CancellationToken, RegistryBuilder, RequestHandler};

#[derive(Debug, mediator::Query)]
#[response(i32)]
pub struct GetIntQuery;

#[non_exhaustive]
pub struct GetIntQueryHandler;

impl GetIntQueryHandler {
    pub fn new() -> Self {
        Self {}
    }
}

impl Default for GetIntQueryHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RequestHandler<GetIntQuery> for GetIntQueryHandler {
    async fn handle(&self, _query: &GetIntQuery, _cancel: CancellationToken) -> anyhow::Result<i32> {
        Ok(42)
    }
}

pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder.handler::<GetIntQuery, _>(GetIntQueryHandler::new())
}
