use std::time::Duration;

use async_trait::async_trait;
use mediator::{CancellationToken, RegistryBuilder, RequestHandler};
use tokio::time;
use tracing::info;

use crate::domain::{Validate, ValidationError};

const WORK_DURATION: Duration = Duration::from_millis(50);

#[derive(Debug, mediator::Command)]
pub struct DoSomethingCommand;

#[derive(Debug, mediator::Command)]
pub struct SaySomethingCommand {
    pub value: String,
}

impl SaySomethingCommand {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Validate for SaySomethingCommand {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.value.trim().is_empty() {
            return Err(ValidationError {
                request: "SaySomethingCommand",
                reason: "value must not be blank".into(),
            });
        }
        Ok(())
    }
}

pub struct DoSomethingCommandHandler;

#[async_trait]
impl RequestHandler<DoSomethingCommand> for DoSomethingCommandHandler {
    async fn handle(&self, _command: &DoSomethingCommand, cancel: CancellationToken) -> anyhow::Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => anyhow::bail!("doing something was cancelled"),
            _ = time::sleep(WORK_DURATION) => {}
        }
        info!("from handler -> doing something...");
        Ok(())
    }
}

pub struct SaySomethingCommandHandler;

#[async_trait]
impl RequestHandler<SaySomethingCommand> for SaySomethingCommandHandler {
    async fn handle(&self, command: &SaySomethingCommand, _cancel: CancellationToken) -> anyhow::Result<()> {
        info!("from handler -> something is '{}'", command.value);
        Ok(())
    }
}

pub fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .handler::<DoSomethingCommand, _>(DoSomethingCommandHandler)
        .handler::<SaySomethingCommand, _>(SaySomethingCommandHandler)
}
