use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use mediator::{CancellationToken, NotificationHandler, RegistryBuilder};
use tracing::info;

#[derive(Debug, mediator::Notification)]
pub struct UserGreeted {
    pub name: String,
}

impl UserGreeted {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

pub struct GreetingLogger;

#[async_trait]
impl NotificationHandler<UserGreeted> for GreetingLogger {
    async fn handle(&self, event: &UserGreeted, _cancel: CancellationToken) -> anyhow::Result<()> {
        info!("from handler -> {} was greeted", event.name);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct GreetingCounter {
    count: Arc<AtomicUsize>,
}

impl GreetingCounter {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationHandler<UserGreeted> for GreetingCounter {
    async fn handle(&self, _event: &UserGreeted, _cancel: CancellationToken) -> anyhow::Result<()> {
        let total = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        info!("from handler -> {total} greetings so far");
        Ok(())
    }
}

pub fn register(builder: RegistryBuilder, counter: GreetingCounter) -> RegistryBuilder {
    builder
        .notification_handler::<UserGreeted, _>(GreetingLogger)
        .notification_handler::<UserGreeted, _>(counter)
}
