use mediator::{CancellationToken, Config, Sender};
use tracing::{info, warn};

use crate::{
    core::Examples,
    domain::notifications::GreetingCounter,
    infra::{LogGuard, options, registry},
};

pub struct App {
    _log_guard: LogGuard,
    sender: Sender,
    greetings: GreetingCounter,
}

impl App {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let log_guard = LogGuard::init(config)?;
        let options = options::load(config)?;

        let greetings = GreetingCounter::default();
        let sender = Sender::builder(registry::build(greetings.clone()))
            .options(options)
            .build();

        Ok(Self {
            _log_guard: log_guard,
            sender,
            greetings,
        })
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!(options = ?self.sender.options(), "app running...");

        let cancel = CancellationToken::new();
        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("received ctrl-c, cancelling");
                    cancel.cancel();
                }
            })
        };

        let res = Examples::new(self.sender, cancel).run().await;
        watcher.abort();

        res?;
        info!(greetings = self.greetings.count(), "finish!");

        Ok(())
    }
}
