use std::future::Future;

use mediator::{CancellationToken, Sender};
use tracing::info;

use crate::domain::{
    ValidationError,
    commands::{DoSomethingCommand, SaySomethingCommand},
    notifications::UserGreeted,
    queries::GetIntQuery,
};

pub struct Examples {
    sender: Sender,
    cancel: CancellationToken,
}

impl Examples {
    pub fn new(sender: Sender, cancel: CancellationToken) -> Self {
        Self { sender, cancel }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        run_example(1, self.get_int()).await?;
        run_example(2, self.do_something()).await?;
        run_example(3, self.say_something()).await?;
        run_example(4, self.greet()).await?;
        run_example(5, self.say_nothing()).await?;

        Ok(())
    }

    async fn get_int(&self) -> anyhow::Result<()> {
        let result = self.sender.send(GetIntQuery, self.cancel.clone()).await?;
        info!("result: {result}");
        Ok(())
    }

    async fn do_something(&self) -> anyhow::Result<()> {
        self.sender
            .send(DoSomethingCommand, self.cancel.clone())
            .await
    }

    async fn say_something(&self) -> anyhow::Result<()> {
        self.sender
            .send(
                SaySomethingCommand::new("Hello from example 3"),
                self.cancel.clone(),
            )
            .await
    }

    async fn greet(&self) -> anyhow::Result<()> {
        self.sender
            .notify(UserGreeted::new("ada"), self.cancel.clone())
            .await
    }

    /// The validation decorator rejects blank text before the handler runs.
    async fn say_nothing(&self) -> anyhow::Result<()> {
        let res = self
            .sender
            .send(SaySomethingCommand::new("  "), self.cancel.clone())
            .await;

        match res {
            Err(e) if e.downcast_ref::<ValidationError>().is_some() => {
                info!("rejected as expected: {e}");
                Ok(())
            }
            Err(e) => Err(e),
            Ok(()) => Err(anyhow::anyhow!("blank text was not rejected")),
        }
    }
}

async fn run_example<F>(number: u32, task: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    info!("running example {number}...");
    task.await?;
    info!("example {number} completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::notifications::GreetingCounter, infra::registry};

    #[tokio::test]
    async fn test_all_examples_complete() {
        let examples = Examples::new(Sender::new(registry::build(GreetingCounter::default())), CancellationToken::new());

        examples.run().await.unwrap();
    }
}
