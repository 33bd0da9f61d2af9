mod core;
mod domain;
mod infra;

use std::path::Path;

use mediator::Config;

use crate::core::App;

const CONFIG_PATH: &str = "./config";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_config()?;

    let config = Config::new();
    let app = App::new(&config)?;

    app.run().await
}

fn load_config() -> anyhow::Result<()> {
    if Path::new(CONFIG_PATH).exists() {
        dotenv::from_path(CONFIG_PATH)?;
    }
    Ok(())
}
