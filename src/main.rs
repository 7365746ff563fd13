use anyhow::Result;
use form_dashboard::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    logger::init(config.verbose_logging);

    App::initialize(config).await?.run().await
}
