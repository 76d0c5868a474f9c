use tokio::net::TcpListener;

use toys_kingdom::config::Config;
use toys_kingdom::{server, telemetry, ToyCatalogBuilder};

#[tokio::main]
async fn main() -> toys_kingdom::Result<()> {
    telemetry::init_tracing();

    let config = Config::from_env()?;
    let catalog = ToyCatalogBuilder::from_config(&config).build().await?;
    catalog.prepare().await;

    let listener = TcpListener::bind(config.bind_addr()).await?;
    server::run(listener, catalog, server::shutdown_signal()).await
}
