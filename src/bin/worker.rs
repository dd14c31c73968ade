use herring::core::config::AppConfig;
use herring::worker::{Dispatcher, handler};
use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

#[tokio::main]
async fn main() -> Result<(), Error> {
    herring::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    // Built once per execution environment and reused by warm invocations.
    let dispatcher = Arc::new(Dispatcher::from_config(&config).await?);

    run(service_fn(move |event: LambdaEvent<Value>| {
        let dispatcher = Arc::clone(&dispatcher);
        async move { handler(&dispatcher, event).await }
    }))
    .await
}
