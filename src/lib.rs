/// Herring - background jobs that keep Slack in step with a puzzle hunt.
///
/// This crate implements a two-Lambda architecture:
/// 1. An events Lambda that receives signed puzzle events from the hunt web
///    application and queues the matching job
/// 2. A worker Lambda that runs queued jobs: announcing answers and updates,
///    and provisioning a spreadsheet and Slack channel for each new puzzle
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - SQS for task queuing (and delayed retries) between Lambdas
/// - slack-morphism and the Slack Web API for chat
/// - the Google Drive API for puzzle spreadsheets
/// - governor for per-job-type rate limits
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use herring::core::config::AppConfig;
/// use herring::core::models::{Job, QueuedJob};
/// use herring::worker::Dispatcher;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     herring::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let dispatcher = Dispatcher::from_config(&config).await?;
///
///     let job = QueuedJob::new(Job::PostAnswer {
///         slug: "the-pear".to_string(),
///         answer: "banana".to_string(),
///     });
///     let outcome = dispatcher.dispatch(&job).await?;
///     println!("{outcome:?}");
///
///     Ok(())
/// }
/// ```
// Module declarations
pub mod api;
pub mod core;
pub mod errors;
pub mod sheets;
pub mod slack;
pub mod utils;
pub mod worker;

pub use errors::HerringError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration, filtered by `RUST_LOG` (default `info`). It
/// should be called once at the start of each Lambda binary. Calling it again
/// is harmless.
///
/// # Example
///
/// ```
/// herring::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
