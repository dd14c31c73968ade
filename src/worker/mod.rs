//! Worker Lambda handler and the puzzle jobs it runs

pub mod dispatch;
pub mod handler;
pub mod jobs;
pub mod notify;
pub mod provision;
pub mod throttle;

// Re-export the main handler for convenience
pub use dispatch::{Dispatched, Dispatcher};
pub use handler::handler;
pub use jobs::{FailurePolicy, JobOutcome, PuzzleJobs};
pub use provision::{ChannelReady, LookupOutcome, ProvisionState};
pub use throttle::Throttle;
