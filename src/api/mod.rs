//! Events API Lambda handler and request verification

pub mod handler;
pub mod helpers;
pub mod signature;

// Re-export the main handler for convenience
pub use handler::handler;
