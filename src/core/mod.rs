//! Configuration, domain types and the stores this crate talks to.

pub mod config;
pub mod models;
pub mod puzzle_store;
pub mod queue;
