// src/infrastructure/mod.rs
//
// Infrastructure utilities shared across services

pub mod retry;

pub use retry::{RetryPolicy, RetryingFetcher};
