//! Riot API client used by the sync pipeline.
//!
//! The crate offers typed wrappers around the official REST endpoints,
//! a dual-window rate governor every outbound call passes through, and
//! bounded retry with backoff for rate-limit and transient failures.

pub mod client;
pub mod lol;
pub mod metrics;
pub mod rate_limit;
