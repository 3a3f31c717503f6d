//! The transaction engine: ID allocation, in-flight map, send/receive
//! pipelines, timeouts and cancellation (spec.md §4.4).
pub mod client;
pub mod pending;

pub use client::{Client, MulticastCallback};
