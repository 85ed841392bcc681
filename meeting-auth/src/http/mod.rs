//! Outbound HTTP: authenticated clients and their retry schedule.

mod client;
mod retry;

pub use client::{AuthenticatedClient, AuthenticatedClientBuilder};
pub use retry::Backoff;
