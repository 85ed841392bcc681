//! Meeting summarization domain: the pipeline that turns a transcript into a
//! summary with action items, the provider gateways it runs on and the error
//! tree the `web` layer maps onto HTTP responses.
//!
//! The types `web` needs are re-exported here so it does not depend on
//! `tokio-util` directly.

pub use tokio_util::sync::CancellationToken;

pub use summarizer::{Summarizer, SummaryReport};
pub use summary::{ActionItem, ConnectorStatus, DispatchOutcome, ParsedOutcome};

pub mod dispatch;
pub mod emails;
pub mod error;
pub mod execution;
pub mod extraction;
pub mod prompt;
pub mod summarizer;
pub mod summary;

pub mod gateway;
