//! # meeting-auth
//!
//! Authentication and outbound HTTP plumbing shared by every provider gateway:
//! - Bearer credentials for service providers (Julep, Google Calendar, MailerSend)
//! - HTTP client building with retry middleware and sensitive auth headers
//!
//! ## Usage
//!
//! ```rust,ignore
//! use meeting_auth::{
//!     api_key::{ApiKeyProvider, BearerTokenAuth},
//!     http::AuthenticatedClientBuilder,
//! };
//!
//! let client = AuthenticatedClientBuilder::new()
//!     .with_auth(Box::new(BearerTokenAuth::new(ApiKeyProvider::Julep, key)))
//!     .with_max_retries(0)
//!     .build()?;
//! ```

pub mod api_key;
pub mod error;
pub mod http;

// Re-export commonly used types
pub use error::{Error, ErrorKind};
