//! Typed request bodies for the JSON endpoints.
//!
//! Every field is optional at the type level so that a missing field reaches the
//! handler and is reported with the endpoint's own message instead of a generic
//! deserialization failure.

pub(crate) mod email;
pub(crate) mod google_token;
pub(crate) mod summarize;
