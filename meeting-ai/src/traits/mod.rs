//! Provider traits implemented by the gateways in the `domain` crate.

pub mod calendar;
pub mod execution;
pub mod notification;
