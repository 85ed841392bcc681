//! Wire-level types exchanged with providers.

pub mod calendar;
pub mod execution;
pub mod notification;
