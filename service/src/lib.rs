//! Infrastructure concerns shared by every layer: runtime configuration and
//! console logging.

pub mod config;
pub mod logging;
