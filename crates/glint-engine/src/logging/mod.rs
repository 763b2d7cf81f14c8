//! Logging setup.
//!
//! Everything in the workspace logs through the `log` facade; this module
//! installs `env_logger` behind it.

mod init;

pub use init::{LoggingConfig, init_logging};
