//! Observability module
//!
//! Logging setup for the `sexcfg` binary. The library itself only emits
//! `tracing` events and never installs a subscriber.

pub mod logging;

pub use logging::{LogFormat, init_logging};
