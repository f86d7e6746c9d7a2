//! `sexcfg` - typed loader for SExtractor configuration files
//!
//! This library parses `KEY value # comment` configuration files, checks
//! every entry against a schema of known parameters and returns a frozen,
//! typed [`config::Config`].
//!
//! ```no_run
//! let config = sexcfg::config::load("default.sex")?;
//! assert_eq!(config.text("CATALOG_TYPE"), Some("ASCII_HEAD"));
//! # Ok::<(), sexcfg::error::ConfigError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod observability;
