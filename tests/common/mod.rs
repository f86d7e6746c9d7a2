//! Shared integration-test harness for running the `sexcfg` binary.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{Command, Output};

/// Helpers for invoking the `sexcfg` binary.
pub struct Sexcfg;

impl Sexcfg {
    /// Runs `sexcfg` with the given arguments and returns its output.
    ///
    /// Logging is routed through a fixed filter so tests do not depend on
    /// the caller's environment.
    #[allow(clippy::missing_panics_doc)]
    pub fn run(args: &[&str]) -> Output {
        Self::command(args)
            .output()
            .expect("failed to spawn sexcfg")
    }

    /// Builds a `sexcfg` command without running it.
    #[must_use]
    pub fn command(args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_sexcfg"));
        cmd.args(args)
            .env("SEXCFG_LOG_LEVEL", "warn")
            .env_remove("SEXCFG_COLOR")
            .env_remove("SEXCFG_LOG_FORMAT")
            .env_remove("SEXCFG_MAX_CONFIG_SIZE");
        cmd
    }

    /// Returns the path to a test fixture.
    #[must_use]
    pub fn fixture_path(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    /// Returns a fixture path as a `&str`-friendly `String`.
    #[must_use]
    pub fn fixture(name: &str) -> String {
        Self::fixture_path(name).display().to_string()
    }
}

/// Standard output as a `String`.
#[must_use]
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Standard error as a `String`.
#[must_use]
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
