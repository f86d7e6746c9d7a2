//! CLI command dispatch and handlers
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod defaults;
pub mod params;
pub mod show;
pub mod validate;
pub mod version;

use crate::cli::args::{Cli, Commands, LoadArgs};
use crate::config::loader::{ConfigLoader, LoaderOptions, parse_override};
use crate::error::{ConfigError, SexcfgError};

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub fn dispatch(cli: Cli) -> Result<(), SexcfgError> {
    match cli.command {
        Commands::Validate(args) => validate::run(&args),
        Commands::Show(args) => show::run(&args),
        Commands::Defaults(args) => defaults::run(&args),
        Commands::Params(args) => params::run(&args),
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => version::run(&args),
    }
}

/// Builds a loader from the shared `--set` and `--no-env` options.
fn loader_for(args: &LoadArgs) -> Result<ConfigLoader, ConfigError> {
    let overrides = args
        .overrides
        .iter()
        .map(|s| parse_override(s))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ConfigLoader::new(LoaderOptions {
        overrides,
        expand_env: !args.no_env,
        ..LoaderOptions::default()
    }))
}
