//! `show` command
//!
//! Loads one file and prints the resolved configuration.

use indexmap::IndexMap;
use serde::Serialize;

use crate::cli::args::{ShowArgs, ShowFormat};
use crate::cli::commands::loader_for;
use crate::config::render::{RenderOptions, render};
use crate::config::resolved::{Config, Origin, Setting};
use crate::config::schema::Value;
use crate::error::SexcfgError;

/// Load a configuration file and print it.
///
/// # Errors
///
/// Returns the first loading error, or a serialization error.
pub fn run(args: &ShowArgs) -> Result<(), SexcfgError> {
    let loader = loader_for(&args.load)?;
    let result = loader.load(&args.file)?;

    for warning in &result.warnings {
        tracing::warn!(
            location = warning.location.as_deref().unwrap_or("<unknown>"),
            "{}",
            warning.message
        );
    }

    let config = &result.config;
    match args.format {
        ShowFormat::Human => {
            let options = RenderOptions {
                origins: args.origin,
                explicit_only: args.explicit,
                literal_dollars: args.load.no_env,
                ..RenderOptions::default()
            };
            print!("{}", render(config, loader.registry(), options));
        }
        ShowFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&selection(config, args))?);
        }
        ShowFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&selection(config, args))?);
        }
    }
    Ok(())
}

/// Structured output: plain values, or values with their origins.
#[derive(Serialize)]
#[serde(untagged)]
enum Selection<'a> {
    Values(IndexMap<&'a str, &'a Value>),
    Settings(IndexMap<&'a str, &'a Setting>),
}

fn selection<'a>(config: &'a Config, args: &ShowArgs) -> Selection<'a> {
    let chosen = config
        .iter()
        .filter(|(_, s)| !args.explicit || s.origin != Origin::Default);
    if args.origin {
        Selection::Settings(chosen.collect())
    } else {
        Selection::Values(chosen.map(|(k, s)| (k, &s.value)).collect())
    }
}
