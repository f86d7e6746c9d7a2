//! `params` command
//!
//! Lists the parameters of the built-in registry.

use crate::cli::args::{OutputFormat, ParamsArgs};
use crate::config::schema::{ParameterSpec, SchemaRegistry};
use crate::error::SexcfgError;

/// Print the known parameters.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &ParamsArgs) -> Result<(), SexcfgError> {
    let specs: Vec<&ParameterSpec> = SchemaRegistry::sextractor()
        .iter()
        .filter(|spec| args.section.is_none_or(|s| s == spec.section))
        .collect();

    match args.format {
        OutputFormat::Human => {
            for spec in specs {
                println!("{}", describe(spec));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&specs)?),
    }
    Ok(())
}

/// One-line summary: name, kind, default and constraint.
fn describe(spec: &ParameterSpec) -> String {
    let default = spec
        .default_value()
        .map_or_else(|| "(required)".to_string(), ToString::to_string);

    let mut constraint = Vec::new();
    if let Some(tokens) = &spec.allowed_tokens {
        constraint.push(tokens.join("|"));
    }
    if let Some(range) = spec.range {
        constraint.push(format!("{}..{}", bound(range.min), bound(range.max)));
    }
    if spec.kind.is_list() {
        if spec.count.min == spec.count.max {
            constraint.push(format!("{} value(s)", spec.count.min));
        } else {
            constraint.push(format!("{}-{} value(s)", spec.count.min, spec.count.max));
        }
    }

    format!(
        "{:<17}{:<12}{:<15} {}",
        spec.name,
        spec.kind.to_string(),
        default,
        constraint.join("; ")
    )
    .trim_end()
    .to_string()
}

/// Prints whole bounds without a fractional part.
fn bound(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:e}")
    }
}
