//! `defaults` command
//!
//! Writes a complete default configuration file.

use crate::cli::args::DefaultsArgs;
use crate::config::render::{RenderOptions, render_defaults};
use crate::config::schema::SchemaRegistry;
use crate::error::SexcfgError;

/// Print or write the default configuration.
///
/// # Errors
///
/// Returns a usage error if the output file exists and `--force` was not
/// given, or an I/O error if writing fails.
pub fn run(args: &DefaultsArgs) -> Result<(), SexcfgError> {
    let options = RenderOptions {
        section: args.section,
        header: true,
        ..RenderOptions::default()
    };
    let text = render_defaults(SchemaRegistry::sextractor(), options).to_string();

    let Some(path) = &args.output else {
        print!("{text}");
        return Ok(());
    };

    if path.exists() && !args.force {
        return Err(SexcfgError::Usage(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    std::fs::write(path, text)?;
    tracing::info!(file = %path.display(), "default configuration written");
    Ok(())
}
