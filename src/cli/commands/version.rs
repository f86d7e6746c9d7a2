//! Version information display

use crate::cli::args::{OutputFormat, VersionArgs};
use crate::config::schema::SchemaRegistry;
use crate::error::SexcfgError;

/// Print version information.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(args: &VersionArgs) -> Result<(), SexcfgError> {
    let name = env!("CARGO_PKG_NAME");
    let version = env!("CARGO_PKG_VERSION");
    let parameters = SchemaRegistry::sextractor().len();

    match args.format {
        OutputFormat::Human => {
            println!("{name} {version} ({parameters} parameters)");
        }
        OutputFormat::Json => {
            let info = serde_json::json!({
                "name": name,
                "version": version,
                "parameters": parameters,
            });
            println!("{}", serde_json::to_string(&info)?);
        }
    }
    Ok(())
}
