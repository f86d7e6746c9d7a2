//! Rendering configurations back to file syntax
//!
//! Output is grouped by section, one `KEY value # description` line per
//! parameter, and loads back to an equal [`Config`].

use std::fmt;

use crate::config::resolved::{Config, Origin};
use crate::config::schema::{DefaultValue, ParameterSpec, SchemaRegistry, Section};

/// Width of the key column.
const KEY_WIDTH: usize = 17;

/// Width of the value column before the trailing comment.
const VALUE_WIDTH: usize = 15;

/// Width of a section header line.
const HEADER_WIDTH: usize = 76;

/// Rendering options.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Annotate each line with where its value came from.
    pub origins: bool,

    /// Only render this section.
    pub section: Option<Section>,

    /// Emit a leading `# generated by` line.
    pub header: bool,

    /// Skip parameters that still hold their default value.
    pub explicit_only: bool,

    /// Write `$` as is, for files read back with environment expansion off.
    pub literal_dollars: bool,
}

/// A configuration ready to be written; use `to_string()` or `write!`.
#[derive(Debug, Clone, Copy)]
pub struct Rendered<'a> {
    registry: &'a SchemaRegistry,
    config: Option<&'a Config>,
    options: RenderOptions,
}

/// Renders a resolved configuration.
#[must_use]
pub const fn render<'a>(
    config: &'a Config,
    registry: &'a SchemaRegistry,
    options: RenderOptions,
) -> Rendered<'a> {
    Rendered {
        registry,
        config: Some(config),
        options,
    }
}

/// Renders the registry defaults as a complete configuration file.
///
/// Required parameters have no default and are written commented out.
#[must_use]
pub const fn render_defaults(registry: &SchemaRegistry, options: RenderOptions) -> Rendered<'_> {
    Rendered {
        registry,
        config: None,
        options,
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.options.header {
            writeln!(
                f,
                "# Configuration file generated by sexcfg {}",
                env!("CARGO_PKG_VERSION")
            )?;
        }

        let sections = Section::ALL
            .into_iter()
            .filter(|s| self.options.section.is_none_or(|only| only == *s));

        let mut first = !self.options.header;
        for section in sections {
            let specs: Vec<&ParameterSpec> = self
                .registry
                .iter()
                .filter(|spec| spec.section == section && self.includes(spec))
                .collect();
            if specs.is_empty() {
                continue;
            }

            if !first {
                writeln!(f)?;
            }
            first = false;
            writeln!(f, "#{:-^HEADER_WIDTH$}", format!(" {} ", section.title()))?;
            writeln!(f)?;

            for spec in specs {
                self.write_line(f, spec)?;
            }
        }
        Ok(())
    }
}

impl Rendered<'_> {
    fn includes(&self, spec: &ParameterSpec) -> bool {
        if !self.options.explicit_only {
            return true;
        }
        self.config
            .and_then(|config| config.origin(&spec.name))
            .is_some_and(|origin| origin != Origin::Default)
    }

    fn write_line(&self, f: &mut fmt::Formatter<'_>, spec: &ParameterSpec) -> fmt::Result {
        let (value, origin) = match self.config {
            Some(config) => match config.setting(&spec.name) {
                Some(setting) => (
                    setting.value.to_file_syntax(self.options.literal_dollars),
                    Some(setting.origin),
                ),
                None => return Ok(()),
            },
            None => match &spec.default {
                DefaultValue::Value(value) => {
                    (value.to_file_syntax(self.options.literal_dollars), None)
                }
                DefaultValue::Required => {
                    return write_commented_required(f, spec);
                }
            },
        };

        let comment = comment_text(spec, origin.filter(|_| self.options.origins));
        if comment.is_empty() {
            writeln!(f, "{:<KEY_WIDTH$}{value}", spec.name)
        } else {
            writeln!(
                f,
                "{:<KEY_WIDTH$}{value:<VALUE_WIDTH$} # {comment}",
                spec.name
            )
        }
    }
}

fn write_commented_required(f: &mut fmt::Formatter<'_>, spec: &ParameterSpec) -> fmt::Result {
    let comment = comment_text(spec, None);
    if comment.is_empty() {
        writeln!(f, "#{:<KEY_WIDTH$}(required)", spec.name)
    } else {
        writeln!(
            f,
            "#{:<KEY_WIDTH$}{:<VALUE_WIDTH$} # {comment}",
            spec.name, "(required)"
        )
    }
}

fn comment_text(spec: &ParameterSpec, origin: Option<Origin>) -> String {
    match origin {
        Some(origin) if spec.description.is_empty() => format!("[{origin}]"),
        Some(origin) => format!("[{origin}] {}", spec.description),
        None => spec.description.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::{ConfigLoader, LoaderOptions};

    #[test]
    fn test_defaults_include_every_parameter() {
        let registry = SchemaRegistry::sextractor();
        let text = render_defaults(registry, RenderOptions::default()).to_string();
        for name in registry.names() {
            assert!(
                text.lines().any(|l| l.split_whitespace().next() == Some(name)),
                "missing {name}"
            );
        }
    }

    #[test]
    fn test_line_layout() {
        let registry = SchemaRegistry::sextractor();
        let text = render_defaults(registry, RenderOptions::default()).to_string();
        let line = text
            .lines()
            .find(|l| l.starts_with("CATALOG_NAME"))
            .unwrap();
        assert_eq!(
            line,
            "CATALOG_NAME     test.cat        # name of the output catalog"
        );
    }

    #[test]
    fn test_section_headers() {
        let registry = SchemaRegistry::sextractor();
        let text = render_defaults(registry, RenderOptions::default()).to_string();
        assert!(text.starts_with("#-"));
        assert!(text.contains(" Catalog "));
        assert!(text.contains(" Memory (change with caution!) "));
        let header = text.lines().next().unwrap();
        assert_eq!(header.len(), HEADER_WIDTH + 1);
    }

    #[test]
    fn test_section_filter() {
        let registry = SchemaRegistry::sextractor();
        let options = RenderOptions {
            section: Some(Section::Memory),
            ..RenderOptions::default()
        };
        let text = render_defaults(registry, options).to_string();
        assert!(text.contains("MEMORY_PIXSTACK"));
        assert!(!text.contains("CATALOG_NAME"));
    }

    #[test]
    fn test_defaults_load_back_to_defaults() {
        let loader = ConfigLoader::with_defaults();
        let text = render_defaults(loader.registry(), RenderOptions::default()).to_string();
        let reloaded = loader.load_from_str(&text).unwrap();
        let defaults = loader.load_from_str("").unwrap();
        assert_eq!(reloaded.config, defaults.config);
    }

    #[test]
    fn test_config_round_trip() {
        let loader = ConfigLoader::with_defaults();
        let text = "CATALOG_NAME \"my run #2.cat\"\n\
                    CATALOG_TYPE FITS_LDAC\n\
                    PHOT_APERTURES 3,5,8.5,12\n\
                    DEBLEND_MINCONT 0.0001\n\
                    FILTER N\n\
                    CHECKIMAGE_TYPE BACKGROUND,SEGMENTATION\n\
                    CHECKIMAGE_NAME back.fits,seg.fits\n";
        let original = loader.load_from_str(text).unwrap();
        let rendered = render(
            &original.config,
            loader.registry(),
            RenderOptions::default(),
        )
        .to_string();
        let reloaded = loader.load_from_str(&rendered).unwrap();
        assert_eq!(reloaded.config, original.config);
        assert!(rendered.contains("CATALOG_NAME     \"my run #2.cat\""));
        assert!(rendered.contains("FILTER           N"));
    }

    #[test]
    fn test_origin_annotation() {
        let loader = ConfigLoader::with_defaults();
        let result = loader.load_from_str("\nGAIN 2.5\n").unwrap();
        let options = RenderOptions {
            origins: true,
            ..RenderOptions::default()
        };
        let text = render(&result.config, loader.registry(), options).to_string();
        let gain = text.lines().find(|l| l.starts_with("GAIN ")).unwrap();
        assert!(gain.contains("# [line 2] detector gain"), "{gain}");
        let name = text.lines().find(|l| l.starts_with("CATALOG_NAME")).unwrap();
        assert!(name.contains("[default]"));
    }

    #[test]
    fn test_explicit_only() {
        let loader = ConfigLoader::with_defaults();
        let result = loader
            .load_from_str("MEMORY_BUFSIZE 2048\nCATALOG_TYPE ASCII\n")
            .unwrap();
        let options = RenderOptions {
            explicit_only: true,
            ..RenderOptions::default()
        };
        let text = render(&result.config, loader.registry(), options).to_string();
        let keys: Vec<&str> = text
            .lines()
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(keys, vec!["CATALOG_TYPE", "MEMORY_BUFSIZE"]);
        assert!(!text.contains(" Extraction "));
    }

    #[test]
    fn test_required_rendered_commented() {
        let registry = SchemaRegistry::new()
            .with(ParameterSpec::float("GAIN", 0.0).required().describe("gain"));
        let text = render_defaults(&registry, RenderOptions::default()).to_string();
        assert!(text.contains("#GAIN             (required)      # gain"), "{text}");
    }

    #[test]
    fn test_dollar_survives_round_trip() {
        let loader = ConfigLoader::with_defaults();
        let original = loader.load_from_str("CATALOG_NAME cost$$5.cat\n").unwrap();
        assert_eq!(original.config.text("CATALOG_NAME"), Some("cost$5.cat"));
        let rendered = render(
            &original.config,
            loader.registry(),
            RenderOptions::default(),
        )
        .to_string();
        assert!(rendered.contains("cost$$5.cat"));
        let reloaded = loader.load_from_str(&rendered).unwrap();
        assert_eq!(reloaded.config, original.config);
    }

    #[test]
    fn test_dollar_round_trip_without_env_expansion() {
        let loader = ConfigLoader::new(LoaderOptions {
            expand_env: false,
            ..LoaderOptions::default()
        });
        let original = loader.load_from_str("CATALOG_NAME cost$5.cat
").unwrap();
        let options = RenderOptions {
            literal_dollars: true,
            ..RenderOptions::default()
        };
        let rendered = render(&original.config, loader.registry(), options).to_string();
        assert!(rendered.contains("cost$5.cat "), "{rendered}");
        let reloaded = loader.load_from_str(&rendered).unwrap();
        assert_eq!(reloaded.config, original.config);
    }

    #[test]
    fn test_string_list_round_trip() {
        let loader = ConfigLoader::with_defaults();
        let original = loader
            .load_from_str("FLAG_IMAGE \"x#1.fits\", \"my flags.fits\",plain.fits\n")
            .unwrap();
        assert_eq!(
            original.config.str_list("FLAG_IMAGE"),
            Some(
                &[
                    "x#1.fits".to_string(),
                    "my flags.fits".to_string(),
                    "plain.fits".to_string(),
                ][..]
            )
        );
        let rendered = render(&original.config, loader.registry(), RenderOptions::default())
            .to_string();
        let reloaded = loader.load_from_str(&rendered).unwrap();
        assert_eq!(reloaded.config, original.config);
    }
}
