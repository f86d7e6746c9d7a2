//! Configuration loader
//!
//! This module implements the loading pipeline:
//! 1. Size check and file read
//! 2. Line parsing
//! 3. Registry lookup and duplicate detection
//! 4. Environment variable expansion (per raw value)
//! 5. Typed conversion
//! 6. Command-line overrides
//! 7. Defaults and required parameters
//! 8. Cross-parameter consistency
//! 9. Freeze with `Arc`

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::config::parser::parse;
use crate::config::resolved::{Config, Origin, Setting};
use crate::config::schema::{DefaultValue, SchemaRegistry};
use crate::config::validation::{ValidationResult, Validator};
use crate::error::ConfigError;

// ============================================================================
// Public API
// ============================================================================

/// Options for the configuration loader.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Parameter registry to validate against.
    pub registry: Arc<SchemaRegistry>,

    /// `KEY=VALUE` overrides applied after the file, in order.
    pub overrides: Vec<(String, String)>,

    /// Expand `${VAR}` references in values.
    pub expand_env: bool,

    /// Limits for configuration size.
    pub config_limits: ConfigLimits,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            registry: SchemaRegistry::shared_sextractor(),
            overrides: Vec::new(),
            expand_env: true,
            config_limits: ConfigLimits::default(),
        }
    }
}

/// Limits for configuration size to prevent resource exhaustion.
#[derive(Debug, Clone)]
pub struct ConfigLimits {
    /// Maximum configuration file size in bytes.
    pub max_config_size: usize,
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            max_config_size: env_or("SEXCFG_MAX_CONFIG_SIZE", 1024 * 1024),
        }
    }
}

/// Result of loading a configuration file.
#[derive(Debug)]
pub struct LoadResult {
    /// The loaded and validated configuration.
    pub config: Arc<Config>,

    /// Warnings encountered during loading.
    pub warnings: Vec<LoadWarning>,
}

/// Warning during configuration loading.
#[derive(Debug, Clone)]
pub struct LoadWarning {
    /// Warning message.
    pub message: String,

    /// Location where the warning occurred.
    pub location: Option<String>,
}

/// Parses a `KEY=VALUE` override.
///
/// # Errors
///
/// Returns `InvalidOverride` if there is no `=` or the key is empty.
pub fn parse_override(input: &str) -> Result<(String, String), ConfigError> {
    match input.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(ConfigError::InvalidOverride {
            input: input.to_string(),
        }),
    }
}

/// Loads a configuration file against the built-in SExtractor registry.
///
/// # Errors
///
/// Returns the first error encountered; no partial configuration is returned.
pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let result = ConfigLoader::with_defaults().load(path.as_ref())?;
    Ok(Arc::unwrap_or_clone(result.config))
}

/// Configuration loader.
///
/// Handles the full pipeline from file text to frozen `Config`.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: LoaderOptions,
    validator: Validator,
}

impl ConfigLoader {
    /// Creates a new configuration loader with the given options.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            options,
            validator: Validator::new(),
        }
    }

    /// Creates a new configuration loader with default options.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(LoaderOptions::default())
    }

    /// Returns the registry this loader validates against.
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.options.registry
    }

    /// Loads a configuration file and returns the frozen configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file is missing, unreadable or over the size limit
    /// - A line is malformed
    /// - A key is unknown or repeated
    /// - A value does not convert, is out of range or not an allowed token
    /// - A required parameter is missing or parameters are inconsistent
    pub fn load(&self, path: &Path) -> Result<LoadResult, ConfigError> {
        let text = self.read(path)?;
        let result = self.load_from_str(&text)?;
        tracing::info!(
            file = %path.display(),
            explicit = result.config.explicit().count(),
            "configuration loaded"
        );
        Ok(result)
    }

    /// Loads a configuration from text.
    ///
    /// # Errors
    ///
    /// Same as [`ConfigLoader::load`], minus the file errors.
    pub fn load_from_str(&self, text: &str) -> Result<LoadResult, ConfigError> {
        let mut assembly = Assembly::new(self, true);
        assembly.run(text);
        if let Some(err) = assembly.errors.into_iter().next() {
            return Err(err);
        }
        Ok(LoadResult {
            config: Arc::new(Config::from_settings(assembly.settings)),
            warnings: assembly.warnings,
        })
    }

    /// Runs every stage on a file and reports all problems instead of
    /// stopping at the first.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file itself cannot be read.
    pub fn check(&self, path: &Path) -> Result<ValidationResult, ConfigError> {
        let text = self.read(path)?;
        Ok(self.check_str(&text))
    }

    /// Runs every stage on text and reports all problems.
    #[must_use]
    pub fn check_str(&self, text: &str) -> ValidationResult {
        let mut assembly = Assembly::new(self, false);
        assembly.run(text);

        let mut result = ValidationResult::default();
        for err in &assembly.errors {
            result.add_error(err);
        }
        for warning in &assembly.warnings {
            result.add_warning(
                warning.location.as_deref().unwrap_or(""),
                &warning.message,
            );
        }
        result
    }

    fn read(&self, path: &Path) -> Result<String, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::MissingFile {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Unreadable {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        let limit = self.options.config_limits.max_config_size;
        if usize::try_from(metadata.len()).map_or(true, |size| size > limit) {
            return Err(ConfigError::FileTooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                limit,
            });
        }

        std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Assembly
// ============================================================================

/// State of one load: settings so far, errors and warnings.
///
/// In fail-fast mode the first error stops every further stage.
struct Assembly<'l> {
    loader: &'l ConfigLoader,
    fail_fast: bool,
    file_values: HashMap<String, (usize, String)>,
    settings: IndexMap<String, Setting>,
    /// Keys whose latest value failed to expand or convert.
    rejected: HashSet<String>,
    errors: Vec<ConfigError>,
    warnings: Vec<LoadWarning>,
}

impl<'l> Assembly<'l> {
    fn new(loader: &'l ConfigLoader, fail_fast: bool) -> Self {
        Self {
            loader,
            fail_fast,
            file_values: HashMap::new(),
            settings: IndexMap::new(),
            rejected: HashSet::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn stopped(&self) -> bool {
        self.fail_fast && !self.errors.is_empty()
    }

    fn fail(&mut self, err: ConfigError) {
        tracing::debug!(error = %err, "configuration error");
        self.errors.push(err);
    }

    fn run(&mut self, text: &str) {
        self.apply_file(text);
        self.apply_overrides();
        self.apply_defaults();
        self.check_consistency();
    }

    fn apply_file(&mut self, text: &str) {
        let loader = self.loader;
        let registry = &loader.options.registry;

        for item in parse(text) {
            if self.stopped() {
                return;
            }
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    self.fail(err);
                    continue;
                }
            };
            let at = Origin::File { line: entry.line };

            if !registry.contains(entry.key) {
                self.fail(ConfigError::UnknownParameter {
                    key: entry.key.to_string(),
                    at,
                    suggestion: registry.suggest(entry.key),
                });
                continue;
            }

            if let Some((first_line, _)) = self.file_values.get(entry.key) {
                let first_line = *first_line;
                self.fail(ConfigError::DuplicateParameter {
                    key: entry.key.to_string(),
                    first_line,
                    line: entry.line,
                });
                continue;
            }
            self.file_values.insert(
                entry.key.to_string(),
                (entry.line, entry.raw_value.to_string()),
            );

            tracing::trace!(key = entry.key, value = entry.raw_value, line = entry.line, "entry");
            self.set(entry.key, entry.raw_value, at);
        }
    }

    fn apply_overrides(&mut self) {
        let loader = self.loader;
        for (key, raw) in &loader.options.overrides {
            if self.stopped() {
                return;
            }
            if !loader.options.registry.contains(key) {
                self.fail(ConfigError::UnknownParameter {
                    key: key.clone(),
                    at: Origin::Override,
                    suggestion: loader.options.registry.suggest(key),
                });
                continue;
            }
            if let Some((line, _)) = self.file_values.get(key.as_str()) {
                tracing::debug!(key = %key, line, "override replaces file value");
            }
            self.set(key, raw, Origin::Override);
        }
    }

    fn apply_defaults(&mut self) {
        if self.stopped() {
            return;
        }
        let loader = self.loader;
        let registry = &loader.options.registry;
        let mut ordered = IndexMap::with_capacity(registry.len());

        for spec in registry.iter() {
            if let Some(setting) = self.settings.swap_remove(&spec.name) {
                ordered.insert(spec.name.clone(), setting);
                continue;
            }
            match &spec.default {
                DefaultValue::Value(value) => {
                    ordered.insert(
                        spec.name.clone(),
                        Setting {
                            value: value.clone(),
                            origin: Origin::Default,
                        },
                    );
                }
                DefaultValue::Required => {
                    self.errors.push(ConfigError::MissingRequired {
                        key: spec.name.clone(),
                    });
                    if self.fail_fast {
                        return;
                    }
                }
            }
        }

        self.settings = ordered;
    }

    fn check_consistency(&mut self) {
        if self.stopped() {
            return;
        }
        let config = Config::from_settings(self.settings.clone());
        let errors: Vec<ConfigError> = self
            .loader
            .validator
            .check_consistency(&config)
            .into_iter()
            .filter(|err| match err {
                // The value checked would not be the one the user wrote.
                ConfigError::Inconsistent { keys, .. } => {
                    !keys.iter().any(|key| self.rejected.contains(key))
                }
                _ => true,
            })
            .collect();
        for err in errors {
            self.fail(err);
        }
    }

    /// Expands and converts one raw value, recording it on success.
    fn set(&mut self, key: &str, raw: &str, at: Origin) {
        let loader = self.loader;
        let Some(spec) = loader.options.registry.get(key) else {
            return;
        };

        let expanded = if loader.options.expand_env {
            let mut env = EnvSubstitution::new();
            match env.substitute(raw, key, at) {
                Ok(expanded) => {
                    self.warnings.extend(env.warnings);
                    expanded
                }
                Err(err) => {
                    self.rejected.insert(key.to_string());
                    self.fail(err);
                    return;
                }
            }
        } else {
            raw.to_string()
        };

        match loader.validator.convert(spec, &expanded, at) {
            Ok(value) => {
                self.rejected.remove(key);
                self.settings
                    .insert(key.to_string(), Setting { value, origin: at });
            }
            Err(err) => {
                self.rejected.insert(key.to_string());
                self.fail(err);
            }
        }
    }
}

// ============================================================================
// Environment Variable Substitution
// ============================================================================

/// Environment variable expansion on a single raw value.
struct EnvSubstitution {
    warnings: Vec<LoadWarning>,
}

impl EnvSubstitution {
    const fn new() -> Self {
        Self {
            warnings: Vec::new(),
        }
    }

    /// Substitutes environment variables in a raw value.
    ///
    /// Supports:
    /// - `${VAR}` - expand to value (empty string if unset with warning)
    /// - `${VAR:-default}` - expand to default if unset
    /// - `${VAR:?message}` - fail if unset
    /// - `$$` - literal `$`
    fn substitute(&mut self, raw: &str, key: &str, at: Origin) -> Result<String, ConfigError> {
        let mut result = String::with_capacity(raw.len());
        let mut chars = raw.chars().peekable();
        let unclosed = || ConfigError::UnclosedEnvVar {
            key: key.to_string(),
            at,
        };

        while let Some(c) = chars.next() {
            if c != '$' {
                result.push(c);
                continue;
            }
            match chars.peek() {
                Some('$') => {
                    chars.next();
                    result.push('$');
                }
                Some('{') => {
                    chars.next();
                    let (var_name, default, error_msg) =
                        Self::parse_var_spec(&mut chars).ok_or_else(unclosed)?;

                    match std::env::var(&var_name) {
                        Ok(value) => result.push_str(&value),
                        Err(_) => {
                            if let Some(default_val) = default {
                                result.push_str(&default_val);
                            } else if let Some(msg) = error_msg {
                                return Err(ConfigError::EnvVarNotSet {
                                    var: var_name,
                                    location: format!("{key}, {at}: {msg}"),
                                });
                            } else {
                                self.warnings.push(LoadWarning {
                                    message: format!(
                                        "Environment variable '{var_name}' is not set, using empty string"
                                    ),
                                    location: Some(format!("{key} ({at})")),
                                });
                            }
                        }
                    }
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Parses a variable specification after `${`.
    ///
    /// Returns (`var_name`, `default_value`, `error_message`), or `None` if
    /// the closing brace is missing.
    fn parse_var_spec(
        chars: &mut std::iter::Peekable<std::str::Chars>,
    ) -> Option<(String, Option<String>, Option<String>)> {
        let mut var_name = String::new();

        while let Some(c) = chars.next() {
            match c {
                '}' => return Some((var_name, None, None)),
                ':' => match chars.peek() {
                    Some('-') => {
                        chars.next();
                        let default = Self::read_until_close(chars)?;
                        return Some((var_name, Some(default), None));
                    }
                    Some('?') => {
                        chars.next();
                        let msg = Self::read_until_close(chars)?;
                        return Some((var_name, None, Some(msg)));
                    }
                    _ => var_name.push(':'),
                },
                _ => var_name.push(c),
            }
        }

        None
    }

    /// Reads content until closing `}`, handling nested braces.
    fn read_until_close(chars: &mut std::iter::Peekable<std::str::Chars>) -> Option<String> {
        let mut value = String::new();
        let mut depth = 1;

        for c in chars.by_ref() {
            match c {
                '{' => {
                    depth += 1;
                    value.push(c);
                }
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(value);
                    }
                    value.push(c);
                }
                _ => value.push(c),
            }
        }

        None
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Reads an environment variable with a typed fallback.
fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// Tests
// ============================================================================
