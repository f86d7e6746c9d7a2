//! Value conversion and validation
//!
//! [`Validator::convert`] turns one raw value into a typed [`Value`] against
//! its [`ParameterSpec`]: kind, token membership, element count and range.
//! [`Validator::check_consistency`] then looks at the assembled [`Config`]
//! for parameters that are valid on their own but contradict each other.

use crate::config::parser::unquote;
use crate::config::resolved::{Config, Origin};
use crate::config::schema::{ParameterSpec, Value, ValueKind, closest};
use crate::error::{ConfigError, Severity, ValidationIssue};

// ============================================================================
// Public API
// ============================================================================

/// Result of the collect-all diagnostics pass.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// Validation errors (prevent loading).
    pub errors: Vec<ValidationIssue>,

    /// Validation warnings (informational).
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Returns `true` if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns `true` if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn add_error(&mut self, err: &ConfigError) {
        self.errors.push(ValidationIssue::from_error(err));
    }

    pub(crate) fn add_warning(&mut self, path: &str, message: &str) {
        self.warnings.push(ValidationIssue {
            path: path.to_string(),
            message: message.to_string(),
            severity: Severity::Warning,
        });
    }
}

/// Converts raw values into typed values.
///
/// Stateless: one validator can be reused for every entry of every file.
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Converts `raw` into a value of `spec`'s kind.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if the text (or a list element) does not parse,
    /// `InvalidEnumValue` if a token is not allowed, `ValueCount` if a list has
    /// the wrong number of elements and `OutOfRange` if a number falls outside
    /// the parameter's range.
    pub fn convert(
        &self,
        spec: &ParameterSpec,
        raw: &str,
        at: Origin,
    ) -> Result<Value, ConfigError> {
        let raw = raw.trim();
        let elements = if spec.kind.is_list() {
            let elements = split_list(spec, raw, at)?;
            if !spec.count.accepts(elements.len()) {
                return Err(ConfigError::ValueCount {
                    key: spec.name.clone(),
                    count: elements.len(),
                    min: spec.count.min,
                    max: spec.count.max,
                    at,
                });
            }
            elements
        } else {
            Vec::new()
        };

        let value = Self::convert_kind(spec, raw, &elements, at)?;
        check_range(spec, &value, at)?;
        Ok(value)
    }

    /// Checks cross-parameter rules on an assembled configuration.
    ///
    /// Rules whose parameters are not all present are skipped, so custom
    /// registries without these names are unaffected.
    #[must_use]
    pub fn check_consistency(&self, config: &Config) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if let (Some(types), Some(names)) = (
            config.str_list("CHECKIMAGE_TYPE"),
            config.str_list("CHECKIMAGE_NAME"),
        ) {
            let disabled = types.len() == 1 && types[0] == "NONE";
            if !disabled && types.len() != names.len() {
                errors.push(ConfigError::Inconsistent {
                    keys: vec!["CHECKIMAGE_TYPE".into(), "CHECKIMAGE_NAME".into()],
                    message: format!(
                        "{} check-image type(s) but {} check-image name(s)",
                        types.len(),
                        names.len()
                    ),
                });
            }
        }

        if let (Some(min_area), Some(max_area)) =
            (config.int("DETECT_MINAREA"), config.int("DETECT_MAXAREA"))
        {
            if max_area != 0 && max_area < min_area {
                errors.push(ConfigError::Inconsistent {
                    keys: vec!["DETECT_MAXAREA".into(), "DETECT_MINAREA".into()],
                    message: format!(
                        "maximum area {max_area} is smaller than minimum area {min_area}"
                    ),
                });
            }
        }

        if let (Some(types), Some(images)) = (
            config.str_list("WEIGHT_TYPE"),
            config.str_list("WEIGHT_IMAGE"),
        ) {
            let uses_map = types.iter().any(|t| t.starts_with("MAP_"));
            if uses_map && images.len() < types.len() {
                errors.push(ConfigError::Inconsistent {
                    keys: vec!["WEIGHT_TYPE".into(), "WEIGHT_IMAGE".into()],
                    message: format!(
                        "{} weight type(s) need a weight image each, got {}",
                        types.len(),
                        images.len()
                    ),
                });
            }
        }

        errors
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Scalar kinds read `raw`; list kinds read the already split `elements`.
    fn convert_kind(
        spec: &ParameterSpec,
        raw: &str,
        elements: &[&str],
        at: Origin,
    ) -> Result<Value, ConfigError> {
        match spec.kind {
            ValueKind::Int => parse_int(spec, raw, at).map(Value::Int),
            ValueKind::Float => parse_float(spec, raw, at).map(Value::Float),
            ValueKind::Bool => match raw {
                "Y" => Ok(Value::Bool(true)),
                "N" => Ok(Value::Bool(false)),
                _ => Err(mismatch(spec, raw, ValueKind::Bool.describe(), at)),
            },
            ValueKind::String => Ok(Value::String(unquote(raw).to_string())),
            ValueKind::Token => check_token(spec, raw, at).map(Value::Token),
            ValueKind::IntList => elements
                .iter()
                .map(|e| parse_int(spec, e, at))
                .collect::<Result<_, _>>()
                .map(Value::IntList),
            ValueKind::FloatList => elements
                .iter()
                .map(|e| parse_float(spec, e, at))
                .collect::<Result<_, _>>()
                .map(Value::FloatList),
            ValueKind::StringList => Ok(Value::StringList(
                elements.iter().map(|e| unquote(e).to_string()).collect(),
            )),
            ValueKind::TokenList => elements
                .iter()
                .map(|e| check_token(spec, e, at))
                .collect::<Result<_, _>>()
                .map(Value::TokenList),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Splits a comma-separated value, rejecting empty elements.
fn split_list<'r>(
    spec: &ParameterSpec,
    raw: &'r str,
    at: Origin,
) -> Result<Vec<&'r str>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .map(|element| {
            if element.is_empty() {
                Err(mismatch(
                    spec,
                    raw,
                    &format!("{} without empty elements", spec.kind.describe()),
                    at,
                ))
            } else {
                Ok(element)
            }
        })
        .collect()
}

fn parse_int(spec: &ParameterSpec, raw: &str, at: Origin) -> Result<i64, ConfigError> {
    raw.parse::<i64>()
        .map_err(|_| mismatch(spec, raw, ValueKind::Int.describe(), at))
}

fn parse_float(spec: &ParameterSpec, raw: &str, at: Origin) -> Result<f64, ConfigError> {
    raw.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| mismatch(spec, raw, "a finite number", at))
}

fn check_token(spec: &ParameterSpec, raw: &str, at: Origin) -> Result<String, ConfigError> {
    if spec.allows_token(raw) {
        return Ok(raw.to_string());
    }
    let allowed = spec.allowed_tokens.clone().unwrap_or_default();
    let suggestion = closest(raw, allowed.iter().map(String::as_str));
    Err(ConfigError::InvalidEnumValue {
        key: spec.name.clone(),
        value: raw.to_string(),
        allowed,
        suggestion,
        at,
    })
}

fn check_range(spec: &ParameterSpec, value: &Value, at: Origin) -> Result<(), ConfigError> {
    let Some(range) = spec.range else {
        return Ok(());
    };
    match value.numeric_elements().into_iter().find(|v| !range.contains(*v)) {
        Some(bad) => Err(ConfigError::OutOfRange {
            key: spec.name.clone(),
            value: format_number(value, bad),
            min: range.min,
            max: range.max,
            at,
        }),
        None => Ok(()),
    }
}

/// Formats an offending element the way it was typed (integers without `.0`).
#[allow(clippy::cast_possible_truncation)]
fn format_number(value: &Value, bad: f64) -> String {
    match value {
        Value::Int(_) | Value::IntList(_) => (bad as i64).to_string(),
        _ => bad.to_string(),
    }
}

fn mismatch(spec: &ParameterSpec, raw: &str, expected: &str, at: Origin) -> ConfigError {
    ConfigError::TypeMismatch {
        key: spec.name.clone(),
        value: raw.to_string(),
        expected: expected.to_string(),
        at,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::SchemaRegistry;

    const AT: Origin = Origin::File { line: 1 };

    fn convert(name: &str, raw: &str) -> Result<Value, ConfigError> {
        let spec = SchemaRegistry::sextractor().get(name).unwrap();
        Validator::new().convert(spec, raw, AT)
    }

    #[test]
    fn test_token_accepted() {
        assert_eq!(
            convert("CATALOG_TYPE", "ASCII").unwrap(),
            Value::Token("ASCII".into())
        );
        assert_eq!(
            convert("CATALOG_TYPE", "FITS_1.0").unwrap(),
            Value::Token("FITS_1.0".into())
        );
    }

    #[test]
    fn test_token_rejected() {
        let err = convert("CATALOG_TYPE", "BOGUS").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnumValue { .. }));
    }

    #[test]
    fn test_token_is_case_sensitive() {
        match convert("CATALOG_TYPE", "ascii").unwrap_err() {
            ConfigError::InvalidEnumValue { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("ASCII"));
            }
            other => panic!("expected InvalidEnumValue, got {other:?}"),
        }
    }

    #[test]
    fn test_float_list_with_spaces() {
        assert_eq!(
            convert("PHOT_AUTOPARAMS", "2.5, 3.5").unwrap(),
            Value::FloatList(vec![2.5, 3.5])
        );
    }

    #[test]
    fn test_float_list_non_numeric_segment() {
        let err = convert("PHOT_APERTURES", "5,ten,20").unwrap_err();
        match err {
            ConfigError::TypeMismatch { value, .. } => assert_eq!(value, "ten"),
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_float_list_empty_segment() {
        assert!(matches!(
            convert("PHOT_APERTURES", "5,,20").unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
        assert!(matches!(
            convert("PHOT_APERTURES", "5,").unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_int_value() {
        assert_eq!(
            convert("MEMORY_PIXSTACK", "7000000").unwrap(),
            Value::Int(7_000_000)
        );
    }

    #[test]
    fn test_int_rejects_float_literal() {
        assert!(matches!(
            convert("MEMORY_PIXSTACK", "7e6").unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_float_accepts_integer_and_exponent() {
        assert_eq!(convert("GAIN", "2").unwrap(), Value::Float(2.0));
        assert_eq!(convert("SATUR_LEVEL", "5e4").unwrap(), Value::Float(50000.0));
    }

    #[test]
    fn test_float_rejects_non_finite() {
        for raw in ["inf", "NaN", "-infinity"] {
            assert!(
                matches!(
                    convert("SATUR_LEVEL", raw).unwrap_err(),
                    ConfigError::TypeMismatch { .. }
                ),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_bool_values() {
        assert_eq!(convert("FILTER", "Y").unwrap(), Value::Bool(true));
        assert_eq!(convert("FILTER", "N").unwrap(), Value::Bool(false));
        assert!(matches!(
            convert("FILTER", "yes").unwrap_err(),
            ConfigError::TypeMismatch { .. }
        ));
    }

    #[test]
    fn test_string_unquoted() {
        assert_eq!(
            convert("CATALOG_NAME", "\"my run.cat\"").unwrap(),
            Value::String("my run.cat".into())
        );
        assert_eq!(
            convert("CATALOG_NAME", "/home/user/cfis/out.cat").unwrap(),
            Value::String("/home/user/cfis/out.cat".into())
        );
        assert_eq!(
            convert("CATALOG_NAME", "\"\"").unwrap(),
            Value::String(String::new())
        );
    }

    #[test]
    fn test_string_list_elements_unquoted() {
        assert_eq!(
            convert("WEIGHT_IMAGE", "\"my weight.fits\"").unwrap(),
            Value::StringList(vec!["my weight.fits".into()])
        );
        assert_eq!(
            convert("FLAG_IMAGE", "a.fits, \"b c.fits\" ,\"\"").unwrap(),
            Value::StringList(vec!["a.fits".into(), "b c.fits".into(), String::new()])
        );
        assert_eq!(
            convert("FLAG_IMAGE", "\"half.fits").unwrap(),
            Value::StringList(vec!["\"half.fits".into()])
        );
    }

    #[test]
    fn test_range_violation() {
        match convert("DEBLEND_NTHRESH", "65").unwrap_err() {
            ConfigError::OutOfRange { value, min, max, .. } => {
                assert_eq!(value, "65");
                assert!((min - 1.0).abs() < f64::EPSILON);
                assert!((max - 64.0).abs() < f64::EPSILON);
            }
            other => panic!("expected OutOfRange, got {other:?}"),
        }
        assert!(matches!(
            convert("PHOT_FLUXFRAC", "0.5,1.5").unwrap_err(),
            ConfigError::OutOfRange { .. }
        ));
    }

    #[test]
    fn test_value_count() {
        assert!(matches!(
            convert("PHOT_AUTOPARAMS", "2.5").unwrap_err(),
            ConfigError::ValueCount { count: 1, min: 2, max: 2, .. }
        ));
        assert!(matches!(
            convert("BACK_SIZE", "64,64,64").unwrap_err(),
            ConfigError::ValueCount { count: 3, .. }
        ));
    }

    #[test]
    fn test_token_list() {
        assert_eq!(
            convert("CHECKIMAGE_TYPE", "BACKGROUND, -OBJECTS").unwrap(),
            Value::TokenList(vec!["BACKGROUND".into(), "-OBJECTS".into()])
        );
        assert!(matches!(
            convert("CHECKIMAGE_TYPE", "BACKGROUND,SEGMENT").unwrap_err(),
            ConfigError::InvalidEnumValue { .. }
        ));
    }

    #[test]
    fn test_int_list() {
        assert_eq!(
            convert("BACK_SIZE", "128,64").unwrap(),
            Value::IntList(vec![128, 64])
        );
    }

    fn load(text: &str) -> Config {
        crate::config::loader::ConfigLoader::with_defaults()
            .load_from_str(text)
            .map(|r| (*r.config).clone())
            .unwrap_or_else(|e| panic!("load failed: {e}"))
    }

    #[test]
    fn test_consistency_defaults_pass() {
        let config = load("");
        assert!(Validator::new().check_consistency(&config).is_empty());
    }

    #[test]
    fn test_consistency_checkimage_mismatch() {
        let result = crate::config::loader::ConfigLoader::with_defaults()
            .check_str("CHECKIMAGE_TYPE BACKGROUND,APERTURES\nCHECKIMAGE_NAME back.fits\n");
        assert!(result.has_errors());
        assert!(result.errors[0].message.contains("check-image"));
    }

    #[test]
    fn test_consistency_maxarea() {
        let result = crate::config::loader::ConfigLoader::with_defaults()
            .check_str("DETECT_MINAREA 10\nDETECT_MAXAREA 5\n");
        assert!(result.has_errors());
        assert_eq!(result.errors[0].path, "DETECT_MAXAREA");
    }

    #[test]
    fn test_consistency_weight_map_needs_image() {
        let result = crate::config::loader::ConfigLoader::with_defaults()
            .check_str("WEIGHT_TYPE MAP_RMS,MAP_WEIGHT\nWEIGHT_IMAGE rms.fits\n");
        assert!(result.has_errors());
    }
}
