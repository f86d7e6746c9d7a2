//! The validated configuration handed to callers.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

use crate::config::schema::Value;

/// Where a parameter's value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Origin {
    /// Filled from the registry default
    Default,
    /// Set in the configuration file
    File {
        /// 1-based line number
        line: usize,
    },
    /// Set by a command-line override
    Override,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("default"),
            Self::File { line } => write!(f, "line {line}"),
            Self::Override => f.write_str("command line"),
        }
    }
}

/// A resolved parameter: its typed value and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Setting {
    /// Typed value
    pub value: Value,
    /// Provenance
    pub origin: Origin,
}

/// Validated, typed configuration.
///
/// Holds one value per registry parameter, in registry order. There is no
/// mutation API: a `Config` is assembled once by the loader and shared
/// read-only afterwards.
///
/// Equality compares values only, so a configuration and its re-rendered,
/// reloaded copy are equal even though every origin changed.
#[derive(Debug, Clone, Default)]
pub struct Config {
    settings: IndexMap<String, Setting>,
}

impl Config {
    pub(crate) const fn from_settings(settings: IndexMap<String, Setting>) -> Self {
        Self { settings }
    }

    /// Returns the value of a parameter.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.settings.get(name).map(|s| &s.value)
    }

    /// Returns the value and origin of a parameter.
    #[must_use]
    pub fn setting(&self, name: &str) -> Option<&Setting> {
        self.settings.get(name)
    }

    /// Returns where a parameter's value came from.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<Origin> {
        self.settings.get(name).map(|s| s.origin)
    }

    /// Integer value of an `Int` parameter.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Float value of a `Float` parameter.
    #[must_use]
    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    /// Flag value of a `Bool` parameter.
    #[must_use]
    pub fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Text of a `String` or `Token` parameter.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Elements of a `FloatList` parameter.
    #[must_use]
    pub fn float_list(&self, name: &str) -> Option<&[f64]> {
        self.get(name).and_then(Value::as_float_list)
    }

    /// Elements of an `IntList` parameter.
    #[must_use]
    pub fn int_list(&self, name: &str) -> Option<&[i64]> {
        self.get(name).and_then(Value::as_int_list)
    }

    /// Elements of a `StringList` or `TokenList` parameter.
    #[must_use]
    pub fn str_list(&self, name: &str) -> Option<&[String]> {
        self.get(name).and_then(Value::as_str_list)
    }

    /// Iterates `(name, setting)` pairs in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Setting)> {
        self.settings.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Returns `true` if the configuration holds no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Names of the parameters that were set explicitly (file or override).
    pub fn explicit(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, s)| s.origin != Origin::Default)
            .map(|(k, _)| k)
    }
}

impl PartialEq for Config {
    fn eq(&self, other: &Self) -> bool {
        self.settings.len() == other.settings.len()
            && self
                .settings
                .iter()
                .all(|(k, s)| other.get(k) == Some(&s.value))
    }
}

/// Serializes as a flat `{ "NAME": value }` map.
impl Serialize for Config {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.settings.len()))?;
        for (name, setting) in &self.settings {
            map.serialize_entry(name, &setting.value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(entries: &[(&str, Value, Origin)]) -> Config {
        Config::from_settings(
            entries
                .iter()
                .map(|(k, v, o)| {
                    (
                        (*k).to_string(),
                        Setting {
                            value: v.clone(),
                            origin: *o,
                        },
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_typed_accessors() {
        let cfg = config(&[
            ("MEMORY_PIXSTACK", Value::Int(7_000_000), Origin::File { line: 3 }),
            ("GAIN", Value::Float(0.0), Origin::Default),
            (
                "PHOT_AUTOPARAMS",
                Value::FloatList(vec![2.5, 3.5]),
                Origin::File { line: 9 },
            ),
            ("CATALOG_TYPE", Value::Token("ASCII".into()), Origin::Override),
        ]);

        assert_eq!(cfg.int("MEMORY_PIXSTACK"), Some(7_000_000));
        assert_eq!(cfg.float("GAIN"), Some(0.0));
        assert_eq!(cfg.float_list("PHOT_AUTOPARAMS"), Some(&[2.5, 3.5][..]));
        assert_eq!(cfg.text("CATALOG_TYPE"), Some("ASCII"));
        assert_eq!(cfg.int("GAIN"), None);
        assert_eq!(cfg.origin("CATALOG_TYPE"), Some(Origin::Override));
    }

    #[test]
    fn test_equality_ignores_origin() {
        let a = config(&[("GAIN", Value::Float(1.5), Origin::Default)]);
        let b = config(&[("GAIN", Value::Float(1.5), Origin::File { line: 40 })]);
        let c = config(&[("GAIN", Value::Float(2.0), Origin::Default)]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_explicit_skips_defaults() {
        let cfg = config(&[
            ("GAIN", Value::Float(0.0), Origin::Default),
            ("CATALOG_NAME", Value::String("x.cat".into()), Origin::File { line: 1 }),
        ]);
        assert_eq!(cfg.explicit().collect::<Vec<_>>(), vec!["CATALOG_NAME"]);
    }

    #[test]
    fn test_serialize_flat_map() {
        let cfg = config(&[
            ("CATALOG_TYPE", Value::Token("FITS_LDAC".into()), Origin::Default),
            ("BACK_SIZE", Value::IntList(vec![64, 32]), Origin::Default),
        ]);
        let json = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"CATALOG_TYPE": "FITS_LDAC", "BACK_SIZE": [64, 32]})
        );
    }

    #[test]
    fn test_origin_display() {
        assert_eq!(Origin::File { line: 12 }.to_string(), "line 12");
        assert_eq!(Origin::Override.to_string(), "command line");
        assert_eq!(Origin::Default.to_string(), "default");
    }
}
