//! Parameter schema types
//!
//! A [`SchemaRegistry`] lists every parameter a configuration file may set,
//! what shape its value has, which tokens it accepts, its numeric range and
//! its default. [`SchemaRegistry::sextractor`] is the built-in registry for
//! the SExtractor 2.x vocabulary.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::config::parser::{reads_back_verbatim, unquote};

// ============================================================================
// Value Kinds and Values
// ============================================================================

/// Shape of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Signed integer
    Int,
    /// Finite floating-point number
    Float,
    /// `Y` or `N`
    Bool,
    /// Free text, optionally double-quoted
    String,
    /// One of a fixed set of tokens
    Token,
    /// Comma-separated integers
    IntList,
    /// Comma-separated floats
    FloatList,
    /// Comma-separated strings
    StringList,
    /// Comma-separated tokens
    TokenList,
}

impl ValueKind {
    /// Returns `true` for the comma-separated kinds.
    #[must_use]
    pub const fn is_list(self) -> bool {
        matches!(
            self,
            Self::IntList | Self::FloatList | Self::StringList | Self::TokenList
        )
    }

    /// Returns the scalar kind of one list element (or `self` for scalars).
    #[must_use]
    pub const fn element(self) -> Self {
        match self {
            Self::IntList => Self::Int,
            Self::FloatList => Self::Float,
            Self::StringList => Self::String,
            Self::TokenList => Self::Token,
            other => other,
        }
    }

    /// Human-readable description used in error messages.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Int => "an integer",
            Self::Float => "a number",
            Self::Bool => "Y or N",
            Self::String => "a string",
            Self::Token => "a token",
            Self::IntList => "comma-separated integers",
            Self::FloatList => "comma-separated numbers",
            Self::StringList => "comma-separated strings",
            Self::TokenList => "comma-separated tokens",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
            Self::Token => "token",
            Self::IntList => "int list",
            Self::FloatList => "float list",
            Self::StringList => "string list",
            Self::TokenList => "token list",
        };
        f.write_str(name)
    }
}

/// A typed parameter value.
///
/// `Display` writes the value in configuration-file syntax; floats use the
/// shortest representation that parses back to the same `f64`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// `Y`/`N` flag
    Bool(bool),
    /// Free text
    String(String),
    /// Enumerated token
    Token(String),
    /// Integer tuple
    IntList(Vec<i64>),
    /// Float tuple
    FloatList(Vec<f64>),
    /// String tuple
    StringList(Vec<String>),
    /// Token tuple
    TokenList(Vec<String>),
}

impl Value {
    /// Returns the kind this value belongs to.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::Bool(_) => ValueKind::Bool,
            Self::String(_) => ValueKind::String,
            Self::Token(_) => ValueKind::Token,
            Self::IntList(_) => ValueKind::IntList,
            Self::FloatList(_) => ValueKind::FloatList,
            Self::StringList(_) => ValueKind::StringList,
            Self::TokenList(_) => ValueKind::TokenList,
        }
    }

    /// Number of elements (1 for scalars).
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::IntList(v) => v.len(),
            Self::FloatList(v) => v.len(),
            Self::StringList(v) | Self::TokenList(v) => v.len(),
            _ => 1,
        }
    }

    /// Returns `true` for an empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the integer, if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the float, if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the flag, if this is a `Bool`.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the text of a `String` or `Token`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Token(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the elements of an `IntList`.
    #[must_use]
    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            Self::IntList(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a `FloatList`.
    #[must_use]
    pub fn as_float_list(&self) -> Option<&[f64]> {
        match self {
            Self::FloatList(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a `StringList` or `TokenList`.
    #[must_use]
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StringList(v) | Self::TokenList(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric elements as `f64`, used for range checks.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn numeric_elements(&self) -> Vec<f64> {
        match self {
            Self::Int(v) => vec![*v as f64],
            Self::Float(v) => vec![*v],
            Self::IntList(v) => v.iter().map(|&i| i as f64).collect(),
            Self::FloatList(v) => v.clone(),
            _ => Vec::new(),
        }
    }

    /// Writes the value in file syntax.
    ///
    /// With `literal_dollars` unset, every `$` is doubled so that a loader
    /// with environment expansion on reads it back as `$`.
    #[must_use]
    pub fn to_file_syntax(&self, literal_dollars: bool) -> String {
        let text = match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => format!("{v:?}"),
            Self::Bool(v) => if *v { "Y" } else { "N" }.to_string(),
            Self::String(s) => quote_string(s),
            Self::Token(s) => s.clone(),
            Self::IntList(v) => join(v.iter().map(ToString::to_string)),
            Self::FloatList(v) => join(v.iter().map(|x| format!("{x:?}"))),
            Self::StringList(v) => quote_list(v),
            Self::TokenList(v) => v.join(","),
        };
        if literal_dollars {
            text
        } else {
            text.replace('$', "$$")
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_file_syntax(false))
    }
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(",")
}

fn quoted(s: &str) -> String {
    format!("\"{s}\"")
}

/// Text that would trip up a reader without quotes.
fn needs_quotes(s: &str) -> bool {
    s.is_empty() || s.contains(['#', '"']) || s.contains(char::is_whitespace)
}

fn reads_as(text: &str, s: &str) -> bool {
    reads_back_verbatim(text) && unquote(text) == s
}

/// Writes a string value so that the parser reads back exactly `s`.
///
/// Quotes are added for readability where they are harmless. A string that
/// opens with `"` and holds a `#` may only survive unquoted.
fn quote_string(s: &str) -> String {
    let bare = reads_as(s, s);
    if bare && !needs_quotes(s) {
        return s.to_string();
    }
    let with_quotes = quoted(s);
    if reads_as(&with_quotes, s) || !bare {
        with_quotes
    } else {
        s.to_string()
    }
}

fn reads_as_list(text: &str, elements: &[String]) -> bool {
    if !reads_back_verbatim(text) {
        return false;
    }
    let pieces: Vec<&str> = text.split(',').map(str::trim).collect();
    pieces.len() == elements.len()
        && pieces
            .iter()
            .zip(elements)
            .all(|(piece, element)| !piece.is_empty() && unquote(piece) == element)
}

/// Writes string list elements so that splitting and unquoting gives them back.
///
/// Elements are quoted where needed. If that moves a `#` out of the leading
/// quoted stretch, every element that can stand bare is written bare instead.
fn quote_list(elements: &[String]) -> String {
    let readable = join(elements.iter().map(|e| {
        if needs_quotes(e) { quoted(e) } else { e.clone() }
    }));
    if reads_as_list(&readable, elements) {
        return readable;
    }
    let minimal = join(elements.iter().map(|e| {
        if !e.is_empty() && e.trim() == e && unquote(e) == e {
            e.clone()
        } else {
            quoted(e)
        }
    }));
    if reads_as_list(&minimal, elements) {
        minimal
    } else {
        readable
    }
}

// ============================================================================
// Parameter Specs
// ============================================================================

/// Inclusive numeric bounds applied to every element of a numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueRange {
    /// Lower bound
    pub min: f64,
    /// Upper bound
    pub max: f64,
}

impl ValueRange {
    /// Returns `true` if `v` lies within the bounds.
    #[must_use]
    pub fn contains(&self, v: f64) -> bool {
        (self.min..=self.max).contains(&v)
    }
}

/// Bounds on the number of elements of a list value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementCount {
    /// Minimum number of elements
    pub min: usize,
    /// Maximum number of elements
    pub max: usize,
}

impl ElementCount {
    /// Exactly one element.
    pub const SCALAR: Self = Self { min: 1, max: 1 };

    /// Returns `true` if `n` elements are acceptable.
    #[must_use]
    pub const fn accepts(&self, n: usize) -> bool {
        n >= self.min && n <= self.max
    }
}

/// Default of a parameter absent from the file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// Use this value
    Value(Value),
    /// The parameter must be set
    Required,
}

/// Section a parameter is listed under when rendering a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Catalog output
    Catalog,
    /// Detection and extraction
    Extraction,
    /// Weighting
    Weighting,
    /// Flagging
    Flagging,
    /// Photometry
    Photometry,
    /// Star/galaxy separation
    StarGalaxy,
    /// Background estimation
    Background,
    /// Check images
    CheckImage,
    /// Memory limits
    Memory,
    /// Miscellaneous
    Miscellaneous,
}

impl Section {
    /// All sections in rendering order.
    pub const ALL: [Self; 10] = [
        Self::Catalog,
        Self::Extraction,
        Self::Weighting,
        Self::Flagging,
        Self::Photometry,
        Self::StarGalaxy,
        Self::Background,
        Self::CheckImage,
        Self::Memory,
        Self::Miscellaneous,
    ];

    /// Section title as printed in rendered files.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Catalog => "Catalog",
            Self::Extraction => "Extraction",
            Self::Weighting => "Weighting",
            Self::Flagging => "Flagging",
            Self::Photometry => "Photometry",
            Self::StarGalaxy => "Star/Galaxy Separation",
            Self::Background => "Background",
            Self::CheckImage => "Check Image",
            Self::Memory => "Memory (change with caution!)",
            Self::Miscellaneous => "Miscellaneous",
        }
    }

    /// Looks a section up by a loose name (`"star-galaxy"`, `"checkimage"`, ...).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let wanted: String = name
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| {
            let candidate: String = format!("{s:?}").to_ascii_lowercase();
            candidate == wanted
        })
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Schema entry for one parameter.
///
/// Built with the kind-specific constructors and refined with the builder
/// methods:
///
/// ```
/// use sexcfg::config::schema::{ParameterSpec, Section};
///
/// let spec = ParameterSpec::int("DEBLEND_NTHRESH", 32)
///     .range(1.0, 64.0)
///     .section(Section::Extraction)
///     .describe("Number of deblending sub-thresholds");
/// assert_eq!(spec.name, "DEBLEND_NTHRESH");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSpec {
    /// Parameter name as written in the file
    pub name: String,
    /// Value shape
    pub kind: ValueKind,
    /// Accepted tokens for `Token`/`TokenList` kinds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_tokens: Option<Vec<String>>,
    /// Value used when the parameter is absent
    pub default: DefaultValue,
    /// Inclusive numeric bounds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<ValueRange>,
    /// Element count bounds
    pub count: ElementCount,
    /// Rendering section
    pub section: Section,
    /// One-line description, rendered as a trailing comment
    pub description: String,
}

impl ParameterSpec {
    fn new(name: &str, kind: ValueKind, default: Value) -> Self {
        let count = if kind.is_list() {
            ElementCount {
                min: 1,
                max: default.len().max(1),
            }
        } else {
            ElementCount::SCALAR
        };
        Self {
            name: name.to_string(),
            kind,
            allowed_tokens: None,
            default: DefaultValue::Value(default),
            range: None,
            count,
            section: Section::Miscellaneous,
            description: String::new(),
        }
    }

    /// Integer parameter.
    #[must_use]
    pub fn int(name: &str, default: i64) -> Self {
        Self::new(name, ValueKind::Int, Value::Int(default))
    }

    /// Float parameter.
    #[must_use]
    pub fn float(name: &str, default: f64) -> Self {
        Self::new(name, ValueKind::Float, Value::Float(default))
    }

    /// `Y`/`N` parameter.
    #[must_use]
    pub fn bool(name: &str, default: bool) -> Self {
        Self::new(name, ValueKind::Bool, Value::Bool(default))
    }

    /// String parameter.
    #[must_use]
    pub fn string(name: &str, default: &str) -> Self {
        Self::new(name, ValueKind::String, Value::String(default.to_string()))
    }

    /// Token parameter accepting one of `allowed`.
    #[must_use]
    pub fn token(name: &str, allowed: &[&str], default: &str) -> Self {
        Self::new(name, ValueKind::Token, Value::Token(default.to_string())).tokens(allowed)
    }

    /// Integer list parameter.
    #[must_use]
    pub fn int_list(name: &str, default: &[i64]) -> Self {
        Self::new(name, ValueKind::IntList, Value::IntList(default.to_vec()))
    }

    /// Float list parameter.
    #[must_use]
    pub fn float_list(name: &str, default: &[f64]) -> Self {
        Self::new(name, ValueKind::FloatList, Value::FloatList(default.to_vec()))
    }

    /// String list parameter.
    #[must_use]
    pub fn string_list(name: &str, default: &[&str]) -> Self {
        Self::new(
            name,
            ValueKind::StringList,
            Value::StringList(default.iter().map(ToString::to_string).collect()),
        )
    }

    /// Token list parameter, each element one of `allowed`.
    #[must_use]
    pub fn token_list(name: &str, allowed: &[&str], default: &[&str]) -> Self {
        Self::new(
            name,
            ValueKind::TokenList,
            Value::TokenList(default.iter().map(ToString::to_string).collect()),
        )
        .tokens(allowed)
    }

    fn tokens(mut self, allowed: &[&str]) -> Self {
        self.allowed_tokens = Some(allowed.iter().map(ToString::to_string).collect());
        self
    }

    /// Sets inclusive numeric bounds.
    #[must_use]
    pub const fn range(mut self, min: f64, max: f64) -> Self {
        self.range = Some(ValueRange { min, max });
        self
    }

    /// Sets list element count bounds.
    #[must_use]
    pub const fn count(mut self, min: usize, max: usize) -> Self {
        self.count = ElementCount { min, max };
        self
    }

    /// Marks the parameter as required (no default).
    #[must_use]
    pub fn required(mut self) -> Self {
        self.default = DefaultValue::Required;
        self
    }

    /// Sets the rendering section.
    #[must_use]
    pub const fn section(mut self, section: Section) -> Self {
        self.section = section;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Returns the default value, if the parameter has one.
    #[must_use]
    pub const fn default_value(&self) -> Option<&Value> {
        match &self.default {
            DefaultValue::Value(v) => Some(v),
            DefaultValue::Required => None,
        }
    }

    /// Returns `true` if `token` is accepted by this parameter.
    #[must_use]
    pub fn allows_token(&self, token: &str) -> bool {
        self.allowed_tokens
            .as_ref()
            .is_some_and(|tokens| tokens.iter().any(|t| t == token))
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Ordered set of parameter specs keyed by name.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    specs: IndexMap<String, ParameterSpec>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a spec, replacing any previous spec of the same name.
    #[must_use]
    pub fn with(mut self, spec: ParameterSpec) -> Self {
        self.insert(spec);
        self
    }

    /// Adds a spec, returning the one it replaced.
    pub fn insert(&mut self, spec: ParameterSpec) -> Option<ParameterSpec> {
        self.specs.insert(spec.name.clone(), spec)
    }

    /// Looks a parameter up by exact, case-sensitive name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterSpec> {
        self.specs.get(name)
    }

    /// Returns `true` if the parameter is known.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.specs.contains_key(name)
    }

    /// Iterates specs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.specs.values()
    }

    /// Iterates parameter names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.specs.keys().map(String::as_str)
    }

    /// Position of a parameter in registration order.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.specs.get_index_of(name)
    }

    /// Number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Returns `true` if the registry has no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Suggests a known parameter name for a misspelt key.
    ///
    /// Returns the closest match if its Damerau-Levenshtein distance is ≤ 3.
    #[must_use]
    pub fn suggest(&self, input: &str) -> Option<String> {
        closest(input, self.names())
    }

    /// The built-in SExtractor registry.
    #[must_use]
    pub fn sextractor() -> &'static Self {
        &SEXTRACTOR
    }

    /// A shared handle to the built-in registry.
    #[must_use]
    pub fn shared_sextractor() -> Arc<Self> {
        Arc::clone(&SEXTRACTOR)
    }
}

impl<'a> IntoIterator for &'a SchemaRegistry {
    type Item = &'a ParameterSpec;
    type IntoIter = indexmap::map::Values<'a, String, ParameterSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.values()
    }
}

/// Closest candidate within Damerau-Levenshtein distance 3.
pub(crate) fn closest<'a>(input: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    candidates
        .map(|c| (c, strsim::damerau_levenshtein(input, c)))
        .filter(|(_, dist)| *dist <= 3)
        .min_by_key(|(_, dist)| *dist)
        .map(|(name, _)| name.to_string())
}

// ============================================================================
// Built-in SExtractor Vocabulary
// ============================================================================

const INT_MAX: f64 = 2_147_483_647.0;

const CHECKIMAGE_TYPES: &[&str] = &[
    "NONE",
    "BACKGROUND",
    "BACKGROUND_RMS",
    "MINIBACKGROUND",
    "MINIBACK_RMS",
    "-BACKGROUND",
    "FILTERED",
    "OBJECTS",
    "-OBJECTS",
    "SEGMENTATION",
    "APERTURES",
];

static SEXTRACTOR: LazyLock<Arc<SchemaRegistry>> = LazyLock::new(|| {
    use Section::{
        Background, Catalog, CheckImage, Extraction, Flagging, Memory, Miscellaneous, Photometry,
        StarGalaxy, Weighting,
    };

    let specs = [
        // Catalog
        ParameterSpec::string("CATALOG_NAME", "test.cat")
            .section(Catalog)
            .describe("name of the output catalog"),
        ParameterSpec::token(
            "CATALOG_TYPE",
            &[
                "NONE",
                "ASCII",
                "ASCII_HEAD",
                "ASCII_SKYCAT",
                "ASCII_VOTABLE",
                "FITS_1.0",
                "FITS_LDAC",
            ],
            "ASCII_HEAD",
        )
        .section(Catalog)
        .describe("NONE,ASCII,ASCII_HEAD,ASCII_SKYCAT,ASCII_VOTABLE,FITS_1.0 or FITS_LDAC"),
        ParameterSpec::string("PARAMETERS_NAME", "default.param")
            .section(Catalog)
            .describe("name of the file containing catalog contents"),
        // Extraction
        ParameterSpec::token("DETECT_TYPE", &["CCD", "PHOTO"], "CCD")
            .section(Extraction)
            .describe("CCD (linear) or PHOTO (with gamma correction)"),
        ParameterSpec::int("DETECT_MINAREA", 5)
            .range(1.0, INT_MAX)
            .section(Extraction)
            .describe("min. # of pixels above threshold"),
        ParameterSpec::int("DETECT_MAXAREA", 0)
            .range(0.0, INT_MAX)
            .section(Extraction)
            .describe("max. # of pixels above threshold (0=unlimited)"),
        ParameterSpec::token_list("THRESH_TYPE", &["RELATIVE", "ABSOLUTE"], &["RELATIVE"])
            .count(1, 2)
            .section(Extraction)
            .describe("threshold type: RELATIVE (in sigmas) or ABSOLUTE"),
        ParameterSpec::float_list("DETECT_THRESH", &[1.5])
            .count(1, 2)
            .section(Extraction)
            .describe("<sigmas> or <threshold>,<ZP> in mag.arcsec-2"),
        ParameterSpec::float_list("ANALYSIS_THRESH", &[1.5])
            .count(1, 2)
            .section(Extraction)
            .describe("<sigmas> or <threshold>,<ZP> in mag.arcsec-2"),
        ParameterSpec::bool("FILTER", true)
            .section(Extraction)
            .describe("apply filter for detection (Y or N)?"),
        ParameterSpec::string("FILTER_NAME", "default.conv")
            .section(Extraction)
            .describe("name of the file containing the filter"),
        ParameterSpec::float_list("FILTER_THRESH", &[0.0])
            .count(1, 2)
            .section(Extraction)
            .describe("threshold[s] for retina filtering"),
        ParameterSpec::int("DEBLEND_NTHRESH", 32)
            .range(1.0, 64.0)
            .section(Extraction)
            .describe("Number of deblending sub-thresholds"),
        ParameterSpec::float("DEBLEND_MINCONT", 0.005)
            .range(0.0, 1.0)
            .section(Extraction)
            .describe("Minimum contrast parameter for deblending"),
        ParameterSpec::bool("CLEAN", true)
            .section(Extraction)
            .describe("Clean spurious detections? (Y or N)?"),
        ParameterSpec::float("CLEAN_PARAM", 1.0)
            .range(0.1, 10.0)
            .section(Extraction)
            .describe("Cleaning efficiency"),
        ParameterSpec::token("MASK_TYPE", &["NONE", "BLANK", "CORRECT"], "CORRECT")
            .section(Extraction)
            .describe("type of detection MASKing: can be one of NONE, BLANK or CORRECT"),
        // Weighting
        ParameterSpec::token_list(
            "WEIGHT_TYPE",
            &["NONE", "BACKGROUND", "MAP_RMS", "MAP_VAR", "MAP_WEIGHT"],
            &["NONE"],
        )
        .count(1, 2)
        .section(Weighting)
        .describe("type of WEIGHTing: NONE, BACKGROUND, MAP_RMS, MAP_VAR or MAP_WEIGHT"),
        ParameterSpec::string_list("WEIGHT_IMAGE", &["weight.fits"])
            .count(1, 2)
            .section(Weighting)
            .describe("weight-map filename"),
        ParameterSpec::float_list("WEIGHT_THRESH", &[0.0])
            .count(1, 2)
            .section(Weighting)
            .describe("weight threshold[s] for bad pixels"),
        // Flagging
        ParameterSpec::string_list("FLAG_IMAGE", &["flag.fits"])
            .count(1, 4)
            .section(Flagging)
            .describe("filename for an input FLAG-image"),
        ParameterSpec::token("FLAG_TYPE", &["OR", "AND", "MIN", "MAX", "MOST"], "OR")
            .section(Flagging)
            .describe("flag pixel combination: OR, AND, MIN, MAX or MOST"),
        // Photometry
        ParameterSpec::float_list("PHOT_APERTURES", &[5.0])
            .count(1, 64)
            .range(0.0, 1e31)
            .section(Photometry)
            .describe("MAG_APER aperture diameter(s) in pixels"),
        ParameterSpec::float_list("PHOT_AUTOPARAMS", &[2.5, 3.5])
            .count(2, 2)
            .range(0.0, 10.0)
            .section(Photometry)
            .describe("MAG_AUTO parameters: <Kron_fact>,<min_radius>"),
        ParameterSpec::float_list("PHOT_PETROPARAMS", &[2.0, 3.5])
            .count(2, 2)
            .range(0.0, 10.0)
            .section(Photometry)
            .describe("MAG_PETRO parameters: <Petrosian_fact>,<min_radius>"),
        ParameterSpec::float_list("PHOT_AUTOAPERS", &[0.0, 0.0])
            .count(2, 2)
            .range(0.0, 1e31)
            .section(Photometry)
            .describe("<estimation>,<measurement> minimum apertures for MAG_AUTO and MAG_PETRO"),
        ParameterSpec::float_list("PHOT_FLUXFRAC", &[0.5])
            .count(1, 32)
            .range(1e-4, 1.0)
            .section(Photometry)
            .describe("flux fraction[s] used for FLUX_RADIUS"),
        ParameterSpec::float("SATUR_LEVEL", 50000.0)
            .section(Photometry)
            .describe("level (in ADUs) at which arises saturation"),
        ParameterSpec::string("SATUR_KEY", "SATURATE")
            .section(Photometry)
            .describe("keyword for saturation level (in ADUs)"),
        ParameterSpec::float("MAG_ZEROPOINT", 0.0)
            .range(-100.0, 100.0)
            .section(Photometry)
            .describe("magnitude zero-point"),
        ParameterSpec::float("MAG_GAMMA", 4.0)
            .range(1e-10, 1e30)
            .section(Photometry)
            .describe("gamma of emulsion (for photographic scans)"),
        ParameterSpec::float("GAIN", 0.0)
            .range(0.0, 1e30)
            .section(Photometry)
            .describe("detector gain in e-/ADU"),
        ParameterSpec::string("GAIN_KEY", "GAIN")
            .section(Photometry)
            .describe("keyword for detector gain in e-/ADU"),
        ParameterSpec::float("PIXEL_SCALE", 1.0)
            .range(0.0, 1e10)
            .section(Photometry)
            .describe("size of pixel in arcsec (0=use FITS WCS info)"),
        // Star/Galaxy Separation
        ParameterSpec::float("SEEING_FWHM", 1.2)
            .range(1e-12, 1e12)
            .section(StarGalaxy)
            .describe("stellar FWHM in arcsec"),
        ParameterSpec::string("STARNNW_NAME", "default.nnw")
            .section(StarGalaxy)
            .describe("Neural-Network_Weight table filename"),
        // Background
        ParameterSpec::token_list("BACK_TYPE", &["AUTO", "MANUAL"], &["AUTO"])
            .count(1, 2)
            .section(Background)
            .describe("AUTO or MANUAL"),
        ParameterSpec::float_list("BACK_VALUE", &[0.0])
            .count(1, 2)
            .section(Background)
            .describe("Default background value in MANUAL mode"),
        ParameterSpec::int_list("BACK_SIZE", &[64])
            .count(1, 2)
            .range(1.0, 2_000_000_000.0)
            .section(Background)
            .describe("Background mesh: <size> or <width>,<height>"),
        ParameterSpec::int_list("BACK_FILTERSIZE", &[3])
            .count(1, 2)
            .range(1.0, 7.0)
            .section(Background)
            .describe("Background filter: <size> or <width>,<height>"),
        ParameterSpec::token("BACKPHOTO_TYPE", &["GLOBAL", "LOCAL"], "GLOBAL")
            .section(Background)
            .describe("can be GLOBAL or LOCAL"),
        ParameterSpec::int("BACKPHOTO_THICK", 24)
            .range(1.0, 256.0)
            .section(Background)
            .describe("thickness of the background LOCAL annulus"),
        ParameterSpec::float("BACK_FILTTHRESH", 0.0)
            .section(Background)
            .describe("Threshold above which the background-map filter operates"),
        // Check Image
        ParameterSpec::token_list("CHECKIMAGE_TYPE", CHECKIMAGE_TYPES, &["NONE"])
            .count(1, 16)
            .section(CheckImage)
            .describe("can be NONE, BACKGROUND, BACKGROUND_RMS, MINIBACKGROUND, MINIBACK_RMS, -BACKGROUND, FILTERED, OBJECTS, -OBJECTS, SEGMENTATION, or APERTURES"),
        ParameterSpec::string_list("CHECKIMAGE_NAME", &["check.fits"])
            .count(1, 16)
            .section(CheckImage)
            .describe("Filename for the check-image"),
        // Memory
        ParameterSpec::int("MEMORY_OBJSTACK", 3000)
            .range(1.0, 100_000_000.0)
            .section(Memory)
            .describe("number of objects in stack"),
        ParameterSpec::int("MEMORY_PIXSTACK", 300_000)
            .range(1000.0, INT_MAX)
            .section(Memory)
            .describe("number of pixels in stack"),
        ParameterSpec::int("MEMORY_BUFSIZE", 1024)
            .range(8.0, 65534.0)
            .section(Memory)
            .describe("number of lines in buffer"),
        // Miscellaneous
        ParameterSpec::token_list("INTERP_TYPE", &["NONE", "VAR_ONLY", "ALL"], &["ALL"])
            .count(1, 2)
            .section(Miscellaneous)
            .describe("interpolation type: NONE, VAR_ONLY or ALL"),
        ParameterSpec::int_list("INTERP_MAXXLAG", &[16])
            .count(1, 2)
            .range(1.0, 1_000_000.0)
            .section(Miscellaneous)
            .describe("max. interpolation gap along X"),
        ParameterSpec::int_list("INTERP_MAXYLAG", &[16])
            .count(1, 2)
            .range(1.0, 1_000_000.0)
            .section(Miscellaneous)
            .describe("max. interpolation gap along Y"),
        ParameterSpec::token(
            "VERBOSE_TYPE",
            &["QUIET", "NORMAL", "LOG", "WARN", "FULL"],
            "NORMAL",
        )
        .section(Miscellaneous)
        .describe("can be QUIET, NORMAL, LOG, WARN or FULL"),
        ParameterSpec::string("HEADER_SUFFIX", ".head")
            .section(Miscellaneous)
            .describe("Filename extension for additional headers"),
        ParameterSpec::bool("WRITE_XML", false)
            .section(Miscellaneous)
            .describe("Write XML file (Y/N)?"),
        ParameterSpec::string("XML_NAME", "sex.xml")
            .section(Miscellaneous)
            .describe("Filename for XML output"),
        ParameterSpec::int("NTHREADS", 1)
            .range(0.0, 1024.0)
            .section(Miscellaneous)
            .describe("Number of simultaneous threads (0 = automatic)"),
        ParameterSpec::bool("FITS_UNSIGNED", false)
            .section(Miscellaneous)
            .describe("Treat FITS integer values as unsigned (Y/N)?"),
    ];

    Arc::new(
        specs
            .into_iter()
            .fold(SchemaRegistry::new(), SchemaRegistry::with),
    )
});

// ============================================================================
// Tests
// ============================================================================
