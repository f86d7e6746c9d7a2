//! Configuration module
//!
//! Loads SExtractor-style `KEY value # comment` files into a typed,
//! validated [`Config`], and renders configurations back to file syntax.

pub mod loader;
pub mod parser;
pub mod render;
pub mod resolved;
pub mod schema;
pub mod validation;

pub use loader::{
    ConfigLimits, ConfigLoader, LoadResult, LoadWarning, LoaderOptions, load, parse_override,
};
pub use parser::{Parser, RawEntry, parse};
pub use render::{RenderOptions, Rendered, render, render_defaults};
pub use resolved::{Config, Origin, Setting};
pub use schema::*;
pub use validation::{ValidationResult, Validator};
