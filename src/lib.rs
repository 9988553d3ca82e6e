//! Schema-driven helpers for HTML form state.
//!
//! - [`pick`] — the sub-schema at a dotted/bracketed path;
//! - [`initial_value`] — an empty value shaped like a schema;
//! - [`parse_form`] — flat form entries → nested, coerced value.
//!
//! All three are pure walks over a borrowed [`Schema`]; none of them
//! validates. Hand the results to your validator.
pub mod form;
pub mod initial;
pub mod path_de;
pub mod pick;
pub mod schema;
pub mod value;

pub use form::{DecodeOptions, RawValue, nest_entries, parse_form, parse_form_with, parse_urlencoded};
pub use initial::{InitialValueOptions, initial_value};
pub use path_de::{SchemaLoadError, load_schema_file, load_schema_str};
pub use pick::{PickError, pick, pick_owned};
pub use schema::{Schema, SchemaKind};
pub use value::Value;
