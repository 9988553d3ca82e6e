//! Stage B: walk the raw tree alongside the schema and coerce leaves.
//!
//! Anything that cannot be coerced is handed back as submitted; reporting
//! it is left to the validation pass that runs after decoding.
use indexmap::IndexMap;

use super::scalar;
use super::RawValue;
use crate::schema::Schema;
use crate::value::Value;

/// `None` is a slot nothing was submitted for and stays [`Value::Absent`].
pub fn coerce(schema: &Schema, raw: Option<&RawValue>) -> Value {
    let Some(raw) = raw else {
        return Value::Absent;
    };

    match schema {
        // Declared defaults are not injected here.
        Schema::Optional { inner } | Schema::Nullable { inner } | Schema::Default { inner, .. } => {
            coerce(inner, Some(raw))
        }
        Schema::Transform { input, .. } => coerce(input, Some(raw)),

        Schema::String => Value::String(raw.to_js_string()),
        Schema::Number => coerce_number(raw),
        Schema::Boolean => Value::Bool(coerce_bool(raw)),
        Schema::Date => coerce_date(raw),

        Schema::Object { fields } => match raw {
            RawValue::Mapping(map) => coerce_object(fields, map),
            _ => Value::from(raw),
        },
        Schema::Array { element } => match raw {
            RawValue::Sequence(items) => Value::Array(items.iter().map(|item| coerce(element, item.as_ref())).collect()),
            _ => Value::Array(vec![coerce(element, Some(raw))]),
        },

        Schema::Tuple { .. }
        | Schema::Record { .. }
        | Schema::Union { .. }
        | Schema::DiscriminatedUnion { .. }
        | Schema::Enum { .. }
        | Schema::NativeEnum { .. }
        | Schema::Literal { .. }
        | Schema::Any => Value::from(raw),
    }
}

fn coerce_object(fields: &IndexMap<String, Schema>, map: &IndexMap<String, RawValue>) -> Value {
    let mut out = IndexMap::<String, Value>::with_capacity(map.len());
    for (name, field) in fields {
        if let Some(raw) = map.get(name) {
            out.insert(name.clone(), coerce(field, Some(raw)));
        }
    }
    // undeclared keys survive verbatim
    for (key, raw) in map {
        if !fields.contains_key(key) {
            out.insert(key.clone(), Value::from(raw));
        }
    }
    Value::Object(out)
}

fn coerce_number(raw: &RawValue) -> Value {
    // blank inputs are "not filled in", not zero
    if matches!(raw, RawValue::Text(s) if s.is_empty()) {
        return Value::Absent;
    }
    match scalar::parse_js_number(&raw.to_js_string()) {
        Some(n) => Value::Number(n),
        None => {
            tracing::trace!(raw = ?raw, "not a number, keeping submitted value");
            Value::from(raw)
        }
    }
}

fn coerce_bool(raw: &RawValue) -> bool {
    match raw {
        RawValue::Text(s) => match s.as_str() {
            "true" | "on" | "1" => true,
            "false" | "off" | "0" => false,
            other => !other.is_empty(),
        },
        RawValue::Sequence(_) | RawValue::Mapping(_) => true,
    }
}

fn coerce_date(raw: &RawValue) -> Value {
    match scalar::parse_date(&raw.to_js_string()) {
        Some(d) => Value::Date(d),
        None => {
            tracing::trace!(raw = ?raw, "not a date, keeping submitted value");
            Value::from(raw)
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> RawValue {
        RawValue::Text(s.to_string())
    }

    fn seq(items: &[&str]) -> RawValue {
        RawValue::Sequence(items.iter().map(|s| Some(text(s))).collect())
    }

    #[test]
    fn booleans() {
        for (s, expected) in [("on", true), ("off", false), ("1", true), ("0", false), ("true", true), ("false", false)] {
            assert_eq!(coerce(&Schema::boolean(), Some(&text(s))), Value::Bool(expected), "{s}");
        }
        // truthiness fallback
        assert_eq!(coerce(&Schema::boolean(), Some(&text("yes"))), Value::Bool(true));
        assert_eq!(coerce(&Schema::boolean(), Some(&text(""))), Value::Bool(false));
        assert_eq!(coerce(&Schema::boolean(), Some(&seq(&[]))), Value::Bool(true));
    }

    #[test]
    fn numbers() {
        assert_eq!(coerce(&Schema::number(), Some(&text("40"))), Value::Number(40.0));
        assert!(coerce(&Schema::number(), Some(&text(""))).is_absent());
        assert!(coerce(&Schema::number().optional(), Some(&text(""))).is_absent());
        assert_eq!(coerce(&Schema::number(), Some(&text("forty"))), Value::from("forty"));
        // a single-element sequence reads like its element
        assert_eq!(coerce(&Schema::number(), Some(&seq(&["5"]))), Value::Number(5.0));
    }

    #[test]
    fn strings_stringify_sequences() {
        assert_eq!(coerce(&Schema::string(), Some(&text("x"))), Value::from("x"));
        assert_eq!(coerce(&Schema::string(), Some(&seq(&["a", "b"]))), Value::from("a,b"));
    }

    #[test]
    fn dates_fall_back_to_raw_text() {
        let v = coerce(&Schema::date(), Some(&text("2023-01-01T00:00:00.000Z")));
        assert!(v.as_date().is_some());
        assert_eq!(coerce(&Schema::date(), Some(&text("soon"))), Value::from("soon"));
    }

    #[test]
    fn absent_raw_short_circuits() {
        assert!(coerce(&Schema::number(), None).is_absent());
        assert!(coerce(&Schema::array(Schema::string()), None).is_absent());
    }

    #[test]
    fn arrays_wrap_single_values() {
        let v = coerce(&Schema::array(Schema::number()), Some(&text("5")));
        assert_eq!(v, Value::Array(vec![Value::Number(5.0)]));
        let holes = RawValue::Sequence(vec![None, Some(text("2"))]);
        let v = coerce(&Schema::array(Schema::number()), Some(&holes));
        assert_eq!(v, Value::Array(vec![Value::Absent, Value::Number(2.0)]));
    }

    #[test]
    fn objects_pass_through_non_mappings_and_unknown_keys() {
        let schema = Schema::object([("age", Schema::number())]);
        assert_eq!(coerce(&schema, Some(&text("x"))), Value::from("x"));

        let raw = RawValue::Mapping(IndexMap::from([
            ("extra".to_string(), text("7")),
            ("age".to_string(), text("7")),
        ]));
        let v = coerce(&schema, Some(&raw));
        let keys: Vec<&str> = v.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["age", "extra"]);
        assert_eq!(v.get("age"), &Value::Number(7.0));
        assert_eq!(v.get("extra"), &Value::from("7"));
    }

    #[test]
    fn wrappers_coerce_against_their_inner_node() {
        assert_eq!(coerce(&Schema::number().nullable(), Some(&text("123"))), Value::Number(123.0));
        assert_eq!(coerce(&Schema::number().default_to(1), Some(&text("2"))), Value::Number(2.0));
        assert_eq!(coerce(&Schema::string().transform("to_number"), Some(&text("50"))), Value::from("50"));
    }

    #[test]
    fn other_kinds_pass_through() {
        let e = Schema::enumeration(["light", "dark"]);
        assert_eq!(coerce(&e, Some(&text("dark"))), Value::from("dark"));
        let t = Schema::tuple([Schema::number()]);
        assert_eq!(coerce(&t, Some(&seq(&["1"]))), Value::Array(vec![Value::from("1")]));
    }
}
