//! Path resolution: find the sub-schema reachable at `users[3].details.isActive`.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::schema::{Schema, SchemaKind};

static BRACKET_INDEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[(\d+)\]").expect("static regex"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickError {
    #[error("key `{key}` not found in object schema (path `{path}`)")]
    FieldNotFound { key: String, path: String },
    #[error("cannot descend into {kind} schema with key `{key}` (path `{path}`)")]
    UnhandledKind { kind: SchemaKind, key: String, path: String },
}

/// Resolve the schema node at `path`.
///
/// Optional, Nullable and Transform wrappers are looked through on the way
/// down. On the final node only Transform wrappers are removed, so callers
/// still see whether the field itself is optional or nullable.
pub fn pick<'s>(schema: &'s Schema, path: &str) -> Result<&'s Schema, PickError> {
    let normalized = normalize_path(path);
    let mut current = schema;

    for key in normalized.split('.') {
        let node = current.unwrap_nullish();
        current = match node {
            Schema::Object { fields } => match fields.get(key) {
                Some(field) => field,
                None => {
                    tracing::debug!(key, path, "key not found in object schema");
                    return Err(PickError::FieldNotFound { key: key.to_string(), path: path.to_string() });
                }
            },
            // Element schema regardless of whether `key` is numeric.
            Schema::Array { element } => element.as_ref(),
            Schema::String
            | Schema::Number
            | Schema::Boolean
            | Schema::Date
            | Schema::Tuple { .. }
            | Schema::Record { .. }
            | Schema::Union { .. }
            | Schema::DiscriminatedUnion { .. }
            | Schema::Enum { .. }
            | Schema::NativeEnum { .. }
            | Schema::Literal { .. }
            | Schema::Any
            | Schema::Optional { .. }
            | Schema::Nullable { .. }
            | Schema::Default { .. }
            | Schema::Transform { .. } => {
                let kind = node.kind();
                tracing::debug!(key, path, %kind, "unhandled schema kind");
                return Err(PickError::UnhandledKind { kind, key: key.to_string(), path: path.to_string() });
            }
        };
    }

    Ok(current.unwrap_transforms())
}

/// Same as [`pick`] but hands back an owned copy of the node.
pub fn pick_owned(schema: &Schema, path: &str) -> Result<Schema, PickError> {
    pick(schema, path).cloned()
}

fn normalize_path(path: &str) -> String {
    let dotted = BRACKET_INDEX.replace_all(path, ".$1");
    match dotted.strip_prefix('.') {
        Some(rest) => rest.to_string(),
        None => dotted.into_owned(),
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> Schema {
        Schema::object([(
            "users",
            Schema::array(Schema::object([(
                "details",
                Schema::object([("isActive", Schema::boolean().nullable().optional())]),
            )])),
        )])
    }

    #[test]
    fn normalizes_bracket_indices() {
        assert_eq!(normalize_path("books[0].title"), "books.0.title");
        assert_eq!(normalize_path("[2].x"), "2.x");
        assert_eq!(normalize_path("a[10][3]"), "a.10.3");
        assert_eq!(normalize_path("plain"), "plain");
    }

    #[test]
    fn resolves_object_fields() {
        let schema = Schema::object([("name", Schema::string()), ("age", Schema::number())]);
        assert_eq!(pick(&schema, "name").unwrap(), &Schema::String);
        assert_eq!(pick(&schema, "age").unwrap(), &Schema::Number);
    }

    #[test]
    fn missing_field_is_reported() {
        let schema = Schema::object([("name", Schema::string())]);
        let err = pick(&schema, "age").unwrap_err();
        assert_eq!(err, PickError::FieldNotFound { key: "age".into(), path: "age".into() });
    }

    #[test]
    fn final_optional_wrapper_is_preserved() {
        // index is not bounds checked
        let schema = users();
        let node = pick(&schema, "users[113].details.isActive").unwrap();
        assert_eq!(node.kind(), SchemaKind::Optional);
    }

    #[test]
    fn nullish_field_reports_outer_optional() {
        let schema = Schema::object([("field", Schema::string().nullish())]);
        assert_eq!(pick(&schema, "field").unwrap().kind(), SchemaKind::Optional);
    }

    #[test]
    fn transforms_are_stripped_everywhere() {
        let schema = Schema::object([
            ("val", Schema::string().transform("length")),
            (
                "nested",
                Schema::object([("inner", Schema::number())]).optional().transform("wrap"),
            ),
        ]);
        assert_eq!(pick(&schema, "val").unwrap(), &Schema::String);
        assert_eq!(pick(&schema, "nested.inner").unwrap(), &Schema::Number);
    }

    #[test]
    fn arrays_resolve_to_themselves_or_their_element() {
        let schema = Schema::object([("items", Schema::array(Schema::object([("id", Schema::string())])))]);
        assert_eq!(pick(&schema, "items").unwrap().kind(), SchemaKind::Array);
        assert_eq!(pick(&schema, "items[0].id").unwrap(), &Schema::String);
        // non-numeric segment against an array still yields the element
        assert_eq!(pick(&schema, "items.first.id").unwrap(), &Schema::String);
    }

    #[test]
    fn cannot_descend_into_scalars_or_defaults() {
        let schema = Schema::object([
            ("name", Schema::string()),
            ("meta", Schema::object([("a", Schema::string())]).default_to(serde_json::json!({}))),
        ]);
        let err = pick(&schema, "name.first").unwrap_err();
        assert!(matches!(err, PickError::UnhandledKind { kind: SchemaKind::String, .. }));
        let err = pick(&schema, "meta.a").unwrap_err();
        assert!(matches!(err, PickError::UnhandledKind { kind: SchemaKind::Default, .. }));
    }

    #[test]
    fn owned_pick_clones_the_node() {
        let node = pick_owned(&users(), "users.0.details").unwrap();
        assert_eq!(node.kind(), SchemaKind::Object);
    }
}
