//! Declarative schema vocabulary shared by `pick`, `initial_value` and `parse_form`.
//!
//! A `Schema` is an owned, finite tree. Consumers only read it; every
//! operation matches exhaustively on the node kind so adding a kind is a
//! compile error in each of them.
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Schema {
    String,
    Number,
    Boolean,
    Date,
    Object {
        fields: IndexMap<String, Schema>, // declaration order
    },
    Array {
        element: Box<Schema>,
    },
    Tuple {
        items: Vec<Schema>,
    },
    Record {
        key: Box<Schema>,
        value: Box<Schema>,
    },
    Union {
        options: Vec<Schema>,
    },
    DiscriminatedUnion {
        discriminator: String,
        options: Vec<Schema>,
    },
    /// Ordered literal options; `entries` is the backing name → value table.
    Enum {
        #[serde(default)]
        options: Vec<JsonValue>,
        #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
        entries: IndexMap<String, JsonValue>,
    },
    NativeEnum {
        entries: IndexMap<String, JsonValue>,
    },
    Literal {
        value: JsonValue,
    },
    Any,
    Optional {
        inner: Box<Schema>,
    },
    Nullable {
        inner: Box<Schema>,
    },
    Default {
        inner: Box<Schema>,
        value: JsonValue,
    },
    /// Never applied here; only the input shape matters.
    Transform {
        input: Box<Schema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
}

/// Tag-only view of a [`Schema`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Date,
    Object,
    Array,
    Tuple,
    Record,
    Union,
    DiscriminatedUnion,
    Enum,
    NativeEnum,
    Literal,
    Any,
    Optional,
    Nullable,
    Default,
    Transform,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Schema {
    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::String => SchemaKind::String,
            Self::Number => SchemaKind::Number,
            Self::Boolean => SchemaKind::Boolean,
            Self::Date => SchemaKind::Date,
            Self::Object { .. } => SchemaKind::Object,
            Self::Array { .. } => SchemaKind::Array,
            Self::Tuple { .. } => SchemaKind::Tuple,
            Self::Record { .. } => SchemaKind::Record,
            Self::Union { .. } => SchemaKind::Union,
            Self::DiscriminatedUnion { .. } => SchemaKind::DiscriminatedUnion,
            Self::Enum { .. } => SchemaKind::Enum,
            Self::NativeEnum { .. } => SchemaKind::NativeEnum,
            Self::Literal { .. } => SchemaKind::Literal,
            Self::Any => SchemaKind::Any,
            Self::Optional { .. } => SchemaKind::Optional,
            Self::Nullable { .. } => SchemaKind::Nullable,
            Self::Default { .. } => SchemaKind::Default,
            Self::Transform { .. } => SchemaKind::Transform,
        }
    }

    /// Strip Optional, Nullable and Transform wrappers (Default is kept).
    pub fn unwrap_nullish(&self) -> &Schema {
        let mut current = self;
        loop {
            current = match current {
                Self::Optional { inner } | Self::Nullable { inner } => inner.as_ref(),
                Self::Transform { input, .. } => input.as_ref(),
                _ => return current,
            };
        }
    }

    /// Strip Transform wrappers only, however deeply chained.
    pub fn unwrap_transforms(&self) -> &Schema {
        let mut current = self;
        while let Self::Transform { input, .. } = current {
            current = input.as_ref();
        }
        current
    }

    // —— builders ——

    pub fn string() -> Self { Self::String }
    pub fn number() -> Self { Self::Number }
    pub fn boolean() -> Self { Self::Boolean }
    pub fn date() -> Self { Self::Date }
    pub fn any() -> Self { Self::Any }

    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Schema)>,
        K: Into<String>,
    {
        Self::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn array(element: Schema) -> Self {
        Self::Array { element: Box::new(element) }
    }

    pub fn tuple(items: impl IntoIterator<Item = Schema>) -> Self {
        Self::Tuple { items: items.into_iter().collect() }
    }

    pub fn record(key: Schema, value: Schema) -> Self {
        Self::Record { key: Box::new(key), value: Box::new(value) }
    }

    pub fn union(options: impl IntoIterator<Item = Schema>) -> Self {
        Self::Union { options: options.into_iter().collect() }
    }

    pub fn discriminated_union(
        discriminator: impl Into<String>,
        options: impl IntoIterator<Item = Schema>,
    ) -> Self {
        Self::DiscriminatedUnion {
            discriminator: discriminator.into(),
            options: options.into_iter().collect(),
        }
    }

    pub fn enumeration<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<JsonValue>,
    {
        Self::Enum {
            options: options.into_iter().map(Into::into).collect(),
            entries: IndexMap::new(),
        }
    }

    pub fn native_enum<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<JsonValue>,
    {
        Self::NativeEnum {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn literal(value: impl Into<JsonValue>) -> Self {
        Self::Literal { value: value.into() }
    }

    pub fn optional(self) -> Self {
        Self::Optional { inner: Box::new(self) }
    }

    pub fn nullable(self) -> Self {
        Self::Nullable { inner: Box::new(self) }
    }

    /// `.nullable().optional()`, outermost wrapper is Optional.
    pub fn nullish(self) -> Self {
        self.nullable().optional()
    }

    pub fn default_to(self, value: impl Into<JsonValue>) -> Self {
        Self::Default { inner: Box::new(self), value: value.into() }
    }

    pub fn transform(self, name: impl Into<String>) -> Self {
        Self::Transform { input: Box::new(self), name: Some(name.into()) }
    }
}

impl SchemaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Object => "object",
            Self::Array => "array",
            Self::Tuple => "tuple",
            Self::Record => "record",
            Self::Union => "union",
            Self::DiscriminatedUnion => "discriminated_union",
            Self::Enum => "enum",
            Self::NativeEnum => "native_enum",
            Self::Literal => "literal",
            Self::Any => "any",
            Self::Optional => "optional",
            Self::Nullable => "nullable",
            Self::Default => "default",
            Self::Transform => "transform",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn documents_are_tagged_by_type() {
        let doc = json!({
            "type": "object",
            "fields": {
                "name": { "type": "string" },
                "tags": { "type": "array", "element": { "type": "string" } },
                "age": { "type": "default", "inner": { "type": "number" }, "value": 18 },
                "color": { "type": "enum", "options": ["red", "blue"] }
            }
        });
        let schema: Schema = serde_json::from_value(doc).unwrap();
        let expected = Schema::object([
            ("name", Schema::string()),
            ("tags", Schema::array(Schema::string())),
            ("age", Schema::number().default_to(18)),
            ("color", Schema::enumeration(["red", "blue"])),
        ]);
        assert_eq!(schema, expected);
    }

    #[test]
    fn field_order_is_declaration_order() {
        let doc = r#"{"type":"object","fields":{"z":{"type":"string"},"a":{"type":"number"}}}"#;
        let schema: Schema = serde_json::from_str(doc).unwrap();
        let Schema::Object { fields } = &schema else { panic!("expected object") };
        let keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a"]);
        // and back out in the same order
        let out = serde_json::to_string(&schema).unwrap();
        assert!(out.find("\"z\"").unwrap() < out.find("\"a\"").unwrap());
    }

    #[test]
    fn transform_name_is_optional_in_documents() {
        let doc = json!({ "type": "transform", "input": { "type": "string" } });
        let schema: Schema = serde_json::from_value(doc).unwrap();
        assert_eq!(schema.kind(), SchemaKind::Transform);
        assert_eq!(schema.unwrap_transforms(), &Schema::String);
    }

    #[test]
    fn unwrap_nullish_keeps_defaults() {
        let s = Schema::number().default_to(3).nullish();
        let Schema::Default { .. } = s.unwrap_nullish() else {
            panic!("default wrapper must survive")
        };
        let t = Schema::string().transform("len").transform("twice").optional();
        assert_eq!(t.unwrap_nullish(), &Schema::String);
        assert_eq!(t.unwrap_transforms().kind(), SchemaKind::Optional);
    }
}
