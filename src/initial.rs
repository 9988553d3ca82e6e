//! Initial-value synthesis: a structurally valid "empty" value for a schema,
//! used as fresh form state.
use indexmap::IndexMap;
use serde::Deserialize;

use crate::schema::Schema;
use crate::value::Value;

/// Per-kind scalars handed to every node of the walk, nested ones included.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InitialValueOptions {
    pub number: f64,
    pub string: String,
    pub boolean: bool,
    #[serde(deserialize_with = "de_values")]
    pub array: Vec<Value>,
    #[serde(deserialize_with = "de_value_map")]
    pub record: IndexMap<String, Value>,
}

impl Default for InitialValueOptions {
    fn default() -> Self {
        Self {
            number: 0.0,
            string: String::new(),
            boolean: false,
            array: Vec::new(),
            record: IndexMap::new(),
        }
    }
}

fn de_values<'de, D: serde::Deserializer<'de>>(de: D) -> Result<Vec<Value>, D::Error> {
    let xs = Vec::<serde_json::Value>::deserialize(de)?;
    Ok(xs.into_iter().map(Value::from).collect())
}

fn de_value_map<'de, D: serde::Deserializer<'de>>(de: D) -> Result<IndexMap<String, Value>, D::Error> {
    let m = IndexMap::<String, serde_json::Value>::deserialize(de)?;
    Ok(m.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
}

/// Never fails and never validates; kinds without a natural empty value
/// come back as [`Value::Absent`].
pub fn initial_value(schema: &Schema, options: &InitialValueOptions) -> Value {
    match schema {
        Schema::Default { value, .. } => Value::from(value),
        Schema::Optional { .. } => Value::Absent,
        Schema::Nullable { .. } => Value::Null,
        Schema::Transform { input, .. } => initial_value(input, options),

        Schema::String => Value::String(options.string.clone()),
        Schema::Number => Value::Number(options.number),
        Schema::Boolean => Value::Bool(options.boolean),
        Schema::Array { .. } => Value::Array(options.array.clone()),

        Schema::Enum { options: literals, entries } => literals
            .first()
            .map(Value::from)
            .or_else(|| entries.keys().next().map(|k| Value::String(k.clone())))
            .unwrap_or_default(),
        Schema::NativeEnum { entries } => entries.values().next().map(Value::from).unwrap_or_default(),

        Schema::Object { fields } => Value::Object(
            fields
                .iter()
                .map(|(name, field)| (name.clone(), initial_value(field, options)))
                .collect(),
        ),
        Schema::Tuple { items } => Value::Array(items.iter().map(|item| initial_value(item, options)).collect()),
        // Not walked per value type; the configured record is used as-is.
        Schema::Record { .. } => Value::Object(options.record.clone()),

        Schema::Union { options: candidates } | Schema::DiscriminatedUnion { options: candidates, .. } => {
            candidates.first().map(|first| initial_value(first, options)).unwrap_or_default()
        }

        Schema::Date | Schema::Literal { .. } | Schema::Any => Value::Absent,
    }
}

// ------------------------------- Tests ------------------------------------ //
