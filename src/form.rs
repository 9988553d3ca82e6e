//! Form decoding: flat `(key, value)` submissions → a nested [`Value`] shaped
//! by a [`Schema`].
//!
//! Two stages:
//! - A: tokenize each key and fold the entries, in submission order, into an
//!   untyped [`RawValue`] tree. Numeric next segments create sequences,
//!   anything else creates mappings, and repeated keys collect into sequences.
//! - B: [`coerce::coerce`] walks that tree with the schema.
//!
//! Structural conflicts are settled deterministically: a scalar sitting where
//! a nested path needs a container is replaced by the container, and a
//! sequence addressed by a non-index key turns into a mapping keyed by its
//! indices (nothing is lost).
pub mod coerce;
pub mod key;
pub mod scalar;

use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::schema::Schema;
use crate::value::Value;

pub use coerce::coerce;
pub use key::tokenize_key;

// ------------------------------- Policy ---------------------------------- //

const DEFAULT_MAX_INDEX: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Largest bracket index that still addresses a sequence slot; bigger
    /// indices are kept as mapping keys.
    pub max_index: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_index: DEFAULT_MAX_INDEX }
    }
}

// ------------------------------ Raw tree --------------------------------- //

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Text(String),
    /// `None` marks a hole left by a sparse index.
    Sequence(Vec<Option<RawValue>>),
    Mapping(IndexMap<String, RawValue>),
}

impl RawValue {
    fn container_for(segment: &str, max_index: usize) -> Self {
        if key::index_of(segment, max_index).is_some() {
            Self::Sequence(Vec::new())
        } else {
            Self::Mapping(IndexMap::new())
        }
    }

    /// String conversion the way a browser script would see it: sequences
    /// join with `,` (holes as empty), mappings read `[object Object]`.
    pub fn to_js_string(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Sequence(items) => items
                .iter()
                .map(|item| item.as_ref().map(RawValue::to_js_string).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(","),
            Self::Mapping(_) => "[object Object]".to_string(),
        }
    }
}

impl From<&RawValue> for Value {
    fn from(raw: &RawValue) -> Self {
        match raw {
            RawValue::Text(s) => Value::String(s.clone()),
            RawValue::Sequence(items) => Value::Array(
                items.iter().map(|item| item.as_ref().map(Value::from).unwrap_or_default()).collect(),
            ),
            RawValue::Mapping(map) => Value::Object(map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect()),
        }
    }
}

// ------------------------------- Stage A --------------------------------- //

/// Fold submitted entries into the raw tree. The root is always a mapping.
pub fn nest_entries<I, K, V>(entries: I, options: &DecodeOptions) -> RawValue
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = RawValue::Mapping(IndexMap::new());
    for (key, value) in entries {
        let key = key.as_ref();
        let segments = tokenize_key(key);
        if segments.is_empty() {
            tracing::debug!(key, "form key has no path segments, ignoring");
            continue;
        }
        insert(&mut root, &segments, value.as_ref().to_string(), options.max_index);
    }
    root
}

fn insert(container: &mut RawValue, path: &[String], value: String, max_index: usize) {
    let Some((segment, rest)) = path.split_first() else {
        return;
    };

    if let RawValue::Text(previous) = container {
        tracing::debug!(segment = %segment, previous = %previous, "nested path replaces scalar");
        *container = RawValue::container_for(segment, max_index);
    }

    if let RawValue::Sequence(items) = container {
        if let Some(idx) = key::index_of(segment, max_index) {
            if items.len() <= idx {
                items.resize(idx + 1, None);
            }
            let slot = &mut items[idx];
            match rest.first() {
                None => match slot {
                    Some(existing) => append(existing, value),
                    empty => *empty = Some(RawValue::Text(value)),
                },
                Some(next) => {
                    let child = slot.get_or_insert_with(|| RawValue::container_for(next, max_index));
                    insert(child, rest, value, max_index);
                }
            }
            return;
        }
        let items = std::mem::take(items);
        *container = sequence_into_mapping(items);
    }

    if let RawValue::Mapping(map) = container {
        match rest.first() {
            None => match map.entry(segment.clone()) {
                Entry::Occupied(mut occupied) => append(occupied.get_mut(), value),
                Entry::Vacant(vacant) => {
                    vacant.insert(RawValue::Text(value));
                }
            },
            Some(next) => {
                let child = map
                    .entry(segment.clone())
                    .or_insert_with(|| RawValue::container_for(next, max_index));
                insert(child, rest, value, max_index);
            }
        }
    }
}

// Repeated final segment: promote the occupant to a sequence, then append.
fn append(existing: &mut RawValue, value: String) {
    match existing {
        RawValue::Sequence(items) => items.push(Some(RawValue::Text(value))),
        _ => {
            let previous = std::mem::replace(existing, RawValue::Sequence(Vec::new()));
            *existing = RawValue::Sequence(vec![Some(previous), Some(RawValue::Text(value))]);
        }
    }
}

fn sequence_into_mapping(items: Vec<Option<RawValue>>) -> RawValue {
    RawValue::Mapping(
        items
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| item.map(|v| (idx.to_string(), v)))
            .collect(),
    )
}

// ------------------------------- Front API -------------------------------- //

/// Decode ordered form entries against `schema` with default options.
pub fn parse_form<I, K, V>(schema: &Schema, entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    parse_form_with(schema, entries, &DecodeOptions::default())
}

pub fn parse_form_with<I, K, V>(schema: &Schema, entries: I, options: &DecodeOptions) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let raw = nest_entries(entries, options);
    coerce(schema, Some(&raw))
}

/// Decode an `application/x-www-form-urlencoded` body.
pub fn parse_urlencoded(schema: &Schema, body: &str) -> Value {
    parse_form(schema, url::form_urlencoded::parse(body.trim().as_bytes()))
}

// ------------------------------- Tests ------------------------------------ //
