//! Runs the JSON scenario fixtures under `fixtures/` against the library.
//!
//! Each fixture holds one schema and a list of cases:
//! `{"op":"decode","entries":[["k","v"]],"expect":{..}}`,
//! `{"op":"init","options":{..},"expect":..}`,
//! `{"op":"pick","path":"a.b","expect":{schema}|null}`.
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Deserialize;
use serde_json::Value;

use schema_forms::{InitialValueOptions, Schema};

#[derive(Debug, Deserialize)]
struct Fixture {
    name: String,
    schema: Schema,
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Case {
    Decode { entries: Vec<(String, String)>, expect: Value },
    Init {
        #[serde(default)]
        options: InitialValueOptions,
        expect: Value,
    },
    Pick { path: String, expect: Value },
}

impl Case {
    fn label(&self) -> String {
        match self {
            Case::Decode { entries, .. } => format!("decode ({} entries)", entries.len()),
            Case::Init { .. } => "init".to_string(),
            Case::Pick { path, .. } => format!("pick `{path}`"),
        }
    }

    fn actual(&self, schema: &Schema) -> Result<Value> {
        Ok(match self {
            Case::Decode { entries, .. } => schema_forms::parse_form(schema, entries.iter().map(|(k, v)| (k, v))).to_json(),
            Case::Init { options, .. } => schema_forms::initial_value(schema, options).to_json(),
            Case::Pick { path, .. } => match schema_forms::pick(schema, path) {
                Ok(node) => serde_json::to_value(node)?,
                Err(_) => Value::Null,
            },
        })
    }

    fn expected(&self) -> &Value {
        match self {
            Case::Decode { expect, .. } | Case::Init { expect, .. } | Case::Pick { expect, .. } => expect,
        }
    }
}

fn load_fixture(path: &Path) -> Result<Fixture> {
    let src = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_str(&src);
    serde_path_to_error::deserialize(de).map_err(|err| {
        let at = err.path().to_string();
        anyhow::anyhow!("{} at JSON path {at} → {}", path.display(), err.into_inner())
    })
}

fn main() -> Result<()> {
    let dir = std::env::args().nth(1).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("fixtures"));
    let pattern = dir.join("*.json");
    let pattern = pattern.to_string_lossy();

    let mut failed = 0usize;
    let mut passed = 0usize;
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        let fixture = load_fixture(&path)?;
        eprintln!("—— {} ——", fixture.name.bold());
        for case in &fixture.cases {
            let actual = case.actual(&fixture.schema)?;
            if &actual == case.expected() {
                passed += 1;
                eprintln!("✅ {}", case.label());
            } else {
                failed += 1;
                eprintln!("❌ {}", case.label().red());
                eprintln!("   expected: {}", case.expected());
                eprintln!("   actual:   {actual}");
            }
        }
    }

    eprintln!("{passed} passed, {failed} failed");
    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
