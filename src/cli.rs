//! Minimal CLI: schema document → (pick | init | decode)
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use schema_forms::{DecodeOptions, InitialValueOptions, Schema, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// resolve paths, synthesize initial values and decode form submissions against a JSON schema document
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// pretty-print JSON output
    #[arg(long, global = true, default_value_t = false)]
    pretty: bool,

    /// more diagnostics on stderr (-v info, -vv debug, -vvv trace); RUST_LOG wins when set
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// print the sub-schema found at a dotted/bracketed path
    Pick(PickOut),
    /// print an empty value shaped like the schema
    Init(InitOut),
    /// decode urlencoded form bodies into nested JSON
    Decode(DecodeOut),
}

#[derive(Args, Debug, Clone)]
struct SchemaSettings {
    /// schema document (JSON)
    #[arg(long, short)]
    schema: PathBuf,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(clap::Parser, Debug)]
struct PickOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// path such as `users[0].details.isActive`
    path: String,
}

#[derive(clap::Parser, Debug)]
struct InitOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// per-kind defaults as JSON, e.g. '{"number": 1, "record": {}}'
    #[arg(long)]
    options: Option<String>,

    /// default for string nodes (overrides --options)
    #[arg(long)]
    string: Option<String>,

    /// default for number nodes (overrides --options)
    #[arg(long, allow_negative_numbers = true)]
    number: Option<f64>,

    /// default for boolean nodes (overrides --options)
    #[arg(long)]
    boolean: Option<bool>,
}

#[derive(clap::Parser, Debug)]
struct DecodeOut {
    #[command(flatten)]
    schema_settings: SchemaSettings,

    /// urlencoded bodies: literal paths or quoted glob patterns; stdin if omitted
    #[arg(long, short, num_args = 1..)]
    input: Vec<String>,

    /// largest bracket index treated as a list position
    #[arg(long)]
    max_index: Option<usize>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl SchemaSettings {
    fn load_schema(&self) -> Result<Schema> {
        schema_forms::load_schema_file(&self.schema)
            .with_context(|| format!("loading schema {}", self.schema.display()))
    }
}

impl InitOut {
    fn initial_value_options(&self) -> Result<InitialValueOptions> {
        let mut options = match self.options.as_deref() {
            Some(src) => schema_forms::path_de::from_str_with_path::<InitialValueOptions>(src)
                .context("parsing --options")?,
            None => InitialValueOptions::default(),
        };
        if let Some(s) = &self.string {
            options.string = s.clone();
        }
        if let Some(n) = self.number {
            options.number = n;
        }
        if let Some(b) = self.boolean {
            options.boolean = b;
        }
        Ok(options)
    }
}

impl DecodeOut {
    fn load_bodies(&self) -> Result<Vec<(String, String)>> {
        if self.input.is_empty() {
            let mut body = String::new();
            std::io::stdin().read_to_string(&mut body).context("reading stdin")?;
            return Ok(vec![("<stdin>".to_string(), body)]);
        }
        let source_paths = resolve_file_path_patterns(&self.input).context("failed to resolve input file paths")?;
        source_paths
            .into_iter()
            .map(|source_path| {
                let label = source_path.to_string_lossy().to_string();
                let body = std::fs::read_to_string(&source_path)
                    .with_context(|| format!("failed to read input file {label}"))?;
                Ok((label, body))
            })
            .collect()
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match self.verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        });
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Pick(target) => {
                let schema = target.schema_settings.load_schema()?;
                let node = schema_forms::pick(&schema, &target.path)?;
                let src = self.render(&serde_json::to_value(node)?)?;
                write_output(target.schema_settings.out.as_deref(), &src)
            }
            Command::Init(target) => {
                let schema = target.schema_settings.load_schema()?;
                let options = target.initial_value_options()?;
                let value = schema_forms::initial_value(&schema, &options);
                let src = self.render(&value.to_json())?;
                write_output(target.schema_settings.out.as_deref(), &src)
            }
            Command::Decode(target) => {
                let schema = target.schema_settings.load_schema()?;
                let options = DecodeOptions {
                    max_index: target.max_index.unwrap_or(DecodeOptions::default().max_index),
                };
                let mut docs = Vec::<String>::new();
                for (label, body) in target.load_bodies()? {
                    tracing::info!(input = %label, bytes = body.len(), "decoding form body");
                    let entries = url::form_urlencoded::parse(body.trim().as_bytes());
                    let value: Value = schema_forms::parse_form_with(&schema, entries, &options);
                    docs.push(self.render(&value.to_json())?);
                }
                if docs.is_empty() {
                    bail!("no input bodies to decode");
                }
                write_output(target.schema_settings.out.as_deref(), &docs.join("\n"))
            }
        }
    }

    fn render(&self, value: &serde_json::Value) -> Result<String> {
        let src = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(src)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn write_output(out: Option<&Path>, src: &str) -> Result<()> {
    match out {
        Some(out) => {
            if let Some(parent) = out.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            std::fs::write(out, src).with_context(|| format!("writing {}", out.display()))
        }
        None => {
            println!("{src}");
            Ok(())
        }
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
