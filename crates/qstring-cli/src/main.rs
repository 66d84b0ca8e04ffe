//! `qstring` CLI: parse, render, and normalize query strings.
//!
//! ## Usage
//!
//! ```sh
//! # Query string → JSON object of string arrays (stdin → stdout)
//! echo 'page=1&fields=a&fields=b' | qstring parse
//!
//! # Full URLs are accepted; only the query part is read
//! echo 'https://example.com/search?q=rust+lang' | qstring parse --pretty
//!
//! # JSON object → query string
//! echo '{"page":1,"fields":["a","b"]}' | qstring render
//!
//! # Sort keys and canonicalize escaping
//! qstring normalize -i query.txt -o normalized.txt
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qstring::QueryValues;
use serde_json::Value;
use std::io::{self, Read};
use url::Url;

#[derive(Parser)]
#[command(name = "qstring", version, about = "Query string inspection CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a query string (or URL) into a JSON object of string arrays
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Render a JSON object as a query string
    Render {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Re-encode a query string with sorted keys and canonical escaping
    Normalize {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            input,
            output,
            pretty,
        } => {
            let raw = read_input(input.as_deref())?;
            let values = parse_query(&raw)?;
            let json = if pretty {
                serde_json::to_string_pretty(&values)?
            } else {
                serde_json::to_string(&values)?
            };
            write_output(output.as_deref(), &json)?;
        }
        Commands::Render { input, output } => {
            let raw = read_input(input.as_deref())?;
            let json: Value = serde_json::from_str(&raw).context("Failed to parse JSON input")?;
            let values = values_from_json(&json)?;
            write_output(output.as_deref(), &values.encode())?;
        }
        Commands::Normalize { input, output } => {
            let raw = read_input(input.as_deref())?;
            let values = parse_query(&raw)?;
            write_output(output.as_deref(), &values.encode())?;
        }
    }

    Ok(())
}

/// Accept a bare query, `?query`, or a full URL. Only a scheme ahead of the
/// first `?`, `=` or `&` marks a URL, so raw URLs inside values stay values.
fn parse_query(raw: &str) -> Result<QueryValues> {
    let raw = raw.trim();
    let head = raw.find(['?', '=', '&']).map_or(raw, |end| &raw[..end]);
    if head.contains("://") {
        let url = Url::parse(raw).with_context(|| format!("Failed to parse URL: {}", raw))?;
        return Ok(QueryValues::parse(url.query().unwrap_or_default()));
    }
    Ok(QueryValues::parse(raw))
}

/// Build query values from a JSON object. Values may be strings, numbers,
/// booleans, or arrays of those; `null` binds the key with no values.
fn values_from_json(json: &Value) -> Result<QueryValues> {
    let Value::Object(map) = json else {
        bail!("Expected a JSON object at the top level");
    };

    let mut values = QueryValues::new();
    for (key, value) in map {
        let list = match value {
            Value::Array(items) => items
                .iter()
                .map(|item| scalar_text(key, item))
                .collect::<Result<Vec<_>>>()?,
            Value::Null => Vec::new(),
            other => vec![scalar_text(key, other)?],
        };
        values.insert(key.clone(), list);
    }
    Ok(values)
}

fn scalar_text(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => bail!("Unsupported value for key '{}': {}", key, value),
    }
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
