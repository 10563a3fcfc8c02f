//! Canonicalize a JSON content tree into a translation template.
//!
//! Usage: extract [FILE]
//!
//! Reads the children (a JSON array, or a single node) from FILE or stdin
//! and prints `{"template": ..., "table": ..., "diagnostics": [...]}`.

use anyhow::{Context, Result};
use std::io::Read;
use trans_tree::config::Config;
use trans_tree::trans::{canonicalize, sequence_from_json, Diagnostic};
use tracing::info;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("trans_tree=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;

    let input = match std::env::args().nth(1) {
        Some(path) => {
            std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let value: serde_json::Value =
        serde_json::from_str(&input).context("Input is not valid JSON")?;
    let children = sequence_from_json(value);

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let canonical = canonicalize(&children, &config.keep_set(), &mut diagnostics);
    info!(
        "Extracted template with {} interpolations, {} diagnostics",
        canonical.table.len(),
        diagnostics.len()
    );

    let output = serde_json::json!({
        "template": canonical.template,
        "table": canonical.table,
        "diagnostics": diagnostics.iter().map(ToString::to_string).collect::<Vec<_>>(),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
