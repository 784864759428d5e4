//! Schema checker and type catalogue.
//!
//! Provides commands for:
//! - Validating a schema file before the server loads it
//! - Listing the registered field types and their limits

mod cli;

use std::fmt::Write;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use cli::{Cli, Commands};
use zenform_core::config::{EngineConfig, Schema};
use zenform_core::types::TypeRegistry;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { schema, json } => {
            debug!(path = %schema.display(), "Checking schema");
            let built = EngineConfig::load(&schema)
                .and_then(|config| config.build())
                .with_context(|| format!("Schema {} is invalid", schema.display()))?;
            if json {
                let tables: Vec<_> = built.tables.iter().map(|def| &def.table).collect();
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                print!("{}", describe_schema(&built));
            }
        }
        Commands::Types { json } => {
            let registry = TypeRegistry::builtin()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&registry.descriptors())?);
            } else {
                print!("{}", describe_types(&registry));
            }
        }
    }

    Ok(())
}

/// Human-readable summary of every table in a built schema.
fn describe_schema(schema: &Schema) -> String {
    let mut out = String::new();
    for def in &schema.tables {
        let _ = writeln!(out, "{} (key: {})", def.table.name, def.table.key().name);
        for field in def.table.fields() {
            let _ = writeln!(out, "  {:<20} {:<18} {}", field.name, field.tag.as_str(), field.label);
        }
        for (field, labels) in &def.option_sets {
            let _ = writeln!(out, "  options for {}: {}", field, labels.len());
        }
    }
    out
}

/// One line per registered type: tag, legacy tag, widget and upload limit.
fn describe_types(registry: &TypeRegistry) -> String {
    let mut out = String::new();
    for descriptor in registry.descriptors() {
        let limit = descriptor
            .max_bytes()
            .map(|b| b.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<18} {:<8} {:<40} {}",
            descriptor.tag.as_str(),
            descriptor.tag.legacy_tag(),
            format!("{:?}", descriptor.widget),
            limit
        );
    }
    out
}
