pub mod check;
pub mod config;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use form_shield::{PipelineConfig, Submission};

/// Resolve pipeline config: explicit TOML file, else environment.
pub fn resolve_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::load(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => PipelineConfig::from_env()
            .context("No --config given and FORM_SHIELD_* environment is incomplete"),
    }
}

/// Read a submission from a JSON file, or stdin when no path is given.
pub fn read_submission(path: Option<&Path>) -> Result<Submission> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read {}", p.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read submission from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("Invalid submission JSON")
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
