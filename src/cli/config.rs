use anyhow::{Context, Result};
use form_shield::{PipelineConfig, VerificationConfig};

/// `config`: print a TOML skeleton with every default filled in.
pub fn run_show() -> Result<()> {
    let skeleton = PipelineConfig::new(VerificationConfig::new(
        "https://cap.example.com",
        "<site-key>",
        "<secret-key>",
    ));
    let rendered = toml::to_string_pretty(&skeleton).context("Failed to render config")?;
    print!("{}", rendered);
    Ok(())
}
