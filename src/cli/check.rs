use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use form_shield::content::ContentFilter;
use form_shield::verifier::TokenVerifier;
use form_shield::{decoy, ContentFilterConfig, TracingSink, ValidateOptions, ValidationPipeline};

use super::{print_json, read_submission, resolve_config};

/// `check`: full pipeline. Returns whether the submission was accepted.
pub fn run(config: Option<&Path>, input: Option<&Path>, ip: Option<&str>, log: bool) -> Result<bool> {
    let cfg = resolve_config(config)?;
    let submission = read_submission(input)?;
    let pipeline = ValidationPipeline::new(cfg)
        .context("Invalid pipeline configuration")?
        .with_sink(Arc::new(TracingSink));

    let verdict = pipeline.validate(&submission, &ValidateOptions { log, ip });
    print_json(&verdict)?;
    Ok(verdict.is_valid())
}

/// `content`: content filter only. Config is optional here.
pub fn run_content(config: Option<&Path>, input: Option<&Path>) -> Result<bool> {
    let filter_cfg = match config {
        Some(_) => resolve_config(config)?.content_filter,
        None => ContentFilterConfig::default(),
    };
    let submission = read_submission(input)?;
    let filter = ContentFilter::new(&filter_cfg).context("Invalid content filter configuration")?;

    let result = filter.check(&submission.content());
    print_json(&result)?;
    Ok(!result.is_spam)
}

/// `decoy`: decoy field only.
pub fn run_decoy(field: &str, input: Option<&Path>) -> Result<bool> {
    let submission = read_submission(input)?;
    let result = decoy::check(submission.field(field), field);
    print_json(&result)?;
    Ok(!result.triggered)
}

/// `verify`: captcha token only.
pub fn run_verify(token: &str, config: Option<&Path>) -> Result<bool> {
    let cfg = resolve_config(config)?;
    let result = TokenVerifier::new(cfg.verification).verify(token);
    print_json(&result)?;
    Ok(result.success)
}
