//! Observer sinks -- where gate rejections get reported.
//!
//! Every method has a no-op default so a sink only implements the events it
//! cares about. Sinks must not block; the pipeline isolates panics but not hangs.

use crate::content::{self, ContentResult};
use crate::decoy::{self, DecoyMetadata, DecoyResult};
use crate::submission::ContentInput;
use crate::verifier::VerificationResult;

pub trait ShieldSink: Send + Sync {
    fn decoy_triggered(&self, _result: &DecoyResult, _meta: &DecoyMetadata<'_>) {}
    fn content_flagged(&self, _result: &ContentResult, _input: &ContentInput<'_>) {}
    fn captcha_failed(&self, _result: &VerificationResult, _email: &str) {}
}

/// Drops every event. Default for a new pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl ShieldSink for NoopSink {}

/// Emits structured `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ShieldSink for TracingSink {
    fn decoy_triggered(&self, result: &DecoyResult, meta: &DecoyMetadata<'_>) {
        decoy::log_decoy_trigger(result, meta);
    }

    fn content_flagged(&self, result: &ContentResult, input: &ContentInput<'_>) {
        content::log_spam_detection(result, input);
    }

    fn captcha_failed(&self, result: &VerificationResult, email: &str) {
        tracing::warn!(
            email = %email,
            error = result.error.as_deref().unwrap_or_default(),
            "[SPAM] Captcha verification failed"
        );
    }
}
