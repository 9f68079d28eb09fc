//! Shared test utilities: submission builder, fake transport and sinks.
//!
//! Available only under `#[cfg(test)]`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::{PipelineConfig, VerificationConfig};
use crate::content::rules::{Rule, RuleResult};
use crate::content::ContentResult;
use crate::decoy::{DecoyMetadata, DecoyResult};
use crate::error::{ShieldError, ShieldResult};
use crate::sink::ShieldSink;
use crate::submission::{ContentInput, Submission};
use crate::verifier::{HttpReply, HttpTransport, VerificationResult};

pub fn test_config() -> PipelineConfig {
    PipelineConfig::new(VerificationConfig::new("https://cap.example.com", "site-1", "s3cret"))
}

// ============================================================================
// SubmissionBuilder
// ============================================================================

pub struct SubmissionBuilder {
    submission: Submission,
}

impl SubmissionBuilder {
    pub fn new() -> Self {
        Self {
            submission: Submission::new("", "", "").with_token("tok-valid"),
        }
    }

    /// Innocuous submission that passes every local gate.
    pub fn clean() -> Self {
        Self::new()
            .name("Ann Smith")
            .email("ann@example.com")
            .message("Hello, could you send me a quote for the garden project? Thanks!")
    }

    pub fn name(mut self, n: &str) -> Self {
        self.submission.name = n.to_string();
        self
    }

    pub fn email(mut self, e: &str) -> Self {
        self.submission.email = e.to_string();
        self
    }

    pub fn message(mut self, m: &str) -> Self {
        self.submission.message = m.to_string();
        self
    }

    pub fn token(mut self, t: &str) -> Self {
        self.submission.token = Some(t.to_string());
        self
    }

    pub fn no_token(mut self) -> Self {
        self.submission.token = None;
        self
    }

    pub fn field(mut self, key: &str, value: &str) -> Self {
        self.submission = self.submission.with_field(key, value);
        self
    }

    /// Extra field holding a non-string JSON value.
    pub fn raw_field(mut self, key: &str, value: serde_json::Value) -> Self {
        self.submission.extra_fields.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Submission {
        self.submission
    }
}

// ============================================================================
// CountingRule
// ============================================================================

/// Content rule that counts how often it runs. Share `calls()` before boxing.
pub struct CountingRule {
    result: RuleResult,
    calls: Arc<AtomicUsize>,
}

impl CountingRule {
    pub fn passing() -> Self {
        Self { result: RuleResult::Pass, calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn flagging(reason: &str) -> Self {
        Self { result: RuleResult::Flag(reason.to_string()), calls: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl Rule for CountingRule {
    fn name(&self) -> &str {
        "counting"
    }
    fn check(&self, _input: &ContentInput<'_>) -> RuleResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

// ============================================================================
// StubTransport
// ============================================================================

/// Canned transport: returns one fixed reply (or error) and records requests.
pub struct StubTransport {
    reply: Result<HttpReply, String>,
    calls: AtomicUsize,
    last: Mutex<Option<(String, Vec<u8>)>>,
}

impl StubTransport {
    pub fn reply(status: u16, body: &str) -> Self {
        Self::with(Ok(HttpReply { status, body: body.to_string() }))
    }

    pub fn failing(error: &str) -> Self {
        Self::with(Err(error.to_string()))
    }

    fn with(reply: Result<HttpReply, String>) -> Self {
        Self { reply, calls: AtomicUsize::new(0), last: Mutex::new(None) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, Vec<u8>)> {
        self.last.lock().unwrap().clone()
    }
}

impl HttpTransport for StubTransport {
    fn post_json(&self, url: &str, body: &[u8]) -> ShieldResult<HttpReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some((url.to_string(), body.to_vec()));
        self.reply.clone().map_err(ShieldError::Transport)
    }
}

// ============================================================================
// Sinks
// ============================================================================

/// Counts every observer event.
#[derive(Default)]
pub struct RecordingSink {
    decoy: AtomicUsize,
    content: AtomicUsize,
    captcha: AtomicUsize,
    last_ip: Mutex<Option<String>>,
}

impl RecordingSink {
    pub fn decoy(&self) -> usize {
        self.decoy.load(Ordering::SeqCst)
    }

    pub fn content(&self) -> usize {
        self.content.load(Ordering::SeqCst)
    }

    pub fn captcha(&self) -> usize {
        self.captcha.load(Ordering::SeqCst)
    }

    pub fn total(&self) -> usize {
        self.decoy() + self.content() + self.captcha()
    }

    pub fn last_ip(&self) -> Option<String> {
        self.last_ip.lock().unwrap().clone()
    }
}

impl ShieldSink for RecordingSink {
    fn decoy_triggered(&self, _result: &DecoyResult, meta: &DecoyMetadata<'_>) {
        self.decoy.fetch_add(1, Ordering::SeqCst);
        *self.last_ip.lock().unwrap() = meta.ip.map(str::to_string);
    }

    fn content_flagged(&self, _result: &ContentResult, _input: &ContentInput<'_>) {
        self.content.fetch_add(1, Ordering::SeqCst);
    }

    fn captcha_failed(&self, _result: &VerificationResult, _email: &str) {
        self.captcha.fetch_add(1, Ordering::SeqCst);
    }
}

/// Sink that panics on decoy reports.
pub struct PanickingSink;

impl ShieldSink for PanickingSink {
    fn decoy_triggered(&self, _result: &DecoyResult, _meta: &DecoyMetadata<'_>) {
        panic!("sink failure");
    }
}
