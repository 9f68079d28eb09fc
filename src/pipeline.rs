//! Validation pipeline -- decoy, content, token presence, captcha.
//!
//! Gates run in that order and the first rejection ends the run. Gates 1-3 are
//! pure text checks; only the captcha gate touches the network. A pipeline is
//! immutable after construction and can be shared across threads.

use serde::Serialize;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::PipelineConfig;
use crate::content::rules::Rule;
use crate::content::{ContentFilter, ContentResult};
use crate::decoy::{self, DecoyMetadata, DecoyResult};
use crate::error::ShieldResult;
use crate::sink::{NoopSink, ShieldSink};
use crate::submission::{ContentInput, Submission};
use crate::verifier::{HttpTransport, TokenVerifier, VerificationResult};

pub const TOKEN_REQUIRED: &str = "captcha token is required";
pub const CAPTCHA_FAILED: &str = "captcha verification failed";

// ============================================================================
// VERDICT
// ============================================================================

/// Gate that rejected a submission.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Decoy,
    Content,
    Captcha,
}

impl Layer {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Decoy => "decoy",
            Self::Content => "content",
            Self::Captcha => "captcha",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw stage output attached to a rejection.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum StageDetails {
    Decoy(DecoyResult),
    Content(ContentResult),
    Captcha(VerificationResult),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Rejection {
    pub layer: Layer,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<StageDetails>,
}

/// Final outcome. Serializes as `{"valid": true}` or
/// `{"valid": false, "layer": .., "reason": .., "details": ..}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "VerdictRecord")]
pub enum Verdict {
    Valid,
    Rejected(Rejection),
}

#[derive(Serialize)]
struct VerdictRecord {
    valid: bool,
    #[serde(flatten)]
    rejection: Option<Rejection>,
}

impl From<Verdict> for VerdictRecord {
    fn from(v: Verdict) -> Self {
        match v {
            Verdict::Valid => Self { valid: true, rejection: None },
            Verdict::Rejected(r) => Self { valid: false, rejection: Some(r) },
        }
    }
}

impl Verdict {
    fn reject(layer: Layer, reason: impl Into<String>, details: Option<StageDetails>) -> Self {
        Verdict::Rejected(Rejection { layer, reason: reason.into(), details })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Valid => None,
            Verdict::Rejected(r) => Some(r),
        }
    }

    pub fn layer(&self) -> Option<Layer> {
        self.rejection().map(|r| r.layer)
    }

    pub fn reason(&self) -> Option<&str> {
        self.rejection().map(|r| r.reason.as_str())
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

/// Per-call options.
#[derive(Debug, Clone)]
pub struct ValidateOptions<'a> {
    /// Report rejections to the sink.
    pub log: bool,
    /// Client address, attached to decoy reports.
    pub ip: Option<&'a str>,
}

impl Default for ValidateOptions<'_> {
    fn default() -> Self {
        Self { log: true, ip: None }
    }
}

impl ValidateOptions<'_> {
    pub fn silent() -> Self {
        Self { log: false, ip: None }
    }
}

pub struct ValidationPipeline {
    config: PipelineConfig,
    filter: ContentFilter,
    verifier: TokenVerifier,
    sink: Arc<dyn ShieldSink>,
}

impl ValidationPipeline {
    /// Validate config, compile content rules, wire the default ureq transport.
    pub fn new(config: PipelineConfig) -> ShieldResult<Self> {
        config.validate()?;
        let filter = ContentFilter::new(&config.content_filter)?;
        let verifier = TokenVerifier::new(config.verification.clone());
        tracing::debug!(
            decoy_field = %config.decoy.field_name,
            rules = ?filter.rule_names(),
            "Validation pipeline ready"
        );
        Ok(Self { config, filter, verifier, sink: Arc::new(NoopSink) })
    }

    pub fn with_sink(mut self, sink: Arc<dyn ShieldSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.verifier = TokenVerifier::with_transport(self.config.verification.clone(), transport);
        self
    }

    /// Extra content rule, run after the configured ones.
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.filter.add_rule(rule);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn decoy_field(&self) -> &str {
        &self.config.decoy.field_name
    }

    /// Run every gate in order; the first rejection wins.
    pub fn validate(&self, submission: &Submission, options: &ValidateOptions<'_>) -> Verdict {
        let field = self.decoy_field();

        // Gate 1: decoy
        let decoy_result = self.check_decoy(submission.field(field));
        if decoy_result.triggered {
            if options.log {
                let meta = DecoyMetadata {
                    email: Some(submission.email.as_str()),
                    name: Some(submission.name.as_str()),
                    ip: options.ip,
                };
                self.notify(|sink| sink.decoy_triggered(&decoy_result, &meta));
            }
            return Verdict::reject(
                Layer::Decoy,
                format!("decoy field '{}' was filled", field),
                Some(StageDetails::Decoy(decoy_result)),
            );
        }

        // Gate 2: content
        let input = submission.content();
        let content_result = self.check_content(&input);
        if content_result.is_spam {
            if options.log {
                self.notify(|sink| sink.content_flagged(&content_result, &input));
            }
            return Verdict::reject(
                Layer::Content,
                content_result.reasons.join(", "),
                Some(StageDetails::Content(content_result)),
            );
        }

        // Gate 3: token presence
        let token = match submission.token() {
            Some(t) => t,
            None => return Verdict::reject(Layer::Captcha, TOKEN_REQUIRED, None),
        };

        // Gate 4: captcha
        let captcha_result = self.verify_captcha(token);
        if !captcha_result.success {
            if options.log {
                self.notify(|sink| sink.captcha_failed(&captcha_result, &submission.email));
            }
            let reason = captcha_result
                .error
                .clone()
                .unwrap_or_else(|| CAPTCHA_FAILED.to_string());
            return Verdict::reject(Layer::Captcha, reason, Some(StageDetails::Captcha(captcha_result)));
        }

        tracing::info!(email = %submission.email, "Submission accepted");
        Verdict::Valid
    }

    /// Decoy gate alone, against the configured field name.
    pub fn check_decoy(&self, value: Option<&str>) -> DecoyResult {
        decoy::check(value, self.decoy_field())
    }

    /// Content gate alone.
    pub fn check_content(&self, input: &ContentInput<'_>) -> ContentResult {
        self.filter.check(input)
    }

    /// Captcha gate alone. Makes the remote call even for an empty token.
    pub fn verify_captcha(&self, token: &str) -> VerificationResult {
        self.verifier.verify(token)
    }

    fn notify<F>(&self, f: F)
    where
        F: FnOnce(&dyn ShieldSink),
    {
        let sink = self.sink.as_ref();
        if catch_unwind(AssertUnwindSafe(|| f(sink))).is_err() {
            tracing::warn!("Sink panicked while reporting a rejection; ignored");
        }
    }
}

impl std::fmt::Debug for ValidationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
