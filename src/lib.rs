//! Form Shield: layered spam protection for contact forms.
//!
//! A submission passes through a decoy (honeypot) field check, a heuristic
//! content filter and a remote captcha verification, in that order; the first
//! failing layer decides the verdict.
//!
//! ```no_run
//! use form_shield::{PipelineConfig, Submission, ValidateOptions, ValidationPipeline};
//!
//! let config = PipelineConfig::from_env()?;
//! let shield = ValidationPipeline::new(config)?;
//! let submission = Submission::new("Ann", "ann@example.com", "Hello!").with_token("tok");
//! let verdict = shield.validate(&submission, &ValidateOptions::default());
//! if let Some(reason) = verdict.reason() {
//!     println!("rejected: {}", reason);
//! }
//! # Ok::<(), form_shield::ShieldError>(())
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod submission;

// Layers
pub mod decoy;
pub mod content;
pub mod verifier;
pub mod pipeline;

pub mod sink;
pub mod sanitize;
pub mod tracing_init;

#[cfg(test)]
pub(crate) mod test_helpers;

// Re-exports for convenience
pub use config::{ContentFilterConfig, DecoyConfig, PipelineConfig, VerificationConfig};
pub use error::{ShieldError, ShieldResult};
pub use pipeline::{Layer, Rejection, StageDetails, ValidateOptions, ValidationPipeline, Verdict};
pub use sanitize::escape_html;
pub use sink::{NoopSink, ShieldSink, TracingSink};
pub use submission::{ContentInput, Submission};
