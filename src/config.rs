//! Pipeline configuration: decoy field, content thresholds, verification service.
//!
//! Built once at process start and shared read-only by every validation.
//! Sources, in order of preference:
//!   - a TOML file (`PipelineConfig::load`)
//!   - environment variables (`PipelineConfig::from_env`)
//!
//! Only the `[verification]` section is mandatory; everything else falls back
//! to the defaults in `constants.rs`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::*;
use crate::error::{ShieldError, ShieldResult};

// ============================================================================
// DECOY
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecoyConfig {
    /// Name of the hidden field looked up in `Submission::extra_fields`.
    pub field_name: String,
}

impl Default for DecoyConfig {
    fn default() -> Self {
        Self {
            field_name: DEFAULT_DECOY_FIELD.to_string(),
        }
    }
}

// ============================================================================
// CONTENT FILTER
// ============================================================================

/// Thresholds for the heuristic content filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContentFilterConfig {
    /// Messages with fewer vowels than this fraction are flagged.
    pub min_vowel_ratio: f64,
    /// Longest allowed run of consonants; a run one longer fires.
    pub max_consonant_cluster: usize,
    pub max_urls: usize,
    pub allow_digits_in_name: bool,
    /// Max occurrences of `.`, `-`, `_` in the name.
    pub max_name_punctuation: usize,
    /// Extra regex sources, evaluated after the built-in keyword patterns.
    pub custom_patterns: Vec<String>,
}

impl Default for ContentFilterConfig {
    fn default() -> Self {
        Self {
            min_vowel_ratio: DEFAULT_MIN_VOWEL_RATIO,
            max_consonant_cluster: DEFAULT_MAX_CONSONANT_CLUSTER,
            max_urls: DEFAULT_MAX_URLS,
            allow_digits_in_name: false,
            max_name_punctuation: DEFAULT_MAX_NAME_PUNCTUATION,
            custom_patterns: Vec::new(),
        }
    }
}

// ============================================================================
// VERIFICATION SERVICE
// ============================================================================

/// Descriptor of the remote captcha service. No sensible default exists.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationConfig {
    /// Base URL, e.g. `https://cap.example.com`. Trailing slashes are ignored.
    pub api_endpoint: String,
    pub site_key: String,
    pub secret_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_VERIFY_TIMEOUT_SECS
}

impl VerificationConfig {
    pub fn new(api_endpoint: &str, site_key: &str, secret_key: &str) -> Self {
        Self {
            api_endpoint: api_endpoint.to_string(),
            site_key: site_key.to_string(),
            secret_key: secret_key.to_string(),
            timeout_secs: DEFAULT_VERIFY_TIMEOUT_SECS,
        }
    }
}

// Secret stays out of logs.
impl std::fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("api_endpoint", &self.api_endpoint)
            .field("site_key", &self.site_key)
            .field("secret_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PipelineConfig {
    #[serde(default)]
    pub decoy: DecoyConfig,
    #[serde(default)]
    pub content_filter: ContentFilterConfig,
    pub verification: VerificationConfig,
}

impl PipelineConfig {
    pub fn new(verification: VerificationConfig) -> Self {
        Self {
            decoy: DecoyConfig::default(),
            content_filter: ContentFilterConfig::default(),
            verification,
        }
    }

    pub fn from_toml_str(content: &str) -> ShieldResult<Self> {
        let cfg: PipelineConfig = toml::from_str(content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> ShieldResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), decoy_field = %cfg.decoy.field_name, "Config loaded");
        Ok(cfg)
    }

    /// Build from `FORM_SHIELD_*` environment variables.
    pub fn from_env() -> ShieldResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env, secrets store, test map).
    pub fn from_lookup<F>(lookup: F) -> ShieldResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> ShieldResult<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ShieldError::MissingConfig(key.to_string()))
        };

        let mut verification = VerificationConfig::new(
            &required(ENV_API_ENDPOINT)?,
            &required(ENV_SITE_KEY)?,
            &required(ENV_SECRET_KEY)?,
        );
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            verification.timeout_secs = raw.trim().parse().map_err(|_| {
                ShieldError::InvalidConfig(format!("{} is not a number: '{}'", ENV_TIMEOUT_SECS, raw))
            })?;
        }

        let mut cfg = Self::new(verification);
        if let Some(field) = lookup(ENV_DECOY_FIELD).filter(|v| !v.trim().is_empty()) {
            cfg.decoy.field_name = field.trim().to_string();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject configurations that cannot produce meaningful verdicts.
    pub fn validate(&self) -> ShieldResult<()> {
        let v = &self.verification;
        if v.api_endpoint.trim().is_empty() {
            return Err(ShieldError::MissingConfig("verification.api_endpoint".into()));
        }
        if v.site_key.trim().is_empty() {
            return Err(ShieldError::MissingConfig("verification.site_key".into()));
        }
        if v.secret_key.trim().is_empty() {
            return Err(ShieldError::MissingConfig("verification.secret_key".into()));
        }
        if v.timeout_secs == 0 {
            return Err(ShieldError::InvalidConfig("verification.timeout_secs must be > 0".into()));
        }
        let ratio = self.content_filter.min_vowel_ratio;
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            return Err(ShieldError::InvalidConfig(format!(
                "content_filter.min_vowel_ratio must be within [0, 1], got {}",
                ratio
            )));
        }
        if self.decoy.field_name.trim().is_empty() {
            return Err(ShieldError::InvalidConfig("decoy.field_name must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    const MINIMAL: &str = r#"
[verification]
api_endpoint = "https://cap.example.com"
site_key = "site-1"
secret_key = "s3cret"
"#;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let cfg = PipelineConfig::from_toml_str(MINIMAL).unwrap();
        assert_eq!(cfg.decoy.field_name, "website");
        assert_eq!(cfg.content_filter, ContentFilterConfig::default());
        assert_eq!(cfg.verification.timeout_secs, DEFAULT_VERIFY_TIMEOUT_SECS);
    }

    #[test]
    fn test_full_toml_overrides() {
        let src = r#"
[decoy]
field_name = "homepage"

[content_filter]
min_vowel_ratio = 0.2
max_urls = 5
allow_digits_in_name = true
custom_patterns = ["(?i)seo services"]

[verification]
api_endpoint = "https://cap.example.com"
site_key = "site-1"
secret_key = "s3cret"
timeout_secs = 3
"#;
        let cfg = PipelineConfig::from_toml_str(src).unwrap();
        assert_eq!(cfg.decoy.field_name, "homepage");
        assert!((cfg.content_filter.min_vowel_ratio - 0.2).abs() < 1e-9);
        assert_eq!(cfg.content_filter.max_urls, 5);
        assert_eq!(cfg.content_filter.max_consonant_cluster, 5);
        assert!(cfg.content_filter.allow_digits_in_name);
        assert_eq!(cfg.content_filter.custom_patterns, vec!["(?i)seo services"]);
        assert_eq!(cfg.verification.timeout_secs, 3);
    }

    #[test]
    fn test_missing_verification_section_fails() {
        let err = PipelineConfig::from_toml_str("[decoy]\nfield_name = \"x\"\n").unwrap_err();
        assert!(matches!(err, ShieldError::ConfigParse(_)));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let src = MINIMAL.replace("s3cret", "  ");
        let err = PipelineConfig::from_toml_str(&src).unwrap_err();
        assert!(matches!(err, ShieldError::MissingConfig(ref k) if k == "verification.secret_key"));
    }

    #[test]
    fn test_vowel_ratio_out_of_range_rejected() {
        let mut cfg = PipelineConfig::from_toml_str(MINIMAL).unwrap();
        cfg.content_filter.min_vowel_ratio = 1.5;
        assert!(matches!(cfg.validate(), Err(ShieldError::InvalidConfig(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let cfg = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(cfg.verification.site_key, "site-1");
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PipelineConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ShieldError::Io(_)));
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (ENV_API_ENDPOINT, "https://cap.example.com"),
            (ENV_SITE_KEY, "site-1"),
            (ENV_SECRET_KEY, "s3cret"),
            (ENV_DECOY_FIELD, "url"),
            (ENV_TIMEOUT_SECS, "4"),
        ]
        .into_iter()
        .collect();
        let cfg = PipelineConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(cfg.decoy.field_name, "url");
        assert_eq!(cfg.verification.timeout_secs, 4);
    }

    #[test]
    fn test_from_lookup_missing_key() {
        let err = PipelineConfig::from_lookup(|k| {
            (k == ENV_API_ENDPOINT).then(|| "https://cap.example.com".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ShieldError::MissingConfig(ref k) if k == ENV_SITE_KEY));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let v = VerificationConfig::new("https://cap.example.com", "site-1", "s3cret");
        let dbg = format!("{:?}", v);
        assert!(!dbg.contains("s3cret"));
        assert!(dbg.contains("<redacted>"));
    }
}
