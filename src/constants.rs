// === Decoy ===
pub const DEFAULT_DECOY_FIELD: &str = "website";

// === Content filter defaults (overridable via ContentFilterConfig) ===
pub const DEFAULT_MIN_VOWEL_RATIO: f64 = 0.15;
pub const DEFAULT_MAX_CONSONANT_CLUSTER: usize = 5;
pub const DEFAULT_MAX_URLS: usize = 2;
pub const DEFAULT_MAX_NAME_PUNCTUATION: usize = 2;
pub const VOWEL_RATIO_MIN_LENGTH: usize = 5; // ratio only checked above this many chars
pub const NAME_PUNCTUATION: &[char] = &['.', '-', '_'];
pub const MESSAGE_PREVIEW_CHARS: usize = 100;

/// Built-in keyword patterns, evaluated before any custom pattern.
///
/// Word boundaries and case folding are ASCII-only (`-u`): `viagraé` still hits,
/// `caſino` does not.
pub const DEFAULT_SPAM_PATTERNS: &[&str] = &[
    r"(?i)(?-u:\b)(?:(?-u:viagra|cialis|casino|lottery|winner)|(?-u:congratulations).*(?-u:won))(?-u:\b)",
    r"(?i)(?-u:\b)(?:(?-u:crypto).*(?-u:invest)|(?-u:bitcoin).*(?-u:opportunity)|(?-u:nft).*(?-u:sale))(?-u:\b)",
];

// === Verification service ===
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;
pub const SITEVERIFY_PATH: &str = "siteverify";

// === Env overrides ===
pub const ENV_API_ENDPOINT: &str = "FORM_SHIELD_API_ENDPOINT";
pub const ENV_SITE_KEY: &str = "FORM_SHIELD_SITE_KEY";
pub const ENV_SECRET_KEY: &str = "FORM_SHIELD_SECRET_KEY";
pub const ENV_DECOY_FIELD: &str = "FORM_SHIELD_DECOY_FIELD";
pub const ENV_TIMEOUT_SECS: &str = "FORM_SHIELD_TIMEOUT_SECS";
