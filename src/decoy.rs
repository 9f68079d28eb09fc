//! Decoy (honeypot) field check.
//!
//! The form renders a field humans never see. Bots filling every input give
//! themselves away by putting anything non-blank in it.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoyResult {
    pub triggered: bool,
    pub field_name: String,
    /// Offending value, only kept when triggered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Context attached to a decoy log line.
#[derive(Debug, Clone, Default)]
pub struct DecoyMetadata<'a> {
    pub email: Option<&'a str>,
    pub name: Option<&'a str>,
    pub ip: Option<&'a str>,
}

pub fn check(value: Option<&str>, field_name: &str) -> DecoyResult {
    let value = value.filter(|v| !v.trim().is_empty());
    DecoyResult {
        triggered: value.is_some(),
        field_name: field_name.to_string(),
        value: value.map(str::to_string),
    }
}

pub fn log_decoy_trigger(result: &DecoyResult, metadata: &DecoyMetadata<'_>) {
    if !result.triggered {
        return;
    }
    tracing::warn!(
        field = %result.field_name,
        value = result.value.as_deref().unwrap_or_default(),
        email = metadata.email.unwrap_or_default(),
        name = metadata.name.unwrap_or_default(),
        ip = metadata.ip,
        "[SPAM] Decoy field triggered"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_empty_and_blank_do_not_trigger() {
        for value in [None, Some(""), Some("   "), Some("\t\n")] {
            let r = check(value, "website");
            assert!(!r.triggered, "value {:?} should not trigger", value);
            assert_eq!(r.value, None);
            assert_eq!(r.field_name, "website");
        }
    }

    #[test]
    fn test_text_triggers_and_keeps_raw_value() {
        let r = check(Some("  http://spam.example "), "homepage");
        assert!(r.triggered);
        assert_eq!(r.field_name, "homepage");
        assert_eq!(r.value.as_deref(), Some("  http://spam.example "));
    }

    #[test]
    fn test_log_is_noop_when_clean() {
        let r = check(None, "website");
        log_decoy_trigger(&r, &DecoyMetadata::default());
    }
}
