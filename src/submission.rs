use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// One contact-form submission as received from the client.
///
/// The decoy field is not a fixed member: it is looked up by its configured
/// name in `extra_fields`, which collects every key not listed here. Extra
/// values keep their JSON type; only strings are read back as field text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Submission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, alias = "capToken", skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra_fields: HashMap<String, Value>,
}

impl Submission {
    pub fn new(name: &str, email: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
            ..Self::default()
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn with_field(mut self, key: &str, value: &str) -> Self {
        self.extra_fields.insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Text of an extra (non-core) form field. Non-string values read as absent.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.extra_fields.get(key).and_then(Value::as_str)
    }

    /// Token, if present and non-empty.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn content(&self) -> ContentInput<'_> {
        ContentInput {
            name: &self.name,
            email: &self.email,
            message: &self.message,
        }
    }
}

/// The text-bearing part of a submission, as seen by the content filter.
#[derive(Debug, Clone, Copy)]
pub struct ContentInput<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub message: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_collects_extra_fields() {
        let json = r#"{"name":"Ann","email":"ann@example.com","message":"hi","capToken":"tok","website":"spam.example"}"#;
        let s: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(s.token(), Some("tok"));
        assert_eq!(s.field("website"), Some("spam.example"));
        assert_eq!(s.field("name"), None);
    }

    #[test]
    fn test_token_key_and_missing_fields() {
        let s: Submission = serde_json::from_str(r#"{"token":""}"#).unwrap();
        assert_eq!(s.token(), None);
        assert!(s.name.is_empty());
        assert!(s.extra_fields.is_empty());
    }

    #[test]
    fn test_non_string_extra_fields_are_kept_but_not_text() {
        let json = r#"{"name":"Ann","message":"hi","website":null,"consent":true,"age":42}"#;
        let s: Submission = serde_json::from_str(json).unwrap();
        assert_eq!(s.field("website"), None);
        assert_eq!(s.field("consent"), None);
        assert_eq!(s.extra_fields.get("age"), Some(&Value::from(42)));
        assert!(!crate::decoy::check(s.field("website"), "website").triggered);
    }
}
