//! Heuristic content filter -- runs every rule against name and message.
//!
//! | # | Rule              | Looks at | Fires when                          |
//! |---|-------------------|----------|-------------------------------------|
//! | 1 | VowelRatio        | message  | vowel share below minimum (len > 5) |
//! | 2 | ConsonantCluster  | message  | consonant run longer than maximum   |
//! | 3 | NameDigits        | name     | any digit (unless allowed)          |
//! | 4 | NamePunctuation   | name     | too many `.`, `-`, `_`              |
//! | 5 | UrlCount          | message  | too many http(s) URLs               |
//! | 6 | KeywordPattern    | message  | first spam pattern hit              |
//!
//! No rule short-circuits another: every reason is collected, in table order.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::config::ContentFilterConfig;
use crate::constants::{DEFAULT_SPAM_PATTERNS, MESSAGE_PREVIEW_CHARS, VOWEL_RATIO_MIN_LENGTH};
use crate::error::ShieldResult;
use crate::submission::ContentInput;
use rules::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContentResult {
    pub is_spam: bool,
    pub reasons: Vec<String>,
}

pub struct ContentFilter {
    rules: Vec<Box<dyn Rule>>,
}

impl ContentFilter {
    /// Compile the rule battery. Fails only on an invalid custom pattern.
    pub fn new(config: &ContentFilterConfig) -> ShieldResult<Self> {
        let mut rules: Vec<Box<dyn Rule>> = vec![
            Box::new(VowelRatioRule {
                min_ratio: config.min_vowel_ratio,
                min_length: VOWEL_RATIO_MIN_LENGTH,
            }),
            Box::new(ConsonantClusterRule::new(config.max_consonant_cluster)?),
        ];
        if !config.allow_digits_in_name {
            rules.push(Box::new(NameDigitsRule));
        }
        rules.push(Box::new(NamePunctuationRule { max: config.max_name_punctuation }));
        rules.push(Box::new(UrlCountRule::new(config.max_urls)?));

        let keyword_sources: Vec<&str> = DEFAULT_SPAM_PATTERNS
            .iter()
            .copied()
            .chain(config.custom_patterns.iter().map(String::as_str))
            .collect();
        rules.push(Box::new(KeywordPatternRule::new(keyword_sources.as_slice())?));

        Ok(Self { rules })
    }

    /// Append a rule after the built-in battery.
    pub fn add_rule(&mut self, rule: Box<dyn Rule>) {
        tracing::debug!(rule = rule.name(), "Content rule added");
        self.rules.push(rule);
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn check(&self, input: &ContentInput<'_>) -> ContentResult {
        let reasons: Vec<String> = self
            .rules
            .iter()
            .filter_map(|rule| match rule.check(input) {
                RuleResult::Flag(reason) => Some(reason),
                RuleResult::Pass => None,
            })
            .collect();
        tracing::debug!(
            rules_count = self.rules.len(),
            flagged = reasons.len(),
            message_chars = input.message.chars().count(),
            "Content check"
        );
        ContentResult {
            is_spam: !reasons.is_empty(),
            reasons,
        }
    }
}

/// One-shot check: compiles the rules for `config` and runs them once.
pub fn check(input: &ContentInput<'_>, config: &ContentFilterConfig) -> ShieldResult<ContentResult> {
    Ok(ContentFilter::new(config)?.check(input))
}

/// First `MESSAGE_PREVIEW_CHARS` characters, with `...` when cut.
pub fn message_preview(message: &str) -> String {
    match message.char_indices().nth(MESSAGE_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &message[..cut]),
        None => message.to_string(),
    }
}

pub fn log_spam_detection(result: &ContentResult, input: &ContentInput<'_>) {
    if !result.is_spam {
        return;
    }
    tracing::warn!(
        email = %input.email,
        name = %input.name,
        reasons = %result.reasons.join("; "),
        preview = %message_preview(input.message),
        "[SPAM] Content filter triggered"
    );
}
