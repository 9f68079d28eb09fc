//! Content rules -- trait + built-in heuristics.

use regex::Regex;

use crate::constants::NAME_PUNCTUATION;
use crate::error::{ShieldError, ShieldResult};
use crate::submission::ContentInput;

/// Result of a rule check.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleResult {
    Pass,
    Flag(String),
}

/// Trait for content heuristics.
pub trait Rule: Send + Sync {
    fn name(&self) -> &str;
    fn check(&self, input: &ContentInput<'_>) -> RuleResult;
}

pub(crate) fn compile(pattern: &str) -> ShieldResult<Regex> {
    Regex::new(pattern).map_err(|source| ShieldError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn is_ascii_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

// --- 1: Vowel ratio ---

/// Random keyboard mashing has far fewer vowels than natural text.
pub struct VowelRatioRule {
    pub min_ratio: f64,
    /// Messages this short (in chars) or shorter are skipped.
    pub min_length: usize,
}

impl Rule for VowelRatioRule {
    fn name(&self) -> &str {
        "vowel_ratio"
    }
    fn check(&self, input: &ContentInput<'_>) -> RuleResult {
        let total = input.message.chars().count();
        if total <= self.min_length {
            return RuleResult::Pass;
        }
        let vowels = input.message.chars().filter(|c| is_ascii_vowel(*c)).count();
        let ratio = vowels as f64 / total as f64;
        if ratio < self.min_ratio {
            tracing::debug!(ratio, min = self.min_ratio, "VowelRatio: below minimum");
            RuleResult::Flag(format!(
                "message has suspicious low vowel ratio ({:.1}%)",
                ratio * 100.0
            ))
        } else {
            RuleResult::Pass
        }
    }
}

// --- 2: Consonant clusters ---

pub struct ConsonantClusterRule {
    re: Regex,
}

impl ConsonantClusterRule {
    /// `max_cluster` is the longest allowed run; longer runs fire.
    pub fn new(max_cluster: usize) -> ShieldResult<Self> {
        // Explicit ASCII classes: a case-insensitive class would also pull in
        // Unicode case variants such as U+017F.
        let pattern = format!(
            "[b-df-hj-np-tv-zB-DF-HJ-NP-TV-Z]{{{},}}",
            max_cluster.saturating_add(1)
        );
        Ok(Self { re: compile(&pattern)? })
    }
}

impl Rule for ConsonantClusterRule {
    fn name(&self) -> &str {
        "consonant_cluster"
    }
    fn check(&self, input: &ContentInput<'_>) -> RuleResult {
        let runs: Vec<&str> = self.re.find_iter(input.message).map(|m| m.as_str()).collect();
        if runs.is_empty() {
            return RuleResult::Pass;
        }
        tracing::debug!(count = runs.len(), "ConsonantCluster: runs found");
        RuleResult::Flag(format!(
            "message contains suspicious consonant clusters: {}",
            runs.join(", ")
        ))
    }
}

// --- 3: Digits in name ---

pub struct NameDigitsRule;

impl Rule for NameDigitsRule {
    fn name(&self) -> &str {
        "name_digits"
    }
    fn check(&self, input: &ContentInput<'_>) -> RuleResult {
        if input.name.chars().any(|c| c.is_ascii_digit()) {
            RuleResult::Flag("name contains digits".to_string())
        } else {
            RuleResult::Pass
        }
    }
}

// --- 4: Name punctuation ---

pub struct NamePunctuationRule {
    pub max: usize,
}

impl Rule for NamePunctuationRule {
    fn name(&self) -> &str {
        "name_punctuation"
    }
    fn check(&self, input: &ContentInput<'_>) -> RuleResult {
        let count = input.name.chars().filter(|c| NAME_PUNCTUATION.contains(c)).count();
        if count > self.max {
            RuleResult::Flag(format!("name has excessive punctuation ({} occurrences)", count))
        } else {
            RuleResult::Pass
        }
    }
}

// --- 5: URL count ---

pub struct UrlCountRule {
    pub max: usize,
    re: Regex,
}

impl UrlCountRule {
    pub fn new(max: usize) -> ShieldResult<Self> {
        Ok(Self { max, re: compile(r"(?i-u:https?://)\S+")? })
    }
}

impl Rule for UrlCountRule {
    fn name(&self) -> &str {
        "url_count"
    }
    fn check(&self, input: &ContentInput<'_>) -> RuleResult {
        let count = self.re.find_iter(input.message).count();
        if count > self.max {
            tracing::debug!(count, max = self.max, "UrlCount: exceeded");
            RuleResult::Flag(format!("message contains too many URLs ({})", count))
        } else {
            RuleResult::Pass
        }
    }
}

// --- 6: Keyword patterns ---

/// Ordered spam vocabulary. First hit wins; multiple hits still yield one reason.
pub struct KeywordPatternRule {
    patterns: Vec<Regex>,
}

impl KeywordPatternRule {
    pub fn new<S: AsRef<str>>(sources: &[S]) -> ShieldResult<Self> {
        let patterns = sources
            .iter()
            .map(|s| compile(s.as_ref()))
            .collect::<ShieldResult<Vec<_>>>()?;
        Ok(Self { patterns })
    }
}

impl Rule for KeywordPatternRule {
    fn name(&self) -> &str {
        "keyword_pattern"
    }
    fn check(&self, input: &ContentInput<'_>) -> RuleResult {
        match self.patterns.iter().find(|re| re.is_match(input.message)) {
            Some(re) => {
                tracing::debug!(pattern = %re.as_str(), "KeywordPattern: match found");
                RuleResult::Flag("message contains known spam keywords".to_string())
            }
            None => RuleResult::Pass,
        }
    }
}
