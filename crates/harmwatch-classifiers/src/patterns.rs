//! Category rule table
//!
//! One compiled regular expression per harm label, built from a curated
//! keyword/phrase alternation. Every alternation is wrapped in word
//! boundaries and matched case-insensitively.

use harmwatch_core::{Error, HarmLabel, Result};
use regex::{Regex, RegexBuilder};

/// Keyword alternations, in evaluation order.
///
/// Alternation order matters for the audit trail: the regex engine reports
/// the leftmost match, preferring earlier alternatives at the same offset.
pub const DEFAULT_KEYWORDS: [(HarmLabel, &str); 7] = [
    (
        HarmLabel::HateSpeech,
        r"kill yourself|go back|subhuman|ape|monkey|dog|retard|retarded|faggot|slur|scum|racist|terrorist",
    ),
    (
        HarmLabel::Cyberbullying,
        r"you are (?:so )?dumb|nobody likes you|loser|ugly|worthless|kill yourself|idiot|stupid|hate",
    ),
    (
        HarmLabel::Misinformation,
        r"5g.*microchip|flat earth|chemtrails|plandemic|crisis actor|fake news|hoax|misleading",
    ),
    (
        HarmLabel::PrivacyRisk,
        r"share your otp|one time password|ssn|aadhaar|pan number|account number|privacy|expose(?:d)?|doxx?",
    ),
    (
        HarmLabel::HackingExploit,
        r"cve-\d{4}-\d+|zero[- ]day|exploit|payload|rce|priv[- ]?esc|metasploit|hack(?:ed|ing)?|breach",
    ),
    (
        HarmLabel::ScamPhishing,
        r"urgent|verify|kyc|win .* prize|gift card|limited time|act now|bank.*block|click.*link|verify your account|free|prize|win|otp|password|login",
    ),
    (
        HarmLabel::MentalHealth,
        r"hopeless|i hate myself|i want to die|self[- ]harm|cut myself|depress|suicid|lonely",
    ),
];

/// A single label and the pattern that triggers it
#[derive(Debug, Clone)]
pub struct CategoryRule {
    label: HarmLabel,
    regex: Regex,
}

impl CategoryRule {
    /// Compile a rule from a keyword alternation
    pub fn new(label: HarmLabel, keywords: &str) -> Result<Self> {
        let regex = RegexBuilder::new(&format!(r"\b(?:{})\b", keywords))
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                Error::classifier(format!("Failed to compile {} pattern: {}", label, e))
            })?;

        Ok(Self { label, regex })
    }

    pub fn label(&self) -> HarmLabel {
        self.label
    }

    /// First matched substring, if the rule fires anywhere in `text`
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex.find(text).map(|m| m.as_str())
    }
}

/// Compile the built-in rule table
pub fn default_rules() -> Result<Vec<CategoryRule>> {
    DEFAULT_KEYWORDS
        .iter()
        .map(|(label, keywords)| CategoryRule::new(*label, keywords))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_follow_label_order() {
        let rules = default_rules().unwrap();
        let labels: Vec<_> = rules.iter().map(|r| r.label()).collect();
        assert_eq!(labels, HarmLabel::ALL.to_vec());
    }

    #[test]
    fn test_word_boundaries() {
        let rule = CategoryRule::new(HarmLabel::HateSpeech, "ape|dog").unwrap();
        assert_eq!(rule.find("that dog barked"), Some("dog"));
        assert_eq!(rule.find("grape juice"), None);
        assert_eq!(rule.find("dogma"), None);
    }

    #[test]
    fn test_case_insensitive() {
        let rule = CategoryRule::new(HarmLabel::Misinformation, "fake news").unwrap();
        assert_eq!(rule.find("FAKE NEWS everywhere"), Some("FAKE NEWS"));
    }

    #[test]
    fn test_leftmost_match_is_reported() {
        let rules = default_rules().unwrap();
        let scam = rules
            .iter()
            .find(|r| r.label() == HarmLabel::ScamPhishing)
            .unwrap();
        assert_eq!(scam.find("login now for your free prize"), Some("login"));
    }

    #[test]
    fn test_cve_identifier() {
        let rules = default_rules().unwrap();
        let hacking = rules
            .iter()
            .find(|r| r.label() == HarmLabel::HackingExploit)
            .unwrap();
        assert_eq!(hacking.find("new cve-2024-1234 dropped"), Some("cve-2024-1234"));
    }

    #[test]
    fn test_invalid_pattern_is_classifier_error() {
        let err = CategoryRule::new(HarmLabel::HateSpeech, "(unclosed").unwrap_err();
        assert!(matches!(err, Error::Classifier(_)));
    }
}
