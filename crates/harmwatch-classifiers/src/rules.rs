//! Rule-based harm classifier
//!
//! Evaluates the category rule table in order, adds a phishing label for
//! URL shorteners, then scores the matched labels:
//!
//! - `labels` keep evaluation order and never repeat
//! - `risk_score` is the sum of label weights
//! - `category` comes from the *first* matched label, not the heaviest one
//! - `why` has one audit clause per finding

use crate::classifier::Classifier;
use crate::patterns::{default_rules, CategoryRule};
use crate::shortlinks::ShortlinkDetector;
use harmwatch_core::types::{EMPTY_AUDIT, NEUTRAL_CATEGORY};
use harmwatch_core::{ClassificationVerdict, HarmLabel, Result, RiskLevel};
use std::fmt;

/// Why a label was assigned
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evidence {
    /// Substring matched by the label's pattern
    Keyword(String),
    /// Shortener domain found in the text
    Shortlink(String),
    /// Shortener domain among the supplied domains
    SuspiciousDomain(String),
}

/// One label with its evidence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub label: HarmLabel,
    pub evidence: Evidence,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.evidence {
            Evidence::Keyword(matched) => write!(f, "{}: '{}'", self.label, matched),
            Evidence::Shortlink(domain) => write!(f, "shortlink domain: {}", domain),
            Evidence::SuspiciousDomain(domain) => write!(f, "suspicious domain: {}", domain),
        }
    }
}

/// Sum of label weights
pub fn risk_score(labels: &[HarmLabel]) -> u32 {
    labels.iter().map(HarmLabel::weight).sum()
}

/// Assemble a verdict from findings in evaluation order
pub fn build_verdict(findings: &[Finding]) -> ClassificationVerdict {
    if findings.is_empty() {
        return ClassificationVerdict::neutral();
    }

    let labels: Vec<HarmLabel> = findings.iter().map(|f| f.label).collect();
    let score = risk_score(&labels);
    let category = labels
        .first()
        .map(|label| label.display_name().to_string())
        .unwrap_or_else(|| NEUTRAL_CATEGORY.to_string());
    let why = findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    ClassificationVerdict {
        labels,
        risk_score: score,
        risk_level: RiskLevel::from_score(score),
        category,
        why: if why.is_empty() { EMPTY_AUDIT.to_string() } else { why },
    }
}

/// Multi-label classifier over a fixed rule table
pub struct RuleClassifier {
    rules: Vec<CategoryRule>,
    shortlinks: ShortlinkDetector,
}

impl RuleClassifier {
    /// Create a classifier with the built-in rule table and shortener list
    pub fn new() -> Result<Self> {
        Ok(Self::with_rules(default_rules()?, ShortlinkDetector::builtin()?))
    }

    /// Create a classifier from a custom rule table
    pub fn with_rules(rules: Vec<CategoryRule>, shortlinks: ShortlinkDetector) -> Self {
        Self { rules, shortlinks }
    }

    /// Findings for `text` in evaluation order, one per label
    pub fn findings(&self, text: &str, domains: &[String]) -> Vec<Finding> {
        let lowered = text.to_lowercase();
        let mut findings: Vec<Finding> = Vec::new();

        for rule in &self.rules {
            if findings.iter().any(|f| f.label == rule.label()) {
                continue;
            }
            if let Some(matched) = rule.find(&lowered) {
                findings.push(Finding {
                    label: rule.label(),
                    evidence: Evidence::Keyword(matched.to_string()),
                });
            }
        }

        let has_phishing = |findings: &[Finding]| {
            findings.iter().any(|f| f.label == HarmLabel::ScamPhishing)
        };

        if !has_phishing(&findings) {
            if let Some(domain) = self.shortlinks.find_in_text(&lowered) {
                findings.push(Finding {
                    label: HarmLabel::ScamPhishing,
                    evidence: Evidence::Shortlink(domain.to_string()),
                });
            }
        }

        if !has_phishing(&findings) {
            if let Some(domain) = domains.iter().find(|d| self.shortlinks.is_shortlink(d)) {
                findings.push(Finding {
                    label: HarmLabel::ScamPhishing,
                    evidence: Evidence::SuspiciousDomain(domain.trim().to_ascii_lowercase()),
                });
            }
        }

        findings
    }
}

impl Classifier for RuleClassifier {
    fn classify(&self, text: &str, domains: &[String]) -> ClassificationVerdict {
        let findings = self.findings(text, domains);
        let verdict = build_verdict(&findings);

        tracing::debug!(
            labels = verdict.labels.len(),
            risk_score = verdict.risk_score,
            risk_level = %verdict.risk_level,
            "classified text"
        );

        verdict
    }

    fn name(&self) -> &str {
        "rule_classifier"
    }
}
