//! HarmWatch Classifiers
//!
//! Rule-based harm classification for short social-media style posts.
//!
//! Classification is a pure function of the text and the URL domains it
//! references: no shared state, no I/O, safe to call concurrently. A verdict
//! carries:
//! - every matched harm label, in rule-table order
//! - a weighted risk score and its derived risk level
//! - a primary display category and a human-readable audit trail

pub mod classifier;
pub mod domains;
pub mod patterns;
pub mod rules;
pub mod shortlinks;

pub use classifier::Classifier;
pub use domains::{domain_of, extract_domains, is_social_media_url};
pub use patterns::{default_rules, CategoryRule};
pub use rules::{build_verdict, risk_score, Evidence, Finding, RuleClassifier};
pub use shortlinks::{ShortlinkDetector, SHORTLINK_DOMAINS};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::Classifier;
    pub use crate::domains::extract_domains;
    pub use crate::rules::RuleClassifier;
}
