//! URL shortener detection
//!
//! Shortened links hide their destination and are treated as an
//! independent phishing signal.

use aho_corasick::{AhoCorasick, MatchKind};
use harmwatch_core::{Error, Result};

/// Known URL shortener domains
pub const SHORTLINK_DOMAINS: [&str; 11] = [
    "bit.ly",
    "tinyurl.com",
    "t.co",
    "goo.gl",
    "ow.ly",
    "is.gd",
    "buff.ly",
    "cutt.ly",
    "rb.gy",
    "s.id",
    "t.ly",
];

/// Substring and exact-domain matcher over a shortener list
pub struct ShortlinkDetector {
    automaton: AhoCorasick,
    domains: Vec<String>,
}

impl ShortlinkDetector {
    /// Build a detector for the given domains
    pub fn new<I, S>(domains: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let domains: Vec<String> = domains
            .into_iter()
            .map(|d| d.as_ref().trim().to_ascii_lowercase())
            .filter(|d| !d.is_empty())
            .collect();

        // Leftmost-longest so "bit.ly" is reported rather than the "t.ly" inside it.
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::LeftmostLongest)
            .ascii_case_insensitive(true)
            .build(&domains)
            .map_err(|e| Error::classifier(format!("Failed to build shortlink matcher: {}", e)))?;

        Ok(Self { automaton, domains })
    }

    /// Detector for [`SHORTLINK_DOMAINS`]
    pub fn builtin() -> Result<Self> {
        Self::new(SHORTLINK_DOMAINS)
    }

    /// First shortener domain appearing anywhere in `text`
    pub fn find_in_text(&self, text: &str) -> Option<&str> {
        self.automaton
            .find(text)
            .map(|m| self.domains[m.pattern().as_usize()].as_str())
    }

    /// Whether `domain` is exactly one of the shortener domains
    pub fn is_shortlink(&self, domain: &str) -> bool {
        let domain = domain.trim();
        self.domains.iter().any(|d| d.eq_ignore_ascii_case(domain))
    }

    pub fn domains(&self) -> &[String] {
        &self.domains
    }
}
