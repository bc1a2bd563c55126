//! Core types for HarmWatch

use crate::error::{Error, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Origin tag used when a producer does not name one
pub const DEFAULT_SOURCE: &str = "unknown";

/// Primary category reported when no label matched
pub const NEUTRAL_CATEGORY: &str = "Neutral";

/// Audit trail placeholder when no label matched
pub const EMPTY_AUDIT: &str = "—";

/// Current UTC instant as ISO-8601 with a trailing `Z`
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Ingestion body as received from a producer.
///
/// Every field is optional here; [`RawEvent::try_from`] enforces what is
/// actually required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestRequest {
    pub text: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub timestamp: Option<String>,
    pub platform: Option<String>,
    pub url: Option<String>,
}

impl IngestRequest {
    /// Create a request carrying only text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// A validated inbound event.
///
/// Fields are only reachable through accessors, so an event cannot be
/// altered after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    text: String,
    source: String,
    author: Option<String>,
    timestamp: Option<String>,
    platform: Option<String>,
    url: Option<String>,
}

impl RawEvent {
    /// Create an event from text, rejecting blank input
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(Error::invalid_event("text must be a non-empty string"));
        }

        Ok(Self {
            text,
            source: DEFAULT_SOURCE.to_string(),
            author: None,
            timestamp: None,
            platform: None,
            url: None,
        })
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = non_blank(Some(source.into())).unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = non_blank(Some(author.into()));
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = non_blank(Some(timestamp.into()));
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = non_blank(Some(platform.into()));
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = non_blank(Some(url.into()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn platform(&self) -> Option<&str> {
        self.platform.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The producer's timestamp, or the current UTC instant when absent
    pub fn resolve_timestamp(&self) -> String {
        self.timestamp.clone().unwrap_or_else(utc_timestamp)
    }
}

impl TryFrom<IngestRequest> for RawEvent {
    type Error = Error;

    fn try_from(req: IngestRequest) -> Result<Self> {
        let text = req
            .text
            .ok_or_else(|| Error::invalid_event("missing required field: text"))?;

        let mut event = RawEvent::new(text)?;
        event.source = non_blank(req.source).unwrap_or_else(|| DEFAULT_SOURCE.to_string());
        event.author = non_blank(req.author);
        event.timestamp = non_blank(req.timestamp);
        event.platform = non_blank(req.platform);
        event.url = non_blank(req.url);
        Ok(event)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Harm category tag, in pattern evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmLabel {
    HateSpeech,
    Cyberbullying,
    Misinformation,
    PrivacyRisk,
    HackingExploit,
    ScamPhishing,
    MentalHealth,
}

impl HarmLabel {
    /// All labels in evaluation order. The first matched entry of this
    /// order becomes the primary category.
    pub const ALL: [HarmLabel; 7] = [
        HarmLabel::HateSpeech,
        HarmLabel::Cyberbullying,
        HarmLabel::Misinformation,
        HarmLabel::PrivacyRisk,
        HarmLabel::HackingExploit,
        HarmLabel::ScamPhishing,
        HarmLabel::MentalHealth,
    ];

    /// Wire tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HateSpeech => "hate_speech",
            Self::Cyberbullying => "cyberbullying",
            Self::Misinformation => "misinformation",
            Self::PrivacyRisk => "privacy_risk",
            Self::HackingExploit => "hacking_exploit",
            Self::ScamPhishing => "scam_phishing",
            Self::MentalHealth => "mental_health",
        }
    }

    /// Contribution of this label to the risk score
    pub fn weight(&self) -> u32 {
        match self {
            Self::ScamPhishing | Self::HackingExploit | Self::PrivacyRisk => 3,
            Self::HateSpeech | Self::Cyberbullying | Self::Misinformation | Self::MentalHealth => 2,
        }
    }

    /// Human-facing category name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::HateSpeech => "Hate Speech",
            Self::Cyberbullying => "Cyberbullying",
            Self::Misinformation => "Misinformation",
            Self::PrivacyRisk => "Privacy Risk",
            Self::HackingExploit => "Hacking/Exploit",
            Self::ScamPhishing => "Scam/Phishing",
            Self::MentalHealth => "Mental Health Risk",
        }
    }
}

impl fmt::Display for HarmLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk bucket derived from the summed score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// `>= 5` is high, `3..5` is medium, anything lower is low
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 5 => Self::High,
            s if s >= 3 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Full classification result for one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    /// Matched labels in evaluation order, without duplicates
    pub labels: Vec<HarmLabel>,

    /// Sum of label weights
    pub risk_score: u32,

    /// Bucket derived from `risk_score`
    pub risk_level: RiskLevel,

    /// Display name of the first matched label, or "Neutral"
    pub category: String,

    /// "; "-joined audit clauses, never empty
    pub why: String,
}

impl ClassificationVerdict {
    /// Verdict for text with no matches
    pub fn neutral() -> Self {
        Self {
            labels: Vec::new(),
            risk_score: 0,
            risk_level: RiskLevel::Low,
            category: NEUTRAL_CATEGORY.to_string(),
            why: EMPTY_AUDIT.to_string(),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.labels.is_empty()
    }

    /// The label that determined `category`, if any
    pub fn primary_label(&self) -> Option<HarmLabel> {
        self.labels.first().copied()
    }
}

impl Default for ClassificationVerdict {
    fn default() -> Self {
        Self::neutral()
    }
}

/// Event plus verdict, as pushed to every subscriber
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub text: String,
    pub source: String,
    pub author: Option<String>,
    pub timestamp: String,
    pub platform: Option<String>,
    pub url: Option<String>,

    #[serde(flatten)]
    pub verdict: ClassificationVerdict,
}

impl EnrichedEvent {
    /// Combine a validated event with its resolved timestamp and verdict
    pub fn new(event: RawEvent, timestamp: String, verdict: ClassificationVerdict) -> Self {
        Self {
            text: event.text,
            source: event.source,
            author: event.author,
            timestamp,
            platform: event.platform,
            url: event.url,
            verdict,
        }
    }
}
