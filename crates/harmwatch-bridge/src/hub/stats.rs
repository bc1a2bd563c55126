use harmwatch_core::{ClassificationVerdict, RiskLevel};
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;

/// Running totals over accepted events
pub struct IngestStats {
    inner: RwLock<StatsInner>,
}

#[derive(Default)]
struct StatsInner {
    events_total: u64,
    flagged_total: u64,
    by_category: BTreeMap<String, u64>,
    by_label: BTreeMap<String, u64>,
    by_risk_level: RiskLevelCounts,
    last_event_at: Option<String>,
}

/// Events per risk bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskLevelCounts {
    pub low: u64,
    pub medium: u64,
    pub high: u64,
}

/// Point-in-time copy of [`IngestStats`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub events_total: u64,
    pub flagged_total: u64,
    pub by_category: BTreeMap<String, u64>,
    pub by_label: BTreeMap<String, u64>,
    pub by_risk_level: RiskLevelCounts,
    pub last_event_at: Option<String>,
}

impl IngestStats {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StatsInner::default()),
        }
    }

    /// Record one accepted event
    pub fn record(&self, verdict: &ClassificationVerdict, timestamp: &str) {
        let mut inner = self.inner.write();

        inner.events_total += 1;
        if !verdict.is_neutral() {
            inner.flagged_total += 1;
        }

        *inner.by_category.entry(verdict.category.clone()).or_insert(0) += 1;
        for label in &verdict.labels {
            *inner.by_label.entry(label.as_str().to_string()).or_insert(0) += 1;
        }

        match verdict.risk_level {
            RiskLevel::Low => inner.by_risk_level.low += 1,
            RiskLevel::Medium => inner.by_risk_level.medium += 1,
            RiskLevel::High => inner.by_risk_level.high += 1,
        }

        inner.last_event_at = Some(timestamp.to_string());
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.read();
        StatsSnapshot {
            events_total: inner.events_total,
            flagged_total: inner.flagged_total,
            by_category: inner.by_category.clone(),
            by_label: inner.by_label.clone(),
            by_risk_level: inner.by_risk_level,
            last_event_at: inner.last_event_at.clone(),
        }
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}
