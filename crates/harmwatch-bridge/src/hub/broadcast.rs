//! Ingestion and fan-out
//!
//! [`BroadcastHub`] validates and classifies each inbound event, then pushes
//! the enriched record to every live subscriber. A broadcast holds the
//! registry lock from first send to prune, so two broadcasts never interleave
//! and a connect or disconnect lands either before or after a given event.

use super::registry::{
    ConnectionId, Payload, SubscriberHandle, SubscriberRegistry, Subscription,
};
use super::stats::{IngestStats, StatsSnapshot};
use futures_util::future::join_all;
use harmwatch_classifiers::{domain_of, extract_domains, Classifier};
use harmwatch_core::{EnrichedEvent, IngestRequest, RawEvent, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

/// Tunables for subscriber delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubOptions {
    /// Upper bound on a single send to one subscriber
    pub send_timeout: Duration,

    /// Payloads buffered per subscriber before sends start waiting
    pub subscriber_buffer: usize,
}

impl Default for HubOptions {
    fn default() -> Self {
        Self {
            send_timeout: Duration::from_millis(2000),
            subscriber_buffer: 64,
        }
    }
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub pruned: usize,
}

/// Accepted event and its delivery outcome
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub event: EnrichedEvent,
    pub report: BroadcastReport,
}

/// Liveness body served on `GET /health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub clients: usize,
}

pub struct BroadcastHub {
    registry: Mutex<SubscriberRegistry>,
    client_count: AtomicUsize,
    classifier: Arc<dyn Classifier>,
    stats: IngestStats,
    options: HubOptions,
}

impl BroadcastHub {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self::with_options(classifier, HubOptions::default())
    }

    pub fn with_options(classifier: Arc<dyn Classifier>, options: HubOptions) -> Self {
        Self {
            registry: Mutex::new(SubscriberRegistry::new()),
            client_count: AtomicUsize::new(0),
            classifier,
            stats: IngestStats::new(),
            options,
        }
    }

    pub fn options(&self) -> HubOptions {
        self.options
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// Register a new subscriber. It receives every event broadcast after
    /// this returns, and nothing from before.
    pub async fn connect(&self) -> Subscription {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(self.options.subscriber_buffer.max(1));
        let mut subscription = Subscription::new(id, rx);

        let clients = {
            let mut registry = self.registry.lock().await;
            registry.insert(id, SubscriberHandle::new(tx));
            self.sync_count(&registry)
        };

        subscription.open();
        info!(connection = %id, clients, "Subscriber connected");
        subscription
    }

    /// Remove a subscriber. Unknown or already-removed ids return `false`.
    pub async fn disconnect(&self, id: ConnectionId) -> bool {
        let mut registry = self.registry.lock().await;
        let connected_at = registry.get(&id).map(SubscriberHandle::connected_at);
        let removed = registry.remove(&id);
        let clients = self.sync_count(&registry);
        drop(registry);

        if let Some(connected_at) = connected_at {
            let secs = (chrono::Utc::now() - connected_at).num_seconds();
            info!(connection = %id, clients, connected_secs = secs, "Subscriber disconnected");
        }
        removed
    }

    /// Validate, classify and fan out one producer event
    pub async fn ingest(&self, request: IngestRequest) -> Result<IngestReceipt> {
        let event = match RawEvent::try_from(request) {
            Ok(event) => event,
            Err(e) => {
                metrics::counter!("harmwatch_events_rejected_total").increment(1);
                warn!(error = %e, "Rejected event");
                return Err(e);
            }
        };

        let timestamp = event.resolve_timestamp();
        let domains = collect_domains(&event);

        let started = Instant::now();
        let verdict = self.classifier.classify(event.text(), &domains);
        metrics::histogram!("harmwatch_classify_latency_us")
            .record(started.elapsed().as_micros() as f64);

        debug!(
            source = event.source(),
            category = %verdict.category,
            risk = %verdict.risk_level,
            score = verdict.risk_score,
            "Classified event"
        );

        let enriched = EnrichedEvent::new(event, timestamp, verdict);
        self.stats.record(&enriched.verdict, &enriched.timestamp);
        metrics::counter!("harmwatch_events_ingested_total").increment(1);

        let report = self.broadcast(&enriched).await?;
        Ok(IngestReceipt {
            event: enriched,
            report,
        })
    }

    /// Push one event to every live subscriber.
    ///
    /// Every subscriber's send starts at once, so a pass takes at most one
    /// send timeout however many subscribers stall. Subscribers whose send
    /// fails are pruned once the pass completes; the rest are unaffected.
    pub async fn broadcast(&self, event: &EnrichedEvent) -> Result<BroadcastReport> {
        let payload: Payload = Arc::from(serde_json::to_string(event)?);

        let mut registry = self.registry.lock().await;
        let timeout = self.options.send_timeout;

        // Sends run side by side so stalled subscribers time out together
        let results = join_all(registry.iter().map(|(id, handle)| {
            let payload = payload.clone();
            async move { (*id, handle.deliver(payload, timeout).await) }
        }))
        .await;

        let mut dead = Vec::new();
        let mut delivered = 0;
        for (id, result) in results {
            match result {
                Ok(()) => delivered += 1,
                Err(e) => {
                    debug!(connection = %id, error = %e, "Delivery failed");
                    dead.push(id);
                }
            }
        }

        let pruned = registry.prune(&dead);
        let clients = self.sync_count(&registry);
        drop(registry);

        metrics::counter!("harmwatch_deliveries_total").increment(delivered as u64);
        if pruned > 0 {
            metrics::counter!("harmwatch_subscribers_pruned_total").increment(pruned as u64);
            info!(pruned, clients, "Pruned dead subscribers");
        }

        Ok(BroadcastReport { delivered, pruned })
    }

    /// Current subscriber count without waiting on an in-flight broadcast
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok",
            clients: self.client_count.load(Ordering::Acquire),
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub async fn is_connected(&self, id: ConnectionId) -> bool {
        self.registry.lock().await.contains(&id)
    }

    fn sync_count(&self, registry: &SubscriberRegistry) -> usize {
        let clients = registry.len();
        self.client_count.store(clients, Ordering::Release);
        metrics::gauge!("harmwatch_subscribers").set(clients as f64);
        clients
    }
}

/// Domains referenced by the text plus the event's own url
fn collect_domains(event: &RawEvent) -> Vec<String> {
    let mut domains = extract_domains(event.text());
    if let Some(domain) = event.url().and_then(domain_of) {
        if !domains.contains(&domain) {
            domains.push(domain);
        }
    }
    domains
}

impl std::fmt::Debug for BroadcastHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastHub")
            .field("classifier", &self.classifier.name())
            .field("clients", &self.client_count.load(Ordering::Relaxed))
            .field("options", &self.options)
            .finish()
    }
}
