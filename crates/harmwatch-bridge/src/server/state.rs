use crate::config::BridgeConfig;
use crate::hub::BroadcastHub;
use harmwatch_classifiers::Classifier;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct BridgeAppState {
    /// Effective configuration after file and CLI overrides
    pub config: Arc<BridgeConfig>,

    /// Subscriber registry, ingestion and fan-out
    pub hub: Arc<BroadcastHub>,

    /// Handle for rendering `/metrics`; absent when no recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl BridgeAppState {
    pub fn new(config: BridgeConfig, classifier: Arc<dyn Classifier>) -> Self {
        let hub = BroadcastHub::with_options(classifier, config.hub_options());
        Self {
            config: Arc::new(config),
            hub: Arc::new(hub),
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        self.hub.classifier()
    }
}
