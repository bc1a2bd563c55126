use clap::Parser;
use harmwatch_bridge::cli::{Cli, Commands};
use harmwatch_bridge::config::BridgeConfig;
use harmwatch_bridge::server::run_server;
use harmwatch_bridge::simulate::{self, SimulateOptions};
use harmwatch_classifiers::{extract_domains, Classifier, RuleClassifier};
use metrics_exporter_prometheus::PrometheusHandle;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            init_tracing(args.verbose);

            let config = BridgeConfig::load(&args.config, &args)?;
            info!("Configuration loaded");
            info!("Send timeout: {}ms", config.send_timeout_ms);
            info!("Subscriber buffer: {}", config.subscriber_buffer);
            if config.cors_allow_any {
                info!("CORS: any origin");
            }

            let metrics_handle = init_metrics()?;

            println!();
            println!("  HarmWatch bridge");
            println!("  Ingest:  POST http://{}:{}/ingest", config.listen, config.port);
            println!("  Stream:  ws://{}:{}/stream", config.listen, config.port);
            println!();

            run_server(config, Some(metrics_handle)).await?;
        }

        Commands::Simulate {
            target,
            interval_ms,
            shuffle,
            verbose,
        } => {
            init_tracing(verbose);

            println!("HarmWatch ingestion simulator");
            println!("  Target: {}", target);
            println!();

            let options = SimulateOptions {
                target,
                interval: Duration::from_millis(interval_ms),
                shuffle,
            };
            let summary = simulate::run(&options).await?;

            println!();
            println!(
                "Simulation completed: {} sent, {} accepted, {} failed",
                summary.sent, summary.accepted, summary.failed
            );
        }

        Commands::Classify { text, verbose } => {
            init_tracing(verbose);

            let classifier = RuleClassifier::new()?;
            let verdict = classifier.classify(&text, &extract_domains(&text));
            println!("{}", serde_json::to_string_pretty(&verdict)?);
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default = if verbose {
        "harmwatch_bridge=debug,harmwatch_classifiers=debug,tower_http=debug"
    } else {
        "harmwatch_bridge=info,harmwatch_classifiers=info,tower_http=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "harmwatch_events_ingested_total",
        "Events accepted, classified and broadcast"
    );
    metrics::describe_counter!(
        "harmwatch_events_rejected_total",
        "Events rejected for missing or blank text"
    );
    metrics::describe_counter!(
        "harmwatch_deliveries_total",
        "Payloads successfully queued to a subscriber"
    );
    metrics::describe_counter!(
        "harmwatch_subscribers_pruned_total",
        "Subscribers removed after a failed delivery"
    );
    metrics::describe_gauge!("harmwatch_subscribers", "Live subscriber connections");
    metrics::describe_histogram!(
        "harmwatch_classify_latency_us",
        metrics::Unit::Microseconds,
        "Classification latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
