use super::samples::sample_posts;
use anyhow::{bail, Context};
use harmwatch_core::types::utc_timestamp;
use rand::seq::SliceRandom;
use std::time::Duration;
use tracing::debug;

/// Simulator settings
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Base URL of the bridge, e.g. `http://127.0.0.1:8000`
    pub target: String,

    /// Pause after each post
    pub interval: Duration,

    /// Post samples in random order
    pub shuffle: bool,
}

/// Per-run tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SimulateSummary {
    pub sent: usize,
    pub accepted: usize,
    pub failed: usize,
}

/// Check the bridge is up, then post every sample once
pub async fn run(options: &SimulateOptions) -> anyhow::Result<SimulateSummary> {
    let base = options.target.trim_end_matches('/');
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;

    let health: serde_json::Value = client
        .get(format!("{}/health", base))
        .send()
        .await
        .with_context(|| format!("cannot reach bridge at {}", base))?
        .error_for_status()?
        .json()
        .await?;
    println!("Bridge is healthy: {}", health);

    let mut posts = sample_posts();
    if options.shuffle {
        posts.shuffle(&mut rand::thread_rng());
    }

    let mut summary = SimulateSummary::default();
    for (i, mut post) in posts.into_iter().enumerate() {
        post.timestamp = Some(utc_timestamp());
        let preview: String = post.text.as_deref().unwrap_or_default().chars().take(50).collect();

        summary.sent += 1;
        match client.post(format!("{}/ingest", base)).json(&post).send().await {
            Ok(response) if response.status().is_success() => {
                summary.accepted += 1;
                println!("Ingested post {}: {}...", i + 1, preview);
            }
            Ok(response) => {
                summary.failed += 1;
                println!("Failed to ingest post {}: {}", i + 1, response.status());
            }
            Err(e) => {
                summary.failed += 1;
                println!("Error ingesting post {}: {}", i + 1, e);
            }
        }

        if !options.interval.is_zero() {
            tokio::time::sleep(options.interval).await;
        }
    }

    debug!(?summary, "Simulation finished");
    if summary.accepted == 0 && summary.sent > 0 {
        bail!("bridge accepted none of {} posts", summary.sent);
    }
    Ok(summary)
}
