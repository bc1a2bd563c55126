//! The `/stream` WebSocket endpoint, driven by a real client

use futures_util::{SinkExt, StreamExt};
use harmwatch_bridge::config::BridgeConfig;
use harmwatch_bridge::server::{build_app, BridgeAppState};
use harmwatch_classifiers::RuleClassifier;
use harmwatch_core::IngestRequest;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tokio_tungstenite::{connect_async, tungstenite::Message};

async fn spawn_server() -> (BridgeAppState, SocketAddr) {
    let state = BridgeAppState::new(
        BridgeConfig::default(),
        Arc::new(RuleClassifier::new().unwrap()),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = build_app(state.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (state, addr)
}

async fn wait_for_clients(state: &BridgeAppState, expected: usize) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while state.hub.health().clients != expected {
        assert!(
            Instant::now() < deadline,
            "expected {} clients, have {}",
            expected,
            state.hub.health().clients
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn test_subscriber_receives_enriched_events() {
    let (state, addr) = spawn_server().await;
    let (mut ws, _) = connect_async(format!("ws://{}/stream", addr)).await.unwrap();
    wait_for_clients(&state, 1).await;

    // Keepalives and junk from the dashboard must not end the connection
    ws.send(Message::Text("ready".to_string())).await.unwrap();
    ws.send(Message::Text("hello there".to_string())).await.unwrap();
    ws.send(Message::Text(r#"{"type":"hello"}"#.to_string())).await.unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(state.hub.health().clients, 1);

    let receipt = state
        .hub
        .ingest(IngestRequest::text("Claim your free prize"))
        .await
        .unwrap();
    assert_eq!(receipt.report.delivered, 1);

    let frame = timeout(Duration::from_secs(2), ws.next())
        .await
        .expect("event within timeout")
        .expect("stream open")
        .unwrap();
    let text = match frame {
        Message::Text(text) => text,
        other => panic!("expected a text frame, got {:?}", other),
    };
    let event: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(event["text"], "Claim your free prize");
    assert_eq!(event["category"], "Scam/Phishing");
    assert_eq!(event["risk_level"], "medium");
    assert_eq!(event["source"], "unknown");
}

#[tokio::test]
async fn test_events_over_http_reach_socket_in_order() {
    let (state, addr) = spawn_server().await;
    let (mut ws, _) = connect_async(format!("ws://{}/stream", addr)).await.unwrap();
    wait_for_clients(&state, 1).await;

    let client = reqwest::Client::new();
    for i in 0..5 {
        let response = client
            .post(format!("http://{}/ingest", addr))
            .json(&serde_json::json!({ "text": format!("post {i}"), "source": "reddit" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 200);
    }

    for i in 0..5 {
        let frame = timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("event within timeout")
            .expect("stream open")
            .unwrap();
        let event: serde_json::Value = serde_json::from_str(frame.to_text().unwrap()).unwrap();
        assert_eq!(event["text"], format!("post {i}"));
        assert_eq!(event["source"], "reddit");
    }
}

#[tokio::test]
async fn test_closing_socket_releases_subscriber() {
    let (state, addr) = spawn_server().await;
    let (mut first, _) = connect_async(format!("ws://{}/stream", addr)).await.unwrap();
    let (_second, _) = connect_async(format!("ws://{}/stream", addr)).await.unwrap();
    wait_for_clients(&state, 2).await;

    first.close(None).await.unwrap();
    wait_for_clients(&state, 1).await;

    let receipt = state.hub.ingest(IngestRequest::text("still here?")).await.unwrap();
    assert_eq!(receipt.report.delivered, 1);
    assert_eq!(receipt.report.pruned, 0);
}
