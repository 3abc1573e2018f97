// Integration tests for the analysis backend client.
//
// Each test runs against a stub axum backend on an ephemeral port; the
// client is exercised over real HTTP.

use anyhow::Result;
use exam_monitor::{AnalysisClient, RiskLevel};
use std::sync::atomic::Ordering;

mod common;

#[tokio::test]
async fn analyze_image_round_trips_verdict() -> Result<()> {
    let stub = common::spawn_stub(common::violation_verdict()).await;
    let client = AnalysisClient::new(&stub.url, "exam-test-1".to_string());

    let verdict = client.analyze_image("aGVsbG8=").await?;

    assert!(verdict.is_violation());
    assert_eq!(verdict.confidence_pct(), 92);
    assert_eq!(verdict.risk_level_or_default(), RiskLevel::High);
    assert_eq!(verdict.detail(), "Multiple people detected in frame");
    assert_eq!(stub.state.image_calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn analyze_audio_round_trips_verdict() -> Result<()> {
    let stub = common::spawn_stub(common::clean_verdict()).await;
    let client = AnalysisClient::new(&stub.url, "exam-test-2".to_string());

    let verdict = client.analyze_audio("c291bmQ=").await?;

    assert!(!verdict.is_violation());
    assert_eq!(verdict.risk_level_or_default(), RiskLevel::Low);
    assert_eq!(stub.state.audio_calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn multimodal_sends_image_and_audio_fields() -> Result<()> {
    // The stub deserializes {"image": ..., "audio": ...} strictly; a wrong
    // body shape would 422 and fail this call.
    let stub = common::spawn_stub(common::clean_verdict()).await;
    let client = AnalysisClient::new(&stub.url, "exam-test-3".to_string());

    let verdict = client
        .analyze_multimodal("aW1n".to_string(), "YXVkaW8=".to_string())
        .await?;

    assert!(!verdict.is_violation());
    assert_eq!(stub.state.multimodal_calls.load(Ordering::SeqCst), 1);

    Ok(())
}

#[tokio::test]
async fn verdict_with_missing_fields_degrades_gracefully() -> Result<()> {
    // Backend responses are untrusted; an empty object is still a verdict
    let stub = common::spawn_stub(serde_json::json!({})).await;
    let client = AnalysisClient::new(&stub.url, "exam-test-4".to_string());

    let verdict = client.analyze_image("aGVsbG8=").await?;

    assert!(!verdict.is_violation());
    assert_eq!(verdict.confidence_pct(), 0);
    assert_eq!(verdict.risk_level_or_default(), RiskLevel::Medium);
    assert_eq!(verdict.detail(), "Suspicious activity detected");

    Ok(())
}

#[tokio::test]
async fn out_of_range_confidence_is_clamped() -> Result<()> {
    let stub = common::spawn_stub(serde_json::json!({
        "violation": true,
        "confidence": 250
    }))
    .await;
    let client = AnalysisClient::new(&stub.url, "exam-test-5".to_string());

    let verdict = client.analyze_image("aGVsbG8=").await?;
    assert_eq!(verdict.confidence_pct(), 100);

    Ok(())
}

#[tokio::test]
async fn session_summary_parses_server_fields() -> Result<()> {
    let stub = common::spawn_stub(common::clean_verdict()).await;
    let client = AnalysisClient::new(&stub.url, "exam-test-6".to_string());

    let summary = client.session_summary().await.expect("summary available");

    assert_eq!(summary.total_analyses, 12);
    assert_eq!(summary.violation_count, 2);
    assert_eq!(summary.overall_risk, Some(RiskLevel::Medium));
    assert!(!summary.needs_review);
    assert!(summary.render().contains("review=no"));

    Ok(())
}

#[tokio::test]
async fn session_summary_returns_none_on_server_error() {
    let stub = common::spawn_stub_with(
        common::clean_verdict(),
        common::default_summary(),
        true, // summary endpoint answers 500
    )
    .await;
    let client = AnalysisClient::new(&stub.url, "exam-test-7".to_string());

    assert!(client.session_summary().await.is_none());
}

#[tokio::test]
async fn session_summary_returns_none_when_unreachable() {
    // Nothing is listening here
    let client = AnalysisClient::new("http://127.0.0.1:1", "exam-test-8".to_string());

    assert!(client.session_summary().await.is_none());
}
