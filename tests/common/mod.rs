#![allow(dead_code)]

// Shared test fixture: a stub analysis backend.
//
// Serves the four proctoring endpoints on an ephemeral port, answers every
// analysis call with a canned verdict, and counts requests per endpoint so
// tests can assert on upload cadence.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone)]
pub struct StubState {
    verdict: Arc<serde_json::Value>,
    summary: Arc<serde_json::Value>,
    pub summary_fails: bool,
    pub image_calls: Arc<AtomicUsize>,
    pub audio_calls: Arc<AtomicUsize>,
    pub multimodal_calls: Arc<AtomicUsize>,
}

pub struct StubBackend {
    pub url: String,
    pub state: StubState,
}

#[derive(Debug, Deserialize)]
struct MultimodalBody {
    image: String,
    audio: String,
}

async fn analyze_image(
    State(state): State<StubState>,
    Path(_session_id): Path<String>,
    Json(body): Json<String>,
) -> impl IntoResponse {
    assert!(!body.is_empty(), "image body should be non-empty base64");
    state.image_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.verdict.as_ref().clone())
}

async fn analyze_audio(
    State(state): State<StubState>,
    Path(_session_id): Path<String>,
    Json(body): Json<String>,
) -> impl IntoResponse {
    assert!(!body.is_empty(), "audio body should be non-empty base64");
    state.audio_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.verdict.as_ref().clone())
}

async fn analyze_multimodal(
    State(state): State<StubState>,
    Path(_session_id): Path<String>,
    Json(body): Json<MultimodalBody>,
) -> impl IntoResponse {
    assert!(!body.image.is_empty() && !body.audio.is_empty());
    state.multimodal_calls.fetch_add(1, Ordering::SeqCst);
    Json(state.verdict.as_ref().clone())
}

async fn session_summary(
    State(state): State<StubState>,
    Path(_session_id): Path<String>,
) -> impl IntoResponse {
    if state.summary_fails {
        (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
    } else {
        Json(state.summary.as_ref().clone()).into_response()
    }
}

pub async fn spawn_stub(verdict: serde_json::Value) -> StubBackend {
    spawn_stub_with(verdict, default_summary(), false).await
}

pub async fn spawn_stub_with(
    verdict: serde_json::Value,
    summary: serde_json::Value,
    summary_fails: bool,
) -> StubBackend {
    let state = StubState {
        verdict: Arc::new(verdict),
        summary: Arc::new(summary),
        summary_fails,
        image_calls: Arc::new(AtomicUsize::new(0)),
        audio_calls: Arc::new(AtomicUsize::new(0)),
        multimodal_calls: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new()
        .route(
            "/api/exam/gemini/analyze-image/:session_id",
            post(analyze_image),
        )
        .route(
            "/api/exam/gemini/analyze-audio/:session_id",
            post(analyze_audio),
        )
        .route(
            "/api/exam/gemini/analyze-multimodal/:session_id",
            post(analyze_multimodal),
        )
        .route(
            "/api/exam/gemini/session-summary/:session_id",
            get(session_summary),
        )
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub backend addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub backend serve");
    });

    StubBackend {
        url: format!("http://{}", addr),
        state,
    }
}

pub fn default_summary() -> serde_json::Value {
    serde_json::json!({
        "totalAnalyses": 12,
        "violationCount": 2,
        "overallRisk": "MEDIUM",
        "needsReview": false
    })
}

pub fn clean_verdict() -> serde_json::Value {
    serde_json::json!({
        "violation": false,
        "confidence": 95,
        "riskLevel": "LOW",
        "issues": "No violations detected",
        "recommendation": "Continue monitoring"
    })
}

pub fn violation_verdict() -> serde_json::Value {
    serde_json::json!({
        "violation": true,
        "confidence": 92,
        "riskLevel": "HIGH",
        "issues": "Multiple people detected in frame",
        "recommendation": "Alert proctor immediately"
    })
}
