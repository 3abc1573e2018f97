use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use super::verdict::{SessionSummary, Verdict};

/// Body for the combined image+audio analysis call
#[derive(Debug, Serialize)]
struct MultimodalRequest {
    image: String,
    audio: String,
}

/// HTTP client for the remote analysis backend
///
/// One instance per session; cheap to clone (reqwest clients share their
/// connection pool).
#[derive(Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl AnalysisClient {
    pub fn new(base_url: &str, session_id: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            session_id,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    fn endpoint(&self, op: &str) -> String {
        format!(
            "{}/api/exam/gemini/{}/{}",
            self.base_url, op, self.session_id
        )
    }

    /// Submit a base64 still image for analysis
    pub async fn analyze_image(&self, base64_image: &str) -> Result<Verdict> {
        self.post_json(&self.endpoint("analyze-image"), &base64_image)
            .await
            .context("Image analysis request failed")
    }

    /// Submit a base64 audio clip for analysis
    pub async fn analyze_audio(&self, base64_audio: &str) -> Result<Verdict> {
        self.post_json(&self.endpoint("analyze-audio"), &base64_audio)
            .await
            .context("Audio analysis request failed")
    }

    /// Submit an image and an audio clip together
    pub async fn analyze_multimodal(
        &self,
        base64_image: String,
        base64_audio: String,
    ) -> Result<Verdict> {
        let body = MultimodalRequest {
            image: base64_image,
            audio: base64_audio,
        };

        self.post_json(&self.endpoint("analyze-multimodal"), &body)
            .await
            .context("Multimodal analysis request failed")
    }

    /// Fetch the aggregate server-side session summary
    ///
    /// Best-effort: any failure (network, status, parse) is logged and
    /// collapsed to None so callers only have to null-check.
    pub async fn session_summary(&self) -> Option<SessionSummary> {
        let url = self.endpoint("session-summary");

        let result: Result<SessionSummary> = async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .context("Summary request failed")?;

            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("Summary request returned {}", status);
            }

            response
                .json::<SessionSummary>()
                .await
                .context("Failed to parse summary response")
        }
        .await;

        match result {
            Ok(summary) => {
                info!("Session summary: {}", summary.render());
                Some(summary)
            }
            Err(e) => {
                warn!("Failed to get session summary: {:#}", e);
                None
            }
        }
    }

    async fn post_json<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<Verdict> {
        let response = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .context("Request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Analysis endpoint returned {}", status);
        }

        response
            .json::<Verdict>()
            .await
            .context("Failed to parse verdict")
    }
}
