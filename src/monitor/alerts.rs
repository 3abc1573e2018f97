use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use super::stats::MonitorStats;
use crate::analysis::{AnalysisKind, Verdict};

/// A violation alert ready for display
#[derive(Debug, Clone)]
pub struct ViolationAlert {
    pub kind: AnalysisKind,
    pub confidence_pct: u8,
    pub risk_level: String,
    pub detail: String,
}

impl ViolationAlert {
    pub fn from_verdict(kind: AnalysisKind, verdict: &Verdict) -> Self {
        Self {
            kind,
            confidence_pct: verdict.confidence_pct(),
            risk_level: verdict.risk_level_or_default().as_str().to_string(),
            detail: verdict.detail().to_string(),
        }
    }

    /// Banner text shown to the candidate
    pub fn render(&self) -> String {
        format!(
            "{} Alert: {}% confident. Risk Level: {}. {}",
            self.kind.label(),
            self.confidence_pct,
            self.risk_level,
            self.detail
        )
    }
}

/// Where the monitor surfaces state changes to the page
///
/// The monitor never renders anything itself; it pushes events through this
/// seam and whatever owns the page decides how to draw them.
#[async_trait::async_trait]
pub trait UiSink: Send + Sync {
    /// Monitoring has started (confirmation banner)
    async fn monitor_started(&self);

    /// A violation was recorded (transient alert banner)
    async fn violation_alert(&self, alert: ViolationAlert);

    /// The stats readout should be refreshed
    async fn stats_updated(&self, stats: MonitorStats);
}

#[derive(Debug, Clone)]
struct Banner {
    id: Uuid,
    text: String,
}

struct UiStateInner {
    banners: Mutex<Vec<Banner>>,
    stats: Mutex<MonitorStats>,
    alert_dismiss: Duration,
    banner_dismiss: Duration,
}

/// Default in-memory UI surface
///
/// Keeps the current stats snapshot and the list of visible banners; each
/// banner is removed again by a spawned timer after its dismiss interval.
#[derive(Clone)]
pub struct UiState {
    inner: Arc<UiStateInner>,
}

impl UiState {
    pub fn new(alert_dismiss: Duration, banner_dismiss: Duration) -> Self {
        Self {
            inner: Arc::new(UiStateInner {
                banners: Mutex::new(Vec::new()),
                stats: Mutex::new(MonitorStats::default()),
                alert_dismiss,
                banner_dismiss,
            }),
        }
    }

    /// Texts of the banners currently visible
    pub async fn visible_banners(&self) -> Vec<String> {
        let banners = self.inner.banners.lock().await;
        banners.iter().map(|b| b.text.clone()).collect()
    }

    /// Latest stats snapshot pushed by the monitor
    pub async fn stats(&self) -> MonitorStats {
        self.inner.stats.lock().await.clone()
    }

    async fn show(&self, text: String, dismiss_after: Duration) {
        let id = Uuid::new_v4();

        {
            let mut banners = self.inner.banners.lock().await;
            banners.push(Banner {
                id,
                text: text.clone(),
            });
        }

        info!("UI banner: {}", text);

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            let mut banners = inner.banners.lock().await;
            banners.retain(|b| b.id != id);
        });
    }
}

#[async_trait::async_trait]
impl UiSink for UiState {
    async fn monitor_started(&self) {
        let dismiss = self.inner.banner_dismiss;
        self.show("Proctoring Active".to_string(), dismiss).await;
    }

    async fn violation_alert(&self, alert: ViolationAlert) {
        let dismiss = self.inner.alert_dismiss;
        self.show(alert.render(), dismiss).await;
    }

    async fn stats_updated(&self, stats: MonitorStats) {
        let mut current = self.inner.stats.lock().await;
        *current = stats;
    }
}
