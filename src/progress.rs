use serde::Serialize;
use tracing::{info, warn};

use crate::api::PortalApi;
use crate::auth::AuthContext;
use crate::lifecycle::{Lifecycle, LoadPhase};
use crate::models::{FeedbackItem, ProgressStats};

pub const PROGRESS_WARNING: &str = "Failed to load progress data — showing available data";
pub const FEEDBACK_LIMIT: usize = 5;

#[derive(Debug, Default)]
pub struct ProgressReportView {
    lifecycle: Lifecycle<String>,
    stats: ProgressStats,
    feedback: Vec<FeedbackItem>,
    warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressSnapshot<'a> {
    pub phase: LoadPhase,
    pub stats: &'a ProgressStats,
    pub feedback: &'a [FeedbackItem],
    pub warning: Option<&'a str>,
}

impl ProgressReportView {
    pub fn stats(&self) -> &ProgressStats {
        &self.stats
    }

    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }

    pub fn phase(&self) -> LoadPhase {
        self.lifecycle.phase()
    }

    /// Every retained feedback item, in server order.
    pub fn feedback(&self) -> &[FeedbackItem] {
        &self.feedback
    }

    pub fn visible_feedback(&self) -> &[FeedbackItem] {
        let feedback = self.feedback();
        &feedback[..feedback.len().min(FEEDBACK_LIMIT)]
    }

    pub fn snapshot(&self) -> ProgressSnapshot<'_> {
        ProgressSnapshot {
            phase: self.phase(),
            stats: &self.stats,
            feedback: self.visible_feedback(),
            warning: self.warning(),
        }
    }

    /// Fetches for `identity` unless this identity was already fetched.
    /// Returns whether a fetch ran.
    pub async fn activate<A: PortalApi>(
        &mut self,
        api: &A,
        auth: &AuthContext,
        identity: &str,
    ) -> bool {
        if !self.lifecycle.activate(identity.to_string()) {
            return false;
        }
        self.load(api, auth).await;
        true
    }

    async fn load<A: PortalApi>(&mut self, api: &A, auth: &AuthContext) {
        self.warning = None;

        let (stats, notifications) =
            tokio::join!(api.student_stats(auth), api.notifications(auth));
        let mut failed = false;

        match stats {
            Ok(envelope) if envelope.success => {
                self.stats = envelope.data.map(ProgressStats::from).unwrap_or_default();
            }
            Ok(envelope) => {
                info!(reason = ?envelope.message, "stats request rejected");
            }
            Err(e) => {
                warn!(error = %e, "failed to load student stats");
                failed = true;
            }
        }

        match notifications {
            Ok(envelope) if envelope.success => {
                self.feedback = envelope
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|notification| notification.is_feedback())
                    .map(FeedbackItem::from)
                    .collect();
            }
            Ok(envelope) => {
                info!(reason = ?envelope.message, "notifications request rejected");
            }
            Err(e) => {
                warn!(error = %e, "failed to load notifications");
                failed = true;
            }
        }

        if failed {
            self.warning = Some(PROGRESS_WARNING.to_string());
        }
        self.lifecycle.finish(!failed);
    }
}
