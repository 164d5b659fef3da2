use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::AuthContext;
use crate::decode::Items;
use crate::error::{FetchError, FetchResult};
use crate::models::{Envelope, NotificationPayload, SchedulePayload, StatsPayload};

pub const STATS_PATH: &str = "/api/student-profile/stats";
pub const NOTIFICATIONS_PATH: &str = "/api/notifications";
pub const SCHEDULES_PATH: &str = "/api/class-schedules?published=true";

/// Read-only portal endpoints the views depend on.
#[allow(async_fn_in_trait)]
pub trait PortalApi {
    async fn student_stats(&self, auth: &AuthContext) -> FetchResult<Envelope<StatsPayload>>;

    async fn notifications(
        &self,
        auth: &AuthContext,
    ) -> FetchResult<Envelope<Items<NotificationPayload>>>;

    async fn class_schedules(
        &self,
        auth: &AuthContext,
    ) -> FetchResult<Envelope<Items<SchedulePayload>>>;
}

pub struct HttpPortalApi {
    client: Client,
    base: String,
}

impl HttpPortalApi {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("student-portal/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: &AuthContext,
    ) -> FetchResult<Envelope<T>> {
        let url = self.url(path);
        debug!(%url, "fetching");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, auth.bearer())
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        // Rejections (403 and friends) still carry a JSON envelope.
        match serde_json::from_str::<Envelope<T>>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(FetchError::Transport {
                url,
                reason: format!("status {status}"),
            }),
            Err(e) => Err(FetchError::Decode {
                url,
                reason: e.to_string(),
            }),
        }
    }
}

impl PortalApi for HttpPortalApi {
    async fn student_stats(&self, auth: &AuthContext) -> FetchResult<Envelope<StatsPayload>> {
        self.get_envelope(STATS_PATH, auth).await
    }

    async fn notifications(
        &self,
        auth: &AuthContext,
    ) -> FetchResult<Envelope<Items<NotificationPayload>>> {
        self.get_envelope(NOTIFICATIONS_PATH, auth).await
    }

    async fn class_schedules(
        &self,
        auth: &AuthContext,
    ) -> FetchResult<Envelope<Items<SchedulePayload>>> {
        self.get_envelope(SCHEDULES_PATH, auth).await
    }
}
