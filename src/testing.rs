use std::cell::Cell;

use crate::api::PortalApi;
use crate::auth::AuthContext;
use crate::decode::Items;
use crate::error::{FetchError, FetchResult};
use crate::models::{Envelope, NotificationPayload, SchedulePayload, StatsPayload};

/// Canned portal responses. `None` stands for a transport failure.
#[derive(Default)]
pub struct FakePortalApi {
    pub stats: Option<Envelope<StatsPayload>>,
    pub notifications: Option<Envelope<Items<NotificationPayload>>>,
    pub schedules: Option<Envelope<Items<SchedulePayload>>>,
    pub calls: Cell<usize>,
}

impl FakePortalApi {
    fn respond<T: Clone>(&self, path: &str, canned: &Option<Envelope<T>>) -> FetchResult<Envelope<T>> {
        self.calls.set(self.calls.get() + 1);
        canned.clone().ok_or_else(|| FetchError::Transport {
            url: path.to_string(),
            reason: "connection refused".to_string(),
        })
    }
}

impl PortalApi for FakePortalApi {
    async fn student_stats(&self, _auth: &AuthContext) -> FetchResult<Envelope<StatsPayload>> {
        self.respond("stats", &self.stats)
    }

    async fn notifications(
        &self,
        _auth: &AuthContext,
    ) -> FetchResult<Envelope<Items<NotificationPayload>>> {
        self.respond("notifications", &self.notifications)
    }

    async fn class_schedules(
        &self,
        _auth: &AuthContext,
    ) -> FetchResult<Envelope<Items<SchedulePayload>>> {
        self.respond("class-schedules", &self.schedules)
    }
}

pub fn notifications(raw: &str) -> Items<NotificationPayload> {
    serde_json::from_str(raw).expect("valid notification fixture")
}

pub fn schedules(raw: &str) -> Items<SchedulePayload> {
    serde_json::from_str(raw).expect("valid schedule fixture")
}
