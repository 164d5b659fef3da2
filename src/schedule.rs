use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::error;

use crate::api::PortalApi;
use crate::auth::AuthContext;
use crate::lifecycle::{Lifecycle, LoadPhase};
use crate::models::{DateGroup, ScheduleEntry};

pub const SCHEDULE_FETCH_ERROR: &str = "Failed to fetch class schedules";

#[derive(Debug, Default)]
pub struct ScheduleView {
    lifecycle: Lifecycle<()>,
    schedules: Vec<ScheduleEntry>,
    error: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ScheduleState<'a> {
    Loading,
    Error(&'a str),
    Content(Vec<DateGroup>),
}

impl ScheduleView {
    pub fn phase(&self) -> LoadPhase {
        self.lifecycle.phase()
    }

    pub fn schedules(&self) -> &[ScheduleEntry] {
        &self.schedules
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Fetches published schedules once per mount.
    pub async fn activate<A: PortalApi>(&mut self, api: &A, auth: &AuthContext) -> bool {
        if !self.lifecycle.activate(()) {
            return false;
        }

        match api.class_schedules(auth).await {
            Ok(envelope) if envelope.success => {
                self.schedules = envelope
                    .data
                    .unwrap_or_default()
                    .into_iter()
                    .map(ScheduleEntry::from)
                    .collect();
                self.lifecycle.finish(true);
            }
            Ok(envelope) => {
                self.error = Some(
                    envelope
                        .message
                        .unwrap_or_else(|| SCHEDULE_FETCH_ERROR.to_string()),
                );
                self.lifecycle.finish(false);
            }
            Err(e) => {
                error!(error = %e, "error fetching class schedules");
                self.error = Some(SCHEDULE_FETCH_ERROR.to_string());
                self.lifecycle.finish(false);
            }
        }
        true
    }

    /// Derived on every render, so the result moves as `now` advances.
    pub fn state(&self, now: DateTime<Utc>) -> ScheduleState<'_> {
        match self.phase() {
            LoadPhase::Idle | LoadPhase::Loading => ScheduleState::Loading,
            LoadPhase::Failed => {
                ScheduleState::Error(self.error().unwrap_or(SCHEDULE_FETCH_ERROR))
            }
            LoadPhase::Loaded => ScheduleState::Content(upcoming_groups(self.schedules(), now)),
        }
    }
}

/// Entries dated at or after `now`, grouped by calendar day in ascending
/// order. Entries keep their server order within a day.
pub fn upcoming_groups(entries: &[ScheduleEntry], now: DateTime<Utc>) -> Vec<DateGroup> {
    let mut by_day: BTreeMap<NaiveDate, Vec<ScheduleEntry>> = BTreeMap::new();

    for entry in entries.iter().filter(|entry| entry.date >= now) {
        by_day
            .entry(entry.date.date_naive())
            .or_default()
            .push(entry.clone());
    }

    by_day
        .into_iter()
        .map(|(day, entries)| DateGroup { day, entries })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Envelope;
    use crate::testing::{schedules, FakePortalApi};
    use chrono::TimeZone;

    fn entry(id: &str, date: DateTime<Utc>) -> ScheduleEntry {
        ScheduleEntry {
            id: id.to_string(),
            date,
            start_time: "09:00".to_string(),
            end_time: "10:00".to_string(),
            batch_name: "Batch A".to_string(),
            batch_level: "Beginner".to_string(),
            topic: None,
            location: "Room 1".to_string(),
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn drops_past_entries_and_sorts_days_ascending() {
        let now = at(5, 12);
        let entries = vec![
            entry("late", at(20, 9)),
            entry("past", at(1, 9)),
            entry("today-earlier", at(5, 8)),
            entry("soon-b", at(9, 15)),
            entry("today-later", at(5, 18)),
            entry("soon-a", at(9, 10)),
        ];

        let groups = upcoming_groups(&entries, now);

        let days: Vec<NaiveDate> = groups.iter().map(|g| g.day).collect();
        assert_eq!(
            days,
            vec![
                at(5, 0).date_naive(),
                at(9, 0).date_naive(),
                at(20, 0).date_naive()
            ]
        );
        assert_eq!(groups[0].entries.len(), 1);
        assert_eq!(groups[0].entries[0].id, "today-later");
        let ninth: Vec<&str> = groups[1].entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ninth, vec!["soon-b", "soon-a"]);
    }

    #[test]
    fn ordering_is_chronological_across_months() {
        let entries = vec![
            entry("december", Utc.with_ymd_and_hms(2026, 12, 1, 9, 0, 0).unwrap()),
            entry("january", Utc.with_ymd_and_hms(2027, 1, 2, 9, 0, 0).unwrap()),
            entry("november", at(30, 9)),
        ];
        let groups = upcoming_groups(&entries, at(1, 0));
        let ids: Vec<&str> = groups.iter().map(|g| g.entries[0].id.as_str()).collect();
        assert_eq!(ids, vec!["november", "december", "january"]);
    }

    #[test]
    fn groups_shrink_as_time_advances() {
        let entries = vec![entry("a", at(10, 9)), entry("b", at(12, 9))];
        assert_eq!(upcoming_groups(&entries, at(9, 0)).len(), 2);
        assert_eq!(upcoming_groups(&entries, at(11, 0)).len(), 1);
    }

    #[tokio::test]
    async fn stores_raw_list_on_success() {
        let api = FakePortalApi {
            schedules: Some(Envelope::ok(schedules(
                r#"[{"_id": "s1", "date": "2020-01-01T00:00:00.000Z", "startTime": "09:00",
                     "endTime": "10:00", "batch": {"name": "A", "level": "B1"}, "location": "Lab"}]"#,
            ))),
            ..Default::default()
        };
        let mut view = ScheduleView::default();
        assert_eq!(view.state(at(1, 0)), ScheduleState::Loading);

        assert!(view.activate(&api, &AuthContext::new("tok")).await);

        assert_eq!(view.schedules().len(), 1);
        assert_eq!(view.phase(), LoadPhase::Loaded);
        assert_eq!(view.state(at(1, 0)), ScheduleState::Content(Vec::new()));
    }

    #[tokio::test]
    async fn server_rejection_shows_server_message() {
        let api = FakePortalApi {
            schedules: Some(Envelope::rejected("No access")),
            ..Default::default()
        };
        let mut view = ScheduleView::default();

        view.activate(&api, &AuthContext::new("tok")).await;

        assert_eq!(view.state(at(1, 0)), ScheduleState::Error("No access"));
    }

    #[tokio::test]
    async fn transport_failure_uses_fixed_message_and_is_terminal() {
        let api = FakePortalApi::default();
        let mut view = ScheduleView::default();
        let auth = AuthContext::new("tok");

        view.activate(&api, &auth).await;
        assert!(!view.activate(&api, &auth).await);

        assert_eq!(api.calls.get(), 1);
        assert_eq!(view.error(), Some(SCHEDULE_FETCH_ERROR));
        assert_eq!(view.state(at(1, 0)), ScheduleState::Error(SCHEDULE_FETCH_ERROR));
    }
}
