use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::decode;

pub const BATCH_PLACEHOLDER: &str = "—";

/// Response envelope shared by every portal endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

#[cfg(test)]
impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn rejected(message: &str) -> Self {
        Self {
            success: false,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsPayload {
    #[serde(default, deserialize_with = "decode::number")]
    pub attendance: Option<f64>,
    #[serde(default, deserialize_with = "decode::count")]
    pub assignments_completed: Option<i64>,
    #[serde(default, deserialize_with = "decode::count")]
    pub exams_given: Option<i64>,
    #[serde(default, deserialize_with = "decode::text")]
    pub current_batch: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationMeta {
    #[serde(default, deserialize_with = "decode::text")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    #[serde(rename = "_id", default, deserialize_with = "decode::text")]
    pub id: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "decode::text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "decode::lenient")]
    pub meta: Option<NotificationMeta>,
    #[serde(default, deserialize_with = "decode::text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "decode::count")]
    pub rating: Option<i64>,
    #[serde(default, deserialize_with = "decode::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "decode::text")]
    pub sender: Option<String>,
    #[serde(default, deserialize_with = "decode::text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "decode::text")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulePayload {
    #[serde(rename = "_id")]
    pub id: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, deserialize_with = "decode::lenient")]
    pub batch: Option<BatchPayload>,
    #[serde(default, deserialize_with = "decode::text")]
    pub topic: Option<String>,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressStats {
    pub attendance_percent: f64,
    pub assignments_completed: i64,
    pub exams_given: i64,
    pub current_batch_label: String,
}

impl Default for ProgressStats {
    fn default() -> Self {
        Self {
            attendance_percent: 0.0,
            assignments_completed: 0,
            exams_given: 0,
            current_batch_label: BATCH_PLACEHOLDER.to_string(),
        }
    }
}

impl From<StatsPayload> for ProgressStats {
    fn from(payload: StatsPayload) -> Self {
        let defaults = ProgressStats::default();
        Self {
            attendance_percent: payload.attendance.unwrap_or(defaults.attendance_percent),
            assignments_completed: payload
                .assignments_completed
                .unwrap_or(defaults.assignments_completed),
            exams_given: payload.exams_given.unwrap_or(defaults.exams_given),
            current_batch_label: payload
                .current_batch
                .unwrap_or(defaults.current_batch_label),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackItem {
    pub id: String,
    pub title: Option<String>,
    pub rating: Option<u8>,
    pub created_at: Option<DateTime<Utc>>,
    pub sender: Option<String>,
    pub message: String,
}

impl NotificationPayload {
    /// General notifications and anything sourced from the feedback form.
    pub fn is_feedback(&self) -> bool {
        self.kind.as_deref() == Some("general")
            || self
                .meta
                .as_ref()
                .and_then(|meta| meta.source.as_deref())
                == Some("feedback")
    }
}

impl From<NotificationPayload> for FeedbackItem {
    fn from(payload: NotificationPayload) -> Self {
        let rating = payload
            .rating
            .filter(|value| (1..=5).contains(value))
            .map(|value| value as u8);
        Self {
            id: payload.id.unwrap_or_default(),
            title: payload.title,
            rating,
            created_at: payload.created_at,
            sender: payload.sender,
            message: payload
                .message
                .or(payload.description)
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleEntry {
    pub id: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub batch_name: String,
    pub batch_level: String,
    pub topic: Option<String>,
    pub location: String,
}

impl From<SchedulePayload> for ScheduleEntry {
    fn from(payload: SchedulePayload) -> Self {
        let batch = payload.batch.unwrap_or_default();
        Self {
            id: payload.id,
            date: payload.date,
            start_time: payload.start_time,
            end_time: payload.end_time,
            batch_name: batch.name.unwrap_or_default(),
            batch_level: batch.level.unwrap_or_default(),
            topic: payload.topic.filter(|topic| !topic.trim().is_empty()),
            location: payload.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateGroup {
    pub day: NaiveDate,
    pub entries: Vec<ScheduleEntry>,
}

#[derive(Debug, Clone)]
pub struct AdminUser {
    pub email: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
