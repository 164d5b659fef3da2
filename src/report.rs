use std::fmt::Write;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{AdminUser, DateGroup, FeedbackItem, ScheduleEntry};
use crate::progress::ProgressReportView;
use crate::schedule::ScheduleState;

pub const NO_FEEDBACK: &str = "No feedback yet";
pub const NO_UPCOMING_CLASSES: &str = "No Upcoming Classes";
pub const NO_ADMINS: &str = "No admin users found!";

pub fn format_feedback_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

pub fn format_day_heading(day: NaiveDate) -> String {
    format!("{} · {}", day.format("%A"), day.format("%B %-d, %Y"))
}

pub fn render_progress(view: &ProgressReportView) -> String {
    let mut output = String::new();
    let stats = view.stats();

    let _ = writeln!(output, "# Progress Report");
    if let Some(warning) = view.warning() {
        let _ = writeln!(output, "! {warning}");
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "Attendance: {}%", stats.attendance_percent);
    let _ = writeln!(
        output,
        "Assignments Completed: {}",
        stats.assignments_completed
    );
    let _ = writeln!(output, "Exams Given: {}", stats.exams_given);
    let _ = writeln!(output, "Current Batch: {}", stats.current_batch_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Feedback");

    let feedback = view.visible_feedback();
    if feedback.is_empty() {
        let _ = writeln!(output, "{NO_FEEDBACK}");
    } else {
        for item in feedback {
            write_feedback(&mut output, item);
        }
    }

    output
}

fn write_feedback(output: &mut String, item: &FeedbackItem) {
    let mut line = format!("- {}", item.title.as_deref().unwrap_or("Feedback"));
    if let Some(rating) = item.rating {
        let _ = write!(line, " ({rating}/5)");
    }
    if let Some(sender) = &item.sender {
        let _ = write!(line, " from {sender}");
    }
    if let Some(at) = item.created_at {
        let _ = write!(line, " on {}", format_feedback_date(at));
    }
    let _ = writeln!(output, "{line}");
    if !item.message.is_empty() {
        let _ = writeln!(output, "  {}", item.message);
    }
}

pub fn render_schedule(state: &ScheduleState<'_>) -> String {
    let mut output = String::new();

    match state {
        ScheduleState::Loading => {
            let _ = writeln!(output, "Loading class schedules...");
        }
        ScheduleState::Error(message) => {
            let _ = writeln!(output, "{message}");
        }
        ScheduleState::Content(groups) if groups.is_empty() => {
            let _ = writeln!(output, "{NO_UPCOMING_CLASSES}");
        }
        ScheduleState::Content(groups) => {
            let _ = writeln!(output, "# Upcoming Classes");
            for group in groups {
                write_day(&mut output, group);
            }
        }
    }

    output
}

fn write_day(output: &mut String, group: &DateGroup) {
    let _ = writeln!(output);
    let _ = writeln!(output, "## {}", format_day_heading(group.day));
    for entry in &group.entries {
        write_class(output, entry);
    }
}

fn write_class(output: &mut String, entry: &ScheduleEntry) {
    let batch = if entry.batch_level.is_empty() {
        entry.batch_name.clone()
    } else {
        format!("{} ({})", entry.batch_name, entry.batch_level)
    };
    let _ = writeln!(
        output,
        "- {} – {} | {}",
        entry.start_time, entry.end_time, batch
    );
    if let Some(topic) = &entry.topic {
        let _ = writeln!(output, "  Topic: {topic}");
    }
    let _ = writeln!(output, "  Location: {}", entry.location);
}

pub fn render_admins(admins: &[AdminUser]) -> String {
    let mut output = String::new();

    if admins.is_empty() {
        let _ = writeln!(output, "{NO_ADMINS}");
        return output;
    }

    let _ = writeln!(output, "Found {} admin user(s):", admins.len());
    for admin in admins {
        let _ = writeln!(output);
        let _ = writeln!(output, "Email: {}", admin.email);
        let _ = writeln!(output, "Name: {}", admin.name);
        let _ = writeln!(output, "Active: {}", admin.is_active);
        let _ = writeln!(output, "Created: {}", admin.created_at.to_rfc3339());
    }

    output
}
