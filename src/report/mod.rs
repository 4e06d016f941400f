//! Admin reports: analytics snapshot rendered as PDF or text, and the user CSV export.

pub mod export;
pub mod pdf;
pub mod text;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Dashboard totals. Field names match what the admin UI reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total_users: i64,
    pub total_students: i64,
    #[serde(rename = "totalTPO")]
    pub total_tpos: i64,
    pub placed_students: i64,
    pub unplaced_students: i64,
    pub active_jobs: i64,
    pub inactive_jobs: i64,
    pub total_applications: i64,
    pub total_events: i64,
    pub upcoming_events: i64,
    pub completed_events: i64,
    pub cancelled_events: i64,
    pub total_registrations: i64,
    pub placement_percentage: f64,
    pub total_jobs: i64,
    pub active_users: i64,
    pub inactive_users: i64,
}

/// Percentage rounded to two decimals; zero when there is nobody to place.
pub fn placement_percentage(placed: i64, students: i64) -> f64 {
    if students <= 0 {
        return 0.0;
    }
    (placed as f64 / students as f64 * 10000.0).round() / 100.0
}

pub struct Section {
    pub heading: &'static str,
    pub lines: Vec<String>,
}

pub const REPORT_TITLE: &str = "Admin Analytics Report";

pub fn generated_line(at: DateTime<Utc>) -> String {
    format!("Report Generated: {}", at.format("%Y-%m-%d %H:%M:%S"))
}

pub fn placement_line(analytics: &Analytics) -> String {
    format!("Overall Placement Percentage: {}%", analytics.placement_percentage)
}

/// Report body shared by every rendering
pub fn sections(a: &Analytics) -> Vec<Section> {
    vec![
        Section {
            heading: "Main Analytics",
            lines: vec![
                format!("Total Users: {}", a.total_users),
                format!("Total Students: {}", a.total_students),
                format!("Total TPOs: {}", a.total_tpos),
                format!("Active Users: {}", a.active_users),
                format!("Inactive Users: {}", a.inactive_users),
                format!("Placed Students: {}", a.placed_students),
                format!("Unplaced Students: {}", a.unplaced_students),
            ],
        },
        Section {
            heading: "Job Analytics",
            lines: vec![
                format!("Active Jobs: {}", a.active_jobs),
                format!("Inactive Jobs: {}", a.inactive_jobs),
                format!("Total Jobs: {}", a.total_jobs),
                format!("Total Applications: {}", a.total_applications),
            ],
        },
        Section {
            heading: "Event Analytics",
            lines: vec![
                format!("Total Events: {}", a.total_events),
                format!("Upcoming Events: {}", a.upcoming_events),
                format!("Completed Events: {}", a.completed_events),
                format!("Cancelled Events: {}", a.cancelled_events),
                format!("Total Event Registrations: {}", a.total_registrations),
            ],
        },
    ]
}

#[cfg(test)]
pub(crate) fn sample() -> Analytics {
    Analytics {
        total_users: 12,
        total_students: 8,
        total_tpos: 3,
        placed_students: 3,
        unplaced_students: 5,
        active_jobs: 4,
        inactive_jobs: 1,
        total_applications: 9,
        total_events: 2,
        upcoming_events: 1,
        completed_events: 1,
        cancelled_events: 0,
        total_registrations: 6,
        placement_percentage: placement_percentage(3, 8),
        total_jobs: 5,
        active_users: 11,
        inactive_users: 1,
    }
}
