use chrono::{DateTime, Utc};

/// Short day/time used in reminders, e.g. `07.03 18:30`.
pub fn format_reminder_time(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m %H:%M").to_string()
}

/// Day/time with an explicit zone, used in session listings.
pub fn format_session_time(dt: &DateTime<Utc>) -> String {
    dt.format("%d.%m %H:%M UTC").to_string()
}
