//! Time formatting helpers for notification texts. The formats mirror the
//! strings customers and translators already receive (SMS dates as
//! `dd.mm.yyyy`, session intervals as `HH:MM:SS`).

use time::OffsetDateTime;
use time::macros::format_description;

/// Convert a number of minutes to the hour/minute wording used in push and
/// SMS texts: `45min`, `1h`, `02h 30min`.
pub fn convert_to_hours_mins(minutes: i64) -> String {
    if minutes < 60 {
        format!("{minutes}min")
    } else if minutes == 60 {
        "1h".to_string()
    } else {
        format!("{:02}h {:02}min", minutes / 60, minutes % 60)
    }
}

/// Elapsed session interval between due time and completion, as the stored
/// `HH:MM:SS` string plus the human `H tim M min` label used in emails.
pub fn session_interval(start: OffsetDateTime, end: OffsetDateTime) -> (String, String) {
    let total_seconds = (end - start).whole_seconds().max(0);
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    (
        format!("{hours:02}:{minutes:02}:{seconds:02}"),
        format!("{hours} tim {minutes} min"),
    )
}

/// Turn a stored `HH:MM:SS` interval into the `H tim M min` email label.
pub fn session_label(interval: &str) -> String {
    let mut parts = interval.split(':');
    let hours = parts.next().unwrap_or("0");
    let minutes = parts.next().unwrap_or("0");
    format!("{hours} tim {minutes} min")
}

/// `YYYY-MM-DD HH:MM` rendering for due times embedded in messages.
pub fn format_datetime(t: OffsetDateTime) -> String {
    t.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]"
    ))
    .unwrap_or_else(|_| t.to_string())
}

/// Date (`dd.mm.yyyy`) and time (`HH:MM`) pair used by the SMS texts.
pub fn due_date_time(due: OffsetDateTime) -> (String, String) {
    let date = due
        .format(format_description!("[day].[month].[year]"))
        .unwrap_or_else(|_| due.to_string());
    let time = due
        .format(format_description!("[hour]:[minute]"))
        .unwrap_or_default();
    (date, time)
}
