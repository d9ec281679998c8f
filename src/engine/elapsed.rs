use chrono::{DateTime, Local, Utc};

pub const NEVER_CHECKED: &str = "Never";

/// Human readable age of the last check, bucketed into seconds, minutes, or the local
/// time of day once an hour has passed.
pub fn describe_elapsed(last_check: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last_check) = last_check else {
        return NEVER_CHECKED.to_string();
    };

    let secs = (now - last_check).num_seconds().max(0);
    if secs < 60 {
        format!("{secs} seconds ago")
    } else if secs < 3600 {
        format!("{} minutes ago", secs / 60)
    } else {
        last_check.with_timezone(&Local).format("%H:%M:%S").to_string()
    }
}
