// src/utils/format.rs
use chrono::{DateTime, Utc};

// Format a past timestamp relative to `now`
pub fn format_time_ago_at(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(time);
    let seconds = duration.num_seconds().max(0);

    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", duration.num_minutes())
    } else if seconds < 86400 {
        format!("{} hours ago", duration.num_hours())
    } else if seconds < 2592000 {
        format!("{} days ago", duration.num_days())
    } else if seconds < 31536000 {
        format!("{} months ago", duration.num_days() / 30)
    } else {
        format!("{} years ago", duration.num_days() / 365)
    }
}

// Describe an expiry relative to now ("in 12 days" / "expired 3 days ago")
pub fn format_expiry_at(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if expires_at < now {
        format!("expired {}", format_time_ago_at(expires_at, now))
    } else {
        let days = expires_at.signed_duration_since(now).num_days();
        match days {
            0 => "expires today".to_string(),
            1 => "expires in 1 day".to_string(),
            n => format!("expires in {} days", n),
        }
    }
}

// Truncate a string to at most `max_len` characters
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Replace every character with a bullet so a password can be listed without showing it
pub fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count().min(12))
}
