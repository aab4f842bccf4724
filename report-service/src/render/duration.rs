//! Human-readable formatting for aggregate usage durations.

/// Format a minute count as "H hour(s) M minute(s)".
///
/// Zero or negative input renders as "none". Fractional minutes are
/// truncated, not rounded. Each unit pluralizes independently, and a zero
/// minutes component is still printed when hours are present.
pub fn format_duration(minutes: f64) -> String {
    if minutes <= 0.0 {
        return "none".to_string();
    }

    let total_minutes = minutes as u64;
    let hours = total_minutes / 60;
    let mins = total_minutes % 60;

    if hours > 0 {
        format!(
            "{} hour{} {} minute{}",
            hours,
            if hours == 1 { "" } else { "s" },
            mins,
            if mins == 1 { "" } else { "s" }
        )
    } else {
        format!("{} minute{}", mins, if mins == 1 { "" } else { "s" })
    }
}
