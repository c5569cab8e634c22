use std::path::{Path, PathBuf};

/// Truncate to `max` characters, ending in `…` when shortened.
pub fn truncate_with_ellipsis(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// Collapse a (possibly multi-line) error into a single displayable line.
pub fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("unknown error")
        .to_string()
}

/// Format an `anyhow` error chain the way it should appear in a status row.
pub fn format_error(err: &anyhow::Error) -> String {
    one_line(&format!("{:#}", err))
}

/// Human relative age in the style of `git log --format=%cr`.
pub fn relative_age(timestamp: i64, now: i64) -> String {
    let secs = now - timestamp;
    if secs < 0 {
        return "in the future".to_string();
    }

    let (count, unit) = if secs < 90 {
        (secs, "second")
    } else if secs < 90 * 60 {
        ((secs + 30) / 60, "minute")
    } else if secs < 36 * 3600 {
        ((secs + 1800) / 3600, "hour")
    } else if secs < 14 * 86400 {
        ((secs + 43200) / 86400, "day")
    } else if secs < 70 * 86400 {
        ((secs + 302400) / 604800, "week")
    } else if secs < 365 * 86400 {
        ((secs + 1296000) / 2592000, "month")
    } else {
        (secs / (365 * 86400), "year")
    };

    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}

/// "3 hours ago" -> "3h", "2 months ago" -> "2mo".
pub fn short_age(age: &str) -> String {
    let mut parts = age.split_whitespace();
    let (Some(count), Some(unit)) = (parts.next(), parts.next()) else {
        return age.to_string();
    };
    if unit.starts_with("month") {
        return format!("{}mo", count);
    }
    match unit.chars().next() {
        Some(c) => format!("{}{}", count, c),
        None => age.to_string(),
    }
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Display label for a repository: its last path component.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
