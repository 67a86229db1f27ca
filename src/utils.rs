//! Utility helpers shared across the WASM frontend.

use chrono::{DateTime, Utc};

/// Checkbox values round-trip through the DOM as strings.
pub fn get_boolean(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

pub fn get_string(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

/// Strip one leading occurrence of `v`.
pub fn trim_left<'a>(k: &'a str, v: &str) -> &'a str {
    k.strip_prefix(v).unwrap_or(k)
}

/// Strip one trailing occurrence of `v`.
pub fn trim_right<'a>(k: &'a str, v: &str) -> &'a str {
    k.strip_suffix(v).unwrap_or(k)
}

/// Join URL path segments with single slashes, keeping a leading `./` or
/// `/` of the first segment and any scheme (`http://`).
pub fn join_path(base: &str, area: &str) -> String {
    let base = base.trim_end_matches('/');
    let area = area
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    match (base.is_empty(), area.is_empty()) {
        (true, true) => "/".to_string(),
        (true, false) => format!("/{}", area),
        (false, true) => base.to_string(),
        (false, false) => format!("{}/{}", base, area),
    }
}

/// Whole days from `now` until `date`, rounded; negative for the past.
pub fn day_count(date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = (date - now).num_milliseconds() as f64;
    (ms / (1000.0 * 60.0 * 60.0 * 24.0)).round() as i64
}

/// [`day_count`] against the browser clock.
pub fn days_from_now(date: DateTime<Utc>) -> i64 {
    day_count(date, Utc::now())
}

/// Parse an RFC 3339 timestamp as sent by the backend.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// Minimal escaping for text placed inside HTML attributes or bodies.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn booleans() {
        assert!(get_boolean(Some("TRUE")));
        assert!(get_boolean(Some("true")));
        assert!(!get_boolean(Some("yes")));
        assert!(!get_boolean(None));
        assert_eq!(get_string(true), "true");
        assert_eq!(get_string(false), "false");
    }

    #[test]
    fn trims_only_one_occurrence() {
        assert_eq!(trim_left("//login", "/"), "/login");
        assert_eq!(trim_left("login", "/"), "login");
        assert_eq!(trim_right("deepcore/", "/"), "deepcore");
        assert_eq!(trim_right("a-b--", "--"), "a-b");
    }

    #[test]
    fn joins_paths() {
        assert_eq!(join_path("./api/v1/", "/login"), "./api/v1/login");
        assert_eq!(join_path("./api/v1", "token//check"), "./api/v1/token/check");
        assert_eq!(join_path("http://host:8080/api/v1", "info"), "http://host:8080/api/v1/info");
        assert_eq!(join_path("", "info"), "/info");
        assert_eq!(join_path("./api/v1", ""), "./api/v1");
    }

    #[test]
    fn counts_days() {
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(day_count(now + Duration::days(3), now), 3);
        assert_eq!(day_count(now + Duration::hours(13), now), 1);
        assert_eq!(day_count(now + Duration::hours(11), now), 0);
        assert_eq!(day_count(now - Duration::days(2), now), -2);
    }

    #[test]
    fn parses_backend_dates() {
        let d = parse_date("2021-02-18T21:54:42.123Z").unwrap();
        assert_eq!(d.timestamp(), 1_613_685_282);
        assert!(parse_date("yesterday").is_none());
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html(r#"<a href="x">&'"#), "&lt;a href=&quot;x&quot;&gt;&amp;&#39;");
    }
}
