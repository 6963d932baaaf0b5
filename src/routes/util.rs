//! Shared URL/form parsing and fragment helpers for route handlers.

use crate::week::app::{Celebration, Clock};
use crate::week::days::DayId;
use crate::week::schedule::millis_from_param;

/// Parse URL-encoded form body into key-value pairs.
/// Handles `key=value&key2=value2` format (from HTMX POST bodies).
pub fn parse_form_body(body: &str) -> Vec<(String, String)> {
    if body.is_empty() {
        return Vec::new();
    }
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((percent_decode(key), percent_decode(val)))
        })
        .collect()
}

/// Percent-decode a URL-encoded value. Decoded bytes are read as UTF-8, so
/// promises typed with emoji or accents survive; invalid sequences become U+FFFD.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi << 4) | lo);
                        i += 3;
                        continue;
                    }
                    _ => out.push(b'%'),
                }
            }
            b'+' => out.push(b' '),
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// Parse a query string into key-value pairs.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    let q = query.strip_prefix('?').unwrap_or(query);
    parse_form_body(q)
}

/// Helper to get a value by key from a list of key-value pairs.
pub fn get_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Parse a finite float param.
pub fn get_f64(params: &[(String, String)], key: &str) -> Option<f64> {
    get_param(params, key)
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// `now` (epoch ms) and `test` from a request. Test mode is on only for
/// the exact string `true`.
pub fn clock_from(params: &[(String, String)]) -> Clock {
    Clock::new(
        millis_from_param(get_param(params, "now")),
        get_param(params, "test") == Some("true"),
    )
}

/// Escape text for use inside HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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

/// Fragment returned for a day slug that doesn't exist.
pub fn unknown_day() -> String {
    r#"<span class="text-red-500">Unknown day</span>"#.to_string()
}

/// Fragment returned when a day is still locked.
pub fn locked_day(day: DayId) -> String {
    format!(
        r#"<div class="text-center py-8"><div class="text-5xl">&#x1F512;</div><p class="mt-3">{} hasn't unlocked yet. Come back soon!</p></div>"#,
        day.title()
    )
}

/// Trailing script that plays celebrations and tells the page to refresh the
/// progress bar and day cards. Empty when there is nothing to celebrate.
pub fn celebration_script(celebrations: &[Celebration]) -> String {
    if celebrations.is_empty() {
        return String::new();
    }
    let mut js = String::with_capacity(160);
    for c in celebrations {
        match c {
            Celebration::Confetti => js.push_str("valentineFx.confetti();"),
            Celebration::HeartBurst => js.push_str("valentineFx.hearts();"),
        }
    }
    js.push_str("htmx.trigger(document.body,'week-progress');");
    format!("<script>{}</script>", js)
}
