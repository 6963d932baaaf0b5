//! Valentine's Week in-browser WASM server.
//!
//! Exports `handle_request(method, path, query, body)` for the Web Worker
//! bridge to call, plus `take_persist()` / `persist_key()` for mirroring the
//! progress record into localStorage. Uses `matchit` for URL routing.
//!
//! The page is expected to:
//! - post the stored blob to `/api/progress/restore` once at load
//! - send `now` (epoch ms) with every request, and `test=true` when the page
//!   URL carries it (exposed to fragments as `valentineWeek.testMode`)
//! - call `take_persist()` after each request and write any non-empty result
//!   under `persist_key()`
//! - provide `valentineFx.confetti()` / `valentineFx.hearts()`

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub mod games;
pub mod routes;
pub mod week;

use week::app::App;
use week::store::{OutboxStore, STORAGE_KEY};

thread_local! {
    /// One session per worker. Lives as long as the WASM module does.
    static APP: RefCell<App<OutboxStore>> = RefCell::new(App::new(OutboxStore::default()));
}

/// Execute a closure with mutable access to the session.
pub fn with_app<F, R>(f: F) -> R
where
    F: FnOnce(&mut App<OutboxStore>) -> R,
{
    APP.with(|app| f(&mut app.borrow_mut()))
}

/// Replace the whole session.
pub fn replace_app(app: App<OutboxStore>) {
    APP.with(|a| *a.borrow_mut() = app);
}

/// Process an HTTP-like request and return an HTML fragment.
///
/// # Arguments
/// * `method`: HTTP method ("GET" or "POST")
/// * `path`  : URL path (e.g., "/api/week/cards")
/// * `query` : Query string (e.g., "?now=1770638400000&test=true")
/// * `body`  : Form-encoded POST body. Empty string for GET requests.
#[wasm_bindgen]
pub fn handle_request(method: &str, path: &str, query: &str, body: &str) -> String {
    let mut router = matchit::Router::new();

    router.insert("/api/week/cards", "week_cards").ok();
    router.insert("/api/week/progress", "week_progress").ok();
    router.insert("/api/week/countdown", "week_countdown").ok();

    router.insert("/api/day/open", "day_open").ok();
    router.insert("/api/day/close", "day_close").ok();
    router.insert("/api/day/complete", "day_complete").ok();

    // Static segment wins over the `{day}` capture.
    router.insert("/api/play/tick", "play_tick").ok();
    router.insert("/api/play/{day}", "play").ok();

    router.insert("/api/progress/state", "progress_state").ok();
    router.insert("/api/progress/restore", "progress_restore").ok();

    match router.at(path) {
        Ok(matched) => {
            let day = matched.params.get("day").unwrap_or("");
            with_app(|app| match (*matched.value, method) {
                ("week_cards", "GET") => routes::week::handle_cards_get(app, query),
                ("week_progress", "GET") => routes::week::handle_progress_get(app, query),
                ("week_countdown", "GET") => routes::week::handle_countdown_get(app, query),
                ("progress_state", "GET") => routes::progress::handle_state_get(app, query),

                ("day_open", "POST") => routes::day::handle_open_post(app, body),
                ("day_close", "POST") => routes::day::handle_close_post(app, body),
                ("day_complete", "POST") => routes::day::handle_complete_post(app, body),
                ("play_tick", "POST") => routes::play::handle_tick_post(app, body),
                ("play", "POST") => routes::play::handle_play_post(app, day, body),
                ("progress_restore", "POST") => routes::progress::handle_restore_post(app, body),

                _ => method_not_allowed(),
            })
        }
        Err(_) => not_found(),
    }
}

/// Drain the latest progress write, if any. Empty string when nothing changed
/// since the last call.
#[wasm_bindgen]
pub fn take_persist() -> String {
    with_app(|app| app.store_mut().take_pending()).unwrap_or_default()
}

/// localStorage key the progress record lives under.
#[wasm_bindgen]
pub fn persist_key() -> String {
    STORAGE_KEY.to_string()
}

fn not_found() -> String {
    r#"<span class="text-red-500">404: route not found</span>"#.to_string()
}

fn method_not_allowed() -> String {
    r#"<span class="text-red-500">405: method not allowed</span>"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() {
        replace_app(App::with_seed(OutboxStore::default(), 9));
    }

    #[test]
    fn returns_404_for_unknown_route() {
        let html = handle_request("GET", "/api/nonexistent", "", "");
        assert!(html.contains("404"));
    }

    #[test]
    fn returns_405_for_wrong_method() {
        assert!(handle_request("POST", "/api/week/cards", "", "").contains("405"));
        assert!(handle_request("GET", "/api/day/open", "", "").contains("405"));
        assert!(handle_request("GET", "/api/play/rose", "", "").contains("405"));
    }

    #[test]
    fn routes_week_fragments() {
        fresh();
        let cards = handle_request("GET", "/api/week/cards", "?now=0&test=true", "");
        assert_eq!(cards.matches("day-card unlocked").count(), 8);
        let progress = handle_request("GET", "/api/week/progress", "", "");
        assert!(progress.contains("0 / 8 Days Completed"));
        let countdown = handle_request("GET", "/api/week/countdown", "?now=0", "");
        assert!(countdown.contains("Next unlock in"));
    }

    #[test]
    fn routes_play_tick_ahead_of_day_capture() {
        fresh();
        assert_eq!(handle_request("POST", "/api/play/tick", "", "now=1"), "");
        assert!(handle_request("POST", "/api/play/nope", "", "").contains("Unknown day"));
    }

    #[test]
    fn hug_day_end_to_end_with_persistence() {
        fresh();
        assert_eq!(persist_key(), "valentineWeekState");
        let html = handle_request("POST", "/api/day/open", "", "day=hug&now=0&test=true");
        assert!(html.contains("Hugs Sent"));
        assert_eq!(take_persist(), "");

        let mut last = String::new();
        for _ in 0..20 {
            last = handle_request("POST", "/api/play/hug", "", "action=hug&now=1&test=true");
        }
        assert!(last.contains("Warmth Meter Full!"));
        assert!(last.contains("valentineFx.confetti()"));

        let saved = take_persist();
        assert!(saved.contains(r#""completedDays":["hug"]"#));
        assert!(saved.contains(r#""hugCount":20"#));
        assert_eq!(take_persist(), "");

        let progress = handle_request("GET", "/api/week/progress", "", "");
        assert!(progress.contains("1 / 8 Days Completed"));
    }

    #[test]
    fn restore_then_state_round_trip() {
        fresh();
        let out = handle_request(
            "POST",
            "/api/progress/restore",
            "",
            r#"{"completedDays":["rose","propose"],"promises":["always"]}"#,
        );
        assert_eq!(out, "ok");
        assert_eq!(take_persist(), "");
        let json = handle_request("GET", "/api/progress/state", "", "");
        assert!(json.contains(r#""completedDays":["rose","propose"]"#));
        assert!(json.contains(r#""promises":["always"]"#));
    }

    #[test]
    fn close_route_clears_session() {
        fresh();
        handle_request("POST", "/api/day/open", "", "day=kiss&now=0&test=true");
        handle_request("POST", "/api/play/kiss", "", "action=start&now=0&test=true");
        assert_eq!(handle_request("POST", "/api/day/close", "", ""), "");
        assert!(with_app(|app| app.active().is_none()));
    }
}
