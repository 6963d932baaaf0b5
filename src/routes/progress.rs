//! `/api/progress/*` routes: export and restore the persisted record.
//!
//! The worker reads localStorage on page load and posts the blob to
//! `/api/progress/restore`. Writes flow back through `take_persist()`.

use crate::routes::util::{get_param, parse_form_body};
use crate::week::app::App;
use crate::week::store::ProgressStore;

// ── GET /api/progress/state ────────────────────────────────────────

/// Handle GET /api/progress/state
/// Returns the ProgressRecord as JSON.
pub fn handle_state_get<S: ProgressStore>(app: &App<S>, _query: &str) -> String {
    app.export_json()
}

// ── POST /api/progress/restore ─────────────────────────────────────

/// Handle POST /api/progress/restore
/// Body is either the raw JSON blob or `state={urlencoded json}`.
/// Empty bodies are accepted as "nothing stored yet".
pub fn handle_restore_post<S: ProgressStore>(app: &mut App<S>, body: &str) -> String {
    let trimmed = body.trim();
    let blob = if trimmed.starts_with('{') {
        trimmed.to_string()
    } else {
        let params = parse_form_body(trimmed);
        get_param(&params, "state").unwrap_or("").to_string()
    };
    match app.restore(&blob) {
        Ok(()) => "ok".to_string(),
        Err(e) => format!("error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::days::DayId;
    use crate::week::store::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::with_seed(MemoryStore::default(), 2)
    }

    #[test]
    fn state_exports_default_record() {
        let json = handle_state_get(&app(), "");
        assert!(json.contains(r#""completedDays":[]"#));
        assert!(json.contains(r#""promises":[]"#));
    }

    #[test]
    fn restore_raw_json() {
        let mut a = app();
        let out = handle_restore_post(&mut a, r#"{"completedDays":["rose","kiss"],"kissScore":16}"#);
        assert_eq!(out, "ok");
        assert!(a.tracker().is_complete(DayId::Kiss));
        assert_eq!(a.tracker().record().kiss_score, 16);
    }

    #[test]
    fn restore_form_encoded() {
        let mut a = app();
        let out = handle_restore_post(
            &mut a,
            "state=%7B%22completedDays%22%3A%5B%22hug%22%5D%7D",
        );
        assert_eq!(out, "ok");
        assert!(a.tracker().is_complete(DayId::Hug));
    }

    #[test]
    fn restore_empty_is_ok() {
        let mut a = app();
        assert_eq!(handle_restore_post(&mut a, ""), "ok");
        assert_eq!(handle_restore_post(&mut a, "state="), "ok");
    }

    #[test]
    fn restore_garbage_reports_error_and_keeps_state() {
        let mut a = app();
        handle_restore_post(&mut a, r#"{"completedDays":["rose"]}"#);
        let out = handle_restore_post(&mut a, "{not json");
        assert!(out.starts_with("error: invalid progress JSON"));
        assert!(a.tracker().is_complete(DayId::Rose));
    }
}
