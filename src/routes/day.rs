//! `/api/day/*` routes: open, close and complete a day.

use tracing::warn;

use crate::routes::util::{
    celebration_script, clock_from, get_param, locked_day, parse_form_body, unknown_day,
};
use crate::week::app::{App, SessionError};
use crate::week::days::DayId;
use crate::week::store::ProgressStore;

fn day_param(params: &[(String, String)]) -> Option<DayId> {
    get_param(params, "day").and_then(DayId::from_slug)
}

// ── POST /api/day/open ─────────────────────────────────────────────

/// Handle POST /api/day/open
/// Body: day={slug}&now={ms}&test={true}
/// Mounts a fresh engine (tearing down whatever was open) and returns its
/// fragment, plus any celebration the mount produced.
pub fn handle_open_post<S: ProgressStore>(app: &mut App<S>, body: &str) -> String {
    let params = parse_form_body(body);
    let Some(day) = day_param(&params) else {
        return unknown_day();
    };
    match app.open_day(day, clock_from(&params)) {
        Ok(celebrations) => {
            let mut html = app.render_active().unwrap_or_default();
            html.push_str(&celebration_script(&celebrations));
            html
        }
        Err(SessionError::Locked(day)) => locked_day(day),
        Err(e) => {
            warn!(error = %e, "open failed");
            String::new()
        }
    }
}

// ── POST /api/day/close ────────────────────────────────────────────

/// Handle POST /api/day/close
/// Tears the open engine down, cancelling every timer. Returns an empty
/// fragment so the modal body clears.
pub fn handle_close_post<S: ProgressStore>(app: &mut App<S>, _body: &str) -> String {
    app.close();
    String::new()
}

// ── POST /api/day/complete ─────────────────────────────────────────

/// Handle POST /api/day/complete
/// Body: day={slug}
/// Idempotent; confetti only plays the first time.
pub fn handle_complete_post<S: ProgressStore>(app: &mut App<S>, body: &str) -> String {
    let params = parse_form_body(body);
    let Some(day) = day_param(&params) else {
        return unknown_day();
    };
    let celebrations = app.complete_day(day);
    format!(
        r#"<span class="text-emerald-600">{} completed</span>{}"#,
        day.title(),
        celebration_script(&celebrations)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::MiniGame;
    use crate::week::store::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::with_seed(MemoryStore::default(), 11)
    }

    #[test]
    fn open_mounts_engine_fragment() {
        let mut a = app();
        let html = handle_open_post(&mut a, "day=hug&now=0&test=true");
        assert!(html.contains("Hugs Sent"));
        assert_eq!(a.active_day(), Some(DayId::Hug));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn open_locked_day_returns_locked_fragment() {
        let mut a = app();
        let html = handle_open_post(&mut a, "day=kiss&now=0");
        assert!(html.contains("Kiss Day hasn't unlocked yet"));
        assert!(a.active().is_none());
    }

    #[test]
    fn open_unknown_day() {
        let mut a = app();
        assert!(handle_open_post(&mut a, "day=birthday&test=true").contains("Unknown day"));
        assert!(handle_open_post(&mut a, "").contains("Unknown day"));
    }

    #[test]
    fn open_valentine_celebrates() {
        let mut a = app();
        let html = handle_open_post(&mut a, "day=valentine&now=0&test=true");
        assert!(html.contains("love-letter"));
        assert!(html.contains("valentineFx.confetti();valentineFx.hearts();"));
        assert!(a.tracker().is_complete(DayId::Valentine));
    }

    #[test]
    fn close_tears_down() {
        let mut a = app();
        handle_open_post(&mut a, "day=kiss&now=0&test=true");
        crate::routes::play::handle_play_post(&mut a, "kiss", "action=start&now=0&test=true");
        assert!(a.active().map_or(0, MiniGame::live_timers) > 0);
        assert_eq!(handle_close_post(&mut a, ""), "");
        assert!(a.active().is_none());
    }

    #[test]
    fn complete_is_idempotent() {
        let mut a = app();
        let first = handle_complete_post(&mut a, "day=teddy");
        assert!(first.contains("valentineFx.confetti()"));
        let second = handle_complete_post(&mut a, "day=teddy");
        assert!(second.contains("Teddy Day completed"));
        assert!(!second.contains("<script>"));
        assert_eq!(a.tracker().store().writes.len(), 1);
    }
}
