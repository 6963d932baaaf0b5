//! `/api/week/*` routes: the day-card grid, the progress bar and the
//! next-unlock countdown.
//!
//! Each fragment re-fetches itself: cards and progress on the body-level
//! `week-progress` event, the countdown every 60 seconds.

use crate::routes::util::{clock_from, parse_query};
use crate::week::app::{App, DayStatus};
use crate::week::days::DayId;
use crate::week::store::ProgressStore;

/// Client clock (and the test switch, forwarded by the page) for self-refreshes.
const CLOCK_VALS: &str = "js:{now: Date.now(), test: valentineWeek.testMode}";

// ── GET /api/week/cards ────────────────────────────────────────────

/// Handle GET /api/week/cards?now={ms}&test={true}
/// Returns the grid of eight day cards.
pub fn handle_cards_get<S: ProgressStore>(app: &mut App<S>, query: &str) -> String {
    let clock = clock_from(&parse_query(query));
    let cards = app.cards(clock);

    let mut html = String::with_capacity(4096);
    html.push_str(&format!(
        r#"<div class="days-grid grid grid-cols-2 md:grid-cols-4 gap-4" id="daysGrid" hx-get="/api/week/cards" hx-trigger="week-progress from:body" hx-swap="outerHTML" hx-vals='{}'>"#,
        CLOCK_VALS
    ));
    for card in &cards {
        let date = app.schedule().unlock_date(card.day).format("%b %-d").to_string();
        html.push_str(&render_card(card.day, card.status, &date));
    }
    html.push_str("</div>");
    html
}

fn render_card(day: DayId, status: DayStatus, date_label: &str) -> String {
    let button = match status {
        DayStatus::Locked => {
            r#"<button class="day-button bg-slate-300 text-slate-600 rounded-full px-4 py-1 mt-2" disabled>Locked &#x1F512;</button>"#.to_string()
        }
        DayStatus::Unlocked | DayStatus::Completed => format!(
            r#"<button class="day-button bg-pink-500 text-white rounded-full px-4 py-1 mt-2" hx-post="/api/day/open" hx-target="{target}" hx-swap="innerHTML" hx-vals='js:{{day: "{slug}", now: Date.now(), test: valentineWeek.testMode}}'>Open</button>"#,
            target = crate::games::BODY_TARGET,
            slug = day.slug()
        ),
    };
    let badge = if status == DayStatus::Completed {
        r#"<span class="completed-badge absolute top-2 right-2 text-emerald-600">&#x2714;</span>"#
    } else {
        ""
    };
    format!(
        r#"<div class="day-card {class} relative rounded-xl p-4 text-center shadow" id="day-{slug}">{badge}<div class="day-icon text-4xl">{emoji}</div><h3 class="day-title font-bold">{title}</h3><p class="day-date text-sm">{date}</p>{button}</div>"#,
        class = status.class(),
        slug = day.slug(),
        badge = badge,
        emoji = day.emoji(),
        title = day.title(),
        date = date_label,
        button = button
    )
}

// ── GET /api/week/progress ─────────────────────────────────────────

/// Handle GET /api/week/progress
/// Returns the progress bar and "k / 8 Days Completed".
pub fn handle_progress_get<S: ProgressStore>(app: &App<S>, _query: &str) -> String {
    let (completed, total) = app.tracker().completion_ratio();
    let percent = completed * 100 / total;
    format!(
        r#"<div class="progress-section" id="weekProgress" hx-get="/api/week/progress" hx-trigger="week-progress from:body" hx-swap="outerHTML"><div class="progress-bar w-full bg-pink-100 rounded-full h-3"><div class="progress-fill bg-pink-500 h-3 rounded-full" id="progressBar" style="width: {percent}%"></div></div><p class="progress-text text-center mt-1" id="progressText">{completed} / {total} Days Completed</p></div>"#,
    )
}

// ── GET /api/week/countdown ────────────────────────────────────────

/// Handle GET /api/week/countdown?now={ms}&test={true}
/// Returns the next-unlock banner, refreshed every minute.
pub fn handle_countdown_get<S: ProgressStore>(app: &mut App<S>, query: &str) -> String {
    let clock = clock_from(&parse_query(query));
    let (text, class) = if clock.test_mode {
        (
            "&#x1F9EA; Test Mode Active".to_string(),
            "bg-orange-100 text-orange-700",
        )
    } else {
        match app.next_unlock(clock) {
            Some(next) => (
                format!("Next unlock in {}", next.remaining),
                "bg-pink-50 text-pink-700",
            ),
            None => (
                "All days unlocked! &#x1F49D;".to_string(),
                "bg-pink-50 text-pink-700",
            ),
        }
    };
    format!(
        r#"<div class="countdown rounded-full px-4 py-1 {class}" id="countdownText" hx-get="/api/week/countdown" hx-trigger="every 60s" hx-swap="outerHTML" hx-vals='{vals}'>{text}</div>"#,
        class = class,
        vals = CLOCK_VALS,
        text = text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::week::store::MemoryStore;

    fn app() -> App<MemoryStore> {
        App::with_seed(MemoryStore::default(), 5)
    }

    // 2026-02-09T12:00:00Z
    const MID_WEEK: &str = "now=1770638400000";

    #[test]
    fn cards_render_all_eight_in_order() {
        let html = handle_cards_get(&mut app(), MID_WEEK);
        let rose = html.find(r#"id="day-rose""#).unwrap();
        let valentine = html.find(r#"id="day-valentine""#).unwrap();
        assert!(rose < valentine);
        assert_eq!(html.matches("day-card ").count(), 8);
        assert!(html.contains("Feb 7"));
        assert!(html.contains("Feb 14"));
    }

    #[test]
    fn cards_reflect_lock_state() {
        let html = handle_cards_get(&mut app(), MID_WEEK);
        assert_eq!(html.matches(r#"day-card unlocked"#).count(), 3);
        assert_eq!(html.matches(r#"day-card locked"#).count(), 5);
        assert_eq!(html.matches("disabled>Locked").count(), 5);
    }

    #[test]
    fn completed_cards_get_a_badge() {
        let mut a = app();
        a.complete_day(DayId::Rose);
        let html = handle_cards_get(&mut a, MID_WEEK);
        assert!(html.contains(r#"day-card completed relative rounded-xl p-4 text-center shadow" id="day-rose""#));
        assert!(html.contains("completed-badge"));
    }

    #[test]
    fn test_mode_opens_every_card() {
        let html = handle_cards_get(&mut app(), "now=0&test=true");
        assert_eq!(html.matches("day-card unlocked").count(), 8);
        assert!(html.contains(r#"day: "valentine""#));
    }

    #[test]
    fn progress_counts_completed_days() {
        let mut a = app();
        assert!(handle_progress_get(&a, "").contains("0 / 8 Days Completed"));
        a.complete_day(DayId::Rose);
        a.complete_day(DayId::Hug);
        let html = handle_progress_get(&a, "");
        assert!(html.contains("2 / 8 Days Completed"));
        assert!(html.contains("width: 25%"));
    }

    #[test]
    fn countdown_formats_next_unlock() {
        let html = handle_countdown_get(&mut app(), MID_WEEK);
        assert!(html.contains("Next unlock in 12h 0m"));
        assert!(html.contains(r#"hx-trigger="every 60s""#));
    }

    #[test]
    fn countdown_test_mode_banner() {
        let html = handle_countdown_get(&mut app(), "now=0&test=true");
        assert!(html.contains("Test Mode Active"));
        assert!(html.contains("bg-orange-100"));
    }

    #[test]
    fn countdown_after_the_week() {
        // 2026-02-20
        let html = handle_countdown_get(&mut app(), "now=1771545600000");
        assert!(html.contains("All days unlocked!"));
    }
}
