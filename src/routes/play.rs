//! `/api/play/*` routes: user input and timer ticks for the open mini-game.
//!
//! Every control an engine renders posts back here with an `action` and the
//! client clock. The response is the engine's re-rendered fragment, followed
//! by a celebration script when something was won.

use crate::games::{Input, Size};
use crate::routes::util::{
    celebration_script, clock_from, get_f64, get_param, parse_form_body, unknown_day,
};
use crate::week::app::App;
use crate::week::days::DayId;
use crate::week::store::ProgressStore;

/// Map an `action` and its params to the engine input it stands for.
/// `None` for actions the day doesn't know.
pub fn parse_input(day: DayId, params: &[(String, String)]) -> Option<Input> {
    let action = get_param(params, "action").unwrap_or("");
    let index = || get_param(params, "tile").and_then(|s| s.trim().parse::<usize>().ok());
    let size = || match (get_f64(params, "width"), get_f64(params, "height")) {
        (Some(w), Some(h)) => Some(Size::new(w, h)),
        _ => None,
    };
    match (day, action) {
        (DayId::Rose, "collect") => index().map(Input::CollectRose),
        (DayId::Propose, "decline") => Some(Input::Decline(size())),
        (DayId::Propose, "accept") => Some(Input::Accept),
        (DayId::Chocolate, "select") => index().map(Input::SelectTile),
        (DayId::Teddy, "place") => Some(Input::PlaceAccessory(
            get_param(params, "slot").unwrap_or("").to_string(),
        )),
        (DayId::Teddy, "save") => Some(Input::SaveTeddy),
        (DayId::Promise, "promise") => Some(Input::AddPromise(
            get_param(params, "text").unwrap_or("").to_string(),
        )),
        (DayId::Hug, "hug") => Some(Input::SendHug),
        (DayId::Kiss, "start") => Some(Input::StartCatch(size())),
        (DayId::Kiss, "move") => get_f64(params, "x").map(Input::MoveCatcher),
        _ => None,
    }
}

// ── POST /api/play/{day} ───────────────────────────────────────────

/// Handle POST /api/play/{day}
/// Body: action={name}&now={ms}[&tile=|slot=|text=|width=&height=|x=]
/// Inputs for a day that isn't open return an empty fragment. Unknown
/// actions re-render the engine unchanged.
pub fn handle_play_post<S: ProgressStore>(app: &mut App<S>, slug: &str, body: &str) -> String {
    let Some(day) = DayId::from_slug(slug) else {
        return unknown_day();
    };
    if app.active_day() != Some(day) {
        return String::new();
    }
    let params = parse_form_body(body);
    let clock = clock_from(&params);
    let celebrations = match parse_input(day, &params) {
        Some(input) => app.input(day, &input, clock).unwrap_or_default(),
        None => Vec::new(),
    };
    let mut html = app.render_active().unwrap_or_default();
    html.push_str(&celebration_script(&celebrations));
    html
}

// ── POST /api/play/tick ────────────────────────────────────────────

/// Handle POST /api/play/tick
/// Body: now={ms}
/// Runs every due engine timer and returns the re-rendered fragment.
pub fn handle_tick_post<S: ProgressStore>(app: &mut App<S>, body: &str) -> String {
    let params = parse_form_body(body);
    let celebrations = app.tick(clock_from(&params));
    let mut html = app.render_active().unwrap_or_default();
    html.push_str(&celebration_script(&celebrations));
    html
}
