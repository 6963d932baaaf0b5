//! Mini-game engines: one independent state machine per day.
//!
//! Engines own only transient state. They never touch the progress record;
//! instead every transition returns a list of `Effect`s which the session
//! applies (mark a day complete, persist a promise, fire a heart burst).
//! `Engine` is the tagged dispatch over all eight, so the shell never
//! switches on a day name to find the right game.

pub mod chocolate;
pub mod counter;
pub mod hug;
pub mod kiss;
pub mod promise;
pub mod propose;
pub mod rose;
pub mod teddy;
pub mod valentine;

use rand::rngs::StdRng;

use crate::week::days::DayId;

/// Element every engine fragment is swapped into.
pub const BODY_TARGET: &str = "#day-body";

/// Width/height of a client-side box, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Replace non-finite or non-positive dimensions with `fallback`'s.
    pub fn or(self, fallback: Size) -> Size {
        let pick = |v: f64, d: f64| if v.is_finite() && v > 0.0 { v } else { d };
        Size {
            width: pick(self.width, fallback.width),
            height: pick(self.height, fallback.height),
        }
    }
}

/// One discrete user interaction. Engines ignore inputs that aren't theirs.
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Rose: collect the rose at this index.
    CollectRose(usize),
    /// Propose: click or hover on "No". Carries the button row's size if known.
    Decline(Option<Size>),
    /// Propose: click "YES".
    Accept,
    /// Chocolate: flip the tile at this index.
    SelectTile(usize),
    /// Teddy: add an accessory to the named slot.
    PlaceAccessory(String),
    /// Teddy: save the teddy.
    SaveTeddy,
    /// Promise: add a promise.
    AddPromise(String),
    /// Hug: send one hug.
    SendHug,
    /// Kiss: start (or restart) the catch game in a play area of this size.
    StartCatch(Option<Size>),
    /// Kiss: pointer/touch moved to this x offset within the play area.
    MoveCatcher(f64),
}

/// Requests from an engine back to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Win condition met. `tally` is the engine's final counter, if it has one.
    Complete { day: DayId, tally: Option<u32> },
    /// A promise was accepted and must be persisted.
    PromiseAdded(String),
    /// Fire the heart-burst animation.
    HeartBurst,
}

impl Effect {
    pub fn complete(day: DayId) -> Self {
        Effect::Complete { day, tally: None }
    }

    pub fn complete_with(day: DayId, tally: u32) -> Self {
        Effect::Complete {
            day,
            tally: Some(tally),
        }
    }
}

/// What an engine sees when it is mounted.
#[derive(Debug, Clone, Default)]
pub struct MountContext {
    /// Client clock at mount, epoch milliseconds.
    pub now_ms: u64,
    /// Promises already stored, in insertion order.
    pub promises: Vec<String>,
}

/// Capability every day's engine provides.
pub trait MiniGame {
    fn day(&self) -> DayId;

    /// Called once when the day's content is loaded into the modal.
    fn mount(&mut self, _ctx: &MountContext) -> Vec<Effect> {
        Vec::new()
    }

    /// Apply one user input.
    fn handle(&mut self, input: &Input, now_ms: u64) -> Vec<Effect>;

    /// Run every timer due at or before `now_ms`.
    fn tick(&mut self, _now_ms: u64) -> Vec<Effect> {
        Vec::new()
    }

    /// Stop every timer and drop transient state. Safe to call twice.
    fn teardown(&mut self) {}

    /// Timers still armed. Zero after `teardown`.
    fn live_timers(&self) -> usize {
        0
    }

    /// The engine's current HTML fragment.
    fn render(&self) -> String;
}

/// Tagged dispatch over the eight engines.
#[derive(Debug)]
pub enum Engine {
    Rose(rose::RoseGarden),
    Propose(propose::Proposal),
    Chocolate(chocolate::MemoryBoard),
    Teddy(teddy::TeddyWorkshop),
    Promise(promise::PromiseTree),
    Hug(hug::HugMeter),
    Kiss(kiss::KissCatch),
    Valentine(valentine::LoveLetter),
}

macro_rules! each_engine {
    ($self:expr, $e:ident => $body:expr) => {
        match $self {
            Engine::Rose($e) => $body,
            Engine::Propose($e) => $body,
            Engine::Chocolate($e) => $body,
            Engine::Teddy($e) => $body,
            Engine::Promise($e) => $body,
            Engine::Hug($e) => $body,
            Engine::Kiss($e) => $body,
            Engine::Valentine($e) => $body,
        }
    };
}

impl Engine {
    /// Fresh engine for `day`. Engines that need randomness take ownership of `rng`.
    pub fn for_day(day: DayId, rng: StdRng) -> Self {
        match day {
            DayId::Rose => Engine::Rose(rose::RoseGarden::new()),
            DayId::Propose => Engine::Propose(propose::Proposal::new(rng)),
            DayId::Chocolate => Engine::Chocolate(chocolate::MemoryBoard::new(rng)),
            DayId::Teddy => Engine::Teddy(teddy::TeddyWorkshop::new(rng)),
            DayId::Promise => Engine::Promise(promise::PromiseTree::new()),
            DayId::Hug => Engine::Hug(hug::HugMeter::new()),
            DayId::Kiss => Engine::Kiss(kiss::KissCatch::new(rng)),
            DayId::Valentine => Engine::Valentine(valentine::LoveLetter::new()),
        }
    }
}

impl MiniGame for Engine {
    fn day(&self) -> DayId {
        each_engine!(self, e => e.day())
    }

    fn mount(&mut self, ctx: &MountContext) -> Vec<Effect> {
        each_engine!(self, e => e.mount(ctx))
    }

    fn handle(&mut self, input: &Input, now_ms: u64) -> Vec<Effect> {
        each_engine!(self, e => e.handle(input, now_ms))
    }

    fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        each_engine!(self, e => e.tick(now_ms))
    }

    fn teardown(&mut self) {
        each_engine!(self, e => e.teardown())
    }

    fn live_timers(&self) -> usize {
        each_engine!(self, e => e.live_timers())
    }

    fn render(&self) -> String {
        each_engine!(self, e => e.render())
    }
}

/// `hx-post` attributes for an engine control. `vals` is the body of a
/// `js:{...}` object; the client clock is always appended as `now`.
pub(crate) fn post_attrs(day: DayId, vals: &str) -> String {
    let sep = if vals.is_empty() { "" } else { ", " };
    format!(
        r#"hx-post="/api/play/{}" hx-target="{}" hx-swap="innerHTML" hx-vals='js:{{{}{}now: Date.now()}}'"#,
        day.slug(),
        BODY_TARGET,
        vals,
        sep
    )
}

/// Shared modal header: emoji-framed title plus instructions.
pub(crate) fn game_header(day: DayId, instructions: &str) -> String {
    format!(
        r#"<h2 class="game-title text-2xl font-bold text-center">{e} {t} {e}</h2><p class="game-instructions text-center text-sm mb-3">{i}</p>"#,
        e = day.emoji(),
        t = day.title(),
        i = instructions
    )
}

/// Celebration box shown once a game is won.
pub(crate) fn game_message(heading: &str, body: &str) -> String {
    format!(
        r#"<div class="game-message bg-pink-50 border border-pink-300 rounded-lg p-4 mt-4 text-center"><h3 class="font-bold text-lg">{}</h3><p>{}</p></div>"#,
        heading, body
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn for_day_builds_matching_engine() {
        for day in DayId::ALL {
            let engine = Engine::for_day(day, StdRng::seed_from_u64(7));
            assert_eq!(engine.day(), day);
            assert!(!engine.render().is_empty());
        }
    }

    #[test]
    fn engines_ignore_foreign_inputs() {
        let mut engine = Engine::for_day(DayId::Hug, StdRng::seed_from_u64(1));
        assert!(engine.handle(&Input::SelectTile(0), 0).is_empty());
        assert!(engine.handle(&Input::Accept, 0).is_empty());
        assert!(engine.handle(&Input::SaveTeddy, 0).is_empty());
    }

    #[test]
    fn teardown_leaves_no_timers_for_any_engine() {
        for day in DayId::ALL {
            let mut engine = Engine::for_day(day, StdRng::seed_from_u64(3));
            engine.mount(&MountContext::default());
            engine.handle(&Input::StartCatch(None), 0);
            engine.handle(&Input::SelectTile(0), 0);
            engine.handle(&Input::SelectTile(1), 0);
            engine.teardown();
            assert_eq!(engine.live_timers(), 0, "{day}");
        }
    }

    #[test]
    fn size_fallback_replaces_bad_dimensions() {
        let s = Size::new(f64::NAN, -3.0).or(Size::new(320.0, 400.0));
        assert_eq!(s, Size::new(320.0, 400.0));
        let s = Size::new(500.0, 0.0).or(Size::new(320.0, 400.0));
        assert_eq!(s, Size::new(500.0, 400.0));
    }

    #[test]
    fn post_attrs_append_client_clock() {
        let attrs = post_attrs(DayId::Rose, r#"action: "collect", tile: 3"#);
        assert!(attrs.contains(r#"hx-post="/api/play/rose""#));
        assert!(attrs.contains(r#"js:{action: "collect", tile: 3, now: Date.now()}"#));
        assert!(post_attrs(DayId::Hug, "").contains("js:{now: Date.now()}"));
    }
}
