//! Kiss Day: catch falling kisses with a heart-shaped catcher.
//!
//! Runs on three kinds of timers while a round is active:
//!
//! - **spawn** (every 800 ms): drop a new kiss at a random x
//! - **check** (every 50 ms, one per kiss): AABB test against the catcher;
//!   a catch scores, a kiss below the play area is dropped without penalty
//! - **timeout** (30 s): end the round regardless of score
//!
//! Each kiss owns its check timer handle; removing the kiss cancels it.
//! Ending a round cancels every timer. Reaching 15 ends the round early.
//! Rounds don't accumulate: only a score of 15+ when a round ends completes
//! the day.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::games::{BODY_TARGET, Effect, Input, MiniGame, Size, game_header, game_message, post_attrs};
use crate::week::days::DayId;
use crate::week::timers::{TimerId, TimerSet};

pub const SPAWN_INTERVAL_MS: u64 = 800;
pub const CHECK_INTERVAL_MS: u64 = 50;
pub const ROUND_TIMEOUT_MS: u64 = 30_000;
pub const TARGET_SCORE: u32 = 15;

/// Kisses are square.
pub const KISS_SIZE: f64 = 40.0;
/// Constant fall rate, px per second.
pub const FALL_SPEED: f64 = 200.0;
/// The catcher is square.
pub const CATCHER_SIZE: f64 = 50.0;
/// Gap between the catcher's bottom edge and the floor.
pub const CATCHER_FLOOR_GAP: f64 = 10.0;
/// Catcher centre keeps this far from either wall.
pub const CATCHER_MARGIN: f64 = 40.0;
pub const DEFAULT_AREA: Size = Size::new(320.0, 400.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    Spawn,
    Check(u64),
    Timeout,
}

/// Axis-aligned box in play-area pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    /// Touching edges count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right < other.left
            || self.left > other.right
            || self.bottom < other.top
            || self.top > other.bottom)
    }
}

/// One falling kiss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallingKiss {
    pub id: u64,
    pub left: f64,
    pub spawned_ms: u64,
    /// Handle of this kiss's collision check.
    pub check: TimerId,
}

impl FallingKiss {
    /// Starts fully above the play area and falls at `FALL_SPEED`.
    pub fn top_at(&self, now_ms: u64) -> f64 {
        let elapsed = now_ms.saturating_sub(self.spawned_ms) as f64 / 1_000.0;
        -KISS_SIZE + FALL_SPEED * elapsed
    }

    pub fn rect_at(&self, now_ms: u64) -> Rect {
        let top = self.top_at(now_ms);
        Rect {
            left: self.left,
            top,
            right: self.left + KISS_SIZE,
            bottom: top + KISS_SIZE,
        }
    }
}

#[derive(Debug)]
pub struct KissCatch {
    rng: StdRng,
    area: Size,
    catcher_x: f64,
    score: u32,
    active: bool,
    rounds: u32,
    next_kiss: u64,
    kisses: Vec<FallingKiss>,
    timers: TimerSet<Task>,
    last_tick_ms: u64,
    last_result: Option<u32>,
}

impl KissCatch {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            area: DEFAULT_AREA,
            catcher_x: DEFAULT_AREA.width / 2.0,
            score: 0,
            active: false,
            rounds: 0,
            next_kiss: 1,
            kisses: Vec::new(),
            timers: TimerSet::new(),
            last_tick_ms: 0,
            last_result: None,
        }
    }

    /// Start a round. Ignored while one is running.
    pub fn start(&mut self, area: Option<Size>, now_ms: u64) -> Vec<Effect> {
        if self.active {
            return Vec::new();
        }
        self.timers.cancel_all();
        self.kisses.clear();
        self.area = area.map_or(DEFAULT_AREA, |a| a.or(DEFAULT_AREA));
        self.catcher_x = self.clamp_catcher(self.area.width / 2.0);
        self.score = 0;
        self.active = true;
        self.rounds += 1;
        self.last_tick_ms = now_ms;
        self.last_result = None;
        self.timers.start_interval(Task::Spawn, now_ms, SPAWN_INTERVAL_MS);
        self.timers.start_timeout(Task::Timeout, now_ms, ROUND_TIMEOUT_MS);
        debug!(round = self.rounds, "kiss round started");
        Vec::new()
    }

    /// Pointer/touch moved. Only tracked during a round.
    pub fn move_catcher(&mut self, x: f64) {
        if !self.active || !x.is_finite() {
            return;
        }
        self.catcher_x = self.clamp_catcher(x);
    }

    fn clamp_catcher(&self, x: f64) -> f64 {
        let min = CATCHER_MARGIN;
        let max = self.area.width - CATCHER_MARGIN;
        if max < min {
            return self.area.width / 2.0;
        }
        x.clamp(min, max)
    }

    pub fn catcher_rect(&self) -> Rect {
        let half = CATCHER_SIZE / 2.0;
        let bottom = self.area.height - CATCHER_FLOOR_GAP;
        Rect {
            left: self.catcher_x - half,
            top: bottom - CATCHER_SIZE,
            right: self.catcher_x + half,
            bottom,
        }
    }

    fn spawn(&mut self, at_ms: u64) {
        let max_left = (self.area.width - KISS_SIZE).max(0.0);
        let left = self.rng.gen_range(0.0..=max_left);
        let id = self.next_kiss;
        self.next_kiss += 1;
        let check = self.timers.start_interval(Task::Check(id), at_ms, CHECK_INTERVAL_MS);
        self.kisses.push(FallingKiss {
            id,
            left,
            spawned_ms: at_ms,
            check,
        });
    }

    fn remove_kiss(&mut self, id: u64) {
        if let Some(pos) = self.kisses.iter().position(|k| k.id == id) {
            let kiss = self.kisses.remove(pos);
            self.timers.cancel(kiss.check);
        }
    }

    /// Returns effects if the catch ended the round.
    fn check(&mut self, id: u64, at_ms: u64) -> Vec<Effect> {
        let Some(kiss) = self.kisses.iter().find(|k| k.id == id).copied() else {
            return Vec::new();
        };
        let rect = kiss.rect_at(at_ms);
        if rect.overlaps(&self.catcher_rect()) {
            self.score += 1;
            self.remove_kiss(id);
            if self.score >= TARGET_SCORE {
                return self.end_round();
            }
        } else if rect.top > self.area.height {
            self.remove_kiss(id);
        }
        Vec::new()
    }

    /// Stop every timer, clear in-flight kisses and settle the round.
    pub fn end_round(&mut self) -> Vec<Effect> {
        if !self.active {
            return Vec::new();
        }
        self.active = false;
        self.timers.cancel_all();
        self.kisses.clear();
        self.last_result = Some(self.score);
        info!(score = self.score, "kiss round ended");
        if self.score >= TARGET_SCORE {
            return vec![Effect::complete_with(DayId::Kiss, self.score)];
        }
        Vec::new()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn kisses(&self) -> &[FallingKiss] {
        &self.kisses
    }

    pub fn catcher_x(&self) -> f64 {
        self.catcher_x
    }

    pub fn last_result(&self) -> Option<u32> {
        self.last_result
    }
}

impl MiniGame for KissCatch {
    fn day(&self) -> DayId {
        DayId::Kiss
    }

    fn handle(&mut self, input: &Input, now_ms: u64) -> Vec<Effect> {
        match input {
            Input::StartCatch(area) => self.start(*area, now_ms),
            Input::MoveCatcher(x) => {
                self.move_catcher(*x);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(fired) = self.timers.next_due(now_ms) {
            match fired.kind {
                Task::Spawn => self.spawn(fired.due_ms),
                Task::Check(id) => effects.extend(self.check(id, fired.due_ms)),
                Task::Timeout => effects.extend(self.end_round()),
            }
        }
        if self.active {
            self.last_tick_ms = self.last_tick_ms.max(now_ms);
        }
        effects
    }

    /// Leaving the day abandons the round without settling it.
    fn teardown(&mut self) {
        self.timers.cancel_all();
        self.kisses.clear();
        self.active = false;
        self.score = 0;
        self.rounds = 0;
        self.last_result = None;
    }

    fn live_timers(&self) -> usize {
        self.timers.live()
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str(r#"<div class="game-container text-center">"#);
        html.push_str(&game_header(
            DayId::Kiss,
            "Move your mouse/finger to catch falling kisses!",
        ));
        html.push_str(&format!(
            r#"<div class="game-score">Score: <span id="kissScore">{}</span></div>"#,
            self.score
        ));

        let move_vals = r#"action: "move", x: (event.touches ? event.touches[0].clientX : event.clientX) - this.getBoundingClientRect().left"#;
        html.push_str(&format!(
            r#"<div class="kiss-game-area relative overflow-hidden mx-auto bg-pink-50 rounded-lg" id="kissGameArea" style="width: {:.0}px; height: {:.0}px""#,
            self.area.width, self.area.height
        ));
        if self.active {
            html.push_str(&format!(
                r#" hx-trigger="mousemove throttle:30ms, touchmove throttle:30ms" {}"#,
                post_attrs(DayId::Kiss, move_vals)
            ));
        }
        html.push('>');

        let catcher = self.catcher_rect();
        html.push_str(&format!(
            r#"<div class="kiss-catcher absolute text-4xl" id="kissCatcher" style="left: {:.0}px; top: {:.0}px">&#x1F49D;</div>"#,
            catcher.left, catcher.top
        ));
        for kiss in &self.kisses {
            html.push_str(&format!(
                r#"<div class="falling-kiss absolute text-3xl" style="left: {:.0}px; top: {:.0}px">&#x1F48B;</div>"#,
                kiss.left,
                kiss.top_at(self.last_tick_ms)
            ));
        }
        html.push_str(r#"</div>"#);

        if self.active {
            html.push_str(&format!(
                r#"<div hidden hx-post="/api/play/tick" hx-trigger="every {}ms" hx-target="{}" hx-swap="innerHTML" hx-vals='js:{{now: Date.now()}}'></div>"#,
                CHECK_INTERVAL_MS, BODY_TARGET
            ));
        } else {
            let label = if self.rounds == 0 { "Start Game" } else { "Play Again" };
            let vals = r#"action: "start", width: document.getElementById('kissGameArea').offsetWidth, height: document.getElementById('kissGameArea').offsetHeight"#;
            html.push_str(&format!(
                r#"<button class="btn-primary bg-pink-500 text-white font-bold py-2 px-6 rounded-full mt-3" id="startKissGame" {}>{}</button>"#,
                post_attrs(DayId::Kiss, vals),
                label
            ));
        }

        if let Some(score) = self.last_result {
            if score >= TARGET_SCORE {
                html.push_str(&game_message(
                    "Amazing Catch!",
                    &format!("You caught {} kisses! Every kiss from you is precious!", score),
                ));
            }
        }
        html.push_str(r#"</div>"#);
        html
    }
}
