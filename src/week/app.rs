//! Session state holder: progress tracker, unlock schedule and the one
//! mounted mini-game.
//!
//! ```text
//!              open_day(d)                      close()
//!   (none) ─────────────────> Engine(d) ───────────────────> (none)
//!      ^                        │   │                          ^
//!      │                        │   └─ open_day(e): teardown d, mount e
//!      └────────────────────────┘
//!          effects ─> tracker / celebrations
//! ```
//!
//! Engines never see the tracker. Their `Effect`s are applied here, which is
//! also where confetti gets suppressed for days that were already complete.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::games::{Effect, Engine, Input, MiniGame, MountContext};
use crate::week::days::DayId;
use crate::week::progress::{ProgressError, ProgressTracker};
use crate::week::schedule::{NextUnlock, UnlockSchedule, instant_at};
use crate::week::store::ProgressStore;

/// Client wall clock plus the test switch, as read from one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    /// Epoch milliseconds.
    pub now_ms: u64,
    pub test_mode: bool,
}

impl Clock {
    pub fn new(now_ms: u64, test_mode: bool) -> Self {
        Self { now_ms, test_mode }
    }
}

/// Derived card state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayStatus {
    Locked,
    Unlocked,
    Completed,
}

impl DayStatus {
    /// CSS class used on the day card.
    pub fn class(self) -> &'static str {
        match self {
            DayStatus::Locked => "locked",
            DayStatus::Unlocked => "unlocked",
            DayStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCard {
    pub day: DayId,
    pub status: DayStatus,
}

/// Decorative effect the page should play. Fire and forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Celebration {
    Confetti,
    HeartBurst,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("{0} is still locked")]
    Locked(DayId),
    #[error("{0} is not open")]
    NotOpen(DayId),
}

#[derive(Debug)]
pub struct App<S> {
    tracker: ProgressTracker<S>,
    schedule: UnlockSchedule,
    active: Option<Engine>,
    rng: StdRng,
    /// Latest client time seen this session. Unlock checks never go below it.
    high_water_ms: u64,
}

impl<S: ProgressStore> App<S> {
    pub fn new(store: S) -> Self {
        Self::with_rng(store, StdRng::from_entropy())
    }

    /// Deterministic engine randomness, for tests.
    pub fn with_seed(store: S, seed: u64) -> Self {
        Self::with_rng(store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(store: S, rng: StdRng) -> Self {
        Self {
            tracker: ProgressTracker::load(store),
            schedule: UnlockSchedule::default(),
            active: None,
            rng,
            high_water_ms: 0,
        }
    }

    pub fn tracker(&self) -> &ProgressTracker<S> {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut ProgressTracker<S> {
        &mut self.tracker
    }

    pub fn schedule(&self) -> &UnlockSchedule {
        &self.schedule
    }

    pub fn active(&self) -> Option<&Engine> {
        self.active.as_ref()
    }

    pub fn active_day(&self) -> Option<DayId> {
        self.active.as_ref().map(MiniGame::day)
    }

    /// Fold `clock` into the session high-water mark and return the instant
    /// unlock checks should use.
    fn observe(&mut self, clock: Clock) -> DateTime<Utc> {
        self.high_water_ms = self.high_water_ms.max(clock.now_ms);
        instant_at(self.high_water_ms)
    }

    pub fn is_unlocked(&mut self, day: DayId, clock: Clock) -> bool {
        let now = self.observe(clock);
        self.schedule.is_unlocked(day, now, clock.test_mode)
    }

    /// Locked wins over completed: a day finished under the test switch shows
    /// as locked again once the switch is off and its date is still ahead.
    pub fn status(&mut self, day: DayId, clock: Clock) -> DayStatus {
        if !self.is_unlocked(day, clock) {
            DayStatus::Locked
        } else if self.tracker.is_complete(day) {
            DayStatus::Completed
        } else {
            DayStatus::Unlocked
        }
    }

    /// One card per day in canonical order.
    pub fn cards(&mut self, clock: Clock) -> Vec<DayCard> {
        DayId::ALL
            .iter()
            .map(|&day| DayCard {
                day,
                status: self.status(day, clock),
            })
            .collect()
    }

    pub fn next_unlock(&mut self, clock: Clock) -> Option<NextUnlock> {
        let now = self.observe(clock);
        self.schedule.next_unlock(now)
    }

    /// Tear down whatever is open and mount a fresh engine for `day`.
    /// Locked days are refused and leave the current engine alone.
    pub fn open_day(&mut self, day: DayId, clock: Clock) -> Result<Vec<Celebration>, SessionError> {
        if !self.is_unlocked(day, clock) {
            debug!(%day, "open refused, day locked");
            return Err(SessionError::Locked(day));
        }
        self.close();
        let seed: u64 = self.rng.r#gen();
        let mut engine = Engine::for_day(day, StdRng::seed_from_u64(seed));
        let ctx = MountContext {
            now_ms: clock.now_ms,
            promises: self.tracker.promises().to_vec(),
        };
        let effects = engine.mount(&ctx);
        self.active = Some(engine);
        info!(%day, "day opened");
        Ok(self.apply(effects))
    }

    /// Stop the open engine's timers and drop it. No-op when nothing is open.
    pub fn close(&mut self) {
        if let Some(mut engine) = self.active.take() {
            engine.teardown();
            debug!(day = %engine.day(), "day closed");
        }
    }

    /// Mark `day` complete from outside any engine. Idempotent.
    pub fn complete_day(&mut self, day: DayId) -> Vec<Celebration> {
        self.apply(vec![Effect::complete(day)])
    }

    /// Deliver one input to the engine for `day`. Inputs for a day that isn't
    /// open change nothing.
    pub fn input(
        &mut self,
        day: DayId,
        input: &Input,
        clock: Clock,
    ) -> Result<Vec<Celebration>, SessionError> {
        self.observe(clock);
        let engine = match self.active.as_mut() {
            Some(engine) if engine.day() == day => engine,
            _ => return Err(SessionError::NotOpen(day)),
        };
        // Timers due before this input run against the state they were due in.
        let mut effects = engine.tick(clock.now_ms);
        effects.extend(engine.handle(input, clock.now_ms));
        Ok(self.apply(effects))
    }

    /// Fire every timer of the open engine due at or before `clock.now_ms`.
    pub fn tick(&mut self, clock: Clock) -> Vec<Celebration> {
        self.observe(clock);
        let effects = match self.active.as_mut() {
            Some(engine) => engine.tick(clock.now_ms),
            None => return Vec::new(),
        };
        self.apply(effects)
    }

    /// Current fragment of the open engine.
    pub fn render_active(&self) -> Option<String> {
        self.active.as_ref().map(MiniGame::render)
    }

    pub fn restore(&mut self, blob: &str) -> Result<(), ProgressError> {
        self.tracker.restore(blob)
    }

    pub fn export_json(&self) -> String {
        self.tracker.export_json()
    }

    pub fn store_mut(&mut self) -> &mut S {
        self.tracker.store_mut()
    }

    fn apply(&mut self, effects: Vec<Effect>) -> Vec<Celebration> {
        let mut celebrations = Vec::new();
        for effect in effects {
            match effect {
                Effect::Complete { day, tally } => {
                    if self.tracker.mark_complete_with_tally(day, tally) {
                        celebrations.push(Celebration::Confetti);
                    }
                }
                Effect::PromiseAdded(text) => {
                    self.tracker.append_promise(&text);
                }
                Effect::HeartBurst => celebrations.push(Celebration::HeartBurst),
            }
        }
        celebrations
    }
}
