//! Chocolate Day: memory matching over twelve tiles (six sweets, two each).
//!
//! ## Selection state machine
//!
//! ```text
//! Idle ──select──> OneRevealed ──select (same sweet)──> Idle      (both matched)
//!                      │
//!                      └──select (different)──> Resolving ──1s──> Idle (both hidden)
//! ```
//!
//! Input is locked while `Resolving`. The deal is a uniform (Fisher–Yates)
//! shuffle.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::games::{Effect, Input, MiniGame, game_header, game_message, post_attrs};
use crate::week::days::DayId;
use crate::week::timers::{TimerId, TimerSet};

/// The six sweets. Each appears on exactly two tiles.
pub const SWEETS: [&str; 6] = [
    "\u{1F36B}", // 🍫
    "\u{1F36C}", // 🍬
    "\u{1F36D}", // 🍭
    "\u{1F369}", // 🍩
    "\u{1F36A}", // 🍪
    "\u{1F9C1}", // 🧁
];

pub const PAIRS: u32 = SWEETS.len() as u32;
pub const MISMATCH_DELAY_MS: u64 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Index into `SWEETS`.
    pub sweet: usize,
    pub state: TileState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Idle,
    OneRevealed { first: usize },
    Resolving { first: usize, second: usize, timer: TimerId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    HideMismatch,
}

#[derive(Debug)]
pub struct MemoryBoard {
    rng: StdRng,
    tiles: Vec<Tile>,
    selection: Selection,
    matches: u32,
    completed: bool,
    timers: TimerSet<Task>,
}

impl MemoryBoard {
    pub fn new(rng: StdRng) -> Self {
        let mut board = Self {
            rng,
            tiles: Vec::new(),
            selection: Selection::Idle,
            matches: 0,
            completed: false,
            timers: TimerSet::new(),
        };
        board.deal();
        board
    }

    /// Fresh shuffled board with every tile hidden.
    fn deal(&mut self) {
        let mut sweets: Vec<usize> = (0..SWEETS.len()).chain(0..SWEETS.len()).collect();
        sweets.shuffle(&mut self.rng);
        self.tiles = sweets
            .into_iter()
            .map(|sweet| Tile {
                sweet,
                state: TileState::Hidden,
            })
            .collect();
        self.selection = Selection::Idle;
        self.matches = 0;
        self.completed = false;
        self.timers.cancel_all();
    }

    /// Flip a tile. Ignored while resolving a mismatch, or if the tile isn't hidden.
    pub fn select(&mut self, index: usize, now_ms: u64) -> Vec<Effect> {
        if self.input_locked() {
            return Vec::new();
        }
        match self.tiles.get(index) {
            Some(tile) if tile.state == TileState::Hidden => {}
            _ => return Vec::new(),
        }
        self.tiles[index].state = TileState::Revealed;

        let first = match self.selection {
            Selection::Idle => {
                self.selection = Selection::OneRevealed { first: index };
                return Vec::new();
            }
            Selection::OneRevealed { first } => first,
            Selection::Resolving { .. } => return Vec::new(),
        };

        if self.tiles[first].sweet == self.tiles[index].sweet {
            self.tiles[first].state = TileState::Matched;
            self.tiles[index].state = TileState::Matched;
            self.selection = Selection::Idle;
            self.matches += 1;
            debug!(matches = self.matches, "chocolate pair matched");
            if self.matches == PAIRS && !self.completed {
                self.completed = true;
                return vec![Effect::complete_with(DayId::Chocolate, self.matches)];
            }
        } else {
            let timer = self
                .timers
                .start_timeout(Task::HideMismatch, now_ms, MISMATCH_DELAY_MS);
            self.selection = Selection::Resolving {
                first,
                second: index,
                timer,
            };
        }
        Vec::new()
    }

    /// Hide the mismatched pair once its delay has elapsed.
    fn hide_mismatch(&mut self, fired: TimerId) {
        if let Selection::Resolving {
            first,
            second,
            timer,
        } = self.selection
        {
            if timer != fired {
                return;
            }
            self.tiles[first].state = TileState::Hidden;
            self.tiles[second].state = TileState::Hidden;
            self.selection = Selection::Idle;
        }
    }

    pub fn input_locked(&self) -> bool {
        matches!(self.selection, Selection::Resolving { .. })
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn matches(&self) -> u32 {
        self.matches
    }
}

impl MiniGame for MemoryBoard {
    fn day(&self) -> DayId {
        DayId::Chocolate
    }

    fn handle(&mut self, input: &Input, now_ms: u64) -> Vec<Effect> {
        match input {
            Input::SelectTile(index) => self.select(*index, now_ms),
            _ => Vec::new(),
        }
    }

    fn tick(&mut self, now_ms: u64) -> Vec<Effect> {
        while let Some(fired) = self.timers.next_due(now_ms) {
            match fired.kind {
                Task::HideMismatch => self.hide_mismatch(fired.id),
            }
        }
        Vec::new()
    }

    fn teardown(&mut self) {
        self.deal();
    }

    fn live_timers(&self) -> usize {
        self.timers.live()
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(4096);
        html.push_str(r#"<div class="game-container">"#);
        html.push_str(&game_header(DayId::Chocolate, "Find all the matching chocolate pairs!"));
        html.push_str(&format!(
            r#"<div class="game-score text-center">Matches: <span id="matchCount">{}</span> / {}</div>"#,
            self.matches, PAIRS
        ));
        html.push_str(r#"<div class="memory-grid grid grid-cols-4 gap-2 my-3" id="memoryGrid">"#);
        for (i, tile) in self.tiles.iter().enumerate() {
            match tile.state {
                TileState::Hidden => html.push_str(&format!(
                    r#"<button class="memory-card h-16 rounded-lg bg-amber-800" {}></button>"#,
                    post_attrs(DayId::Chocolate, &format!(r#"action: "select", tile: {}"#, i))
                )),
                TileState::Revealed => html.push_str(&format!(
                    r#"<div class="memory-card flipped h-16 rounded-lg bg-amber-100 text-3xl flex items-center justify-center">{}</div>"#,
                    SWEETS[tile.sweet]
                )),
                TileState::Matched => html.push_str(&format!(
                    r#"<div class="memory-card matched h-16 rounded-lg bg-emerald-100 text-3xl flex items-center justify-center">{}</div>"#,
                    SWEETS[tile.sweet]
                )),
            }
        }
        html.push_str(r#"</div>"#);
        if self.input_locked() {
            // Drive the mismatch delay from the page clock.
            html.push_str(&format!(
                r#"<div hidden hx-post="/api/play/tick" hx-trigger="load delay:{}ms" hx-target="{}" hx-swap="innerHTML" hx-vals='js:{{now: Date.now()}}'></div>"#,
                MISMATCH_DELAY_MS,
                crate::games::BODY_TARGET
            ));
        }
        if self.completed {
            html.push_str(&game_message(
                "Sweet Success!",
                "You found all the matches! Life with you is sweeter than the finest chocolate!",
            ));
        }
        html.push_str(r#"</div>"#);
        html
    }
}
