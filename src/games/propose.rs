//! Propose Day: the "No" button runs away, shrinks and finally vanishes,
//! while "YES" keeps growing.
//!
//! ```text
//! Asking ──decline×n──> Asking (prompt escalates) ──n > 8──> OnlyYes
//!    │                                                          │
//!    └──────────────────────────accept──────────────────────────┴──> Accepted (terminal)
//! ```
//!
//! Hover and click count the same toward escalation.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use crate::games::{Effect, Input, MiniGame, Size, game_header, game_message, post_attrs};
use crate::week::days::DayId;

pub const OPENING_QUESTION: &str = "Will you be mine forever?";
pub const FINAL_PROMPT: &str = "There's only one answer now!";

/// Escalating prompts; attempt `n` shows entry `n - 1`, clamped to the last.
pub const PROMPTS: [&str; 5] = [
    "Are you sure?",
    "Please? I promise to make you happy!",
    "Think about it... Just click YES!",
    "The YES button is looking pretty good, right?",
    "Come on, you know you want to say YES!",
];

/// Attempts after which "No" disappears.
pub const VANISH_AFTER: u32 = 8;
pub const SCALE_STEP: f64 = 0.1;
pub const MIN_DECLINE_SCALE: f64 = 0.3;

/// Button row size assumed when the client doesn't report one.
pub const DEFAULT_CONTAINER: Size = Size::new(320.0, 160.0);
/// Unscaled size of the "No" button.
pub const DECLINE_CONTROL: Size = Size::new(80.0, 40.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Asking,
    /// "No" is transparent and ignores input.
    OnlyYes,
    Accepted,
}

#[derive(Debug)]
pub struct Proposal {
    rng: StdRng,
    attempts: u32,
    accept_scale: f64,
    decline_scale: f64,
    /// Offset of "No" inside its row, in pixels.
    decline_pos: (f64, f64),
    phase: Phase,
}

impl Proposal {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            attempts: 0,
            accept_scale: 1.0,
            decline_scale: 1.0,
            decline_pos: (0.0, 0.0),
            phase: Phase::Asking,
        }
    }

    /// One decline interaction (click or hover).
    pub fn decline(&mut self, container: Option<Size>) -> Vec<Effect> {
        if self.phase != Phase::Asking {
            return Vec::new();
        }
        self.attempts += 1;
        self.decline_scale = (1.0 - self.attempts as f64 * SCALE_STEP).max(MIN_DECLINE_SCALE);
        self.accept_scale += SCALE_STEP;
        self.relocate(container.map_or(DEFAULT_CONTAINER, |c| c.or(DEFAULT_CONTAINER)));
        if self.attempts > VANISH_AFTER {
            self.phase = Phase::OnlyYes;
        }
        debug!(attempts = self.attempts, scale = self.decline_scale, "decline dodged");
        Vec::new()
    }

    /// Accept. Terminal; repeated accepts do nothing.
    pub fn accept(&mut self) -> Vec<Effect> {
        if self.phase == Phase::Accepted {
            return Vec::new();
        }
        self.phase = Phase::Accepted;
        vec![Effect::complete(DayId::Propose), Effect::HeartBurst]
    }

    /// Random spot that keeps the scaled button fully inside the row.
    fn relocate(&mut self, container: Size) {
        let max_x = (container.width - DECLINE_CONTROL.width * self.decline_scale).max(0.0);
        let max_y = (container.height - DECLINE_CONTROL.height * self.decline_scale).max(0.0);
        self.decline_pos = (
            self.rng.gen_range(0.0..=max_x),
            self.rng.gen_range(0.0..=max_y),
        );
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn decline_scale(&self) -> f64 {
        self.decline_scale
    }

    pub fn accept_scale(&self) -> f64 {
        self.accept_scale
    }

    pub fn decline_position(&self) -> (f64, f64) {
        self.decline_pos
    }

    pub fn decline_interactive(&self) -> bool {
        self.phase == Phase::Asking
    }

    pub fn prompt(&self) -> &'static str {
        if self.phase == Phase::OnlyYes || self.attempts > VANISH_AFTER {
            return FINAL_PROMPT;
        }
        match self.attempts {
            0 => OPENING_QUESTION,
            n => PROMPTS[(n as usize).min(PROMPTS.len()) - 1],
        }
    }
}

impl MiniGame for Proposal {
    fn day(&self) -> DayId {
        DayId::Propose
    }

    fn handle(&mut self, input: &Input, _now_ms: u64) -> Vec<Effect> {
        match input {
            Input::Decline(container) => self.decline(*container),
            Input::Accept => self.accept(),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) {
        self.attempts = 0;
        self.accept_scale = 1.0;
        self.decline_scale = 1.0;
        self.decline_pos = (0.0, 0.0);
        self.phase = Phase::Asking;
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(2048);
        html.push_str(r#"<div class="game-container text-center">"#);
        html.push_str(&game_header(
            DayId::Propose,
            "I have a very important question for you...",
        ));

        if self.phase == Phase::Accepted {
            html.push_str(&game_message(
                "YES!",
                "You've made me the happiest person in the world! I promise to love you more each day!",
            ));
            html.push_str(r#"</div>"#);
            return html;
        }

        html.push_str(&format!(
            r#"<h3 class="proposal-question text-xl font-bold my-3">{}</h3>"#,
            self.prompt()
        ));
        html.push_str(r#"<div class="proposal-buttons relative h-40" id="proposalButtons">"#);
        html.push_str(&format!(
            r#"<button class="proposal-btn yes-btn bg-pink-500 text-white font-bold py-2 px-6 rounded-full" style="transform: scale({:.1})" {}>YES! &#x1F496;</button>"#,
            self.accept_scale,
            post_attrs(DayId::Propose, r#"action: "accept""#)
        ));

        let (x, y) = self.decline_pos;
        if self.decline_interactive() {
            // Hover and click both post a decline with the row's live size.
            let vals = r#"action: "decline", width: document.getElementById('proposalButtons').offsetWidth, height: document.getElementById('proposalButtons').offsetHeight"#;
            html.push_str(&format!(
                r#"<button class="proposal-btn no-btn absolute bg-slate-200 py-2 px-4 rounded-full transition-all" style="left: {:.0}px; top: {:.0}px; transform: scale({:.1}); transform-origin: top left" hx-trigger="click, mouseenter" {}>No</button>"#,
                x,
                y,
                self.decline_scale,
                post_attrs(DayId::Propose, vals)
            ));
        } else {
            html.push_str(&format!(
                r#"<button class="proposal-btn no-btn absolute" style="left: {:.0}px; top: {:.0}px; transform: scale({:.1}); transform-origin: top left; opacity: 0; pointer-events: none" disabled>No</button>"#,
                x, y, self.decline_scale
            ));
        }
        html.push_str(r#"</div></div>"#);
        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn proposal() -> Proposal {
        Proposal::new(StdRng::seed_from_u64(14))
    }

    #[test]
    fn prompts_escalate_then_clamp() {
        let mut p = proposal();
        assert_eq!(p.prompt(), OPENING_QUESTION);
        for (i, expected) in PROMPTS.iter().enumerate() {
            p.decline(None);
            assert_eq!(p.attempts() as usize, i + 1);
            assert_eq!(p.prompt(), *expected);
        }
        p.decline(None);
        assert_eq!(p.prompt(), PROMPTS[PROMPTS.len() - 1]);
    }

    #[test]
    fn decline_vanishes_after_nine_attempts() {
        let mut p = proposal();
        for _ in 0..VANISH_AFTER {
            p.decline(None);
        }
        assert!(p.decline_interactive());
        p.decline(None);
        assert_eq!(p.attempts(), 9);
        assert!(!p.decline_interactive());
        assert_eq!(p.prompt(), FINAL_PROMPT);

        // Further declines are ignored.
        p.decline(None);
        assert_eq!(p.attempts(), 9);
        let html = p.render();
        assert!(html.contains("opacity: 0; pointer-events: none"));
        assert!(html.contains(FINAL_PROMPT));
    }

    #[test]
    fn decline_scale_floors_and_accept_grows() {
        let mut p = proposal();
        for _ in 0..9 {
            p.decline(None);
            assert!(p.decline_scale() >= MIN_DECLINE_SCALE);
        }
        assert!((p.decline_scale() - MIN_DECLINE_SCALE).abs() < 1e-9);
        assert!((p.accept_scale() - 1.9).abs() < 1e-9);
    }

    #[test]
    fn relocation_stays_inside_the_row() {
        let mut p = proposal();
        let row = Size::new(200.0, 60.0);
        for _ in 0..9 {
            p.decline(Some(row));
            let (x, y) = p.decline_position();
            let w = DECLINE_CONTROL.width * p.decline_scale();
            let h = DECLINE_CONTROL.height * p.decline_scale();
            assert!(x >= 0.0 && x + w <= row.width + 1e-9);
            assert!(y >= 0.0 && y + h <= row.height + 1e-9);
        }
    }

    #[test]
    fn decline_scales_from_its_placed_corner() {
        let mut p = proposal();
        p.decline(Some(Size::new(200.0, 60.0)));
        let html = p.render();
        assert!(html.contains("transform: scale(0.9); transform-origin: top left"));
        for _ in 0..8 {
            p.decline(None);
        }
        assert!(p.render().contains("transform-origin: top left; opacity: 0"));
    }

    #[test]
    fn tiny_container_pins_to_origin() {
        let mut p = proposal();
        p.decline(Some(Size::new(10.0, 10.0)));
        assert_eq!(p.decline_position(), (0.0, 0.0));
    }

    #[test]
    fn accept_is_terminal_and_completes_once() {
        let mut p = proposal();
        p.decline(None);
        assert_eq!(
            p.accept(),
            vec![Effect::complete(DayId::Propose), Effect::HeartBurst]
        );
        assert_eq!(p.phase(), Phase::Accepted);
        assert!(p.accept().is_empty());
        assert!(p.decline(None).is_empty());
        assert_eq!(p.attempts(), 1);
        assert!(p.render().contains("YES!"));
        assert!(!p.render().contains("no-btn"));
    }

    #[test]
    fn accept_still_works_after_no_vanishes() {
        let mut p = proposal();
        for _ in 0..12 {
            p.decline(None);
        }
        assert_eq!(p.accept().len(), 2);
    }
}
