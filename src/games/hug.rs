//! Hug Day: send twenty hugs to fill the warmth meter.

use crate::games::counter::ThresholdCounter;
use crate::games::{Effect, Input, MiniGame, game_header, game_message, post_attrs};
use crate::week::days::DayId;

pub const TARGET_HUGS: u32 = 20;

#[derive(Debug, Clone)]
pub struct HugMeter {
    counter: ThresholdCounter,
}

impl Default for HugMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl HugMeter {
    pub fn new() -> Self {
        Self {
            counter: ThresholdCounter::new(TARGET_HUGS),
        }
    }

    /// One hug. The button stays live past the target; completion fires once.
    pub fn send(&mut self) -> Vec<Effect> {
        if self.counter.increment() {
            return vec![Effect::complete_with(DayId::Hug, self.counter.count())];
        }
        Vec::new()
    }

    pub fn hugs(&self) -> u32 {
        self.counter.count()
    }

    pub fn warmth_percent(&self) -> u32 {
        self.counter.percent()
    }
}

impl MiniGame for HugMeter {
    fn day(&self) -> DayId {
        DayId::Hug
    }

    fn handle(&mut self, input: &Input, _now_ms: u64) -> Vec<Effect> {
        match input {
            Input::SendHug => self.send(),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) {
        self.counter.reset();
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(1024);
        html.push_str(r#"<div class="game-container text-center">"#);
        html.push_str(&game_header(
            DayId::Hug,
            "Click the button to send warm virtual hugs!",
        ));
        html.push_str(r#"<div class="hug-display text-6xl">&#x1F917;</div>"#);
        html.push_str(&format!(
            r#"<div class="warmth-meter w-full bg-pink-100 rounded-full h-3 my-3"><div class="warmth-fill bg-pink-500 h-3 rounded-full" id="warmthFill" style="width: {}%"></div></div>"#,
            self.warmth_percent()
        ));
        html.push_str(&format!(
            r#"<div class="game-score">Hugs Sent: <span id="hugCounter">{}</span></div>"#,
            self.hugs()
        ));
        html.push_str(&format!(
            r#"<button class="hug-button bg-pink-500 text-white font-bold py-2 px-6 rounded-full mt-3" {}>Send Hug &#x1F495;</button>"#,
            post_attrs(DayId::Hug, r#"action: "hug""#)
        ));
        if self.counter.reached() {
            html.push_str(&game_message(
                "Warmth Meter Full!",
                "Your hugs warm my heart! I'm sending all my love wrapped in these hugs!",
            ));
        }
        html.push_str(r#"</div>"#);
        html
    }
}
