//! Rose Day: collect twelve single-use roses to build a bouquet.

use tracing::debug;

use crate::games::counter::ThresholdCounter;
use crate::games::{Effect, Input, MiniGame, game_header, game_message, post_attrs};
use crate::week::days::DayId;

pub const TOTAL_ROSES: usize = 12;

#[derive(Debug, Clone)]
pub struct RoseGarden {
    collected: [bool; TOTAL_ROSES],
    counter: ThresholdCounter,
}

impl Default for RoseGarden {
    fn default() -> Self {
        Self::new()
    }
}

impl RoseGarden {
    pub fn new() -> Self {
        Self {
            collected: [false; TOTAL_ROSES],
            counter: ThresholdCounter::new(TOTAL_ROSES as u32),
        }
    }

    /// Collect one rose. Already-collected or out-of-range roses are ignored.
    pub fn collect(&mut self, index: usize) -> Vec<Effect> {
        match self.collected.get_mut(index) {
            Some(slot) if !*slot => *slot = true,
            _ => return Vec::new(),
        }
        debug!(index, count = self.counter.count() + 1, "rose collected");
        if self.counter.increment() {
            return vec![Effect::complete_with(DayId::Rose, self.counter.count())];
        }
        Vec::new()
    }

    pub fn count(&self) -> u32 {
        self.counter.count()
    }

    pub fn is_collected(&self, index: usize) -> bool {
        self.collected.get(index).copied().unwrap_or(false)
    }
}

impl MiniGame for RoseGarden {
    fn day(&self) -> DayId {
        DayId::Rose
    }

    fn handle(&mut self, input: &Input, _now_ms: u64) -> Vec<Effect> {
        match input {
            Input::CollectRose(index) => self.collect(*index),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) {
        *self = Self::new();
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(2048);
        html.push_str(r#"<div class="game-container">"#);
        html.push_str(&game_header(
            DayId::Rose,
            "Click on the roses to collect them and create a beautiful bouquet!",
        ));
        html.push_str(&format!(
            r#"<div class="game-score text-center">Roses Collected: <span id="roseCount">{}</span> / {}</div>"#,
            self.count(),
            TOTAL_ROSES
        ));
        html.push_str(r#"<div class="rose-garden grid grid-cols-4 gap-2 my-3" id="roseGarden">"#);
        for (i, collected) in self.collected.iter().enumerate() {
            if *collected {
                html.push_str(r#"<div class="rose collected opacity-30 text-3xl text-center">&#x1F339;</div>"#);
            } else {
                html.push_str(&format!(
                    r#"<button class="rose text-3xl cursor-pointer" {}>&#x1F339;</button>"#,
                    post_attrs(DayId::Rose, &format!(r#"action: "collect", tile: {}"#, i))
                ));
            }
        }
        html.push_str(r#"</div>"#);
        if self.counter.reached() {
            html.push_str(&game_message(
                "Beautiful Bouquet Complete!",
                "Just like these roses, my love for you blooms brighter every day!",
            ));
        }
        html.push_str(r#"</div>"#);
        html
    }
}
