//! Valentine's Day: a static love letter. Opening it is enough.

use crate::games::{Effect, Input, MiniGame, MountContext};
use crate::week::days::DayId;

const LETTER: [&str; 4] = [
    "As this special week comes to an end, I want you to know that every moment we've shared has been magical. You bring color to my world and joy to my heart.",
    "From the roses of day one to this final moment, every experience we've created together has been a treasure. You're not just my Valentine, you're my every day.",
    "Thank you for your smile that lights up my darkest days, for your laugh that makes everything better, and for your love.",
    "Here's to us, to our journey, and to all the beautiful moments yet to come.",
];

#[derive(Debug, Clone, Default)]
pub struct LoveLetter {
    opened: bool,
}

impl LoveLetter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }
}

impl MiniGame for LoveLetter {
    fn day(&self) -> DayId {
        DayId::Valentine
    }

    fn mount(&mut self, _ctx: &MountContext) -> Vec<Effect> {
        self.opened = true;
        vec![Effect::complete(DayId::Valentine), Effect::HeartBurst]
    }

    fn handle(&mut self, _input: &Input, _now_ms: u64) -> Vec<Effect> {
        Vec::new()
    }

    fn teardown(&mut self) {
        self.opened = false;
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(1536);
        html.push_str(r#"<div class="love-letter text-center">"#);
        html.push_str(r#"<h2 class="love-letter-title text-2xl font-bold">Happy Valentine's Day! &#x1F496;</h2>"#);
        html.push_str(r#"<div class="letter-content text-left space-y-3 my-4"><p>My Dearest,</p>"#);
        for paragraph in LETTER {
            html.push_str("<p>");
            html.push_str(paragraph);
            html.push_str("</p>");
        }
        html.push_str(r#"<p class="letter-signature italic text-right">Forever Yours &#x1F495;</p></div>"#);
        html.push_str(r#"<button class="btn-primary bg-pink-500 text-white font-bold py-2 px-6 rounded-full" onclick="valentineFx.hearts()">Share Your Love</button>"#);
        html.push_str(r#"</div>"#);
        html
    }
}
