//! Promise Day: hang promises on the tree. Three promises complete the day.

use crate::games::{BODY_TARGET, Effect, Input, MiniGame, MountContext, game_header, game_message};
use crate::routes::util::escape_html;
use crate::week::days::DayId;
use crate::week::progress::{MAX_PROMISE_CHARS, normalize_promise};

pub const PROMISE_THRESHOLD: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct PromiseTree {
    /// Shown on the tree: stored promises plus those added this session.
    promises: Vec<String>,
    /// Completion already reported for this mount.
    fired: bool,
}

impl PromiseTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blank input is ignored. Otherwise the normalized text is shown,
    /// handed back for persistence, and the day completes the first time
    /// the tree holds three or more.
    pub fn add(&mut self, text: &str) -> Vec<Effect> {
        let Some(text) = normalize_promise(text) else {
            return Vec::new();
        };
        self.promises.push(text.clone());
        let mut effects = vec![Effect::PromiseAdded(text)];
        if self.promises.len() >= PROMISE_THRESHOLD && !self.fired {
            self.fired = true;
            effects.push(Effect::complete(DayId::Promise));
        }
        effects
    }

    pub fn promises(&self) -> &[String] {
        &self.promises
    }
}

impl MiniGame for PromiseTree {
    fn day(&self) -> DayId {
        DayId::Promise
    }

    fn mount(&mut self, ctx: &MountContext) -> Vec<Effect> {
        self.promises = ctx.promises.clone();
        self.fired = false;
        Vec::new()
    }

    fn handle(&mut self, input: &Input, _now_ms: u64) -> Vec<Effect> {
        match input {
            Input::AddPromise(text) => self.add(text),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) {
        self.promises.clear();
        self.fired = false;
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(2048);
        html.push_str(r#"<div class="game-container text-center">"#);
        html.push_str(&game_header(
            DayId::Promise,
            "Write your promises and watch them bloom on our tree!",
        ));
        html.push_str(r#"<div class="promise-tree text-7xl">&#x1F333;</div>"#);
        html.push_str(r#"<ul class="promise-list space-y-1 my-3" id="promiseList">"#);
        for p in &self.promises {
            html.push_str(&format!(
                r#"<li class="promise-item bg-pink-50 rounded px-3 py-1">&#x1F49D; {}</li>"#,
                escape_html(p)
            ));
        }
        html.push_str(r#"</ul>"#);
        html.push_str(&format!(
            r#"<form class="promise-input flex gap-2 justify-center" hx-post="/api/play/{}" hx-target="{}" hx-swap="innerHTML" hx-vals='js:{{action: "promise", now: Date.now()}}'>"#,
            DayId::Promise.slug(),
            BODY_TARGET
        ));
        html.push_str(&format!(
            r#"<input type="text" name="text" id="promiseInput" maxlength="{}" placeholder="I promise to..." class="border rounded px-2 py-1" autocomplete="off">"#,
            MAX_PROMISE_CHARS
        ));
        html.push_str(r#"<button type="submit" class="bg-pink-500 text-white font-bold py-1 px-4 rounded-full">Add Promise</button>"#);
        html.push_str(r#"</form>"#);
        html.push_str(&format!(
            r#"<div class="game-score mt-2">Promises: {}</div>"#,
            self.promises.len()
        ));
        if self.promises.len() >= PROMISE_THRESHOLD {
            html.push_str(&game_message(
                "Beautiful Promises!",
                "Our tree of promises is growing strong, just like our love!",
            ));
        }
        html.push_str(r#"</div>"#);
        html
    }
}
