//! Teddy Day: dress up a teddy bear, then save it.
//!
//! No win condition besides the save button, which completes the day no
//! matter how many accessories were placed (zero included).

use rand::Rng;
use rand::rngs::StdRng;

use crate::games::{Effect, Input, MiniGame, game_header, game_message, post_attrs};
use crate::week::days::DayId;

/// Where an accessory goes on the 160×160 teddy canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Crown on the head.
    Top,
    /// Bow at the neck.
    Neck,
    /// Heart on the chest.
    Center,
    /// Rose in the right paw.
    Right,
    /// Sparkles, scattered anywhere in the middle of the bear.
    Scatter,
}

impl Slot {
    pub const ALL: [Slot; 5] = [Slot::Neck, Slot::Center, Slot::Top, Slot::Right, Slot::Scatter];

    /// Unknown names land on the chest.
    pub fn from_name(name: &str) -> Slot {
        match name {
            "top" => Slot::Top,
            "neck" => Slot::Neck,
            "right" => Slot::Right,
            "random" => Slot::Scatter,
            _ => Slot::Center,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Slot::Top => "top",
            Slot::Neck => "neck",
            Slot::Center => "center",
            Slot::Right => "right",
            Slot::Scatter => "random",
        }
    }

    pub fn accessory(self) -> &'static str {
        match self {
            Slot::Top => "\u{1F451}",     // 👑
            Slot::Neck => "\u{1F380}",    // 🎀
            Slot::Center => "\u{1F49D}",  // 💝
            Slot::Right => "\u{1F339}",   // 🌹
            Slot::Scatter => "\u{2728}",  // ✨
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Slot::Top => "Add Crown",
            Slot::Neck => "Add Bow",
            Slot::Center => "Add Heart",
            Slot::Right => "Add Rose",
            Slot::Scatter => "Add Sparkle",
        }
    }

    /// Fixed anchor as (left %, top %). `Scatter` has none.
    pub fn anchor(self) -> Option<(f64, f64)> {
        match self {
            Slot::Top => Some((50.0, -5.0)),
            Slot::Neck => Some((50.0, 40.0)),
            Slot::Center => Some((50.0, 60.0)),
            Slot::Right => Some((80.0, 60.0)),
            Slot::Scatter => None,
        }
    }
}

/// Scatter positions are uniform in this percentage band on both axes.
pub const SCATTER_MIN_PCT: f64 = 20.0;
pub const SCATTER_MAX_PCT: f64 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub slot: Slot,
    pub left_pct: f64,
    pub top_pct: f64,
}

#[derive(Debug)]
pub struct TeddyWorkshop {
    rng: StdRng,
    placements: Vec<Placement>,
    saved: bool,
}

impl TeddyWorkshop {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng,
            placements: Vec::new(),
            saved: false,
        }
    }

    pub fn place(&mut self, slot: Slot) -> Placement {
        let (left_pct, top_pct) = slot.anchor().unwrap_or_else(|| {
            (
                self.rng.gen_range(SCATTER_MIN_PCT..=SCATTER_MAX_PCT),
                self.rng.gen_range(SCATTER_MIN_PCT..=SCATTER_MAX_PCT),
            )
        });
        let placement = Placement {
            slot,
            left_pct,
            top_pct,
        };
        self.placements.push(placement);
        placement
    }

    /// Always completes the day.
    pub fn save(&mut self) -> Vec<Effect> {
        self.saved = true;
        vec![Effect::complete(DayId::Teddy)]
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn is_saved(&self) -> bool {
        self.saved
    }
}

impl MiniGame for TeddyWorkshop {
    fn day(&self) -> DayId {
        DayId::Teddy
    }

    fn handle(&mut self, input: &Input, _now_ms: u64) -> Vec<Effect> {
        match input {
            Input::PlaceAccessory(name) => {
                self.place(Slot::from_name(name));
                Vec::new()
            }
            Input::SaveTeddy => self.save(),
            _ => Vec::new(),
        }
    }

    fn teardown(&mut self) {
        self.placements.clear();
        self.saved = false;
    }

    fn render(&self) -> String {
        let mut html = String::with_capacity(2048);
        html.push_str(r#"<div class="game-container text-center">"#);
        html.push_str(&game_header(DayId::Teddy, "Customize this teddy bear with love!"));
        html.push_str(r#"<div class="teddy-wrapper relative mx-auto w-40 h-40" id="teddyWrapper">"#);
        html.push_str(r#"<div class="teddy-display text-9xl">&#x1F9F8;</div>"#);
        html.push_str(r#"<div class="teddy-accessories-overlay absolute inset-0">"#);
        for p in &self.placements {
            html.push_str(&format!(
                r#"<div class="teddy-accessory absolute text-3xl" style="left: {:.1}%; top: {:.1}%; transform: translate(-50%, -50%)">{}</div>"#,
                p.left_pct,
                p.top_pct,
                p.slot.accessory()
            ));
        }
        html.push_str(r#"</div></div>"#);

        html.push_str(r#"<div class="teddy-accessories flex flex-wrap justify-center gap-2 mt-3">"#);
        for slot in Slot::ALL {
            html.push_str(&format!(
                r#"<button class="accessory-btn bg-amber-100 rounded px-3 py-1" {}>{}</button>"#,
                post_attrs(
                    DayId::Teddy,
                    &format!(r#"action: "place", slot: "{}""#, slot.name())
                ),
                slot.label()
            ));
        }
        html.push_str(r#"</div>"#);
        html.push_str(&format!(
            r#"<button class="btn-primary bg-pink-500 text-white font-bold py-2 px-6 rounded-full mt-6" id="saveTeddy" {}>Save My Teddy</button>"#,
            post_attrs(DayId::Teddy, r#"action: "save""#)
        ));
        if self.saved {
            html.push_str(&game_message(
                "Adorable Teddy Created!",
                "This teddy represents all the comfort and warmth you bring to my life!",
            ));
        }
        html.push_str(r#"</div>"#);
        html
    }
}
