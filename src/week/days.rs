//! The eight themed days of the week, in unlock order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the eight fixed days. Declaration order is the canonical unlock order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayId {
    Rose,
    Propose,
    Chocolate,
    Teddy,
    Promise,
    Hug,
    Kiss,
    Valentine,
}

impl DayId {
    /// Every day in canonical order.
    pub const ALL: [DayId; 8] = [
        DayId::Rose,
        DayId::Propose,
        DayId::Chocolate,
        DayId::Teddy,
        DayId::Promise,
        DayId::Hug,
        DayId::Kiss,
        DayId::Valentine,
    ];

    /// Number of days in the week.
    pub const COUNT: usize = Self::ALL.len();

    /// URL/storage slug (e.g. "rose").
    pub fn slug(self) -> &'static str {
        match self {
            DayId::Rose => "rose",
            DayId::Propose => "propose",
            DayId::Chocolate => "chocolate",
            DayId::Teddy => "teddy",
            DayId::Promise => "promise",
            DayId::Hug => "hug",
            DayId::Kiss => "kiss",
            DayId::Valentine => "valentine",
        }
    }

    /// Parse a slug. Unknown slugs return `None`.
    pub fn from_slug(slug: &str) -> Option<DayId> {
        Self::ALL.iter().copied().find(|d| d.slug() == slug)
    }

    /// Card title shown on the week grid and modal header.
    pub fn title(self) -> &'static str {
        match self {
            DayId::Rose => "Rose Day",
            DayId::Propose => "Propose Day",
            DayId::Chocolate => "Chocolate Day",
            DayId::Teddy => "Teddy Day",
            DayId::Promise => "Promise Day",
            DayId::Hug => "Hug Day",
            DayId::Kiss => "Kiss Day",
            DayId::Valentine => "Valentine's Day",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            DayId::Rose => "\u{1F339}",      // 🌹
            DayId::Propose => "\u{1F48D}",   // 💍
            DayId::Chocolate => "\u{1F36B}", // 🍫
            DayId::Teddy => "\u{1F9F8}",     // 🧸
            DayId::Promise => "\u{1F91D}",   // 🤝
            DayId::Hug => "\u{1F917}",       // 🤗
            DayId::Kiss => "\u{1F48B}",      // 💋
            DayId::Valentine => "\u{1F496}", // 💖
        }
    }

    /// Zero-based position in the week.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
