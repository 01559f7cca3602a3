//! Mana costs and mana pools

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mana colors (plus colorless)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
    Colorless,
}

impl Color {
    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];

    /// Parse a single mana symbol ("W", "U", "B", "R", "G", "C")
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim().to_ascii_uppercase().as_str() {
            "W" => Some(Color::White),
            "U" => Some(Color::Blue),
            "B" => Some(Color::Black),
            "R" => Some(Color::Red),
            "G" => Some(Color::Green),
            "C" => Some(Color::Colorless),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Color::White => "W",
            Color::Blue => "U",
            Color::Black => "B",
            Color::Red => "R",
            Color::Green => "G",
            Color::Colorless => "C",
        };
        f.write_str(symbol)
    }
}

/// A mana cost (e.g., "2RR" = 2 generic + 2 red)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManaCost {
    pub generic: u8,
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a mana cost string like "2RR" or "1UB"
    ///
    /// Returns `None` for unknown symbols or for any count that does not
    /// fit in a `u8`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut cost = ManaCost::new();
        let mut generic_digits = String::new();

        for c in s.chars() {
            let slot = match c.to_ascii_uppercase() {
                'W' => &mut cost.white,
                'U' => &mut cost.blue,
                'B' => &mut cost.black,
                'R' => &mut cost.red,
                'G' => &mut cost.green,
                'C' => &mut cost.colorless,
                d @ '0'..='9' => {
                    generic_digits.push(d);
                    continue;
                }
                _ => return None,
            };
            *slot = slot.checked_add(1)?;
        }

        if !generic_digits.is_empty() {
            cost.generic = generic_digits.parse().ok()?;
        }
        cost.cmc_checked()?;
        Some(cost)
    }

    /// Lenient form of [`ManaCost::parse`] for builder code; malformed text
    /// gives an empty cost
    pub fn from_string(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// Component-wise sum, `None` on overflow
    pub fn checked_add(&self, other: &ManaCost) -> Option<ManaCost> {
        let sum = ManaCost {
            generic: self.generic.checked_add(other.generic)?,
            white: self.white.checked_add(other.white)?,
            blue: self.blue.checked_add(other.blue)?,
            black: self.black.checked_add(other.black)?,
            red: self.red.checked_add(other.red)?,
            green: self.green.checked_add(other.green)?,
            colorless: self.colorless.checked_add(other.colorless)?,
        };
        sum.cmc_checked()?;
        Some(sum)
    }

    /// Amount of a specific colored requirement
    pub fn of(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u32 {
        u32::from(self.generic) + Color::ALL.iter().map(|&c| u32::from(self.of(c))).sum::<u32>()
    }

    /// Converted mana cost, if it fits in a `u8`
    fn cmc_checked(&self) -> Option<u8> {
        u8::try_from(self.cmc()).ok()
    }

    pub fn is_zero(&self) -> bool {
        self.cmc() == 0
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generic > 0 || self.is_zero() {
            write!(f, "{}", self.generic)?;
        }
        for color in Color::ALL {
            for _ in 0..self.of(color) {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}

/// Mana pool for a player: one count per color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    pub white: u8,
    pub blue: u8,
    pub black: u8,
    pub red: u8,
    pub green: u8,
    pub colorless: u8,
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Colorless => &mut self.colorless,
        }
    }

    pub fn amount(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }

    pub fn add(&mut self, color: Color, amount: u8) {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(amount);
    }

    pub fn clear(&mut self) {
        *self = ManaPool::default();
    }

    /// Total mana in pool
    pub fn total(&self) -> u32 {
        Color::ALL.iter().map(|&c| u32::from(self.amount(c))).sum()
    }

    /// Check if the given mana cost can be paid from this pool
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        Color::ALL.iter().all(|&c| self.amount(c) >= cost.of(c)) && self.total() >= cost.cmc()
    }

    /// Pay a mana cost, returning the remaining pool
    ///
    /// Colored requirements are paid first, then generic from whatever is
    /// left in WUBRG-then-colorless order. Returns `None` (and leaves the
    /// pool alone) if the cost cannot be paid.
    pub fn pay(&self, cost: &ManaCost) -> Option<ManaPool> {
        if !self.can_pay(cost) {
            return None;
        }

        let mut remaining = *self;
        for color in Color::ALL {
            *remaining.slot_mut(color) -= cost.of(color);
        }

        let mut generic = cost.generic;
        for color in Color::ALL {
            let slot = remaining.slot_mut(color);
            let used = generic.min(*slot);
            *slot -= used;
            generic -= used;
        }
        debug_assert_eq!(generic, 0, "generic cost left unpaid");

        Some(remaining)
    }
}
