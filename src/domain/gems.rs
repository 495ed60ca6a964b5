use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Index};

/// Gem colors, in the fixed order used by every 5-element array on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Brown,
    White,
    Red,
    Green,
    Blue,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::Brown,
        Color::White,
        Color::Red,
        Color::Green,
        Color::Blue,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Color> {
        Color::ALL.get(index).copied()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Color::Brown => "brown",
            Color::White => "white",
            Color::Red => "red",
            Color::Green => "green",
            Color::Blue => "blue",
        };
        f.write_str(name)
    }
}

/// A count of gems per color.
///
/// Components are unsigned, and every subtraction clamps at zero: taking
/// more than is present silently leaves zero instead of failing. Price,
/// bonus and asset arithmetic all rely on that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GemSet([u32; 5]);

impl GemSet {
    pub const EMPTY: GemSet = GemSet([0; 5]);

    pub const fn new(gems: [u32; 5]) -> Self {
        Self(gems)
    }

    pub const fn uniform(amount: u32) -> Self {
        Self([amount; 5])
    }

    pub fn single(color: Color, amount: u32) -> Self {
        let mut gems = Self::EMPTY;
        gems.increase(color, amount);
        gems
    }

    pub fn get(&self, color: Color) -> u32 {
        self.0[color.index()]
    }

    pub fn increase(&mut self, color: Color, amount: u32) {
        self.0[color.index()] += amount;
    }

    /// Remove up to `amount` gems of `color`, stopping at zero.
    pub fn decrease(&mut self, color: Color, amount: u32) {
        let slot = &mut self.0[color.index()];
        *slot = slot.saturating_sub(amount);
    }

    pub fn subtract_clamped(&self, other: &GemSet) -> GemSet {
        GemSet(std::array::from_fn(|i| self.0[i].saturating_sub(other.0[i])))
    }

    pub fn component_min(&self, other: &GemSet) -> GemSet {
        GemSet(std::array::from_fn(|i| self.0[i].min(other.0[i])))
    }

    pub fn dominates(&self, other: &GemSet) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b)
    }

    pub fn total(&self) -> u32 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> [u32; 5] {
        self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Color, u32)> + '_ {
        Color::ALL.iter().map(move |&c| (c, self.get(c)))
    }
}

impl Add for GemSet {
    type Output = GemSet;

    fn add(self, other: GemSet) -> GemSet {
        GemSet(std::array::from_fn(|i| self.0[i] + other.0[i]))
    }
}

impl Index<Color> for GemSet {
    type Output = u32;

    fn index(&self, color: Color) -> &u32 {
        &self.0[color.index()]
    }
}

impl fmt::Display for GemSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
        f.write_str(&parts.join(" "))
    }
}
