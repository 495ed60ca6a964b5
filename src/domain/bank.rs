use crate::shared::TWO_SAME_RESERVE;

use super::gems::{Color, GemSet};

/// The shared gem supply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    gems: GemSet,
}

impl Bank {
    pub fn new(player_count: usize) -> Self {
        let per_color = match player_count {
            2 => 4,
            3 => 5,
            _ => 7,
        };
        Self {
            gems: GemSet::uniform(per_color),
        }
    }

    pub fn with_gems(gems: GemSet) -> Self {
        Self { gems }
    }

    pub fn gems(&self) -> &GemSet {
        &self.gems
    }

    pub fn add_gem_set(&mut self, gems: &GemSet) {
        self.gems = self.gems + *gems;
    }

    /// Exactly three distinct colors, each with at least one gem left.
    pub fn can_take_three_different(&self, colors: &[Color]) -> bool {
        if colors.len() != 3 {
            return false;
        }
        let distinct = colors[0] != colors[1] && colors[0] != colors[2] && colors[1] != colors[2];
        distinct && colors.iter().all(|&c| self.gems.get(c) > 0)
    }

    /// Does not re-check availability.
    pub fn take_three_different(&mut self, colors: &[Color]) -> GemSet {
        let mut taken = GemSet::EMPTY;
        for &color in colors {
            self.gems.decrease(color, 1);
            taken.increase(color, 1);
        }
        taken
    }

    pub fn can_take_two_same(&self, color: Color) -> bool {
        self.gems.get(color) >= TWO_SAME_RESERVE
    }

    pub fn take_two_same(&mut self, color: Color) -> GemSet {
        self.gems.decrease(color, 2);
        GemSet::single(color, 2)
    }
}
