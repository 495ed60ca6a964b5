use serde::{Deserialize, Serialize};

use super::gems::{Color, GemSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub color: Color,
    pub points: u32,
    pub price: GemSet,
}

impl Card {
    pub fn new(id: impl Into<String>, color: Color, points: u32, price: GemSet) -> Self {
        Self {
            id: id.into(),
            color,
            points,
            price,
        }
    }

    pub fn can_be_bought(&self, assets: &GemSet, bonus: &GemSet) -> bool {
        self.price.subtract_clamped(&(*assets + *bonus)).total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(price: [u32; 5]) -> Card {
        Card::new("t1-07", Color::Red, 1, GemSet::new(price))
    }

    #[test]
    fn test_assets_alone_cover_price() {
        let c = card([1, 1, 0, 0, 2]);
        assert!(c.can_be_bought(&GemSet::new([1, 1, 0, 0, 2]), &GemSet::EMPTY));
        assert!(!c.can_be_bought(&GemSet::new([1, 1, 0, 0, 1]), &GemSet::EMPTY));
    }

    #[test]
    fn test_bonus_makes_up_the_difference() {
        let c = card([0, 3, 0, 0, 0]);
        let assets = GemSet::new([0, 1, 0, 0, 0]);
        assert!(!c.can_be_bought(&assets, &GemSet::single(Color::White, 1)));
        assert!(c.can_be_bought(&assets, &GemSet::single(Color::White, 2)));
    }

    #[test]
    fn test_surplus_in_other_colors_does_not_help() {
        let c = card([0, 0, 2, 0, 0]);
        assert!(!c.can_be_bought(&GemSet::new([5, 5, 1, 5, 5]), &GemSet::EMPTY));
    }

    #[test]
    fn test_free_card() {
        let c = card([0; 5]);
        assert!(c.can_be_bought(&GemSet::EMPTY, &GemSet::EMPTY));
    }
}
