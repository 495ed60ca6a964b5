use serde::{Deserialize, Serialize};

use super::cards::Card;
use super::gems::GemSet;

/// Per-seat state. `bonus` and `points` only ever grow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub assets: GemSet,
    pub bonus: GemSet,
    pub points: u32,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assets: GemSet::EMPTY,
            bonus: GemSet::EMPTY,
            points: 0,
        }
    }

    pub fn add_gem_set(&mut self, gems: &GemSet) {
        self.assets = self.assets + *gems;
    }

    pub fn remove_gem_set(&mut self, gems: &GemSet) {
        self.assets = self.assets.subtract_clamped(gems);
    }

    pub fn token_count(&self) -> u32 {
        self.assets.total()
    }

    /// What buying `card` would cost in gems: the price left after bonus,
    /// capped by what the player holds.
    pub fn payment_for(&self, card: &Card) -> GemSet {
        card.price
            .subtract_clamped(&self.bonus)
            .component_min(&self.assets)
    }

    /// Returns the gems paid. Affordability is not checked here.
    pub fn add_card(&mut self, card: &Card) -> GemSet {
        let payment = self.payment_for(card);
        self.bonus.increase(card.color, 1);
        self.points += card.points;
        self.remove_gem_set(&payment);
        payment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Color;

    #[test]
    fn test_new_player_is_empty() {
        let p = Player::new("ada");
        assert_eq!(p.name, "ada");
        assert_eq!(p.token_count(), 0);
        assert_eq!(p.bonus, GemSet::EMPTY);
        assert_eq!(p.points, 0);
    }

    #[test]
    fn test_add_card_pays_price_minus_bonus() {
        let mut p = Player::new("ada");
        p.add_gem_set(&GemSet::new([2, 1, 3, 0, 0]));
        p.bonus = GemSet::new([1, 0, 1, 0, 0]);

        let card = Card::new("t2-01", Color::Green, 2, GemSet::new([2, 1, 3, 0, 0]));
        let paid = p.add_card(&card);

        assert_eq!(paid, GemSet::new([1, 1, 2, 0, 0]));
        assert_eq!(p.assets, GemSet::new([1, 0, 1, 0, 0]));
        assert_eq!(p.bonus, GemSet::new([1, 0, 1, 1, 0]));
        assert_eq!(p.points, 2);
    }

    #[test]
    fn test_bonus_above_price_costs_nothing() {
        let mut p = Player::new("ada");
        p.add_gem_set(&GemSet::new([3, 0, 0, 0, 0]));
        p.bonus = GemSet::new([4, 0, 0, 0, 0]);

        let card = Card::new("t1-02", Color::Brown, 0, GemSet::new([2, 0, 0, 0, 0]));
        let paid = p.add_card(&card);

        assert_eq!(paid, GemSet::EMPTY);
        assert_eq!(p.assets.get(Color::Brown), 3);
    }

    #[test]
    fn test_payment_never_exceeds_assets() {
        // Unaffordable purchase: the draw is capped by holdings, never negative.
        let mut p = Player::new("ada");
        p.add_gem_set(&GemSet::new([0, 1, 0, 0, 0]));

        let card = Card::new("t3-04", Color::Blue, 4, GemSet::new([0, 5, 0, 0, 0]));
        let paid = p.add_card(&card);

        assert_eq!(paid, GemSet::new([0, 1, 0, 0, 0]));
        assert_eq!(p.assets, GemSet::EMPTY);
    }

    #[test]
    fn test_remove_gem_set_clamps() {
        let mut p = Player::new("ada");
        p.add_gem_set(&GemSet::new([1, 1, 1, 1, 1]));
        p.remove_gem_set(&GemSet::new([2, 0, 0, 0, 1]));
        assert_eq!(p.assets, GemSet::new([0, 1, 1, 1, 0]));
        assert_eq!(p.token_count(), 3);
    }
}
