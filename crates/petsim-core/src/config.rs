//! Session configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::components::{Food, Item};

/// Starting conditions for a new game session. Every field falls back to
/// its default when missing from a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_money: u64,
    pub starting_food: BTreeMap<Food, u32>,
    pub starting_items: BTreeMap<Item, u32>,
    /// Discounts active from the start, keyed by food or item name
    pub discounts: BTreeMap<String, f64>,
    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: 1000,
            starting_food: BTreeMap::from([
                (Food::RegularFood, 5),
                (Food::PremiumFood, 2),
                (Food::Treats, 3),
            ]),
            starting_items: BTreeMap::from([
                (Item::ToyBall, 2),
                (Item::PetBed, 1),
                (Item::TrainingBook, 1),
                (Item::Medicine, 3),
                (Item::GroomingKit, 1),
                (Item::Vitamins, 2),
            ]),
            discounts: BTreeMap::new(),
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.starting_money, 1000);
        assert_eq!(config.starting_food.get(&Food::RegularFood), Some(&5));
        assert_eq!(config.starting_items.get(&Item::Medicine), Some(&3));
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = GameConfig::from_json_str(r#"{"starting_money": 250, "seed": 7}"#).unwrap();
        assert_eq!(config.starting_money, 250);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.starting_items, GameConfig::default().starting_items);
    }

    #[test]
    fn test_json_food_keys() {
        let config = GameConfig::from_json_str(
            r#"{"starting_food": {"fish": 4}, "discounts": {"fish": 0.25}}"#,
        )
        .unwrap();
        assert_eq!(config.starting_food.len(), 1);
        assert_eq!(config.starting_food.get(&Food::Fish), Some(&4));
        assert_eq!(config.discounts.get("fish"), Some(&0.25));
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(GameConfig::from_json_str("{\"starting_money\": -5}").is_err());
    }
}
