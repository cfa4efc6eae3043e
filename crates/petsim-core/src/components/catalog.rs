//! Static catalog tables: foods, games, shop items and free activities.
//!
//! Effects are stored as plain deltas; the systems apply them with the
//! clamping rules of the stat they touch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// What a food does when eaten
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodEffect {
    /// Hunger removed before the growth-rate multiplier
    pub hunger: f64,
    pub health: f64,
    pub experience: u32,
    pub happiness: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Food {
    RegularFood,
    PremiumFood,
    Treats,
    FreshMeat,
    Fish,
    Vegetables,
    Fruits,
    SpecialMeal,
}

impl Food {
    pub const ALL: [Food; 8] = [
        Food::RegularFood,
        Food::PremiumFood,
        Food::Treats,
        Food::FreshMeat,
        Food::Fish,
        Food::Vegetables,
        Food::Fruits,
        Food::SpecialMeal,
    ];

    pub fn effect(&self) -> FoodEffect {
        let (hunger, health, experience, happiness) = match self {
            Food::RegularFood => (30.0, 5.0, 10, 5.0),
            Food::PremiumFood => (50.0, 10.0, 20, 5.0),
            Food::Treats => (10.0, 0.0, 5, 15.0),
            Food::FreshMeat => (40.0, 15.0, 25, 5.0),
            Food::Fish => (35.0, 12.0, 22, 5.0),
            Food::Vegetables => (25.0, 8.0, 15, 5.0),
            Food::Fruits => (20.0, 10.0, 18, 5.0),
            Food::SpecialMeal => (60.0, 20.0, 30, 5.0),
        };
        FoodEffect {
            hunger,
            health,
            experience,
            happiness,
        }
    }

    /// Listed shop price per unit, before discounts
    pub fn price(&self) -> u64 {
        match self {
            Food::RegularFood => 50,
            Food::PremiumFood => 100,
            Food::Treats => 30,
            Food::FreshMeat => 80,
            Food::Fish => 70,
            Food::Vegetables => 40,
            Food::Fruits => 45,
            Food::SpecialMeal => 150,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Food::RegularFood => "regular_food",
            Food::PremiumFood => "premium_food",
            Food::Treats => "treats",
            Food::FreshMeat => "fresh_meat",
            Food::Fish => "fish",
            Food::Vegetables => "vegetables",
            Food::Fruits => "fruits",
            Food::SpecialMeal => "special_meal",
        }
    }
}

/// A play session's effect on the pet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameEffect {
    /// Always negative
    pub energy: f64,
    pub happiness: f64,
    pub experience: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Game {
    Fetch,
    Chase,
    HideSeek,
    Training,
}

impl Game {
    pub const ALL: [Game; 4] = [Game::Fetch, Game::Chase, Game::HideSeek, Game::Training];

    pub fn effect(&self) -> GameEffect {
        let (energy, happiness, experience) = match self {
            Game::Fetch => (-20.0, 30.0, 15),
            Game::Chase => (-30.0, 40.0, 20),
            Game::HideSeek => (-25.0, 35.0, 18),
            Game::Training => (-35.0, 25.0, 25),
        };
        GameEffect {
            energy,
            happiness,
            experience,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Game::Fetch => "fetch",
            Game::Chase => "chase",
            Game::HideSeek => "hide_seek",
            Game::Training => "training",
        }
    }
}

/// Effect of using a shop item on a pet. Zero fields are untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ItemEffect {
    pub happiness: f64,
    pub energy: f64,
    pub health: f64,
    pub experience: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Item {
    ToyBall,
    PetBed,
    TrainingBook,
    Medicine,
    GroomingKit,
    Vitamins,
}

impl Item {
    pub const ALL: [Item; 6] = [
        Item::ToyBall,
        Item::PetBed,
        Item::TrainingBook,
        Item::Medicine,
        Item::GroomingKit,
        Item::Vitamins,
    ];

    pub fn effect(&self) -> ItemEffect {
        match self {
            Item::ToyBall => ItemEffect {
                happiness: 20.0,
                energy: -10.0,
                ..Default::default()
            },
            Item::PetBed => ItemEffect {
                energy: 90.0,
                health: 10.0,
                ..Default::default()
            },
            Item::TrainingBook => ItemEffect {
                experience: 50,
                ..Default::default()
            },
            Item::Medicine => ItemEffect {
                health: 30.0,
                ..Default::default()
            },
            Item::GroomingKit => ItemEffect {
                happiness: 30.0,
                health: -10.0,
                ..Default::default()
            },
            Item::Vitamins => ItemEffect {
                health: 15.0,
                energy: 15.0,
                ..Default::default()
            },
        }
    }

    pub fn price(&self) -> u64 {
        match self {
            Item::ToyBall => 100,
            Item::PetBed => 200,
            Item::TrainingBook => 300,
            Item::Medicine => 150,
            Item::GroomingKit => 250,
            Item::Vitamins => 120,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Item::ToyBall => "toy_ball",
            Item::PetBed => "pet_bed",
            Item::TrainingBook => "training_book",
            Item::Medicine => "medicine",
            Item::GroomingKit => "grooming_kit",
            Item::Vitamins => "vitamins",
        }
    }
}

/// Coin-earning activity that needs no shop stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Walk,
    Clean,
    BasicTraining,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityEffect {
    pub energy_cost: f64,
    pub happiness: f64,
    pub experience: u32,
    pub coins: u64,
}

impl Activity {
    pub const ALL: [Activity; 3] = [Activity::Walk, Activity::Clean, Activity::BasicTraining];

    pub fn effect(&self) -> ActivityEffect {
        let (energy_cost, happiness, experience, coins) = match self {
            Activity::Walk => (10.0, 15.0, 10, 20),
            Activity::Clean => (5.0, 10.0, 5, 15),
            Activity::BasicTraining => (15.0, 5.0, 15, 25),
        };
        ActivityEffect {
            energy_cost,
            happiness,
            experience,
            coins,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Activity::Walk => "walk",
            Activity::Clean => "clean",
            Activity::BasicTraining => "basic_training",
        }
    }
}

macro_rules! catalog_names {
    ($ty:ty, $err:expr) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = GameError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|entry| entry.as_str() == s)
                    .ok_or_else(|| $err(s.to_string()))
            }
        }
    };
}

catalog_names!(Food, GameError::UnknownItem);
catalog_names!(Game, GameError::UnknownGame);
catalog_names!(Item, GameError::UnknownItem);
catalog_names!(Activity, GameError::UnknownActivity);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_table() {
        let regular = Food::RegularFood.effect();
        assert_eq!(regular.hunger, 30.0);
        assert_eq!(regular.experience, 10);
        assert_eq!(regular.happiness, 5.0);
        assert_eq!(Food::Treats.effect().happiness, 15.0);
        assert_eq!(Food::RegularFood.price(), 50);
    }

    #[test]
    fn test_games_always_cost_energy() {
        for game in Game::ALL {
            assert!(game.effect().energy < 0.0);
            assert!(game.effect().happiness > 0.0);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("hide_seek".parse::<Game>(), Ok(Game::HideSeek));
        assert_eq!("pet_bed".parse::<Item>(), Ok(Item::PetBed));
        assert_eq!("special_meal".parse::<Food>(), Ok(Food::SpecialMeal));
        assert_eq!("basic_training".parse::<Activity>(), Ok(Activity::BasicTraining));
        assert!(matches!("frisbee".parse::<Game>(), Err(GameError::UnknownGame(_))));
        assert!(matches!("caviar".parse::<Food>(), Err(GameError::UnknownItem(_))));
    }

    #[test]
    fn test_training_book_only_grants_experience() {
        let effect = Item::TrainingBook.effect();
        assert_eq!(effect.experience, 50);
        assert_eq!(effect.happiness, 0.0);
        assert_eq!(effect.energy, 0.0);
        assert_eq!(effect.health, 0.0);
    }
}
