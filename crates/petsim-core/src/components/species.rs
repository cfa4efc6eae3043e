//! Species definitions: base stats, growth rate and learnable skills.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Starting attributes for a freshly created pet of a species
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub health: f64,
    pub strength: f64,
    pub agility: f64,
    pub intelligence: f64,
    /// Multiplier applied to stat growth and some effect magnitudes
    pub growth_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Cat,
    Dog,
    Rabbit,
    Hamster,
}

impl Species {
    pub const ALL: [Species; 4] = [Species::Cat, Species::Dog, Species::Rabbit, Species::Hamster];

    pub fn base_stats(&self) -> BaseStats {
        match self {
            Species::Cat => BaseStats {
                health: 100.0,
                strength: 70.0,
                agility: 90.0,
                intelligence: 85.0,
                growth_rate: 1.2,
            },
            Species::Dog => BaseStats {
                health: 120.0,
                strength: 85.0,
                agility: 80.0,
                intelligence: 75.0,
                growth_rate: 1.1,
            },
            Species::Rabbit => BaseStats {
                health: 80.0,
                strength: 50.0,
                agility: 95.0,
                intelligence: 70.0,
                growth_rate: 1.0,
            },
            Species::Hamster => BaseStats {
                health: 60.0,
                strength: 40.0,
                agility: 85.0,
                intelligence: 65.0,
                growth_rate: 0.9,
            },
        }
    }

    pub fn growth_rate(&self) -> f64 {
        self.base_stats().growth_rate
    }

    /// Skills this species can learn, in unlock-pool order
    pub fn skill_pool(&self) -> &'static [Skill] {
        match self {
            Species::Cat => &[
                Skill::AgileLeap,
                Skill::NightVision,
                Skill::GracefulPose,
                Skill::HuntingInstinct,
                Skill::NineLives,
            ],
            Species::Dog => &[
                Skill::LoyalGuard,
                Skill::ItemFinder,
                Skill::Swimming,
                Skill::Rescue,
                Skill::Leadership,
            ],
            Species::Rabbit => &[
                Skill::QuickHop,
                Skill::Digging,
                Skill::Hiding,
                Skill::CarrotRadar,
                Skill::GroupHealing,
            ],
            Species::Hamster => &[
                Skill::FoodStorage,
                Skill::MazeMemory,
                Skill::BalanceWalk,
                Skill::FoodScout,
                Skill::Teamwork,
            ],
        }
    }

    pub fn can_learn(&self, skill: Skill) -> bool {
        self.skill_pool().contains(&skill)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Cat => "cat",
            Species::Dog => "dog",
            Species::Rabbit => "rabbit",
            Species::Hamster => "hamster",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Species::ALL
            .iter()
            .copied()
            .find(|species| species.as_str() == s)
            .ok_or_else(|| GameError::UnknownSpecies(s.to_string()))
    }
}

/// Every learnable skill across all species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    // Cat
    AgileLeap,
    NightVision,
    GracefulPose,
    HuntingInstinct,
    NineLives,
    // Dog
    LoyalGuard,
    ItemFinder,
    Swimming,
    Rescue,
    Leadership,
    // Rabbit
    QuickHop,
    Digging,
    Hiding,
    CarrotRadar,
    GroupHealing,
    // Hamster
    FoodStorage,
    MazeMemory,
    BalanceWalk,
    FoodScout,
    Teamwork,
}

impl Skill {
    pub const ALL: [Skill; 20] = [
        Skill::AgileLeap,
        Skill::NightVision,
        Skill::GracefulPose,
        Skill::HuntingInstinct,
        Skill::NineLives,
        Skill::LoyalGuard,
        Skill::ItemFinder,
        Skill::Swimming,
        Skill::Rescue,
        Skill::Leadership,
        Skill::QuickHop,
        Skill::Digging,
        Skill::Hiding,
        Skill::CarrotRadar,
        Skill::GroupHealing,
        Skill::FoodStorage,
        Skill::MazeMemory,
        Skill::BalanceWalk,
        Skill::FoodScout,
        Skill::Teamwork,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::AgileLeap => "agile_leap",
            Skill::NightVision => "night_vision",
            Skill::GracefulPose => "graceful_pose",
            Skill::HuntingInstinct => "hunting_instinct",
            Skill::NineLives => "nine_lives",
            Skill::LoyalGuard => "loyal_guard",
            Skill::ItemFinder => "item_finder",
            Skill::Swimming => "swimming",
            Skill::Rescue => "rescue",
            Skill::Leadership => "leadership",
            Skill::QuickHop => "quick_hop",
            Skill::Digging => "digging",
            Skill::Hiding => "hiding",
            Skill::CarrotRadar => "carrot_radar",
            Skill::GroupHealing => "group_healing",
            Skill::FoodStorage => "food_storage",
            Skill::MazeMemory => "maze_memory",
            Skill::BalanceWalk => "balance_walk",
            Skill::FoodScout => "food_scout",
            Skill::Teamwork => "teamwork",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Skill {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Skill::ALL
            .iter()
            .copied()
            .find(|skill| skill.as_str() == s)
            .ok_or_else(|| GameError::UnknownSkill(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_parse() {
        assert_eq!("cat".parse::<Species>(), Ok(Species::Cat));
        assert_eq!("hamster".parse::<Species>(), Ok(Species::Hamster));
        assert!(matches!(
            "dragon".parse::<Species>(),
            Err(GameError::UnknownSpecies(_))
        ));
    }

    #[test]
    fn test_skill_pools_are_disjoint_and_complete() {
        let mut seen = Vec::new();
        for species in Species::ALL {
            let pool = species.skill_pool();
            assert_eq!(pool.len(), 5);
            for skill in pool {
                assert!(!seen.contains(skill), "{} listed twice", skill);
                seen.push(*skill);
            }
        }
        assert_eq!(seen.len(), Skill::ALL.len());
    }

    #[test]
    fn test_skill_names_roundtrip_through_str() {
        for skill in Skill::ALL {
            assert_eq!(skill.as_str().parse::<Skill>(), Ok(skill));
        }
    }

    #[test]
    fn test_can_learn() {
        assert!(Species::Cat.can_learn(Skill::NineLives));
        assert!(!Species::Cat.can_learn(Skill::Teamwork));
    }
}
