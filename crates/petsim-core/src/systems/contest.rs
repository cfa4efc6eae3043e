//! Contest system - a rotating slate of contests, one per difficulty tier,
//! and the probabilistic resolution of an entry.
//!
//! Entry fees are not handled here; the session charges the fee before
//! calling [`ContestSystem::enter_contest`] and refunds it on `Err`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::components::{Food, Pet, Skill};
use crate::error::GameError;

/// Energy a pet needs to enter, and spends whatever the outcome
pub const CONTEST_ENERGY_COST: f64 = 30.0;

const BASE_MONEY: f64 = 100.0;
const BASE_EXP: f64 = 50.0;
const MIN_CHANCE: f64 = 0.1;
const MAX_BASE_CHANCE: f64 = 0.9;
const MAX_CHANCE: f64 = 0.95;
const MAX_SKILL_BONUS: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestType {
    Agility,
    Strength,
    Intelligence,
    Talent,
    Beauty,
}

impl ContestType {
    pub const ALL: [ContestType; 5] = [
        ContestType::Agility,
        ContestType::Strength,
        ContestType::Intelligence,
        ContestType::Talent,
        ContestType::Beauty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContestType::Agility => "agility",
            ContestType::Strength => "strength",
            ContestType::Intelligence => "intelligence",
            ContestType::Talent => "talent",
            ContestType::Beauty => "beauty",
        }
    }

    /// The pet attribute the contest judges
    pub fn attribute(&self, pet: &Pet) -> f64 {
        match self {
            ContestType::Agility => pet.agility,
            ContestType::Strength => pet.strength,
            ContestType::Intelligence => pet.intelligence,
            ContestType::Talent => (pet.intelligence + pet.agility) / 2.0,
            ContestType::Beauty => pet.happiness,
        }
    }

    pub fn relevant_skills(&self) -> &'static [Skill] {
        match self {
            ContestType::Agility => &[Skill::AgileLeap, Skill::QuickHop],
            ContestType::Strength => &[Skill::LoyalGuard, Skill::Rescue],
            ContestType::Intelligence => &[Skill::NightVision, Skill::MazeMemory],
            ContestType::Talent => &[Skill::GracefulPose, Skill::Teamwork],
            ContestType::Beauty => &[Skill::GracefulPose, Skill::NineLives],
        }
    }
}

impl fmt::Display for ContestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Master,
}

impl Difficulty {
    /// Slate order
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Normal,
        Difficulty::Hard,
        Difficulty::Master,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
            Difficulty::Master => "master",
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Normal => 1.5,
            Difficulty::Hard => 2.0,
            Difficulty::Master => 3.0,
        }
    }

    pub fn min_level(&self) -> u32 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Normal => 5,
            Difficulty::Hard => 15,
            Difficulty::Master => 30,
        }
    }

    pub fn entry_fee(&self) -> u64 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Normal => 100,
            Difficulty::Hard => 200,
            Difficulty::Master => 500,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContestReward {
    pub money: u64,
    pub exp: u32,
    pub items: BTreeMap<Food, u32>,
}

impl ContestReward {
    /// Roll the reward bundle for a tier
    pub fn roll(difficulty: Difficulty, rng: &mut impl Rng) -> Self {
        let m = difficulty.multiplier();
        let mut items = BTreeMap::new();

        if rng.gen_bool(0.3) {
            let max = ((3.0 * m).floor() as u32).max(1);
            items.insert(Food::PremiumFood, rng.gen_range(1..=max));
        }
        if rng.gen_bool(0.2) {
            let max = ((2.0 * m).floor() as u32).max(1);
            items.insert(Food::SpecialMeal, rng.gen_range(1..=max));
        }

        Self {
            money: (BASE_MONEY * m) as u64,
            exp: (BASE_EXP * m) as u32,
            items,
        }
    }
}

impl fmt::Display for ContestReward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} coins, {} exp", self.money, self.exp)?;
        for (food, count) in &self.items {
            write!(f, ", {} x {}", count, food)?;
        }
        Ok(())
    }
}

/// One slot on the slate
#[derive(Debug, Clone, PartialEq)]
pub struct Contest {
    pub contest_type: ContestType,
    pub difficulty: Difficulty,
    pub rewards: ContestReward,
    pub min_level: u32,
    pub entry_fee: u64,
}

impl fmt::Display for Contest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} contest ({}), level {}+, fee {}, prize: {}",
            self.contest_type, self.difficulty, self.min_level, self.entry_fee, self.rewards
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContestOutcome {
    Won(ContestReward),
    Lost,
}

/// Result of a resolved entry
#[derive(Debug, Clone, PartialEq)]
pub struct ContestEntry {
    pub pet: String,
    pub contest_type: ContestType,
    pub difficulty: Difficulty,
    pub chance: f64,
    pub outcome: ContestOutcome,
}

impl ContestEntry {
    pub fn won(&self) -> bool {
        matches!(self.outcome, ContestOutcome::Won(_))
    }
}

impl fmt::Display for ContestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            ContestOutcome::Won(reward) => write!(
                f,
                "{} won the {} {} contest! Prize: {}",
                self.pet, self.difficulty, self.contest_type, reward
            ),
            ContestOutcome::Lost => write!(
                f,
                "{} didn't win the {} {} contest this time",
                self.pet, self.difficulty, self.contest_type
            ),
        }
    }
}

/// Chance that `pet` wins a contest of this type and difficulty
pub fn win_chance(pet: &Pet, contest_type: ContestType, difficulty: Difficulty) -> f64 {
    let attribute = contest_type.attribute(pet);
    let base = (0.5 + attribute / 200.0 - 0.1 * difficulty.multiplier())
        .clamp(MIN_CHANCE, MAX_BASE_CHANCE);

    let skill_bonus: f64 = contest_type
        .relevant_skills()
        .iter()
        .filter(|skill| pet.has_skill(**skill))
        .map(|skill| 0.05 * f64::from(pet.proficiency(*skill)) / 1000.0)
        .sum();

    (base + skill_bonus.min(MAX_SKILL_BONUS)).min(MAX_CHANCE)
}

#[derive(Debug, Clone, Default)]
pub struct ContestSystem {
    pub available_contests: Vec<Contest>,
}

impl ContestSystem {
    pub fn new(rng: &mut impl Rng) -> Self {
        let mut system = Self::default();
        system.refresh_contests(rng);
        system
    }

    /// Replace the slate with one fresh contest per difficulty tier
    pub fn refresh_contests(&mut self, rng: &mut impl Rng) {
        self.available_contests = Difficulty::ALL
            .into_iter()
            .map(|difficulty| {
                let contest_type = ContestType::ALL[rng.gen_range(0..ContestType::ALL.len())];
                Contest {
                    contest_type,
                    difficulty,
                    rewards: ContestReward::roll(difficulty, rng),
                    min_level: difficulty.min_level(),
                    entry_fee: difficulty.entry_fee(),
                }
            })
            .collect();
        log::debug!("Contest slate refreshed: {} contests", self.available_contests.len());
    }

    pub fn contest(&self, slot: usize) -> Result<&Contest, GameError> {
        self.available_contests
            .get(slot)
            .ok_or(GameError::InvalidContestSlot(slot))
    }

    /// Resolve an entry. Errors leave the pet untouched; otherwise the pet
    /// pays the energy cost and a win is recorded on it.
    pub fn enter_contest(
        &self,
        pet: &mut Pet,
        slot: usize,
        rng: &mut impl Rng,
    ) -> Result<ContestEntry, GameError> {
        let contest = self.contest(slot)?;
        if pet.level < contest.min_level {
            return Err(GameError::LevelTooLow {
                required: contest.min_level,
            });
        }
        if pet.is_sleeping {
            return Err(GameError::Asleep(pet.name.clone()));
        }
        if pet.energy < CONTEST_ENERGY_COST {
            return Err(GameError::TooTired(pet.name.clone()));
        }

        let chance = win_chance(pet, contest.contest_type, contest.difficulty);
        pet.adjust_energy(-CONTEST_ENERGY_COST);

        let outcome = if rng.gen::<f64>() < chance {
            pet.won_contests = pet.won_contests.saturating_add(1);
            ContestOutcome::Won(contest.rewards.clone())
        } else {
            ContestOutcome::Lost
        };

        let entry = ContestEntry {
            pet: pet.name.clone(),
            contest_type: contest.contest_type,
            difficulty: contest.difficulty,
            chance,
            outcome,
        };
        log::info!("{} (chance {:.2})", entry, chance);
        Ok(entry)
    }
}
