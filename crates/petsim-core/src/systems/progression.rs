//! Progression: experience, leveling, skill unlocks and skill training.
//!
//! Leveling is applied eagerly: after any experience grant the pet levels up
//! repeatedly until `experience < exp_needed(level)`. Each level-up resets
//! experience to zero, so the remainder of a multi-level grant is dropped.

use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;

use crate::components::{Pet, Skill, MAX_LEVEL, SKILL_UNLOCK_LEVELS};
use crate::error::GameError;

/// Minimum energy needed to train a skill, and the energy it costs
pub const TRAINING_ENERGY_COST: f64 = 20.0;

/// Experience needed to leave `level`
pub fn exp_needed(level: u32) -> u32 {
    100 + level.saturating_sub(1) * 50
}

/// What happened on a single level-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelUp {
    Leveled { level: u32 },
    LearnedSkill { level: u32, skill: Skill },
    /// Reached a skill level with the species pool already exhausted
    NoNewSkill { level: u32 },
}

impl LevelUp {
    pub fn level(&self) -> u32 {
        match self {
            LevelUp::Leveled { level }
            | LevelUp::LearnedSkill { level, .. }
            | LevelUp::NoNewSkill { level } => *level,
        }
    }
}

impl fmt::Display for LevelUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelUp::Leveled { level } => write!(f, "reached level {}!", level),
            LevelUp::LearnedSkill { level, skill } => {
                write!(f, "reached level {} and learned {}!", level, skill)
            }
            LevelUp::NoNewSkill { level } => {
                write!(f, "reached level {}, but there are no new skills to learn", level)
            }
        }
    }
}

/// Result of a skill training session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Training {
    pub skill: Skill,
    pub gain: u32,
    pub proficiency: u32,
}

impl fmt::Display for Training {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} proficiency +{} (now {})",
            self.skill, self.gain, self.proficiency
        )
    }
}

impl Pet {
    /// Add experience and apply every level-up it pays for
    pub fn gain_experience(&mut self, amount: u32, rng: &mut impl Rng) -> Vec<LevelUp> {
        self.experience = self.experience.saturating_add(amount);
        let mut level_ups = Vec::new();

        while self.experience >= exp_needed(self.level) {
            match self.level_up(rng) {
                Ok(level_up) => level_ups.push(level_up),
                Err(_) => {
                    self.experience = exp_needed(MAX_LEVEL) - 1;
                    break;
                }
            }
        }

        level_ups
    }

    /// Advance one level, growing primary stats and unlocking a skill at
    /// the unlock thresholds. Fails without changes at the level cap.
    pub fn level_up(&mut self, rng: &mut impl Rng) -> Result<LevelUp, GameError> {
        if self.level >= MAX_LEVEL {
            return Err(GameError::MaxLevel(self.name.clone()));
        }

        self.level += 1;
        self.experience = 0;

        let growth = self.growth_rate();
        self.health += 5.0 * growth;
        self.strength += 3.0 * growth;
        self.agility += 3.0 * growth;
        self.intelligence += 3.0 * growth;

        let level = self.level;
        let outcome = if SKILL_UNLOCK_LEVELS.contains(&level) {
            match self.unlock_skill(rng) {
                Some(skill) => LevelUp::LearnedSkill { level, skill },
                None => LevelUp::NoNewSkill { level },
            }
        } else {
            LevelUp::Leveled { level }
        };

        log::info!("{} {}", self.name, outcome);
        Ok(outcome)
    }

    /// Learn a random skill from the species pool that isn't known yet
    pub fn unlock_skill(&mut self, rng: &mut impl Rng) -> Option<Skill> {
        let available: Vec<Skill> = self
            .species
            .skill_pool()
            .iter()
            .copied()
            .filter(|skill| !self.has_skill(*skill))
            .collect();

        let skill = *available.choose(rng)?;
        self.skills.push(skill);
        self.skill_exp.insert(skill, 0);
        Some(skill)
    }

    /// Spend energy to raise proficiency in a learned skill
    pub fn train_skill(&mut self, skill: Skill, rng: &mut impl Rng) -> Result<Training, GameError> {
        if !self.has_skill(skill) {
            return Err(GameError::SkillNotLearned {
                pet: self.name.clone(),
                skill: skill.to_string(),
            });
        }
        if self.is_sleeping {
            return Err(GameError::Asleep(self.name.clone()));
        }
        if self.energy < TRAINING_ENERGY_COST {
            return Err(GameError::TooTired(self.name.clone()));
        }

        self.adjust_energy(-TRAINING_ENERGY_COST);
        let gain = rng.gen_range(10..=20);
        let proficiency = self.skill_exp.entry(skill).or_insert(0);
        *proficiency = (*proficiency).saturating_add(gain);
        let proficiency = *proficiency;
        self.total_training_time = self.total_training_time.saturating_add(1);
        self.total_training_sessions = self.total_training_sessions.saturating_add(1);

        Ok(Training {
            skill,
            gain,
            proficiency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Species;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn cat() -> Pet {
        Pet::new("Mimi", Species::Cat, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_exp_needed() {
        assert_eq!(exp_needed(1), 100);
        assert_eq!(exp_needed(2), 150);
        assert_eq!(exp_needed(3), 200);
        assert_eq!(exp_needed(100), 5050);
    }

    #[test]
    fn test_single_level_up_grows_stats() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pet = cat();
        let ups = pet.gain_experience(100, &mut rng);

        assert_eq!(ups, vec![LevelUp::Leveled { level: 2 }]);
        assert_eq!(pet.level, 2);
        assert_eq!(pet.experience, 0);
        assert!((pet.health - 106.0).abs() < 1e-9);
        assert!((pet.strength - 73.6).abs() < 1e-9);
        assert!((pet.agility - 93.6).abs() < 1e-9);
        assert!((pet.intelligence - 88.6).abs() < 1e-9);
    }

    #[test]
    fn test_multi_level_gain_drops_remainder() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut pet = cat();
        // 100 pays for level 2; the remaining 400 resets to 0 on that level-up
        // and then pays nothing more.
        let ups = pet.gain_experience(500, &mut rng);
        assert_eq!(ups.len(), 1);
        assert_eq!(pet.level, 2);
        assert_eq!(pet.experience, 0);
    }

    #[test]
    fn test_experience_stays_below_threshold() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut pet = cat();
        for amount in [5, 95, 40, 149, 1, 300, 0, 75] {
            pet.gain_experience(amount, &mut rng);
            assert!(pet.experience < exp_needed(pet.level));
        }
    }

    #[test]
    fn test_skill_unlocks_at_thresholds_only() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pet = cat();
        for _ in 1..30 {
            let up = pet.level_up(&mut rng).unwrap();
            let unlocked = matches!(up, LevelUp::LearnedSkill { .. });
            assert_eq!(unlocked, SKILL_UNLOCK_LEVELS.contains(&pet.level));
            assert_eq!(pet.skills.len(), pet.skill_exp.len());
        }
        assert_eq!(pet.level, 30);
        assert_eq!(pet.skills.len(), 5);

        let mut sorted = pet.skills.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 5, "skills must never repeat");
        assert!(pet.skills.iter().all(|s| Species::Cat.can_learn(*s)));
    }

    #[test]
    fn test_exhausted_pool_grants_nothing() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pet = cat();
        for skill in Species::Cat.skill_pool() {
            pet.skills.push(*skill);
            pet.skill_exp.insert(*skill, 0);
        }
        pet.level = 4;
        assert_eq!(pet.level_up(&mut rng), Ok(LevelUp::NoNewSkill { level: 5 }));
        assert_eq!(pet.skills.len(), 5);
        assert_eq!(pet.unlock_skill(&mut rng), None);
    }

    #[test]
    fn test_max_level_is_a_no_op() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut pet = cat();
        pet.level = MAX_LEVEL;
        let before = pet.clone();

        assert!(matches!(pet.level_up(&mut rng), Err(GameError::MaxLevel(_))));
        assert_eq!(pet, before);

        let ups = pet.gain_experience(1_000_000, &mut rng);
        assert!(ups.is_empty());
        assert_eq!(pet.level, MAX_LEVEL);
        assert!(pet.experience < exp_needed(MAX_LEVEL));
    }

    #[test]
    fn test_level_never_exceeds_cap() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut pet = cat();
        for _ in 0..300 {
            let needed = exp_needed(pet.level);
            pet.gain_experience(needed, &mut rng);
        }
        assert_eq!(pet.level, MAX_LEVEL);
    }

    #[test]
    fn test_train_skill() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pet = cat();
        pet.skills.push(Skill::NineLives);
        pet.skill_exp.insert(Skill::NineLives, 0);

        let training = pet.train_skill(Skill::NineLives, &mut rng).unwrap();
        assert!((10..=20).contains(&training.gain));
        assert_eq!(pet.proficiency(Skill::NineLives), training.gain);
        assert_eq!(pet.energy, 80.0);
        assert_eq!(pet.total_training_sessions, 1);
        assert_eq!(pet.total_training_time, 1);
    }

    #[test]
    fn test_train_skill_saturates() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pet = cat();
        pet.skills.push(Skill::NineLives);
        pet.skill_exp.insert(Skill::NineLives, u32::MAX - 5);
        pet.total_training_sessions = u32::MAX;

        let training = pet.train_skill(Skill::NineLives, &mut rng).unwrap();
        assert_eq!(training.proficiency, u32::MAX);
        assert_eq!(pet.total_training_sessions, u32::MAX);
    }

    #[test]
    fn test_train_skill_preconditions() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut pet = cat();
        assert!(matches!(
            pet.train_skill(Skill::NineLives, &mut rng),
            Err(GameError::SkillNotLearned { .. })
        ));

        pet.skills.push(Skill::NineLives);
        pet.skill_exp.insert(Skill::NineLives, 0);
        pet.energy = 19.0;
        let before = pet.clone();
        assert!(matches!(
            pet.train_skill(Skill::NineLives, &mut rng),
            Err(GameError::TooTired(_))
        ));
        assert_eq!(pet, before);
    }
}
