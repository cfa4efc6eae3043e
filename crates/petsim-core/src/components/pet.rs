//! The pet itself: identity, stats, skills and history.
//!
//! Strength, agility and intelligence only ever grow. Health grows on level-up
//! without bound, but any care effect caps it at 100. Hunger, happiness and
//! energy always stay within 0..=100.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use super::species::{Skill, Species};

/// Highest level a pet can reach
pub const MAX_LEVEL: u32 = 100;

/// Upper bound for hunger, happiness and energy (and for health restored by care)
pub const STAT_CAP: f64 = 100.0;

/// Levels at which a new skill is unlocked
pub const SKILL_UNLOCK_LEVELS: [u32; 5] = [5, 10, 15, 20, 30];

/// Derived emotional state, recomputed after actions and on every tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    #[default]
    Normal,
    Hungry,
    Tired,
    Lonely,
    Sad,
    Excited,
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mood::Normal => "normal",
            Mood::Hungry => "hungry",
            Mood::Tired => "tired",
            Mood::Lonely => "lonely",
            Mood::Sad => "sad",
            Mood::Excited => "excited",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub name: String,
    pub species: Species,
    pub level: u32,
    pub experience: u32,

    // Primary attributes
    pub health: f64,
    pub strength: f64,
    pub agility: f64,
    pub intelligence: f64,

    // State attributes (0..=100)
    pub hunger: f64,
    pub happiness: f64,
    pub energy: f64,

    pub mood: Mood,
    pub is_sleeping: bool,

    /// Learned skills in the order they were unlocked
    pub skills: Vec<Skill>,
    /// Proficiency per learned skill
    pub skill_exp: BTreeMap<Skill, u32>,

    pub birth_time: DateTime<Utc>,
    pub last_feed_time: DateTime<Utc>,
    pub last_interaction_time: DateTime<Utc>,
    pub total_training_time: u32,
    pub total_training_sessions: u32,
    pub won_contests: u32,
    pub friends: BTreeSet<String>,
}

impl Pet {
    /// Create a level-1 pet seeded with its species' base stats
    pub fn new(name: impl Into<String>, species: Species, now: DateTime<Utc>) -> Self {
        let base = species.base_stats();
        Self {
            name: name.into(),
            species,
            level: 1,
            experience: 0,
            health: base.health,
            strength: base.strength,
            agility: base.agility,
            intelligence: base.intelligence,
            hunger: 50.0,
            happiness: 50.0,
            energy: 100.0,
            mood: Mood::Normal,
            is_sleeping: false,
            skills: Vec::new(),
            skill_exp: BTreeMap::new(),
            birth_time: now,
            last_feed_time: now,
            last_interaction_time: now,
            total_training_time: 0,
            total_training_sessions: 0,
            won_contests: 0,
            friends: BTreeSet::new(),
        }
    }

    pub fn growth_rate(&self) -> f64 {
        self.species.growth_rate()
    }

    pub fn has_skill(&self, skill: Skill) -> bool {
        self.skills.contains(&skill)
    }

    pub fn proficiency(&self, skill: Skill) -> u32 {
        self.skill_exp.get(&skill).copied().unwrap_or(0)
    }

    /// Whole days since the pet was created
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.birth_time).num_days().max(0)
    }

    /// Next level that unlocks a skill, if any remain above the current one
    pub fn next_skill_level(&self) -> Option<u32> {
        SKILL_UNLOCK_LEVELS
            .iter()
            .copied()
            .find(|&level| self.level < level)
    }

    /// Read-only snapshot for display
    pub fn status(&self, now: DateTime<Utc>) -> PetStatus {
        PetStatus {
            name: self.name.clone(),
            species: self.species,
            level: self.level,
            experience: self.experience,
            exp_needed: crate::systems::exp_needed(self.level),
            health: self.health,
            strength: self.strength,
            agility: self.agility,
            intelligence: self.intelligence,
            hunger: self.hunger,
            happiness: self.happiness,
            energy: self.energy,
            mood: self.mood,
            is_sleeping: self.is_sleeping,
            skills: self
                .skills
                .iter()
                .map(|&skill| (skill, self.proficiency(skill)))
                .collect(),
            age_days: self.age_days(now),
            total_training_sessions: self.total_training_sessions,
            won_contests: self.won_contests,
            next_skill_level: self.next_skill_level(),
        }
    }

    pub fn achievements(&self) -> Achievements {
        Achievements {
            level: self.level,
            skills_learned: self.skills.len(),
            training_sessions: self.total_training_sessions,
            contests_won: self.won_contests,
            friends: self.friends.len(),
        }
    }

    // Clamped adjustments for the state attributes

    pub(crate) fn adjust_hunger(&mut self, delta: f64) {
        self.hunger = (self.hunger + delta).clamp(0.0, STAT_CAP);
    }

    pub(crate) fn adjust_happiness(&mut self, delta: f64) {
        self.happiness = (self.happiness + delta).clamp(0.0, STAT_CAP);
    }

    pub(crate) fn adjust_energy(&mut self, delta: f64) {
        self.energy = (self.energy + delta).clamp(0.0, STAT_CAP);
    }

    /// Any care effect leaves health within 0..=100, even for species whose
    /// base health starts above the cap.
    pub(crate) fn adjust_health(&mut self, delta: f64) {
        self.health = (self.health + delta).clamp(0.0, STAT_CAP);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PetStatus {
    pub name: String,
    pub species: Species,
    pub level: u32,
    pub experience: u32,
    pub exp_needed: u32,
    pub health: f64,
    pub strength: f64,
    pub agility: f64,
    pub intelligence: f64,
    pub hunger: f64,
    pub happiness: f64,
    pub energy: f64,
    pub mood: Mood,
    pub is_sleeping: bool,
    pub skills: Vec<(Skill, u32)>,
    pub age_days: i64,
    pub total_training_sessions: u32,
    pub won_contests: u32,
    pub next_skill_level: Option<u32>,
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} the {}", self.name, self.species)?;
        writeln!(f, "Level {} ({}/{})", self.level, self.experience, self.exp_needed)?;
        writeln!(
            f,
            "Health {:.0}  Strength {:.0}  Agility {:.0}  Intelligence {:.0}",
            self.health, self.strength, self.agility, self.intelligence
        )?;
        writeln!(
            f,
            "Hunger {:.0}/100  Happiness {:.0}/100  Energy {:.0}/100",
            self.hunger, self.happiness, self.energy
        )?;
        writeln!(
            f,
            "{}, feeling {}",
            if self.is_sleeping { "Sleeping" } else { "Awake" },
            self.mood
        )?;
        if self.skills.is_empty() {
            writeln!(f, "Skills: none")?;
        } else {
            for (skill, proficiency) in &self.skills {
                writeln!(f, "  {}: proficiency {}", skill, proficiency)?;
            }
        }
        if let Some(level) = self.next_skill_level {
            writeln!(f, "Next skill at level {}", level)?;
        }
        write!(
            f,
            "Trained {} times, won {} contests, {} days old",
            self.total_training_sessions, self.won_contests, self.age_days
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievements {
    pub level: u32,
    pub skills_learned: usize,
    pub training_sessions: u32,
    pub contests_won: u32,
    pub friends: usize,
}
