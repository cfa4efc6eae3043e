//! Save/Load functionality for pets and whole sessions
//!
//! Records are JSON with camelCase keys. Loading maps known fields only:
//! unknown keys are ignored, absent fields fall back to a fresh pet's values,
//! and content that can't describe a real pet is rejected as `Invalid`.
//! Nothing is applied to a session until the whole record has been checked.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::{
    Food, Item, Mood, Pet, Skill, Species, MAX_LEVEL, SKILL_UNLOCK_LEVELS, STAT_CAP,
};
use crate::engine::GameSession;
use crate::systems::{exp_needed, ContestType, DailyTask, DailyTaskTracker, Shop};

/// Version number for save file format (increment when format changes)
pub const SAVE_VERSION: u32 = 1;

/// Largest health, strength, agility or intelligence a record may carry
pub const MAX_ATTRIBUTE: f64 = 1.0e6;

/// Largest proficiency or lifetime counter a record may carry
pub const MAX_COUNT: u32 = 1_000_000;

fn current_version() -> u32 {
    SAVE_VERSION
}

/// Errors that can occur during save/load
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Save version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
    #[error("Invalid save data: {0}")]
    Invalid(String),
}

fn invalid(message: impl Into<String>) -> SaveError {
    SaveError::Invalid(message.into())
}

/// Persisted form of a single pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PetRecord {
    #[serde(default = "current_version")]
    pub version: u32,
    pub name: String,
    pub species: String,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub experience: Option<u32>,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub strength: Option<f64>,
    #[serde(default)]
    pub agility: Option<f64>,
    #[serde(default)]
    pub intelligence: Option<f64>,
    #[serde(default)]
    pub hunger: Option<f64>,
    #[serde(default)]
    pub happiness: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub mood: Option<Mood>,
    #[serde(default)]
    pub is_sleeping: bool,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub skill_exp: BTreeMap<String, u32>,
    #[serde(default)]
    pub birth_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_feed_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_interaction_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_training_time: u32,
    #[serde(default)]
    pub total_training_sessions: u32,
    #[serde(default)]
    pub won_contests: u32,
    #[serde(default)]
    pub friends: Vec<String>,
    /// Only written for sold pets; recomputed on load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sell_value: Option<u64>,
}

impl From<&Pet> for PetRecord {
    fn from(pet: &Pet) -> Self {
        Self {
            version: SAVE_VERSION,
            name: pet.name.clone(),
            species: pet.species.to_string(),
            level: Some(pet.level),
            experience: Some(pet.experience),
            health: Some(pet.health),
            strength: Some(pet.strength),
            agility: Some(pet.agility),
            intelligence: Some(pet.intelligence),
            hunger: Some(pet.hunger),
            happiness: Some(pet.happiness),
            energy: Some(pet.energy),
            mood: Some(pet.mood),
            is_sleeping: pet.is_sleeping,
            skills: pet.skills.iter().map(|s| s.to_string()).collect(),
            skill_exp: pet
                .skill_exp
                .iter()
                .map(|(skill, exp)| (skill.to_string(), *exp))
                .collect(),
            birth_time: Some(pet.birth_time),
            last_feed_time: Some(pet.last_feed_time),
            last_interaction_time: Some(pet.last_interaction_time),
            total_training_time: pet.total_training_time,
            total_training_sessions: pet.total_training_sessions,
            won_contests: pet.won_contests,
            friends: pet.friends.iter().cloned().collect(),
            sell_value: None,
        }
    }
}

impl PetRecord {
    pub fn sold(pet: &Pet) -> Self {
        Self {
            sell_value: Some(pet.calculate_value()),
            ..Self::from(pet)
        }
    }

    /// Rebuild a pet, filling absent fields as a new pet created at `now`
    pub fn into_pet(self, now: DateTime<Utc>) -> Result<Pet, SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        if self.name.trim().is_empty() {
            return Err(invalid("pet name is empty"));
        }
        let species: Species = self
            .species
            .parse()
            .map_err(|_| invalid(format!("{}: unknown species {}", self.name, self.species)))?;

        let mut pet = Pet::new(self.name, species, now);

        pet.level = self.level.unwrap_or(pet.level);
        if !(1..=MAX_LEVEL).contains(&pet.level) {
            return Err(invalid(format!("{}: level {} out of range", pet.name, pet.level)));
        }
        pet.experience = self.experience.unwrap_or(pet.experience);
        if pet.experience >= exp_needed(pet.level) {
            return Err(invalid(format!(
                "{}: experience {} exceeds level {} threshold",
                pet.name, pet.experience, pet.level
            )));
        }

        pet.health = self.health.unwrap_or(pet.health);
        pet.strength = self.strength.unwrap_or(pet.strength);
        pet.agility = self.agility.unwrap_or(pet.agility);
        pet.intelligence = self.intelligence.unwrap_or(pet.intelligence);
        pet.hunger = self.hunger.unwrap_or(pet.hunger);
        pet.happiness = self.happiness.unwrap_or(pet.happiness);
        pet.energy = self.energy.unwrap_or(pet.energy);
        for (label, value) in [
            ("hunger", pet.hunger),
            ("happiness", pet.happiness),
            ("energy", pet.energy),
        ] {
            if !(0.0..=STAT_CAP).contains(&value) {
                return Err(invalid(format!("{}: {} {} out of range", pet.name, label, value)));
            }
        }
        for value in [pet.health, pet.strength, pet.agility, pet.intelligence] {
            if !(0.0..=MAX_ATTRIBUTE).contains(&value) {
                return Err(invalid(format!("{}: bad attribute value {}", pet.name, value)));
            }
        }

        pet.mood = self.mood.unwrap_or_default();
        pet.is_sleeping = self.is_sleeping;

        let unlocked = SKILL_UNLOCK_LEVELS
            .iter()
            .filter(|&&level| level <= pet.level)
            .count();
        if self.skills.len() > unlocked {
            return Err(invalid(format!(
                "{}: {} skills at level {}",
                pet.name,
                self.skills.len(),
                pet.level
            )));
        }
        for name in &self.skills {
            let skill: Skill = name
                .parse()
                .map_err(|_| invalid(format!("{}: unknown skill {}", pet.name, name)))?;
            if !species.can_learn(skill) {
                return Err(invalid(format!("{}: a {} can't learn {}", pet.name, species, skill)));
            }
            if pet.has_skill(skill) {
                return Err(invalid(format!("{}: {} listed twice", pet.name, skill)));
            }
            pet.skills.push(skill);
            pet.skill_exp.insert(skill, 0);
        }
        for (name, exp) in self.skill_exp {
            let skill = name
                .parse::<Skill>()
                .ok()
                .filter(|skill| pet.has_skill(*skill))
                .ok_or_else(|| invalid(format!("{}: proficiency for unlearned skill {}", pet.name, name)))?;
            if exp > MAX_COUNT {
                return Err(invalid(format!("{}: {} proficiency {} out of range", pet.name, skill, exp)));
            }
            pet.skill_exp.insert(skill, exp);
        }
        for (label, count) in [
            ("training time", self.total_training_time),
            ("training sessions", self.total_training_sessions),
            ("contest wins", self.won_contests),
        ] {
            if count > MAX_COUNT {
                return Err(invalid(format!("{}: {} {} out of range", pet.name, label, count)));
            }
        }

        pet.birth_time = self.birth_time.unwrap_or(now);
        pet.last_feed_time = self.last_feed_time.unwrap_or(pet.birth_time);
        pet.last_interaction_time = self.last_interaction_time.unwrap_or(pet.birth_time);
        pet.total_training_time = self.total_training_time;
        pet.total_training_sessions = self.total_training_sessions;
        pet.won_contests = self.won_contests;
        pet.friends = self.friends.into_iter().collect();

        Ok(pet)
    }
}

/// Completion flags only. The task table and rewards always come from
/// [`DailyTask`]; unknown task names are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTasksRecord {
    #[serde(default)]
    pub completed: BTreeMap<String, bool>,
    #[serde(default)]
    pub last_refresh: Option<DateTime<Utc>>,
}

impl From<&DailyTaskTracker> for DailyTasksRecord {
    fn from(tracker: &DailyTaskTracker) -> Self {
        Self {
            completed: DailyTask::ALL
                .into_iter()
                .map(|task| (task.to_string(), tracker.is_completed(task)))
                .collect(),
            last_refresh: Some(tracker.last_refresh),
        }
    }
}

impl DailyTasksRecord {
    pub fn into_tracker(self, now: DateTime<Utc>) -> DailyTaskTracker {
        let mut tracker = DailyTaskTracker::new(self.last_refresh.unwrap_or(now));
        for (name, done) in self.completed {
            if let (Ok(task), true) = (name.parse::<DailyTask>(), done) {
                tracker.complete(task);
            }
        }
        tracker
    }
}

/// Persisted form of a whole session. The contest slate is not saved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    #[serde(default = "current_version")]
    pub version: u32,
    #[serde(default)]
    pub money: u64,
    #[serde(default)]
    pub food_inventory: BTreeMap<Food, u32>,
    #[serde(default)]
    pub items_inventory: BTreeMap<Item, u32>,
    #[serde(default)]
    pub pets: Vec<PetRecord>,
    #[serde(default)]
    pub sold_pets: Vec<PetRecord>,
    #[serde(default)]
    pub contest_record: BTreeMap<ContestType, Vec<String>>,
    #[serde(default)]
    pub current_discounts: BTreeMap<String, f64>,
    #[serde(default)]
    pub daily_tasks: Option<DailyTasksRecord>,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl From<&GameSession> for SessionRecord {
    fn from(session: &GameSession) -> Self {
        Self {
            version: SAVE_VERSION,
            money: session.money,
            food_inventory: session.shop.food_inventory.clone(),
            items_inventory: session.shop.items_inventory.clone(),
            pets: session.pets().iter().map(PetRecord::from).collect(),
            sold_pets: session.sold_pets().iter().map(PetRecord::sold).collect(),
            contest_record: session.contest_record.clone(),
            current_discounts: session.shop.current_discounts.clone(),
            daily_tasks: Some(DailyTasksRecord::from(&session.daily_tasks)),
            saved_at: Some(session.now()),
        }
    }
}

/// Fully validated session contents, ready to be swapped in
#[derive(Debug, Clone)]
pub struct LoadedSession {
    pub money: u64,
    pub shop: Shop,
    pub pets: Vec<Pet>,
    pub sold_pets: Vec<Pet>,
    pub contest_record: BTreeMap<ContestType, Vec<String>>,
    pub daily_tasks: DailyTaskTracker,
}

impl SessionRecord {
    pub fn into_loaded(self, now: DateTime<Utc>) -> Result<LoadedSession, SaveError> {
        if self.version != SAVE_VERSION {
            return Err(SaveError::VersionMismatch {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }

        let pets = self
            .pets
            .into_iter()
            .map(|record| record.into_pet(now))
            .collect::<Result<Vec<_>, _>>()?;
        let sold_pets = self
            .sold_pets
            .into_iter()
            .map(|record| record.into_pet(now))
            .collect::<Result<Vec<_>, _>>()?;

        let mut names = BTreeSet::new();
        for pet in pets.iter().chain(&sold_pets) {
            if !names.insert(pet.name.as_str()) {
                return Err(invalid(format!("pet name {} appears more than once", pet.name)));
            }
        }

        let mut shop = Shop::new(self.food_inventory, self.items_inventory);
        for (name, fraction) in self.current_discounts {
            shop.set_discount(&name, fraction)
                .map_err(|e| invalid(e.to_string()))?;
        }

        Ok(LoadedSession {
            money: self.money,
            shop,
            pets,
            sold_pets,
            contest_record: self.contest_record,
            daily_tasks: self
                .daily_tasks
                .map_or_else(|| DailyTaskTracker::new(now), |record| record.into_tracker(now)),
        })
    }
}

pub fn save_pet<W: Write>(writer: W, pet: &Pet) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, &PetRecord::from(pet))?;
    Ok(())
}

pub fn load_pet<R: Read>(reader: R, now: DateTime<Utc>) -> Result<Pet, SaveError> {
    let record: PetRecord = serde_json::from_reader(reader)?;
    record.into_pet(now)
}

/// Save the complete session to a writer
pub fn save_session<W: Write>(writer: W, session: &GameSession) -> Result<(), SaveError> {
    serde_json::to_writer_pretty(writer, &SessionRecord::from(session))?;
    Ok(())
}

/// Load a session from a reader
pub fn load_session<R: Read>(reader: R, now: DateTime<Utc>) -> Result<LoadedSession, SaveError> {
    let record: SessionRecord = serde_json::from_reader(reader)?;
    record.into_loaded(now)
}

/// `<dir>/<name>.json`, refusing names that would escape `dir`
pub fn pet_file_path(dir: &Path, name: &str) -> Result<PathBuf, SaveError> {
    if name.is_empty() || name.starts_with('.') || name.contains(['/', '\\']) {
        return Err(invalid(format!("{:?} can't be used as a file name", name)));
    }
    Ok(dir.join(format!("{}.json", name)))
}

pub fn save_pet_file(dir: &Path, pet: &Pet) -> Result<PathBuf, SaveError> {
    let path = pet_file_path(dir, &pet.name)?;
    fs::create_dir_all(dir)?;
    let mut writer = BufWriter::new(File::create(&path)?);
    save_pet(&mut writer, pet)?;
    writer.flush()?;
    Ok(path)
}

pub fn load_pet_file(dir: &Path, name: &str, now: DateTime<Utc>) -> Result<Pet, SaveError> {
    let path = pet_file_path(dir, name)?;
    let reader = BufReader::new(File::open(path)?);
    load_pet(reader, now)
}

/// Names of the pets saved in `dir`, sorted. A missing directory has none.
pub fn list_pet_files(dir: &Path) -> Result<Vec<String>, SaveError> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}
