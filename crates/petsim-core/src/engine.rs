//! Game session - main entry point for a running game
//!
//! The session owns the roster, the wallet, the shop, the daily tasks and
//! the contest slate, and runs every transaction that touches more than one
//! of them. Time only moves when the host calls [`GameSession::tick`].

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};

use crate::components::*;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::persistence::{self, SaveError};
use crate::systems::*;

/// Result of a free activity or an interaction
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityReport {
    pub care: CareReport,
    pub coins: u64,
    /// Daily task bonus, paid on the first completion of the day
    pub task_bonus: Option<(DailyTask, u64)>,
}

impl fmt::Display for ActivityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.care)?;
        if self.coins > 0 {
            write!(f, "\nEarned {} coins", self.coins)?;
        }
        if let Some((task, bonus)) = self.task_bonus {
            write!(f, "\nDaily task '{}' complete! +{} coins", task, bonus)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Sold,
    BoughtBack,
}

/// A pet changing hands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub kind: TradeKind,
    pub name: String,
    pub value: u64,
    pub money_left: u64,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TradeKind::Sold => write!(f, "Sold {} for {} coins", self.name, self.value),
            TradeKind::BoughtBack => write!(f, "Bought {} back for {} coins", self.name, self.value),
        }
    }
}

/// A resolved contest entry with its bookkeeping
#[derive(Debug, Clone, PartialEq)]
pub struct ContestReport {
    pub entry: ContestEntry,
    pub entry_fee: u64,
    pub level_ups: Vec<LevelUp>,
    pub money_left: u64,
}

impl fmt::Display for ContestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.entry)?;
        for level_up in &self.level_ups {
            write!(f, "\n{} {}", self.entry.pet, level_up)?;
        }
        Ok(())
    }
}

fn task_for(activity: Activity) -> DailyTask {
    match activity {
        Activity::Walk => DailyTask::Walk,
        Activity::Clean => DailyTask::Clean,
        Activity::BasicTraining => DailyTask::Training,
    }
}

/// Mutable references to two distinct pets
fn pair_mut(pets: &mut [Pet], a: usize, b: usize) -> (&mut Pet, &mut Pet) {
    if a < b {
        let (left, right) = pets.split_at_mut(b);
        (&mut left[a], &mut right[0])
    } else {
        let (left, right) = pets.split_at_mut(a);
        (&mut right[0], &mut left[b])
    }
}

/// A single player's game
pub struct GameSession {
    /// Active roster in adoption order
    pets: Vec<Pet>,
    sold_pets: Vec<Pet>,
    pub money: u64,
    pub shop: Shop,
    pub daily_tasks: DailyTaskTracker,
    pub contests: ContestSystem,
    /// Result lines per contest type, oldest first
    pub contest_record: BTreeMap<ContestType, Vec<String>>,
    now: DateTime<Utc>,
    rng: StdRng,
}

impl GameSession {
    /// Default starting conditions, clock at the current wall time
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Default starting conditions with a pinned clock
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self::build(&GameConfig::default(), now)
    }

    pub fn from_config(config: &GameConfig, now: DateTime<Utc>) -> Result<Self, GameError> {
        let mut session = Self::build(config, now);
        for (name, fraction) in &config.discounts {
            session.shop.set_discount(name, *fraction)?;
        }
        Ok(session)
    }

    fn build(config: &GameConfig, now: DateTime<Utc>) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let contests = ContestSystem::new(&mut rng);

        Self {
            pets: Vec::new(),
            sold_pets: Vec::new(),
            money: config.starting_money,
            shop: Shop::new(config.starting_food.clone(), config.starting_items.clone()),
            daily_tasks: DailyTaskTracker::new(now),
            contests,
            contest_record: BTreeMap::new(),
            now,
            rng,
        }
    }

    /// Advance the session clock, reset daily tasks on a new day and
    /// recompute every mood. The clock never moves backwards.
    /// Returns true when the daily tasks were reset.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        if now > self.now {
            self.now = now;
        }
        let now = self.now;
        let reset = self.daily_tasks.refresh(now);
        for pet in &mut self.pets {
            pet.update_mood(now);
        }
        log::debug!("Tick at {}, {} pets", now, self.pets.len());
        reset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn sold_pets(&self) -> &[Pet] {
        &self.sold_pets
    }

    pub fn find_pet(&self, name: &str) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.name == name)
    }

    pub fn pet(&self, name: &str) -> Result<&Pet, GameError> {
        self.find_pet(name)
            .ok_or_else(|| GameError::PetNotFound(name.to_string()))
    }

    fn pet_index(&self, name: &str) -> Result<usize, GameError> {
        self.pets
            .iter()
            .position(|pet| pet.name == name)
            .ok_or_else(|| GameError::PetNotFound(name.to_string()))
    }

    fn name_taken(&self, name: &str) -> bool {
        self.pets
            .iter()
            .chain(&self.sold_pets)
            .any(|pet| pet.name == name)
    }

    fn complete_task(&mut self, task: DailyTask) -> Option<(DailyTask, u64)> {
        let bonus = self.daily_tasks.complete(task)?;
        self.money = self.money.saturating_add(bonus);
        Some((task, bonus))
    }

    // Roster

    /// Adopt a new level-1 pet. Names are unique across active and sold pets.
    pub fn add_pet(&mut self, name: &str, species: &str) -> Result<&Pet, GameError> {
        if self.name_taken(name) {
            return Err(GameError::DuplicateName(name.to_string()));
        }
        let species: Species = species.parse()?;
        self.pets.push(Pet::new(name, species, self.now));
        log::info!("Adopted {} the {}", name, species);
        Ok(&self.pets[self.pets.len() - 1])
    }

    /// Add a pet loaded from a file
    pub fn import_pet(&mut self, pet: Pet) -> Result<&Pet, GameError> {
        if self.name_taken(&pet.name) {
            return Err(GameError::DuplicateName(pet.name));
        }
        self.pets.push(pet);
        Ok(&self.pets[self.pets.len() - 1])
    }

    pub fn sell_pet(&mut self, name: &str) -> Result<Trade, GameError> {
        let index = self.pet_index(name)?;
        let value = self.pets[index].calculate_value();
        let pet = self.pets.remove(index);
        self.money = self.money.saturating_add(value);
        log::info!("Sold {} for {} coins", pet.name, value);
        self.sold_pets.push(pet);

        Ok(Trade {
            kind: TradeKind::Sold,
            name: name.to_string(),
            value,
            money_left: self.money,
        })
    }

    pub fn buy_back_pet(&mut self, name: &str) -> Result<Trade, GameError> {
        let index = self
            .sold_pets
            .iter()
            .position(|pet| pet.name == name)
            .ok_or_else(|| GameError::SoldPetNotFound(name.to_string()))?;
        let value = self.sold_pets[index].calculate_value();
        if self.money < value {
            return Err(GameError::InsufficientFunds {
                needed: value,
                available: self.money,
            });
        }

        self.money -= value;
        let pet = self.sold_pets.remove(index);
        log::info!("Bought back {} for {} coins", pet.name, value);
        self.pets.push(pet);

        Ok(Trade {
            kind: TradeKind::BoughtBack,
            name: name.to_string(),
            value,
            money_left: self.money,
        })
    }

    /// Current value of an active or sold pet
    pub fn pet_value(&self, name: &str) -> Result<u64, GameError> {
        self.pets
            .iter()
            .chain(&self.sold_pets)
            .find(|pet| pet.name == name)
            .map(Pet::calculate_value)
            .ok_or_else(|| GameError::PetNotFound(name.to_string()))
    }

    // Care

    /// Feed one unit of food from the inventory
    pub fn feed_pet(&mut self, name: &str, food: &str) -> Result<CareReport, GameError> {
        let index = self.pet_index(name)?;
        let food: Food = food.parse().map_err(|_| GameError::UnknownFood {
            pet: name.to_string(),
            food: food.to_string(),
        })?;
        self.shop.take_food(food)?;
        Ok(self.pets[index].feed(food, self.now, &mut self.rng))
    }

    pub fn play(&mut self, name: &str, game: &str) -> Result<CareReport, GameError> {
        let index = self.pet_index(name)?;
        let game: Game = game.parse()?;
        self.pets[index].play(game, self.now, &mut self.rng)
    }

    pub fn sleep(&mut self, name: &str) -> Result<CareReport, GameError> {
        let index = self.pet_index(name)?;
        self.pets[index].sleep(self.now)
    }

    pub fn wake(&mut self, name: &str) -> Result<CareReport, GameError> {
        let index = self.pet_index(name)?;
        self.pets[index].wake_up(self.now)
    }

    pub fn train_skill(&mut self, name: &str, skill: &str) -> Result<Training, GameError> {
        let index = self.pet_index(name)?;
        let skill: Skill = skill.parse()?;
        let pet = &mut self.pets[index];
        let training = pet.train_skill(skill, &mut self.rng)?;
        pet.update_mood(self.now);
        Ok(training)
    }

    /// Use one shop item on a pet
    pub fn use_item(&mut self, item: &str, name: &str) -> Result<CareReport, GameError> {
        let item: Item = item.parse()?;
        if self.shop.item_stock(item) == 0 {
            return Err(GameError::OutOfStock(item.to_string()));
        }
        let index = self.pet_index(name)?;
        self.shop.take_item(item)?;
        Ok(self.pets[index].apply_item(item, self.now, &mut self.rng))
    }

    /// Free activity: pays coins and counts towards the matching daily task
    pub fn perform_activity(&mut self, name: &str, activity: &str) -> Result<ActivityReport, GameError> {
        let activity: Activity = activity.parse()?;
        let index = self.pet_index(name)?;
        let care = self.pets[index].perform_activity(activity, self.now, &mut self.rng)?;

        let coins = activity.effect().coins;
        self.money = self.money.saturating_add(coins);
        let task_bonus = self.complete_task(task_for(activity));

        Ok(ActivityReport {
            care,
            coins,
            task_bonus,
        })
    }

    /// Two pets play together and become friends
    pub fn interact(&mut self, first: &str, second: &str) -> Result<ActivityReport, GameError> {
        if first == second {
            return Err(GameError::SelfInteraction(first.to_string()));
        }
        let a = self.pet_index(first)?;
        let b = self.pet_index(second)?;
        let (pet_a, pet_b) = pair_mut(&mut self.pets, a, b);
        let care = pet_a.interact_with(pet_b, self.now);
        let task_bonus = self.complete_task(DailyTask::Social);

        Ok(ActivityReport {
            care,
            coins: 0,
            task_bonus,
        })
    }

    // Shop

    pub fn buy_food(&mut self, food: &str, quantity: u32) -> Result<Purchase, GameError> {
        let food: Food = food.parse()?;
        self.shop.buy_food(food, quantity, &mut self.money)
    }

    pub fn buy_item(&mut self, item: &str, quantity: u32) -> Result<Purchase, GameError> {
        let item: Item = item.parse()?;
        self.shop.buy_item(item, quantity, &mut self.money)
    }

    pub fn set_discount(&mut self, name: &str, fraction: f64) -> Result<(), GameError> {
        self.shop.set_discount(name, fraction)
    }

    pub fn clear_discount(&mut self, name: &str) -> bool {
        self.shop.clear_discount(name)
    }

    pub fn inventory(&self) -> Vec<StockLine> {
        self.shop.stock_lines()
    }

    // Contests

    pub fn available_contests(&self) -> &[Contest] {
        &self.contests.available_contests
    }

    pub fn refresh_contests(&mut self) {
        self.contests.refresh_contests(&mut self.rng);
    }

    /// Win chance a pet would have in a slot, without entering
    pub fn contest_chance(&self, name: &str, slot: usize) -> Result<f64, GameError> {
        let pet = self.pet(name)?;
        let contest = self.contests.contest(slot)?;
        Ok(win_chance(pet, contest.contest_type, contest.difficulty))
    }

    /// Pay the entry fee and resolve the entry. The fee is refunded if the
    /// pet can't compete; a loss keeps it.
    pub fn enter_contest(&mut self, name: &str, slot: usize) -> Result<ContestReport, GameError> {
        let index = self.pet_index(name)?;
        let entry_fee = self.contests.contest(slot)?.entry_fee;
        if self.money < entry_fee {
            return Err(GameError::InsufficientFunds {
                needed: entry_fee,
                available: self.money,
            });
        }

        self.money -= entry_fee;
        let entry = match self
            .contests
            .enter_contest(&mut self.pets[index], slot, &mut self.rng)
        {
            Ok(entry) => entry,
            Err(err) => {
                self.money = self.money.saturating_add(entry_fee);
                return Err(err);
            }
        };

        let pet = &mut self.pets[index];
        let mut level_ups = Vec::new();
        if let ContestOutcome::Won(reward) = &entry.outcome {
            self.money = self.money.saturating_add(reward.money);
            level_ups = pet.gain_experience(reward.exp, &mut self.rng);
            for (food, count) in &reward.items {
                self.shop.add_food(*food, *count);
            }
        }
        pet.update_mood(self.now);

        let line = format!(
            "[{}] {} entered {} ({}): {}",
            self.now.format("%Y-%m-%d %H:%M"),
            entry.pet,
            entry.contest_type,
            entry.difficulty,
            if entry.won() { "won" } else { "lost" }
        );
        self.contest_record
            .entry(entry.contest_type)
            .or_default()
            .push(line);

        Ok(ContestReport {
            entry,
            entry_fee,
            level_ups,
            money_left: self.money,
        })
    }

    // Views

    pub fn status(&self, name: &str) -> Result<PetStatus, GameError> {
        Ok(self.pet(name)?.status(self.now))
    }

    pub fn achievements(&self, name: &str) -> Result<Achievements, GameError> {
        Ok(self.pet(name)?.achievements())
    }

    // Persistence

    /// Save session state to a writer
    pub fn save<W: Write>(&self, writer: W) -> Result<(), SaveError> {
        persistence::save_session(writer, self)
    }

    /// Load session state from a reader. On error nothing changes.
    pub fn load<R: Read>(&mut self, reader: R) -> Result<(), SaveError> {
        let loaded = match persistence::load_session(reader, self.now) {
            Ok(loaded) => loaded,
            Err(err) => {
                log::warn!("Rejected save: {}", err);
                return Err(err);
            }
        };

        self.money = loaded.money;
        self.shop = loaded.shop;
        self.pets = loaded.pets;
        self.sold_pets = loaded.sold_pets;
        self.contest_record = loaded.contest_record;
        self.daily_tasks = loaded.daily_tasks;

        // The slate is never saved
        self.contests.refresh_contests(&mut self.rng);
        Ok(())
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
