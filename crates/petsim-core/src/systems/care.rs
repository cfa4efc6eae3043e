//! Care actions: feeding, playing, resting, items, free activities and
//! socializing.
//!
//! Every action either fails without touching the pet or applies its whole
//! effect, grants experience (leveling eagerly) and recomputes mood.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::fmt;

use super::progression::LevelUp;
use crate::components::{Activity, Food, Game, Item, Pet};
use crate::error::GameError;

/// Minimum energy a pet needs to play
pub const PLAY_MIN_ENERGY: f64 = 20.0;

const SLEEP_ENERGY: f64 = 50.0;
const SLEEP_HEALTH: f64 = 10.0;
const INTERACT_HAPPINESS: f64 = 10.0;

/// Outcome of a successful care action
#[derive(Debug, Clone, PartialEq)]
pub struct CareReport {
    pub message: String,
    pub experience: u32,
    pub level_ups: Vec<LevelUp>,
}

impl CareReport {
    fn new(message: String) -> Self {
        Self {
            message,
            experience: 0,
            level_ups: Vec::new(),
        }
    }
}

impl fmt::Display for CareReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        for level_up in &self.level_ups {
            write!(f, "\n{}", level_up)?;
        }
        Ok(())
    }
}

impl Pet {
    pub fn feed(&mut self, food: Food, now: DateTime<Utc>, rng: &mut impl Rng) -> CareReport {
        let effect = food.effect();

        self.adjust_hunger(-effect.hunger * self.growth_rate());
        self.adjust_health(effect.health);
        self.adjust_happiness(effect.happiness);
        let level_ups = self.gain_experience(effect.experience, rng);

        self.last_feed_time = now;
        self.update_mood(now);

        CareReport {
            message: format!(
                "{} ate the {} and looks satisfied! (+{} exp)",
                self.name, food, effect.experience
            ),
            experience: effect.experience,
            level_ups,
        }
    }

    pub fn play(
        &mut self,
        game: Game,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<CareReport, GameError> {
        if self.is_sleeping {
            return Err(GameError::Asleep(self.name.clone()));
        }
        if self.energy < PLAY_MIN_ENERGY {
            return Err(GameError::TooTired(self.name.clone()));
        }

        let effect = game.effect();
        self.adjust_energy(effect.energy);
        self.adjust_happiness(effect.happiness);
        let level_ups = self.gain_experience(effect.experience, rng);

        self.last_interaction_time = now;
        self.update_mood(now);

        Ok(CareReport {
            message: format!(
                "{} had a great time playing {}! (+{} exp)",
                self.name, game, effect.experience
            ),
            experience: effect.experience,
            level_ups,
        })
    }

    pub fn sleep(&mut self, now: DateTime<Utc>) -> Result<CareReport, GameError> {
        if self.is_sleeping {
            return Err(GameError::AlreadyAsleep(self.name.clone()));
        }

        self.is_sleeping = true;
        self.adjust_energy(SLEEP_ENERGY);
        self.adjust_health(SLEEP_HEALTH);
        self.update_mood(now);

        Ok(CareReport::new(format!(
            "{} fell asleep and is recovering energy",
            self.name
        )))
    }

    pub fn wake_up(&mut self, now: DateTime<Utc>) -> Result<CareReport, GameError> {
        if !self.is_sleeping {
            return Err(GameError::AlreadyAwake(self.name.clone()));
        }

        self.is_sleeping = false;
        self.update_mood(now);

        Ok(CareReport::new(format!("{} woke up refreshed!", self.name)))
    }

    /// Apply a shop item's effect. Stock is the caller's concern.
    pub fn apply_item(&mut self, item: Item, now: DateTime<Utc>, rng: &mut impl Rng) -> CareReport {
        let effect = item.effect();

        if effect.happiness != 0.0 {
            self.adjust_happiness(effect.happiness);
        }
        if effect.energy != 0.0 {
            self.adjust_energy(effect.energy);
        }
        if effect.health != 0.0 {
            self.adjust_health(effect.health);
        }
        let level_ups = if effect.experience > 0 {
            self.gain_experience(effect.experience, rng)
        } else {
            Vec::new()
        };
        self.update_mood(now);

        CareReport {
            message: format!("Used {} on {}, it's feeling better!", item, self.name),
            experience: effect.experience,
            level_ups,
        }
    }

    /// Run a free activity. Coins and task bonuses are paid by the session.
    pub fn perform_activity(
        &mut self,
        activity: Activity,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<CareReport, GameError> {
        if self.is_sleeping {
            return Err(GameError::Asleep(self.name.clone()));
        }
        let effect = activity.effect();
        if self.energy < effect.energy_cost {
            return Err(GameError::TooTired(self.name.clone()));
        }

        self.adjust_energy(-effect.energy_cost);
        self.adjust_happiness(effect.happiness);
        let level_ups = self.gain_experience(effect.experience, rng);
        self.last_interaction_time = now;
        self.update_mood(now);

        Ok(CareReport {
            message: format!(
                "{} finished {}! (+{} exp)",
                self.name, activity, effect.experience
            ),
            experience: effect.experience,
            level_ups,
        })
    }

    /// Two pets play together and become friends
    pub fn interact_with(&mut self, other: &mut Pet, now: DateTime<Utc>) -> CareReport {
        for pet in [&mut *self, &mut *other] {
            pet.adjust_happiness(INTERACT_HAPPINESS);
            pet.last_interaction_time = now;
        }
        self.friends.insert(other.name.clone());
        other.friends.insert(self.name.clone());
        self.update_mood(now);
        other.update_mood(now);

        CareReport::new(format!(
            "{} and {} had a lovely time together!",
            self.name, other.name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Mood, Species};
    use crate::systems::exp_needed;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn test_feed_regular_food_cat() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        let later = t0() + Duration::minutes(30);
        let report = pet.feed(Food::RegularFood, later, &mut rng());

        assert!((pet.hunger - 14.0).abs() < 1e-9);
        assert_eq!(pet.health, 100.0);
        assert_eq!(pet.happiness, 55.0);
        assert_eq!(pet.experience, 10);
        assert_eq!(pet.level, 1);
        assert_eq!(pet.last_feed_time, later);
        assert_eq!(report.experience, 10);
        assert!(report.level_ups.is_empty());
    }

    #[test]
    fn test_feed_keeps_stats_in_range() {
        let mut r = rng();
        for species in Species::ALL {
            for food in Food::ALL {
                let mut pet = Pet::new("P", species, t0());
                pet.hunger = 5.0;
                pet.happiness = 98.0;
                pet.feed(food, t0(), &mut r);
                for stat in [pet.hunger, pet.health, pet.happiness] {
                    assert!((0.0..=100.0).contains(&stat), "{} out of range", stat);
                }
                assert!(pet.experience < exp_needed(pet.level));
            }
        }
    }

    #[test]
    fn test_treats_give_extra_happiness() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        pet.feed(Food::Treats, t0(), &mut rng());
        assert_eq!(pet.happiness, 65.0);
    }

    #[test]
    fn test_play_too_tired_changes_nothing() {
        let mut pet = Pet::new("Rex", Species::Dog, t0());
        pet.energy = 15.0;
        let before = pet.clone();

        let result = pet.play(Game::Fetch, t0(), &mut rng());
        assert!(matches!(result, Err(GameError::TooTired(_))));
        assert_eq!(pet, before);
    }

    #[test]
    fn test_play_applies_game_effect() {
        let mut pet = Pet::new("Rex", Species::Dog, t0());
        let later = t0() + Duration::hours(1);
        pet.play(Game::Chase, later, &mut rng()).unwrap();

        assert_eq!(pet.energy, 70.0);
        assert_eq!(pet.happiness, 90.0);
        assert_eq!(pet.experience, 20);
        assert_eq!(pet.last_interaction_time, later);
        assert_eq!(pet.mood, Mood::Excited);
    }

    #[test]
    fn test_play_energy_floor() {
        let mut pet = Pet::new("Rex", Species::Dog, t0());
        pet.energy = 25.0;
        pet.play(Game::Training, t0(), &mut rng()).unwrap();
        assert_eq!(pet.energy, 0.0);
    }

    #[test]
    fn test_sleep_and_wake_toggle() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        pet.energy = 30.0;
        pet.health = 50.0;

        pet.sleep(t0()).unwrap();
        assert!(pet.is_sleeping);
        assert_eq!(pet.energy, 80.0);
        assert_eq!(pet.health, 60.0);

        let before = pet.clone();
        assert!(matches!(pet.sleep(t0()), Err(GameError::AlreadyAsleep(_))));
        assert_eq!(pet, before);

        assert!(matches!(
            pet.play(Game::Fetch, t0(), &mut rng()),
            Err(GameError::Asleep(_))
        ));

        pet.wake_up(t0()).unwrap();
        assert!(!pet.is_sleeping);
        assert!(matches!(pet.wake_up(t0()), Err(GameError::AlreadyAwake(_))));
    }

    #[test]
    fn test_items() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        pet.energy = 5.0;
        pet.apply_item(Item::ToyBall, t0(), &mut rng());
        assert_eq!(pet.energy, 0.0);
        assert_eq!(pet.happiness, 70.0);

        pet.apply_item(Item::PetBed, t0(), &mut rng());
        assert_eq!(pet.energy, 90.0);

        pet.apply_item(Item::GroomingKit, t0(), &mut rng());
        assert_eq!(pet.health, 90.0);
        assert_eq!(pet.happiness, 100.0);

        let report = pet.apply_item(Item::TrainingBook, t0(), &mut rng());
        assert_eq!(report.experience, 50);
        assert_eq!(pet.experience, 50);
    }

    #[test]
    fn test_activity_requires_energy() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        pet.energy = 14.0;
        assert!(matches!(
            pet.perform_activity(Activity::BasicTraining, t0(), &mut rng()),
            Err(GameError::TooTired(_))
        ));
        pet.perform_activity(Activity::Walk, t0(), &mut rng()).unwrap();
        assert_eq!(pet.energy, 4.0);
        assert_eq!(pet.happiness, 65.0);
        assert_eq!(pet.experience, 10);
    }

    #[test]
    fn test_interaction_makes_friends() {
        let mut a = Pet::new("Mimi", Species::Cat, t0());
        let mut b = Pet::new("Rex", Species::Dog, t0());
        b.happiness = 95.0;
        a.interact_with(&mut b, t0());

        assert_eq!(a.happiness, 60.0);
        assert_eq!(b.happiness, 100.0);
        assert!(a.friends.contains("Rex"));
        assert!(b.friends.contains("Mimi"));

        // Friendship is a set
        a.interact_with(&mut b, t0());
        assert_eq!(a.friends.len(), 1);
    }
}
