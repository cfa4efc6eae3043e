//! Mood system - derives a pet's mood from its current state

use chrono::{DateTime, Utc};

use crate::components::{Mood, Pet};

/// Hours without interaction after which a pet gets lonely
pub const LONELY_AFTER_HOURS: f64 = 24.0;

/// Evaluate mood rules in priority order; the first match wins
pub fn compute_mood(pet: &Pet, now: DateTime<Utc>) -> Mood {
    let hours_since_interaction =
        (now - pet.last_interaction_time).num_seconds() as f64 / 3600.0;

    if pet.hunger > 80.0 {
        Mood::Hungry
    } else if pet.energy < 20.0 {
        Mood::Tired
    } else if hours_since_interaction > LONELY_AFTER_HOURS {
        Mood::Lonely
    } else if pet.happiness < 30.0 {
        Mood::Sad
    } else if pet.happiness > 80.0 {
        Mood::Excited
    } else {
        Mood::Normal
    }
}

impl Pet {
    pub fn update_mood(&mut self, now: DateTime<Utc>) -> Mood {
        self.mood = compute_mood(self, now);
        self.mood
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Species;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_mood_priority() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        assert_eq!(pet.update_mood(t0()), Mood::Normal);

        // Hunger wins over everything else
        pet.hunger = 85.0;
        pet.energy = 10.0;
        pet.happiness = 10.0;
        assert_eq!(pet.update_mood(t0()), Mood::Hungry);

        pet.hunger = 50.0;
        assert_eq!(pet.update_mood(t0()), Mood::Tired);

        pet.energy = 50.0;
        assert_eq!(pet.update_mood(t0() + Duration::hours(25)), Mood::Lonely);
        assert_eq!(pet.update_mood(t0()), Mood::Sad);

        pet.happiness = 90.0;
        assert_eq!(pet.update_mood(t0()), Mood::Excited);
    }

    #[test]
    fn test_loneliness_threshold_is_strict() {
        let pet = Pet::new("Mimi", Species::Cat, t0());
        assert_eq!(compute_mood(&pet, t0() + Duration::hours(24)), Mood::Normal);
        assert_eq!(
            compute_mood(&pet, t0() + Duration::hours(24) + Duration::seconds(1)),
            Mood::Lonely
        );
    }

    #[test]
    fn test_update_mood_is_idempotent() {
        let mut pet = Pet::new("Mimi", Species::Cat, t0());
        pet.happiness = 95.0;
        let first = pet.update_mood(t0());
        let second = pet.update_mood(t0());
        assert_eq!(first, second);
    }
}
