//! Monetary value of a pet, used for both selling and buying back.

use crate::components::Pet;

const BASE_VALUE: u64 = 1000;
const PER_LEVEL: u64 = 200;
const PER_STAT_POINT: f64 = 10.0;
const PER_SKILL: u64 = 500;
const PER_PROFICIENCY_POINT: u64 = 2;
const PER_CONTEST_WIN: u64 = 300;
const PER_TRAINING_SESSION: u64 = 50;

impl Pet {
    /// Pure function of the pet's current stats
    pub fn calculate_value(&self) -> u64 {
        let stats = self.health + self.strength + self.agility + self.intelligence;
        let stats_bonus = (stats * PER_STAT_POINT).max(0.0).floor() as u64;
        let proficiency: u64 = self
            .skill_exp
            .values()
            .fold(0, |sum: u64, &p| sum.saturating_add(u64::from(p)));
        let growth_bonus = (1000.0 * self.growth_rate()).floor() as u64;

        [
            BASE_VALUE,
            u64::from(self.level).saturating_mul(PER_LEVEL),
            stats_bonus,
            (self.skills.len() as u64).saturating_mul(PER_SKILL),
            proficiency.saturating_mul(PER_PROFICIENCY_POINT),
            u64::from(self.won_contests).saturating_mul(PER_CONTEST_WIN),
            u64::from(self.total_training_sessions).saturating_mul(PER_TRAINING_SESSION),
            growth_bonus,
        ]
        .into_iter()
        .fold(0, u64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use crate::components::{Pet, Skill, Species};
    use chrono::{TimeZone, Utc};

    fn pet(species: Species) -> Pet {
        Pet::new("Test", species, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_new_cat_value() {
        // 1000 + 200 + 345 * 10 + 1200
        assert_eq!(pet(Species::Cat).calculate_value(), 5850);
    }

    #[test]
    fn test_hamster_growth_bonus_is_exact() {
        // 1000 + 200 + 250 * 10 + 900
        assert_eq!(pet(Species::Hamster).calculate_value(), 4600);
    }

    #[test]
    fn test_huge_stats_saturate() {
        let mut p = pet(Species::Cat);
        p.strength = 1e20;
        p.won_contests = u32::MAX;
        p.skill_exp.insert(Skill::NineLives, u32::MAX);
        assert_eq!(p.calculate_value(), u64::MAX);
    }

    #[test]
    fn test_value_is_idempotent() {
        let p = pet(Species::Dog);
        assert_eq!(p.calculate_value(), p.calculate_value());
    }

    #[test]
    fn test_value_monotonic_in_each_factor() {
        let base = pet(Species::Rabbit);
        let v = base.calculate_value();

        let mut leveled = base.clone();
        leveled.level += 1;
        assert_eq!(leveled.calculate_value(), v + 200);

        let mut skilled = base.clone();
        skilled.skills.push(Skill::QuickHop);
        skilled.skill_exp.insert(Skill::QuickHop, 0);
        assert_eq!(skilled.calculate_value(), v + 500);

        let mut winner = base.clone();
        winner.won_contests += 1;
        assert_eq!(winner.calculate_value(), v + 300);

        let mut trained = base.clone();
        trained.total_training_sessions += 2;
        assert_eq!(trained.calculate_value(), v + 100);
    }

    #[test]
    fn test_proficiency_counts_double() {
        let mut p = pet(Species::Rabbit);
        let v = p.calculate_value();
        p.skills.push(Skill::Digging);
        p.skill_exp.insert(Skill::Digging, 15);
        assert_eq!(p.calculate_value(), v + 500 + 30);
    }
}
