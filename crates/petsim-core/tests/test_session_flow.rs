//! End-to-end flows through the public session API

use chrono::{DateTime, Duration, TimeZone, Utc};
use petsim_core::persistence::{list_pet_files, load_pet, load_pet_file, save_pet_file};
use petsim_core::prelude::*;
use petsim_core::systems::{exp_needed, ContestOutcome, DailyTask};

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 10, 8, 30, 0).unwrap()
}

fn session(seed: u64) -> GameSession {
    GameSession::from_config(&GameConfig::default().with_seed(seed), t0()).unwrap()
}

#[test]
fn test_a_day_of_care() {
    let mut game = session(1);
    game.add_pet("Mimi", "cat").unwrap();
    game.add_pet("Bun", "rabbit").unwrap();

    game.feed_pet("Mimi", "regular_food").unwrap();
    game.play("Mimi", "fetch").unwrap();
    game.perform_activity("Bun", "clean").unwrap();
    game.interact("Mimi", "Bun").unwrap();
    game.use_item("vitamins", "Bun").unwrap();

    game.tick(t0() + Duration::hours(3));
    let mimi = game.status("Mimi").unwrap();
    assert_eq!(mimi.level, 1);
    assert_eq!(mimi.experience, 25);
    assert_eq!(mimi.exp_needed, 100);
    assert!(mimi.to_string().starts_with("Mimi the cat"));

    let achievements = game.achievements("Bun").unwrap();
    assert_eq!(achievements.friends, 1);

    // clean 15 + clean task 30 + social task 35
    assert_eq!(game.money, 1000 + 15 + 30 + 35);
    assert!(game.daily_tasks.is_completed(DailyTask::Social));
    assert!(!game.daily_tasks.is_completed(DailyTask::Walk));
}

#[test]
fn test_sell_then_buy_back_restores_pet() {
    let mut game = session(2);
    game.add_pet("Rex", "dog").unwrap();
    for _ in 0..3 {
        game.use_item("training_book", "Rex").ok();
        game.buy_item("training_book", 1).unwrap();
    }
    let snapshot = game.pet("Rex").unwrap().clone();
    let money = game.money;

    let sale = game.sell_pet("Rex").unwrap();
    assert_eq!(sale.value, snapshot.calculate_value());
    assert_eq!(game.pet_value("Rex").unwrap(), sale.value);

    let back = game.buy_back_pet("Rex").unwrap();
    assert_eq!(back.value, sale.value);
    assert_eq!(game.money, money);
    assert_eq!(game.pet("Rex").unwrap(), &snapshot);
}

#[test]
fn test_contest_wins_pay_out_and_grant_experience() {
    let mut game = session(3);
    game.add_pet("Mimi", "cat").unwrap();

    let mut wins = 0;
    for _ in 0..30 {
        game.use_item("pet_bed", "Mimi").ok();
        game.buy_item("pet_bed", 1).ok();
        game.money += 500;

        let before = game.pet("Mimi").unwrap().clone();
        let report = match game.enter_contest("Mimi", 0) {
            Ok(report) => report,
            Err(GameError::TooTired(_)) => continue,
            Err(other) => panic!("unexpected error: {}", other),
        };
        let after = game.pet("Mimi").unwrap();
        if let ContestOutcome::Won(reward) = &report.entry.outcome {
            wins += 1;
            assert_eq!(after.won_contests, before.won_contests + 1);
            assert!(after.level > before.level || after.experience > before.experience);
            assert!(reward.money >= 100);
        } else {
            assert_eq!(after.won_contests, before.won_contests);
        }
        assert!(after.experience < exp_needed(after.level));
    }

    assert!(wins > 0);
    assert_eq!(game.achievements("Mimi").unwrap().contests_won, wins);
    let recorded: usize = game.contest_record.values().map(Vec::len).sum();
    assert!(recorded >= wins as usize);
}

#[test]
fn test_refresh_contests_keeps_tiers() {
    let mut game = session(4);
    for _ in 0..10 {
        game.refresh_contests();
        let fees: Vec<u64> = game.available_contests().iter().map(|c| c.entry_fee).collect();
        assert_eq!(fees, vec![50, 100, 200, 500]);
    }
}

#[test]
fn test_session_save_and_load_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("save.json");

    let mut game = session(5);
    game.add_pet("Mimi", "cat").unwrap();
    game.add_pet("Rex", "dog").unwrap();
    game.sell_pet("Rex").unwrap();
    game.set_discount("treats", 0.5).unwrap();
    game.perform_activity("Mimi", "walk").unwrap();

    game.save(std::fs::File::create(&path).unwrap()).unwrap();

    let mut restored = GameSession::starting_at(t0());
    restored.load(std::fs::File::open(&path).unwrap()).unwrap();

    assert_eq!(restored.money, game.money);
    assert_eq!(restored.pets(), game.pets());
    assert_eq!(restored.sold_pets(), game.sold_pets());
    assert_eq!(restored.shop.discount("treats"), 0.5);
    assert!(restored.daily_tasks.is_completed(DailyTask::Walk));

    // Rex is still reserved after the load
    assert!(matches!(
        restored.add_pet("Rex", "rabbit"),
        Err(GameError::DuplicateName(_))
    ));
}

#[test]
fn test_pet_files_and_import() {
    let dir = tempfile::tempdir().unwrap();

    let mut game = session(6);
    game.add_pet("Nib", "hamster").unwrap();
    game.feed_pet("Nib", "premium_food").unwrap();
    save_pet_file(dir.path(), game.pet("Nib").unwrap()).unwrap();

    assert_eq!(list_pet_files(dir.path()).unwrap(), vec!["Nib".to_string()]);

    let loaded = load_pet_file(dir.path(), "Nib", t0()).unwrap();
    assert_eq!(&loaded, game.pet("Nib").unwrap());

    // Same name can't be imported twice
    assert!(matches!(
        game.import_pet(loaded.clone()),
        Err(GameError::DuplicateName(_))
    ));

    let mut other = session(7);
    other.import_pet(loaded).unwrap();
    assert_eq!(other.pets().len(), 1);
    assert_eq!(other.pet("Nib").unwrap().species, Species::Hamster);
}

#[test]
fn test_extreme_record_can_be_trained_and_sold() {
    let json = r#"{"name": "Big", "species": "cat", "level": 30, "experience": 1500,
        "health": 1000000, "strength": 1000000, "agility": 1000000, "intelligence": 1000000,
        "skills": ["nine_lives"], "skillExp": {"nine_lives": 1000000},
        "wonContests": 1000000, "totalTrainingSessions": 1000000}"#;
    let big = load_pet(json.as_bytes(), t0()).unwrap();

    let mut game = session(8);
    game.import_pet(big).unwrap();
    let training = game.train_skill("Big", "nine_lives").unwrap();
    assert!(training.proficiency > 1_000_000);

    let value = game.pet_value("Big").unwrap();
    let sale = game.sell_pet("Big").unwrap();
    assert_eq!(sale.value, value);
    assert_eq!(game.money, 1000 + value);
    assert!(game.pets().is_empty());
    assert_eq!(game.sold_pets().len(), 1);

    let rejected = r#"{"name": "Huge", "species": "cat", "strength": 1e20}"#;
    assert!(matches!(
        load_pet(rejected.as_bytes(), t0()),
        Err(SaveError::Invalid(_))
    ));
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let run = |seed| {
        let mut game = session(seed);
        game.add_pet("Mimi", "cat").unwrap();
        let mut outcomes = Vec::new();
        for _ in 0..10 {
            game.sleep("Mimi").ok();
            game.wake("Mimi").ok();
            outcomes.push(game.enter_contest("Mimi", 0).map(|r| r.entry.won()).ok());
        }
        (outcomes, game.available_contests().to_vec())
    };
    assert_eq!(run(99), run(99));
}
