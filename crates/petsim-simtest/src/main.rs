//! PetSim Headless Simulation Harness
//!
//! Drives a seeded session through the canonical scenarios and checks the
//! engine's rules end to end. Runs entirely in-process with no file I/O
//! and no presentation layer.
//!
//! Usage:
//!   cargo run -p petsim-simtest
//!   cargo run -p petsim-simtest -- --verbose
//!   cargo run -p petsim-simtest -- --seed 7

use chrono::{DateTime, Duration, TimeZone, Utc};
use petsim_core::prelude::*;
use petsim_core::systems::{
    exp_needed, win_chance, ContestOutcome, ContestType, DailyTask, Difficulty,
};

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: impl Into<String>) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail: detail.into(),
    }
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn new_session(seed: u64) -> Result<GameSession, GameError> {
    GameSession::from_config(&GameConfig::default().with_seed(seed), start_time())
}

fn parse_seed() -> u64 {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
        .unwrap_or(42)
}

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let seed = parse_seed();
    println!("=== PetSim Simulation Harness (seed {}) ===\n", seed);

    let mut results = Vec::new();

    // 1. Care actions and clamping
    results.extend(validate_care(seed, verbose));

    // 2. Leveling and skill unlocks
    results.extend(validate_progression(seed, verbose));

    // 3. Shop and roster economy
    results.extend(validate_economy(seed, verbose));

    // 4. Daily tasks
    results.extend(validate_daily_tasks(seed, verbose));

    // 5. Contest model and entry bookkeeping
    results.extend(validate_contests(seed, verbose));

    // 6. Save/load in memory
    results.extend(validate_persistence(seed, verbose));

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn setup_failed(name: &str, err: impl std::fmt::Display) -> Vec<TestResult> {
    vec![check(name, false, format!("setup failed: {}", err))]
}

// ── 1. Care ─────────────────────────────────────────────────────────────

fn validate_care(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Care ---");
    let mut results = Vec::new();

    let mut session = match new_session(seed) {
        Ok(s) => s,
        Err(e) => return setup_failed("care_setup", e),
    };
    if let Err(e) = session.add_pet("Mimi", "cat") {
        return setup_failed("care_setup", e);
    }

    // Cat fed regular food: hunger 50 - 30 * 1.2
    let fed = session.feed_pet("Mimi", "regular_food");
    let pet = session.find_pet("Mimi");
    results.push(check(
        "feed_regular_food",
        fed.is_ok()
            && pet.is_some_and(|p| {
                (p.hunger - 14.0).abs() < 1e-9 && p.health == 100.0 && p.experience == 10
            }),
        match pet {
            Some(p) => format!("hunger={:.1} health={:.0} exp={}", p.hunger, p.health, p.experience),
            None => "pet missing".into(),
        },
    ));

    // Every food keeps state stats in range
    let mut out_of_range = Vec::new();
    for food in Food::ALL {
        if let Err(e) = session
            .buy_food(food.as_str(), 1)
            .and_then(|_| session.feed_pet("Mimi", food.as_str()))
        {
            return setup_failed("care_setup", e);
        }
        if let Some(p) = session.find_pet("Mimi") {
            for (label, value) in [("hunger", p.hunger), ("health", p.health), ("happiness", p.happiness)] {
                if !(0.0..=100.0).contains(&value) {
                    out_of_range.push(format!("{} after {}: {}", label, food, value));
                }
            }
        }
    }
    results.push(check(
        "feed_clamps_stats",
        out_of_range.is_empty(),
        if out_of_range.is_empty() {
            "all foods keep hunger/health/happiness within 0..=100".to_string()
        } else {
            out_of_range.join(", ")
        },
    ));

    // Too tired to play: no change
    if let Err(e) = session.add_pet("Rex", "dog") {
        return setup_failed("care_setup", e);
    }
    let mut tired_ok = false;
    for _ in 0..5 {
        if session.play("Rex", "chase").is_err() {
            break;
        }
    }
    if let Some(before) = session.find_pet("Rex").cloned() {
        let result = session.play("Rex", "fetch");
        tired_ok = matches!(result, Err(GameError::TooTired(_)))
            && session.find_pet("Rex") == Some(&before);
        if verbose {
            println!("  Rex energy after chasing: {:.0}", before.energy);
        }
    }
    results.push(check(
        "play_too_tired_no_change",
        tired_ok,
        "exhausted pet refuses to play and stays unchanged",
    ));

    // Sleep / wake guards
    let slept = session.sleep("Rex").is_ok();
    let double_sleep = matches!(session.sleep("Rex"), Err(GameError::AlreadyAsleep(_)));
    let woke = session.wake("Rex").is_ok();
    let double_wake = matches!(session.wake("Rex"), Err(GameError::AlreadyAwake(_)));
    results.push(check(
        "sleep_wake_guards",
        slept && double_sleep && woke && double_wake,
        format!(
            "sleep={} again={} wake={} again={}",
            slept, double_sleep, woke, double_wake
        ),
    ));

    results
}

// ── 2. Progression ──────────────────────────────────────────────────────

fn validate_progression(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Progression ---");
    let mut results = Vec::new();

    let mut session = match new_session(seed) {
        Ok(s) => s,
        Err(e) => return setup_failed("progression_setup", e),
    };
    for (name, species) in [("Mimi", "cat"), ("Rex", "dog"), ("Bun", "rabbit"), ("Nib", "hamster")] {
        if let Err(e) = session.add_pet(name, species) {
            return setup_failed("progression_setup", e);
        }
    }

    // Push every pet to the cap with training books
    let mut max_level_seen = 0;
    let mut invariant_broken = Vec::new();
    for _ in 0..5200 {
        session.money = 10_000;
        for name in ["Mimi", "Rex", "Bun", "Nib"] {
            if let Err(e) = session
                .buy_item("training_book", 1)
                .and_then(|_| session.use_item("training_book", name))
            {
                return setup_failed("progression_setup", e);
            }
            if let Some(p) = session.find_pet(name) {
                max_level_seen = max_level_seen.max(p.level);
                if p.experience >= exp_needed(p.level) {
                    invariant_broken.push(format!("{} at level {} exp {}", name, p.level, p.experience));
                }
            }
        }
    }
    results.push(check(
        "experience_below_threshold",
        invariant_broken.is_empty(),
        if invariant_broken.is_empty() {
            "experience < exp_needed(level) after every grant".to_string()
        } else {
            invariant_broken.join("; ")
        },
    ));
    results.push(check(
        "level_capped",
        max_level_seen == MAX_LEVEL,
        format!("highest level reached: {}", max_level_seen),
    ));

    for pet in session.pets() {
        let mut unique = pet.skills.clone();
        unique.sort();
        unique.dedup();
        let all_from_pool = pet.skills.iter().all(|s| pet.species.can_learn(*s));
        results.push(check(
            &format!("skills_{}", pet.species),
            pet.skills.len() == SKILL_UNLOCK_LEVELS.len() && unique.len() == pet.skills.len() && all_from_pool,
            format!(
                "{} learned {}",
                pet.name,
                pet.skills.iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
            ),
        ));
        if verbose {
            println!("  {} value at level {}: {}", pet.name, pet.level, pet.calculate_value());
        }
    }

    results
}

// ── 3. Economy ──────────────────────────────────────────────────────────

fn validate_economy(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Economy ---");
    let mut results = Vec::new();

    let mut session = match new_session(seed) {
        Ok(s) => s,
        Err(e) => return setup_failed("economy_setup", e),
    };

    let bought = session.buy_food("regular_food", 3);
    results.push(check(
        "buy_regular_food_x3",
        bought.is_ok() && session.money == 850 && session.shop.food_stock(Food::RegularFood) == 8,
        format!("money={} stock={}", session.money, session.shop.food_stock(Food::RegularFood)),
    ));

    if let Err(e) = session.set_discount("fruits", 0.15) {
        return setup_failed("economy_setup", e);
    }
    let before = session.money;
    let discounted = session.buy_food("fruits", 3);
    results.push(check(
        "discount_floored",
        discounted.is_ok() && before - session.money == 114,
        format!("paid {}", before - session.money),
    ));

    session.money = 5;
    let broke = session.buy_item("pet_bed", 1);
    results.push(check(
        "insufficient_funds",
        matches!(broke, Err(GameError::InsufficientFunds { .. })) && session.money == 5,
        "purchase refused without changes",
    ));

    // Sale / buy-back round trip
    session.money = 0;
    if let Err(e) = session.add_pet("Rex", "dog") {
        return setup_failed("economy_setup", e);
    }
    let snapshot = session.find_pet("Rex").cloned();
    let sold = session.sell_pet("Rex");
    let after_sale = session.money;
    let bought_back = session.buy_back_pet("Rex");
    results.push(check(
        "sell_buy_back_roundtrip",
        sold.is_ok()
            && bought_back.is_ok()
            && session.money == 0
            && session.find_pet("Rex").cloned() == snapshot,
        format!("sold for {}, money back to {}", after_sale, session.money),
    ));

    results
}

// ── 4. Daily tasks ──────────────────────────────────────────────────────

fn validate_daily_tasks(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Daily Tasks ---");
    let mut results = Vec::new();

    let mut session = match new_session(seed) {
        Ok(s) => s,
        Err(e) => return setup_failed("daily_setup", e),
    };
    for (name, species) in [("Mimi", "cat"), ("Bun", "rabbit")] {
        if let Err(e) = session.add_pet(name, species) {
            return setup_failed("daily_setup", e);
        }
    }

    let first = session.perform_activity("Mimi", "walk").map(|r| r.task_bonus);
    let second = session.perform_activity("Bun", "walk").map(|r| r.task_bonus);
    results.push(check(
        "walk_bonus_once",
        first == Ok(Some((DailyTask::Walk, 50))) && second == Ok(None),
        format!("first={:?} second={:?}", first, second),
    ));

    let social = session.interact("Mimi", "Bun").map(|r| r.task_bonus);
    results.push(check(
        "social_bonus",
        social == Ok(Some((DailyTask::Social, 35))),
        format!("{:?}", social),
    ));

    let reset = session.tick(start_time() + Duration::days(1));
    let again = session.perform_activity("Mimi", "walk").map(|r| r.task_bonus);
    results.push(check(
        "reset_next_day",
        reset && again == Ok(Some((DailyTask::Walk, 50))),
        format!("reset={} bonus={:?}", reset, again),
    ));

    results
}

// ── 5. Contests ─────────────────────────────────────────────────────────

fn validate_contests(seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Contests ---");
    let mut results = Vec::new();

    let mut session = match new_session(seed) {
        Ok(s) => s,
        Err(e) => return setup_failed("contest_setup", e),
    };
    if let Err(e) = session.add_pet("Mimi", "cat") {
        return setup_failed("contest_setup", e);
    }

    let slate = session.available_contests();
    let tiers_ok = slate.len() == Difficulty::ALL.len()
        && slate.iter().zip(Difficulty::ALL).all(|(c, d)| c.difficulty == d);
    results.push(check(
        "slate_one_per_tier",
        tiers_ok,
        slate.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" | "),
    ));

    // Monotonic in attribute and difficulty
    let mut monotonic = true;
    if let Some(base) = session.find_pet("Mimi").cloned() {
        for contest_type in ContestType::ALL {
            let mut pet = base.clone();
            let mut last = 0.0;
            for value in (0..=400).step_by(20) {
                pet.agility = value as f64;
                pet.strength = value as f64;
                pet.intelligence = value as f64;
                pet.happiness = (value as f64).min(100.0);
                let chance = win_chance(&pet, contest_type, Difficulty::Normal);
                monotonic &= chance >= last;
                last = chance;
            }
            let by_tier: Vec<f64> = Difficulty::ALL
                .iter()
                .map(|d| win_chance(&base, contest_type, *d))
                .collect();
            monotonic &= by_tier.windows(2).all(|w| w[1] <= w[0]);
        }
    }
    results.push(check(
        "win_chance_monotonic",
        monotonic,
        "non-decreasing in attribute, non-increasing in difficulty",
    ));

    // Master tier needs level 30: fee refunded
    let master = Difficulty::ALL.len() - 1;
    let before = session.money;
    let refused = session.enter_contest("Mimi", master);
    results.push(check(
        "fee_refund_on_level",
        matches!(refused, Err(GameError::LevelTooLow { required: 30 })) && session.money == before,
        format!("money {} -> {}", before, session.money),
    ));

    // Easy tier accounting over many entries
    let mut wins = 0;
    let mut entries = 0;
    let mut books_balanced = true;
    for _ in 0..40 {
        if let Err(e) = session.sleep("Mimi").and_then(|_| session.wake("Mimi")) {
            return setup_failed("contest_setup", e);
        }
        let money = session.money;
        match session.enter_contest("Mimi", 0) {
            Ok(report) => {
                entries += 1;
                let expected = match &report.entry.outcome {
                    ContestOutcome::Won(reward) => {
                        wins += 1;
                        money - report.entry_fee + reward.money
                    }
                    ContestOutcome::Lost => money - report.entry_fee,
                };
                books_balanced &= session.money == expected;
            }
            Err(GameError::TooTired(_)) => {
                let _ = session.use_item("pet_bed", "Mimi");
            }
            Err(e) => {
                books_balanced = false;
                if verbose {
                    println!("  unexpected: {}", e);
                }
            }
        }
    }
    let recorded: usize = session.contest_record.values().map(Vec::len).sum();
    results.push(check(
        "contest_accounting",
        books_balanced && recorded == entries && entries > 0,
        format!("{} entries, {} wins, {} recorded", entries, wins, recorded),
    ));

    results
}

// ── 6. Persistence ──────────────────────────────────────────────────────

fn validate_persistence(seed: u64, _verbose: bool) -> Vec<TestResult> {
    println!("--- Persistence ---");
    let mut results = Vec::new();

    let mut session = match new_session(seed) {
        Ok(s) => s,
        Err(e) => return setup_failed("persistence_setup", e),
    };
    for (name, species) in [("Mimi", "cat"), ("Rex", "dog")] {
        if let Err(e) = session.add_pet(name, species) {
            return setup_failed("persistence_setup", e);
        }
    }
    if let Err(e) = session.feed_pet("Mimi", "treats") {
        return setup_failed("persistence_setup", e);
    }
    if let Err(e) = session.sell_pet("Rex") {
        return setup_failed("persistence_setup", e);
    }

    let mut buffer = Vec::new();
    if let Err(e) = session.save(&mut buffer) {
        return setup_failed("persistence_save", e);
    }

    let keys_ok = serde_json::from_slice::<serde_json::Value>(&buffer)
        .map(|json| {
            ["money", "foodInventory", "itemsInventory", "pets", "soldPets", "contestRecord", "currentDiscounts"]
                .iter()
                .all(|k| json.get(k).is_some())
                && json["soldPets"][0].get("sellValue").is_some()
        })
        .unwrap_or(false);
    results.push(check(
        "session_record_shape",
        keys_ok,
        format!("{} bytes", buffer.len()),
    ));

    let mut restored = GameSession::starting_at(start_time());
    let loaded = restored.load(&buffer[..]);
    results.push(check(
        "session_roundtrip",
        loaded.is_ok()
            && restored.money == session.money
            && restored.pets() == session.pets()
            && restored.sold_pets() == session.sold_pets(),
        match loaded {
            Ok(()) => "restored roster and wallet".to_string(),
            Err(e) => e.to_string(),
        },
    ));

    let money = restored.money;
    let rejected = restored.load(&b"{\"pets\": [{\"name\": \"X\", \"species\": \"unicorn\"}]}"[..]);
    results.push(check(
        "bad_load_no_change",
        rejected.is_err() && restored.money == money && restored.pets().len() == 1,
        match rejected {
            Err(e) => e.to_string(),
            Ok(()) => "accepted invalid save".to_string(),
        },
    ));

    results
}
