//! PetSim Core - Virtual Pet Simulation Engine
//!
//! Raise pets by feeding, playing, training and resting them, manage a shared
//! wallet and shop inventory, and enter skill-based contests.
//!
//! # Architecture
//!
//! - **Components**: plain data (species tables, catalog, the pet record)
//! - **Systems**: rules over that data (care, progression, mood, valuation,
//!   shop, daily tasks, contests)
//! - **Engine**: [`engine::GameSession`], which owns the roster, wallet and
//!   shop and runs every cross-component transaction
//!
//! The engine never reads the clock on its own after creation and never
//! schedules work; the host calls [`engine::GameSession::tick`] at whatever
//! cadence it likes. Every random decision goes through the session's
//! seeded RNG.
//!
//! # Example
//!
//! ```rust,no_run
//! use petsim_core::prelude::*;
//!
//! let mut session = GameSession::new();
//! session.add_pet("Mimi", "cat").unwrap();
//! session.feed_pet("Mimi", "regular_food").unwrap();
//!
//! match session.enter_contest("Mimi", 0) {
//!     Ok(report) => println!("{}", report),
//!     Err(err) => println!("{}", err),
//! }
//! ```

pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod persistence;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::GameConfig;
    pub use crate::engine::GameSession;
    pub use crate::error::GameError;
    pub use crate::persistence::SaveError;
}
