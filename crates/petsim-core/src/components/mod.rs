//! Component definitions for the pet simulation.
//!
//! Components are plain data: species tables, the catalog of consumables and
//! activities, and the pet record. Rules that change them live in systems.

mod catalog;
mod pet;
mod species;

pub use catalog::*;
pub use pet::*;
pub use species::*;
