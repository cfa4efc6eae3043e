//! Systems - rules that act on pets and the economy

mod progression;
mod mood;
mod valuation;
mod care;
mod shop;
mod daily_tasks;
mod contest;

pub use progression::*;
pub use mood::*;
pub use care::*;
pub use shop::*;
pub use daily_tasks::*;
pub use contest::*;
