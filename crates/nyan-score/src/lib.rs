//! `.nys` leaderboards: the ten best plays of a level.

pub mod leaderboard;
pub mod score;

pub use leaderboard::{CAPACITY, Leaderboard, SCORE_EXTENSION};
pub use score::{HighScore, Mods};
