//! Daily Arcade - a rotating daily minigame challenge
//!
//! Core modules:
//! - `rng`: Deterministic random sources (layout LCG + seeded parameter stream)
//! - `variation`: Date/seed -> reproducible game variation generator
//! - `games`: The three simulation engines and the shared session contract
//! - `render`: Draw-list frames the engines render into
//! - `scores` / `store`: Leaderboard records and the in-memory storage boundary
//! - `config`: Host configuration and documented parameter fallbacks

pub mod config;
pub mod games;
pub mod render;
pub mod rng;
pub mod scores;
pub mod store;
pub mod variation;

pub use games::{Button, Engine, InputState, Phase, Session};
pub use variation::{Difficulty, GameParameters, GameType, GameVariation};

/// Game configuration constants
pub mod consts {
    /// Logical playfield size shared by all engines. Hosts may scale the
    /// rendered frame, but simulation coordinates always live in this space.
    pub const PLAYFIELD_WIDTH: f32 = 600.0;
    pub const PLAYFIELD_HEIGHT: f32 = 480.0;

    /// One `Session::step` equals one simulation frame; timers and speeds
    /// are tuned against this rate.
    pub const FRAMES_PER_SECOND: u32 = 60;
}
