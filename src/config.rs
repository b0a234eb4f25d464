//! Host configuration and documented parameter fallbacks

use serde::{Deserialize, Serialize};

use crate::consts::{FRAMES_PER_SECOND, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::variation::{GameParameters, GameType};

/// Knobs the host can tune without touching the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Logical playfield handed to the engines.
    pub width: f32,
    pub height: f32,
    /// Display rate the fixed timestep is tuned for.
    pub frames_per_second: u32,
    /// Cap on headless runs so a demo episode always terminates.
    pub max_frames: u64,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
            frames_per_second: FRAMES_PER_SECOND,
            max_frames: 3600,
        }
    }
}

impl HostConfig {
    /// Defaults overlaid with `DAILY_ARCADE_*` environment variables.
    /// Unparseable values are ignored rather than fatal.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(width) = env_value("DAILY_ARCADE_WIDTH") {
            config.width = width;
        }
        if let Some(height) = env_value("DAILY_ARCADE_HEIGHT") {
            config.height = height;
        }
        if let Some(max_frames) = env_value("DAILY_ARCADE_MAX_FRAMES") {
            config.max_frames = max_frames;
        }
        config
    }
}

fn env_value<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("ignoring unparseable {key}={raw}");
            None
        }
    }
}

/// The hardcoded fallback used only when parameters are entirely
/// unavailable (e.g. the store could not be reached) - never as a patch
/// over corrupt stored data.
pub fn default_parameters(_game_type: GameType) -> GameParameters {
    GameParameters {
        difficulty: crate::variation::Difficulty::Medium,
        speed_multiplier: 1.0,
        enemy_count: 4,
        special_features: Vec::new(),
        layout_seed: 12345,
        time_limit: None,
        lives_count: 3,
        bonus_frequency: 0.2,
        custom_colors: None,
        theme_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_build_every_engine() {
        use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
        for game_type in crate::variation::GAME_TYPES {
            let params = default_parameters(game_type);
            let mut session =
                crate::games::create_session(game_type, &params, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
            session.start();
            session.step();
            assert!(!session.frame().is_empty());
        }
    }

    #[test]
    fn test_default_config_matches_playfield() {
        let config = HostConfig::default();
        assert_eq!(config.width, PLAYFIELD_WIDTH);
        assert_eq!(config.height, PLAYFIELD_HEIGHT);
        assert_eq!(config.frames_per_second, FRAMES_PER_SECOND);
    }
}
