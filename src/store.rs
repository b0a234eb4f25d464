//! In-memory storage boundary
//!
//! The host (an HTTP layer, a desktop shell, the demo binary) talks to the
//! core through this service: game records keyed by date, guest users, and
//! the leaderboard. Game parameters are persisted as a JSON string and
//! parsed back on demand; a corrupt string is an error for the caller, not
//! something to paper over with defaults.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::scores::{DEFAULT_TOP_LIMIT, Score, ScoreBoard};
use crate::variation::{
    GameParameters, GameType, GameVariation, generate_daily_game, generate_multiple_variations,
    offset_date,
};

/// Upper bound on one sample-catalog request.
pub const MAX_SAMPLE_VARIATIONS: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("game {0} not found")]
    GameNotFound(u32),
    #[error("user {0} not found")]
    UserNotFound(u32),
    #[error("stored parameters for game {0} are not valid JSON: {1}")]
    MalformedParameters(u32, #[source] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u32,
    pub username: String,
}

/// A persisted daily game. `parameters` is the JSON-serialized
/// [`GameParameters`] consumed verbatim by engine construction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub game_type: GameType,
    pub description: String,
    pub instructions: String,
    pub date: String,
    pub icon: String,
    pub parameters: String,
    pub variation_id: u32,
}

fn icon_for(game_type: GameType) -> &'static str {
    match game_type {
        GameType::Pacman => "gamepad",
        GameType::SpaceInvaders => "rocket",
        GameType::Frogger => "frog",
    }
}

fn instructions_for(game_type: GameType) -> &'static str {
    match game_type {
        GameType::Pacman => {
            "Use arrow keys to move. Eat dots for points and power pellets to hunt ghosts!"
        }
        GameType::SpaceInvaders => {
            "Use left/right to move and spacebar to shoot. Avoid enemy shots!"
        }
        GameType::Frogger => {
            "Use arrow keys to move. Avoid traffic and use logs to cross the river."
        }
    }
}

/// Maps standing in for a database; nothing outlives the process.
#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<u32, User>,
    games: HashMap<u32, GameRecord>,
    scores: ScoreBoard,
    next_user_id: u32,
    next_game_id: u32,
}

impl Store {
    pub fn new() -> Self {
        Self {
            users: HashMap::new(),
            games: HashMap::new(),
            scores: ScoreBoard::new(),
            next_user_id: 1,
            next_game_id: 1,
        }
    }

    /// Pre-generate the week around `center_date` (three days either side),
    /// so calendar browsing has records to show.
    pub fn seed_week(&mut self, center_date: &str) {
        for delta in -3i64..=3 {
            let date = offset_date(center_date, delta);
            if self.find_by_date(&date).is_none() {
                self.insert_variation(generate_daily_game(&date));
            }
        }
    }

    fn find_by_date(&self, date: &str) -> Option<&GameRecord> {
        self.games.values().find(|game| game.date == date)
    }

    fn insert_variation(&mut self, variation: GameVariation) -> u32 {
        let id = self.next_game_id;
        self.next_game_id += 1;
        let parameters = serde_json::to_string(&variation.parameters)
            .unwrap_or_else(|_| "{}".to_string());
        let record = GameRecord {
            id,
            name: variation.name,
            game_type: variation.game_type,
            description: variation.description,
            instructions: instructions_for(variation.game_type).to_string(),
            date: variation.date_created,
            icon: icon_for(variation.game_type).to_string(),
            parameters,
            variation_id: variation.id,
        };
        log::info!(
            "stored game {id} ({}) for {}",
            record.game_type,
            record.date
        );
        self.games.insert(id, record);
        id
    }

    /// The game for a date, synthesizing and persisting the daily variation
    /// if no record exists yet.
    pub fn game_for_date(&mut self, date: &str) -> GameRecord {
        if let Some(game) = self.find_by_date(date) {
            return game.clone();
        }
        let id = self.insert_variation(generate_daily_game(date));
        self.games[&id].clone()
    }

    /// All records, oldest id first.
    pub fn games(&self) -> Vec<&GameRecord> {
        let mut games: Vec<&GameRecord> = self.games.values().collect();
        games.sort_by_key(|game| game.id);
        games
    }

    pub fn game(&self, id: u32) -> Result<&GameRecord, StoreError> {
        self.games.get(&id).ok_or(StoreError::GameNotFound(id))
    }

    pub fn game_by_date(&self, date: &str) -> Option<&GameRecord> {
        self.find_by_date(date)
    }

    /// Parse a record's stored parameter JSON. Corrupt JSON surfaces as
    /// [`StoreError::MalformedParameters`].
    pub fn parameters(&self, game_id: u32) -> Result<GameParameters, StoreError> {
        let game = self.game(game_id)?;
        serde_json::from_str(&game.parameters)
            .map_err(|err| StoreError::MalformedParameters(game_id, err))
    }

    /// Mint an ephemeral guest user.
    pub fn create_guest_user(&mut self) -> User {
        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User {
            id,
            username: format!("guest_{}", 1000 + id),
        };
        self.users.insert(id, user.clone());
        user
    }

    pub fn user(&self, id: u32) -> Result<&User, StoreError> {
        self.users.get(&id).ok_or(StoreError::UserNotFound(id))
    }

    /// Record a finished episode's score. Both the game and the user must
    /// already exist.
    pub fn submit_score(
        &mut self,
        game_id: u32,
        user_id: u32,
        score: u32,
        date: &str,
    ) -> Result<Score, StoreError> {
        self.game(game_id)?;
        self.user(user_id)?;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default();
        Ok(self.scores.add(game_id, user_id, score, date, timestamp))
    }

    /// Best scores for a game, highest first; `None` limit means the
    /// default of [`DEFAULT_TOP_LIMIT`].
    pub fn top_scores(&self, game_id: u32, limit: Option<usize>) -> Vec<Score> {
        self.scores.top(game_id, limit.unwrap_or(DEFAULT_TOP_LIMIT))
    }

    pub fn user_scores(&self, user_id: u32) -> Vec<Score> {
        self.scores.for_user(user_id)
    }
}

/// Ad-hoc sample catalog, clamped to [`MAX_SAMPLE_VARIATIONS`].
pub fn sample_variations(count: usize, start_date: &str) -> Vec<GameVariation> {
    generate_multiple_variations(count.min(MAX_SAMPLE_VARIATIONS), start_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_game_synthesized_once_per_date() {
        let mut store = Store::new();
        let a = store.game_for_date("2024-05-05");
        let b = store.game_for_date("2024-05-05");
        assert_eq!(a, b);
        assert_eq!(store.games().len(), 1);
        assert_eq!(a.date, "2024-05-05");
        let daily = generate_daily_game("2024-05-05");
        assert_eq!(a.game_type, daily.game_type);
        assert_eq!(a.variation_id, daily.id);
    }

    #[test]
    fn test_seed_week_covers_seven_days() {
        let mut store = Store::new();
        store.seed_week("2024-05-05");
        assert_eq!(store.games().len(), 7);
        assert!(store.game_by_date("2024-05-02").is_some());
        assert!(store.game_by_date("2024-05-08").is_some());
        // Idempotent: the same week again adds nothing.
        store.seed_week("2024-05-05");
        assert_eq!(store.games().len(), 7);
    }

    #[test]
    fn test_stored_parameters_round_trip() {
        let mut store = Store::new();
        let game = store.game_for_date("2024-05-05");
        let parsed = store.parameters(game.id).expect("parameters parse");
        let daily = generate_daily_game("2024-05-05");
        assert_eq!(parsed, daily.parameters);
    }

    #[test]
    fn test_malformed_parameters_surface_as_error() {
        let mut store = Store::new();
        let game = store.game_for_date("2024-05-05");
        let id = game.id;
        store
            .games
            .get_mut(&id)
            .expect("record exists")
            .parameters = "{not json".to_string();
        match store.parameters(id) {
            Err(StoreError::MalformedParameters(game_id, _)) => assert_eq!(game_id, id),
            other => panic!("expected MalformedParameters, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_game_is_not_found() {
        let store = Store::new();
        assert!(matches!(store.game(99), Err(StoreError::GameNotFound(99))));
        assert!(matches!(
            store.parameters(99),
            Err(StoreError::GameNotFound(99))
        ));
    }

    #[test]
    fn test_score_submission_requires_game_and_user() {
        let mut store = Store::new();
        let game = store.game_for_date("2024-05-05");
        assert!(matches!(
            store.submit_score(game.id, 1, 100, "2024-05-05"),
            Err(StoreError::UserNotFound(1))
        ));

        let user = store.create_guest_user();
        assert!(matches!(
            store.submit_score(999, user.id, 100, "2024-05-05"),
            Err(StoreError::GameNotFound(999))
        ));

        let score = store
            .submit_score(game.id, user.id, 100, "2024-05-05")
            .expect("valid submission");
        assert_eq!(score.score, 100);
        assert_eq!(store.top_scores(game.id, None), vec![score]);
    }

    #[test]
    fn test_top_scores_default_limit() {
        let mut store = Store::new();
        let game = store.game_for_date("2024-05-05");
        let user = store.create_guest_user();
        for points in [10, 60, 30, 50, 20, 40] {
            store
                .submit_score(game.id, user.id, points, "2024-05-05")
                .expect("valid submission");
        }
        let top = store.top_scores(game.id, None);
        assert_eq!(top.len(), DEFAULT_TOP_LIMIT);
        assert_eq!(top[0].score, 60);
        assert_eq!(top.last().map(|s| s.score), Some(20));
    }

    #[test]
    fn test_guest_users_are_distinct() {
        let mut store = Store::new();
        let a = store.create_guest_user();
        let b = store.create_guest_user();
        assert_ne!(a.id, b.id);
        assert_ne!(a.username, b.username);
        assert!(store.user(a.id).is_ok());
    }

    #[test]
    fn test_sample_catalog_is_clamped() {
        let samples = sample_variations(500, "2024-01-01");
        assert_eq!(samples.len(), MAX_SAMPLE_VARIATIONS);
        assert_eq!(sample_variations(3, "2024-01-01").len(), 3);
    }
}
