//! Score records and per-game leaderboards

use serde::{Deserialize, Serialize};

/// Default number of entries a leaderboard query returns.
pub const DEFAULT_TOP_LIMIT: usize = 5;

/// A single submitted score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub id: u32,
    pub game_id: u32,
    pub user_id: u32,
    pub score: u32,
    /// Calendar date of the challenge the score was earned on.
    pub date: String,
    /// Submission time, unix milliseconds.
    pub timestamp: u64,
}

/// All submitted scores, queryable per game or per user.
#[derive(Debug, Clone, Default)]
pub struct ScoreBoard {
    entries: Vec<Score>,
    next_id: u32,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Record a score; the board assigns the id.
    pub fn add(&mut self, game_id: u32, user_id: u32, score: u32, date: &str, timestamp: u64) -> Score {
        let entry = Score {
            id: self.next_id,
            game_id,
            user_id,
            score,
            date: date.to_string(),
            timestamp,
        };
        self.next_id += 1;
        self.entries.push(entry.clone());
        entry
    }

    /// Top `limit` scores for a game, best first. Ties keep submission order.
    pub fn top(&self, game_id: u32, limit: usize) -> Vec<Score> {
        let mut scores: Vec<Score> = self
            .entries
            .iter()
            .filter(|s| s.game_id == game_id)
            .cloned()
            .collect();
        scores.sort_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        scores.truncate(limit);
        scores
    }

    /// A user's scores, newest first.
    pub fn for_user(&self, user_id: u32) -> Vec<Score> {
        let mut scores: Vec<Score> = self
            .entries
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        scores.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        scores
    }

    /// Whether a score would make a game's top list of `limit` entries.
    pub fn qualifies(&self, game_id: u32, score: u32, limit: usize) -> bool {
        if score == 0 {
            return false;
        }
        let top = self.top(game_id, limit);
        if top.len() < limit {
            return true;
        }
        top.last().map(|entry| score > entry.score).unwrap_or(true)
    }

    /// Rank (1-indexed) a score would land at, `None` if it misses the list.
    pub fn potential_rank(&self, game_id: u32, score: u32, limit: usize) -> Option<usize> {
        if !self.qualifies(game_id, score, limit) {
            return None;
        }
        let top = self.top(game_id, limit);
        let rank = top.iter().position(|entry| score > entry.score);
        Some(rank.unwrap_or(top.len()) + 1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
