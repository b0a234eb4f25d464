//! Seeded game-variation generation
//!
//! A calendar date (or an explicit seed) maps to a reproducible
//! [`GameVariation`]: the game type for the day, its tuning parameters, and
//! flavor text. Every derived value is a pure function of the seed, so the
//! same date always produces the same challenge.

use rand::Rng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::rng::{random_seed, seeded_stream};

/// Fixed daily rotation order.
pub const GAME_TYPES: [GameType; 3] = [GameType::Pacman, GameType::SpaceInvaders, GameType::Frogger];

/// Daily variation ids wrap at this bound.
pub const VARIATION_ID_SPAN: u64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameType {
    #[serde(rename = "pacman")]
    Pacman,
    #[serde(rename = "space-invaders")]
    SpaceInvaders,
    #[serde(rename = "frogger")]
    Frogger,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Pacman => "pacman",
            GameType::SpaceInvaders => "space-invaders",
            GameType::Frogger => "frogger",
        }
    }
}

impl std::str::FromStr for GameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pacman" => Ok(GameType::Pacman),
            "space-invaders" => Ok(GameType::SpaceInvaders),
            "frogger" => Ok(GameType::Frogger),
            other => Err(format!("unknown game type: {other}")),
        }
    }
}

impl std::fmt::Display for GameType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// Global pace multiplier applied on top of `speed_multiplier` by every
    /// engine.
    pub fn speed_factor(self) -> f32 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.2,
            Difficulty::Expert => 1.5,
        }
    }

    fn base_speed(self) -> f64 {
        match self {
            Difficulty::Easy => 0.8,
            Difficulty::Medium => 1.0,
            Difficulty::Hard => 1.2,
            Difficulty::Expert => 1.5,
        }
    }

    fn base_enemy_count(self) -> u32 {
        match self {
            Difficulty::Easy => 3,
            Difficulty::Medium => 4,
            Difficulty::Hard => 5,
            Difficulty::Expert => 6,
        }
    }

    fn lives(self) -> u32 {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 4,
            Difficulty::Hard => 3,
            Difficulty::Expert => 2,
        }
    }

    fn feature_count(self) -> usize {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium | Difficulty::Hard => 2,
            Difficulty::Expert => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Novice",
            Difficulty::Medium => "Adept",
            Difficulty::Hard => "Expert",
            Difficulty::Expert => "Master",
        }
    }

    fn blurb(self) -> &'static str {
        match self {
            Difficulty::Easy => "A relaxed challenge suitable for beginners.",
            Difficulty::Medium => "A balanced challenge for casual players.",
            Difficulty::Hard => "A demanding challenge that will test your skills.",
            Difficulty::Expert => "An extreme challenge for the most skilled players.",
        }
    }
}

/// Semantic color roles an engine reads when a themed palette is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: String,
    pub player: String,
    pub enemy: String,
    pub item: String,
}

/// Display names of the five fixed themes, indexed by `theme_id - 1`.
pub const THEME_NAMES: [&str; 5] = ["Classic", "Neon", "Retro", "Dark", "Pastel"];

/// Palette for a theme id in `1..=5`. Out-of-range ids fall back to Classic.
pub fn theme_palette(theme_id: u8) -> Palette {
    let (background, player, enemy, item) = match theme_id {
        2 => ("#120458", "#F706CF", "#06F725", "#06D8F7"),
        3 => ("#382800", "#B86F00", "#4F6228", "#CFAD00"),
        4 => ("#0A0A0A", "#A6A6A6", "#4D4D4D", "#D9D9D9"),
        5 => ("#F0E6F2", "#A6D8D4", "#F2BAC9", "#BCD8A6"),
        _ => ("#000000", "#FFFF00", "#FF0000", "#00FFFF"),
    };
    Palette {
        background: background.to_string(),
        player: player.to_string(),
        enemy: enemy.to_string(),
        item: item.to_string(),
    }
}

/// Feature-tag vocabulary for one game type.
pub fn feature_pool(game_type: GameType) -> &'static [&'static str] {
    match game_type {
        GameType::Pacman => &[
            "ghost_frenzy",
            "maze_rotation",
            "invisible_walls",
            "reverse_controls",
            "double_dots",
            "super_pellets",
            "teleporting_ghosts",
            "fog_of_war",
            "moving_walls",
            "bonus_fruits",
            "ghost_allies",
            "maze_shuffle",
        ],
        GameType::SpaceInvaders => &[
            "multi_shot",
            "shield_boost",
            "rapid_fire",
            "enemy_missiles",
            "asteroid_field",
            "boss_battle",
            "bomb_drop",
            "alien_swarm",
            "bullet_time",
            "ship_upgrade",
            "invincibility",
            "bullet_reflection",
        ],
        GameType::Frogger => &[
            "double_speed",
            "time_bonus",
            "moving_logs",
            "water_current",
            "flying_birds",
            "bonus_insects",
            "shrinking_platforms",
            "slippery_logs",
            "predator_fish",
            "fog_effect",
            "falling_objects",
            "changing_tides",
        ],
    }
}

/// Tuning knobs for one play session. Immutable once generated; engines own
/// their mutable state separately and treat `layout_seed` as the initial
/// state of their layout generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameParameters {
    pub difficulty: Difficulty,
    pub speed_multiplier: f64,
    pub enemy_count: u32,
    pub special_features: Vec<String>,
    pub layout_seed: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    pub lives_count: u32,
    pub bonus_frequency: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_colors: Option<Palette>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme_id: Option<u8>,
}

impl GameParameters {
    pub fn has_feature(&self, tag: &str) -> bool {
        self.special_features.iter().any(|f| f == tag)
    }
}

/// One concrete parameterization of a game type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameVariation {
    pub id: u32,
    pub game_type: GameType,
    pub name: String,
    pub description: String,
    pub parameters: GameParameters,
    pub date_created: String,
}

/// Derive parameters for `game_type`. `None` means "surprise me": a fresh
/// random seed is minted and the result is not reproducible by design.
pub fn generate_random_parameters(game_type: GameType, seed: Option<u64>) -> GameParameters {
    let seed = seed.unwrap_or_else(random_seed);
    let mut stream = seeded_stream(seed);
    derive_parameters(game_type, seed, &mut stream)
}

fn derive_parameters(game_type: GameType, seed: u64, stream: &mut Pcg32) -> GameParameters {
    let difficulty = Difficulty::ALL[stream.random_range(0..Difficulty::ALL.len())];

    // Base-by-difficulty plus a little jitter; never zero.
    let enemy_count = (difficulty.base_enemy_count() + stream.random_range(0..3u32)).max(1);
    let speed_multiplier = difficulty.base_speed() + stream.random_range(-0.25..0.25);

    let mut pool: Vec<&str> = feature_pool(game_type).to_vec();
    pool.shuffle(stream);
    let take = difficulty.feature_count().min(pool.len());
    let special_features = pool[..take].iter().map(|s| s.to_string()).collect();

    let bonus_frequency = stream.random_range(0.1..0.4);
    let theme_id = stream.random_range(1..=5u8);
    let custom_colors = theme_palette(theme_id);

    let time_limit = match difficulty {
        Difficulty::Easy | Difficulty::Medium => None,
        Difficulty::Hard | Difficulty::Expert => Some(stream.random_range(60..120u32)),
    };

    GameParameters {
        difficulty,
        speed_multiplier,
        enemy_count,
        special_features,
        layout_seed: seed,
        time_limit,
        lives_count: difficulty.lives(),
        bonus_frequency,
        custom_colors: Some(custom_colors),
        theme_id: Some(theme_id),
    }
}

fn name_banks(game_type: GameType) -> (&'static [&'static str], &'static [&'static str]) {
    match game_type {
        GameType::Pacman => (
            &["Haunted", "Frenzied", "Labyrinthine", "Phantom", "Spectral", "Maze"],
            &["Chase", "Maze", "Frenzy", "Feast", "Hunt", "Escape"],
        ),
        GameType::SpaceInvaders => (
            &["Galactic", "Cosmic", "Orbital", "Stellar", "Asteroid", "Alien"],
            &["Attack", "Defense", "Invasion", "Warfare", "Assault", "Battle"],
        ),
        GameType::Frogger => (
            &["Rushing", "Raging", "Treacherous", "Flooded", "Traffic", "Highway"],
            &["Crossing", "Rush", "Hop", "River", "Journey", "Challenge"],
        ),
    }
}

fn base_descriptions(game_type: GameType) -> &'static [&'static str] {
    match game_type {
        GameType::Pacman => &[
            "Navigate through a maze while avoiding ghosts",
            "Eat all dots while evading colorful ghosts",
            "Collect power pellets to turn the tables on the ghosts",
        ],
        GameType::SpaceInvaders => &[
            "Defend Earth from waves of descending alien invaders",
            "Shoot down alien ships before they reach the bottom",
            "Protect your bases while eliminating the alien threat",
        ],
        GameType::Frogger => &[
            "Guide your frog safely across busy roads and hazardous rivers",
            "Hop through traffic and ride logs to reach safety",
            "Navigate through vehicles and water hazards to reach your home",
        ],
    }
}

fn feature_blurb(tag: &str) -> Option<&'static str> {
    Some(match tag {
        "ghost_frenzy" => "Ghosts move unpredictably and change directions frequently.",
        "maze_rotation" => "The maze periodically rotates, challenging your orientation.",
        "invisible_walls" => "Some walls appear and disappear, changing the maze layout.",
        "reverse_controls" => "Controls are occasionally reversed, testing your adaptation skills.",
        "multi_shot" => "Your ship can fire multiple shots simultaneously.",
        "shield_boost" => "Occasional shield power-ups provide temporary invulnerability.",
        "rapid_fire" => "Increased firing rate for your space cannon.",
        "enemy_missiles" => "Enemies fire tracking missiles that home in on your position.",
        "double_speed" => "Your frog moves twice as fast, but requires precise control.",
        "time_bonus" => "Collect clock icons for extra time.",
        "moving_logs" => "Logs shift positions and change direction unexpectedly.",
        "water_current" => "River currents push your frog in different directions.",
        _ => return None,
    })
}

/// Templated display name for a parameter set; picks come from `stream`.
pub fn variation_name(game_type: GameType, params: &GameParameters, stream: &mut Pcg32) -> String {
    let (prefixes, suffixes) = name_banks(game_type);
    let prefix = prefixes[stream.random_range(0..prefixes.len())];
    let suffix = suffixes[stream.random_range(0..suffixes.len())];
    let turbo = if params.speed_multiplier > 1.5 { "Turbo " } else { "" };
    format!(
        "{prefix} {suffix}: {} {turbo}Challenge",
        params.difficulty.label()
    )
}

/// Templated blurb: a base line, the difficulty note, and the lead
/// feature's description if it has one.
pub fn variation_description(
    game_type: GameType,
    params: &GameParameters,
    stream: &mut Pcg32,
) -> String {
    let bases = base_descriptions(game_type);
    let base = bases[stream.random_range(0..bases.len())];
    let special = match params.special_features.first() {
        Some(tag) => feature_blurb(tag)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Features {}.", params.special_features.join(", "))),
        None => String::new(),
    };
    format!(
        "{base}. {} {special} Speed: {:.1}x.",
        params.difficulty.blurb(),
        params.speed_multiplier
    )
}

/// Compose parameters plus flavor text into a full variation. Name and
/// description picks come from the same seeded stream as the parameters, so
/// a seeded variation is reproducible end to end.
pub fn generate_game_variation(
    id: u32,
    game_type: GameType,
    date: &str,
    seed: Option<u64>,
) -> GameVariation {
    let seed = seed.unwrap_or_else(random_seed);
    let mut stream = seeded_stream(seed);
    let parameters = derive_parameters(game_type, seed, &mut stream);
    let name = variation_name(game_type, &parameters, &mut stream);
    let description = variation_description(game_type, &parameters, &mut stream);
    GameVariation {
        id,
        game_type,
        name,
        description,
        parameters,
        date_created: date.to_string(),
    }
}

/// The challenge for a calendar date (`YYYY-MM-DD`). The date string itself
/// is the seed, so the rotation and tuning are stable for everyone.
pub fn generate_daily_game(date: &str) -> GameVariation {
    let seed: u64 = date.bytes().map(u64::from).sum();
    let game_type = GAME_TYPES[(seed % GAME_TYPES.len() as u64) as usize];
    let id = (seed % VARIATION_ID_SPAN) as u32;
    generate_game_variation(id, game_type, date, Some(seed))
}

/// Catalog/testing helper: `count` variations rotating through the game
/// types, one per day starting at `start_date`, seeded by index.
pub fn generate_multiple_variations(count: usize, start_date: &str) -> Vec<GameVariation> {
    (0..count)
        .map(|i| {
            let game_type = GAME_TYPES[i % GAME_TYPES.len()];
            let date = offset_date(start_date, i as i64);
            generate_game_variation(i as u32 + 1, game_type, &date, Some(i as u64))
        })
        .collect()
}

/// Shift a `YYYY-MM-DD` date by whole days. Unparseable input is returned
/// unchanged rather than failing the caller.
pub fn offset_date(date: &str, delta_days: i64) -> String {
    let Some((y, m, d)) = parse_date(date) else {
        return date.to_string();
    };
    let (y, m, d) = civil_from_days(days_from_civil(y, m, d) + delta_days);
    format!("{y:04}-{m:02}-{d:02}")
}

fn parse_date(date: &str) -> Option<(i64, u32, u32)> {
    let mut parts = date.split('-');
    let y = parts.next()?.parse().ok()?;
    let m: u32 = parts.next()?.parse().ok()?;
    let d: u32 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(1..=12).contains(&m) || !(1..=31).contains(&d) {
        return None;
    }
    Some((y, m, d))
}

// Days since 1970-01-01 for a proleptic Gregorian date (Hinnant's algorithm).
fn days_from_civil(y: i64, m: u32, d: u32) -> i64 {
    let y = y - i64::from(m <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let doy = i64::from((153 * (if m > 2 { m - 3 } else { m + 9 }) + 2) / 5 + d - 1);
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn civil_from_days(z: i64) -> (i64, u32, u32) {
    let z = z + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let y = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let d = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let m = if mp < 10 { mp + 3 } else { mp - 9 } as u32;
    (y + i64::from(m <= 2), m, d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parameters_deterministic_for_seed() {
        for game_type in GAME_TYPES {
            let a = generate_random_parameters(game_type, Some(987));
            let b = generate_random_parameters(game_type, Some(987));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_daily_game_is_pure_function_of_date() {
        let a = generate_daily_game("2024-01-01");
        let b = generate_daily_game("2024-01-01");
        assert_eq!(a.game_type, b.game_type);
        assert_eq!(a.id, b.id);
        assert_eq!(a.name, b.name);
        assert_eq!(a.description, b.description);
        assert_eq!(a.parameters, b.parameters);
    }

    #[test]
    fn test_daily_rotation_and_id_derivation() {
        let date = "2024-01-01";
        let seed: u64 = date.bytes().map(u64::from).sum();
        let daily = generate_daily_game(date);
        assert_eq!(daily.game_type, GAME_TYPES[(seed % 3) as usize]);
        assert_eq!(u64::from(daily.id), seed % VARIATION_ID_SPAN);
    }

    #[test]
    fn test_seeded_variation_reproducible() {
        let a = generate_game_variation(1, GameType::Pacman, "2024-01-01", Some(42));
        let b = generate_game_variation(1, GameType::Pacman, "2024-01-01", Some(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_lives_and_time_limit_follow_difficulty() {
        for seed in 0..200u64 {
            let p = generate_random_parameters(GameType::Frogger, Some(seed));
            match p.difficulty {
                Difficulty::Easy => assert_eq!(p.lives_count, 5),
                Difficulty::Medium => assert_eq!(p.lives_count, 4),
                Difficulty::Hard => assert_eq!(p.lives_count, 3),
                Difficulty::Expert => assert_eq!(p.lives_count, 2),
            }
            match p.difficulty {
                Difficulty::Easy | Difficulty::Medium => assert!(p.time_limit.is_none()),
                _ => {
                    let limit = p.time_limit.expect("hard/expert gets a time limit");
                    assert!((60..120).contains(&limit));
                }
            }
        }
    }

    #[test]
    fn test_feature_selection_scales_with_difficulty() {
        for seed in 0..200u64 {
            let p = generate_random_parameters(GameType::SpaceInvaders, Some(seed));
            assert_eq!(p.special_features.len(), p.difficulty.feature_count());
            for tag in &p.special_features {
                assert!(feature_pool(GameType::SpaceInvaders).contains(&tag.as_str()));
            }
            assert!(p.enemy_count >= 1);
            assert!((0.1..0.4).contains(&p.bonus_frequency));
        }
    }

    #[test]
    fn test_parameters_json_uses_camel_case_contract() {
        let p = generate_random_parameters(GameType::Pacman, Some(7));
        let json = serde_json::to_string(&p).expect("serialize");
        assert!(json.contains("\"speedMultiplier\""));
        assert!(json.contains("\"layoutSeed\""));
        assert!(json.contains("\"specialFeatures\""));
        let back: GameParameters = serde_json::from_str(&json).expect("parse");
        assert_eq!(p, back);
    }

    #[test]
    fn test_parameters_parse_with_optional_fields_absent() {
        let json = r#"{
            "difficulty": "medium",
            "speedMultiplier": 1.0,
            "enemyCount": 4,
            "specialFeatures": [],
            "layoutSeed": 12345,
            "livesCount": 3,
            "bonusFrequency": 0.2
        }"#;
        let p: GameParameters = serde_json::from_str(json).expect("parse");
        assert!(p.time_limit.is_none());
        assert!(p.custom_colors.is_none());
        assert!(p.theme_id.is_none());
    }

    #[test]
    fn test_multiple_variations_rotate_types_and_dates() {
        let variations = generate_multiple_variations(6, "2024-02-27");
        assert_eq!(variations.len(), 6);
        for (i, v) in variations.iter().enumerate() {
            assert_eq!(v.game_type, GAME_TYPES[i % 3]);
            assert_eq!(v.id, i as u32 + 1);
        }
        // Leap-year rollover.
        assert_eq!(variations[2].date_created, "2024-02-29");
        assert_eq!(variations[3].date_created, "2024-03-01");
    }

    #[test]
    fn test_offset_date_handles_year_boundaries() {
        assert_eq!(offset_date("2023-12-31", 1), "2024-01-01");
        assert_eq!(offset_date("2024-01-01", -1), "2023-12-31");
        assert_eq!(offset_date("2024-03-01", -1), "2024-02-29");
        assert_eq!(offset_date("not-a-date", 3), "not-a-date");
    }

    proptest! {
        #[test]
        fn prop_variation_deterministic(seed in 0u64..1_000_000) {
            for game_type in GAME_TYPES {
                let a = generate_game_variation(9, game_type, "2025-06-15", Some(seed));
                let b = generate_game_variation(9, game_type, "2025-06-15", Some(seed));
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn prop_offset_date_round_trips(days in -4000i64..4000) {
            let shifted = offset_date("2024-06-15", days);
            prop_assert_eq!(offset_date(&shifted, -days), "2024-06-15".to_string());
        }
    }
}
