//! Daily Arcade entry point
//!
//! Headless demo host: builds the daily (or an explicitly seeded)
//! variation, drives the engine with a scripted input pattern for a
//! bounded number of frames, then submits the score for a guest user and
//! prints the leaderboard.

use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use daily_arcade::config::HostConfig;
use daily_arcade::games::{self, Button, Phase};
use daily_arcade::store::Store;
use daily_arcade::variation::{GameType, GameVariation, generate_game_variation, offset_date};

struct Args {
    date: Option<String>,
    seed: Option<u64>,
    game: Option<GameType>,
    frames: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        date: None,
        seed: None,
        game: None,
        frames: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(flag) = iter.next() {
        let mut value = |name: &str| {
            iter.next()
                .ok_or_else(|| format!("{name} requires a value"))
        };
        match flag.as_str() {
            "--date" => args.date = Some(value("--date")?),
            "--seed" => {
                args.seed = Some(
                    value("--seed")?
                        .parse()
                        .map_err(|e| format!("bad --seed: {e}"))?,
                )
            }
            "--game" => args.game = Some(GameType::from_str(&value("--game")?)?),
            "--frames" => {
                args.frames = Some(
                    value("--frames")?
                        .parse()
                        .map_err(|e| format!("bad --frames: {e}"))?,
                )
            }
            "--help" | "-h" => {
                println!(
                    "usage: daily-arcade [--date YYYY-MM-DD] [--seed N] \
                     [--game pacman|space-invaders|frogger] [--frames N]"
                );
                std::process::exit(0);
            }
            other => return Err(format!("unknown flag: {other}")),
        }
    }
    Ok(args)
}

/// Today in UTC as `YYYY-MM-DD`.
fn today_utc() -> String {
    let days = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| (elapsed.as_secs() / 86_400) as i64)
        .unwrap_or_default();
    offset_date("1970-01-01", days)
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(2);
        }
    };

    let config = HostConfig::from_env();
    let date = args.date.unwrap_or_else(today_utc);

    let mut store = Store::new();
    store.seed_week(&date);

    // An explicit game (or seed) plays an ad-hoc variation outside the
    // daily schedule; otherwise the stored daily challenge.
    let (record, variation) = match args.game {
        Some(game_type) => {
            let variation = generate_game_variation(0, game_type, &date, args.seed);
            (None, variation)
        }
        None => {
            let daily = store.game_for_date(&date);
            let parameters = match store.parameters(daily.id) {
                Ok(parameters) => parameters,
                Err(err) => {
                    log::error!("{err}");
                    std::process::exit(1);
                }
            };
            let variation = GameVariation {
                id: daily.variation_id,
                game_type: daily.game_type,
                name: daily.name.clone(),
                description: daily.description.clone(),
                parameters,
                date_created: daily.date.clone(),
            };
            (Some(daily), variation)
        }
    };

    log::info!("{date}: {}", variation.name);
    log::info!("{}", variation.description);

    let mut session = games::create_session(
        variation.game_type,
        &variation.parameters,
        config.width,
        config.height,
    );
    session.on_score(|total| log::debug!("score: {total}"));
    session.on_game_over(|final_score| log::info!("game over, final score {final_score}"));
    session.start();

    // Scripted driver: sweep through the directions, firing all the while.
    let frames = args.frames.unwrap_or(config.max_frames);
    let pattern = [Button::Right, Button::Up, Button::Left, Button::Down];
    for frame in 0..frames {
        let held = pattern[(frame / 45 % 4) as usize];
        let input = session.input_mut();
        input.clear();
        input.press(held);
        input.press(Button::Fire);
        session.step();
        if session.phase() == Phase::GameOver {
            break;
        }
    }
    if session.phase() != Phase::GameOver {
        session.pause();
        log::info!("frame budget reached at score {}", session.score());
    }
    let final_score = session.score();
    session.cleanup();

    match record {
        Some(record) => {
            let user = store.create_guest_user();
            match store.submit_score(record.id, user.id, final_score, &date) {
                Ok(score) => {
                    println!(
                        "{} scored {} on \"{}\" ({})",
                        user.username, score.score, record.name, record.date
                    );
                    println!("-- top scores --");
                    for (rank, entry) in store.top_scores(record.id, None).iter().enumerate() {
                        let who = store
                            .user(entry.user_id)
                            .map(|u| u.username.clone())
                            .unwrap_or_else(|_| format!("user {}", entry.user_id));
                        println!("{:>2}. {:>6}  {}", rank + 1, entry.score, who);
                    }
                }
                Err(err) => {
                    log::error!("score submission failed: {err}");
                    std::process::exit(1);
                }
            }
        }
        None => println!(
            "ad-hoc {} variation \"{}\" finished with score {final_score}",
            variation.game_type, variation.name
        ),
    }
}
