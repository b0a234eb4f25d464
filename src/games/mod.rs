//! Game engines and the shared session contract
//!
//! Each engine is an independent state struct implementing [`Engine`];
//! a [`Session`] composes one engine with the frame scheduler, the phase
//! machine, the input snapshot and the score/game-over callbacks. Exactly
//! one session owns the drawing frame and input at a time; replacing the
//! game type means dropping the old session and building a new one.

pub mod collision;
pub mod frogger;
pub mod invaders;
pub mod pacman;
pub mod session;

pub use collision::Rect;
pub use session::{Button, Engine, InputState, Outcome, Phase, Session};

use crate::variation::{GameParameters, GameType};

/// Build the engine for a game type from its (immutable) parameters.
pub fn create_engine(
    game_type: GameType,
    parameters: &GameParameters,
    width: f32,
    height: f32,
) -> Box<dyn Engine> {
    match game_type {
        GameType::Pacman => Box::new(pacman::PacmanGame::new(parameters, width, height)),
        GameType::SpaceInvaders => Box::new(invaders::InvadersGame::new(parameters, width, height)),
        GameType::Frogger => Box::new(frogger::FroggerGame::new(parameters, width, height)),
    }
}

/// Engine plus session in one call, with the time limit wired through.
pub fn create_session(
    game_type: GameType,
    parameters: &GameParameters,
    width: f32,
    height: f32,
) -> Session {
    let engine = create_engine(game_type, parameters, width, height);
    Session::new(engine, width, height, parameters.time_limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use crate::variation::{GAME_TYPES, generate_random_parameters};

    #[test]
    fn test_every_game_type_builds_and_steps() {
        for game_type in GAME_TYPES {
            let params = generate_random_parameters(game_type, Some(123));
            let mut session =
                create_session(game_type, &params, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
            session.start();
            for _ in 0..30 {
                session.step();
            }
            assert!(
                !session.frame().is_empty(),
                "{game_type} rendered at least one frame"
            );
        }
    }

    #[test]
    fn test_session_respects_parameter_time_limit() {
        let mut params = generate_random_parameters(GameType::Pacman, Some(5));
        params.time_limit = Some(1);
        let mut session =
            create_session(GameType::Pacman, &params, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        session.start();
        for _ in 0..120 {
            session.step();
        }
        assert_eq!(session.phase(), Phase::GameOver);
    }
}
