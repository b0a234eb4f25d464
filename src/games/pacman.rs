//! Maze-chase engine
//!
//! Dots, walls and ghost behavior are laid out by a [`LayoutRng`] seeded
//! from the variation's layout seed, so a given daily challenge plays on
//! the same board for everyone. Movement is continuous with wrap-around at
//! the playfield edges; ghosts keep a constant heading until a wall (or a
//! rare random impulse) forces a turn.

use glam::Vec2;
use std::f32::consts::PI;

use super::collision::{Rect, circles_overlap};
use super::session::{Button, Engine, InputState, Outcome};
use crate::render::{Color, Frame};
use crate::rng::LayoutRng;
use crate::variation::{Difficulty, GameParameters};

pub const DOT_SCORE: u32 = 10;
pub const PELLET_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;
/// Frames of ghost vulnerability after a power pellet.
pub const FRIGHTENED_FRAMES: u32 = 300;

const PLAYER_RADIUS: f32 = 12.0;
const GHOST_RADIUS: f32 = 10.0;
const DOT_RADIUS: f32 = 2.0;
const PELLET_RADIUS: f32 = 6.0;
const DOT_SPACING: f32 = 20.0;
const MIN_DOTS: usize = 20;
const MIN_WALLS: usize = 5;
/// Per-frame probability of a ghost changing heading on its own.
const GHOST_TURN_CHANCE: f64 = 0.01;

const WALL_COLOR: Color = Color::rgb(0x1A, 0x1A, 0x9F);
const FRIGHTENED_COLOR: Color = Color::rgb(0x00, 0x00, 0xFF);
const DEFAULT_PLAYER_COLOR: Color = Color::rgb(0xFF, 0xD1, 0x66);
const GHOST_COLORS: [&str; 5] = ["#FF5454", "#FFB8FF", "#00FFFF", "#FFB851", "#50FF50"];

struct Player {
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    mouth_open: f32,
    mouth_dir: f32,
}

struct Ghost {
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    color: Color,
}

struct Pickup {
    pos: Vec2,
    eaten: bool,
}

pub struct PacmanGame {
    width: f32,
    height: f32,
    params: GameParameters,
    player: Player,
    ghosts: Vec<Ghost>,
    dots: Vec<Pickup>,
    pellets: Vec<Pickup>,
    walls: Vec<Rect>,
    frightened: bool,
    frightened_timer: u32,
    rng: LayoutRng,
}

impl PacmanGame {
    pub fn new(params: &GameParameters, width: f32, height: f32) -> Self {
        let params = params.clone();
        let speed = 2.0 * params.difficulty.speed_factor() * params.speed_multiplier as f32;

        let player = Player {
            pos: Vec2::new(width / 4.0, height / 2.0),
            dir: Vec2::new(1.0, 0.0),
            speed,
            mouth_open: 0.2,
            mouth_dir: 1.0,
        };

        let enemy_color = params
            .custom_colors
            .as_ref()
            .map(|palette| palette.enemy.as_str());
        let ghost_count = params.enemy_count.clamp(1, 5) as usize;
        let ghosts = (0..ghost_count)
            .map(|i| {
                let fallback = Color::from_hex(GHOST_COLORS[i % GHOST_COLORS.len()])
                    .unwrap_or(Color::WHITE);
                Ghost {
                    pos: Vec2::new(
                        width * 0.75,
                        height * ((i + 1) as f32 / (ghost_count + 1) as f32),
                    ),
                    dir: Vec2::new(-1.0, 0.0),
                    speed: (1.0 + i as f32 * 0.1)
                        * params.difficulty.speed_factor()
                        * params.speed_multiplier as f32,
                    color: enemy_color
                        .map(|hex| Color::from_hex_or(hex, fallback))
                        .unwrap_or(fallback),
                }
            })
            .collect();

        // Pellets sit in the corners; dots fill the rest of the grid around
        // them.
        let pellets = vec![
            Pickup { pos: Vec2::new(40.0, 40.0), eaten: false },
            Pickup { pos: Vec2::new(width - 40.0, 40.0), eaten: false },
            Pickup { pos: Vec2::new(40.0, height - 40.0), eaten: false },
            Pickup { pos: Vec2::new(width - 40.0, height - 40.0), eaten: false },
        ];

        let mut game = Self {
            width,
            height,
            player,
            ghosts,
            dots: Vec::new(),
            pellets,
            walls: Vec::new(),
            frightened: false,
            frightened_timer: 0,
            rng: LayoutRng::new(params.layout_seed),
            params,
        };
        game.generate_dots();
        game.generate_walls();
        game
    }

    fn dot_density(&self) -> f64 {
        match self.params.difficulty {
            Difficulty::Easy => 0.7,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 0.5,
            Difficulty::Expert => 0.4,
        }
    }

    fn wall_density(&self) -> f64 {
        match self.params.difficulty {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.4,
            Difficulty::Hard => 0.5,
            Difficulty::Expert => 0.6,
        }
    }

    fn generate_dots(&mut self) {
        self.dots.clear();
        let density = self.dot_density();

        let mut y = DOT_SPACING;
        while y < self.height {
            let mut x = DOT_SPACING;
            while x < self.width {
                let clear_of_pellets = !self
                    .pellets
                    .iter()
                    .any(|p| (x - p.pos.x).abs() < 20.0 && (y - p.pos.y).abs() < 20.0);
                if clear_of_pellets && self.rng.next_f64() > 1.0 - density {
                    self.dots.push(Pickup {
                        pos: Vec2::new(x, y),
                        eaten: false,
                    });
                }
                x += DOT_SPACING;
            }
            y += DOT_SPACING;
        }

        // Sparse boards still need something to eat.
        while self.dots.len() < MIN_DOTS {
            let cols = ((self.width - 40.0) / DOT_SPACING) as f64;
            let rows = ((self.height - 40.0) / DOT_SPACING) as f64;
            let x = 20.0 + (self.rng.range(0.0, cols) as f32).floor() * DOT_SPACING;
            let y = 20.0 + (self.rng.range(0.0, rows) as f32).floor() * DOT_SPACING;
            self.dots.push(Pickup {
                pos: Vec2::new(x, y),
                eaten: false,
            });
        }
    }

    fn generate_walls(&mut self) {
        self.walls.clear();
        let density = self.wall_density();
        let safe_zone = Vec2::new(self.width / 4.0, self.height / 2.0);
        const SAFE_RADIUS: f32 = 60.0;

        let mut y = 60.0;
        while y < self.height {
            let mut x = 0.0;
            while x < self.width {
                let clear = Vec2::new(x, y).distance(safe_zone) > SAFE_RADIUS;
                if self.rng.chance(density) && clear {
                    let w = (self.width - x - 20.0).min(60.0);
                    if w > 10.0 {
                        self.walls.push(Rect::new(x, y, w, 10.0));
                    }
                }
                x += 80.0;
            }
            y += 60.0;
        }

        let mut x = 60.0;
        while x < self.width {
            let mut y = 0.0;
            while y < self.height {
                let clear = Vec2::new(x, y).distance(safe_zone) > SAFE_RADIUS;
                if self.rng.chance(density) && clear {
                    let h = (self.height - y - 20.0).min(60.0);
                    if h > 10.0 {
                        self.walls.push(Rect::new(x, y, 10.0, h));
                    }
                }
                y += 80.0;
            }
            x += 60.0;
        }

        while self.walls.len() < MIN_WALLS {
            let wall_x = if self.rng.chance(0.5) {
                self.width * 0.1
            } else {
                self.width * 0.8
            };
            let wall_y = self.height * (0.2 + self.walls.len() as f32 * 0.15);
            self.walls.push(Rect::new(wall_x, wall_y, 60.0, 10.0));
        }
    }

    fn wrap(&self, pos: &mut Vec2, radius: f32) {
        if pos.x < -radius {
            pos.x = self.width + radius;
        }
        if pos.x > self.width + radius {
            pos.x = -radius;
        }
        if pos.y < -radius {
            pos.y = self.height + radius;
        }
        if pos.y > self.height + radius {
            pos.y = -radius;
        }
    }

    fn player_color(&self) -> Color {
        self.params
            .custom_colors
            .as_ref()
            .map(|palette| Color::from_hex_or(&palette.player, DEFAULT_PLAYER_COLOR))
            .unwrap_or(DEFAULT_PLAYER_COLOR)
    }

    fn background_color(&self) -> Color {
        self.params
            .custom_colors
            .as_ref()
            .map(|palette| Color::from_hex_or(&palette.background, Color::BLACK))
            .unwrap_or(Color::BLACK)
    }
}

/// Lookahead wall probe used by ghost steering.
fn touching_wall(walls: &[Rect], ghost: &Ghost) -> bool {
    let probe = Rect::around_circle(ghost.pos + ghost.dir * 5.0, GHOST_RADIUS);
    walls.iter().any(|wall| probe.overlaps(wall))
}

/// Turn onto a perpendicular heading; never continue straight or reverse.
fn turn_ghost(rng: &mut LayoutRng, ghost: &mut Ghost) {
    let options: Vec<Vec2> = [
        Vec2::new(1.0, 0.0),
        Vec2::new(-1.0, 0.0),
        Vec2::new(0.0, 1.0),
        Vec2::new(0.0, -1.0),
    ]
    .into_iter()
    .filter(|d| *d != ghost.dir && *d != -ghost.dir)
    .collect();
    ghost.dir = options[rng.index(options.len())];
}

impl Engine for PacmanGame {
    fn update(&mut self, input: &InputState, out: &mut Outcome) {
        // Mouth animation.
        self.player.mouth_open += 0.05 * self.player.mouth_dir;
        if self.player.mouth_open > 0.8 || self.player.mouth_open < 0.05 {
            self.player.mouth_dir *= -1.0;
        }

        if input.is_held(Button::Up) {
            self.player.dir = Vec2::new(0.0, -1.0);
        } else if input.is_held(Button::Down) {
            self.player.dir = Vec2::new(0.0, 1.0);
        } else if input.is_held(Button::Left) {
            self.player.dir = Vec2::new(-1.0, 0.0);
        } else if input.is_held(Button::Right) {
            self.player.dir = Vec2::new(1.0, 0.0);
        }

        // Walls block, they do not kill.
        let next = self.player.pos + self.player.dir * self.player.speed;
        let body = Rect::around_circle(next, PLAYER_RADIUS);
        let blocked = self.walls.iter().any(|wall| body.overlaps(wall));
        if !blocked {
            self.player.pos = next;
        }
        let mut pos = self.player.pos;
        self.wrap(&mut pos, PLAYER_RADIUS);
        self.player.pos = pos;

        for dot in &mut self.dots {
            if !dot.eaten && circles_overlap(self.player.pos, PLAYER_RADIUS, dot.pos, 0.0) {
                dot.eaten = true;
                out.score(DOT_SCORE);
            }
        }

        for pellet in &mut self.pellets {
            if !pellet.eaten && circles_overlap(self.player.pos, PLAYER_RADIUS, pellet.pos, 0.0) {
                pellet.eaten = true;
                out.score(PELLET_SCORE);
                self.frightened = true;
                self.frightened_timer = FRIGHTENED_FRAMES;
            }
        }

        if self.frightened {
            self.frightened_timer -= 1;
            if self.frightened_timer == 0 {
                self.frightened = false;
            }
        }

        let slow = if self.frightened { 0.5 } else { 1.0 };
        for i in 0..self.ghosts.len() {
            let step = {
                let ghost = &self.ghosts[i];
                ghost.dir * ghost.speed * slow
            };
            self.ghosts[i].pos += step;

            if self.rng.chance(GHOST_TURN_CHANCE) || touching_wall(&self.walls, &self.ghosts[i]) {
                turn_ghost(&mut self.rng, &mut self.ghosts[i]);
            }

            let mut pos = self.ghosts[i].pos;
            self.wrap(&mut pos, GHOST_RADIUS);
            self.ghosts[i].pos = pos;

            if circles_overlap(self.ghosts[i].pos, GHOST_RADIUS, self.player.pos, PLAYER_RADIUS) {
                if self.frightened {
                    // Eaten: respawn somewhere else on the board.
                    let x = self.width * self.rng.next_f64() as f32;
                    let y = self.height * self.rng.next_f64() as f32;
                    self.ghosts[i].pos = Vec2::new(x, y);
                    out.score(GHOST_SCORE);
                } else {
                    out.game_over();
                    return;
                }
            }
        }

        let all_eaten =
            self.dots.iter().all(|d| d.eaten) && self.pellets.iter().all(|p| p.eaten);
        if all_eaten {
            out.game_over();
        }
    }

    fn render(&self, frame: &mut Frame) {
        frame.clear(self.background_color());

        for wall in &self.walls {
            frame.rect(wall.x, wall.y, wall.w, wall.h, WALL_COLOR);
        }

        let item_color = self
            .params
            .custom_colors
            .as_ref()
            .map(|palette| Color::from_hex_or(&palette.item, Color::WHITE))
            .unwrap_or(Color::WHITE);
        for dot in self.dots.iter().filter(|d| !d.eaten) {
            frame.circle(dot.pos.x, dot.pos.y, DOT_RADIUS, item_color);
        }
        for pellet in self.pellets.iter().filter(|p| !p.eaten) {
            frame.circle(pellet.pos.x, pellet.pos.y, PELLET_RADIUS, item_color);
        }

        // Body with a mouth wedge opening toward the travel direction.
        let heading = self.player.dir.y.atan2(self.player.dir.x);
        let mouth = self.player.mouth_open * PI;
        frame.wedge(
            self.player.pos.x,
            self.player.pos.y,
            PLAYER_RADIUS,
            heading + mouth,
            heading - mouth + 2.0 * PI,
            self.player_color(),
        );

        for ghost in &self.ghosts {
            let body = if self.frightened {
                FRIGHTENED_COLOR
            } else {
                ghost.color
            };
            frame.circle(ghost.pos.x, ghost.pos.y - 2.0, GHOST_RADIUS, body);
            frame.rect(
                ghost.pos.x - GHOST_RADIUS,
                ghost.pos.y - 2.0,
                GHOST_RADIUS * 2.0,
                GHOST_RADIUS,
                body,
            );
            // Eyes track the heading.
            for side in [-4.0, 4.0] {
                frame.circle(ghost.pos.x + side, ghost.pos.y - 5.0, 3.0, Color::WHITE);
                frame.circle(
                    ghost.pos.x + side + ghost.dir.x,
                    ghost.pos.y - 5.0 + ghost.dir.y,
                    1.5,
                    Color::BLACK,
                );
            }
        }
    }

    fn reset(&mut self) {
        self.player.pos = Vec2::new(self.width / 4.0, self.height / 2.0);
        self.player.dir = Vec2::new(1.0, 0.0);

        let ghost_count = self.ghosts.len();
        for (i, ghost) in self.ghosts.iter_mut().enumerate() {
            ghost.pos = Vec2::new(
                self.width * 0.75,
                self.height * ((i + 1) as f32 / (ghost_count + 1) as f32),
            );
            ghost.dir = Vec2::new(-1.0, 0.0);
        }

        for dot in &mut self.dots {
            dot.eaten = false;
        }
        for pellet in &mut self.pellets {
            pellet.eaten = false;
        }

        self.frightened = false;
        self.frightened_timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use crate::variation::{GameType, generate_random_parameters};

    fn test_params(seed: u64) -> GameParameters {
        generate_random_parameters(GameType::Pacman, Some(seed))
    }

    fn new_game(seed: u64) -> PacmanGame {
        PacmanGame::new(&test_params(seed), PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT)
    }

    #[test]
    fn test_layout_is_reproducible_from_seed() {
        let a = new_game(4242);
        let b = new_game(4242);
        assert_eq!(a.dots.len(), b.dots.len());
        for (da, db) in a.dots.iter().zip(&b.dots) {
            assert_eq!(da.pos, db.pos);
        }
        assert_eq!(a.walls.len(), b.walls.len());
        for (wa, wb) in a.walls.iter().zip(&b.walls) {
            assert_eq!(wa, wb);
        }
    }

    #[test]
    fn test_layout_survives_json_round_trip() {
        let params = test_params(2024);
        let json = serde_json::to_string(&params).expect("serialize");
        let parsed: GameParameters = serde_json::from_str(&json).expect("parse");
        let a = PacmanGame::new(&params, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        let b = PacmanGame::new(&parsed, PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
        assert_eq!(a.dots.len(), b.dots.len());
        for (da, db) in a.dots.iter().zip(&b.dots) {
            assert_eq!(da.pos, db.pos);
        }
        for (wa, wb) in a.walls.iter().zip(&b.walls) {
            assert_eq!(wa, wb);
        }
    }

    #[test]
    fn test_minimum_board_content() {
        for seed in [0, 1, 17, 500_000] {
            let game = new_game(seed);
            assert!(game.dots.len() >= MIN_DOTS);
            assert!(game.walls.len() >= MIN_WALLS);
            assert_eq!(game.pellets.len(), 4);
            assert!(!game.ghosts.is_empty());
            assert!(game.ghosts.len() <= 5);
        }
    }

    #[test]
    fn test_dot_eaten_exactly_once() {
        let mut game = new_game(7);
        game.ghosts.clear();
        game.walls.clear();
        game.player.pos = game.dots[0].pos;
        game.player.speed = 0.0;

        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert!(game.dots[0].eaten);
        let first_points = out.total_points();
        assert!(first_points >= DOT_SCORE);

        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert_eq!(out.total_points(), 0, "an eaten dot never scores again");
        assert!(game.dots[0].eaten, "eaten flag does not revert");
    }

    #[test]
    fn test_reset_restores_eaten_flags() {
        let mut game = new_game(7);
        game.ghosts.clear();
        game.player.pos = game.dots[0].pos;
        game.player.speed = 0.0;
        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert!(game.dots[0].eaten);

        game.reset();
        assert!(game.dots.iter().all(|d| !d.eaten));
        assert!(game.pellets.iter().all(|p| !p.eaten));
        assert_eq!(game.player.pos, Vec2::new(PLAYFIELD_WIDTH / 4.0, PLAYFIELD_HEIGHT / 2.0));
    }

    #[test]
    fn test_frightened_mode_lasts_exactly_300_frames() {
        let mut game = new_game(99);
        game.ghosts.clear();
        game.walls.clear();
        game.player.pos = game.pellets[0].pos;
        game.player.speed = 0.0;

        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert!(game.frightened);
        assert_eq!(game.frightened_timer, FRIGHTENED_FRAMES - 1);

        // Move the player off the board so nothing else triggers.
        game.player.pos = Vec2::new(-500.0, -500.0);
        game.player.speed = 0.0;
        for _ in 0..FRIGHTENED_FRAMES - 2 {
            game.update(&InputState::default(), &mut Outcome::default());
            assert!(game.frightened);
        }
        game.update(&InputState::default(), &mut Outcome::default());
        assert!(!game.frightened, "cleared on the 300th frame");
    }

    #[test]
    fn test_ghost_contact_ends_episode() {
        let mut game = new_game(11);
        game.walls.clear();
        game.player.speed = 0.0;
        game.ghosts.truncate(1);
        game.ghosts[0].pos = game.player.pos;
        game.ghosts[0].speed = 0.0;

        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert!(out.ended());
    }

    #[test]
    fn test_frightened_ghost_is_eaten_for_points() {
        let mut game = new_game(11);
        game.walls.clear();
        game.dots.clear();
        game.player.speed = 0.0;
        game.frightened = true;
        game.frightened_timer = FRIGHTENED_FRAMES;
        game.ghosts.truncate(1);
        game.ghosts[0].pos = game.player.pos;
        game.ghosts[0].speed = 0.0;

        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert!(!out.ended());
        assert!(out.total_points() >= GHOST_SCORE);
        assert!(game.frightened, "eating a ghost does not end frightened mode");
    }

    #[test]
    fn test_clearing_the_board_wins() {
        let mut game = new_game(3);
        game.ghosts.clear();
        for dot in &mut game.dots {
            dot.eaten = true;
        }
        for pellet in &mut game.pellets {
            pellet.eaten = true;
        }
        game.player.pos = Vec2::new(-500.0, -500.0);
        game.player.speed = 0.0;

        let mut out = Outcome::default();
        game.update(&InputState::default(), &mut out);
        assert!(out.ended());
    }

    #[test]
    fn test_input_steers_player() {
        let mut game = new_game(21);
        game.walls.clear();
        game.ghosts.clear();
        let mut input = InputState::default();
        input.press(Button::Up);
        let before = game.player.pos;
        game.update(&input, &mut Outcome::default());
        assert_eq!(game.player.dir, Vec2::new(0.0, -1.0));
        assert!(game.player.pos.y < before.y);
    }
}
