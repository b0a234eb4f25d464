//! Fixed-shooter engine
//!
//! The formation sweeps horizontally as a block, reverses and drops when a
//! living enemy touches an edge, and speeds up with every cleared wave.
//! Clearing a wave schedules the next one on a frame countdown rather than
//! an external timer, so a reset during the delay simply cancels it.

use super::collision::Rect;
use super::session::{Button, Engine, InputState, Outcome};
use crate::render::{Color, Frame};
use crate::rng::LayoutRng;
use crate::variation::{Difficulty, GameParameters};

/// Frames between clearing a wave and the next formation spawning (~1 s).
pub const WAVE_DELAY_FRAMES: u32 = 60;
/// Frames of grace after losing a life.
pub const INVULNERABILITY_FRAMES: u32 = 60;

const ENEMY_WIDTH: f32 = 30.0;
const ENEMY_HEIGHT: f32 = 20.0;
const ENEMY_PADDING: f32 = 10.0;
const DROP_DISTANCE: f32 = 20.0;
const PLAYER_WIDTH: f32 = 30.0;
const PLAYER_HEIGHT: f32 = 20.0;
const BULLET_WIDTH: f32 = 4.0;
const BULLET_HEIGHT: f32 = 10.0;
const STAR_COUNT: usize = 50;

const DEFAULT_PLAYER_COLOR: Color = Color::rgb(0x8C, 0x3F, 0xFF);
const DEFAULT_ENEMY_COLOR: Color = Color::rgb(0xFF, 0x54, 0x54);
const PLAYER_BULLET_COLOR: Color = Color::rgb(0xFF, 0xD1, 0x66);

struct PlayerShip {
    rect: Rect,
    speed: f32,
    lives: u32,
    invulnerability: u32,
}

struct Bullet {
    rect: Rect,
    speed: f32,
}

struct Enemy {
    rect: Rect,
    alive: bool,
    points: u32,
}

pub struct InvadersGame {
    width: f32,
    height: f32,
    params: GameParameters,
    player: PlayerShip,
    bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    enemy_bullets: Vec<Bullet>,
    move_right: bool,
    move_speed: f32,
    base_move_speed: f32,
    shoot_cooldown: u32,
    enemy_shoot_cooldown: u32,
    level: u32,
    /// Countdown to the next wave; `None` while enemies are on screen.
    pending_wave: Option<u32>,
    stars: Vec<(f32, f32, f32)>,
    rng: LayoutRng,
}

/// Rows/cols for a formation of `total` enemies: roughly square below 50,
/// a fixed 6x12 block otherwise.
pub fn formation_grid(total: u32) -> (u32, u32) {
    if total < 50 {
        let rows = ((total as f64 / 2.0).sqrt().floor() as u32).max(1);
        let cols = total.div_ceil(rows).max(1);
        (rows, cols)
    } else {
        (6, 12)
    }
}

fn point_multiplier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::Easy => 1.0,
        Difficulty::Medium => 1.5,
        Difficulty::Hard => 2.0,
        Difficulty::Expert => 3.0,
    }
}

fn fire_cooldown(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 20,
        Difficulty::Medium => 15,
        Difficulty::Hard => 12,
        Difficulty::Expert => 10,
    }
}

fn volley_size(difficulty: Difficulty) -> usize {
    match difficulty {
        Difficulty::Hard => 2,
        Difficulty::Expert => 3,
        _ => 1,
    }
}

fn enemy_bullet_factor(difficulty: Difficulty) -> f32 {
    match difficulty {
        Difficulty::Easy => 0.8,
        Difficulty::Medium => 1.0,
        Difficulty::Hard => 1.3,
        Difficulty::Expert => 1.6,
    }
}

impl InvadersGame {
    pub fn new(params: &GameParameters, width: f32, height: f32) -> Self {
        let params = params.clone();
        let factor = params.difficulty.speed_factor() * params.speed_multiplier as f32;
        let base_move_speed = 1.0 * factor;

        let player = PlayerShip {
            rect: Rect::new(
                width / 2.0 - PLAYER_WIDTH / 2.0,
                height - PLAYER_HEIGHT - 10.0,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed: 5.0 * factor,
            lives: params.lives_count.max(1),
            invulnerability: 0,
        };

        let mut rng = LayoutRng::new(params.layout_seed);
        let stars = (0..STAR_COUNT)
            .map(|_| {
                (
                    rng.range(0.0, width as f64) as f32,
                    rng.range(0.0, height as f64) as f32,
                    rng.range(1.0, 3.0) as f32,
                )
            })
            .collect();

        let mut game = Self {
            width,
            height,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            enemy_bullets: Vec::new(),
            move_right: true,
            move_speed: base_move_speed,
            base_move_speed,
            shoot_cooldown: 0,
            enemy_shoot_cooldown: 0,
            level: 1,
            pending_wave: None,
            stars,
            rng,
            params,
        };
        game.spawn_formation();
        game
    }

    fn spawn_formation(&mut self) {
        self.enemies.clear();

        let difficulty = self.params.difficulty;
        let total = (self.params.enemy_count * 10).max(1);
        let (rows, cols) = formation_grid(total);
        let multiplier = point_multiplier(difficulty);

        for row in 0..rows {
            for col in 0..cols {
                // Expert formations are slightly ragged.
                let (dx, dy) = if difficulty == Difficulty::Expert {
                    (
                        (self.rng.next_f64() - 0.5) as f32 * 10.0,
                        (self.rng.next_f64() - 0.5) as f32 * 5.0,
                    )
                } else {
                    (0.0, 0.0)
                };
                let x = col as f32 * (ENEMY_WIDTH + ENEMY_PADDING) + ENEMY_PADDING + dx;
                let y = row as f32 * (ENEMY_HEIGHT + ENEMY_PADDING) + ENEMY_PADDING + 40.0 + dy;
                self.enemies.push(Enemy {
                    rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
                    alive: true,
                    points: ((rows - row) as f64 * 10.0 * multiplier) as u32,
                });
            }
        }

        // Stragglers outside the block on the harder settings.
        if matches!(difficulty, Difficulty::Hard | Difficulty::Expert) {
            let extras = (self.rng.next_f64() * 5.0) as u32 + 3;
            for _ in 0..extras {
                let x = self
                    .rng
                    .range(ENEMY_WIDTH as f64, (self.width - ENEMY_WIDTH) as f64)
                    as f32;
                let y = self
                    .rng
                    .range((ENEMY_HEIGHT * 2.0) as f64, (self.height / 3.0) as f64)
                    as f32;
                self.enemies.push(Enemy {
                    rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
                    alive: true,
                    points: (50.0 * multiplier) as u32,
                });
            }
        }
    }

    fn living(&self) -> usize {
        self.enemies.iter().filter(|e| e.alive).count()
    }

    fn shoot(&mut self) {
        let factor =
            self.params.difficulty.speed_factor() * self.params.speed_multiplier as f32;
        let speed = 7.0 * factor;

        // Two parallel barrels with the multi-shot feature, one otherwise.
        let offsets: &[f32] = if self.params.has_feature("multi_shot") {
            &[1.0 / 3.0, 2.0 / 3.0]
        } else {
            &[0.5]
        };
        for offset in offsets {
            self.bullets.push(Bullet {
                rect: Rect::new(
                    self.player.rect.x + self.player.rect.w * offset - BULLET_WIDTH / 2.0,
                    self.player.rect.y,
                    BULLET_WIDTH,
                    BULLET_HEIGHT,
                ),
                speed,
            });
        }

        self.shoot_cooldown = fire_cooldown(self.params.difficulty);
    }

    fn enemy_volley(&mut self) {
        let mut living: Vec<usize> = self
            .enemies
            .iter()
            .enumerate()
            .filter(|(_, e)| e.alive)
            .map(|(i, _)| i)
            .collect();
        if living.is_empty() {
            return;
        }

        let shooters = volley_size(self.params.difficulty).min(living.len());
        let speed = 3.0
            * enemy_bullet_factor(self.params.difficulty)
            * self.params.speed_multiplier as f32
            + self.level.min(3) as f32;

        for _ in 0..shooters {
            let pick = self.rng.index(living.len());
            let enemy = &self.enemies[living.swap_remove(pick)];
            self.enemy_bullets.push(Bullet {
                rect: Rect::new(
                    enemy.rect.x + enemy.rect.w / 2.0 - BULLET_WIDTH / 2.0,
                    enemy.rect.bottom(),
                    BULLET_WIDTH,
                    BULLET_HEIGHT,
                ),
                speed,
            });
            if living.is_empty() {
                break;
            }
        }
    }

    fn update_player_bullets(&mut self, out: &mut Outcome) {
        let mut i = 0;
        while i < self.bullets.len() {
            self.bullets[i].rect.y -= self.bullets[i].speed;
            if self.bullets[i].rect.bottom() < 0.0 {
                self.bullets.swap_remove(i);
                continue;
            }

            let mut hit = false;
            for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
                if self.bullets[i].rect.overlaps(&enemy.rect) {
                    enemy.alive = false;
                    out.score(enemy.points);
                    hit = true;
                    break;
                }
            }
            if hit {
                self.bullets.swap_remove(i);
                if self.living() == 0 && self.pending_wave.is_none() {
                    log::debug!("wave {} cleared, scheduling the next one", self.level);
                    self.pending_wave = Some(WAVE_DELAY_FRAMES);
                }
                continue;
            }
            i += 1;
        }
    }

    fn update_enemy_bullets(&mut self, out: &mut Outcome) {
        let mut i = 0;
        while i < self.enemy_bullets.len() {
            self.enemy_bullets[i].rect.y += self.enemy_bullets[i].speed;
            if self.enemy_bullets[i].rect.y > self.height {
                self.enemy_bullets.swap_remove(i);
                continue;
            }

            if self.player.invulnerability == 0
                && self.enemy_bullets[i].rect.overlaps(&self.player.rect)
            {
                self.enemy_bullets.swap_remove(i);
                self.player.lives = self.player.lives.saturating_sub(1);
                if self.player.lives == 0 {
                    out.game_over();
                    return;
                }
                self.player.invulnerability = INVULNERABILITY_FRAMES;
                continue;
            }
            i += 1;
        }
    }

    fn update_formation(&mut self, out: &mut Outcome) {
        let reached_edge = self.enemies.iter().filter(|e| e.alive).any(|e| {
            if self.move_right {
                e.rect.right() >= self.width
            } else {
                e.rect.x <= 0.0
            }
        });
        if reached_edge {
            self.move_right = !self.move_right;
        }

        let step = if self.move_right {
            self.move_speed
        } else {
            -self.move_speed
        };
        let player_line = self.player.rect.y;
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            if reached_edge {
                enemy.rect.y += DROP_DISTANCE;
            } else {
                enemy.rect.x += step;
            }
            if enemy.rect.bottom() >= player_line {
                out.game_over();
                return;
            }
        }
    }
}

impl Engine for InvadersGame {
    fn update(&mut self, input: &InputState, out: &mut Outcome) {
        if self.shoot_cooldown > 0 {
            self.shoot_cooldown -= 1;
        }
        if self.enemy_shoot_cooldown > 0 {
            self.enemy_shoot_cooldown -= 1;
        }
        if self.player.invulnerability > 0 {
            self.player.invulnerability -= 1;
        }

        // Deferred wave swap; everything else keeps simulating meanwhile.
        if let Some(remaining) = self.pending_wave {
            if remaining <= 1 {
                self.pending_wave = None;
                self.level += 1;
                self.move_speed += 0.2;
                self.spawn_formation();
                log::debug!("wave {} spawned", self.level);
            } else {
                self.pending_wave = Some(remaining - 1);
            }
        }

        if input.is_held(Button::Left) {
            self.player.rect.x -= self.player.speed;
        }
        if input.is_held(Button::Right) {
            self.player.rect.x += self.player.speed;
        }
        self.player.rect.x = self.player.rect.x.clamp(0.0, self.width - self.player.rect.w);

        if input.is_held(Button::Fire) && self.shoot_cooldown == 0 {
            self.shoot();
        }

        self.update_player_bullets(out);
        self.update_enemy_bullets(out);
        if out.ended() {
            return;
        }
        self.update_formation(out);
        if out.ended() {
            return;
        }

        if self.enemy_shoot_cooldown == 0 {
            self.enemy_volley();
            // Fewer survivors shoot more eagerly.
            let density = (self.living() as f64 / 10.0).clamp(0.5, 1.5);
            self.enemy_shoot_cooldown =
                (self.rng.next_f64() * 30.0) as u32 + (50.0 / density) as u32;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let background = self
            .params
            .custom_colors
            .as_ref()
            .map(|palette| Color::from_hex_or(&palette.background, Color::BLACK))
            .unwrap_or(Color::BLACK);
        frame.clear(background);

        for &(x, y, size) in &self.stars {
            frame.rect(x, y, size, size, Color::WHITE);
        }

        // Flicker while invulnerable.
        let visible = self.player.invulnerability == 0 || (self.player.invulnerability / 5) % 2 == 0;
        if visible {
            let player_color = self
                .params
                .custom_colors
                .as_ref()
                .map(|palette| Color::from_hex_or(&palette.player, DEFAULT_PLAYER_COLOR))
                .unwrap_or(DEFAULT_PLAYER_COLOR);
            let r = &self.player.rect;
            frame.rect(r.x, r.y, r.w, r.h, player_color);
            frame.rect(r.x + r.w / 2.0 - 2.0, r.y - 5.0, 4.0, 5.0, player_color);
        }

        for bullet in &self.bullets {
            let r = &bullet.rect;
            frame.rect(r.x, r.y, r.w, r.h, PLAYER_BULLET_COLOR);
        }
        for bullet in &self.enemy_bullets {
            let r = &bullet.rect;
            frame.rect(r.x, r.y, r.w, r.h, DEFAULT_ENEMY_COLOR);
        }

        let enemy_color = self
            .params
            .custom_colors
            .as_ref()
            .map(|palette| Color::from_hex_or(&palette.enemy, DEFAULT_ENEMY_COLOR))
            .unwrap_or(DEFAULT_ENEMY_COLOR);
        for enemy in self.enemies.iter().filter(|e| e.alive) {
            let r = &enemy.rect;
            frame.rect(r.x, r.y, r.w, r.h, enemy_color);
            frame.rect(r.x + 5.0, r.y + 5.0, 5.0, 5.0, Color::BLACK);
            frame.rect(r.x + r.w - 10.0, r.y + 5.0, 5.0, 5.0, Color::BLACK);
            frame.rect(r.x + r.w / 2.0 - 2.0, r.bottom() - 5.0, 4.0, 5.0, Color::BLACK);
        }

        frame.text(10.0, 20.0, format!("LEVEL: {}", self.level), Color::WHITE);
        frame.text(
            10.0,
            40.0,
            format!("LIVES: {}", self.player.lives),
            Color::WHITE,
        );
    }

    fn reset(&mut self) {
        self.player.rect.x = self.width / 2.0 - PLAYER_WIDTH / 2.0;
        self.player.lives = self.params.lives_count.max(1);
        self.player.invulnerability = 0;

        self.bullets.clear();
        self.enemy_bullets.clear();

        self.level = 1;
        self.move_speed = self.base_move_speed;
        self.move_right = true;
        self.shoot_cooldown = 0;
        self.enemy_shoot_cooldown = 0;
        self.pending_wave = None;
        self.spawn_formation();
    }
}
