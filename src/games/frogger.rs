//! Road-crossing engine
//!
//! The playfield is a stack of 40px lanes: home slots at the top, a grass
//! verge, four water lanes with drifting logs, four road lanes with
//! traffic, and the start zone at the bottom. Movement is discrete (one
//! lane per keypress, cooldown-gated); survival in the water band requires
//! standing on a log, which also carries the frog sideways.
//!
//! Lane layout comes from the same seeded generator as the other engines,
//! so the daily board is identical for every player.

use super::collision::Rect;
use super::session::{Button, Engine, InputState, Outcome};
use crate::render::{Color, Frame};
use crate::rng::LayoutRng;
use crate::variation::GameParameters;

pub const HOME_SCORE: u32 = 200;
pub const ALL_HOMES_BONUS: u32 = 1000;
/// Frames between accepted hops.
pub const MOVE_COOLDOWN_FRAMES: u32 = 10;

pub const LANE_HEIGHT: f32 = 40.0;
const FROG_SIZE: f32 = 30.0;
const ROAD_LANES: usize = 4;
const WATER_LANES: usize = 4;
const HOME_BASE_COUNT: usize = 5;
const HOME_BASE_WIDTH: f32 = 40.0;

const WATER_COLOR: Color = Color::rgb(0x00, 0x77, 0xBE);
const GRASS_COLOR: Color = Color::rgb(0x00, 0xA6, 0x51);
const ROAD_COLOR: Color = Color::rgb(0x33, 0x33, 0x33);
const LOG_COLOR: Color = Color::rgb(0x8B, 0x45, 0x13);
const FROG_COLOR: Color = Color::rgb(0x00, 0xCC, 0x66);
const FILLED_BASE_COLOR: Color = Color::rgb(0x8C, 0x3F, 0xFF);
const EMPTY_BASE_COLOR: Color = Color::rgb(0x00, 0xCC, 0x66);
const CAR_COLORS: [Color; 4] = [
    Color::rgb(0xFF, 0x54, 0x54),
    Color::rgb(0xFF, 0xD1, 0x66),
    Color::rgb(0x8C, 0x3F, 0xFF),
    Color::rgb(0x00, 0xFF, 0xFF),
];

struct Frog {
    rect: Rect,
    lives: u32,
}

struct Car {
    rect: Rect,
    speed: f32,
    color: Color,
}

struct Log {
    rect: Rect,
    speed: f32,
}

struct HomeBase {
    x: f32,
    width: f32,
    filled: bool,
}

pub struct FroggerGame {
    width: f32,
    height: f32,
    params: GameParameters,
    frog: Frog,
    cars: Vec<Car>,
    logs: Vec<Log>,
    bases: Vec<HomeBase>,
    /// Top of the water band.
    water_y: f32,
    /// Top of the road band (and bottom of the water band).
    road_y: f32,
    move_cooldown: u32,
    rng: LayoutRng,
}

impl FroggerGame {
    pub fn new(params: &GameParameters, width: f32, height: f32) -> Self {
        let params = params.clone();
        let mut game = Self {
            width,
            height,
            frog: Frog {
                rect: Rect::new(0.0, 0.0, FROG_SIZE, FROG_SIZE),
                lives: params.lives_count.max(1),
            },
            cars: Vec::new(),
            logs: Vec::new(),
            bases: Vec::new(),
            // The water band spans exactly the four log lanes, so every
            // water row a hop can land on has a log lane.
            water_y: LANE_HEIGHT * 3.0,
            road_y: LANE_HEIGHT * 7.0,
            move_cooldown: 0,
            rng: LayoutRng::new(params.layout_seed),
            params,
        };
        game.respawn_frog();
        game.generate_cars();
        game.generate_logs();
        game.generate_bases();
        game
    }

    fn start_position(&self) -> (f32, f32) {
        (
            self.width / 2.0 - FROG_SIZE / 2.0,
            self.height - LANE_HEIGHT + (LANE_HEIGHT - FROG_SIZE) / 2.0,
        )
    }

    fn respawn_frog(&mut self) {
        let (x, y) = self.start_position();
        self.frog.rect.x = x;
        self.frog.rect.y = y;
    }

    fn pace(&self) -> f32 {
        self.params.difficulty.speed_factor() * self.params.speed_multiplier as f32
    }

    fn generate_cars(&mut self) {
        self.cars.clear();
        let pace = self.pace();
        for lane in 0..ROAD_LANES {
            let lane_y = self.road_y + lane as f32 * LANE_HEIGHT;
            let direction = if lane % 2 == 0 { 1.0 } else { -1.0 };
            let count = 3 + (self.rng.next_f64() * 2.0) as usize;

            for i in 0..count {
                let car_width = self.rng.range(60.0, 90.0) as f32;
                let spacing = self.width / count as f32;
                let mut start_x =
                    i as f32 * spacing + self.rng.range(-0.25, 0.25) as f32 * spacing;
                if direction < 0.0 {
                    start_x = self.width - start_x - car_width;
                }
                self.cars.push(Car {
                    rect: Rect::new(
                        start_x,
                        lane_y + LANE_HEIGHT / 2.0 - 15.0,
                        car_width,
                        30.0,
                    ),
                    speed: self.rng.range(1.0, 2.5) as f32 * direction * pace,
                    color: CAR_COLORS[lane % CAR_COLORS.len()],
                });
            }
        }
    }

    fn generate_logs(&mut self) {
        self.logs.clear();
        let pace = self.pace();
        for lane in 0..WATER_LANES {
            let lane_y = self.water_y + lane as f32 * LANE_HEIGHT;
            let direction = if lane % 2 == 0 { 1.0 } else { -1.0 };
            let count = 2 + (self.rng.next_f64() * 2.0) as usize;

            for i in 0..count {
                let log_width = self.rng.range(80.0, 140.0) as f32;
                let spacing = self.width / count as f32;
                let mut start_x =
                    i as f32 * spacing + self.rng.range(-0.25, 0.25) as f32 * spacing;
                if direction < 0.0 {
                    start_x = self.width - start_x - log_width;
                }
                self.logs.push(Log {
                    rect: Rect::new(
                        start_x,
                        lane_y + LANE_HEIGHT / 2.0 - 15.0,
                        log_width,
                        30.0,
                    ),
                    speed: self.rng.range(0.5, 1.5) as f32 * direction * pace,
                });
            }
        }
    }

    fn generate_bases(&mut self) {
        self.bases.clear();
        let spacing = self.width / HOME_BASE_COUNT as f32;
        let offset = (spacing - HOME_BASE_WIDTH) / 2.0;
        for i in 0..HOME_BASE_COUNT {
            self.bases.push(HomeBase {
                x: i as f32 * spacing + offset,
                width: HOME_BASE_WIDTH,
                filled: false,
            });
        }
    }

    fn hop(&mut self, dx: f32, dy: f32) {
        self.frog.rect.x =
            (self.frog.rect.x + dx).clamp(0.0, self.width - self.frog.rect.w);
        self.frog.rect.y =
            (self.frog.rect.y + dy).clamp(0.0, self.height - self.frog.rect.h);
        self.move_cooldown = MOVE_COOLDOWN_FRAMES;
    }

    fn in_water_band(&self) -> bool {
        self.frog.rect.y >= self.water_y && self.frog.rect.y < self.road_y
    }

    fn lose_life(&mut self, out: &mut Outcome) {
        self.frog.lives = self.frog.lives.saturating_sub(1);
        if self.frog.lives == 0 {
            out.game_over();
        } else {
            self.respawn_frog();
        }
    }

    fn update_cars(&mut self, out: &mut Outcome) {
        for i in 0..self.cars.len() {
            let car = &mut self.cars[i];
            car.rect.x += car.speed;
            if car.speed > 0.0 && car.rect.x > self.width {
                car.rect.x = -car.rect.w;
            } else if car.speed < 0.0 && car.rect.right() < 0.0 {
                car.rect.x = self.width;
            }

            if self.cars[i].rect.overlaps(&self.frog.rect) {
                self.lose_life(out);
                return;
            }
        }
    }

    fn update_logs(&mut self) {
        for log in &mut self.logs {
            log.rect.x += log.speed;
            if log.speed > 0.0 && log.rect.x > self.width {
                log.rect.x = -log.rect.w;
            } else if log.speed < 0.0 && log.rect.right() < 0.0 {
                log.rect.x = self.width;
            }
        }
    }

    /// Water is lethal unless a log is underneath; riding one drags the
    /// frog along with it.
    fn check_water(&mut self, out: &mut Outcome) {
        if !self.in_water_band() {
            return;
        }
        let carried = self
            .logs
            .iter()
            .find(|log| log.rect.overlaps(&self.frog.rect))
            .map(|log| log.speed);
        match carried {
            Some(speed) => {
                self.frog.rect.x =
                    (self.frog.rect.x + speed).clamp(0.0, self.width - self.frog.rect.w);
            }
            None => self.lose_life(out),
        }
    }

    fn check_home(&mut self, out: &mut Outcome) {
        // Only the topmost row holds the base slots.
        if self.frog.rect.y >= LANE_HEIGHT {
            return;
        }
        let center = self.frog.rect.center().x;
        let Some(base) = self
            .bases
            .iter_mut()
            .find(|base| center >= base.x && center <= base.x + base.width)
        else {
            return;
        };

        if base.filled {
            // No room: that slot is taken.
            self.lose_life(out);
            return;
        }
        base.filled = true;
        out.score(HOME_SCORE);
        self.respawn_frog();
        if self.bases.iter().all(|b| b.filled) {
            out.score(ALL_HOMES_BONUS);
        }
    }
}

impl Engine for FroggerGame {
    fn update(&mut self, input: &InputState, out: &mut Outcome) {
        if self.move_cooldown > 0 {
            self.move_cooldown -= 1;
        }
        if self.move_cooldown == 0 {
            if input.is_held(Button::Up) {
                self.hop(0.0, -LANE_HEIGHT);
            } else if input.is_held(Button::Down) {
                self.hop(0.0, LANE_HEIGHT);
            } else if input.is_held(Button::Left) {
                self.hop(-FROG_SIZE, 0.0);
            } else if input.is_held(Button::Right) {
                self.hop(FROG_SIZE, 0.0);
            }
        }

        self.update_cars(out);
        if out.ended() {
            return;
        }
        self.update_logs();
        self.check_water(out);
        if out.ended() {
            return;
        }
        self.check_home(out);

        if self.bases.iter().all(|b| b.filled) {
            out.game_over();
        }
    }

    fn render(&self, frame: &mut Frame) {
        frame.clear(Color::BLACK);

        let road_height = ROAD_LANES as f32 * LANE_HEIGHT;
        frame.rect(0.0, self.water_y, self.width, self.road_y - self.water_y, WATER_COLOR);
        frame.rect(0.0, 0.0, self.width, self.water_y, GRASS_COLOR);
        frame.rect(
            0.0,
            self.road_y + road_height,
            self.width,
            self.height - (self.road_y + road_height),
            GRASS_COLOR,
        );
        frame.rect(0.0, self.road_y, self.width, road_height, ROAD_COLOR);
        for i in 1..ROAD_LANES {
            let y = self.road_y + i as f32 * LANE_HEIGHT;
            frame.line(0.0, y, self.width, y, Color::WHITE);
        }

        for base in &self.bases {
            let color = if base.filled {
                FILLED_BASE_COLOR
            } else {
                EMPTY_BASE_COLOR
            };
            frame.rect(base.x, 10.0, base.width, LANE_HEIGHT - 20.0, color);
        }

        for log in &self.logs {
            let r = &log.rect;
            frame.rect(r.x, r.y, r.w, r.h, LOG_COLOR);
        }

        for car in &self.cars {
            let r = &car.rect;
            frame.rect(r.x, r.y, r.w, r.h, car.color);
            // Windshield.
            frame.rect(
                r.x + r.w * 0.7,
                r.y + 5.0,
                r.w * 0.2,
                r.h - 10.0,
                Color::rgb(0x89, 0xCF, 0xF0),
            );
        }

        let center = self.frog.rect.center();
        frame.circle(center.x, center.y, FROG_SIZE / 2.0, FROG_COLOR);
        for side in [-0.2, 0.2] {
            let eye_x = center.x + side * FROG_SIZE;
            let eye_y = center.y - 0.2 * FROG_SIZE;
            frame.circle(eye_x, eye_y, FROG_SIZE * 0.15, Color::WHITE);
            frame.circle(eye_x, eye_y, FROG_SIZE * 0.05, Color::BLACK);
        }

        frame.text(
            10.0,
            self.height - 10.0,
            format!("LIVES: {}", self.frog.lives),
            FROG_COLOR,
        );
        let filled = self.bases.iter().filter(|b| b.filled).count();
        frame.text(
            self.width - 150.0,
            self.height - 10.0,
            format!("HOMES: {filled}/{}", self.bases.len()),
            Color::rgb(0xFF, 0xD1, 0x66),
        );
    }

    fn reset(&mut self) {
        self.respawn_frog();
        self.frog.lives = self.params.lives_count.max(1);
        for base in &mut self.bases {
            base.filled = false;
        }
        self.move_cooldown = 0;
    }
}
