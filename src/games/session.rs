//! Session: phase machine, input snapshot and frame scheduling
//!
//! A [`Session`] owns exactly one engine, the drawing frame and the input
//! snapshot for one play session. The host calls [`Session::step`] once per
//! display frame; the session advances the engine one fixed simulation step
//! (`update` then `render`, strictly in that order) only while `Running`.
//! Pausing is therefore unconditional: a paused or finished session steps
//! nothing until resumed or reset, and there is no way to double-schedule.

use crate::consts::FRAMES_PER_SECOND;
use crate::render::Frame;

/// Lifecycle of one session.
///
/// `Ready -> Running <-> Paused -> GameOver`, with `reset` returning to
/// `Running` from anywhere. `GameOver` is terminal for the episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Paused,
    GameOver,
}

/// Logical input vocabulary shared by all engines. Hosts translate keyboard
/// or touch gestures into these before the frame is stepped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

/// Held-state snapshot, owned by the session. Engines sample it inside
/// `update`; nothing outside the session mutates it, so swapping engines
/// can never leak input across instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputState {
    held: [bool; 5],
}

impl InputState {
    pub fn press(&mut self, button: Button) {
        self.held[button as usize] = true;
    }

    pub fn release(&mut self, button: Button) {
        self.held[button as usize] = false;
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held[button as usize]
    }

    pub fn clear(&mut self) {
        self.held = [false; 5];
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Score(u32),
    GameOver,
}

/// Ordered signals an engine raises during a single `update`.
#[derive(Debug, Default)]
pub struct Outcome {
    signals: Vec<Signal>,
}

impl Outcome {
    /// Award points. Deltas are strictly additive; score can only grow
    /// within an episode.
    pub fn score(&mut self, points: u32) {
        self.signals.push(Signal::Score(points));
    }

    /// End the episode. The session delivers the game-over callback at most
    /// once no matter how often this is raised.
    pub fn game_over(&mut self) {
        self.signals.push(Signal::GameOver);
    }

    /// Sum of the score deltas raised so far.
    pub fn total_points(&self) -> u32 {
        self.signals
            .iter()
            .map(|s| match s {
                Signal::Score(points) => *points,
                Signal::GameOver => 0,
            })
            .sum()
    }

    /// Whether the episode end has been raised.
    pub fn ended(&self) -> bool {
        self.signals.contains(&Signal::GameOver)
    }

    fn drain(&mut self) -> impl Iterator<Item = Signal> + '_ {
        self.signals.drain(..)
    }
}

/// Behavior contract implemented by each game's state struct.
pub trait Engine {
    /// Advance entity state by one fixed frame from the sampled input.
    fn update(&mut self, input: &InputState, out: &mut Outcome);

    /// Write the current state into `frame`. Must not mutate game state.
    fn render(&self, frame: &mut Frame);

    /// Restore fresh entity state for a new episode.
    fn reset(&mut self);
}

type ScoreCallback = Box<dyn FnMut(u32)>;

/// One play session: a single engine plus the loop state around it.
pub struct Session {
    engine: Box<dyn Engine>,
    phase: Phase,
    score: u32,
    frame: Frame,
    input: InputState,
    outcome: Outcome,
    frame_count: u64,
    frame_budget: Option<u64>,
    on_score: Option<ScoreCallback>,
    on_game_over: Option<ScoreCallback>,
}

impl Session {
    /// Wrap an engine. `time_limit` (seconds) becomes a frame budget at the
    /// fixed simulation rate; `None` means untimed.
    pub fn new(engine: Box<dyn Engine>, width: f32, height: f32, time_limit: Option<u32>) -> Self {
        Self {
            engine,
            phase: Phase::Ready,
            score: 0,
            frame: Frame::new(width, height),
            input: InputState::default(),
            outcome: Outcome::default(),
            frame_count: 0,
            frame_budget: time_limit.map(|secs| u64::from(secs) * u64::from(FRAMES_PER_SECOND)),
            on_score: None,
            on_game_over: None,
        }
    }

    /// Register the synchronous score-changed callback (receives the total).
    pub fn on_score(&mut self, callback: impl FnMut(u32) + 'static) {
        self.on_score = Some(Box::new(callback));
    }

    /// Register the game-over callback (receives the final score).
    pub fn on_game_over(&mut self, callback: impl FnMut(u32) + 'static) {
        self.on_game_over = Some(Box::new(callback));
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Input snapshot for the host's adapter to write into.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn start(&mut self) {
        if matches!(self.phase, Phase::Ready | Phase::Paused) {
            self.phase = Phase::Running;
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
        }
    }

    /// Fresh episode: engine entities rebuilt, score back to zero (the score
    /// callback is notified), loop running again.
    pub fn reset(&mut self) {
        self.engine.reset();
        self.score = 0;
        self.frame_count = 0;
        if let Some(callback) = &mut self.on_score {
            callback(0);
        }
        self.phase = Phase::Running;
    }

    /// Advance one frame: `update`, apply the engine's signals, then
    /// `render`. A no-op unless the session is `Running`.
    pub fn step(&mut self) {
        if self.phase != Phase::Running {
            return;
        }

        let mut outcome = std::mem::take(&mut self.outcome);
        self.engine.update(&self.input, &mut outcome);
        for signal in outcome.drain() {
            match signal {
                Signal::Score(points) => {
                    self.score += points;
                    if let Some(callback) = &mut self.on_score {
                        callback(self.score);
                    }
                }
                Signal::GameOver => self.finish(),
            }
        }
        self.outcome = outcome;

        self.frame_count += 1;
        if self.phase == Phase::Running
            && self
                .frame_budget
                .is_some_and(|budget| self.frame_count >= budget)
        {
            log::info!("time limit reached after {} frames", self.frame_count);
            self.finish();
        }

        // The frame that ends the episode still renders its final state.
        self.frame.begin();
        self.engine.render(&mut self.frame);
    }

    fn finish(&mut self) {
        if self.phase == Phase::GameOver {
            return;
        }
        self.phase = Phase::GameOver;
        if let Some(callback) = &mut self.on_game_over {
            callback(self.score);
        }
    }

    /// Tear the session down: callbacks dropped, input cleared, loop stopped.
    /// Safe to call any number of times.
    pub fn cleanup(&mut self) {
        self.on_score = None;
        self.on_game_over = None;
        self.input.clear();
        self.phase = Phase::GameOver;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Minimal engine: scores one point per frame, ends on request.
    struct Counter {
        frames: u32,
        end_after: Option<u32>,
    }

    impl Engine for Counter {
        fn update(&mut self, _input: &InputState, out: &mut Outcome) {
            self.frames += 1;
            out.score(1);
            if self.end_after.is_some_and(|limit| self.frames >= limit) {
                out.game_over();
            }
        }

        fn render(&self, frame: &mut Frame) {
            frame.clear(crate::render::Color::BLACK);
        }

        fn reset(&mut self) {
            self.frames = 0;
        }
    }

    fn counter_session(end_after: Option<u32>) -> Session {
        Session::new(
            Box::new(Counter {
                frames: 0,
                end_after,
            }),
            600.0,
            480.0,
            None,
        )
    }

    #[test]
    fn test_step_only_runs_while_running() {
        let mut session = counter_session(None);
        session.step();
        assert_eq!(session.score(), 0, "ready session must not step");

        session.start();
        session.step();
        assert_eq!(session.score(), 1);

        session.pause();
        for _ in 0..10 {
            session.step();
        }
        assert_eq!(session.score(), 1, "paused session must not step");

        session.resume();
        session.step();
        assert_eq!(session.score(), 2);
    }

    #[test]
    fn test_score_callback_fires_per_delta_with_total() {
        let seen: Rc<RefCell<Vec<u32>>> = Rc::default();
        let sink = seen.clone();
        let mut session = counter_session(None);
        session.on_score(move |total| sink.borrow_mut().push(total));
        session.start();
        for _ in 0..3 {
            session.step();
        }
        assert_eq!(*seen.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn test_game_over_fires_exactly_once() {
        let fired: Rc<RefCell<Vec<u32>>> = Rc::default();
        let sink = fired.clone();
        let mut session = counter_session(Some(2));
        session.on_game_over(move |final_score| sink.borrow_mut().push(final_score));
        session.start();
        for _ in 0..6 {
            session.step();
        }
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(*fired.borrow(), vec![2], "one callback, final score 2");
    }

    #[test]
    fn test_reset_restarts_with_zero_score() {
        let seen: Rc<RefCell<Vec<u32>>> = Rc::default();
        let sink = seen.clone();
        let mut session = counter_session(Some(2));
        session.on_score(move |total| sink.borrow_mut().push(total));
        session.start();
        for _ in 0..3 {
            session.step();
        }
        assert_eq!(session.phase(), Phase::GameOver);

        session.reset();
        assert_eq!(session.phase(), Phase::Running);
        assert_eq!(session.score(), 0);
        assert!(seen.borrow().ends_with(&[0]), "reset notifies score 0");
        session.step();
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn test_time_limit_ends_episode() {
        let mut session = Session::new(
            Box::new(Counter {
                frames: 0,
                end_after: None,
            }),
            600.0,
            480.0,
            Some(1),
        );
        session.start();
        for _ in 0..u64::from(FRAMES_PER_SECOND) {
            session.step();
        }
        assert_eq!(session.phase(), Phase::GameOver);
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let mut session = counter_session(None);
        session.start();
        session.input_mut().press(Button::Left);
        session.cleanup();
        session.cleanup();
        assert_eq!(session.phase(), Phase::GameOver);
        assert!(!session.input.is_held(Button::Left));
        session.step();
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_update_precedes_render_each_step() {
        let mut session = counter_session(None);
        session.start();
        session.step();
        // Render ran after update: the frame holds the cleared op list.
        assert!(!session.frame().is_empty());
    }
}
