//! Turn engine and play session.
//!
//! A [`Session`] serializes turn requests into at most one animating twist
//! plus a FIFO queue. The logical mutation of an animated twist happens
//! atomically when its animation completes; a non-animated twist is applied
//! as soon as it starts. Everything runs on the caller's thread: the renderer
//! drives animation by calling [`Session::advance`] once per frame.
//!
//! Moves are counted when a turn is accepted, so a queued turn counts
//! immediately even though it executes later. The move total reported with
//! a solve only counts turns that had been applied when the solve happened.

use std::collections::VecDeque;
use std::f32::consts::PI;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::Settings;
use crate::error::TurnError;
use crate::geometry::Turn;
use crate::{new_puzzle, PuzzleKind, PuzzleOps};

/// Function that maps animation progress from 0.0..=1.0 onto 0.0..=1.0.
pub type InterpolateFn = fn(f32) -> f32;

/// Eases in and out along half a cosine wave.
pub const COSINE: InterpolateFn = |x| (1.0 - (x * PI).cos()) / 2.0;

/// Default duration of one animated twist.
pub const DEFAULT_TWIST_DURATION: Duration = Duration::from_millis(250);

/// What happened to a turn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwistOutcome {
    /// The logical mutation has already been applied.
    Applied,
    /// The twist is now animating and will apply when it completes.
    Animating,
    /// Another twist is animating; this one waits in the queue.
    Queued,
}

/// Notifications for the surrounding UI, collected until drained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    MoveCountChanged(u32),
    /// `moves` counts the player turns applied up to the solve, excluding
    /// any still queued.
    Solved { moves: u32, elapsed: Duration },
    Scrambled { turns: usize },
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingTwist {
    turn: Turn,
    animated: bool,
}

/// The twist currently animating.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ActiveTwist {
    turn: Turn,
    /// Linear progress, from 0.0 to 1.0.
    progress: f32,
}

/// Wall-clock solve timer.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Timer {
    started: Option<Instant>,
    stopped_at: Duration,
}

impl Timer {
    /// Starts timing from zero.
    pub fn start(&mut self) {
        self.started = Some(Instant::now());
        self.stopped_at = Duration::ZERO;
    }

    /// Freezes the elapsed time.
    pub fn stop(&mut self) {
        if let Some(started) = self.started.take() {
            self.stopped_at = started.elapsed();
        }
    }

    /// Stops and zeroes the timer.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.started.is_some()
    }

    pub fn elapsed(&self) -> Duration {
        match self.started {
            Some(started) => started.elapsed(),
            None => self.stopped_at,
        }
    }
}

/// A puzzle together with its turn queue and session state.
pub struct Session {
    puzzle: Box<dyn PuzzleOps>,

    /// Duration of one animated twist. Zero disables animation.
    twist_duration: Duration,
    /// Scramble length override.
    scramble_turns: Option<usize>,

    /// Twist being animated, if any.
    active: Option<ActiveTwist>,
    /// Twists accepted while another was animating.
    queue: VecDeque<PendingTwist>,

    /// Player moves since the last scramble or reset.
    moves: u32,
    /// Player moves applied to the puzzle; trails `moves` while turns wait.
    applied: u32,
    timer: Timer,
    /// Whether the player's last completed turn left the puzzle solved.
    solved: bool,
    events: Vec<SessionEvent>,

    rng: ChaCha8Rng,
}

impl Session {
    /// Creates a session around `puzzle` with default timing and a random
    /// seed.
    pub fn new(puzzle: Box<dyn PuzzleOps>) -> Self {
        Self {
            puzzle,

            twist_duration: DEFAULT_TWIST_DURATION,
            scramble_turns: None,

            active: None,
            queue: VecDeque::new(),

            moves: 0,
            applied: 0,
            timer: Timer::default(),
            solved: false,
            events: vec![],

            rng: ChaCha8Rng::seed_from_u64(rand::random()),
        }
    }

    /// Creates a session from loaded settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, TurnError> {
        let mut session = Self::new(new_puzzle(settings.kind, settings.size)?)
            .with_twist_duration(settings.twist_duration());
        session.scramble_turns = settings.scramble_moves;
        if let Some(seed) = settings.seed {
            session = session.with_seed(seed);
        }
        Ok(session)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_twist_duration(mut self, twist_duration: Duration) -> Self {
        self.twist_duration = twist_duration;
        self
    }

    pub fn puzzle(&self) -> &dyn PuzzleOps {
        self.puzzle.as_ref()
    }

    /// Whether the puzzle's current logical state is solved.
    pub fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    /// Whether the player reached the solved state since the last scramble
    /// or reset.
    pub fn has_been_solved(&self) -> bool {
        self.solved
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Number of twists waiting behind the active one.
    pub fn pending_turns(&self) -> usize {
        self.queue.len()
    }

    /// The animating twist and its eased progress, for renderers.
    pub fn twist_progress(&self) -> Option<(Turn, f32)> {
        self.active
            .map(|active| (active.turn, COSINE(active.progress.clamp(0.0, 1.0))))
    }

    /// Takes all notifications raised since the last call.
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Requests a player turn.
    ///
    /// Invalid turns are rejected without any change. Accepted turns count
    /// as one move each, whether they run now or wait in the queue.
    pub fn rotate(&mut self, turn: Turn, animated: bool) -> Result<TwistOutcome, TurnError> {
        self.puzzle.check_turn(turn)?;
        self.record_move();

        let twist = PendingTwist { turn, animated };
        if self.active.is_some() {
            self.queue.push_back(twist);
            debug!("queued {turn} ({} pending)", self.queue.len());
            return Ok(TwistOutcome::Queued);
        }
        self.begin(twist)
    }

    /// Steps the active animation forward by `delta`, completing it and
    /// starting queued twists as needed. Returns whether a twist is still
    /// animating.
    pub fn advance(&mut self, delta: Duration) -> Result<bool, TurnError> {
        let Some(active) = &mut self.active else {
            return Ok(false);
        };
        active.progress += delta.as_secs_f32() / self.twist_duration.as_secs_f32();
        if active.progress < 1.0 {
            return Ok(true);
        }

        let turn = active.turn;
        self.active = None;
        self.complete(turn)?;
        self.run_queue()?;
        Ok(self.active.is_some())
    }

    /// Completes the active twist and every queued twist immediately, in
    /// order.
    pub fn finish_pending(&mut self) -> Result<(), TurnError> {
        if let Some(active) = self.active.take() {
            self.complete(active.turn)?;
        }
        while let Some(twist) = self.queue.pop_front() {
            self.complete(twist.turn)?;
        }
        Ok(())
    }

    /// Applies `turns` random turns (or the configured default), then zeroes
    /// the move counter and timer. Scramble turns are never counted.
    ///
    /// Pending player turns are completed first.
    pub fn scramble(&mut self, turns: Option<usize>) -> Result<usize, TurnError> {
        self.finish_pending()?;
        let turns = turns
            .or(self.scramble_turns)
            .unwrap_or_else(|| self.puzzle.default_scramble_length());
        let sequence = self.puzzle.scramble(turns, &mut self.rng)?;
        debug!(
            "scramble: {}",
            sequence.iter().map(Turn::to_string).collect::<Vec<_>>().join(" ")
        );

        self.moves = 0;
        self.applied = 0;
        self.solved = false;
        self.timer.clear();
        self.events.push(SessionEvent::MoveCountChanged(0));
        self.events.push(SessionEvent::Scrambled {
            turns: sequence.len(),
        });
        info!("scrambled {} with {} turns", self.puzzle.kind(), sequence.len());
        Ok(sequence.len())
    }

    /// Rebuilds a solved puzzle of the same kind and size. Queued twists are
    /// discarded along with the old state.
    pub fn reset(&mut self) {
        self.puzzle.reset();
        self.clear_session();
        info!("reset {} of size {}", self.puzzle.kind(), self.puzzle.size());
    }

    /// Replaces the puzzle with a solved one of a different kind or size.
    /// An invalid size leaves the session untouched.
    pub fn rebuild(&mut self, kind: PuzzleKind, size: usize) -> Result<(), TurnError> {
        self.puzzle = new_puzzle(kind, size)?;
        self.clear_session();
        info!("rebuilt as {kind} of size {size}");
        Ok(())
    }

    fn clear_session(&mut self) {
        self.active = None;
        self.queue.clear();
        self.moves = 0;
        self.applied = 0;
        self.solved = false;
        self.timer.clear();
        self.events.push(SessionEvent::MoveCountChanged(0));
        self.events.push(SessionEvent::Reset);
    }

    fn record_move(&mut self) {
        self.moves += 1;
        if !self.timer.is_running() {
            self.timer.start();
        }
        self.events.push(SessionEvent::MoveCountChanged(self.moves));
    }

    fn begin(&mut self, twist: PendingTwist) -> Result<TwistOutcome, TurnError> {
        if twist.animated && !self.twist_duration.is_zero() {
            self.active = Some(ActiveTwist {
                turn: twist.turn,
                progress: 0.0,
            });
            Ok(TwistOutcome::Animating)
        } else {
            self.complete(twist.turn)?;
            Ok(TwistOutcome::Applied)
        }
    }

    /// Starts queued twists until one animates or the queue is empty.
    fn run_queue(&mut self) -> Result<(), TurnError> {
        while self.active.is_none() {
            let Some(twist) = self.queue.pop_front() else {
                break;
            };
            self.begin(twist)?;
        }
        Ok(())
    }

    /// Applies the logical mutation of a player turn and checks for a solve.
    ///
    /// A turn that leaves the puzzle unsolved keeps the timer running, so a
    /// queued turn executing after a solve starts a new attempt.
    fn complete(&mut self, turn: Turn) -> Result<(), TurnError> {
        self.puzzle.apply_turn(turn)?;
        self.applied += 1;
        debug!("applied {turn}");

        let solved = self.puzzle.is_solved();
        if solved && !self.solved {
            self.timer.stop();
            let elapsed = self.timer.elapsed();
            info!("solved in {} moves, {:.2}s", self.applied, elapsed.as_secs_f32());
            self.events.push(SessionEvent::Solved {
                moves: self.applied,
                elapsed,
            });
        } else if !solved && !self.timer.is_running() {
            self.timer.start();
        }
        self.solved = solved;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cube;

    const FRAME: Duration = Duration::from_millis(100);

    fn turn(s: &str) -> Turn {
        s.parse().unwrap()
    }

    fn cube_session(size: usize) -> Session {
        Session::new(Box::new(Cube::new(size))).with_seed(5)
    }

    fn cube_after(size: usize, turns: &[&str]) -> Cube {
        let mut cube = Cube::new(size);
        for t in turns {
            cube.apply_turn(turn(t)).unwrap();
        }
        cube
    }

    fn cubies_match(session: &Session, cube: &Cube) -> bool {
        session.puzzle().cubies() == cube.cubies()
    }

    #[test]
    fn test_fresh_session() {
        let session = cube_session(3);
        assert!(session.is_solved());
        assert_eq!(session.moves(), 0);
        assert!(!session.is_animating());
        assert!(!session.timer().is_running());
    }

    #[test]
    fn test_up_then_inverse_counts_two_moves_and_solves() {
        let mut session = cube_session(3);
        assert_eq!(session.rotate(turn("y2+"), false), Ok(TwistOutcome::Applied));
        assert!(!session.is_solved());
        assert!(session.timer().is_running());
        assert_eq!(session.rotate(turn("y2-"), false), Ok(TwistOutcome::Applied));

        assert_eq!(session.moves(), 2);
        assert!(session.is_solved());
        assert!(session.has_been_solved());
        assert!(!session.timer().is_running());
        assert!(cubies_match(&session, &Cube::new(3)));

        let events = session.drain_events();
        assert_eq!(events[0], SessionEvent::MoveCountChanged(1));
        assert_eq!(events[1], SessionEvent::MoveCountChanged(2));
        assert!(matches!(events[2], SessionEvent::Solved { moves: 2, .. }));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_turn_queued_past_a_solve_restarts_timer() {
        let mut session = cube_session(3);
        session.rotate(turn("y2+"), true).unwrap();
        session.rotate(turn("y2-"), true).unwrap();
        session.rotate(turn("x0+"), true).unwrap();
        session.finish_pending().unwrap();

        assert!(!session.is_solved());
        assert!(!session.has_been_solved());
        assert!(session.timer().is_running());
        assert_eq!(session.moves(), 3);

        // the solve happened after two applied turns
        let solves: Vec<_> = session
            .drain_events()
            .into_iter()
            .filter(|event| matches!(event, SessionEvent::Solved { .. }))
            .collect();
        assert_eq!(solves.len(), 1);
        assert!(matches!(solves[0], SessionEvent::Solved { moves: 2, .. }));
    }

    #[test]
    fn test_invalid_turn_is_rejected_without_side_effects() {
        let mut session = cube_session(3);
        assert_eq!(
            session.rotate(turn("x3+"), true),
            Err(TurnError::LayerOutOfRange { layer: 3, size: 3 })
        );
        assert_eq!(session.moves(), 0);
        assert!(!session.is_animating());
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_animated_turn_applies_when_animation_completes() {
        let mut session = cube_session(3).with_twist_duration(Duration::from_millis(200));
        assert_eq!(session.rotate(turn("x0+"), true), Ok(TwistOutcome::Animating));
        assert_eq!(session.moves(), 1);
        assert!(session.is_solved(), "Nothing moves until the animation ends");

        assert_eq!(session.advance(FRAME), Ok(true));
        let (active, eased) = session.twist_progress().unwrap();
        assert_eq!(active, turn("x0+"));
        assert!(eased > 0.0 && eased < 1.0);
        assert!(session.is_solved());

        assert_eq!(session.advance(FRAME), Ok(false));
        assert!(!session.is_animating());
        assert!(cubies_match(&session, &cube_after(3, &["x0+"])));
    }

    #[test]
    fn test_turns_queue_behind_animation_in_call_order() {
        let mut session = cube_session(3).with_twist_duration(Duration::from_millis(100));
        assert_eq!(session.rotate(turn("x0+"), true), Ok(TwistOutcome::Animating));
        assert_eq!(session.rotate(turn("y2-"), true), Ok(TwistOutcome::Queued));
        assert_eq!(session.rotate(turn("z1+"), false), Ok(TwistOutcome::Queued));
        assert_eq!(session.moves(), 3, "Queued turns count when accepted");
        assert_eq!(session.pending_turns(), 2);
        assert!(cubies_match(&session, &Cube::new(3)));

        // first twist completes, second starts animating
        assert_eq!(session.advance(FRAME), Ok(true));
        assert!(cubies_match(&session, &cube_after(3, &["x0+"])));
        assert_eq!(session.pending_turns(), 1);

        // second completes, third is non-animated and applies at once
        assert_eq!(session.advance(FRAME), Ok(false));
        assert!(cubies_match(&session, &cube_after(3, &["x0+", "y2-", "z1+"])));
        assert_eq!(session.pending_turns(), 0);
        assert_eq!(session.moves(), 3);
    }

    #[test]
    fn test_non_animated_turn_waits_for_active_animation() {
        let mut session = cube_session(2);
        session.rotate(turn("x1+"), true).unwrap();
        assert_eq!(session.rotate(turn("y1+"), false), Ok(TwistOutcome::Queued));
        assert!(cubies_match(&session, &Cube::new(2)));

        session.finish_pending().unwrap();
        assert!(cubies_match(&session, &cube_after(2, &["x1+", "y1+"])));
    }

    #[test]
    fn test_zero_duration_never_animates() {
        let mut session = cube_session(3).with_twist_duration(Duration::ZERO);
        assert_eq!(session.rotate(turn("z0-"), true), Ok(TwistOutcome::Applied));
        assert!(!session.is_animating());
    }

    #[test]
    fn test_scramble_resets_moves_and_solved_flag() {
        let mut session = cube_session(3);
        session.rotate(turn("y2+"), false).unwrap();
        session.rotate(turn("y2-"), false).unwrap();
        assert!(session.has_been_solved());
        session.drain_events();

        assert_eq!(session.scramble(None), Ok(20));
        assert_eq!(session.moves(), 0);
        assert!(!session.has_been_solved());
        assert!(!session.is_solved());
        assert!(!session.timer().is_running());
        assert_eq!(
            session.drain_events(),
            vec![
                SessionEvent::MoveCountChanged(0),
                SessionEvent::Scrambled { turns: 20 }
            ]
        );
    }

    #[test]
    fn test_scramble_length_defaults_scale_with_size() {
        let mut session = cube_session(7);
        assert_eq!(session.scramble(None), Ok(35));
        assert_eq!(session.scramble(Some(3)), Ok(3));
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_scramble_completes_pending_turns_first() {
        let mut session = cube_session(3);
        session.rotate(turn("x0+"), true).unwrap();
        session.rotate(turn("x0+"), true).unwrap();
        session.scramble(Some(0)).unwrap();
        assert!(!session.is_animating());
        assert_eq!(session.pending_turns(), 0);
        assert!(cubies_match(&session, &cube_after(3, &["x0+", "x0+"])));
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_seeded_scrambles_are_reproducible() {
        let mut a = cube_session(4);
        let mut b = cube_session(4);
        a.scramble(None).unwrap();
        b.scramble(None).unwrap();
        assert_eq!(a.puzzle().cubies(), b.puzzle().cubies());
    }

    #[test]
    fn test_reset_discards_queue_and_restores_solved_state() {
        let mut session = cube_session(3);
        session.scramble(None).unwrap();
        session.rotate(turn("x0+"), true).unwrap();
        session.rotate(turn("x1+"), true).unwrap();

        session.reset();
        assert!(session.is_solved());
        assert!(!session.is_animating());
        assert_eq!(session.pending_turns(), 0);
        assert_eq!(session.moves(), 0);
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.advance(FRAME), Ok(false));
        assert!(cubies_match(&session, &Cube::new(3)));
    }

    #[test]
    fn test_rebuild_changes_size() {
        let mut session = cube_session(3);
        session.rotate(turn("x2+"), false).unwrap();
        session.rebuild(PuzzleKind::Cube, 4).unwrap();
        assert_eq!(session.puzzle().size(), 4);
        assert_eq!(session.puzzle().cubies().len(), 56);
        assert!(session.is_solved());
        assert_eq!(session.rotate(turn("x3+"), false), Ok(TwistOutcome::Applied));
    }

    #[test]
    fn test_rebuild_rejects_zero_size() {
        let mut session = cube_session(3);
        session.rotate(turn("x2+"), false).unwrap();
        session.drain_events();

        assert_eq!(
            session.rebuild(PuzzleKind::Cube, 0),
            Err(TurnError::InvalidSize(0))
        );
        assert_eq!(session.puzzle().size(), 3);
        assert_eq!(session.moves(), 1);
        assert!(cubies_match(&session, &cube_after(3, &["x2+"])));
        assert!(session.drain_events().is_empty());
    }

    #[test]
    fn test_from_settings_rejects_zero_size() {
        let settings = Settings {
            size: 0,
            ..Settings::default()
        };
        assert!(matches!(
            Session::from_settings(&settings),
            Err(TurnError::InvalidSize(0))
        ));
    }

    #[test]
    fn test_static_puzzle_rejects_turns_and_scrambles() {
        let mut session = cube_session(3);
        session.rebuild(PuzzleKind::Megaminx, 3).unwrap();
        assert_eq!(
            session.rotate(turn("x0+"), false),
            Err(TurnError::Unsupported(PuzzleKind::Megaminx))
        );
        assert_eq!(
            session.scramble(None),
            Err(TurnError::Unsupported(PuzzleKind::Megaminx))
        );
        assert!(session.is_solved());
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            size: 2,
            seed: Some(11),
            scramble_moves: Some(7),
            twist_duration_ms: 0,
            ..Settings::default()
        };
        let mut session = Session::from_settings(&settings).unwrap();
        assert_eq!(session.puzzle().size(), 2);
        assert_eq!(session.scramble(None), Ok(7));
        assert_eq!(session.rotate(turn("y0+"), true), Ok(TwistOutcome::Applied));
    }

    #[test]
    fn test_cosine_easing_endpoints() {
        assert!(COSINE(0.0).abs() < 1e-6);
        assert!((COSINE(0.5) - 0.5).abs() < 1e-6);
        assert!((COSINE(1.0) - 1.0).abs() < 1e-6);
    }
}
