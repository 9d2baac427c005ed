use std::time::Instant;

use rand::Rng;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::error::Result;
use crate::event::{EventSource, GameEvent, Key};
use crate::game::{GameState, Phase, TickOutcome};
use crate::render::Presenter;
use crate::timing::TickScheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Sole owner of the game state. Turns input and elapsed time into calls on
/// [`GameState`] and decides when the process should stop.
pub struct Controller<R> {
    config: GameConfig,
    rng: R,
    state: GameState,
    scheduler: TickScheduler,
}

impl<R: Rng> Controller<R> {
    pub fn new(config: GameConfig, mut rng: R, now: Instant) -> Result<Self> {
        config.validate()?;

        let state = GameState::new(&config, &mut rng);
        let scheduler = TickScheduler::new(state.tick_interval(), now);
        Ok(Controller { config, rng, state, scheduler })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    pub fn dispatch(&mut self, event: GameEvent, now: Instant) -> Flow {
        match event {
            GameEvent::Quit | GameEvent::KeyDown(Key::Escape) => {
                info!(score = self.state.score(), "quit");
                return Flow::Quit;
            }
            GameEvent::KeyDown(Key::Move(direction)) => {
                self.state.set_direction(direction);
            }
            GameEvent::KeyDown(Key::Pause) => {
                let was_paused = self.state.phase() == Phase::Paused;
                self.state.toggle_pause();

                if was_paused && self.state.phase() == Phase::Running {
                    self.scheduler.rearm(self.state.tick_interval(), now);
                }
            }
            GameEvent::KeyDown(Key::Restart) => {
                if self.state.phase() == Phase::GameOver {
                    self.state = GameState::new(&self.config, &mut self.rng);
                    self.scheduler.rearm(self.state.tick_interval(), now);
                }
            }
            GameEvent::TickDue => match self.state.tick(&mut self.rng) {
                TickOutcome::Ate { score } => {
                    let interval = self.state.tick_interval();
                    if interval != self.scheduler.interval() {
                        debug!(score, ?interval, "speed up");
                    }
                    self.scheduler.rearm(interval, now);
                }
                TickOutcome::Skipped | TickOutcome::Moved | TickOutcome::Ended(_) => {}
            },
        }

        Flow::Continue
    }

    /// Runs until a quit event. Frames are presented at most once per
    /// `frame_interval`; ticks fire on the scheduler's own cadence. Ticks
    /// that come due while paused are dropped by the state.
    pub fn run<T>(&mut self, term: &mut T) -> Result<()>
    where
        T: EventSource + Presenter,
    {
        let mut next_frame = Instant::now();

        loop {
            let now = Instant::now();

            if now >= next_frame {
                term.present(&self.state.snapshot())?;
                next_frame = now + self.config.frame_interval;
            }

            if self.scheduler.poll(now) {
                self.dispatch(GameEvent::TickDue, now);
                continue;
            }

            let timeout = self.scheduler.remaining(now).min(next_frame.saturating_duration_since(now));
            if let Some(event) = term.wait(timeout)? {
                if self.dispatch(event, Instant::now()) == Flow::Quit {
                    return Ok(());
                }
            }
        }
    }
}
