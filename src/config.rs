use std::time::Duration;

use crate::error::{Result, SnakeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub grid_width: i32,
    pub grid_height: i32,
    pub initial_snake_length: usize,

    pub start_interval: Duration,
    pub min_interval: Duration,
    // foods per speed-up step
    pub speedup_every: u32,
    pub speedup_step: Duration,

    pub frame_interval: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 24,
            grid_height: 24,
            initial_snake_length: 3,
            start_interval: Duration::from_millis(140),
            min_interval: Duration::from_millis(70),
            speedup_every: 4,
            speedup_step: Duration::from_millis(8),
            frame_interval: Duration::from_nanos(1_000_000_000 / 120),
        }
    }
}

impl GameConfig {
    pub fn with_grid(width: i32, height: i32) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    pub fn grid_area(&self) -> usize {
        self.grid_width.max(0) as usize * self.grid_height.max(0) as usize
    }

    pub fn validate(&self) -> Result<()> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(SnakeError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.grid_width, self.grid_height
            )));
        }

        // The head sits on the centre column and the body trails to the left.
        let room = self.grid_width / 2 + 1;
        if self.initial_snake_length == 0 || self.initial_snake_length as i32 > room {
            return Err(SnakeError::InvalidConfig(format!(
                "initial snake length {} does not fit (1..={})",
                self.initial_snake_length, room
            )));
        }

        if self.speedup_every == 0 {
            return Err(SnakeError::InvalidConfig("speedup_every must be at least 1".into()));
        }

        if self.min_interval > self.start_interval {
            return Err(SnakeError::InvalidConfig(format!(
                "min interval {:?} exceeds start interval {:?}",
                self.min_interval, self.start_interval
            )));
        }

        if self.min_interval.is_zero() || self.frame_interval.is_zero() {
            return Err(SnakeError::InvalidConfig("intervals must be non-zero".into()));
        }

        Ok(())
    }
}
