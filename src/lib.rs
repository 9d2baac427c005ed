//! Terminal snake: a single-threaded loop coupling key input, a fixed-step
//! game update whose cadence speeds up with the score, and frame rendering.

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod game;
pub mod render;
pub mod snake;
pub mod term;
pub mod timing;

pub use config::GameConfig;
pub use controller::{Controller, Flow};
pub use error::{Result, SnakeError};
pub use event::{EventSource, GameEvent, Key};
pub use game::{EndReason, GameState, Phase, TickOutcome};
pub use render::{Presenter, Snapshot};
pub use snake::{Cell, Direction, Snake};
