use thiserror::Error;

/// Faults outside the game rules. Collisions are phase changes, never errors.
#[derive(Debug, Error)]
pub enum SnakeError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("terminal too small: need {needed:?} columns x rows, have {actual:?}")]
    TerminalTooSmall { needed: (u16, u16), actual: (u16, u16) },

    #[error("terminal command failed")]
    Terminal(#[from] crossterm::ErrorKind),

    #[error("terminal I/O failed")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
