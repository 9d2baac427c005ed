use std::fs::File;
use std::sync::Mutex;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use snake::term::TermManager;
use snake::{Controller, GameConfig};

const LOG_FILE: &str = "snake.log";

fn main() -> Result<()> {
    init_logging()?;

    let config = GameConfig::default();
    let mut controller = Controller::new(config.clone(), StdRng::from_entropy(), Instant::now())
        .context("Failed to start game")?;

    let mut term = TermManager::new(config).context("Failed to read terminal size")?;
    term.ensure_fits()?;
    term.setup().context("Failed to prepare terminal")?;

    // Early returns and panics restore the terminal when `term` drops.
    let result = controller.run(&mut term);
    term.restore().context("Failed to restore terminal")?;

    result.context("Game loop failed")
}

/// Diagnostics go to a file only when RUST_LOG is set; stderr would land on
/// top of the game screen.
fn init_logging() -> Result<()> {
    if std::env::var_os("RUST_LOG").is_none() {
        return Ok(());
    }

    let path = std::env::temp_dir().join(LOG_FILE);
    let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
        .with(EnvFilter::from_default_env())
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))
}
