use std::io;

use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,
}

#[derive(Clone, Copy, Debug)]
pub struct LogOptions {
    pub debug: bool,
    pub use_color: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            debug: false,
            use_color: true,
        }
    }
}

impl LogOptions {
    fn default_level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        }
    }
}

/// Installs the global stderr subscriber. `RUST_LOG` overrides the level chosen by `options`.
pub fn init(options: LogOptions) -> Result<(), LogError> {
    let filter = EnvFilter::builder()
        .with_default_directive(options.default_level().into())
        .from_env_lossy();

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(options.use_color)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init()
        .map_err(|_| LogError::AlreadyInitialized)
}
