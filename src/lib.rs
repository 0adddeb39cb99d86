//! # HeightComp
//!
//! Visual height comparison: entities of known real-world height are drawn
//! side by side on a shared ground line, against a dual-unit ruler, at one
//! proportional scale.
//!
//! ## Architecture
//!
//! HeightComp is organized as a workspace with multiple crates:
//!
//! 1. **heightcomp-core** - Entity model, units, events, entity store
//! 2. **heightcomp-layout** - Scale solver, horizontal fit, ruler, projection
//! 3. **heightcomp-interaction** - Mouse/touch drag state machine
//! 4. **heightcomp-settings** - Configuration and the entity file
//! 5. **heightcomp** - Host facade and a headless binary

pub mod session;

pub use heightcomp_interaction as interaction;
pub use heightcomp_layout as layout;
pub use heightcomp_settings as settings;

pub use heightcomp_core::{Entity, EntityEvent, EntityId, EntityStorage, Error, Result, Silhouette};
pub use heightcomp_layout::{Scene, ViewportSize, ZoomLevel};
pub use heightcomp_settings::{Config, JsonFileStorage};
pub use session::{ComparisonSession, SessionOptions};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for data
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.as_str()));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
