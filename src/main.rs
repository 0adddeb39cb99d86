use anyhow::Context;
use heightcomp::{
    init_logging, ComparisonSession, Config, Entity, JsonFileStorage, SessionOptions, Silhouette,
    ViewportSize,
};

const DEFAULT_WIDTH_PX: f64 = 400.0;
const DEFAULT_HEIGHT_PX: f64 = 800.0;

fn parse_dimension(arg: Option<String>, name: &str, default: f64) -> anyhow::Result<f64> {
    match arg {
        Some(value) => value
            .parse::<f64>()
            .with_context(|| format!("Invalid {name} '{value}'")),
        None => Ok(default),
    }
}

fn main() -> anyhow::Result<()> {
    init_logging()?;

    let mut args = std::env::args().skip(1);
    let width = parse_dimension(args.next(), "width_px", DEFAULT_WIDTH_PX)?;
    let height = parse_dimension(args.next(), "height_px", DEFAULT_HEIGHT_PX)?;

    let config_path = Config::default_path().context("Failed to locate config directory")?;
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let storage = JsonFileStorage::from_config(&config).context("Failed to locate entity file")?;
    tracing::info!("Using entity file {}", storage.path().display());

    let options = SessionOptions {
        viewport: ViewportSize::new(width, height),
        ..SessionOptions::from(&config)
    };
    let mut session = ComparisonSession::open(storage, options).context("Failed to load entities")?;

    if session.store().is_empty() {
        tracing::info!("No saved entities, adding two examples");
        session.add_entity(Entity::from_silhouette("Person A", Silhouette::Male, 180.0)?)?;
        session.add_entity(Entity::from_silhouette("Person B", Silhouette::Female, 160.0)?)?;
    }

    let json = serde_json::to_string_pretty(session.scene()).context("Failed to encode scene")?;
    println!("{json}");
    Ok(())
}
