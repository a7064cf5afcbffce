mod action;
mod app;
mod app_state;
mod component;
mod components;
mod focus;
mod theme;
mod widgets;

use ramen_core::{config::Config, platform, JokeFetcher, JsonFileStore, PreferencesStore, ViewController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let data_dir = platform::data_dir();
    std::fs::create_dir_all(&data_dir)?;

    let log_path = data_dir.join("ramen.log");
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    // Allow RUST_LOG override; default to debug for app code but suppress noisy
    // connection-level DEBUG from HTTP client internals (hyper_util, reqwest).
    let log_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string());
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_env_filter(log_filter.as_str())
        .with_ansi(false)
        .init();

    // Print log path to stderr so it can be tailed immediately.
    eprintln!("ramen log: {}", log_path.display());

    tracing::info!("ramen starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("config load failed, using defaults: {}", e);
        Config::default()
    });

    // ── Restore preferences ──────────────────────────────────────────────────
    let store: Box<dyn PreferencesStore> = Box::new(JsonFileStore::new(config.paths.prefs_file.clone()));
    tracing::info!("preferences: {}", config.paths.prefs_file.display());
    let controller = ViewController::start(store);

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let fetcher = JokeFetcher::new(config.joke.endpoint.clone());
    let app = app::App::new(app_state::AppState::new(controller), fetcher);
    app.run().await?;

    Ok(())
}
