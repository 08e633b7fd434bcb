use anyhow::Context;
use voicemode_chat::logging;
use voicemode_chat::settings::{SettingsStore, default_settings_path};

fn load_dotenv() {
    // A missing .env is the normal case outside development
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("failed to load .env: {}", err);
        }
    }
}

fn open_settings() -> anyhow::Result<SettingsStore> {
    let path = default_settings_path();
    SettingsStore::open(&path)
        .with_context(|| format!("Failed to load settings from {}", path.display()))
}

#[cfg(feature = "desktop")]
fn main() -> anyhow::Result<()> {
    load_dotenv();
    logging::init();
    let store = open_settings()?;
    dioxus::LaunchBuilder::new()
        .with_context(store)
        .launch(voicemode_chat::ui::App);
    Ok(())
}

#[cfg(not(feature = "desktop"))]
fn main() -> anyhow::Result<()> {
    load_dotenv();
    logging::init();
    let store = open_settings()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;
    runtime.block_on(voicemode_chat::cli::run(store))
}
