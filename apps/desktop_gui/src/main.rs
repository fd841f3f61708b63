mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::load_settings;
use crossbeam_channel::bounded;
use eframe::egui;
use tracing_subscriber::EnvFilter;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;
use crate::ui::{PersistedSettings, TwinTrainerApp, APP_TITLE, SETTINGS_STORAGE_KEY};

#[derive(Debug, Parser)]
#[command(name = "desktop_gui", about = "Social Twin Trainer desktop client")]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:8000. Overrides twin_client.toml and env.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    let api_url = load_settings().with_override(args.api_url).resolved_api_url()?;
    tracing::info!(%api_url, "starting desktop gui");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, api_url.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([1080.0, 820.0])
            .with_min_inner_size([760.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedSettings>(&text).ok())
            });
            Ok(Box::new(TwinTrainerApp::new(
                cmd_tx,
                ui_rx,
                api_url,
                persisted_settings,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("desktop gui failed: {err}"))
}
