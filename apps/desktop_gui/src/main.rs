mod backend_bridge;
mod controller;
mod ui;

use clap::Parser;
use client_core::{config::normalize_api_base, load_settings, ClientSettings};
use crossbeam_channel::bounded;

use backend_bridge::commands::BackendCommand;
use controller::events::UiEvent;
use ui::{StartupConfig, StudyGuiApp};

#[derive(Parser, Debug)]
struct Args {
    /// Base address of the study service.
    #[arg(long)]
    api_base: Option<String>,
    /// Model identifier preset in the model field.
    #[arg(long)]
    model: Option<String>,
}

fn main() -> eframe::Result<()> {
    let args = Args::parse();
    let (mut settings, settings_error) = match load_settings() {
        Ok(settings) => (settings, None),
        Err(err) => (ClientSettings::default(), Some(err)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(settings.log_filter.as_str())
        .init();
    if let Some(err) = settings_error {
        tracing::warn!("falling back to default client settings: {err}");
    }

    if let Some(api_base) = args.api_base {
        match normalize_api_base(&api_base) {
            Ok(api_base) => settings.api_base = api_base,
            Err(err) => tracing::warn!("ignoring --api-base: {err}"),
        }
    }
    if let Some(model) = args.model {
        settings.model = model;
    }

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    backend_bridge::runtime::launch(cmd_rx, ui_tx, settings.api_base.clone());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Med Study Assistant")
            .with_inner_size([1180.0, 760.0])
            .with_min_inner_size([820.0, 560.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Med Study Assistant",
        options,
        Box::new(move |_cc| {
            Ok(Box::new(StudyGuiApp::new(
                cmd_tx,
                ui_rx,
                StartupConfig {
                    api_base: settings.api_base,
                    model: settings.model,
                },
            )))
        }),
    )
}
