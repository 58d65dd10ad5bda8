mod app;
mod ui;

use anyhow::Context;
use app::EvDashboardApp;
use eframe::egui;
use ev_dashboard::config::DashboardConfig;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = DashboardConfig::load().context("loading dashboard configuration")?;
    log::info!("Dataset path: {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "EV Analytics Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(EvDashboardApp::new(&cc.egui_ctx, &config)))),
    )
    .map_err(|e| anyhow::anyhow!("running dashboard window: {e}"))
}
