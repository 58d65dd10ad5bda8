use eframe::egui;

use ev_dashboard::config::DashboardConfig;
use ev_dashboard::state::AppState;

use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct EvDashboardApp {
    pub state: AppState,
}

impl EvDashboardApp {
    /// Create the app and kick off loading the configured dataset.
    pub fn new(ctx: &egui::Context, config: &DashboardConfig) -> Self {
        let mut state = AppState::default();
        let repaint = ctx.clone();
        state.begin_load(config.data_path.clone(), move || repaint.request_repaint());
        Self { state }
    }
}

impl eframe::App for EvDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_load();

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: cards, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.loading {
                ui.centered_and_justified(|ui| {
                    ui.heading("Loading dataset…");
                });
                return;
            }
            let (Some(dataset), Some(summary)) = (&self.state.dataset, &self.state.summary) else {
                ui.centered_and_justified(|ui| {
                    ui.heading("No dataset loaded  (File → Open…)");
                });
                return;
            };
            if dataset.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.heading("No data found in dataset.");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::stat_cards(ui, summary);
                    ui.add_space(8.0);
                    panels::quick_insights(ui, summary);
                    ui.add_space(8.0);
                    charts::dashboard_charts(ui, summary, &self.state.type_colors);
                    ui.add_space(8.0);
                    table::record_table(ui, dataset, &self.state.visible_indices);
                });
        });
    }
}
