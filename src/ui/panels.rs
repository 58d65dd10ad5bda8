use eframe::egui::{self, Color32, RichText, Ui};

use ev_dashboard::data::aggregate::AggregateSummary;
use ev_dashboard::present;
use ev_dashboard::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(summary) = &state.summary else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state below.
    let states: Vec<String> = present::state_options(summary).to_vec();
    let makes: Vec<String> = present::make_options(summary)
        .into_iter()
        .map(str::to_string)
        .collect();

    ui.strong("Search");
    let mut text = state.filters.search_text.clone();
    ui.add(
        egui::TextEdit::singleline(&mut text)
            .hint_text("Search VIN, make, model, city...")
            .desired_width(f32::INFINITY),
    );
    state.set_search_text(text);
    ui.add_space(6.0);

    ui.strong("State");
    let current = &state.filters.state;
    if let Some(choice) = selector(ui, "state_filter", "All states", current, &states) {
        state.set_state_filter(choice);
    }
    ui.add_space(6.0);

    ui.strong("Make");
    let current = &state.filters.make;
    if let Some(choice) = selector(ui, "make_filter", "All makes", current, &makes) {
        state.set_make_filter(choice);
    }
    ui.add_space(6.0);

    ui.add_enabled_ui(state.filters.is_active(), |ui: &mut Ui| {
        if ui.button("Clear filters").clicked() {
            state.clear_filters();
        }
    });

    ui.separator();
    ui.label(present::rows_shown_label(state.visible_indices.len()));
}

/// Combo box with an "all" entry. Returns the new selection when it changed.
fn selector(
    ui: &mut Ui,
    id: &str,
    all_label: &str,
    current: &Option<String>,
    options: &[String],
) -> Option<Option<String>> {
    let mut choice = None;
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or(all_label))
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            if ui.selectable_label(current.is_none(), all_label).clicked() {
                choice = Some(None);
            }
            for opt in options {
                if ui
                    .selectable_label(current.as_deref() == Some(opt.as_str()), opt)
                    .clicked()
                {
                    choice = Some(Some(opt.clone()));
                }
            }
        });
    choice
}

// ---------------------------------------------------------------------------
// Stat cards and insights
// ---------------------------------------------------------------------------

/// Row of headline numbers.
pub fn stat_cards(ui: &mut Ui, summary: &AggregateSummary) {
    let cards = present::stat_cards(summary);
    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, card) in cols.iter_mut().zip(cards.iter()) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(card.title).small().weak());
                ui.label(RichText::new(&card.value).size(24.0).strong());
            });
        }
    });
}

pub fn quick_insights(ui: &mut Ui, summary: &AggregateSummary) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.strong("Quick Insights");
        for (label, value) in present::quick_insights(summary) {
            ui.horizontal(|ui: &mut Ui| {
                ui.label(format!("{label}:"));
                ui.strong(value);
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(ui.ctx(), state);
                ui.close_menu();
            }
            let can_reload = state.source.is_some() && !state.loading;
            if ui.add_enabled(can_reload, egui::Button::new("Reload")).clicked() {
                if let Some(path) = state.source.clone() {
                    let repaint = ui.ctx().clone();
                    state.begin_load(path, move || repaint.request_repaint());
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
        } else if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} vehicles loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open registration data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        let repaint = ctx.clone();
        state.begin_load(path, move || repaint.request_repaint());
    }
}
