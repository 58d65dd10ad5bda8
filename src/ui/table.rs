use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use ev_dashboard::data::model::EvDataset;
use ev_dashboard::present::{self, TABLE_COLUMNS};

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Filterable record table
// ---------------------------------------------------------------------------

/// Render the visible records. Only rows in view are projected, so large
/// datasets stay cheap to scroll.
pub fn record_table(ui: &mut Ui, dataset: &EvDataset, visible: &[usize]) {
    ui.strong("Dataset (filterable)");

    ui.push_id("record_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(420.0)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
            .column(Column::initial(110.0))
            .column(Column::initial(50.0))
            .columns(Column::initial(110.0).clip(true), 4)
            .column(Column::remainder())
            .header(22.0, |mut header| {
                for title in TABLE_COLUMNS {
                    header.col(|ui: &mut Ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, visible.len(), |mut row| {
                    let record = &dataset.records[visible[row.index()]];
                    let projected = present::table_row(record);
                    for cell in projected.cells() {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            });
    });

    ui.label(present::rows_shown_label(visible.len()));
}
