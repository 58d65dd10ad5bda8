use std::f64::consts::FRAC_PI_2;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, Polygon};

use ev_dashboard::color::ColorMap;
use ev_dashboard::data::aggregate::AggregateSummary;
use ev_dashboard::present::{self, PieSlice};

const LINE_COLOR: Color32 = Color32::from_rgb(0x63, 0x66, 0xF1);
const BAR_COLOR: Color32 = Color32::from_rgb(0x10, 0xB9, 0x81);
const ARC_STEPS: usize = 16;

// ---------------------------------------------------------------------------
// Charts (central panel)
// ---------------------------------------------------------------------------

/// Adoption line chart on top, top makes and EV types side by side below.
pub fn dashboard_charts(ui: &mut Ui, summary: &AggregateSummary, type_colors: &ColorMap) {
    ui.strong("EV Adoption by Year");
    adoption_chart(ui, summary);
    ui.add_space(8.0);

    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Top Makes");
        top_makes_chart(&mut cols[0], summary);

        cols[1].strong("EV Type Distribution");
        type_pie_chart(&mut cols[1], summary, type_colors);
    });
}

fn adoption_chart(ui: &mut Ui, summary: &AggregateSummary) {
    let series = present::year_series(summary);

    Plot::new("adoption_by_year")
        .height(260.0)
        .x_axis_label("Model year")
        .y_axis_label("Vehicles")
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(series.clone()))
                    .name("Vehicles")
                    .color(LINE_COLOR)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(series))
                    .color(LINE_COLOR)
                    .radius(3.0),
            );
        });
}

fn top_makes_chart(ui: &mut Ui, summary: &AggregateSummary) {
    let data = present::make_bars(summary);
    let labels: Vec<String> = data.iter().map(|d| d.label.clone()).collect();

    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, d)| Bar::new(i as f64, d.value).name(&d.label).width(0.7))
        .collect();

    Plot::new("top_makes")
        .height(220.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
        });
}

fn type_pie_chart(ui: &mut Ui, summary: &AggregateSummary, type_colors: &ColorMap) {
    let slices = present::type_slices(summary);

    Plot::new("type_distribution")
        .height(220.0)
        .data_aspect(1.0)
        .show_axes([false, false])
        .show_grid(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for (slice, summary_type) in slices.iter().zip(&summary.type_distribution) {
                let color = type_colors.color_for(&summary_type.ev_type);
                // Same name for every piece so the legend shows one entry.
                for piece in wedges(slice) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(piece))
                            .name(&slice.label)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, color)),
                    );
                }
            }
        });
}

/// Outline of a pie slice of radius 1 around the origin, split into pieces
/// of at most a quarter turn so each polygon stays convex.
fn wedges(slice: &PieSlice) -> Vec<Vec<[f64; 2]>> {
    let pieces = (slice.sweep / FRAC_PI_2).ceil().max(1.0) as usize;
    let piece_sweep = slice.sweep / pieces as f64;
    (0..pieces)
        .map(|p| {
            let start = slice.start + piece_sweep * p as f64;
            let mut points = Vec::with_capacity(ARC_STEPS + 2);
            points.push([0.0, 0.0]);
            for i in 0..=ARC_STEPS {
                let angle = start + piece_sweep * i as f64 / ARC_STEPS as f64;
                points.push([angle.sin(), angle.cos()]);
            }
            points
        })
        .collect()
}
