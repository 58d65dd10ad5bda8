//! Display-ready projections of the summary and records.
//!
//! Nothing here computes new statistics; values come straight from
//! [`AggregateSummary`] or a [`VehicleRecord`] and are only reshaped or formatted.

use std::f64::consts::TAU;

use crate::data::aggregate::AggregateSummary;
use crate::data::model::VehicleRecord;

// ---------------------------------------------------------------------------
// Stat cards
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: String,
}

pub fn stat_cards(summary: &AggregateSummary) -> [StatCard; 4] {
    [
        StatCard {
            title: "Total Vehicles",
            value: summary.total.to_string(),
        },
        StatCard {
            title: "Unique Makes",
            value: summary.unique_make_count.to_string(),
        },
        StatCard {
            title: "Avg Electric Range",
            value: format_range(summary.average_range),
        },
        StatCard {
            title: "Avg Base MSRP",
            value: format_msrp(summary.average_msrp),
        },
    ]
}

pub fn format_range(miles: u64) -> String {
    format!("{miles} mi")
}

/// `"$<n>"`, or `"N/A"` when no record carried a price.
pub fn format_msrp(dollars: u64) -> String {
    if dollars == 0 {
        "N/A".to_string()
    } else {
        format!("${dollars}")
    }
}

/// Label/value lines for the "Quick Insights" box.
pub fn quick_insights(summary: &AggregateSummary) -> Vec<(&'static str, String)> {
    vec![
        ("Total records", summary.total.to_string()),
        ("Distinct states", summary.distinct_states.len().to_string()),
        ("Distinct EV types", summary.type_distribution.len().to_string()),
        ("Avg range (non-zero)", format_range(summary.average_range)),
    ]
}

// ---------------------------------------------------------------------------
// Chart series
// ---------------------------------------------------------------------------

/// `[year, count]` points for the adoption line chart.
pub fn year_series(summary: &AggregateSummary) -> Vec<[f64; 2]> {
    summary
        .counts_by_year
        .iter()
        .map(|y| [y.year as f64, y.count as f64])
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarDatum {
    pub label: String,
    pub value: f64,
}

/// One bar per top make, in ranking order.
pub fn make_bars(summary: &AggregateSummary) -> Vec<BarDatum> {
    summary
        .top_makes
        .iter()
        .map(|m| BarDatum {
            label: m.make.clone(),
            value: m.count as f64,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// `"<type> (<count>)"`
    pub label: String,
    pub count: usize,
    pub fraction: f64,
    /// Start angle in radians, clockwise from twelve o'clock.
    pub start: f64,
    pub sweep: f64,
}

/// EV-type pie slices covering the full circle.
pub fn type_slices(summary: &AggregateSummary) -> Vec<PieSlice> {
    let typed: usize = summary.type_distribution.iter().map(|t| t.count).sum();
    if typed == 0 {
        return Vec::new();
    }
    let mut start = 0.0;
    summary
        .type_distribution
        .iter()
        .map(|t| {
            let fraction = t.count as f64 / typed as f64;
            let slice = PieSlice {
                label: format!("{} ({})", t.ev_type, t.count),
                count: t.count,
                fraction,
                start,
                sweep: fraction * TAU,
            };
            start += slice.sweep;
            slice
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

pub const TABLE_COLUMNS: [&str; 7] = [
    "VIN",
    "Year",
    "Make",
    "Model",
    "City",
    "State",
    "Range (mi)",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub vin: String,
    pub year: String,
    pub make: String,
    pub model: String,
    pub city: String,
    pub state: String,
    pub range: String,
}

impl TableRow {
    /// Cells in [`TABLE_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.vin.as_str(),
            self.year.as_str(),
            self.make.as_str(),
            self.model.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.range.as_str(),
        ]
    }
}

pub fn table_row(record: &VehicleRecord) -> TableRow {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    TableRow {
        vin: text(&record.vin),
        year: record
            .model_year
            .map_or_else(|| "-".to_string(), |y| y.to_string()),
        make: text(&record.make),
        model: text(&record.model),
        city: text(&record.city),
        state: text(&record.state),
        range: if record.electric_range == 0 {
            "-".to_string()
        } else {
            record.electric_range.to_string()
        },
    }
}

pub fn rows_shown_label(count: usize) -> String {
    format!("{count} rows shown")
}

// ---------------------------------------------------------------------------
// Selector options
// ---------------------------------------------------------------------------

pub fn state_options(summary: &AggregateSummary) -> &[String] {
    &summary.distinct_states
}

/// The make selector only offers the top makes.
pub fn make_options(summary: &AggregateSummary) -> Vec<&str> {
    summary.top_makes.iter().map(|m| m.make.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::{summarize, TypeCount};
    use approx::assert_relative_eq;

    fn summary() -> AggregateSummary {
        let rec = |make: &str, state: &str, year: i32, range: u32| VehicleRecord {
            make: Some(make.into()),
            state: Some(state.into()),
            model_year: Some(year),
            electric_range: range,
            ..Default::default()
        };
        summarize(&[
            rec("TESLA", "WA", 2020, 200),
            rec("NISSAN", "CA", 2020, 0),
            rec("TESLA", "WA", 2021, 250),
        ])
    }

    #[test]
    fn cards_format_averages() {
        let cards = stat_cards(&summary());
        assert_eq!(cards[0].value, "3");
        assert_eq!(cards[1].value, "2");
        assert_eq!(cards[2].value, "225 mi");
        assert_eq!(cards[3].value, "N/A");
        assert_eq!(format_msrp(52_000), "$52000");
    }

    #[test]
    fn insights_count_distinct_values() {
        let lines = quick_insights(&summary());
        assert_eq!(lines[1], ("Distinct states", "2".to_string()));
        assert_eq!(lines[2], ("Distinct EV types", "0".to_string()));
        assert_eq!(lines[3].1, "225 mi");
    }

    #[test]
    fn series_follow_summary_order() {
        let s = summary();
        assert_eq!(year_series(&s), vec![[2020.0, 2.0], [2021.0, 1.0]]);
        let bars = make_bars(&s);
        assert_eq!(bars[0].label, "TESLA");
        assert_eq!(bars[1].value, 1.0);
        assert_eq!(make_options(&s), vec!["TESLA", "NISSAN"]);
        assert_eq!(state_options(&s), ["CA".to_string(), "WA".to_string()]);
    }

    #[test]
    fn slices_cover_full_circle() {
        let s = AggregateSummary {
            type_distribution: vec![
                TypeCount { ev_type: "BEV".into(), count: 3 },
                TypeCount { ev_type: "PHEV".into(), count: 1 },
            ],
            ..Default::default()
        };
        let slices = type_slices(&s);
        assert_eq!(slices[0].label, "BEV (3)");
        assert_relative_eq!(slices[0].fraction, 0.75);
        assert_relative_eq!(slices[1].start, slices[0].sweep);
        assert_relative_eq!(slices[1].start + slices[1].sweep, TAU);
        assert!(type_slices(&AggregateSummary::default()).is_empty());
    }

    #[test]
    fn table_rows_use_placeholders() {
        let row = table_row(&VehicleRecord {
            vin: Some("1N4AZ0CP5D".into()),
            make: Some("NISSAN".into()),
            ..Default::default()
        });
        assert_eq!(row.year, "-");
        assert_eq!(row.range, "-");
        assert_eq!(row.city, "");
        assert_eq!(row.cells()[0], "1N4AZ0CP5D");
        assert_eq!(rows_shown_label(2), "2 rows shown");
    }
}
