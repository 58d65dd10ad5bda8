use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;

use super::model::VehicleRecord;

/// Number of makes kept in [`AggregateSummary::top_makes`].
pub const TOP_MAKES_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearCount {
    pub year: i32,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MakeCount {
    pub make: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeCount {
    pub ev_type: String,
    pub count: usize,
}

/// Statistics derived from the whole dataset. Recomputed, never patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateSummary {
    pub total: usize,
    /// Ascending by year; records without a model year are left out.
    pub counts_by_year: Vec<YearCount>,
    /// Descending by count, ties in first-seen order, at most [`TOP_MAKES_LIMIT`].
    pub top_makes: Vec<MakeCount>,
    /// First-seen order.
    pub type_distribution: Vec<TypeCount>,
    /// Rounded mean over non-zero ranges, 0 if there are none.
    pub average_range: u64,
    /// Rounded mean over non-zero prices, 0 if there are none.
    pub average_msrp: u64,
    pub unique_make_count: usize,
    /// Sorted, non-empty.
    pub distinct_states: Vec<String>,
}

/// Running (sum, count) over the positive values of one field.
#[derive(Debug, Default)]
struct PositiveMean {
    /// Wide enough that `u64` inputs cannot overflow it.
    sum: u128,
    count: u64,
}

impl PositiveMean {
    fn push(&mut self, value: u64) {
        if value > 0 {
            self.sum += value as u128;
            self.count += 1;
        }
    }

    /// Mean rounded half-up; 0 when nothing was pushed.
    fn rounded(&self) -> u64 {
        if self.count == 0 {
            return 0;
        }
        let count = self.count as u128;
        // The mean never exceeds the largest input, so it fits back into u64.
        ((self.sum + count / 2) / count) as u64
    }
}

/// Reduce the records to an [`AggregateSummary`] in one pass.
pub fn summarize(records: &[VehicleRecord]) -> AggregateSummary {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    let mut makes: IndexMap<&str, usize> = IndexMap::new();
    let mut types: IndexMap<&str, usize> = IndexMap::new();
    let mut range = PositiveMean::default();
    let mut msrp = PositiveMean::default();
    let mut states: BTreeSet<&str> = BTreeSet::new();

    for rec in records {
        if let Some(year) = rec.model_year.filter(|y| *y != 0) {
            *years.entry(year).or_default() += 1;
        }
        if let Some(make) = rec.make.as_deref().filter(|m| !m.is_empty()) {
            *makes.entry(make).or_default() += 1;
        }
        if let Some(ev_type) = rec.ev_type.as_deref().filter(|t| !t.is_empty()) {
            *types.entry(ev_type).or_default() += 1;
        }
        range.push(rec.electric_range as u64);
        msrp.push(rec.base_msrp);
        if let Some(state) = rec.state.as_deref().filter(|s| !s.is_empty()) {
            states.insert(state);
        }
    }

    let counts_by_year = years
        .into_iter()
        .map(|(year, count)| YearCount { year, count })
        .collect();

    let unique_make_count = makes.len();
    let mut top_makes: Vec<MakeCount> = makes
        .into_iter()
        .map(|(make, count)| MakeCount {
            make: make.to_string(),
            count,
        })
        .collect();
    // Stable: equal counts keep first-seen order.
    top_makes.sort_by(|a, b| b.count.cmp(&a.count));
    top_makes.truncate(TOP_MAKES_LIMIT);

    let type_distribution = types
        .into_iter()
        .map(|(ev_type, count)| TypeCount {
            ev_type: ev_type.to_string(),
            count,
        })
        .collect();

    AggregateSummary {
        total: records.len(),
        counts_by_year,
        top_makes,
        type_distribution,
        average_range: range.rounded(),
        average_msrp: msrp.rounded(),
        unique_make_count,
        distinct_states: states.into_iter().map(str::to_string).collect(),
    }
}
