use super::model::{EvDataset, VehicleRecord};

// ---------------------------------------------------------------------------
// Filter predicate: free-text search plus state / make selectors
// ---------------------------------------------------------------------------

/// Current table filter. Empty text and `None` selectors mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub search_text: String,
    pub state: Option<String>,
    pub make: Option<String>,
}

impl FilterState {
    /// Whether a record passes all three predicates.
    ///
    /// * `state` / `make` compare exactly (case-sensitive)
    /// * `search_text` is a case-insensitive substring of vin, city, make or model
    pub fn matches(&self, record: &VehicleRecord) -> bool {
        if let Some(state) = selector(&self.state) {
            if record.state.as_deref() != Some(state) {
                return false;
            }
        }
        if let Some(make) = selector(&self.make) {
            if record.make.as_deref() != Some(make) {
                return false;
            }
        }
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        [&record.vin, &record.city, &record.make, &record.model]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Whether any predicate constrains the result.
    pub fn is_active(&self) -> bool {
        !self.search_text.is_empty()
            || selector(&self.state).is_some()
            || selector(&self.make).is_some()
    }

    pub fn clear(&mut self) {
        *self = FilterState::default();
    }
}

/// An empty selection string is the same as "all".
fn selector(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Return indices of records that pass the filter, in dataset order.
pub fn filtered_indices(dataset: &EvDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filters.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Return the records that pass the filter, in their original order.
pub fn filter_records<'a>(
    records: &'a [VehicleRecord],
    filters: &FilterState,
) -> Vec<&'a VehicleRecord> {
    records.iter().filter(|rec| filters.matches(rec)).collect()
}
