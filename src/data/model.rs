use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single raw cell as produced by a loader
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value after best-effort type coercion.
/// Loaders guess the type per cell, so a column may mix variants.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Whole floats print without a fraction so "98101.0" reads as "98101".
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{}", *v as i64)
            }
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Interpret the value as an `f64`, parsing strings as decimals.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(_) | CellValue::Null => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// One source row: header name → cell. Any column may be missing.
pub type RawRow = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// VehicleRecord – one normalized registration
// ---------------------------------------------------------------------------

/// Geographic point decoded from a `POINT (lon lat)` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// A single vehicle registration with a fixed, typed field set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VehicleRecord {
    /// First 10 characters of the VIN; not unique.
    pub vin: Option<String>,
    pub county: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub model_year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub ev_type: Option<String>,
    pub cafv_eligibility: Option<String>,
    /// Miles, 0 when unknown.
    pub electric_range: u32,
    /// Dollars, 0 when unknown.
    pub base_msrp: u64,
    pub legislative_district: Option<String>,
    pub dol_vehicle_id: Option<String>,
    /// Raw point text, kept alongside the decoded `point`.
    pub vehicle_location: Option<String>,
    pub electric_utility: Option<String>,
    pub census_tract: Option<String>,
    pub point: Option<GeoPoint>,
}

// ---------------------------------------------------------------------------
// EvDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The normalized dataset. Replaced as a whole on reload, never mutated.
#[derive(Debug, Clone, Default)]
pub struct EvDataset {
    pub records: Vec<VehicleRecord>,
}

impl EvDataset {
    pub fn from_records(records: Vec<VehicleRecord>) -> Self {
        EvDataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
