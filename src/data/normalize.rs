//! Raw row → [`VehicleRecord`] conversion.
//!
//! Every accessor here is total: a missing column, a wrongly typed cell or an
//! unparsable value resolves to the field's default instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;

use super::model::{CellValue, GeoPoint, RawRow, VehicleRecord};

// Source column names of the published registration dataset.
pub const COL_VIN: &str = "VIN (1-10)";
pub const COL_COUNTY: &str = "County";
pub const COL_CITY: &str = "City";
pub const COL_STATE: &str = "State";
pub const COL_POSTAL_CODE: &str = "Postal Code";
pub const COL_MODEL_YEAR: &str = "Model Year";
pub const COL_MAKE: &str = "Make";
pub const COL_MODEL: &str = "Model";
pub const COL_EV_TYPE: &str = "Electric Vehicle Type";
pub const COL_CAFV: &str = "Clean Alternative Fuel Vehicle (CAFV) Eligibility";
pub const COL_ELECTRIC_RANGE: &str = "Electric Range";
pub const COL_BASE_MSRP: &str = "Base MSRP";
pub const COL_LEGISLATIVE_DISTRICT: &str = "Legislative District";
pub const COL_DOL_VEHICLE_ID: &str = "DOL Vehicle ID";
pub const COL_VEHICLE_LOCATION: &str = "Vehicle Location";
pub const COL_ELECTRIC_UTILITY: &str = "Electric Utility";
pub const COL_CENSUS_TRACT: &str = "2020 Census Tract";

/// All columns the normalizer reads, in the published order.
pub const SOURCE_COLUMNS: [&str; 17] = [
    COL_VIN,
    COL_COUNTY,
    COL_CITY,
    COL_STATE,
    COL_POSTAL_CODE,
    COL_MODEL_YEAR,
    COL_MAKE,
    COL_MODEL,
    COL_EV_TYPE,
    COL_CAFV,
    COL_ELECTRIC_RANGE,
    COL_BASE_MSRP,
    COL_LEGISLATIVE_DISTRICT,
    COL_DOL_VEHICLE_ID,
    COL_VEHICLE_LOCATION,
    COL_ELECTRIC_UTILITY,
    COL_CENSUS_TRACT,
];

/// One signed decimal coordinate, optionally with an exponent.
const COORDINATE: &str = r"([-+]?(?:\d+\.?\d*|\.\d+)(?:e[-+]?\d+)?)";

static POINT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?i)^\s*POINT\s*\(\s*{COORDINATE}\s+{COORDINATE}\s*\)\s*$"
    ))
    .expect("point pattern is valid")
});

/// Normalize one raw row. Unknown columns are ignored.
pub fn normalize_row(row: &RawRow) -> VehicleRecord {
    let vehicle_location = text_field(row, COL_VEHICLE_LOCATION);
    let point = vehicle_location.as_deref().and_then(parse_point);

    VehicleRecord {
        vin: text_field(row, COL_VIN),
        county: text_field(row, COL_COUNTY),
        city: text_field(row, COL_CITY),
        state: text_field(row, COL_STATE),
        postal_code: text_field(row, COL_POSTAL_CODE),
        model_year: year_field(row, COL_MODEL_YEAR),
        make: text_field(row, COL_MAKE),
        model: text_field(row, COL_MODEL),
        ev_type: text_field(row, COL_EV_TYPE),
        cafv_eligibility: text_field(row, COL_CAFV),
        electric_range: count_field(row, COL_ELECTRIC_RANGE)
            .map_or(0, |v| u32::try_from(v).unwrap_or(u32::MAX)),
        base_msrp: count_field(row, COL_BASE_MSRP).unwrap_or(0),
        legislative_district: text_field(row, COL_LEGISLATIVE_DISTRICT),
        dol_vehicle_id: text_field(row, COL_DOL_VEHICLE_ID),
        vehicle_location,
        electric_utility: text_field(row, COL_ELECTRIC_UTILITY),
        census_tract: text_field(row, COL_CENSUS_TRACT),
        point,
    }
}

/// Normalize every row, preserving order.
pub fn normalize_rows(rows: &[RawRow]) -> Vec<VehicleRecord> {
    rows.iter().map(normalize_row).collect()
}

/// Decode `POINT (<lon> <lat>)`, case-insensitive and whitespace-tolerant.
pub fn parse_point(text: &str) -> Option<GeoPoint> {
    let caps = POINT_RE.captures(text)?;
    let longitude = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let latitude = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(GeoPoint {
        longitude,
        latitude,
    })
}

// -- per-field accessors --

/// Text value of a column; empty or null cells are absent.
fn text_field(row: &RawRow, column: &str) -> Option<String> {
    match row.get(column)? {
        CellValue::Null => None,
        CellValue::String(s) if s.trim().is_empty() => None,
        CellValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Model year: a positive whole number, otherwise absent.
fn year_field(row: &RawRow, column: &str) -> Option<i32> {
    let v = row.get(column)?.as_f64()?;
    if !v.is_finite() || v.fract() != 0.0 || v < 1.0 || v > i32::MAX as f64 {
        return None;
    }
    Some(v as i32)
}

/// Non-negative quantity rounded to the nearest whole unit.
fn count_field(row: &RawRow, column: &str) -> Option<u64> {
    let v = row.get(column)?.as_f64()?;
    if !v.is_finite() || v < 0.0 {
        return None;
    }
    Some(v.round() as u64)
}
