use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use arrow::array::{ArrayRef, DictionaryArray, Float64Array, Int16Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Int32Type, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use ev_dashboard::data::aggregate::{summarize, MakeCount, YearCount};
use ev_dashboard::data::error::LoadError;
use ev_dashboard::data::filter::{filtered_indices, FilterState};
use ev_dashboard::data::load_dataset;
use ev_dashboard::data::loader::load_file;
use ev_dashboard::data::model::CellValue;

#[test]
fn csv_fixture_end_to_end() {
    let ds = load_dataset(Path::new("tests/fixtures/ev_registrations.csv")).unwrap();
    assert_eq!(ds.len(), 7);

    let summary = summarize(&ds.records);
    assert_eq!(summary.total, 7);
    assert_eq!(
        summary.counts_by_year,
        vec![
            YearCount { year: 2013, count: 1 },
            YearCount { year: 2019, count: 1 },
            YearCount { year: 2020, count: 3 },
            YearCount { year: 2023, count: 1 },
        ]
    );
    assert_eq!(
        summary.top_makes,
        vec![
            MakeCount { make: "TESLA".into(), count: 3 },
            MakeCount { make: "NISSAN".into(), count: 1 },
            MakeCount { make: "BMW".into(), count: 1 },
            MakeCount { make: "KIA".into(), count: 1 },
            MakeCount { make: "TOYOTA".into(), count: 1 },
        ]
    );
    assert_eq!(summary.average_range, 190);
    assert_eq!(summary.average_msrp, 52_175);
    assert_eq!(summary.unique_make_count, 5);
    assert_eq!(summary.distinct_states, vec!["CA", "OR", "WA"]);
    assert_eq!(summary.type_distribution.len(), 2);
    assert_eq!(summary.type_distribution[0].count, 5);
}

#[test]
fn csv_fixture_malformed_row_uses_defaults() {
    let ds = load_dataset(Path::new("tests/fixtures/ev_registrations.csv")).unwrap();

    let toyota = ds
        .records
        .iter()
        .find(|r| r.make.as_deref() == Some("TOYOTA"))
        .unwrap();
    assert_eq!(toyota.model_year, None);
    assert_eq!(toyota.electric_range, 0);
    assert_eq!(toyota.base_msrp, 59_900);
    assert!(toyota.point.is_none());
    assert_eq!(toyota.vehicle_location.as_deref(), Some("POINT(garbled)"));

    let leaf = &ds.records[1];
    assert_eq!(leaf.legislative_district, None);
    assert_eq!(leaf.postal_code.as_deref(), Some("92101"));
    let p = leaf.point.unwrap();
    assert_relative_eq!(p.longitude, -117.16171);
    assert_relative_eq!(p.latitude, 32.71568);
}

#[test]
fn csv_fixture_filters() {
    let ds = load_dataset(Path::new("tests/fixtures/ev_registrations.csv")).unwrap();

    let wa = FilterState {
        state: Some("WA".into()),
        ..Default::default()
    };
    assert_eq!(filtered_indices(&ds, &wa), vec![0, 2, 3, 5, 6]);

    let wa_tesla_y = FilterState {
        search_text: "model y".into(),
        state: Some("WA".into()),
        make: Some("TESLA".into()),
    };
    assert_eq!(filtered_indices(&ds, &wa_tesla_y), vec![2, 5]);

    let city = FilterState {
        search_text: "PORTLAND".into(),
        ..Default::default()
    };
    assert_eq!(filtered_indices(&ds, &city), vec![4]);
}

#[test]
fn json_fixture_reparses_mixed_types() {
    let ds = load_dataset(Path::new("tests/fixtures/ev_registrations.json")).unwrap();
    assert_eq!(ds.len(), 3);
    assert_eq!(ds.records[1].model_year, Some(2013));
    assert_eq!(ds.records[1].electric_range, 75);
    assert!(ds.records[1].vehicle_location.is_none());
    assert_eq!(ds.records[2].model_year, Some(2021));

    let summary = summarize(&ds.records);
    assert_eq!(summary.average_range, 182);
    assert_eq!(summary.top_makes[0], MakeCount { make: "TESLA".into(), count: 2 });
}

#[test]
fn parquet_columns_map_to_cells() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ev.parquet");

    let schema = Arc::new(Schema::new(vec![
        Field::new("Make", DataType::Utf8, true),
        Field::new("State", DataType::Utf8, true),
        Field::new("Model Year", DataType::Int64, true),
        Field::new("Electric Range", DataType::Float64, true),
        Field::new("Vehicle Location", DataType::Utf8, true),
    ]));
    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(vec![Some("TESLA"), Some("NISSAN"), None])),
        Arc::new(StringArray::from(vec![Some("WA"), Some("CA"), Some("WA")])),
        Arc::new(Int64Array::from(vec![Some(2020), None, Some(2021)])),
        Arc::new(Float64Array::from(vec![Some(200.0), Some(0.0), Some(250.0)])),
        Arc::new(StringArray::from(vec![
            Some("POINT (-122.3 47.6)"),
            None,
            Some("not a point"),
        ])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let rows = load_file(&path).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["Model Year"], CellValue::Integer(2020));
    assert!(rows[1]["Model Year"].is_null());
    assert!(rows[2]["Make"].is_null());

    let ds = load_dataset(&path).unwrap();
    let summary = summarize(&ds.records);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.average_range, 225);
    assert_eq!(summary.unique_make_count, 2);
    assert!(ds.records[0].point.is_some());
    assert!(ds.records[2].point.is_none());
}

#[test]
fn parquet_non_native_columns_are_read_as_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("encoded.parquet");

    let dictionary = DataType::Dictionary(Box::new(DataType::Int32), Box::new(DataType::Utf8));
    let schema = Arc::new(Schema::new(vec![
        Field::new("Make", dictionary, true),
        Field::new("Model Year", DataType::Int16, true),
    ]));
    let makes: DictionaryArray<Int32Type> = vec!["TESLA", "KIA", "TESLA"].into_iter().collect();
    let columns: Vec<ArrayRef> = vec![
        Arc::new(makes),
        Arc::new(Int16Array::from(vec![Some(2020), None, Some(2018)])),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let rows = load_file(&path).unwrap();
    assert_eq!(rows[0]["Make"], CellValue::String("TESLA".into()));
    assert_eq!(rows[0]["Model Year"], CellValue::Integer(2020));
    assert!(rows[1]["Model Year"].is_null());

    let ds = load_dataset(&path).unwrap();
    assert_eq!(ds.records[1].make.as_deref(), Some("KIA"));
    assert_eq!(ds.records[2].model_year, Some(2018));
    let summary = summarize(&ds.records);
    assert_eq!(summary.unique_make_count, 2);
}

#[test]
fn huge_msrp_values_average_without_overflow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("huge.csv");
    std::fs::write(&path, "Make,Base MSRP\nTESLA,1e30\nKIA,1e30\nBMW,0\n").unwrap();

    let ds = load_dataset(&path).unwrap();
    assert_eq!(ds.records[0].base_msrp, u64::MAX);
    let summary = summarize(&ds.records);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.average_msrp, u64::MAX);
}

#[test]
fn missing_file_is_a_load_error() {
    let err = load_dataset(Path::new("tests/fixtures/does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, LoadError::Io(_)));
}

#[test]
fn header_only_csv_is_empty_not_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    std::fs::write(&path, "VIN (1-10),Make,State\n").unwrap();

    let ds = load_dataset(&path).unwrap();
    assert!(ds.is_empty());
    assert_eq!(summarize(&ds.records).total, 0);
}
