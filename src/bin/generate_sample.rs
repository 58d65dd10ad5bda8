use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use ev_dashboard::data::normalize::{
    COL_BASE_MSRP, COL_ELECTRIC_RANGE, COL_MODEL_YEAR, SOURCE_COLUMNS,
};

const ROWS: usize = 2_000;
const CSV_PATH: &str = "sample_ev_data.csv";
const PARQUET_PATH: &str = "sample_ev_data.parquet";

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.below(items.len())]
    }

    /// Uniform in `[lo, hi)`.
    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}

struct MakeSpec {
    make: &'static str,
    models: &'static [&'static str],
    weight: usize,
    bev: bool,
    range: (u32, u32),
}

const fn spec(
    make: &'static str,
    models: &'static [&'static str],
    weight: usize,
    bev: bool,
    range: (u32, u32),
) -> MakeSpec {
    MakeSpec { make, models, weight, bev, range }
}

const MAKES: &[MakeSpec] = &[
    spec("TESLA", &["MODEL 3", "MODEL Y", "MODEL S", "MODEL X"], 40, true, (210, 330)),
    spec("NISSAN", &["LEAF"], 10, true, (84, 150)),
    spec("CHEVROLET", &["BOLT EV", "VOLT"], 9, true, (53, 259)),
    spec("FORD", &["MUSTANG MACH-E", "FUSION"], 7, true, (0, 230)),
    spec("KIA", &["NIRO", "EV6"], 6, true, (0, 239)),
    spec("BMW", &["X5", "I3"], 5, false, (14, 30)),
    spec("TOYOTA", &["PRIUS PRIME", "RAV4 PRIME"], 5, false, (25, 42)),
    spec("VOLKSWAGEN", &["ID.4", "E-GOLF"], 4, true, (0, 125)),
    spec("JEEP", &["WRANGLER", "GRAND CHEROKEE"], 4, false, (21, 25)),
    spec("HYUNDAI", &["IONIQ 5", "KONA ELECTRIC"], 4, true, (0, 258)),
    spec("RIVIAN", &["R1T", "R1S"], 3, true, (0, 0)),
    spec("AUDI", &["E-TRON"], 2, true, (0, 222)),
    spec("POLESTAR", &["PS2"], 1, true, (0, 0)),
];

const PLACES: &[(&str, &str, &str, &str, f64, f64)] = &[
    ("King", "Seattle", "WA", "98122", -122.30839, 47.610365),
    ("King", "Bellevue", "WA", "98004", -122.20264, 47.61872),
    ("Snohomish", "Bothell", "WA", "98012", -122.20563, 47.83504),
    ("Thurston", "Olympia", "WA", "98501", -122.89166, 47.03956),
    ("Spokane", "Spokane", "WA", "99201", -117.42351, 47.65726),
    ("Clark", "Vancouver", "WA", "98661", -122.62745, 45.63963),
    ("San Diego", "San Diego", "CA", "92101", -117.16171, 32.71568),
    ("Multnomah", "Portland", "OR", "97201", -122.68847, 45.51054),
];

const UTILITIES: &[&str] = &[
    "CITY OF SEATTLE - (WA)|CITY OF TACOMA - (WA)",
    "PUGET SOUND ENERGY INC",
    "BONNEVILLE POWER ADMINISTRATION||PUD NO 1 OF CLARK COUNTY - (WA)",
    "AVISTA CORP",
];

const BEV: &str = "Battery Electric Vehicle (BEV)";
const PHEV: &str = "Plug-in Hybrid Electric Vehicle (PHEV)";

fn weighted_make(rng: &mut SimpleRng) -> &'static MakeSpec {
    let total: usize = MAKES.iter().map(|m| m.weight).sum();
    let mut roll = rng.below(total);
    for spec in MAKES {
        if roll < spec.weight {
            return spec;
        }
        roll -= spec.weight;
    }
    &MAKES[0]
}

/// One generated row, cells in `SOURCE_COLUMNS` order.
fn generate_row(rng: &mut SimpleRng, id: usize) -> Vec<String> {
    let spec = weighted_make(rng);
    let (county, city, state, postal, lon, lat) = *rng.pick(PLACES);
    let year = 2011 + rng.below(14);
    let ev_type = if spec.bev { BEV } else { PHEV };

    // Newer registrations often have range/MSRP not yet researched (0).
    let range = if year >= 2021 && rng.below(3) > 0 {
        0
    } else {
        spec.range.0 + rng.below((spec.range.1 - spec.range.0 + 1) as usize) as u32
    };
    let msrp = if rng.below(20) == 0 {
        [31_950, 36_900, 52_650, 69_900, 110_950][rng.below(5)]
    } else {
        0
    };
    let cafv = if range == 0 {
        "Eligibility unknown as battery range has not been researched"
    } else if range >= 30 {
        "Clean Alternative Fuel Vehicle Eligible"
    } else {
        "Not eligible due to low battery range"
    };
    let location = format!(
        "POINT ({:.5} {:.5})",
        lon + rng.range_f64(-0.05, 0.05),
        lat + rng.range_f64(-0.05, 0.05)
    );
    let vin: String = (0..10)
        .map(|_| *rng.pick(&b"0123456789ABCDEFGHJKLMNPRSTUVWXYZ"[..]) as char)
        .collect();

    vec![
        vin,
        county.to_string(),
        city.to_string(),
        state.to_string(),
        postal.to_string(),
        year.to_string(),
        spec.make.to_string(),
        rng.pick(spec.models).to_string(),
        ev_type.to_string(),
        cafv.to_string(),
        range.to_string(),
        msrp.to_string(),
        (1 + rng.below(49)).to_string(),
        (100_000_000 + id * 7919).to_string(),
        location,
        rng.pick(UTILITIES).to_string(),
        format!("530330{:05}", rng.below(100_000)),
    ]
}

fn is_numeric_column(name: &str) -> bool {
    [COL_MODEL_YEAR, COL_ELECTRIC_RANGE, COL_BASE_MSRP].contains(&name)
}

fn write_csv(rows: &[Vec<String>]) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV output")?;
    writer.write_record(SOURCE_COLUMNS)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

fn write_parquet(rows: &[Vec<String>]) -> Result<()> {
    let fields: Vec<Field> = SOURCE_COLUMNS
        .iter()
        .map(|&name| {
            let dtype = if is_numeric_column(name) {
                DataType::Int64
            } else {
                DataType::Utf8
            };
            Field::new(name, dtype, true)
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(SOURCE_COLUMNS.len());
    for (col, &name) in SOURCE_COLUMNS.iter().enumerate() {
        if is_numeric_column(name) {
            let values: Vec<Option<i64>> = rows.iter().map(|r| r[col].parse().ok()).collect();
            columns.push(Arc::new(Int64Array::from(values)));
        } else {
            let values: Vec<&str> = rows.iter().map(|r| r[col].as_str()).collect();
            columns.push(Arc::new(StringArray::from(values)));
        }
    }

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(PARQUET_PATH).context("creating Parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows: Vec<Vec<String>> = (0..ROWS).map(|id| generate_row(&mut rng, id)).collect();

    write_csv(&rows)?;
    write_parquet(&rows)?;

    println!("Wrote {ROWS} registrations to {CSV_PATH} and {PARQUET_PATH}");
    Ok(())
}
