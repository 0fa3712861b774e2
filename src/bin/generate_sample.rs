use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const ROWS: usize = 2_000;
const CSV_PATH: &str = "sample_salaries.csv";
const PARQUET_PATH: &str = "sample_salaries.parquet";

const HEADERS: [&str; 8] = [
    "ano",
    "senioridade",
    "contrato",
    "tamanho_empresa",
    "cargo",
    "remoto",
    "residencia_iso3",
    "usd",
];

/// (seniority, salary multiplier)
const SENIORITIES: [(&str, f64); 4] = [
    ("junior", 0.55),
    ("pleno", 0.8),
    ("senior", 1.0),
    ("executivo", 1.35),
];
const CONTRACTS: [&str; 4] = ["integral", "parcial", "contrato", "freelancer"];
const SIZES: [&str; 3] = ["pequena", "media", "grande"];
/// (job title, base salary in USD)
const TITLES: [(&str, f64); 8] = [
    ("Data Scientist", 140_000.0),
    ("Data Engineer", 145_000.0),
    ("Data Analyst", 95_000.0),
    ("Machine Learning Engineer", 175_000.0),
    ("Analytics Engineer", 150_000.0),
    ("Research Scientist", 185_000.0),
    ("BI Developer", 85_000.0),
    ("Data Architect", 165_000.0),
];
const REMOTE: [&str; 3] = ["presencial", "hibrido", "remoto"];
/// (ISO3 country, cost-of-living multiplier)
const COUNTRIES: [(&str, f64); 8] = [
    ("USA", 1.0),
    ("CAN", 0.8),
    ("GBR", 0.7),
    ("DEU", 0.7),
    ("ESP", 0.5),
    ("IND", 0.25),
    ("BRA", 0.3),
    ("PRT", 0.45),
];

/// Deterministic SplitMix64 stream; the sample must be identical across runs.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[0, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Bell-shaped spread around `center`: the sum of four uniforms, rescaled
    /// to unit variance.
    fn spread(&mut self, center: f64, scale: f64) -> f64 {
        let sum: f64 = (0..4).map(|_| self.unit()).sum();
        center + scale * (sum - 2.0) * 3f64.sqrt()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

#[derive(Default)]
struct Columns {
    year: Vec<i64>,
    seniority: Vec<&'static str>,
    contract: Vec<&'static str>,
    size: Vec<&'static str>,
    title: Vec<&'static str>,
    remote: Vec<&'static str>,
    country: Vec<&'static str>,
    usd: Vec<f64>,
}

fn generate(rng: &mut SampleRng) -> Columns {
    let mut cols = Columns::default();
    for _ in 0..ROWS {
        let year = 2020 + (rng.next_u64() % 6) as i64;
        let &(seniority, level) = rng.pick(&SENIORITIES);
        let &(title, base) = rng.pick(&TITLES);
        let &(country, living) = rng.pick(&COUNTRIES);
        let growth = 1.0 + 0.04 * (year - 2020) as f64;
        let salary = rng
            .spread(base * level * living * growth, base * 0.12)
            .max(5_000.0)
            .round();

        cols.year.push(year);
        cols.seniority.push(seniority);
        cols.contract.push(*rng.pick(&CONTRACTS));
        cols.size.push(*rng.pick(&SIZES));
        cols.title.push(title);
        cols.remote.push(*rng.pick(&REMOTE));
        cols.country.push(country);
        cols.usd.push(salary);
    }
    cols
}

fn write_csv(cols: &Columns) -> Result<()> {
    let mut writer = csv::Writer::from_path(CSV_PATH).context("creating CSV output")?;
    writer.write_record(HEADERS)?;
    for i in 0..cols.year.len() {
        writer.write_record([
            cols.year[i].to_string().as_str(),
            cols.seniority[i],
            cols.contract[i],
            cols.size[i],
            cols.title[i],
            cols.remote[i],
            cols.country[i],
            cols.usd[i].to_string().as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(cols: &Columns) -> Result<()> {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Int64, false),
        text(HEADERS[1]),
        text(HEADERS[2]),
        text(HEADERS[3]),
        text(HEADERS[4]),
        text(HEADERS[5]),
        text(HEADERS[6]),
        Field::new(HEADERS[7], DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from(cols.year.clone())),
        Arc::new(StringArray::from(cols.seniority.clone())),
        Arc::new(StringArray::from(cols.contract.clone())),
        Arc::new(StringArray::from(cols.size.clone())),
        Arc::new(StringArray::from(cols.title.clone())),
        Arc::new(StringArray::from(cols.remote.clone())),
        Arc::new(StringArray::from(cols.country.clone())),
        Arc::new(Float64Array::from(cols.usd.clone())),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(PARQUET_PATH).context("creating Parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SampleRng(42);
    let cols = generate(&mut rng);

    write_csv(&cols)?;
    write_parquet(&cols)?;

    println!("Wrote {} salary records to {CSV_PATH} and {PARQUET_PATH}", cols.year.len());
    Ok(())
}
