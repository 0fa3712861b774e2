use std::fmt;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::DataUnavailableError;
use super::model::{check_salary, Attribute, CellValue, Dataset, Record};

type Result<T> = std::result::Result<T, DataUnavailableError>;

/// Published survey table the dashboard opens by default.
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

// ---------------------------------------------------------------------------
// Where the data lives and how it is encoded
// ---------------------------------------------------------------------------

/// Location of the salary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Remote(String),
    File(PathBuf),
}

impl DataSource {
    /// `http://` / `https://` locations are remote, anything else is a path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            DataSource::Remote(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// Lower-cased extension of the location, ignoring URL query / fragment.
    fn extension(&self) -> String {
        let name = match self {
            DataSource::Remote(url) => url
                .split(['?', '#'])
                .next()
                .and_then(|path| path.rsplit('/').next())
                .unwrap_or(""),
            DataSource::File(path) => path.file_name().and_then(|n| n.to_str()).unwrap_or(""),
        };
        match name.rsplit_once('.') {
            Some((_, ext)) => ext.to_ascii_lowercase(),
            None => String::new(),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Remote(url) => f.write_str(url),
            DataSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Supported encodings of the salary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
    Parquet,
}

impl Format {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "csv" => Some(Format::Csv),
            "json" => Some(Format::Json),
            "parquet" | "pq" => Some(Format::Parquet),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Fetch and parse the salary table.
///
/// Remote locations are fetched with a single blocking GET; there is no
/// retry. Remote locations without a known extension are read as CSV, local
/// files must carry one of `.csv`, `.json`, `.parquet` / `.pq`.
pub fn load(source: &DataSource) -> Result<Dataset> {
    let format = format_of(source)?;
    let bytes = match source {
        DataSource::Remote(url) => fetch(url)?,
        DataSource::File(path) => read_file(path)?,
    };

    log::debug!("Parsing {} bytes from {source} as {format:?}", bytes.len());
    let records = parse(format, bytes)?;
    log::info!("Loaded {} salary records from {source}", records.len());
    Ok(Dataset::from_records(records, source.to_string()))
}

/// Encoding implied by the location's extension.
fn format_of(source: &DataSource) -> Result<Format> {
    let ext = source.extension();
    match (Format::from_extension(&ext), source) {
        (Some(format), _) => Ok(format),
        (None, DataSource::Remote(_)) => Ok(Format::Csv),
        (None, DataSource::File(_)) => Err(DataUnavailableError::UnsupportedFormat(ext)),
    }
}

/// Load a local file, dispatching on its extension.
pub fn load_file(path: &Path) -> Result<Dataset> {
    load(&DataSource::File(path.to_path_buf()))
}

/// Decode an in-memory payload.
pub fn parse(format: Format, bytes: Bytes) -> Result<Vec<Record>> {
    match format {
        Format::Csv => parse_csv(&bytes),
        Format::Json => parse_json(&bytes),
        Format::Parquet => parse_parquet(bytes),
    }
}

fn fetch(url: &str) -> Result<Bytes> {
    log::info!("Fetching salary data from {url}");
    reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(|source| DataUnavailableError::Fetch {
            url: url.to_string(),
            source,
        })
}

fn read_file(path: &Path) -> Result<Bytes> {
    std::fs::read(path)
        .map(Bytes::from)
        .map_err(|source| DataUnavailableError::Io {
            path: path.to_path_buf(),
            source,
        })
}

// ---------------------------------------------------------------------------
// CSV / JSON loaders
// ---------------------------------------------------------------------------

/// Header row with column names, one record per line. Columns are matched by
/// name (source or English alias); extra columns are ignored.
fn parse_csv(data: &[u8]) -> Result<Vec<Record>> {
    let mut reader = csv::Reader::from_reader(data);
    let records = reader
        .deserialize::<Record>()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(records)
}

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "ano": 2024, "senioridade": "senior", "cargo": "data scientist", "usd": 120000.0, ... },
///   ...
/// ]
/// ```
fn parse_json(data: &[u8]) -> Result<Vec<Record>> {
    Ok(serde_json::from_slice(data)?)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Expected schema: one column per [`Attribute`], named by source header or
/// English alias. Text columns may be Utf8 / LargeUtf8, numeric columns any
/// of Int32 / Int64 / Float32 / Float64. Nulls are rejected.
fn parse_parquet(bytes: Bytes) -> Result<Vec<Record>> {
    let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)?.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let offset = records.len();
        records.reserve(batch.num_rows());
        for row in 0..batch.num_rows() {
            records.push(read_row(&batch, row, offset + row)?);
        }
    }
    Ok(records)
}

fn read_row(batch: &RecordBatch, row: usize, global_row: usize) -> Result<Record> {
    let cell = |attr: Attribute| -> Result<CellValue> {
        let col = column(batch, attr)?;
        extract_cell(col, row).map_err(|reason| DataUnavailableError::Coercion {
            row: global_row,
            column: attr.column_name(),
            reason,
        })
    };
    let text = |attr: Attribute| -> Result<String> {
        Ok(match cell(attr)? {
            CellValue::Text(s) => s,
            other => other.to_string(),
        })
    };
    let number = |attr: Attribute| -> Result<f64> {
        cell(attr)?
            .as_f64()
            .ok_or_else(|| DataUnavailableError::Coercion {
                row: global_row,
                column: attr.column_name(),
                reason: "expected a number".to_string(),
            })
    };

    let year = number(Attribute::Year)?;
    if year.fract() != 0.0 {
        return Err(DataUnavailableError::Coercion {
            row: global_row,
            column: Attribute::Year.column_name(),
            reason: format!("expected a whole number, got {year}"),
        });
    }

    let salary = number(Attribute::SalaryUsd)?;
    let salary_usd = check_salary(salary).map_err(|reason| DataUnavailableError::Coercion {
        row: global_row,
        column: Attribute::SalaryUsd.column_name(),
        reason,
    })?;

    Ok(Record {
        year: year as i64,
        seniority: text(Attribute::Seniority)?,
        contract_type: text(Attribute::ContractType)?,
        company_size: text(Attribute::CompanySize)?,
        job_title: text(Attribute::JobTitle)?,
        remote_type: text(Attribute::RemoteType)?,
        residence_country_code: text(Attribute::ResidenceCountry)?,
        salary_usd,
    })
}

/// Locate the column for `attr` by source header, falling back to the alias.
fn column(batch: &RecordBatch, attr: Attribute) -> Result<&ArrayRef> {
    let schema = batch.schema_ref();
    schema
        .index_of(attr.column_name())
        .or_else(|_| schema.index_of(attr.alias()))
        .map(|i| batch.column(i))
        .map_err(|_| DataUnavailableError::MissingColumn(attr.column_name()))
}

/// Extract a single value from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> std::result::Result<CellValue, String> {
    if col.is_null(row) {
        return Err("null value".to_string());
    }
    match col.data_type() {
        DataType::Utf8 => Ok(CellValue::Text(col.as_string::<i32>().value(row).to_string())),
        DataType::LargeUtf8 => Ok(CellValue::Text(col.as_string::<i64>().value(row).to_string())),
        DataType::Int32 => Ok(CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64)),
        DataType::Int64 => Ok(CellValue::Integer(col.as_primitive::<Int64Type>().value(row))),
        DataType::Float32 => Ok(CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)),
        DataType::Float64 => Ok(CellValue::Float(col.as_primitive::<Float64Type>().value(row))),
        other => Err(format!("unsupported column type {other:?}")),
    }
}
