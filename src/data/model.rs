use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// CellValue – the value of one attribute of one record
// ---------------------------------------------------------------------------

/// A dynamically-typed attribute value, used for filter choices and group keys.
/// Lives in `BTreeSet` / `BTreeMap` downstream so it must be `Ord`.
#[derive(Debug, Clone)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --
// Equality and hashing both follow `total_cmp` on floats, so `0.0 != -0.0`
// and a NaN equals itself.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Integer(_) => 0,
                Float(_) => 1,
                Text(_) => 2,
            }
        }
        match (self, other) {
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Text(s) => s.hash(state),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.2}"),
            CellValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl CellValue {
    /// Numeric view of the value; text has none.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::Text(_) => None,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Attribute – the columns of the salary table
// ---------------------------------------------------------------------------

/// One column of the salary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Attribute {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    JobTitle,
    RemoteType,
    ResidenceCountry,
    SalaryUsd,
}

impl Attribute {
    /// All attributes in table-column order.
    pub const ALL: [Attribute; 8] = [
        Attribute::Year,
        Attribute::Seniority,
        Attribute::ContractType,
        Attribute::CompanySize,
        Attribute::JobTitle,
        Attribute::RemoteType,
        Attribute::ResidenceCountry,
        Attribute::SalaryUsd,
    ];

    /// Header used by the published dataset.
    pub fn column_name(self) -> &'static str {
        match self {
            Attribute::Year => "ano",
            Attribute::Seniority => "senioridade",
            Attribute::ContractType => "contrato",
            Attribute::CompanySize => "tamanho_empresa",
            Attribute::JobTitle => "cargo",
            Attribute::RemoteType => "remoto",
            Attribute::ResidenceCountry => "residencia_iso3",
            Attribute::SalaryUsd => "usd",
        }
    }

    /// English header accepted as an alternative to [`Self::column_name`].
    pub fn alias(self) -> &'static str {
        match self {
            Attribute::Year => "year",
            Attribute::Seniority => "seniority",
            Attribute::ContractType => "contract_type",
            Attribute::CompanySize => "company_size",
            Attribute::JobTitle => "job_title",
            Attribute::RemoteType => "remote_type",
            Attribute::ResidenceCountry => "residence_country_code",
            Attribute::SalaryUsd => "salary_usd",
        }
    }

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Attribute::Year => "Year",
            Attribute::Seniority => "Experience level",
            Attribute::ContractType => "Contract type",
            Attribute::CompanySize => "Company size",
            Attribute::JobTitle => "Job title",
            Attribute::RemoteType => "Work type",
            Attribute::ResidenceCountry => "Country",
            Attribute::SalaryUsd => "Salary (USD)",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// A single salary observation.
///
/// Serde names follow the published dataset's headers; the English names are
/// accepted as aliases. Columns not listed here are ignored on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ano", alias = "year", deserialize_with = "whole_number")]
    pub year: i64,
    #[serde(rename = "senioridade", alias = "seniority")]
    pub seniority: String,
    #[serde(rename = "contrato", alias = "contract_type")]
    pub contract_type: String,
    #[serde(rename = "tamanho_empresa", alias = "company_size")]
    pub company_size: String,
    #[serde(rename = "cargo", alias = "job_title")]
    pub job_title: String,
    #[serde(rename = "remoto", alias = "remote_type")]
    pub remote_type: String,
    #[serde(rename = "residencia_iso3", alias = "residence_country_code")]
    pub residence_country_code: String,
    #[serde(rename = "usd", alias = "salary_usd", deserialize_with = "salary_amount")]
    pub salary_usd: f64,
}

/// Accepts `2023` as well as `2023.0`; rejects fractional years.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let v = f64::deserialize(deserializer)?;
    if v.fract() != 0.0 || !v.is_finite() {
        return Err(serde::de::Error::custom(format!(
            "expected a whole number, got {v}"
        )));
    }
    Ok(v as i64)
}

/// Salaries must be finite and non-negative.
fn salary_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let v = f64::deserialize(deserializer)?;
    check_salary(v).map_err(serde::de::Error::custom)
}

/// Shared by the serde path and the Parquet reader.
pub(crate) fn check_salary(v: f64) -> Result<f64, String> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(format!("expected a non-negative salary, got {v}"))
    }
}

impl Record {
    /// The value of `attribute` for this record.
    pub fn value(&self, attribute: Attribute) -> CellValue {
        match attribute {
            Attribute::Year => CellValue::Integer(self.year),
            Attribute::Seniority => CellValue::Text(self.seniority.clone()),
            Attribute::ContractType => CellValue::Text(self.contract_type.clone()),
            Attribute::CompanySize => CellValue::Text(self.company_size.clone()),
            Attribute::JobTitle => CellValue::Text(self.job_title.clone()),
            Attribute::RemoteType => CellValue::Text(self.remote_type.clone()),
            Attribute::ResidenceCountry => CellValue::Text(self.residence_country_code.clone()),
            Attribute::SalaryUsd => CellValue::Float(self.salary_usd),
        }
    }

    /// Numeric value of `attribute`, `None` for categorical attributes.
    pub fn numeric(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Year => Some(self.year as f64),
            Attribute::SalaryUsd => Some(self.salary_usd),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded table. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All records (rows) in source order.
    pub records: Vec<Record>,
    /// Where the records came from (URL or path), for display.
    pub source: String,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>, source: impl Into<String>) -> Self {
        Dataset {
            records,
            source: source.into(),
        }
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
