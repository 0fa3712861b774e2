use clap::Parser;

use crate::data::dashboard::DashboardSettings;
use crate::data::loader::{DataSource, DEFAULT_SOURCE};

/// Interactive dashboard over data-industry salary survey data.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    /// URL or local path (.csv, .json, .parquet) of the salary table
    #[arg(long, env = "SALARY_DASHBOARD_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: String,

    /// Number of job titles in the salary ranking chart
    #[arg(long, env = "SALARY_DASHBOARD_TOP_N", default_value_t = 10)]
    pub top_n: usize,

    /// Number of buckets in the salary distribution chart
    #[arg(
        long,
        env = "SALARY_DASHBOARD_BINS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub bins: u16,

    /// Job title whose average salary is charted per country
    #[arg(long, env = "SALARY_DASHBOARD_FOCUS_TITLE", default_value = "Data Scientist")]
    pub focus_title: String,
}

impl Cli {
    pub fn data_source(&self) -> DataSource {
        DataSource::parse(&self.source)
    }

    pub fn settings(&self) -> DashboardSettings {
        DashboardSettings {
            top_n: self.top_n,
            histogram_bins: usize::from(self.bins),
            focus_title: self.focus_title.clone(),
        }
    }
}
