use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::filter::FilteredView;
use super::model::Attribute;

/// Write the records of `view` as CSV with the source dataset's headers.
/// The header row is written even when the view is empty.
pub fn write_csv<W: Write>(view: &FilteredView<'_>, writer: W) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer
        .write_record(Attribute::ALL.map(Attribute::column_name))
        .context("writing CSV header")?;
    for (i, record) in view.records().enumerate() {
        csv_writer
            .serialize(record)
            .with_context(|| format!("writing row {i}"))?;
    }
    csv_writer.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export `view` to a CSV file at `path`.
pub fn export_csv(view: &FilteredView<'_>, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(view, file)?;
    log::info!("Exported {} rows to {}", view.len(), path.display());
    Ok(())
}
