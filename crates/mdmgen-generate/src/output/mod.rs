//! Persistence sink: one artifact per collection.

pub mod csv;
pub mod json;

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::info;

use mdmgen_core::{Dataset, Record};

use crate::errors::GenerationError;
use crate::model::{ArtifactReport, OutputFormat};

/// Clear artifacts of `format` left in `dir` by an earlier run, or create
/// `dir` when it does not exist. Returns the number of removed files.
pub fn prepare_output_dir(dir: &Path, format: OutputFormat) -> Result<usize, GenerationError> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        return Ok(0);
    }

    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches_format = path
            .extension()
            .is_some_and(|ext| ext == format.extension());
        if path.is_file() && matches_format {
            fs::remove_file(&path)?;
            removed += 1;
        }
    }

    if removed > 0 {
        info!(event = "output_cleared", dir = %dir.display(), removed);
    }
    Ok(removed)
}

/// Write all six collections into `dir`.
pub fn write_dataset(
    dir: &Path,
    dataset: &Dataset,
    format: OutputFormat,
) -> Result<Vec<ArtifactReport>, GenerationError> {
    Ok(vec![
        write_collection(dir, &dataset.crm_contacts, format)?,
        write_collection(dir, &dataset.crm_organizations, format)?,
        write_collection(dir, &dataset.hr_departments, format)?,
        write_collection(dir, &dataset.hr_employees, format)?,
        write_collection(dir, &dataset.salesforce_contacts, format)?,
        write_collection(dir, &dataset.salesforce_organizations, format)?,
    ])
}

fn write_collection<T: Record>(
    dir: &Path,
    records: &[T],
    format: OutputFormat,
) -> Result<ArtifactReport, GenerationError> {
    let path = dir.join(format!("{}.{}", T::COLLECTION, format.extension()));
    let bytes_written = match format {
        OutputFormat::Json => json::write_records_json(&path, records)?,
        OutputFormat::Csv => csv::write_records_csv(&path, records)?,
    };
    info!(
        event = "artifact_written",
        collection = T::COLLECTION,
        path = %path.display(),
        records = records.len(),
        bytes_written
    );
    Ok(ArtifactReport {
        collection: T::COLLECTION.to_string(),
        path,
        records: records.len() as u64,
        bytes_written,
    })
}

/// Passes writes through to `inner` and keeps a running byte total.
struct ByteTally<W: Write> {
    inner: W,
    total: u64,
}

impl<W: Write> ByteTally<W> {
    fn new(inner: W) -> Self {
        Self { inner, total: 0 }
    }

    /// Flush the underlying writer and return the bytes it accepted.
    fn finish(mut self) -> std::io::Result<u64> {
        self.inner.flush()?;
        Ok(self.total)
    }
}

impl<W: Write> Write for ByteTally<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let accepted = self.inner.write(buf)?;
        self.total += accepted as u64;
        Ok(accepted)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
