use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::Serialize;

use super::ByteTally;
use crate::errors::GenerationError;

/// Write records as a pretty-printed JSON array of flat objects.
pub fn write_records_json<T: Serialize>(
    path: &Path,
    records: &[T],
) -> Result<u64, GenerationError> {
    let mut tally = ByteTally::new(BufWriter::new(File::create(path)?));
    serde_json::to_writer_pretty(&mut tally, records)?;
    Ok(tally.finish()?)
}
