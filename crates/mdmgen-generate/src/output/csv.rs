use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use mdmgen_core::Record;

use super::ByteTally;

/// Write records as CSV. The header row is always [`Record::FIELDS`], so an
/// empty collection still yields a header; unset links become empty cells.
pub fn write_records_csv<T: Record>(path: &Path, records: &[T]) -> Result<u64, csv::Error> {
    let file = File::create(path).map_err(csv::Error::from)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(ByteTally::new(BufWriter::new(file)));

    writer.write_record(T::FIELDS)?;
    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    let tally = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(tally.finish()?)
}
