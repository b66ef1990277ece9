use crate::error::Result;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// CSV output with free-form title and summary lines around a table.
///
/// Rows may differ in width, and the header is written explicitly so it
/// can follow title lines. Blank lines are bare newlines, not empty records.
pub struct CsvReportWriter<W: Write> {
    inner: W,
    records_written: usize,
}

impl CsvReportWriter<BufWriter<File>> {
    /// Create the file, and its parent directory if missing
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }
}

impl<W: Write> CsvReportWriter<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            inner,
            records_written: 0,
        }
    }

    /// Run `write` against a csv writer borrowing the output, then flush it
    fn with_csv<F>(&mut self, write: F) -> Result<()>
    where
        F: FnOnce(&mut csv::Writer<&mut W>) -> csv::Result<()>,
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_writer(&mut self.inner);
        write(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// A single-field line, such as a title or a summary entry
    pub fn write_line(&mut self, text: &str) -> Result<()> {
        self.with_csv(|w| w.write_record([text]))
    }

    pub fn blank_line(&mut self) -> Result<()> {
        self.inner.write_all(b"\n")?;
        Ok(())
    }

    pub fn write_header(&mut self, columns: &[&str]) -> Result<()> {
        self.with_csv(|w| w.write_record(columns))
    }

    pub fn write_record<T: Serialize>(&mut self, record: &T) -> Result<()> {
        self.with_csv(|w| w.serialize(record))?;
        self.records_written += 1;
        Ok(())
    }

    pub fn write_records<'a, T, I>(&mut self, records: I) -> Result<()>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let mut count = 0;
        self.with_csv(|w| {
            for record in records {
                w.serialize(record)?;
                count += 1;
            }
            Ok(())
        })?;
        self.records_written += count;
        Ok(())
    }

    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush and hand back the underlying writer
    pub fn finish(mut self) -> Result<W> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

/// Write a plain table: header then records
pub fn write_table<T: Serialize>(path: &Path, header: &[&str], records: &[T]) -> Result<usize> {
    let mut writer = CsvReportWriter::create(path)?;
    writer.write_header(header)?;
    writer.write_records(records)?;
    let written = writer.records_written();
    writer.finish()?;
    Ok(written)
}
