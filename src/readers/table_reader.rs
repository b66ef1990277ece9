use crate::error::{ProcessingError, Result};
use crate::readers::decode_file;
use crate::utils::constants::DEFAULT_TABLE_ENCODING;
use csv::StringRecord;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

/// One row of an attribute table, addressed by column name.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRow {
    columns: Arc<HashMap<String, usize>>,
    values: Vec<String>,
    line: usize,
}

impl AttributeRow {
    /// Build a standalone row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(line: usize, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut columns = HashMap::new();
        let mut values = Vec::new();
        for (idx, (key, value)) in pairs.into_iter().enumerate() {
            columns.insert(key.into(), idx);
            values.push(value.into());
        }

        Self {
            columns: Arc::new(columns),
            values,
            line,
        }
    }

    pub(crate) fn with_columns(
        columns: Arc<HashMap<String, usize>>,
        values: Vec<String>,
        line: usize,
    ) -> Self {
        Self {
            columns,
            values,
            line,
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .get(column)
            .and_then(|&idx| self.values.get(idx))
            .map(|s| s.as_str())
    }

    /// Like [`get`](Self::get) but a missing column is an error.
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column).ok_or_else(|| {
            ProcessingError::MissingColumn(format!("'{}' (line {})", column, self.line))
        })
    }

    /// The value with surrounding whitespace removed; `None` when missing or blank.
    pub fn get_trimmed(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }

    pub fn get_f64(&self, column: &str) -> Option<f64> {
        self.get_trimmed(column).and_then(|v| v.parse::<f64>().ok())
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

/// Reader for attribute tables exported as CSV
pub struct TableReader {
    encoding: String,
}

impl TableReader {
    pub fn new() -> Self {
        Self {
            encoding: DEFAULT_TABLE_ENCODING.to_string(),
        }
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    /// Open a table and stream its rows
    pub fn open(&self, path: &Path) -> Result<TableIterator> {
        let content = decode_file(path, &self.encoding)?;
        TableIterator::from_content(path, content)
    }

    /// Read every row, skipping (and logging) rows that fail to parse
    pub fn read_rows(&self, path: &Path) -> Result<Vec<AttributeRow>> {
        let mut rows = Vec::new();
        for row in self.open(path)? {
            match row {
                Ok(row) => rows.push(row),
                Err(e) if e.is_row_local() => {
                    tracing::warn!(path = %path.display(), "Skipping row: {}", e);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(rows)
    }
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy, single-pass iterator over the rows of one table
pub struct TableIterator {
    columns: Arc<HashMap<String, usize>>,
    width: usize,
    records: csv::StringRecordsIntoIter<Cursor<Vec<u8>>>,
}

impl TableIterator {
    fn from_content(path: &Path, content: String) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(Cursor::new(content.into_bytes()));

        let headers = reader
            .headers()
            .map_err(|e| ProcessingError::source_unavailable(path, e))?
            .clone();

        // A repeated column name resolves to its first occurrence.
        let mut columns = HashMap::with_capacity(headers.len());
        for (idx, name) in headers.iter().enumerate() {
            let name = name.trim_start_matches('\u{feff}').to_string();
            if columns.contains_key(&name) {
                tracing::debug!(path = %path.display(), column = %name, "Duplicate column name");
                continue;
            }
            columns.insert(name, idx);
        }

        Ok(Self {
            columns: Arc::new(columns),
            width: headers.len(),
            records: reader.into_records(),
        })
    }

    fn to_row(&self, record: StringRecord) -> Result<AttributeRow> {
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.len() != self.width {
            return Err(ProcessingError::invalid_record(
                line,
                format!("expected {} fields, got {}", self.width, record.len()),
            ));
        }

        Ok(AttributeRow {
            columns: Arc::clone(&self.columns),
            values: record.iter().map(|s| s.to_string()).collect(),
            line,
        })
    }
}

impl Iterator for TableIterator {
    type Item = Result<AttributeRow>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.records.next()? {
            Ok(record) => Some(self.to_row(record)),
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                Some(Err(ProcessingError::invalid_record(line, e.to_string())))
            }
        }
    }
}
