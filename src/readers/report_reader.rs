use crate::error::{ProcessingError, Result};
use crate::readers::decode_file;
use crate::readers::table_reader::AttributeRow;
use crate::utils::constants::{DEFAULT_PREAMBLE_LINES, DEFAULT_REPORT_ENCODING, RULE_PREFIX};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// A whitespace-tokenized line of a report
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub line: usize,
    pub tokens: Vec<String>,
}

/// One section of a report, before its rows are checked against the header
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub header: Vec<String>,
    pub header_line: usize,
    pub rows: Vec<RawRow>,
}

/// A section whose rows all match the header width
#[derive(Debug, Clone)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<AttributeRow>,
    pub skipped: usize,
}

impl RawTable {
    /// Drop the first `count` tokens of every data row. Some report tables
    /// lead each row with a value that has no header column.
    pub fn without_leading_tokens(mut self, count: usize) -> Self {
        if count > 0 {
            for row in &mut self.rows {
                let drop = count.min(row.tokens.len());
                row.tokens.drain(..drop);
            }
        }
        self
    }

    /// Fit every row to the header.
    ///
    /// Values that contain spaces split into several tokens. When a row is
    /// wider than the header, the surplus tokens starting at
    /// `overflow_column` are concatenated back into that column. Rows that
    /// still do not fit are logged and dropped.
    pub fn into_table(self, overflow_column: Option<usize>) -> ReportTable {
        let columns: Arc<HashMap<String, usize>> = Arc::new(
            self.header
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.clone(), idx))
                .collect(),
        );

        let mut rows = Vec::with_capacity(self.rows.len());
        let mut skipped = 0;

        for raw in self.rows {
            match fit_row(raw, self.header.len(), overflow_column) {
                Ok(raw) => rows.push(AttributeRow::with_columns(
                    Arc::clone(&columns),
                    raw.tokens,
                    raw.line,
                )),
                Err(e) => {
                    tracing::warn!("Skipping report row: {}", e);
                    skipped += 1;
                }
            }
        }

        ReportTable {
            header: self.header,
            rows,
            skipped,
        }
    }
}

fn fit_row(mut raw: RawRow, width: usize, overflow_column: Option<usize>) -> Result<RawRow> {
    if raw.tokens.len() > width {
        if let Some(idx) = overflow_column.filter(|&idx| idx < width) {
            let extra = raw.tokens.len() - width;
            tracing::debug!(line = raw.line, "Row is {} tokens too long, merging column {}", extra, idx);
            let merged: String = raw.tokens.drain(idx..=idx + extra).collect();
            raw.tokens.insert(idx, merged);
        }
    }

    if raw.tokens.len() != width {
        return Err(ProcessingError::invalid_record(
            raw.line,
            format!("expected {} fields, got {}", width, raw.tokens.len()),
        ));
    }

    Ok(raw)
}

/// Reader for fixed-layout text reports.
///
/// A report opens with a constant preamble, followed by one or more tables.
/// Each table is a header line and its data rows, optionally framed by
/// `---` rule lines; tables are separated by blank lines.
pub struct ReportReader {
    preamble_lines: usize,
    encoding: String,
}

impl ReportReader {
    pub fn new() -> Self {
        Self {
            preamble_lines: DEFAULT_PREAMBLE_LINES,
            encoding: DEFAULT_REPORT_ENCODING.to_string(),
        }
    }

    pub fn with_preamble_lines(mut self, preamble_lines: usize) -> Self {
        self.preamble_lines = preamble_lines;
        self
    }

    pub fn with_encoding(mut self, encoding: &str) -> Self {
        self.encoding = encoding.to_string();
        self
    }

    /// Read all tables that follow the preamble
    pub fn read_tables(&self, path: &Path) -> Result<Vec<RawTable>> {
        let content = decode_file(path, &self.encoding)?;
        let tables = self.parse_tables(&content);
        tracing::debug!(path = %path.display(), tables = tables.len(), "Parsed report");
        Ok(tables)
    }

    pub fn parse_tables(&self, content: &str) -> Vec<RawTable> {
        let mut tables = Vec::new();
        let mut current: Option<RawTable> = None;

        for (idx, line) in content.lines().enumerate().skip(self.preamble_lines) {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                if let Some(table) = current.take() {
                    tables.push(table);
                }
                continue;
            }

            if trimmed.starts_with(RULE_PREFIX) {
                continue;
            }

            let tokens: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
            match current.as_mut() {
                Some(table) => table.rows.push(RawRow {
                    line: line_no,
                    tokens,
                }),
                None => {
                    current = Some(RawTable {
                        header: tokens,
                        header_line: line_no,
                        rows: Vec::new(),
                    })
                }
            }
        }

        if let Some(table) = current {
            tables.push(table);
        }

        tables
    }
}

impl Default for ReportReader {
    fn default() -> Self {
        Self::new()
    }
}
