pub mod discovery;
pub mod report_reader;
pub mod table_reader;

pub use discovery::discover_tables;
pub use report_reader::{RawRow, RawTable, ReportReader, ReportTable};
pub use table_reader::{AttributeRow, TableIterator, TableReader};

use crate::error::{ProcessingError, Result};
use encoding_rs::Encoding;
use std::path::Path;

/// Read a whole file and decode it with the named encoding.
///
/// A byte-order mark overrides the label.
pub(crate) fn decode_file(path: &Path, encoding_label: &str) -> Result<String> {
    let encoding = Encoding::for_label(encoding_label.trim().as_bytes()).ok_or_else(|| {
        ProcessingError::Config(format!("Unknown text encoding '{}'", encoding_label))
    })?;

    let bytes = std::fs::read(path).map_err(|e| ProcessingError::source_unavailable(path, e))?;
    let (text, used, had_errors) = encoding.decode(&bytes);

    if had_errors {
        tracing::warn!(
            path = %path.display(),
            encoding = used.name(),
            "Input contained byte sequences that could not be decoded"
        );
    }

    Ok(text.into_owned())
}
