use ::csv::{QuoteStyle, Terminator, WriterBuilder};
use fitts_core::TrialRecord;

use crate::sink::ExportError;

pub const DELIMITER: u8 = b',';

/// Header line plus one line per record, joined with `\n`. No records, no output.
///
/// A field is quoted only when it would otherwise break the row (delimiter,
/// quote or line break). Numbers and the fixed vocabularies pass through as-is.
pub fn to_csv(records: &[TrialRecord]) -> Result<String, ExportError> {
    if records.is_empty() {
        return Ok(String::new());
    }
    let mut writer = WriterBuilder::new()
        .delimiter(DELIMITER)
        .quote_style(QuoteStyle::Necessary)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(TrialRecord::FIELD_NAMES)?;
    for r in records {
        writer.write_record(r.values())?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;

    // Every field went in as a `String`, so the bytes are valid UTF-8.
    let mut out = String::from_utf8_lossy(&bytes).into_owned();
    if out.ends_with('\n') {
        out.pop();
    }
    Ok(out)
}
