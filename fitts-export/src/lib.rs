pub mod csv;
pub mod json;
pub mod sink;

pub use self::csv::{DELIMITER, to_csv};
pub use json::to_json;
pub use sink::{ExportError, ExportPaths, FileSink, RecordSink, export_stem};
