use std::path::PathBuf;

/// Failures while reading call exports. All of them are terminal for the run.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("No call rows found in the provided input")]
    EmptyInput,

    #[error("Required column '{column}' missing in {file}")]
    MissingColumn { column: String, file: String },

    #[error("No outcome tag for {file}: add a '{column}' column, pass --tag, or name the file after a tag")]
    MissingTag { column: String, file: String },

    #[error("No row carries a recognized outcome tag (checked {rows} rows)")]
    NoRecognizedTag { rows: usize },

    #[error("No files found matching: {0}")]
    NoMatch(String),

    #[error("Cannot determine format for: {}", .0.display())]
    UnknownFormat(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures while reading or writing a report workbook.
///
/// `UnknownSchema` and `Corrupted` are kept apart so the caller can tell
/// "not an analysis report" from "a report we could not read".
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Unrecognized report structure: no statistics sheet found (sheets: {})", .sheets.join(", "))]
    UnknownSchema { sheets: Vec<String> },

    #[error("Invalid structure: column '{column}' missing in sheet '{sheet}'")]
    MissingColumn { column: String, sheet: String },

    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),

    #[error("Report is corrupted: {0}")]
    Corrupted(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write sheet {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
