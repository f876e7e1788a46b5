use thiserror::Error;

/// Errors that can occur during grid operations.
///
/// Missing rows and structural-floor violations are not errors: those
/// mutations return the input store unchanged.
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid import format: {0}")]
    ImportFormat(String),

    #[error("Unknown filter type: {0}")]
    UnknownMatchType(String),

    #[error("Unknown export format: {0}")]
    UnknownFormat(String),

    #[error("Export format not supported on this target: {0}")]
    UnsupportedFormat(String),

    #[error("Clipboard unavailable: {0}")]
    ClipboardUnavailable(String),

    #[error("Preferences error: {0}")]
    Preferences(String),

    #[error("Serialize error: {0}")]
    Serialize(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(not(target_arch = "wasm32"))]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GridError>;
