use crate::error::{GridError, Result};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File formats the grid can export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xls,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Json,
        ExportFormat::Csv,
        ExportFormat::Xls,
        ExportFormat::Xlsx,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Xls => "xls",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xls => "application/vnd.ms-excel",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }

    /// Guess the format from a file name's extension
    pub fn from_path(path: &str) -> Option<Self> {
        let (_, ext) = path.rsplit_once('.')?;
        ext.parse().ok()
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|format| format.extension() == lower)
            .ok_or_else(|| GridError::UnknownFormat(s.to_string()))
    }
}

/// An encoded export ready to hand to a download or a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Base name plus the format extension
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl Store {
    /// Encode the store in `format`. `file_name` is the base name without an
    /// extension; the JSON envelope records it verbatim.
    pub fn export(&self, format: ExportFormat, file_name: &str, timestamp: DateTime<Utc>) -> Result<ExportFile> {
        let bytes = match format {
            ExportFormat::Json => self.to_json_export(file_name, timestamp)?.into_bytes(),
            ExportFormat::Csv => self.to_csv_string()?.into_bytes(),
            ExportFormat::Xls => self.to_xls_bytes()?,
            #[cfg(not(target_arch = "wasm32"))]
            ExportFormat::Xlsx => self.to_xlsx_bytes()?,
            #[cfg(target_arch = "wasm32")]
            ExportFormat::Xlsx => return Err(GridError::UnsupportedFormat(format.to_string())),
        };
        tracing::debug!(%format, bytes = bytes.len(), "store exported");
        Ok(ExportFile {
            file_name: format!("{file_name}.{}", format.extension()),
            mime_type: format.mime_type(),
            bytes,
        })
    }
}
