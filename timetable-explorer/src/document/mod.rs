//! Normalized timetable documents.
//!
//! The XML itself is decoded by an external loader; this module accepts the
//! resulting attribute/child tree as JSON and types it. Nothing here resolves
//! references or validates values beyond their shape; that is the model
//! builder's job.

mod normalize;
mod types;

use std::io::Read;
use std::path::Path;

pub use normalize::OneOrMany;
pub use types::{
    DesignatorAttributes, DesignatorRecord, GeoCoordAttributes, GeoCoordRecord, Infrastructure,
    OcpAttributes, OcpRecord, OcpTtAttributes, OcpTtRecord, OcpsTt, OperatingPeriodAttributes,
    OperatingPeriodRecord, OperatingPeriodRefRecord, OperatingPeriods, OperationControlPoints,
    Railml, RailmlDocument, RefAttributes, Timetable, TimetablePeriodAttributes,
    TimetablePeriodRecord, TimetablePeriods, TimesAttributes, TimesRecord, TrainAttributes,
    TrainPartAttributes, TrainPartRecord, TrainPartRefAttributes, TrainPartRefRecord,
    TrainPartSequenceAttributes, TrainPartSequenceRecord, TrainParts, TrainRecord, Trains,
};

/// Errors while reading a normalized document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// The document could not be read
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or does not have the expected shape
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
}

impl RailmlDocument {
    /// Parse a document from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a document from any reader producing JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self, DocumentError> {
        Ok(serde_json::from_reader(std::io::BufReader::new(reader))?)
    }

    /// Read and parse a document file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file)
    }
}
