//! Model loading errors.
//!
//! Every variant is fatal to the load that raised it: a model is either
//! fully built and wired or not produced at all.

use std::fmt;

use crate::domain::{CalendarError, TimeError};

/// The kind of entity a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Station,
    Calendar,
    TrainPart,
    Train,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Station => f.write_str("station"),
            ReferenceKind::Calendar => f.write_str("calendar"),
            ReferenceKind::TrainPart => f.write_str("train part"),
            ReferenceKind::Train => f.write_str("train"),
        }
    }
}

/// Errors while building a model from a document.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    /// A reference names an entity that does not exist
    #[error("unresolved {kind} reference '{id}' in {context}")]
    UnresolvedReference {
        kind: ReferenceKind,
        id: String,
        context: String,
    },

    /// A calendar bitmask does not fit the timetable period
    #[error("calendar '{id}' is malformed: {source}")]
    MalformedCalendar { id: String, source: CalendarError },

    /// The document has no timetable period
    #[error("document has no timetable period")]
    MissingTimetablePeriod,

    /// A required attribute or child element is absent
    #[error("{element} is missing {attribute}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    /// A date attribute is not `YYYY-MM-DD`
    #[error("invalid date in {field}: '{value}'")]
    InvalidDate { field: &'static str, value: String },

    /// A numeric attribute is not a non-negative integer
    #[error("invalid number in {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// A stop time is not `HH:MM:SS`
    #[error("invalid time '{value}': {source}")]
    InvalidTime { value: String, source: TimeError },

    /// Two entities of the same kind share an identifier
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: ReferenceKind, id: String },
}
