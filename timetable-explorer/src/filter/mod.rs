//! Train filtering.
//!
//! A [`FilterState`] combines a train-number prefix, related-train
//! expansion and a calendar predicate. [`evaluate_filter`] applies it to a
//! model and classifies every listed train and train part.

mod engine;
mod state;

pub use engine::{
    COMBINED_CALENDAR_ID, FilterResult, NumberFilter, PartClass, SINGLE_DAY_CALENDAR_ID,
    TrainClass, combined_calendar, evaluate_filter, part_passes,
};
pub use state::{CombineOperation, FilterState, MatchingMode, NEGATION_MARKER};
