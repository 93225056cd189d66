//! Calls of a train part at stations.

use std::fmt;

use super::{StationIdx, TimeOfDay};

/// Whether a train part halts at or passes through a station.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StopKind {
    Stop,
    Pass,
    /// Any other classifier, kept verbatim
    Other(String),
}

impl StopKind {
    /// Classify an `ocpType` attribute value.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "stop" => StopKind::Stop,
            "pass" => StopKind::Pass,
            other => StopKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for StopKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopKind::Stop => f.write_str("stop"),
            StopKind::Pass => f.write_str("pass"),
            StopKind::Other(s) => f.write_str(s),
        }
    }
}

/// A train part's passage through one station.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainPartStop {
    pub station: StationIdx,
    pub kind: StopKind,
    /// Free-form track annotation
    pub track_info: Option<String>,
    pub arrival: Option<TimeOfDay>,
    pub departure: Option<TimeOfDay>,
}

impl TrainPartStop {
    pub fn new(station: StationIdx, kind: StopKind) -> Self {
        Self {
            station,
            kind,
            track_info: None,
            arrival: None,
            departure: None,
        }
    }

    /// Returns true if the train halts here.
    pub fn is_stop(&self) -> bool {
        self.kind == StopKind::Stop
    }

    /// Arrival time, falling back to departure for origin stops.
    pub fn arrival_or_departure(&self) -> Option<TimeOfDay> {
        self.arrival.or(self.departure)
    }

    /// Departure time, falling back to arrival for terminal stops.
    pub fn departure_or_arrival(&self) -> Option<TimeOfDay> {
        self.departure.or(self.arrival)
    }
}
