//! Train parts: one contiguous scheduled run under one calendar.

use super::{CalendarIdx, TrainPartStop};

/// One contiguous scheduled segment of a train.
///
/// The calendar is shared: many train parts refer to the same calendar
/// index. Which trains use this part is a derived relation held by the
/// model, not stored here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainPart {
    pub id: String,
    pub name: String,
    /// Line label, e.g. "S1"
    pub line: String,
    /// Train number attribute of the part itself, if present
    pub train_number: Option<String>,
    pub category_ref: Option<String>,
    pub cancelled: bool,
    pub calendar: CalendarIdx,
    /// Stops and passes in running order
    pub stops: Vec<TrainPartStop>,
}

impl TrainPart {
    pub fn new(id: impl Into<String>, calendar: CalendarIdx) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            line: String::new(),
            train_number: None,
            category_ref: None,
            cancelled: false,
            calendar,
            stops: Vec::new(),
        }
    }

    /// First call in running order.
    pub fn first_stop(&self) -> Option<&TrainPartStop> {
        self.stops.first()
    }

    /// Last call in running order.
    pub fn last_stop(&self) -> Option<&TrainPartStop> {
        self.stops.last()
    }

    /// Calls where the train halts, skipping passes.
    pub fn halts(&self) -> impl Iterator<Item = &TrainPartStop> {
        self.stops.iter().filter(|s| s.is_stop())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StationIdx, StopKind};

    #[test]
    fn first_last_and_halts() {
        let mut tp = TrainPart::new("tp1", CalendarIdx(0));
        assert!(tp.first_stop().is_none());

        tp.stops = vec![
            TrainPartStop::new(StationIdx(0), StopKind::Stop),
            TrainPartStop::new(StationIdx(1), StopKind::Pass),
            TrainPartStop::new(StationIdx(2), StopKind::Stop),
        ];

        assert_eq!(tp.first_stop().unwrap().station, StationIdx(0));
        assert_eq!(tp.last_stop().unwrap().station, StationIdx(2));
        let halts: Vec<_> = tp.halts().map(|s| s.station).collect();
        assert_eq!(halts, vec![StationIdx(0), StationIdx(2)]);
    }
}
