//! Train courses for map playback.
//!
//! A course is the ordered list of halts of a train across all of its
//! parts. Given a time of day, the train's position is interpolated
//! linearly between the surrounding halts.

use serde::Serialize;

use crate::domain::{GeoPosition, MS_PER_DAY, StationIdx, TimeOfDay, TrainIdx, TrainPartIdx};
use crate::model::Model;

/// Time range covered by a selection of trains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub min: TimeOfDay,
    pub max: TimeOfDay,
}

impl TimeWindow {
    /// Midnight to midnight.
    pub const FULL_DAY: TimeWindow = TimeWindow {
        min: TimeOfDay::MIDNIGHT,
        max: TimeOfDay::from_millis(MS_PER_DAY),
    };

    pub fn contains(&self, time: TimeOfDay) -> bool {
        self.min <= time && time <= self.max
    }
}

/// Earliest arrival and latest departure over every call of the trains'
/// parts, passes included.
///
/// Falls back to [`TimeWindow::FULL_DAY`] when the trains have no times or
/// all times coincide.
pub fn selection_window(model: &Model, trains: &[TrainIdx]) -> TimeWindow {
    let calls = trains
        .iter()
        .flat_map(|&t| model.train(t).part_indices())
        .flat_map(|p| model.train_part(p).stops.iter());

    let mut min: Option<TimeOfDay> = None;
    let mut max: Option<TimeOfDay> = None;
    for call in calls {
        if let Some(arrival) = call.arrival_or_departure() {
            min = Some(min.map_or(arrival, |m| m.min(arrival)));
        }
        if let Some(departure) = call.departure_or_arrival() {
            max = Some(max.map_or(departure, |m| m.max(departure)));
        }
    }

    match (min, max) {
        (Some(min), Some(max)) if min < max => TimeWindow { min, max },
        _ => TimeWindow::FULL_DAY,
    }
}

/// One halt on a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CourseStop {
    pub station: StationIdx,
    pub arrival: Option<TimeOfDay>,
    pub departure: Option<TimeOfDay>,
    /// Part the halt was taken from; the first one when parts merge
    pub part: TrainPartIdx,
}

/// Where a train is at a given time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoursePosition {
    /// Unknown if either surrounding station lacks geodata
    pub position: GeoPosition,
    /// Index into [`TrainCourse::stops`] of the halt the train is at or
    /// heading to
    pub current_stop: usize,
}

/// The halts of one train in running order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrainCourse {
    pub train: TrainIdx,
    /// `"id name number"`
    pub label: String,
    pub stops: Vec<CourseStop>,
}

impl TrainCourse {
    /// Collect the halts of `train`.
    ///
    /// Consecutive halts at the same station, as where one part ends and
    /// the next begins, merge into one halt keeping the later departure.
    pub fn build(model: &Model, train: TrainIdx) -> Self {
        let t = model.train(train);
        let mut stops: Vec<CourseStop> = Vec::new();

        for part in t.part_indices() {
            for call in model.train_part(part).halts() {
                match stops.last_mut() {
                    Some(previous) if previous.station == call.station => {
                        previous.departure = call.departure.or(previous.departure);
                    }
                    _ => stops.push(CourseStop {
                        station: call.station,
                        arrival: call.arrival_or_departure(),
                        departure: call.departure_or_arrival(),
                        part,
                    }),
                }
            }
        }

        Self {
            train,
            label: format!("{} {} {}", t.id, t.name, t.number),
            stops,
        }
    }

    /// Position at `time`, or `None` for courses with fewer than two halts.
    ///
    /// Before the first halt the train sits at it; after the last it sits at
    /// the last. Between halts the position is interpolated by time.
    pub fn position_at(&self, model: &Model, time: TimeOfDay) -> Option<CoursePosition> {
        let last = self.stops.len().checked_sub(1)?;
        if last == 0 {
            return None;
        }

        let mut previous = last;
        let mut next = last;
        let mut ratio = 0.0;

        for (i, stop) in self.stops.iter().enumerate() {
            let Some(arrival) = stop.arrival else {
                continue;
            };
            if time < arrival {
                previous = i.saturating_sub(1);
                next = i;
                ratio = self.stops[previous]
                    .departure
                    .map_or(0.0, |departure| progress(departure, arrival, time));
                break;
            }
            if stop.departure.is_some_and(|departure| time <= departure) {
                previous = i;
                next = i;
                break;
            }
        }

        let from = model.station(self.stops[previous].station).position;
        let to = model.station(self.stops[next].station).position;
        Some(CoursePosition {
            position: from.lerp(&to, ratio),
            current_stop: next,
        })
    }

    /// The halt the train is at or heading to at `time`.
    pub fn current_stop(&self, model: &Model, time: TimeOfDay) -> Option<&CourseStop> {
        self.position_at(model, time)
            .and_then(|p| self.stops.get(p.current_stop))
    }
}

/// Share of the run from `departure` to `arrival` completed at `time`.
fn progress(departure: TimeOfDay, arrival: TimeOfDay, time: TimeOfDay) -> f64 {
    let span = arrival.as_millis().saturating_sub(departure.as_millis());
    if span == 0 {
        return 0.0;
    }
    let done = time.as_millis().saturating_sub(departure.as_millis());
    (done as f64 / span as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn model() -> Model {
        Model::from_document(&fixtures::document()).unwrap()
    }

    fn hm(h: u64, m: u64) -> TimeOfDay {
        TimeOfDay::from_hms(h, m, 0)
    }

    #[test]
    fn window_over_selected_trains() {
        let model = model();
        let t101 = model.find_train("t101").unwrap();
        let t901 = model.find_train("t901").unwrap();

        let w = selection_window(&model, &[t101]);
        assert_eq!(w.min, hm(8, 0));
        assert_eq!(w.max, hm(8, 50));

        // Runs past midnight without wrapping
        let w = selection_window(&model, &[t901]);
        assert_eq!(w.min, hm(23, 50));
        assert_eq!(w.max, hm(24, 10));

        let w = selection_window(&model, &[t101, t901]);
        assert_eq!(w.min, hm(8, 0));
        assert_eq!(w.max, hm(24, 10));
        assert!(w.contains(hm(12, 0)));
    }

    #[test]
    fn empty_selection_spans_the_day() {
        let model = model();
        assert_eq!(selection_window(&model, &[]), TimeWindow::FULL_DAY);
        assert_eq!(TimeWindow::FULL_DAY.max.as_millis(), MS_PER_DAY);
    }

    #[test]
    fn course_merges_halts_at_part_boundary() {
        let model = model();
        let course = TrainCourse::build(&model, model.find_train("t101").unwrap());
        let chur = model.find_station("o1").unwrap();
        let landquart = model.find_station("o2").unwrap();

        let stations: Vec<_> = course.stops.iter().map(|s| s.station).collect();
        assert_eq!(stations, vec![chur, landquart, chur]);

        // A arrives 08:20, B departs 08:25; the pass at Zizers is skipped
        assert_eq!(course.stops[1].arrival, Some(hm(8, 20)));
        assert_eq!(course.stops[1].departure, Some(hm(8, 25)));
        assert_eq!(course.stops[1].part, model.find_train_part("A").unwrap());
        assert_eq!(course.label, "t101  101");
    }

    #[test]
    fn position_interpolates_between_halts() {
        let model = model();
        let course = TrainCourse::build(&model, model.find_train("t101").unwrap());
        let chur = model.station(model.find_station("o1").unwrap()).position;
        let landquart = model.station(model.find_station("o2").unwrap()).position;

        let halfway = course.position_at(&model, hm(8, 10)).unwrap();
        assert_eq!(halfway.current_stop, 1);
        assert!((halfway.position.lat - (chur.lat + landquart.lat) / 2.0).abs() < 1e-9);
        assert!((halfway.position.lon - (chur.lon + landquart.lon) / 2.0).abs() < 1e-9);

        let dwelling = course.position_at(&model, hm(8, 22)).unwrap();
        assert_eq!(dwelling.current_stop, 1);
        assert_eq!(dwelling.position, landquart);

        let before = course.position_at(&model, hm(7, 0)).unwrap();
        assert_eq!(before.current_stop, 0);
        assert_eq!(before.position, chur);

        let after = course.position_at(&model, hm(9, 0)).unwrap();
        assert_eq!(after.current_stop, 2);
        assert_eq!(after.position, chur);

        assert_eq!(
            course.current_stop(&model, hm(8, 40)).map(|s| s.station),
            model.find_station("o1")
        );
    }

    #[test]
    fn short_course_has_no_position() {
        let model = model();
        let mut course = TrainCourse::build(&model, model.find_train("t102").unwrap());
        assert_eq!(course.stops.len(), 2);
        course.stops.truncate(1);
        assert!(course.position_at(&model, hm(10, 0)).is_none());
    }

    #[test]
    fn unknown_geodata_yields_unknown_position() {
        let model = model();
        // 201 runs from Zizers, which has no coordinates
        let course = TrainCourse::build(&model, model.find_train("t201").unwrap());
        let p = course.position_at(&model, hm(6, 5)).unwrap();
        assert!(!p.position.is_known());
        assert_eq!(p.current_stop, 1);
    }

    #[test]
    fn progress_is_clamped() {
        assert_eq!(progress(hm(8, 0), hm(8, 0), hm(8, 0)), 0.0);
        assert_eq!(progress(hm(8, 0), hm(9, 0), hm(8, 30)), 0.5);
        assert_eq!(progress(hm(8, 0), hm(9, 0), hm(7, 0)), 0.0);
        assert_eq!(progress(hm(8, 0), hm(9, 0), hm(10, 0)), 1.0);
    }
}
