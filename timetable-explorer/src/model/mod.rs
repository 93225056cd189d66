//! The timetable model: every entity of one document, wired.
//!
//! A [`Model`] is built in one go by [`Model::from_document`]: stations,
//! calendars, train parts and trains are built in dependency order, then the
//! relation passes run. The result is immutable and cheap to share behind an
//! `Arc`.

mod build;
mod error;
mod relations;

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use tracing::{info, warn};

pub use build::{PUBLISHED_SCOPE, Period, parse_date, select_times};
pub use error::{LoadError, ReferenceKind};
pub use relations::{
    PartLabels, Relations, back_references, part_labels, related_trains, transitive_closure,
};

use crate::document::RailmlDocument;
use crate::domain::{
    Calendar, CalendarIdx, MonthSpan, Station, StationIdx, Train, TrainIdx, TrainKind, TrainPart,
    TrainPartIdx, month_spans, window_len,
};

/// Order display strings the way a locale-aware comparison would:
/// case-insensitive first, lowercase before uppercase on ties.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Insert `id` into an id map, rejecting repeats.
fn register<Idx: Copy>(
    ids: &mut HashMap<String, Idx>,
    kind: ReferenceKind,
    id: &str,
    idx: Idx,
) -> Result<(), LoadError> {
    if ids.insert(id.to_string(), idx).is_some() {
        return Err(LoadError::DuplicateId {
            kind,
            id: id.to_string(),
        });
    }
    Ok(())
}

/// The loaded timetable.
#[derive(Debug, Clone)]
pub struct Model {
    period: Period,

    stations: Vec<Station>,
    station_ids: HashMap<String, StationIdx>,
    calendars: Vec<Calendar>,
    calendar_ids: HashMap<String, CalendarIdx>,
    parts: Vec<TrainPart>,
    part_ids: HashMap<String, TrainPartIdx>,
    trains: Vec<Train>,
    train_ids: HashMap<String, TrainIdx>,

    relations: Relations,

    trains_by_number: Vec<TrainIdx>,
    calendars_by_id: Vec<CalendarIdx>,
    commercial_numbers: BTreeSet<String>,
}

impl Model {
    /// Build and wire a model from a normalized document.
    ///
    /// Fails on the first dangling reference, malformed calendar or
    /// duplicate identifier; nothing partially built is returned.
    pub fn from_document(doc: &RailmlDocument) -> Result<Self, LoadError> {
        let railml = &doc.railml;
        let timetable = &railml.timetable;

        let periods = &timetable.timetable_periods.timetable_period;
        let period_record = periods.first().ok_or(LoadError::MissingTimetablePeriod)?;
        if periods.len() > 1 {
            warn!(
                periods = periods.len(),
                "document has several timetable periods, using the first"
            );
        }
        let period = build::build_period(period_record)?;

        let mut stations = Vec::new();
        let mut station_ids = HashMap::new();
        for record in railml.infrastructure.operation_control_points.ocp.iter() {
            let station = build::build_station(record);
            register(
                &mut station_ids,
                ReferenceKind::Station,
                &station.id,
                StationIdx(stations.len()),
            )?;
            stations.push(station);
        }

        let mut calendars = Vec::new();
        let mut calendar_ids = HashMap::new();
        for record in timetable.operating_periods.operating_period.iter() {
            let calendar = build::build_calendar(period, record)?;
            register(
                &mut calendar_ids,
                ReferenceKind::Calendar,
                calendar.id(),
                CalendarIdx(calendars.len()),
            )?;
            calendars.push(calendar);
        }

        let mut parts = Vec::new();
        let mut part_ids = HashMap::new();
        for record in timetable.train_parts.train_part.iter() {
            let part = build::build_train_part(record, &calendar_ids, &station_ids)?;
            register(
                &mut part_ids,
                ReferenceKind::TrainPart,
                &part.id,
                TrainPartIdx(parts.len()),
            )?;
            parts.push(part);
        }

        let mut trains = Vec::new();
        let mut train_ids = HashMap::new();
        for record in timetable.trains.train.iter() {
            let train = build::build_train(record, &part_ids)?;
            register(
                &mut train_ids,
                ReferenceKind::Train,
                &train.id,
                TrainIdx(trains.len()),
            )?;
            trains.push(train);
        }

        let relations = Relations::resolve(&trains, parts.len());

        let mut trains_by_number: Vec<TrainIdx> = (0..trains.len()).map(TrainIdx).collect();
        trains_by_number.sort_by(|a, b| {
            compare_labels(&trains[a.0].number, &trains[b.0].number).then(a.cmp(b))
        });

        let mut calendars_by_id: Vec<CalendarIdx> = (0..calendars.len()).map(CalendarIdx).collect();
        calendars_by_id.sort_by(|a, b| {
            compare_labels(calendars[a.0].id(), calendars[b.0].id()).then(a.cmp(b))
        });

        let commercial_numbers = trains
            .iter()
            .filter(|t| t.kind == TrainKind::Commercial)
            .map(|t| t.number.clone())
            .collect();

        info!(
            start = %period.start,
            end = %period.end,
            stations = stations.len(),
            calendars = calendars.len(),
            train_parts = parts.len(),
            trains = trains.len(),
            "model loaded"
        );

        Ok(Self {
            period,
            stations,
            station_ids,
            calendars,
            calendar_ids,
            parts,
            part_ids,
            trains,
            train_ids,
            relations,
            trains_by_number,
            calendars_by_id,
            commercial_numbers,
        })
    }

    /// First day of the validity window.
    pub fn start_date(&self) -> NaiveDate {
        self.period.start
    }

    /// Last day of the validity window (inclusive).
    pub fn end_date(&self) -> NaiveDate {
        self.period.end
    }

    /// Number of days in the validity window.
    pub fn window_len(&self) -> usize {
        window_len(self.period.start, self.period.end)
    }

    /// The validity window split into calendar months.
    pub fn month_spans(&self) -> Vec<MonthSpan> {
        month_spans(self.period.start, self.period.end)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn calendars(&self) -> &[Calendar] {
        &self.calendars
    }

    pub fn train_parts(&self) -> &[TrainPart] {
        &self.parts
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    // Indices handed out by this model are always in range; indexing with
    // an index from another model panics.

    pub fn station(&self, idx: StationIdx) -> &Station {
        &self.stations[idx.0]
    }

    pub fn calendar(&self, idx: CalendarIdx) -> &Calendar {
        &self.calendars[idx.0]
    }

    pub fn train_part(&self, idx: TrainPartIdx) -> &TrainPart {
        &self.parts[idx.0]
    }

    pub fn train(&self, idx: TrainIdx) -> &Train {
        &self.trains[idx.0]
    }

    /// The calendar a train part runs on.
    pub fn part_calendar(&self, idx: TrainPartIdx) -> &Calendar {
        self.calendar(self.train_part(idx).calendar)
    }

    pub fn find_station(&self, id: &str) -> Option<StationIdx> {
        self.station_ids.get(id).copied()
    }

    pub fn find_calendar(&self, id: &str) -> Option<CalendarIdx> {
        self.calendar_ids.get(id).copied()
    }

    pub fn find_train_part(&self, id: &str) -> Option<TrainPartIdx> {
        self.part_ids.get(id).copied()
    }

    pub fn find_train(&self, id: &str) -> Option<TrainIdx> {
        self.train_ids.get(id).copied()
    }

    /// All trains, sorted by number.
    pub fn trains_by_number(&self) -> &[TrainIdx] {
        &self.trains_by_number
    }

    /// Trains of one kind, sorted by number.
    pub fn trains_of_kind(&self, kind: TrainKind) -> impl Iterator<Item = TrainIdx> + '_ {
        self.trains_by_number
            .iter()
            .copied()
            .filter(move |&t| self.train(t).kind == kind)
    }

    /// All calendars, sorted by id.
    pub fn calendars_by_id(&self) -> &[CalendarIdx] {
        &self.calendars_by_id
    }

    /// Display numbers of all commercial trains.
    pub fn commercial_train_numbers(&self) -> &BTreeSet<String> {
        &self.commercial_numbers
    }

    pub fn relations(&self) -> &Relations {
        &self.relations
    }

    /// Trains that use a train part.
    pub fn referenced_by(&self, part: TrainPartIdx) -> &BTreeSet<TrainIdx> {
        self.relations.referenced_by(part)
    }

    /// Number of trains using a train part.
    pub fn times_referenced(&self, part: TrainPartIdx) -> usize {
        self.referenced_by(part).len()
    }

    /// Trains sharing at least one train part with `train`.
    pub fn related_trains(&self, train: TrainIdx) -> &BTreeSet<TrainIdx> {
        self.relations.related(train)
    }

    /// Trains transitively related to `train`.
    pub fn related_closure(&self, train: TrainIdx) -> &BTreeSet<TrainIdx> {
        self.relations.closure(train)
    }

    /// Own complexity times the summed own complexity of the directly
    /// related trains.
    pub fn complexity(&self, train: TrainIdx) -> usize {
        let related: usize = self
            .related_trains(train)
            .iter()
            .map(|&t| self.train(t).own_complexity())
            .sum();
        self.train(train).own_complexity() * related
    }

    /// Cached commercial/operational train numbers of a part.
    pub fn part_labels(&self, part: TrainPartIdx) -> Option<&PartLabels> {
        self.relations.labels(part)
    }

    /// Station of the part's first call.
    pub fn part_origin(&self, part: TrainPartIdx) -> Option<&Station> {
        self.train_part(part)
            .first_stop()
            .map(|s| self.station(s.station))
    }

    /// Station of the part's last call.
    pub fn part_destination(&self, part: TrainPartIdx) -> Option<&Station> {
        self.train_part(part)
            .last_stop()
            .map(|s| self.station(s.station))
    }

    /// `"FROM - TO (calendarId)"` using station short codes.
    pub fn part_route_label(&self, part: TrainPartIdx) -> String {
        let code = |s: Option<&Station>| s.map(Station::short_code).unwrap_or_default();
        format!(
            "{} - {} ({})",
            code(self.part_origin(part)),
            code(self.part_destination(part)),
            self.part_calendar(part).id()
        )
    }

    /// `"CODE - Name"` labels of the calls where the part halts.
    pub fn part_stop_labels(&self, part: TrainPartIdx) -> Vec<String> {
        self.train_part(part)
            .halts()
            .map(|s| self.station(s.station).label())
            .collect()
    }
}
