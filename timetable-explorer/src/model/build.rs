//! Entity builders: one document record in, one domain entity out.
//!
//! Builders receive the lookups for entities built before them and resolve
//! references eagerly; a dangling reference fails the whole load.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::debug;

use super::error::{LoadError, ReferenceKind};
use crate::document::{
    OcpRecord, OcpTtRecord, OperatingPeriodRecord, TimesAttributes, TimetablePeriodRecord,
    TrainPartRecord, TrainRecord,
};
use crate::domain::{
    Calendar, CalendarIdx, Station, StationIdx, StopKind, TimeOfDay, Train, TrainKind,
    TrainPart, TrainPartIdx, TrainPartRef, TrainPartSequence, TrainPartStop, parse_component,
};

/// Scope of the times record preferred over the others on a stop.
pub const PUBLISHED_SCOPE: &str = "published";

/// The validity window shared by every calendar of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Parse a `YYYY-MM-DD` date, ignoring any `T...` time part.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, LoadError> {
    let date = value.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| LoadError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn parse_number(field: &'static str, value: &str) -> Result<u32, LoadError> {
    value.trim().parse().map_err(|_| LoadError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_time(value: Option<&str>) -> Result<Option<TimeOfDay>, LoadError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => TimeOfDay::parse(text)
            .map(Some)
            .map_err(|source| LoadError::InvalidTime {
                value: text.to_string(),
                source,
            }),
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn resolve<Idx: Copy>(
    lookup: &HashMap<String, Idx>,
    kind: ReferenceKind,
    id: &str,
    context: impl FnOnce() -> String,
) -> Result<Idx, LoadError> {
    lookup
        .get(id.trim())
        .copied()
        .ok_or_else(|| LoadError::UnresolvedReference {
            kind,
            id: id.to_string(),
            context: context(),
        })
}

pub fn build_period(record: &TimetablePeriodRecord) -> Result<Period, LoadError> {
    let attrs = &record.attributes;
    Ok(Period {
        start: parse_date("timetablePeriod.startDate", &attrs.start_date)?,
        end: parse_date("timetablePeriod.endDate", &attrs.end_date)?,
    })
}

/// Build a station. Missing or malformed coordinates leave it without a
/// position rather than failing.
pub fn build_station(record: &OcpRecord) -> Station {
    let attrs = &record.attributes;
    let name = attrs.name.as_deref().unwrap_or_default();
    let code = attrs.code.as_deref().unwrap_or_default();

    let coord = record
        .geo_coord
        .as_ref()
        .and_then(|g| g.attributes.coord.as_deref());
    let mut components = coord.unwrap_or_default().split_whitespace();
    let y = parse_component(components.next());
    let x = parse_component(components.next());

    let registry = record
        .designator
        .as_ref()
        .and_then(|d| non_blank(d.attributes.entry.as_deref()));

    let station = Station::new(attrs.id.trim(), name, code)
        .with_grid(y, x)
        .with_registry_code(registry);
    if !station.has_position() {
        debug!(station = %station.id, "station has no geodata");
    }
    station
}

/// Build a calendar over the document's validity window.
pub fn build_calendar(period: Period, record: &OperatingPeriodRecord) -> Result<Calendar, LoadError> {
    let attrs = &record.attributes;
    let id = attrs.id.trim();
    let calendar = Calendar::parse(id, period.start, period.end, attrs.bit_mask.trim())
        .map_err(|source| LoadError::MalformedCalendar {
            id: id.to_string(),
            source,
        })?;
    Ok(calendar.with_label(
        attrs.name.as_deref().unwrap_or_default(),
        attrs.description.as_deref().unwrap_or_default(),
    ))
}

/// The times record a stop uses: the published one if present, else the
/// last listed.
pub fn select_times(record: &OcpTtRecord) -> Option<&TimesAttributes> {
    let all = record.times.as_slice();
    all.iter()
        .find(|t| t.attributes.scope.as_deref().map(str::trim) == Some(PUBLISHED_SCOPE))
        .or_else(|| all.last())
        .map(|t| &t.attributes)
}

pub fn build_stop(
    record: &OcpTtRecord,
    part_id: &str,
    stations: &HashMap<String, StationIdx>,
) -> Result<TrainPartStop, LoadError> {
    let attrs = &record.attributes;
    let station = resolve(stations, ReferenceKind::Station, &attrs.ocp_ref, || {
        format!("train part {part_id}")
    })?;

    let mut stop = TrainPartStop::new(
        station,
        StopKind::parse(attrs.ocp_type.as_deref().unwrap_or_default()),
    );
    stop.track_info = non_blank(attrs.track_info.as_deref());
    if let Some(times) = select_times(record) {
        stop.arrival = parse_time(times.arrival.as_deref())?;
        stop.departure = parse_time(times.departure.as_deref())?;
    }
    Ok(stop)
}

/// Build a train part; its calendar reference must resolve.
pub fn build_train_part(
    record: &TrainPartRecord,
    calendars: &HashMap<String, CalendarIdx>,
    stations: &HashMap<String, StationIdx>,
) -> Result<TrainPart, LoadError> {
    let attrs = &record.attributes;
    let id = attrs.id.trim();

    let reference = record
        .operating_period_ref
        .as_ref()
        .ok_or_else(|| LoadError::MissingAttribute {
            element: format!("train part {id}"),
            attribute: "operatingPeriodRef",
        })?;
    let calendar = resolve(
        calendars,
        ReferenceKind::Calendar,
        &reference.attributes.reference,
        || format!("train part {id}"),
    )?;

    let mut part = TrainPart::new(id, calendar);
    part.name = attrs.name.clone().unwrap_or_default();
    part.line = attrs.line.clone().unwrap_or_default();
    part.train_number = non_blank(attrs.train_number.as_deref());
    part.category_ref = non_blank(attrs.category_ref.as_deref());
    part.cancelled = attrs
        .cancellation
        .as_deref()
        .is_some_and(|c| c.trim().eq_ignore_ascii_case("true"));
    part.stops = record
        .ocps_tt
        .ocp_tt
        .iter()
        .map(|stop| build_stop(stop, id, stations))
        .collect::<Result<_, _>>()?;
    Ok(part)
}

/// Build a train; every train part reference must resolve.
pub fn build_train(
    record: &TrainRecord,
    parts: &HashMap<String, TrainPartIdx>,
) -> Result<Train, LoadError> {
    let attrs = &record.attributes;
    let id = attrs.id.trim();

    let sequences = record
        .train_part_sequence
        .iter()
        .map(|seq| {
            let refs = seq
                .train_part_ref
                .iter()
                .map(|r| {
                    Ok(TrainPartRef {
                        position: parse_number("trainPartRef.position", &r.attributes.position)?,
                        part: resolve(
                            parts,
                            ReferenceKind::TrainPart,
                            &r.attributes.reference,
                            || format!("train {id}"),
                        )?,
                    })
                })
                .collect::<Result<_, LoadError>>()?;
            Ok(TrainPartSequence {
                sequence: parse_number("trainPartSequence.sequence", &seq.attributes.sequence)?,
                parts: refs,
            })
        })
        .collect::<Result<Vec<_>, LoadError>>()?;

    if sequences.is_empty() {
        debug!(train = id, "train has no train part sequences");
    }

    Ok(Train::new(
        id,
        TrainKind::from_attribute(attrs.kind.as_deref()),
        attrs.train_number.as_deref().unwrap_or_default().trim(),
        non_blank(attrs.additional_train_number.as_deref()),
        attrs.name.as_deref().unwrap_or_default(),
        sequences,
    ))
}
