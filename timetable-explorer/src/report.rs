//! Serializable views of a filter result.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Calendar, FlatPartRef, TrainIdx, TrainKind};
use crate::filter::{FilterResult, PartClass, TrainClass};
use crate::hints;
use crate::model::Model;

/// A filter result resolved against its model.
#[derive(Debug, Serialize)]
pub struct FilterReport {
    /// First day of the validity window
    pub start_date: NaiveDate,

    /// Last day of the validity window
    pub end_date: NaiveDate,

    /// The derived filter calendar, if calendar filtering applied
    pub combined_calendar: Option<CalendarSummary>,

    /// Listed trains, sorted by number
    pub trains: Vec<TrainRow>,

    /// Numbers of the listed commercial trains
    pub commercial: Vec<String>,

    /// Numbers of the listed operational trains
    pub operational: Vec<String>,
}

/// A calendar with its statistics.
#[derive(Debug, Serialize)]
pub struct CalendarSummary {
    pub id: String,
    pub name: String,

    /// One `0`/`1` per day
    pub mask: String,

    /// One filled or hollow square per day
    pub glyphs: String,

    pub active_days: usize,
    pub first_active: Option<NaiveDate>,
    pub last_active: Option<NaiveDate>,

    /// CSS gradient derived from the id
    pub color: String,
}

/// A listed train.
#[derive(Debug, Serialize)]
pub struct TrainRow {
    pub id: String,
    pub number: String,
    pub name: String,
    pub kind: TrainKind,
    pub class: TrainClass,
    pub complexity: usize,

    /// CSS colour
    pub color: &'static str,

    /// Numbers of the directly related trains
    pub related: Vec<String>,

    /// Train parts in display order, hidden ones left out
    pub parts: Vec<PartRow>,
}

/// A train part reference of a listed train.
#[derive(Debug, Serialize)]
pub struct PartRow {
    pub id: String,
    pub sequence: u32,
    pub span: usize,
    pub position: u32,
    pub position_offset: u32,

    /// `"FROM - TO (calendarId)"`
    pub route: String,

    pub calendar: String,
    pub class: PartClass,

    /// Number of trains using this part
    pub times_referenced: usize,

    /// CSS colours for the part and its sequence
    pub color: String,
    pub sequence_color: String,
}

impl CalendarSummary {
    pub fn new(calendar: &Calendar) -> Self {
        Self {
            id: calendar.id().to_string(),
            name: calendar.name().to_string(),
            mask: calendar.mask(),
            glyphs: calendar.glyphs(),
            active_days: calendar.active_days(),
            first_active: calendar.first_active(),
            last_active: calendar.last_active(),
            color: hints::calendar_color(calendar.id()),
        }
    }
}

impl PartRow {
    fn new(model: &Model, result: &FilterResult, flat: &FlatPartRef) -> Self {
        let part = model.train_part(flat.part);
        let class = result.part_class(flat.part);
        Self {
            id: part.id.clone(),
            sequence: flat.sequence,
            span: flat.span,
            position: flat.position,
            position_offset: flat.position_offset,
            route: model.part_route_label(flat.part),
            calendar: model.part_calendar(flat.part).id().to_string(),
            class,
            times_referenced: model.times_referenced(flat.part),
            color: hints::part_color(&part.id, class == PartClass::GreyedOut),
            sequence_color: hints::sequence_color(flat.sequence),
        }
    }
}

impl TrainRow {
    fn new(model: &Model, result: &FilterResult, idx: TrainIdx) -> Self {
        let train = model.train(idx);
        let class = result.train_class(idx).unwrap_or(TrainClass::Related);
        Self {
            id: train.id.clone(),
            number: train.number.clone(),
            name: train.name.clone(),
            kind: train.kind,
            class,
            complexity: model.complexity(idx),
            color: hints::train_color(train.kind, class == TrainClass::GreyedOut),
            related: model
                .related_trains(idx)
                .iter()
                .map(|&t| model.train(t).number.clone())
                .collect(),
            parts: train
                .flat_parts
                .iter()
                .filter(|f| result.part_class(f.part) != PartClass::Hidden)
                .map(|f| PartRow::new(model, result, f))
                .collect(),
        }
    }
}

impl FilterReport {
    /// Resolve `result`, which must come from `model`.
    pub fn new(model: &Model, result: &FilterResult) -> Self {
        let numbers = |trains: &[TrainIdx]| -> Vec<String> {
            trains
                .iter()
                .map(|&t| model.train(t).number.clone())
                .collect()
        };
        Self {
            start_date: model.start_date(),
            end_date: model.end_date(),
            combined_calendar: result.combined_calendar.as_ref().map(CalendarSummary::new),
            trains: result
                .trains
                .iter()
                .map(|&t| TrainRow::new(model, result, t))
                .collect(),
            commercial: numbers(&result.commercial_trains),
            operational: numbers(&result.operational_trains),
        }
    }
}

impl fmt::Display for FilterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "window {} to {}", self.start_date, self.end_date)?;
        if let Some(calendar) = &self.combined_calendar {
            writeln!(
                f,
                "calendar {} ({} days)",
                calendar.glyphs, calendar.active_days
            )?;
        }
        for train in &self.trains {
            let marker = match train.class {
                TrainClass::Matched => '*',
                TrainClass::Related => '+',
                TrainClass::GreyedOut => '-',
            };
            writeln!(f, "{marker} {:<12} {:<11} {}", train.number, train.kind.to_string(), train.id)?;
            for part in &train.parts {
                let dim = if part.class == PartClass::GreyedOut { " (greyed)" } else { "" };
                writeln!(
                    f,
                    "    {}.{} {:<12} {}{dim}",
                    part.sequence, part.position, part.id, part.route
                )?;
            }
        }
        write!(
            f,
            "{} trains ({} commercial, {} operational)",
            self.trains.len(),
            self.commercial.len(),
            self.operational.len()
        )
    }
}
