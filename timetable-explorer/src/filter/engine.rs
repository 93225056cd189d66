//! Filter evaluation.
//!
//! [`evaluate_filter`] is a pure function of a model and a filter state. It
//! never fails: unknown calendar ids and out-of-window dates just contribute
//! no operating days.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::state::{CombineOperation, FilterState, MatchingMode, NEGATION_MARKER};
use crate::domain::{Calendar, TrainIdx, TrainKind, TrainPartIdx};
use crate::model::{Model, compare_labels};

/// Identifier given to the derived filter calendar.
pub const COMBINED_CALENDAR_ID: &str = "combined";

/// Identifier given to the one-day calendar synthesized from a single date.
pub const SINGLE_DAY_CALENDAR_ID: &str = "single-day";

/// A parsed train-number filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumberFilter {
    /// Empty text matches every train
    All,
    /// Number starts with the lowercase prefix
    StartsWith(String),
    /// Number does not start with the lowercase prefix
    NotStartsWith(String),
}

impl NumberFilter {
    /// Parse filter text. Matching is case-insensitive on trimmed text, so
    /// the prefix is stored lowercase.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return NumberFilter::All;
        }
        match text.strip_prefix(NEGATION_MARKER) {
            Some(rest) => NumberFilter::NotStartsWith(rest.trim().to_lowercase()),
            None => NumberFilter::StartsWith(text.to_lowercase()),
        }
    }

    pub fn matches(&self, number: &str) -> bool {
        let number = number.trim().to_lowercase();
        match self {
            NumberFilter::All => true,
            NumberFilter::StartsWith(prefix) => number.starts_with(prefix.as_str()),
            NumberFilter::NotStartsWith(prefix) => !number.starts_with(prefix.as_str()),
        }
    }
}

/// Why a train is in a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TrainClass {
    /// Its number matched the filter text
    Matched,
    /// It was pulled in through a matched train's relations
    Related,
    /// No part passed the calendar test; kept dimmed
    GreyedOut,
}

/// How a train part of a listed train is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PartClass {
    Visible,
    GreyedOut,
    Hidden,
}

/// One evaluation of a filter state against a model.
///
/// Indices refer to the model the result was computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterResult {
    /// `None` when no calendar filtering applies
    pub combined_calendar: Option<Calendar>,
    /// Listed trains, sorted by number
    pub trains: Vec<TrainIdx>,
    pub commercial_trains: Vec<TrainIdx>,
    pub operational_trains: Vec<TrainIdx>,
    pub direct_matches: BTreeSet<TrainIdx>,
    pub greyed_out_trains: BTreeSet<TrainIdx>,
    pub greyed_out_parts: BTreeSet<TrainPartIdx>,
    pub hidden_parts: BTreeSet<TrainPartIdx>,
}

impl FilterResult {
    pub fn len(&self) -> usize {
        self.trains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trains.is_empty()
    }

    pub fn contains(&self, train: TrainIdx) -> bool {
        self.trains.contains(&train)
    }

    /// Classification of a listed train, `None` if it is not listed.
    pub fn train_class(&self, train: TrainIdx) -> Option<TrainClass> {
        if !self.contains(train) {
            None
        } else if self.greyed_out_trains.contains(&train) {
            Some(TrainClass::GreyedOut)
        } else if self.direct_matches.contains(&train) {
            Some(TrainClass::Matched)
        } else {
            Some(TrainClass::Related)
        }
    }

    pub fn part_class(&self, part: TrainPartIdx) -> PartClass {
        if self.hidden_parts.contains(&part) {
            PartClass::Hidden
        } else if self.greyed_out_parts.contains(&part) {
            PartClass::GreyedOut
        } else {
            PartClass::Visible
        }
    }

    /// Parts of `train` that are not hidden, in traversal order.
    pub fn shown_parts<'a>(
        &'a self,
        model: &'a Model,
        train: TrainIdx,
    ) -> impl Iterator<Item = TrainPartIdx> + 'a {
        model
            .train(train)
            .part_indices()
            .filter(|&p| self.part_class(p) != PartClass::Hidden)
    }
}

/// Returns true if a part running on `part_calendar` passes the calendar
/// test against `combined`.
pub fn part_passes(part_calendar: &Calendar, combined: &Calendar, mode: MatchingMode) -> bool {
    match mode {
        MatchingMode::Any => part_calendar.intersects_with(combined),
        MatchingMode::All => part_calendar.contains(combined),
    }
}

/// Derive the filter calendar from the selected calendars and single date.
///
/// Returns `None` when neither contributes an operand. The result spans the
/// model's validity window.
pub fn combined_calendar(model: &Model, state: &FilterState) -> Option<Calendar> {
    let (start, end) = (model.start_date(), model.end_date());

    let mut operands: Vec<&Calendar> = Vec::with_capacity(state.selected_calendars.len());
    for id in &state.selected_calendars {
        match model.find_calendar(id) {
            Some(idx) => operands.push(model.calendar(idx)),
            None => debug!(calendar = %id, "ignoring unknown calendar in selection"),
        }
    }

    let single_day = state.single_date.map(|date| {
        Calendar::single_day(SINGLE_DAY_CALENDAR_ID, start, end, date).unwrap_or_else(|err| {
            debug!(%err, "single date contributes no operating day");
            Calendar::filled(SINGLE_DAY_CALENDAR_ID, start, end, false)
        })
    });
    operands.extend(single_day.as_ref());

    if operands.is_empty() {
        return None;
    }

    let combined = match state.combine {
        Some(CombineOperation::Union) => operands
            .iter()
            .fold(Calendar::filled(COMBINED_CALENDAR_ID, start, end, false), |acc, c| {
                acc.union(c)
            }),
        Some(CombineOperation::Intersect) => operands
            .iter()
            .fold(Calendar::filled(COMBINED_CALENDAR_ID, start, end, true), |acc, c| {
                acc.intersect(c)
            }),
        None => Calendar::filled(COMBINED_CALENDAR_ID, start, end, true),
    };
    Some(combined)
}

/// Evaluate `state` against `model`.
pub fn evaluate_filter(model: &Model, state: &FilterState) -> FilterResult {
    let combined = combined_calendar(model, state);
    let number_filter = NumberFilter::parse(&state.train_number);

    let direct_matches: BTreeSet<TrainIdx> = (0..model.trains().len())
        .map(TrainIdx)
        .filter(|&t| number_filter.matches(&model.train(t).number))
        .collect();

    let mut candidates = direct_matches.clone();
    if state.show_related {
        for &t in &direct_matches {
            candidates.extend(model.related_closure(t).iter().copied());
        }
    }

    let mut trains = Vec::with_capacity(candidates.len());
    let mut greyed_out_trains = BTreeSet::new();
    let mut greyed_out_parts = BTreeSet::new();
    let mut hidden_parts = BTreeSet::new();

    for t in candidates {
        let Some(filter_calendar) = &combined else {
            trains.push(t);
            continue;
        };

        let mut any_passed = false;
        for part in model.train(t).part_indices() {
            if part_passes(model.part_calendar(part), filter_calendar, state.matching_mode) {
                any_passed = true;
            } else if state.grey_out {
                greyed_out_parts.insert(part);
            } else {
                hidden_parts.insert(part);
            }
        }

        if any_passed {
            trains.push(t);
        } else if state.grey_out {
            greyed_out_trains.insert(t);
            trains.push(t);
        }
    }

    trains.sort_by(|a, b| {
        compare_labels(&model.train(*a).number, &model.train(*b).number).then(a.cmp(b))
    });

    let (commercial_trains, operational_trains): (Vec<_>, Vec<_>) = trains
        .iter()
        .copied()
        .partition(|&t| model.train(t).kind == TrainKind::Commercial);

    debug!(
        direct = direct_matches.len(),
        listed = trains.len(),
        greyed_trains = greyed_out_trains.len(),
        greyed_parts = greyed_out_parts.len(),
        hidden_parts = hidden_parts.len(),
        "filter evaluated"
    );

    FilterResult {
        combined_calendar: combined,
        trains,
        commercial_trains,
        operational_trains,
        direct_matches,
        greyed_out_trains,
        greyed_out_parts,
        hidden_parts,
    }
}


#[cfg(test)]
#[path = "engine_tests.rs"]
mod scenario_tests;
