//! Filter configuration.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Prefix that inverts a train-number filter.
pub const NEGATION_MARKER: char = '!';

/// How several selected calendars are merged into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineOperation {
    Union,
    Intersect,
}

impl fmt::Display for CombineOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CombineOperation::Union => f.write_str("union"),
            CombineOperation::Intersect => f.write_str("intersect"),
        }
    }
}

impl FromStr for CombineOperation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(CombineOperation::Union),
            "intersect" => Ok(CombineOperation::Intersect),
            other => Err(format!("unknown combine operation: {other}")),
        }
    }
}

/// How a train part's calendar is tested against the combined calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingMode {
    /// Pass if the part runs on at least one selected day
    #[default]
    Any,
    /// Pass if the part runs on every selected day; the part may also run
    /// on days outside the selection
    All,
}

impl fmt::Display for MatchingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchingMode::Any => f.write_str("any"),
            MatchingMode::All => f.write_str("all"),
        }
    }
}

impl FromStr for MatchingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(MatchingMode::Any),
            "all" => Ok(MatchingMode::All),
            other => Err(format!("unknown matching mode: {other}")),
        }
    }
}

/// Everything the filter engine needs besides the model.
///
/// Calendars are selected by id. Ids that the model does not know are
/// ignored at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    /// Train-number prefix; a leading `!` inverts it
    pub train_number: String,
    /// Expand matches to their transitively related trains
    pub show_related: bool,
    /// Selected calendar ids, kept sorted
    #[serde(deserialize_with = "sorted_ids")]
    pub selected_calendars: Vec<String>,
    pub single_date: Option<NaiveDate>,
    /// `None` makes the combined calendar all days
    pub combine: Option<CombineOperation>,
    pub matching_mode: MatchingMode,
    /// Keep failing trains and parts visible but dimmed instead of hiding them
    pub grey_out: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            train_number: String::new(),
            show_related: true,
            selected_calendars: Vec::new(),
            single_date: None,
            combine: Some(CombineOperation::Union),
            matching_mode: MatchingMode::Any,
            grey_out: true,
        }
    }
}

impl FilterState {
    pub fn with_train_number(mut self, text: impl Into<String>) -> Self {
        self.train_number = text.into();
        self
    }

    pub fn with_show_related(mut self, show: bool) -> Self {
        self.show_related = show;
        self
    }

    /// Replace the calendar selection.
    pub fn with_calendars<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_calendars = ids.into_iter().map(Into::into).collect();
        self.selected_calendars.sort();
        self.selected_calendars.dedup();
        self
    }

    pub fn with_single_date(mut self, date: Option<NaiveDate>) -> Self {
        self.single_date = date;
        self
    }

    pub fn with_combine(mut self, combine: Option<CombineOperation>) -> Self {
        self.combine = combine;
        self
    }

    pub fn with_matching_mode(mut self, mode: MatchingMode) -> Self {
        self.matching_mode = mode;
        self
    }

    pub fn with_grey_out(mut self, grey_out: bool) -> Self {
        self.grey_out = grey_out;
        self
    }

    /// Select `id` if it is not selected, deselect it otherwise.
    ///
    /// The selection comes out sorted even if the field was set unsorted.
    pub fn toggle_calendar(&mut self, id: &str) {
        let before = self.selected_calendars.len();
        self.selected_calendars.retain(|c| c != id);
        if self.selected_calendars.len() == before {
            self.selected_calendars.push(id.to_string());
        }
        self.selected_calendars.sort();
        self.selected_calendars.dedup();
    }

    /// Returns true if any calendar constraint is configured.
    pub fn has_calendar_filter(&self) -> bool {
        !self.selected_calendars.is_empty() || self.single_date.is_some()
    }
}

fn sorted_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut ids = Vec::<String>::deserialize(deserializer)?;
    ids.sort();
    ids.dedup();
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let state = FilterState::default();
        assert!(state.train_number.is_empty());
        assert!(state.show_related);
        assert!(state.selected_calendars.is_empty());
        assert_eq!(state.single_date, None);
        assert_eq!(state.combine, Some(CombineOperation::Union));
        assert_eq!(state.matching_mode, MatchingMode::Any);
        assert!(state.grey_out);
        assert!(!state.has_calendar_filter());
    }

    #[test]
    fn builder_methods() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
        let state = FilterState::default()
            .with_train_number("!10")
            .with_show_related(false)
            .with_calendars(["odd", "daily", "odd"])
            .with_single_date(Some(date))
            .with_combine(Some(CombineOperation::Intersect))
            .with_matching_mode(MatchingMode::All)
            .with_grey_out(false);

        assert_eq!(state.train_number, "!10");
        assert!(!state.show_related);
        assert_eq!(state.selected_calendars, vec!["daily", "odd"]);
        assert_eq!(state.single_date, Some(date));
        assert_eq!(state.combine, Some(CombineOperation::Intersect));
        assert_eq!(state.matching_mode, MatchingMode::All);
        assert!(!state.grey_out);
        assert!(state.has_calendar_filter());
    }

    #[test]
    fn toggle_keeps_selection_sorted() {
        let mut state = FilterState::default();
        state.toggle_calendar("odd");
        state.toggle_calendar("daily");
        state.toggle_calendar("even");
        assert_eq!(state.selected_calendars, vec!["daily", "even", "odd"]);

        state.toggle_calendar("even");
        assert_eq!(state.selected_calendars, vec!["daily", "odd"]);
    }

    #[test]
    fn deserialized_selection_is_sorted_before_toggling() {
        let mut state: FilterState =
            serde_json::from_str(r#"{"selectedCalendars": ["odd", "even", "daily", "odd"]}"#)
                .unwrap();
        assert_eq!(state.selected_calendars, vec!["daily", "even", "odd"]);

        state.toggle_calendar("daily");
        assert_eq!(state.selected_calendars, vec!["even", "odd"]);
    }

    #[test]
    fn toggle_sorts_an_unsorted_selection() {
        let mut state = FilterState::default();
        state.selected_calendars = vec!["odd".into(), "even".into(), "daily".into()];

        state.toggle_calendar("daily");
        assert_eq!(state.selected_calendars, vec!["even", "odd"]);
        state.toggle_calendar("daily");
        assert_eq!(state.selected_calendars, vec!["daily", "even", "odd"]);
    }

    #[test]
    fn parse_enums() {
        assert_eq!("Union".parse::<CombineOperation>(), Ok(CombineOperation::Union));
        assert_eq!("intersect".parse::<CombineOperation>(), Ok(CombineOperation::Intersect));
        assert!("xor".parse::<CombineOperation>().is_err());
        assert_eq!("ALL".parse::<MatchingMode>(), Ok(MatchingMode::All));
        assert!("some".parse::<MatchingMode>().is_err());
    }

    #[test]
    fn serde_partial_state_fills_defaults() {
        let state: FilterState =
            serde_json::from_str(r#"{"trainNumber": "10", "combine": null, "matchingMode": "all"}"#)
                .unwrap();
        assert_eq!(state.train_number, "10");
        assert_eq!(state.combine, None);
        assert_eq!(state.matching_mode, MatchingMode::All);
        assert!(state.show_related);
        assert!(state.grey_out);

        let json = serde_json::to_string(&FilterState::default()).unwrap();
        let back: FilterState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FilterState::default());
    }
}
