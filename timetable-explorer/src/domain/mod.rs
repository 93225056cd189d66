//! Domain types for the timetable model.
//!
//! Entities reference each other through arena indices; the model owns the
//! arenas. Calendars are immutable values with a date-aligned set algebra.

mod calendar;
mod geo;
mod ids;
mod station;
mod stop;
mod time;
mod train;
mod train_part;

pub use calendar::{
    ACTIVE_GLYPH, Calendar, CalendarError, INACTIVE_GLYPH, MonthSpan, days_between, month_spans,
    window_len,
};
pub use geo::{GeoPosition, lv03_to_wgs84, parse_component};
pub use ids::{CalendarIdx, StationIdx, TrainIdx, TrainPartIdx};
pub use station::Station;
pub use stop::{StopKind, TrainPartStop};
pub use time::{MS_PER_DAY, TimeError, TimeOfDay};
pub use train::{FlatPartRef, Train, TrainKind, TrainPartRef, TrainPartSequence, flatten};
pub use train_part::TrainPart;
