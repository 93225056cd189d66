//! Normalized timetable document records.
//!
//! These types mirror the attribute/child layout produced by an
//! XML-to-object loader: every element carries an `attributes` object and
//! its child elements as named fields. Attribute values are kept as text;
//! the model builders parse them.
//!
//! Repeating children use [`OneOrMany`]. Container elements are optional
//! and default to empty, since exporters omit empty sections.

use serde::{Deserialize, Deserializer};

use super::OneOrMany;

/// Root of a normalized document.
#[derive(Debug, Clone, Deserialize)]
pub struct RailmlDocument {
    pub railml: Railml,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Railml {
    pub infrastructure: Infrastructure,
    pub timetable: Timetable,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Infrastructure {
    pub operation_control_points: OperationControlPoints,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OperationControlPoints {
    pub ocp: OneOrMany<OcpRecord>,
}

/// An operation control point (station, junction, siding).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcpRecord {
    pub attributes: OcpAttributes,
    #[serde(default)]
    pub geo_coord: Option<GeoCoordRecord>,
    #[serde(default)]
    pub designator: Option<DesignatorRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcpAttributes {
    #[serde(deserialize_with = "scalar")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoCoordRecord {
    pub attributes: GeoCoordAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeoCoordAttributes {
    /// Space separated `"<y> <x>"` pair in the projected grid.
    #[serde(default, deserialize_with = "opt_scalar")]
    pub coord: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DesignatorRecord {
    pub attributes: DesignatorAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DesignatorAttributes {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub register: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub entry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Timetable {
    pub timetable_periods: TimetablePeriods,
    pub operating_periods: OperatingPeriods,
    pub train_parts: TrainParts,
    pub trains: Trains,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimetablePeriods {
    pub timetable_period: OneOrMany<TimetablePeriodRecord>,
}

/// The validity window shared by every calendar in the document.
#[derive(Debug, Clone, Deserialize)]
pub struct TimetablePeriodRecord {
    pub attributes: TimetablePeriodAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetablePeriodAttributes {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub description: Option<String>,
    #[serde(deserialize_with = "scalar")]
    pub start_date: String,
    #[serde(deserialize_with = "scalar")]
    pub end_date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperatingPeriods {
    pub operating_period: OneOrMany<OperatingPeriodRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatingPeriodRecord {
    pub attributes: OperatingPeriodAttributes,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatingPeriodAttributes {
    #[serde(deserialize_with = "scalar")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub description: Option<String>,
    /// One `'0'`/`'1'` character per day of the timetable period.
    #[serde(deserialize_with = "scalar")]
    pub bit_mask: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainParts {
    pub train_part: OneOrMany<TrainPartRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPartRecord {
    pub attributes: TrainPartAttributes,
    #[serde(default)]
    pub operating_period_ref: Option<OperatingPeriodRefRecord>,
    #[serde(default, rename = "ocpsTT")]
    pub ocps_tt: OcpsTt,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPartAttributes {
    #[serde(deserialize_with = "scalar")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub train_number: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub timetable_period_ref: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub category_ref: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub line: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub cancellation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperatingPeriodRefRecord {
    pub attributes: RefAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefAttributes {
    #[serde(rename = "ref", deserialize_with = "scalar")]
    pub reference: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OcpsTt {
    #[serde(rename = "ocpTT")]
    pub ocp_tt: OneOrMany<OcpTtRecord>,
}

/// One passage of a train part through an operation control point.
#[derive(Debug, Clone, Deserialize)]
pub struct OcpTtRecord {
    pub attributes: OcpTtAttributes,
    #[serde(default)]
    pub times: OneOrMany<TimesRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcpTtAttributes {
    #[serde(deserialize_with = "scalar")]
    pub ocp_ref: String,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub ocp_type: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub sequence: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub track_info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimesRecord {
    pub attributes: TimesAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimesAttributes {
    #[serde(default, deserialize_with = "opt_scalar")]
    pub scope: Option<String>,
    /// `HH:MM:SS`, hours may exceed 23.
    #[serde(default, deserialize_with = "opt_scalar")]
    pub arrival: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub departure: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Trains {
    pub train: OneOrMany<TrainRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainRecord {
    pub attributes: TrainAttributes,
    #[serde(default)]
    pub train_part_sequence: OneOrMany<TrainPartSequenceRecord>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainAttributes {
    #[serde(deserialize_with = "scalar")]
    pub id: String,
    /// `"commercial"` or `"operational"`.
    #[serde(rename = "type", default, deserialize_with = "opt_scalar")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub train_number: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub additional_train_number: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainPartSequenceRecord {
    pub attributes: TrainPartSequenceAttributes,
    #[serde(default)]
    pub train_part_ref: OneOrMany<TrainPartRefRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainPartSequenceAttributes {
    #[serde(deserialize_with = "scalar")]
    pub sequence: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainPartRefRecord {
    pub attributes: TrainPartRefAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrainPartRefAttributes {
    #[serde(deserialize_with = "scalar")]
    pub position: String,
    #[serde(rename = "ref", deserialize_with = "scalar")]
    pub reference: String,
}

/// Attribute values arrive as text, but loaders that coerce attribute
/// values hand us numbers and booleans instead.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<Scalar> for String {
    fn from(value: Scalar) -> Self {
        match value {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

fn scalar<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Scalar::deserialize(deserializer).map(String::from)
}

fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(String::from))
}
