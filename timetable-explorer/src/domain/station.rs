//! Stations (operation control points).

use super::geo::{GeoPosition, lv03_to_wgs84};

/// A station or other operation control point.
///
/// Many stations legitimately have no geodata; their grid coordinates are
/// `NaN` and their position is [`GeoPosition::UNKNOWN`]. Check
/// [`Station::has_position`] before plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    /// Document identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Short code, may be empty
    pub code: String,
    /// Code in an external station registry, if designated
    pub registry_code: Option<String>,
    /// Grid northing
    pub x: f64,
    /// Grid easting
    pub y: f64,
    /// Derived WGS84 position
    pub position: GeoPosition,
}

impl Station {
    /// Create a station without geodata.
    pub fn new(id: impl Into<String>, name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: code.into(),
            registry_code: None,
            x: f64::NAN,
            y: f64::NAN,
            position: GeoPosition::UNKNOWN,
        }
    }

    /// Set grid coordinates and derive the WGS84 position.
    pub fn with_grid(mut self, y: f64, x: f64) -> Self {
        self.x = x;
        self.y = y;
        self.position = lv03_to_wgs84(y, x);
        self
    }

    pub fn with_registry_code(mut self, code: Option<String>) -> Self {
        self.registry_code = code;
        self
    }

    /// Returns true if the station can be placed on a map.
    pub fn has_position(&self) -> bool {
        self.position.is_known()
    }

    /// The short code, or the first four characters of the name when the
    /// code is blank.
    pub fn short_code(&self) -> String {
        if self.code.trim().is_empty() {
            self.name.chars().take(4).collect()
        } else {
            self.code.clone()
        }
    }

    /// `"CODE - Name"` label used in stop lists.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
    }
}
