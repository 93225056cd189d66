//! Projected grid to WGS84 conversion.
//!
//! Station coordinates arrive in the Swiss LV03 grid (`y` easting, `x`
//! northing, metres). The conversion uses the published approximate
//! polynomial, accurate to about a metre, which is plenty for placing
//! stations on a map.
//!
//! Missing coordinates are not an error: they become `NaN` and propagate
//! through the conversion, and [`GeoPosition::is_known`] reports them.

use serde::Serialize;

/// A WGS84 position in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPosition {
    /// The "no position" sentinel.
    pub const UNKNOWN: GeoPosition = GeoPosition {
        lat: f64::NAN,
        lon: f64::NAN,
    };

    /// Returns false for the "no position" sentinel (any `NaN` component).
    pub fn is_known(&self) -> bool {
        !self.lat.is_nan() && !self.lon.is_nan()
    }

    /// Linear interpolation towards `other`, `ratio` in `[0, 1]`.
    pub fn lerp(&self, other: &GeoPosition, ratio: f64) -> GeoPosition {
        GeoPosition {
            lat: self.lat * (1.0 - ratio) + other.lat * ratio,
            lon: self.lon * (1.0 - ratio) + other.lon * ratio,
        }
    }
}

/// Convert an LV03 `(y, x)` pair to WGS84.
pub fn lv03_to_wgs84(y: f64, x: f64) -> GeoPosition {
    GeoPosition {
        lat: lv03_to_lat(y, x),
        lon: lv03_to_lon(y, x),
    }
}

/// Shift to the Bern origin and scale to units of 1000 km.
fn auxiliary(y: f64, x: f64) -> (f64, f64) {
    ((y - 600_000.0) / 1_000_000.0, (x - 200_000.0) / 1_000_000.0)
}

fn lv03_to_lat(y: f64, x: f64) -> f64 {
    let (y_aux, x_aux) = auxiliary(y, x);

    let lat = 16.902_389_2 + 3.238_272 * x_aux
        - 0.270_978 * y_aux.powi(2)
        - 0.002_528 * x_aux.powi(2)
        - 0.044_7 * y_aux.powi(2) * x_aux
        - 0.014_0 * x_aux.powi(3);

    // 10000" units to degrees
    lat * 100.0 / 36.0
}

fn lv03_to_lon(y: f64, x: f64) -> f64 {
    let (y_aux, x_aux) = auxiliary(y, x);

    let lon = 2.677_909_4
        + 4.728_982 * y_aux
        + 0.791_484 * y_aux * x_aux
        + 0.130_6 * y_aux * x_aux.powi(2)
        - 0.043_6 * y_aux.powi(3);

    lon * 100.0 / 36.0
}

/// Parse one coordinate component; blank or unparsable text yields `NaN`.
pub fn parse_component(text: Option<&str>) -> f64 {
    match text.map(str::trim) {
        Some(t) if !t.is_empty() => t.parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn bern_origin() {
        let p = lv03_to_wgs84(600_000.0, 200_000.0);
        assert!(close(p.lat, 16.902_389_2 * 100.0 / 36.0, 1e-12));
        assert!(close(p.lon, 2.677_909_4 * 100.0 / 36.0, 1e-12));
    }

    #[test]
    fn zurich_hb() {
        // Zürich HB, LV03 y=683'161 x=248'065
        let p = lv03_to_wgs84(683_161.0, 248_065.0);
        assert!(close(p.lat, 47.378, 0.001), "lat {}", p.lat);
        assert!(close(p.lon, 8.540, 0.001), "lon {}", p.lon);
    }

    #[test]
    fn nan_propagates() {
        let p = lv03_to_wgs84(f64::NAN, 200_000.0);
        assert!(!p.is_known());
        assert!(!GeoPosition::UNKNOWN.is_known());
    }

    #[test]
    fn parse_component_is_lenient() {
        assert_eq!(parse_component(Some(" 683161 ")), 683_161.0);
        assert!(parse_component(Some("")).is_nan());
        assert!(parse_component(Some("   ")).is_nan());
        assert!(parse_component(Some("abc")).is_nan());
        assert!(parse_component(None).is_nan());
    }

    #[test]
    fn lerp_midpoint() {
        let a = GeoPosition { lat: 46.0, lon: 7.0 };
        let b = GeoPosition { lat: 47.0, lon: 9.0 };
        let mid = a.lerp(&b, 0.5);
        assert!(close(mid.lat, 46.5, 1e-12));
        assert!(close(mid.lon, 8.0, 1e-12));
        assert_eq!(a.lerp(&b, 0.0), a);
    }
}
