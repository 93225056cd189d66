//! Deterministic colour hints for rendering.
//!
//! Colours are CSS values derived from a 32-bit string hash, so the same
//! identifier gets the same colour in every session and every client that
//! uses the same hash.

use std::fmt;

use crate::domain::TrainKind;

/// Colour of greyed-out trains and train parts.
pub const GREY: &str = "hsl(0,0%,50%)";

/// Colour of commercial trains.
pub const COMMERCIAL_BLUE: &str = "hsl(218,70%,50%)";

/// Colour of operational trains.
pub const OPERATIONAL_RED: &str = "hsl(19,70%,50%)";

const HUES: i32 = 360;

/// 32-bit string hash over UTF-16 code units.
///
/// Each unit is cubed and mixed in four times with `h * 31 + c`, wrapping
/// at 32 bits.
pub fn hash_str(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |hash, unit| {
        let c = i32::from(unit);
        let cube = c.wrapping_mul(c).wrapping_mul(c);
        (0..4).fold(hash, |h, _| (h << 5).wrapping_sub(h).wrapping_add(cube))
    })
}

/// Two-hue horizontal gradient.
///
/// Hues keep the sign of the hash; CSS wraps negative hues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub from_hue: i32,
    pub to_hue: f64,
}

impl Gradient {
    pub fn from_hash(hash: i32) -> Self {
        Self {
            from_hue: hash % HUES,
            to_hue: f64::from(hash % (HUES * HUES * HUES)) / f64::from(HUES * HUES),
        }
    }

    pub fn for_id(id: &str) -> Self {
        Self::from_hash(hash_str(id))
    }
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "linear-gradient(90deg, hsl({},100%,70%) 0%, hsl({},100%,70%) 100%)",
            self.from_hue, self.to_hue
        )
    }
}

/// Hue for a train part sequence number.
pub fn sequence_hue(sequence: u32) -> i32 {
    hash_str(&sequence.to_string()) % HUES
}

/// Pastel colour for a sequence number.
pub fn sequence_color(sequence: u32) -> String {
    format!("hsl({},100%,80%)", sequence_hue(sequence))
}

pub fn train_color(kind: TrainKind, greyed_out: bool) -> &'static str {
    match (greyed_out, kind) {
        (true, _) => GREY,
        (false, TrainKind::Commercial) => COMMERCIAL_BLUE,
        (false, TrainKind::Operational) => OPERATIONAL_RED,
    }
}

/// Gradient for a train part id, grey if the part is greyed out.
pub fn part_color(id: &str, greyed_out: bool) -> String {
    if greyed_out {
        GREY.to_string()
    } else {
        Gradient::for_id(id).to_string()
    }
}

/// Gradient for a calendar id.
pub fn calendar_color(id: &str) -> String {
    Gradient::for_id(id).to_string()
}
