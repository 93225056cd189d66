//! Trains and their train-part sequences.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::TrainPartIdx;

/// Passenger-facing or internal movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainKind {
    Commercial,
    Operational,
}

impl TrainKind {
    /// Classify a `type` attribute. Anything but `"operational"` is
    /// commercial.
    pub fn from_attribute(s: Option<&str>) -> Self {
        match s.map(str::trim) {
            Some(t) if t.eq_ignore_ascii_case("operational") => TrainKind::Operational,
            _ => TrainKind::Commercial,
        }
    }
}

impl fmt::Display for TrainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrainKind::Commercial => f.write_str("commercial"),
            TrainKind::Operational => f.write_str("operational"),
        }
    }
}

impl FromStr for TrainKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commercial" => Ok(TrainKind::Commercial),
            "operational" => Ok(TrainKind::Operational),
            other => Err(format!("unknown train kind: {other}")),
        }
    }
}

/// A train part placed at a position within a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrainPartRef {
    /// Position in the sequence; may repeat for parallel portions
    pub position: u32,
    pub part: TrainPartIdx,
}

/// One branch or leg grouping of a train.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainPartSequence {
    pub sequence: u32,
    pub parts: Vec<TrainPartRef>,
}

/// A train part reference flattened out of its sequence for tabular display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatPartRef {
    pub sequence: u32,
    /// Part count of the sequence on its first entry, 0 on the others
    pub span: usize,
    pub position: u32,
    /// How many preceding entries in the sequence share this position
    pub position_offset: u32,
    pub part: TrainPartIdx,
}

/// A train: one or more sequences of train parts.
///
/// Related trains (sharing a train part) are derived by the model after
/// all trains are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Train {
    pub id: String,
    pub kind: TrainKind,
    /// Display number: base number plus `" - "` and the additional number
    pub number: String,
    pub base_number: String,
    pub additional_number: Option<String>,
    pub name: String,
    pub sequences: Vec<TrainPartSequence>,
    /// Parts of all sequences in traversal order
    pub flat_parts: Vec<FlatPartRef>,
}

impl Train {
    /// Create a train; the display number and flattened part list are
    /// derived here.
    pub fn new(
        id: impl Into<String>,
        kind: TrainKind,
        base_number: impl Into<String>,
        additional_number: Option<String>,
        name: impl Into<String>,
        sequences: Vec<TrainPartSequence>,
    ) -> Self {
        let base_number = base_number.into();
        let number = match additional_number.as_deref() {
            Some(extra) if !extra.is_empty() => format!("{base_number} - {extra}"),
            _ => base_number.clone(),
        };
        let flat_parts = flatten(&sequences);

        Self {
            id: id.into(),
            kind,
            number,
            base_number,
            additional_number,
            name: name.into(),
            sequences,
            flat_parts,
        }
    }

    pub fn number_of_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// Number of train part references across all sequences.
    pub fn number_of_parts(&self) -> usize {
        self.sequences.iter().map(|s| s.parts.len()).sum()
    }

    /// Sequence count times flattened part count.
    pub fn own_complexity(&self) -> usize {
        self.sequences.len() * self.flat_parts.len()
    }

    /// Referenced train parts in traversal order, repeats included.
    pub fn part_indices(&self) -> impl Iterator<Item = TrainPartIdx> + '_ {
        self.flat_parts.iter().map(|f| f.part)
    }
}

/// Flatten sequences into display rows.
///
/// The first row of each sequence carries the sequence's part count as its
/// span. The position offset counts consecutive repeats of a position and
/// restarts at 0 whenever the position changes or a new sequence begins.
pub fn flatten(sequences: &[TrainPartSequence]) -> Vec<FlatPartRef> {
    let mut flat = Vec::with_capacity(sequences.iter().map(|s| s.parts.len()).sum());

    for seq in sequences {
        let mut last_position = None;
        let mut offset = 0;

        for (i, part_ref) in seq.parts.iter().enumerate() {
            offset = if last_position == Some(part_ref.position) {
                offset + 1
            } else {
                0
            };
            last_position = Some(part_ref.position);

            flat.push(FlatPartRef {
                sequence: seq.sequence,
                span: if i == 0 { seq.parts.len() } else { 0 },
                position: part_ref.position,
                position_offset: offset,
                part: part_ref.part,
            });
        }
    }

    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(sequence: u32, parts: &[(u32, usize)]) -> TrainPartSequence {
        TrainPartSequence {
            sequence,
            parts: parts
                .iter()
                .map(|&(position, idx)| TrainPartRef {
                    position,
                    part: TrainPartIdx(idx),
                })
                .collect(),
        }
    }

    #[test]
    fn kind_from_attribute() {
        assert_eq!(TrainKind::from_attribute(Some("operational")), TrainKind::Operational);
        assert_eq!(TrainKind::from_attribute(Some("commercial")), TrainKind::Commercial);
        assert_eq!(TrainKind::from_attribute(Some("other")), TrainKind::Commercial);
        assert_eq!(TrainKind::from_attribute(None), TrainKind::Commercial);
    }

    #[test]
    fn kind_from_str() {
        assert_eq!("Operational".parse::<TrainKind>(), Ok(TrainKind::Operational));
        assert!("bus".parse::<TrainKind>().is_err());
    }

    #[test]
    fn display_number_with_additional() {
        let t = Train::new("t", TrainKind::Commercial, "101", Some("A".into()), "", vec![]);
        assert_eq!(t.number, "101 - A");
        assert_eq!(t.base_number, "101");

        let t = Train::new("t", TrainKind::Commercial, "101", Some(String::new()), "", vec![]);
        assert_eq!(t.number, "101");
    }

    #[test]
    fn flatten_spans_and_offsets() {
        let sequences = vec![seq(1, &[(1, 0), (2, 1), (2, 2), (2, 3), (3, 4)]), seq(2, &[(1, 5)])];
        let flat = flatten(&sequences);

        let spans: Vec<_> = flat.iter().map(|f| f.span).collect();
        assert_eq!(spans, vec![5, 0, 0, 0, 0, 1]);

        let offsets: Vec<_> = flat.iter().map(|f| f.position_offset).collect();
        assert_eq!(offsets, vec![0, 0, 1, 2, 0, 0]);

        let parts: Vec<_> = flat.iter().map(|f| f.part.0).collect();
        assert_eq!(parts, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(flat[5].sequence, 2);
    }

    #[test]
    fn empty_sequence_produces_no_rows() {
        let t = Train::new(
            "t",
            TrainKind::Operational,
            "9",
            None,
            "",
            vec![seq(1, &[]), seq(2, &[(1, 0)])],
        );
        assert_eq!(t.flat_parts.len(), 1);
        assert_eq!(t.number_of_sequences(), 2);
        assert_eq!(t.number_of_parts(), 1);
        assert_eq!(t.own_complexity(), 2);
    }

    #[test]
    fn train_without_sequences() {
        let t = Train::new("t", TrainKind::Commercial, "1", None, "", vec![]);
        assert!(t.flat_parts.is_empty());
        assert_eq!(t.own_complexity(), 0);
        assert_eq!(t.part_indices().count(), 0);
    }
}
