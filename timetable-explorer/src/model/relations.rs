//! Derived links between trains and train parts.
//!
//! Computed once, after every entity is built, in three passes:
//! back-references, then direct relatedness, then transitive closure.
//! Each pass reads only the output of the ones before it.

use std::collections::BTreeSet;

use tracing::debug;

use crate::domain::{Train, TrainIdx, TrainKind, TrainPartIdx};

/// Train numbers cached on a train part, one per train class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartLabels {
    /// Number of the first commercial train using the part
    pub commercial: Option<String>,
    /// Number of the first operational train using the part
    pub operational: Option<String>,
}

/// Adjacency data for the "shares a train part" relation.
///
/// Vectors are indexed by arena position: `referenced_by` and `labels` by
/// train part, `related` and `closure` by train. Sets are ordered by train
/// index, which is document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Relations {
    referenced_by: Vec<BTreeSet<TrainIdx>>,
    labels: Vec<PartLabels>,
    related: Vec<BTreeSet<TrainIdx>>,
    closure: Vec<BTreeSet<TrainIdx>>,
}

impl Relations {
    /// Run all passes over `trains`, whose parts index an arena of
    /// `part_count` train parts.
    pub fn resolve(trains: &[Train], part_count: usize) -> Self {
        let referenced_by = back_references(trains, part_count);
        let labels = part_labels(trains, &referenced_by);
        let related = related_trains(trains, &referenced_by);
        let closure = transitive_closure(&related);

        debug!(
            trains = trains.len(),
            parts = part_count,
            unused_parts = referenced_by.iter().filter(|s| s.is_empty()).count(),
            isolated_trains = related.iter().filter(|s| s.is_empty()).count(),
            "relations resolved"
        );

        Self {
            referenced_by,
            labels,
            related,
            closure,
        }
    }

    /// Trains that use `part`.
    pub fn referenced_by(&self, part: TrainPartIdx) -> &BTreeSet<TrainIdx> {
        self.referenced_by.get(part.0).unwrap_or(empty())
    }

    pub fn labels(&self, part: TrainPartIdx) -> Option<&PartLabels> {
        self.labels.get(part.0)
    }

    /// Trains sharing at least one part with `train`, excluding itself.
    pub fn related(&self, train: TrainIdx) -> &BTreeSet<TrainIdx> {
        self.related.get(train.0).unwrap_or(empty())
    }

    /// Trains reachable from `train` over shared parts, excluding itself.
    pub fn closure(&self, train: TrainIdx) -> &BTreeSet<TrainIdx> {
        self.closure.get(train.0).unwrap_or(empty())
    }
}

fn empty() -> &'static BTreeSet<TrainIdx> {
    static EMPTY: BTreeSet<TrainIdx> = BTreeSet::new();
    &EMPTY
}

/// For every train part, the set of trains referencing it.
///
/// Part indices outside the arena are ignored.
pub fn back_references(trains: &[Train], part_count: usize) -> Vec<BTreeSet<TrainIdx>> {
    let mut referenced_by = vec![BTreeSet::new(); part_count];

    for (t, train) in trains.iter().enumerate() {
        for part in train.part_indices() {
            if let Some(users) = referenced_by.get_mut(part.0) {
                users.insert(TrainIdx(t));
            }
        }
    }

    referenced_by
}

/// First commercial and first operational train number per part, in train
/// order.
pub fn part_labels(trains: &[Train], referenced_by: &[BTreeSet<TrainIdx>]) -> Vec<PartLabels> {
    referenced_by
        .iter()
        .map(|users| {
            let first_of = |kind: TrainKind| {
                users
                    .iter()
                    .filter_map(|t| trains.get(t.0))
                    .find(|train| train.kind == kind)
                    .map(|train| train.number.clone())
            };
            PartLabels {
                commercial: first_of(TrainKind::Commercial),
                operational: first_of(TrainKind::Operational),
            }
        })
        .collect()
}

/// For every train, the union of its parts' users minus the train itself.
pub fn related_trains(
    trains: &[Train],
    referenced_by: &[BTreeSet<TrainIdx>],
) -> Vec<BTreeSet<TrainIdx>> {
    trains
        .iter()
        .enumerate()
        .map(|(t, train)| {
            let mut related: BTreeSet<TrainIdx> = train
                .part_indices()
                .filter_map(|part| referenced_by.get(part.0))
                .flatten()
                .copied()
                .collect();
            related.remove(&TrainIdx(t));
            related
        })
        .collect()
}

/// Transitive closure of `related`, each set excluding its origin.
pub fn transitive_closure(related: &[BTreeSet<TrainIdx>]) -> Vec<BTreeSet<TrainIdx>> {
    (0..related.len())
        .map(|t| closure_of(TrainIdx(t), related))
        .collect()
}

/// Depth-first walk from `origin`. The relation has cycles, so every train
/// is pushed at most once.
fn closure_of(origin: TrainIdx, related: &[BTreeSet<TrainIdx>]) -> BTreeSet<TrainIdx> {
    let mut visited = BTreeSet::from([origin]);
    let mut stack = vec![origin];

    while let Some(current) = stack.pop() {
        let Some(neighbours) = related.get(current.0) else {
            continue;
        };
        for &next in neighbours {
            if visited.insert(next) {
                stack.push(next);
            }
        }
    }

    visited.remove(&origin);
    visited
}
