//! Arena indices.
//!
//! Entities live in per-type vectors owned by the model. Cross references
//! are stored as these typed indices rather than as shared pointers, so the
//! derived relations can be computed in one pass without interior mutability.

use serde::Serialize;

macro_rules! arena_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $name(pub usize);

        impl $name {
            /// Position of the entity in its arena (document order).
            pub fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_index!(
    /// Index of a station in the model.
    StationIdx
);

arena_index!(
    /// Index of a calendar in the model.
    CalendarIdx
);

arena_index!(
    /// Index of a train part in the model.
    TrainPartIdx
);

arena_index!(
    /// Index of a train in the model. Ordering follows document order.
    TrainIdx
);
