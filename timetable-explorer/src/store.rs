//! Current-model snapshot.
//!
//! A load builds and wires a complete model before taking the write lock,
//! so readers only ever see a fully resolved model or the previous one.

use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{info, warn};

use crate::document::{DocumentError, RailmlDocument};
use crate::filter::{FilterResult, FilterState, evaluate_filter};
use crate::model::{LoadError, Model};

/// Errors from loading a document file into the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Load(#[from] LoadError),
}

/// A filter result together with the model it indexes into.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub model: Arc<Model>,
    pub result: FilterResult,
}

/// Thread-safe holder of the current model.
///
/// Cloning shares the same snapshot slot.
#[derive(Debug, Clone, Default)]
pub struct TimetableStore {
    inner: Arc<RwLock<Option<Arc<Model>>>>,
}

impl TimetableStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current model, if one has been loaded.
    pub fn current(&self) -> Option<Arc<Model>> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the current model.
    pub fn publish(&self, model: Model) -> Arc<Model> {
        let model = Arc::new(model);
        info!(
            trains = model.trains().len(),
            start = %model.start_date(),
            end = %model.end_date(),
            "publishing timetable snapshot"
        );
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::clone(&model));
        model
    }

    /// Build a model from `doc` and publish it.
    ///
    /// On failure the previous snapshot stays current and the error is
    /// returned.
    pub fn load(&self, doc: &RailmlDocument) -> Result<Arc<Model>, LoadError> {
        match Model::from_document(doc) {
            Ok(model) => Ok(self.publish(model)),
            Err(err) => {
                warn!(%err, "timetable load failed, keeping previous snapshot");
                Err(err)
            }
        }
    }

    /// Read a document file, then [`load`](Self::load) it.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Arc<Model>, StoreError> {
        let doc = RailmlDocument::from_path(path)?;
        Ok(self.load(&doc)?)
    }

    /// Drop the current snapshot.
    pub fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Evaluate `state` against the current snapshot.
    pub fn evaluate(&self, state: &FilterState) -> Option<Evaluation> {
        let model = self.current()?;
        let result = evaluate_filter(&model, state);
        Some(Evaluation { model, result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn empty_store_has_nothing_to_evaluate() {
        let store = TimetableStore::new();
        assert!(store.current().is_none());
        assert!(store.evaluate(&FilterState::default()).is_none());
    }

    #[test]
    fn load_publishes_snapshot() {
        let store = TimetableStore::new();
        let model = store.load(&fixtures::document()).unwrap();
        assert!(Arc::ptr_eq(&model, &store.current().unwrap()));

        let eval = store.evaluate(&FilterState::default()).unwrap();
        assert_eq!(eval.result.len(), 5);
        assert!(Arc::ptr_eq(&eval.model, &model));
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        let store = TimetableStore::new();
        let first = store.load(&fixtures::document()).unwrap();

        let mut broken = fixtures::document_json();
        broken["railml"]["timetable"]["trainParts"]["trainPart"][0]["operatingPeriodRef"]
            ["attributes"]["ref"] = json!("nope");
        assert!(store.load(&fixtures::from_json(broken)).is_err());

        assert!(Arc::ptr_eq(&first, &store.current().unwrap()));
    }

    #[test]
    fn readers_keep_old_snapshot_across_reload() {
        let store = TimetableStore::new();
        let old = store.load(&fixtures::document()).unwrap();
        let held = store.current().unwrap();

        let new = store.load(&fixtures::shared_part_document()).unwrap();
        assert!(!Arc::ptr_eq(&old, &new));
        assert_eq!(held.trains().len(), 5);
        assert_eq!(store.current().unwrap().trains().len(), 2);
    }

    #[test]
    fn clones_share_the_slot() {
        let store = TimetableStore::new();
        let other = store.clone();
        store.load(&fixtures::document()).unwrap();
        assert!(other.current().is_some());

        other.clear();
        assert!(store.current().is_none());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(fixtures::document_json().to_string().as_bytes())
            .unwrap();

        let store = TimetableStore::new();
        let model = store.load_path(file.path()).unwrap();
        assert_eq!(model.trains().len(), 5);

        let missing = store.load_path(file.path().with_extension("missing"));
        assert!(matches!(missing, Err(StoreError::Document(DocumentError::Io(_)))));
    }

    #[test]
    fn concurrent_readers() {
        let store = TimetableStore::new();
        store.load(&fixtures::document()).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    store
                        .evaluate(&FilterState::default().with_train_number("10"))
                        .map(|e| e.result.len())
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some(3));
        }
    }
}
