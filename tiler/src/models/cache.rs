use std::collections::HashMap;
use std::sync::Arc;

use common::Scoped;
use parking_lot::Mutex;

use super::{DynTransform, ModelKind};
use crate::transform::TransformSource;

#[derive(Debug, thiserror::Error)]
pub enum ModelCacheError {
    #[error("Model {0:?} is already in use")]
    Busy(ModelKind),
    #[error("Failed to load model {kind:?}: {source}")]
    Load {
        kind: ModelKind,
        #[source]
        source: anyhow::Error,
    },
}

/// A model checked out of the cache. Dropping it returns the model.
pub type CachedModel = Scoped<DynTransform>;

enum Slot {
    Idle(DynTransform),
    Busy,
}

/// Keeps loaded models between invocations and lends each one to a single
/// invocation at a time.
#[derive(Clone, Default)]
pub struct ModelCache {
    slots: Arc<Mutex<HashMap<ModelKind, Slot>>>,
}

impl ModelCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the model out, loading it on first use.
    pub fn checkout(&self, kind: ModelKind) -> Result<CachedModel, ModelCacheError> {
        let cached = {
            let mut slots = self.slots.lock();
            match slots.insert(kind, Slot::Busy) {
                Some(Slot::Busy) => return Err(ModelCacheError::Busy(kind)),
                Some(Slot::Idle(model)) => Some(model),
                None => None,
            }
        };

        let model = match cached {
            Some(model) => model,
            None => {
                tracing::info!("Loading model {:?}", kind);
                match kind.build() {
                    Ok(model) => model,
                    Err(source) => {
                        self.slots.lock().remove(&kind);
                        return Err(ModelCacheError::Load { kind, source });
                    }
                }
            }
        };

        let slots = Arc::clone(&self.slots);
        Ok(Scoped::boxed(model, move |model| {
            tracing::debug!("Returning model {:?} to cache", kind);
            slots.lock().insert(kind, Slot::Idle(model));
        }))
    }

    pub fn is_loaded(&self, kind: ModelKind) -> bool {
        self.slots.lock().contains_key(&kind)
    }

    pub fn is_busy(&self, kind: ModelKind) -> bool {
        matches!(self.slots.lock().get(&kind), Some(Slot::Busy))
    }

    /// Drops every idle model. Models currently checked out stay loaded.
    pub fn evict_idle(&self) {
        self.slots
            .lock()
            .retain(|_, slot| matches!(slot, Slot::Busy));
    }

    /// Source handing out `kind` from this cache.
    pub fn source(&self, kind: ModelKind) -> ModelCacheSource<'_> {
        ModelCacheSource { cache: self, kind }
    }
}

impl std::fmt::Debug for ModelCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slots = self.slots.lock();
        let busy = slots
            .values()
            .filter(|slot| matches!(slot, Slot::Busy))
            .count();
        f.debug_struct("ModelCache")
            .field("loaded", &slots.len())
            .field("busy", &busy)
            .finish()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModelCacheSource<'a> {
    cache: &'a ModelCache,
    kind: ModelKind,
}

impl TransformSource for ModelCacheSource<'_> {
    type Transform = CachedModel;

    fn acquire(&self) -> anyhow::Result<CachedModel> {
        Ok(self.cache.checkout(self.kind)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    #[test]
    fn checkout_marks_busy_until_dropped() {
        let cache = ModelCache::new();
        let kind = ModelKind::Nearest { scale: 2 };
        assert!(!cache.is_loaded(kind));

        let model = cache.checkout(kind).expect("first checkout");
        assert_eq!(model.scale(), 2);
        assert!(cache.is_busy(kind));
        assert!(matches!(
            cache.checkout(kind),
            Err(ModelCacheError::Busy(busy)) if busy == kind
        ));

        drop(model);
        assert!(cache.is_loaded(kind));
        assert!(!cache.is_busy(kind));
        assert!(cache.checkout(kind).is_ok());
    }

    #[test]
    fn different_models_are_independent() {
        let cache = ModelCache::new();
        let _a = cache.checkout(ModelKind::Identity).expect("identity");
        let _b = cache
            .checkout(ModelKind::Bilinear { scale: 4 })
            .expect("bilinear");
        assert!(cache.is_busy(ModelKind::Identity));
        assert!(cache.is_busy(ModelKind::Bilinear { scale: 4 }));
    }

    #[test]
    fn failed_load_leaves_no_slot() {
        let cache = ModelCache::new();
        let kind = ModelKind::Bilinear { scale: 0 };
        assert!(matches!(
            cache.checkout(kind),
            Err(ModelCacheError::Load { .. })
        ));
        assert!(!cache.is_loaded(kind));
    }

    #[test]
    fn evict_keeps_busy_models() {
        let cache = ModelCache::new();
        let busy = cache.checkout(ModelKind::Identity).expect("identity");
        drop(cache.checkout(ModelKind::Nearest { scale: 2 }).expect("nearest"));

        cache.evict_idle();
        assert!(cache.is_loaded(ModelKind::Identity));
        assert!(!cache.is_loaded(ModelKind::Nearest { scale: 2 }));
        drop(busy);
    }

    #[test]
    fn source_acquires_from_cache() {
        let cache = ModelCache::new();
        let source = cache.source(ModelKind::Identity);
        {
            let _model = source.acquire().expect("acquire");
            assert!(cache.is_busy(ModelKind::Identity));
        }
        assert!(!cache.is_busy(ModelKind::Identity));
    }
}
