//! Per-(layer, environment) apply lock
//!
//! Mirrors the provisioning tool's coarse state lock: at most one apply
//! may hold a given layer+environment at a time. A second acquisition
//! fails fast with contention instead of blocking; all core computation
//! is pure, so the loser can simply retry once the holder finishes.

use crate::layer::{Layer, LayerError};
use enclave_common::Environment;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Registry of held apply locks
#[derive(Debug, Default, Clone)]
pub struct ApplyLock {
    held: Arc<Mutex<HashSet<(Layer, Environment)>>>,
}

impl ApplyLock {
    /// Empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one layer apply, or fail fast.
    pub fn try_acquire(
        &self,
        layer: Layer,
        environment: Environment,
    ) -> Result<ApplyGuard, LayerError> {
        let key = (layer, environment.clone());
        let mut held = self.held.lock();
        if !held.insert(key.clone()) {
            return Err(LayerError::LockContention { layer, environment });
        }
        debug!(layer = %layer, environment = %environment, "apply lock acquired");
        Ok(ApplyGuard {
            registry: self.held.clone(),
            key,
        })
    }
}

/// Held apply lock; releases on drop (completion or failure alike)
#[derive(Debug)]
pub struct ApplyGuard {
    registry: Arc<Mutex<HashSet<(Layer, Environment)>>>,
    key: (Layer, Environment),
}

impl Drop for ApplyGuard {
    fn drop(&mut self) {
        self.registry.lock().remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(s: &str) -> Environment {
        Environment::new(s).unwrap()
    }

    #[test]
    fn test_second_acquire_fails_fast() {
        let lock = ApplyLock::new();
        let _guard = lock.try_acquire(Layer::Foundation, env("prod")).unwrap();
        let err = lock.try_acquire(Layer::Foundation, env("prod")).unwrap_err();
        assert!(matches!(err, LayerError::LockContention { .. }));
    }

    #[test]
    fn test_released_on_drop() {
        let lock = ApplyLock::new();
        {
            let _guard = lock.try_acquire(Layer::Foundation, env("prod")).unwrap();
        }
        lock.try_acquire(Layer::Foundation, env("prod")).unwrap();
    }

    #[test]
    fn test_distinct_slots_do_not_contend() {
        let lock = ApplyLock::new();
        let _a = lock.try_acquire(Layer::Foundation, env("prod")).unwrap();
        let _b = lock.try_acquire(Layer::Platform, env("prod")).unwrap();
        let _c = lock.try_acquire(Layer::Foundation, env("staging")).unwrap();
    }
}
