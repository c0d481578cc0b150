//! Process-wide cache of resolved condition-loss kernels.
//!
//! A [`LossKernel`] is specialized once per static key (distribution kind
//! plus condition kind(s)) and shared through an [`Arc`]. Keys are drawn
//! from closed enums, so the mapping from key to kernel never changes and
//! entries are never invalidated.
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::conditions::CondKind;
use crate::distributions::DistKind;
use crate::kernels::condition::LossKernel;

/// Static key of a loss kernel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KernelKey {
    /// One condition, evaluated and differentiated on its own.
    Single(DistKind, CondKind),
    /// A whole condition list evaluated as one unit.
    Joint(DistKind, Vec<CondKind>),
}

impl KernelKey {
    pub fn dist_kind(&self) -> DistKind {
        match self {
            KernelKey::Single(kind, _) | KernelKey::Joint(kind, _) => *kind,
        }
    }

    pub fn cond_kinds(&self) -> Vec<CondKind> {
        match self {
            KernelKey::Single(_, cond) => vec![*cond],
            KernelKey::Joint(_, conds) => conds.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct KernelCache {
    kernels: RwLock<HashMap<KernelKey, Arc<LossKernel>>>,
}

impl KernelCache {
    /// The process-wide instance.
    pub fn global() -> &'static KernelCache {
        static CACHE: OnceLock<KernelCache> = OnceLock::new();
        CACHE.get_or_init(KernelCache::default)
    }

    /// Kernel for `key`, built on first use.
    pub fn get(&self, key: &KernelKey) -> Arc<LossKernel> {
        if let Some(kernel) = self.read_map(|map| map.get(key).cloned()) {
            return kernel;
        }
        let mut map = match self.kernels.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        map.entry(key.clone())
            .or_insert_with(|| {
                log::debug!(
                    "building {} loss kernel for {:?}",
                    key.dist_kind(),
                    key.cond_kinds()
                );
                Arc::new(LossKernel::build(key.dist_kind(), key.cond_kinds()))
            })
            .clone()
    }

    pub fn single(&self, dist: DistKind, cond: CondKind) -> Arc<LossKernel> {
        self.get(&KernelKey::Single(dist, cond))
    }

    pub fn joint(&self, dist: DistKind, conds: Vec<CondKind>) -> Arc<LossKernel> {
        self.get(&KernelKey::Joint(dist, conds))
    }

    pub fn contains(&self, key: &KernelKey) -> bool {
        self.read_map(|map| map.contains_key(key))
    }

    pub fn len(&self) -> usize {
        self.read_map(|map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map only ever grows, so a poisoned lock still holds valid kernels.
    fn read_map<R>(&self, f: impl FnOnce(&HashMap<KernelKey, Arc<LossKernel>>) -> R) -> R {
        match self.kernels.read() {
            Ok(guard) => f(&guard),
            Err(poisoned) => f(&poisoned.into_inner()),
        }
    }
}
