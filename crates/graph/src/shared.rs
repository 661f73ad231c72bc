use crate::facade::ComponentGraph;
use std::sync::{Arc, PoisonError, RwLock};

/// Cloneable handle for hosts that touch the graph from several threads.
///
/// `write` serialises every structural mutation; `read` lets analyzer and exporter
/// queries run side by side but never during a mutation. A panic inside a closure
/// poisons nothing: the next caller takes the lock over as is.
#[derive(Clone, Default)]
pub struct SharedComponentGraph {
    inner: Arc<RwLock<ComponentGraph>>,
}

impl SharedComponentGraph {
    pub fn new(graph: ComponentGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&ComponentGraph) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut ComponentGraph) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
