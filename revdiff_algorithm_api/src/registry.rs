//! Registry keeps track of available diff algorithms.

use std::collections::HashMap;
use std::sync::Arc;

use super::DiffAlgorithm;

/// In-memory registry for diff algorithms.
#[derive(Default, Clone)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<&'static str, Arc<dyn DiffAlgorithm>>,
}

impl AlgorithmRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an algorithm keyed by its `DiffAlgorithm::id`.
    pub fn register<A>(&mut self, algorithm: A)
    where
        A: DiffAlgorithm + 'static,
    {
        self.register_arc(Arc::new(algorithm));
    }

    /// Register an already shared algorithm.
    pub fn register_arc(&mut self, algorithm: Arc<dyn DiffAlgorithm>) {
        self.algorithms.insert(algorithm.id(), algorithm);
    }

    /// Retrieve an algorithm by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<dyn DiffAlgorithm>> {
        self.algorithms.get(id).map(Arc::clone)
    }

    /// Returns the registered identifiers in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.algorithms.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlgorithmRegistry")
            .field("algorithms", &self.ids())
            .finish()
    }
}
