mod capture;
mod lcs;
mod myers;
mod patience;

pub use capture::similarity_percent;
pub use lcs::LcsAlgorithm;
pub use myers::MyersAlgorithm;
pub use patience::PatienceAlgorithm;

use revdiff_algorithm_api::AlgorithmRegistry;

/// Identifier of the algorithm used when no other is configured.
pub const DEFAULT_ALGORITHM: &str = "myers";

/// Build an algorithm registry populated with the built-in strategies.
#[must_use]
pub fn default_registry() -> AlgorithmRegistry {
    let mut registry = AlgorithmRegistry::new();
    registry.register(MyersAlgorithm);
    registry.register(PatienceAlgorithm);
    registry.register(LcsAlgorithm);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_builtins() {
        let registry = default_registry();
        assert_eq!(registry.ids(), vec!["lcs", "myers", "patience"]);
        assert!(registry.get(DEFAULT_ALGORITHM).is_some());
    }
}
