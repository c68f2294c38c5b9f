//! Port and runtime dependency bundles for the pet care service.

use std::sync::Arc;

use rand::Rng;

use crate::domain::PetId;
use crate::domain::ports::{ActionCatalog, LedgerRepository, PetRepository};

use super::locks::PetLocks;

/// Driven ports required by the pet care service.
#[derive(Clone)]
pub struct PetCarePorts {
    pub pets: Arc<dyn PetRepository>,
    pub ledger: Arc<dyn LedgerRepository>,
    pub catalog: Arc<dyn ActionCatalog>,
}

impl PetCarePorts {
    pub fn new(
        pets: Arc<dyn PetRepository>,
        ledger: Arc<dyn LedgerRepository>,
        catalog: Arc<dyn ActionCatalog>,
    ) -> Self {
        Self {
            pets,
            ledger,
            catalog,
        }
    }
}

/// Chooses which pet a decay tick affects.
pub trait DecayTargetPicker: Send + Sync {
    /// Pick one of `candidates`, or `None` when empty.
    ///
    /// ```rust
    /// use pet_backend::domain::{DecayTargetPicker, PetId};
    /// struct First;
    /// impl DecayTargetPicker for First {
    ///     fn pick(&self, candidates: &[PetId]) -> Option<PetId> {
    ///         candidates.first().copied()
    ///     }
    /// }
    /// let ids = [PetId::new(4).expect("id"), PetId::new(7).expect("id")];
    /// assert_eq!(First.pick(&ids), Some(ids[0]));
    /// ```
    fn pick(&self, candidates: &[PetId]) -> Option<PetId>;
}

/// Uniform random choice over the candidates.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformDecayTarget;

impl DecayTargetPicker for UniformDecayTarget {
    fn pick(&self, candidates: &[PetId]) -> Option<PetId> {
        if candidates.is_empty() {
            return None;
        }
        let index = rand::thread_rng().gen_range(0..candidates.len());
        candidates.get(index).copied()
    }
}

/// Runtime helpers: target selection and the shared lock registry.
#[derive(Clone)]
pub struct PetCareRuntime {
    pub picker: Arc<dyn DecayTargetPicker>,
    pub locks: Arc<PetLocks>,
}

impl Default for PetCareRuntime {
    fn default() -> Self {
        Self {
            picker: Arc::new(UniformDecayTarget),
            locks: Arc::new(PetLocks::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_pick_returns_a_candidate() {
        let ids: Vec<PetId> = (1..=3).map(|raw| PetId::new(raw).expect("id")).collect();
        for _ in 0..32 {
            let picked = UniformDecayTarget.pick(&ids).expect("non-empty");
            assert!(ids.contains(&picked));
        }
    }

    #[test]
    fn uniform_pick_reaches_every_candidate() {
        let ids: Vec<PetId> = (1..=3).map(|raw| PetId::new(raw).expect("id")).collect();
        let seen: std::collections::HashSet<PetId> = (0..256)
            .filter_map(|_| UniformDecayTarget.pick(&ids))
            .collect();
        assert_eq!(seen.len(), ids.len());
    }

    #[test]
    fn uniform_pick_on_empty_is_none() {
        assert_eq!(UniformDecayTarget.pick(&[]), None);
    }
}
