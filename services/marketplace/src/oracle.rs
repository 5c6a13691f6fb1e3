//! Ownership oracle seam
//!
//! The marketplace consumes ownership state; it never implements the asset
//! registry. Deployments plug the real registry in behind this trait;
//! tests and simulations use the in-memory implementation.

use dashmap::DashMap;
use types::asset::AssetKey;
use types::ids::AccountId;

/// External source of truth for "who owns asset X now".
///
/// Implementations must answer from their own state and must not call back
/// into the engine: lookups happen while the engine holds the book entry
/// for the asset.
pub trait OwnershipOracle: Send + Sync {
    /// Current owner of the asset, or `None` if the registry does not know it
    fn current_owner(&self, asset: &AssetKey) -> Option<AccountId>;
}

/// DashMap-backed oracle for tests and simulations.
#[derive(Debug, Default)]
pub struct InMemoryOracle {
    owners: DashMap<AssetKey, AccountId>,
}

impl InMemoryOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a transfer in the registry.
    ///
    /// This only updates the oracle's answer; glue observing the registry
    /// still calls `Marketplace::on_ownership_changed` to sync the books.
    pub fn set_owner(&self, asset: AssetKey, owner: AccountId) {
        self.owners.insert(asset, owner);
    }
}

impl OwnershipOracle for InMemoryOracle {
    fn current_owner(&self, asset: &AssetKey) -> Option<AccountId> {
        self.owners.get(asset).map(|owner| *owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::CollectionId;

    #[test]
    fn test_in_memory_oracle_tracks_transfers() {
        let oracle = InMemoryOracle::new();
        let asset = AssetKey::new(CollectionId::new("gallery"), 1u64);
        let alice = AccountId::new();
        let bob = AccountId::new();

        assert_eq!(oracle.current_owner(&asset), None);

        oracle.set_owner(asset.clone(), alice);
        assert_eq!(oracle.current_owner(&asset), Some(alice));

        oracle.set_owner(asset.clone(), bob);
        assert_eq!(oracle.current_owner(&asset), Some(bob));
    }
}
