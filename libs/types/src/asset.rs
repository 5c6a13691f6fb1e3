//! Asset keys
//!
//! An asset key identifies one unique tradeable item: a token within a
//! collection. Immutable once created; the book keys everything by it.

use crate::ids::{CollectionId, TokenId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier (collection, token) for one tradeable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetKey {
    pub collection: CollectionId,
    pub token_id: TokenId,
}

impl AssetKey {
    pub fn new(collection: CollectionId, token_id: impl Into<TokenId>) -> Self {
        Self {
            collection,
            token_id: token_id.into(),
        }
    }
}

impl fmt::Display for AssetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.collection, self.token_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_key_display() {
        let asset = AssetKey::new(CollectionId::new("gallery"), 42u64);
        assert_eq!(asset.to_string(), "gallery#42");
    }

    #[test]
    fn test_asset_key_equality() {
        let a = AssetKey::new(CollectionId::new("gallery"), 1u64);
        let b = AssetKey::new(CollectionId::new("gallery"), 1u64);
        let c = AssetKey::new(CollectionId::new("gallery"), 2u64);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_asset_key_serialization() {
        let asset = AssetKey::new(CollectionId::new("gallery"), 7u64);
        let json = serde_json::to_string(&asset).unwrap();
        let deserialized: AssetKey = serde_json::from_str(&json).unwrap();
        assert_eq!(asset, deserialized);
    }
}
