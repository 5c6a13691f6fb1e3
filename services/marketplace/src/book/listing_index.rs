//! Collection-ordered listing index
//!
//! Insertion-ordered view of the active listings in each collection,
//! backing paginated browsing. The listing itself lives in the per-asset
//! book; this index only orders the keys, and readers re-check the book,
//! so a window is stable only while no mutation lands between pages.

use std::collections::BTreeMap;

use dashmap::DashMap;
use types::asset::AssetKey;
use types::ids::CollectionId;

/// Per-collection index of active listings in insertion order.
#[derive(Debug, Default)]
pub struct ListingIndex {
    by_collection: DashMap<CollectionId, BTreeMap<u64, AssetKey>>,
}

impl ListingIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a freshly inserted listing under its insertion sequence.
    pub fn insert(&self, seq: u64, asset: AssetKey) {
        self.by_collection
            .entry(asset.collection.clone())
            .or_default()
            .insert(seq, asset);
    }

    /// Drop a listing from the index. Idempotent.
    pub fn remove(&self, asset: &AssetKey, seq: u64) {
        if let Some(mut entry) = self.by_collection.get_mut(&asset.collection) {
            entry.remove(&seq);
            let emptied = entry.is_empty();
            drop(entry);
            if emptied {
                // re-checked under the entry lock so a racing insert survives
                self.by_collection
                    .remove_if(&asset.collection, |_, index| index.is_empty());
            }
        }
    }

    /// Window of asset keys in insertion order.
    pub fn page(&self, collection: &CollectionId, offset: usize, limit: usize) -> Vec<AssetKey> {
        match self.by_collection.get(collection) {
            Some(index) => index.values().skip(offset).take(limit).cloned().collect(),
            None => Vec::new(),
        }
    }

    /// Number of indexed listings in a collection.
    pub fn collection_len(&self, collection: &CollectionId) -> usize {
        self.by_collection
            .get(collection)
            .map(|index| index.len())
            .unwrap_or(0)
    }
}
