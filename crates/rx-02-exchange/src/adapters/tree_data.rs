//! Published account-tree snapshots

use crate::ports::outbound::MerkleTreeDataSource;
use parking_lot::RwLock;
use rx_01_account_tree::{AccountTree, BalanceProof};
use shared_types::{AccountId, Hash, TokenId};
use std::collections::HashMap;

/// Tree data the operator has made available, keyed by root.
#[derive(Debug, Default)]
pub struct SnapshotTreeDataSource {
    snapshots: RwLock<HashMap<Hash, AccountTree>>,
}

impl SnapshotTreeDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a tree under its current root. Returns that root.
    pub fn publish(&self, tree: AccountTree) -> Hash {
        let root = tree.root();
        self.snapshots.write().insert(root, tree);
        root
    }

    /// Drop the data for `root`, as a withholding operator would.
    pub fn withhold(&self, root: &Hash) -> bool {
        self.snapshots.write().remove(root).is_some()
    }

    pub fn has_root(&self, root: &Hash) -> bool {
        self.snapshots.read().contains_key(root)
    }
}

impl MerkleTreeDataSource for SnapshotTreeDataSource {
    fn balance_proof(
        &self,
        root: &Hash,
        account_id: AccountId,
        token: TokenId,
    ) -> Option<BalanceProof> {
        self.snapshots
            .read()
            .get(root)?
            .balance_proof(account_id, token)
            .ok()
    }
}
