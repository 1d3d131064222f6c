//! Nullable chain: a block height that only moves when told to, and
//! synthesized block hashes.

use qcat_crypto::blake2b_256_multi;
use qcat_types::{BlockHash, BlockHeight, HISTORY_WINDOW};
use qcat_vrf::ChainHistory;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

const HASH_TAG: &[u8] = b"qcat:null-chain";

/// A deterministic [`ChainHistory`] for tests and simulation.
///
/// The hash of block `h` is `blake2b_256("qcat:null-chain" ‖ seed ‖ be64(h))`
/// unless overridden. Only the last `window` blocks below the current height
/// are retained, mirroring a real chain's bounded history.
pub struct NullChain {
    height: AtomicU64,
    window: BlockHeight,
    seed: [u8; 32],
    overrides: Mutex<HashMap<BlockHeight, Option<BlockHash>>>,
}

impl NullChain {
    pub fn new(height: BlockHeight) -> Self {
        Self::with_seed([0; 32], height)
    }

    /// A chain whose synthesized hashes differ from every other seed's.
    pub fn with_seed(seed: [u8; 32], height: BlockHeight) -> Self {
        Self {
            height: AtomicU64::new(height),
            window: HISTORY_WINDOW,
            seed,
            overrides: Mutex::new(HashMap::new()),
        }
    }

    /// Retain a different number of past hashes.
    pub fn with_window(mut self, window: BlockHeight) -> Self {
        self.window = window;
        self
    }

    /// Mine `blocks` blocks. Returns the new height.
    pub fn advance(&self, blocks: u64) -> BlockHeight {
        self.height.fetch_add(blocks, Ordering::SeqCst) + blocks
    }

    pub fn set_height(&self, height: BlockHeight) {
        self.height.store(height, Ordering::SeqCst);
    }

    /// Pin the hash of block `height`, still subject to the window.
    pub fn set_block_hash(&self, height: BlockHeight, hash: BlockHash) {
        self.overrides().insert(height, Some(hash));
    }

    /// Make block `height` unavailable regardless of the window.
    pub fn forget(&self, height: BlockHeight) {
        self.overrides().insert(height, None);
    }

    /// The hash block `height` has or will have, ignoring retention.
    pub fn hash_at(&self, height: BlockHeight) -> BlockHash {
        if let Some(Some(hash)) = self.overrides().get(&height).copied() {
            return hash;
        }
        BlockHash::new(blake2b_256_multi(&[HASH_TAG, &self.seed, &height.to_be_bytes()]))
    }

    fn overrides(&self) -> MutexGuard<'_, HashMap<BlockHeight, Option<BlockHash>>> {
        self.overrides.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChainHistory for NullChain {
    fn height(&self) -> BlockHeight {
        self.height.load(Ordering::SeqCst)
    }

    fn block_hash(&self, height: BlockHeight) -> Option<BlockHash> {
        let now = self.height();
        if height >= now || now - height > self.window {
            return None;
        }
        let pinned = self.overrides().get(&height).copied();
        match pinned {
            Some(pinned) => pinned,
            None => Some(self.hash_at(height)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_moves_when_told() {
        let chain = NullChain::new(10);
        assert_eq!(chain.height(), 10);
        assert_eq!(chain.advance(5), 15);
        chain.set_height(3);
        assert_eq!(chain.height(), 3);
    }

    #[test]
    fn current_and_future_blocks_are_unknown() {
        let chain = NullChain::new(10);
        assert!(chain.block_hash(9).is_some());
        assert!(chain.block_hash(10).is_none());
        assert!(chain.block_hash(11).is_none());
    }

    #[test]
    fn history_is_bounded_by_window() {
        let chain = NullChain::new(1_000);
        assert!(chain.block_hash(1_000 - HISTORY_WINDOW).is_some());
        assert!(chain.block_hash(1_000 - HISTORY_WINDOW - 1).is_none());

        let short = NullChain::new(100).with_window(2);
        assert!(short.block_hash(98).is_some());
        assert!(short.block_hash(97).is_none());
    }

    #[test]
    fn hashes_are_deterministic_per_seed() {
        let a = NullChain::new(50);
        let b = NullChain::new(50);
        let c = NullChain::with_seed([1; 32], 50);
        assert_eq!(a.block_hash(40), b.block_hash(40));
        assert_ne!(a.block_hash(40), c.block_hash(40));
        assert_ne!(a.block_hash(40), a.block_hash(41));
    }

    #[test]
    fn hash_survives_advancing() {
        let chain = NullChain::new(50);
        let before = chain.block_hash(45);
        chain.advance(100);
        assert_eq!(chain.block_hash(45), before);
    }

    #[test]
    fn overrides_and_forgotten_blocks() {
        let chain = NullChain::new(50);
        let pinned = BlockHash::new([7; 32]);
        chain.set_block_hash(40, pinned);
        chain.forget(41);
        assert_eq!(chain.block_hash(40), Some(pinned));
        assert_eq!(chain.hash_at(40), pinned);
        assert_eq!(chain.block_hash(41), None);
        // Pinned hashes still age out.
        chain.advance(1_000);
        assert_eq!(chain.block_hash(40), None);
    }
}
