//! Access to the ambient chain's height and recent block hashes.

use qcat_types::{BlockHash, BlockHeight};

/// The chain state the protocol reads: current height and a bounded window
/// of past block hashes.
///
/// Passed explicitly into every operation that needs it, so tests can drive
/// the protocol with a fake history.
pub trait ChainHistory: Send + Sync {
    /// Height of the block currently being built.
    fn height(&self) -> BlockHeight;

    /// Hash of a past block. `None` for the current or future heights and
    /// for blocks that have fallen out of the retained window.
    fn block_hash(&self, height: BlockHeight) -> Option<BlockHash>;
}

impl<T: ChainHistory + ?Sized> ChainHistory for &T {
    fn height(&self) -> BlockHeight {
        (**self).height()
    }

    fn block_hash(&self, height: BlockHeight) -> Option<BlockHash> {
        (**self).block_hash(height)
    }
}

impl<T: ChainHistory + ?Sized> ChainHistory for std::sync::Arc<T> {
    fn height(&self) -> BlockHeight {
        (**self).height()
    }

    fn block_hash(&self, height: BlockHeight) -> Option<BlockHash> {
        (**self).block_hash(height)
    }
}
