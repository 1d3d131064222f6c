use proptest::prelude::*;

use qcat_crypto::blake2b_256;
use qcat_types::{AccountId, BlockHash, BlockHeight, Entropy, HISTORY_WINDOW, REVEAL_DELAY};
use qcat_vrf::{derive_outcome, ChainHistory, OutcomeSeed, Payload, RandomnessSource};

struct WindowedChain {
    height: BlockHeight,
}

impl ChainHistory for WindowedChain {
    fn height(&self) -> BlockHeight {
        self.height
    }

    fn block_hash(&self, h: BlockHeight) -> Option<BlockHash> {
        if h >= self.height || self.height - h > HISTORY_WINDOW {
            return None;
        }
        Some(BlockHash::new(blake2b_256(&h.to_be_bytes())))
    }
}

proptest! {
    /// The primary source is used exactly while the delayed block is retained.
    #[test]
    fn source_follows_history_window(
        ref_block in 0u64..1_000_000,
        wait in 1u64..2_000,
        entropy in prop::array::uniform32(1u8..),
    ) {
        let account = AccountId::from_index(1);
        let entropy = Entropy::new(entropy);
        let chain = WindowedChain { height: ref_block + REVEAL_DELAY + wait };
        let out = derive_outcome(&chain, &OutcomeSeed {
            account: &account,
            ref_block,
            user_entropy: &entropy,
            payload: Payload::Reveal(b"data"),
        });
        let expected = if wait <= HISTORY_WINDOW {
            RandomnessSource::Primary
        } else {
            RandomnessSource::Fallback
        };
        prop_assert_eq!(out.source, expected);
    }

    /// Inside the window the outcome does not depend on when the reveal lands.
    #[test]
    fn primary_outcome_is_timing_independent(
        ref_block in 0u64..1_000_000,
        wait_a in 1u64..=HISTORY_WINDOW,
        wait_b in 1u64..=HISTORY_WINDOW,
        data in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let account = AccountId::from_index(5);
        let entropy = Entropy::new([9; 32]);
        let seed = OutcomeSeed {
            account: &account,
            ref_block,
            user_entropy: &entropy,
            payload: Payload::Reveal(&data),
        };
        let a = derive_outcome(&WindowedChain { height: ref_block + REVEAL_DELAY + wait_a }, &seed);
        let b = derive_outcome(&WindowedChain { height: ref_block + REVEAL_DELAY + wait_b }, &seed);
        prop_assert_eq!(a.value, b.value);
        prop_assert_eq!(a.kind(), b.kind());
    }
}
