//! Outcome derivation.
//!
//! Byte layout (fixed; changing it changes outcomes for identical inputs):
//!
//! ```text
//! source   = H(target)                                  when retained
//!          | H("qcat:fallback" ‖ H(ref) ‖ be64(now) ‖ H(now-1))   otherwise
//! value    = blake2b_256(source ‖ entropy ‖ payload ‖ account ‖ be64(ref))
//! outcome  = value[31] & 1      (1 = ALIVE, 0 = DEAD)
//! ```
//!
//! where `target = ref + REVEAL_DELAY`, `payload` is the reveal data for a
//! caller reveal and the 20 account bytes for a forced resolution, and a
//! missing block hash inside the fallback is replaced by 32 zero bytes.

use crate::ChainHistory;
use qcat_crypto::blake2b_256_multi;
use qcat_types::{AccountId, BlockHash, BlockHeight, Entropy, TokenKind, HISTORY_WINDOW, REVEAL_DELAY};
use serde::{Deserialize, Serialize};

const FALLBACK_TAG: &[u8] = b"qcat:fallback";

/// Which entropy source fed a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RandomnessSource {
    /// Hash of the block `REVEAL_DELAY` after the commit.
    Primary,
    /// The delayed hash had aged out of history; weaker substitute used.
    Fallback,
}

impl RandomnessSource {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RandomnessSource::Fallback)
    }
}

/// Third input to the mix.
#[derive(Clone, Copy, Debug)]
pub enum Payload<'a> {
    /// Caller reveal: the committed preimage.
    Reveal(&'a [u8]),
    /// Third-party resolution: no preimage, the account stands in for it.
    Forced,
}

/// Everything fixed at commit time plus the resolution payload.
#[derive(Clone, Copy, Debug)]
pub struct OutcomeSeed<'a> {
    pub account: &'a AccountId,
    pub ref_block: BlockHeight,
    pub user_entropy: &'a Entropy,
    pub payload: Payload<'a>,
}

/// A derived outcome together with the source that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomOutput {
    /// The 32-byte mix; only its last bit decides the outcome.
    pub value: [u8; 32],
    pub source: RandomnessSource,
}

impl RandomOutput {
    /// The outcome bit: least-significant bit of the big-endian digest.
    pub fn bit(&self) -> bool {
        self.value[31] & 1 == 1
    }

    pub fn kind(&self) -> TokenKind {
        TokenKind::from_outcome_bit(self.bit())
    }
}

/// Substitute entropy for a commitment whose delayed block hash is gone.
///
/// Deterministic for a given chain state, so anyone can audit it.
pub fn fallback_source(chain: &dyn ChainHistory, ref_block: BlockHeight) -> [u8; 32] {
    let now = chain.height();
    let ref_hash = chain.block_hash(ref_block).unwrap_or(BlockHash::ZERO);
    let parent = now
        .checked_sub(1)
        .and_then(|h| chain.block_hash(h))
        .unwrap_or(BlockHash::ZERO);
    blake2b_256_multi(&[
        FALLBACK_TAG,
        ref_hash.as_bytes(),
        &now.to_be_bytes(),
        parent.as_bytes(),
    ])
}

fn primary_source(chain: &dyn ChainHistory, target: BlockHeight) -> Option<BlockHash> {
    let now = chain.height();
    if now <= target || now - target > HISTORY_WINDOW {
        return None;
    }
    chain.block_hash(target)
}

/// Derive the outcome for a commitment. Pure given the chain's answers.
pub fn derive_outcome(chain: &dyn ChainHistory, seed: &OutcomeSeed<'_>) -> RandomOutput {
    let target = seed.ref_block.saturating_add(REVEAL_DELAY);
    let (source_bytes, source) = match primary_source(chain, target) {
        Some(hash) => (*hash.as_bytes(), RandomnessSource::Primary),
        None => (fallback_source(chain, seed.ref_block), RandomnessSource::Fallback),
    };

    let payload: &[u8] = match seed.payload {
        Payload::Reveal(data) => data,
        Payload::Forced => seed.account.as_bytes(),
    };

    let value = blake2b_256_multi(&[
        &source_bytes,
        seed.user_entropy.as_bytes(),
        payload,
        seed.account.as_bytes(),
        &seed.ref_block.to_be_bytes(),
    ]);

    RandomOutput { value, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qcat_crypto::blake2b_256;

    /// Every height below `height` is known; hashes are `H(be64(h))`.
    struct FixedChain {
        height: BlockHeight,
        window: BlockHeight,
    }

    impl FixedChain {
        fn at(height: BlockHeight) -> Self {
            Self { height, window: HISTORY_WINDOW }
        }
    }

    impl ChainHistory for FixedChain {
        fn height(&self) -> BlockHeight {
            self.height
        }

        fn block_hash(&self, h: BlockHeight) -> Option<BlockHash> {
            if h >= self.height || self.height - h > self.window {
                return None;
            }
            Some(BlockHash::new(blake2b_256(&h.to_be_bytes())))
        }
    }

    fn seed<'a>(account: &'a AccountId, entropy: &'a Entropy, payload: Payload<'a>) -> OutcomeSeed<'a> {
        OutcomeSeed {
            account,
            ref_block: 100,
            user_entropy: entropy,
            payload,
        }
    }

    #[test]
    fn primary_within_window() {
        let account = AccountId::from_index(1);
        let entropy = Entropy::new([7; 32]);
        let out = derive_outcome(&FixedChain::at(106), &seed(&account, &entropy, Payload::Reveal(b"x")));
        assert_eq!(out.source, RandomnessSource::Primary);
    }

    #[test]
    fn primary_at_window_edge_fallback_past_it() {
        let account = AccountId::from_index(1);
        let entropy = Entropy::new([7; 32]);
        let s = seed(&account, &entropy, Payload::Reveal(b"x"));
        // target = 105
        let edge = derive_outcome(&FixedChain::at(105 + HISTORY_WINDOW), &s);
        assert_eq!(edge.source, RandomnessSource::Primary);
        let past = derive_outcome(&FixedChain::at(105 + HISTORY_WINDOW + 1), &s);
        assert_eq!(past.source, RandomnessSource::Fallback);
        assert!(past.source.is_fallback());
    }

    #[test]
    fn fallback_when_history_lacks_the_block() {
        let account = AccountId::from_index(1);
        let entropy = Entropy::new([7; 32]);
        let chain = FixedChain { height: 110, window: 2 };
        let out = derive_outcome(&chain, &seed(&account, &entropy, Payload::Reveal(b"x")));
        assert_eq!(out.source, RandomnessSource::Fallback);
    }

    #[test]
    fn deterministic_for_same_inputs() {
        let account = AccountId::from_index(1);
        let entropy = Entropy::new([7; 32]);
        let s = seed(&account, &entropy, Payload::Reveal(b"payload"));
        let a = derive_outcome(&FixedChain::at(120), &s);
        let b = derive_outcome(&FixedChain::at(120), &s);
        assert_eq!(a, b);
    }

    #[test]
    fn primary_value_independent_of_reveal_height() {
        // The delayed block hash is the same whenever the reveal happens
        // inside the window, so the outcome must not depend on timing.
        let account = AccountId::from_index(1);
        let entropy = Entropy::new([7; 32]);
        let s = seed(&account, &entropy, Payload::Reveal(b"payload"));
        let a = derive_outcome(&FixedChain::at(106), &s);
        let b = derive_outcome(&FixedChain::at(300), &s);
        assert_eq!(a.value, b.value);
    }

    #[test]
    fn matches_documented_layout() {
        let account = AccountId::from_index(9);
        let entropy = Entropy::new([3; 32]);
        let chain = FixedChain::at(200);
        let out = derive_outcome(&chain, &seed(&account, &entropy, Payload::Reveal(b"abc")));
        let target_hash = blake2b_256(&105u64.to_be_bytes());
        let expected = blake2b_256_multi(&[
            &target_hash,
            entropy.as_bytes(),
            b"abc",
            account.as_bytes(),
            &100u64.to_be_bytes(),
        ]);
        assert_eq!(out.value, expected);
        assert_eq!(out.bit(), expected[31] & 1 == 1);
    }

    #[test]
    fn forced_payload_is_the_account() {
        let account = AccountId::from_index(9);
        let entropy = Entropy::new([3; 32]);
        let chain = FixedChain::at(200);
        let forced = derive_outcome(&chain, &seed(&account, &entropy, Payload::Forced));
        let revealed = derive_outcome(
            &chain,
            &seed(&account, &entropy, Payload::Reveal(account.as_bytes())),
        );
        assert_eq!(forced.value, revealed.value);
    }

    #[test]
    fn every_input_feeds_the_mix() {
        let account = AccountId::from_index(9);
        let other = AccountId::from_index(10);
        let entropy = Entropy::new([3; 32]);
        let other_entropy = Entropy::new([4; 32]);
        let chain = FixedChain::at(200);
        let base = derive_outcome(&chain, &seed(&account, &entropy, Payload::Reveal(b"a"))).value;
        assert_ne!(base, derive_outcome(&chain, &seed(&other, &entropy, Payload::Reveal(b"a"))).value);
        assert_ne!(base, derive_outcome(&chain, &seed(&account, &other_entropy, Payload::Reveal(b"a"))).value);
        assert_ne!(base, derive_outcome(&chain, &seed(&account, &entropy, Payload::Reveal(b"b"))).value);
        let mut later = seed(&account, &entropy, Payload::Reveal(b"a"));
        later.ref_block = 101;
        assert_ne!(base, derive_outcome(&chain, &later).value);
    }

    #[test]
    fn fallback_source_tolerates_empty_history() {
        struct Empty;
        impl ChainHistory for Empty {
            fn height(&self) -> BlockHeight {
                0
            }
            fn block_hash(&self, _: BlockHeight) -> Option<BlockHash> {
                None
            }
        }
        let a = fallback_source(&Empty, 0);
        let b = fallback_source(&Empty, 0);
        assert_eq!(a, b);
    }

    #[test]
    fn kind_follows_bit() {
        let mut value = [0u8; 32];
        value[31] = 1;
        let alive = RandomOutput { value, source: RandomnessSource::Primary };
        assert_eq!(alive.kind(), TokenKind::Alive);
        value[31] = 2;
        let dead = RandomOutput { value, source: RandomnessSource::Primary };
        assert_eq!(dead.kind(), TokenKind::Dead);
    }
}
