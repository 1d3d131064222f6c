//! Hashing primitives for the QuantumCat protocol.
//!
//! Blake2b with a 256-bit output is the single protocol hash: reveal
//! commitments, the randomness mix and the fallback entropy source all go
//! through it.

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, commitment, verify_commitment};
