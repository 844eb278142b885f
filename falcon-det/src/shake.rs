//! SHAKE256 used as a deterministic random source.
//!
//! Key generation seeds one instance from the caller's seed; signing seeds one
//! from the private key and message, so that every draw the engine makes is a
//! function of its inputs.

use rand_core::{impls, CryptoRng, RngCore};
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Shake256, Shake256Reader};

/// Domain tag absorbed first by every signing instance.
const SIGNING_DOMAIN: &[u8] = b"FALCON_DET";

/// SHAKE256 rate in bytes.
const RATE: usize = 136;

/// A SHAKE256 context flipped to output mode.
///
/// Instances are built per call and never shared. The sponge state is wiped
/// on drop (`sha3`'s `zeroize` feature).
pub(crate) struct ShakePrng {
    reader: Shake256Reader,
}

impl ShakePrng {
    /// Absorb `seed`, then one block of zeros, and switch to output mode.
    pub(crate) fn from_seed(seed: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(seed);
        Self::finish(hasher)
    }

    /// Signing stream for (salt version, degree, private key, message).
    ///
    /// The private key has a fixed length, so the concatenation is
    /// unambiguous.
    pub(crate) fn for_signing(salt_version: u8, logn: u8, privkey: &[u8], msg: &[u8]) -> Self {
        let mut hasher = Shake256::default();
        hasher.update(SIGNING_DOMAIN);
        hasher.update(&[salt_version, logn]);
        hasher.update(privkey);
        hasher.update(msg);
        Self::finish(hasher)
    }

    fn finish(mut hasher: Shake256) -> Self {
        // the block buffer is not wiped on drop; push secret input bytes out
        // of it before finalizing
        hasher.update(&[0u8; RATE]);
        Self {
            reader: hasher.finalize_xof(),
        }
    }
}

impl RngCore for ShakePrng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.reader.read(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for ShakePrng {}
