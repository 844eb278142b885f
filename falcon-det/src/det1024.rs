use alloc::vec::Vec;
use core::fmt;

use tracing::{debug, trace};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::engine;
use crate::error::Error;
use crate::shake::ShakePrng;

pub use crate::engine::{
    CT_SIGNATURE_SIZE, CURRENT_SALT_VERSION, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE,
    SIGNATURE_MAX_SIZE,
};

// Every engine call below borrows its inputs for the duration of the call and
// writes into buffers owned by the caller's frame; nothing is retained once
// it returns.

/// A det1024 public key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

/// A det1024 private key. The bytes are wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; PRIVATE_KEY_SIZE]);

/// A signature in compressed form, at most [`SIGNATURE_MAX_SIZE`] bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CompressedSignature(Vec<u8>);

/// A signature in constant-time form, always [`CT_SIGNATURE_SIZE`] bytes.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CtSignature([u8; CT_SIGNATURE_SIZE]);

/// Either encoding of a signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signature {
    Compressed(CompressedSignature),
    Ct(CtSignature),
}

/// Derive a key pair from `seed`.
///
/// The seed may have any length, including zero. The same seed always gives
/// the same pair.
pub fn generate_key(seed: &[u8]) -> Result<(PublicKey, PrivateKey), Error> {
    let mut rng = ShakePrng::from_seed(seed);
    let mut public_key = PublicKey([0u8; PUBLIC_KEY_SIZE]);
    let mut private_key = PrivateKey([0u8; PRIVATE_KEY_SIZE]);

    if let Err(code) = engine::keygen(&mut rng, &mut private_key.0, &mut public_key.0) {
        debug!(code, "falcon keygen failed");
        return Err(Error::KeygenFailed { code });
    }

    trace!(seed_len = seed.len(), "generated falcon det1024 key pair");
    Ok((public_key, private_key))
}

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// Check that `signature` is a valid compressed signature of `msg`.
    pub fn verify(&self, signature: &CompressedSignature, msg: &[u8]) -> Result<(), Error> {
        engine::verify_compressed(&signature.0, &self.0, msg).map_err(|code| {
            debug!(code, "falcon verify failed");
            Error::VerifyFailed { code }
        })
    }

    /// Check that `signature` is a valid CT signature of `msg`.
    pub fn verify_ct(&self, signature: &CtSignature, msg: &[u8]) -> Result<(), Error> {
        engine::verify_ct(&signature.0, &self.0, msg).map_err(|code| {
            debug!(code, "falcon CT verify failed");
            Error::VerifyFailed { code }
        })
    }

    /// Check either encoding of a signature.
    pub fn verify_signature(&self, signature: &Signature, msg: &[u8]) -> Result<(), Error> {
        match signature {
            Signature::Compressed(sig) => self.verify(sig, msg),
            Signature::Ct(sig) => self.verify_ct(sig, msg),
        }
    }
}

impl PrivateKey {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.0
    }

    /// Sign `msg`, which may be empty.
    ///
    /// Signing is deterministic: the same key and message always give the same
    /// bytes.
    pub fn sign_compressed(&self, msg: &[u8]) -> Result<CompressedSignature, Error> {
        let mut sig = [0u8; SIGNATURE_MAX_SIZE];
        match engine::sign_compressed(&mut sig, &self.0, msg) {
            Ok(len) => {
                trace!(len, msg_len = msg.len(), "signed message");
                Ok(CompressedSignature(sig[..len].to_vec()))
            }
            Err(code) => {
                debug!(code, "falcon sign failed");
                Err(Error::SignFailed { code })
            }
        }
    }
}

impl CompressedSignature {
    /// Wrap raw bytes; None if longer than [`SIGNATURE_MAX_SIZE`].
    ///
    /// The bytes are not checked further, so signatures from untrusted
    /// sources can be carried and inspected before verification.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() > SIGNATURE_MAX_SIZE {
            return None;
        }
        Some(Self(bytes.to_vec()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Salt version the signature was made with, or 0 if the signature is
    /// too short to carry one.
    pub fn salt_version(&self) -> u8 {
        self.0.get(1).copied().unwrap_or(0)
    }

    /// Re-encode in CT form. Malformed input is rejected, never padded.
    pub fn convert_to_ct(&self) -> Result<CtSignature, Error> {
        let mut sig_ct = [0u8; CT_SIGNATURE_SIZE];
        match engine::convert_compressed_to_ct(&mut sig_ct, &self.0) {
            Ok(()) => Ok(CtSignature(sig_ct)),
            Err(code) => {
                debug!(code, len = self.0.len(), "falcon convert to CT failed");
                Err(Error::ConvertFailed { code })
            }
        }
    }
}

impl CtSignature {
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }

    pub fn as_bytes(&self) -> &[u8; CT_SIGNATURE_SIZE] {
        &self.0
    }

    /// Salt version the signature was made with.
    pub fn salt_version(&self) -> u8 {
        self.0[1]
    }
}

impl Signature {
    pub fn salt_version(&self) -> u8 {
        match self {
            Signature::Compressed(sig) => sig.salt_version(),
            Signature::Ct(sig) => sig.salt_version(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Signature::Compressed(sig) => sig.as_bytes(),
            Signature::Ct(sig) => sig.as_bytes(),
        }
    }
}

impl From<CompressedSignature> for Signature {
    fn from(sig: CompressedSignature) -> Self {
        Signature::Compressed(sig)
    }
}

impl From<CtSignature> for Signature {
    fn from(sig: CtSignature) -> Self {
        Signature::Ct(sig)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CompressedSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for CtSignature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Keys and CT signatures are long; show a prefix only.
const DEBUG_PREFIX: usize = 16;

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({}..)", hex::encode(&self.0[..DEBUG_PREFIX]))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

impl fmt::Debug for CompressedSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompressedSignature({})", hex::encode(&self.0))
    }
}

impl fmt::Debug for CtSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CtSignature({}..)", hex::encode(&self.0[..DEBUG_PREFIX]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn compressed_salt_version_defaults_to_zero() {
        assert_eq!(CompressedSignature::from_bytes(&[]).unwrap().salt_version(), 0);
        assert_eq!(CompressedSignature::from_bytes(&[0x3A]).unwrap().salt_version(), 0);
        assert_eq!(CompressedSignature::from_bytes(&[0x3A, 7]).unwrap().salt_version(), 7);
    }

    #[test]
    fn ct_salt_version_reads_second_byte() {
        let mut bytes = [0u8; CT_SIGNATURE_SIZE];
        bytes[1] = 3;
        let sig = CtSignature::from_bytes(&bytes).unwrap();
        assert_eq!(sig.salt_version(), 3);
        assert_eq!(Signature::from(sig).salt_version(), 3);
    }

    #[test]
    fn from_bytes_checks_length() {
        assert!(PublicKey::from_bytes(&[0u8; PUBLIC_KEY_SIZE - 1]).is_none());
        assert!(PublicKey::from_bytes(&[0u8; PUBLIC_KEY_SIZE]).is_some());
        assert!(PrivateKey::from_bytes(&[0u8; PRIVATE_KEY_SIZE + 1]).is_none());
        assert!(PrivateKey::from_bytes(&[0u8; PRIVATE_KEY_SIZE]).is_some());
        assert!(CtSignature::from_bytes(&[0u8; CT_SIGNATURE_SIZE - 1]).is_none());
        assert!(CompressedSignature::from_bytes(&[0u8; SIGNATURE_MAX_SIZE]).is_some());
        assert!(CompressedSignature::from_bytes(&[0u8; SIGNATURE_MAX_SIZE + 1]).is_none());
    }

    #[test]
    fn private_key_debug_is_redacted() {
        let sk = PrivateKey::from_bytes(&[0xAB; PRIVATE_KEY_SIZE]).unwrap();
        let shown = format!("{:?}", sk);
        assert_eq!(shown, "PrivateKey(<redacted>)");
    }

    #[test]
    fn private_key_zeroize_clears_bytes() {
        let mut sk = PrivateKey::from_bytes(&[0xAB; PRIVATE_KEY_SIZE]).unwrap();
        sk.zeroize();
        assert!(sk.as_bytes().iter().all(|&b| b == 0));
    }
}
