//! Deterministic [Falcon] signatures over one fixed parameter set, "det1024".
//!
//! Falcon is a lattice-based post-quantum signature scheme; det1024 is its
//! degree-1024 instance with deterministic key generation and signing. The
//! same seed always gives the same key pair and the same key and message
//! always give the same signature, which makes keys reproducible from a seed
//! and signatures reproducible in tests.
//!
//! Signatures come in two encodings:
//! - [`CompressedSignature`]: variable length, produced by signing, small on
//!   the wire.
//! - [`CtSignature`]: fixed length, obtained with
//!   [`CompressedSignature::convert_to_ct`], for verification paths that must
//!   not branch on the signature length.
//!
//! Byte 1 of either encoding is the salt version, which identifies the
//! deterministic derivation used when signing. It only changes when the
//! signing procedure changes; see [`CURRENT_SALT_VERSION`].
//!
//! The lattice arithmetic is provided by the `fn-dsa` crate. Signatures keep
//! Falcon's 40-byte nonce, so they are not byte-compatible with the reference
//! det1024 encoding: compressed signatures here are at most 1281 bytes and CT
//! signatures 1578, against 1423 and 1538 there.
//!
//! ```
//! assert_eq!(falcon_det::SIGNATURE_MAX_SIZE, 1281);
//! assert_eq!(falcon_det::CT_SIGNATURE_SIZE, 1578);
//! ```
//!
//! Failures carry the raw engine status: [`ERR_FORMAT`] for malformed keys or
//! signatures, [`ERR_BADSIG`] for a signature that does not verify and
//! [`ERR_INTERNAL`] otherwise.
//!
//! [Falcon]: https://falcon-sign.info/
//!
//! # Usage
//!
//! ```
//! use falcon_det::{generate_key, CURRENT_SALT_VERSION};
//!
//! let (pk, sk) = generate_key(b"node identity seed").unwrap();
//! let msg = b"Hello, world!";
//!
//! let sig = sk.sign_compressed(msg).unwrap();
//! assert_eq!(sig.salt_version(), CURRENT_SALT_VERSION);
//! pk.verify(&sig, msg).unwrap();
//!
//! let ct = sig.convert_to_ct().unwrap();
//! pk.verify_ct(&ct, msg).unwrap();
//! ```
//!
//! For serialization / deserialization:
//! ```
//! use falcon_det::{generate_key, CompressedSignature, PrivateKey, PublicKey};
//!
//! let (pk, sk) = generate_key(&[]).unwrap();
//! let sig = sk.sign_compressed(b"").unwrap();
//!
//! let pk = PublicKey::from_bytes(pk.as_bytes()).unwrap();
//! let sk = PrivateKey::from_bytes(sk.as_bytes()).unwrap();
//! let sig = CompressedSignature::from_bytes(sig.as_bytes()).unwrap();
//! assert_eq!(sk.sign_compressed(b"").unwrap(), sig);
//! pk.verify(&sig, b"").unwrap();
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[cfg(test)]
extern crate std;

pub mod det1024;
pub(crate) mod encoding;
pub(crate) mod engine;
pub mod error;
pub(crate) mod ntru;
pub(crate) mod shake;

pub use det1024::{
    generate_key, CompressedSignature, CtSignature, PrivateKey, PublicKey, Signature,
    CT_SIGNATURE_SIZE, CURRENT_SALT_VERSION, PRIVATE_KEY_SIZE, PUBLIC_KEY_SIZE,
    SIGNATURE_MAX_SIZE,
};
pub use engine::{Status, ERR_BADSIG, ERR_FORMAT, ERR_INTERNAL};
pub use error::Error;
