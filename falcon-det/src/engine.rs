//! Narrow boundary to the signature engine.
//!
//! The lattice arithmetic is done by `fn-dsa`. This module adds the det1024
//! layer on top of it: seeded key generation, deterministic signing, the
//! compressed and CT wire formats and the conversion between them. Every entry
//! point takes borrowed buffers that stay alive for the whole call and
//! reports failure as a raw status code.
//!
//! Compressed: `[0x3A][salt version][nonce; 40][compressed s2]`, the s2 field
//! without trailing zero bytes.
//!
//! CT: `[0x5A][salt version][nonce; 40][s2, 12 bits per coefficient]`.

use fn_dsa::{
    sign_key_size, signature_size, vrfy_key_size, KeyPairGenerator, KeyPairGeneratorStandard,
    SigningKey, SigningKeyStandard, VerifyingKey, VerifyingKeyStandard, DOMAIN_NONE,
    FN_DSA_LOGN_1024, HASH_ID_RAW,
};

use crate::encoding;
use crate::ntru;
use crate::shake::ShakePrng;

/// Raw engine status. Zero means success; failures are negative and use
/// the numbering of the Falcon reference code.
pub type Status = i32;

/// A key or signature is not well formed.
pub const ERR_FORMAT: Status = -3;
/// The signature does not match the key and message.
pub const ERR_BADSIG: Status = -4;
/// Internal engine error.
pub const ERR_INTERNAL: Status = -6;

/// log2 of the degree.
pub const LOGN: u32 = FN_DSA_LOGN_1024;
/// Degree of the polynomial ring.
pub const N: usize = 1 << LOGN;

/// Size of an encoded public key.
pub const PUBLIC_KEY_SIZE: usize = vrfy_key_size(LOGN);
/// Size of an encoded private key.
pub const PRIVATE_KEY_SIZE: usize = sign_key_size(LOGN);

/// Length of the signing nonce.
pub const NONCE_SIZE: usize = 40;

/// Salt version written by [`sign_compressed`]. Bumped only when the signing
/// derivation changes.
pub const CURRENT_SALT_VERSION: u8 = 0;

// header byte plus salt version
const PREFIX_SIZE: usize = 2;

// engine-side padded signature: header, nonce, s2
const PADDED_SIZE: usize = signature_size(LOGN);
const S2_PADDED_SIZE: usize = PADDED_SIZE - 1 - NONCE_SIZE;

/// Upper bound on the length of a compressed signature.
pub const SIGNATURE_MAX_SIZE: usize = PREFIX_SIZE + NONCE_SIZE + S2_PADDED_SIZE;

const CT_COEFFICIENT_BITS: u32 = 12;
const S2_CT_SIZE: usize = N * CT_COEFFICIENT_BITS as usize / 8;

/// Exact length of a CT signature.
pub const CT_SIGNATURE_SIZE: usize = PREFIX_SIZE + NONCE_SIZE + S2_CT_SIZE;

const HEADER_COMPRESSED: u8 = 0x30 + LOGN as u8;
const HEADER_CT: u8 = 0x50 + LOGN as u8;

const _: () = assert!(CT_SIGNATURE_SIZE >= PREFIX_SIZE);
const _: () = assert!(SIGNATURE_MAX_SIZE < CT_SIGNATURE_SIZE);

/// Generate a key pair from a PRNG already in output mode.
pub(crate) fn keygen(
    rng: &mut ShakePrng,
    privkey: &mut [u8; PRIVATE_KEY_SIZE],
    pubkey: &mut [u8; PUBLIC_KEY_SIZE],
) -> Result<(), Status> {
    let mut kg = KeyPairGeneratorStandard::default();
    kg.keygen(LOGN, rng, privkey, pubkey);

    if SigningKeyStandard::decode(privkey).is_none() || VerifyingKeyStandard::decode(pubkey).is_none()
    {
        return Err(ERR_INTERNAL);
    }
    Ok(())
}

/// Sign `msg` into `sig`, returning the number of bytes written.
pub(crate) fn sign_compressed(
    sig: &mut [u8; SIGNATURE_MAX_SIZE],
    privkey: &[u8; PRIVATE_KEY_SIZE],
    msg: &[u8],
) -> Result<usize, Status> {
    let mut sk = SigningKeyStandard::decode(privkey).ok_or(ERR_FORMAT)?;
    if sk.get_logn() != LOGN {
        return Err(ERR_FORMAT);
    }
    // decoding does not reject every damaged key, and signing with one
    // never terminates
    if !ntru::is_consistent(&privkey[1..], N) {
        return Err(ERR_FORMAT);
    }

    let mut rng = ShakePrng::for_signing(CURRENT_SALT_VERSION, LOGN as u8, privkey, msg);
    let mut padded = [0u8; PADDED_SIZE];
    sk.sign(&mut rng, &DOMAIN_NONE, &HASH_ID_RAW, msg, &mut padded);
    if padded[0] != HEADER_COMPRESSED {
        return Err(ERR_INTERNAL);
    }

    let (nonce, s2) = padded[1..].split_at(NONCE_SIZE);
    let s2 = trim_padding(s2);
    if s2.is_empty() {
        return Err(ERR_INTERNAL);
    }

    let len = PREFIX_SIZE + NONCE_SIZE + s2.len();
    sig[0] = HEADER_COMPRESSED;
    sig[1] = CURRENT_SALT_VERSION;
    sig[PREFIX_SIZE..PREFIX_SIZE + NONCE_SIZE].copy_from_slice(nonce);
    sig[PREFIX_SIZE + NONCE_SIZE..len].copy_from_slice(s2);
    Ok(len)
}

/// Re-encode a compressed signature in CT form.
pub(crate) fn convert_compressed_to_ct(
    sig_ct: &mut [u8; CT_SIGNATURE_SIZE],
    sig: &[u8],
) -> Result<(), Status> {
    let parts = split_compressed(sig)?;
    let padded = parts.padded();
    let coefficients =
        encoding::decompress(&padded[1 + NONCE_SIZE..], N).ok_or(ERR_FORMAT)?;
    let s2 = encoding::encode_fixed(&coefficients, CT_COEFFICIENT_BITS).ok_or(ERR_FORMAT)?;
    if s2.len() != S2_CT_SIZE {
        return Err(ERR_INTERNAL);
    }

    sig_ct[0] = HEADER_CT;
    sig_ct[1] = parts.salt_version;
    sig_ct[PREFIX_SIZE..PREFIX_SIZE + NONCE_SIZE].copy_from_slice(parts.nonce);
    sig_ct[PREFIX_SIZE + NONCE_SIZE..].copy_from_slice(&s2);
    Ok(())
}

/// Check a compressed signature of `msg` under `pubkey`.
pub(crate) fn verify_compressed(
    sig: &[u8],
    pubkey: &[u8; PUBLIC_KEY_SIZE],
    msg: &[u8],
) -> Result<(), Status> {
    let parts = split_compressed(sig)?;
    check_salt_version(parts.salt_version)?;
    verify_padded(&parts.padded(), pubkey, msg)
}

/// Check a CT signature of `msg` under `pubkey`.
pub(crate) fn verify_ct(
    sig: &[u8; CT_SIGNATURE_SIZE],
    pubkey: &[u8; PUBLIC_KEY_SIZE],
    msg: &[u8],
) -> Result<(), Status> {
    if sig[0] != HEADER_CT {
        return Err(ERR_FORMAT);
    }
    check_salt_version(sig[1])?;

    let (nonce, s2) = sig[PREFIX_SIZE..].split_at(NONCE_SIZE);
    let coefficients =
        encoding::decode_fixed(s2, N, CT_COEFFICIENT_BITS).ok_or(ERR_FORMAT)?;
    // a vector that does not compress cannot be a valid signature
    let s2 = encoding::compress(&coefficients, S2_PADDED_SIZE).ok_or(ERR_BADSIG)?;

    let mut padded = [0u8; PADDED_SIZE];
    padded[0] = HEADER_COMPRESSED;
    padded[1..1 + NONCE_SIZE].copy_from_slice(nonce);
    padded[1 + NONCE_SIZE..].copy_from_slice(&s2);
    verify_padded(&padded, pubkey, msg)
}

/// Borrowed view of a structurally valid compressed signature.
struct CompressedParts<'a> {
    salt_version: u8,
    nonce: &'a [u8],
    s2: &'a [u8],
}

impl CompressedParts<'_> {
    /// The engine-side padded form.
    fn padded(&self) -> [u8; PADDED_SIZE] {
        let mut padded = [0u8; PADDED_SIZE];
        padded[0] = HEADER_COMPRESSED;
        padded[1..1 + NONCE_SIZE].copy_from_slice(self.nonce);
        padded[1 + NONCE_SIZE..1 + NONCE_SIZE + self.s2.len()].copy_from_slice(self.s2);
        padded
    }
}

fn split_compressed(sig: &[u8]) -> Result<CompressedParts<'_>, Status> {
    if sig.len() <= PREFIX_SIZE + NONCE_SIZE || sig.len() > SIGNATURE_MAX_SIZE {
        return Err(ERR_FORMAT);
    }
    if sig[0] != HEADER_COMPRESSED {
        return Err(ERR_FORMAT);
    }
    // canonical form carries no padding
    if sig[sig.len() - 1] == 0 {
        return Err(ERR_FORMAT);
    }

    let (nonce, s2) = sig[PREFIX_SIZE..].split_at(NONCE_SIZE);
    Ok(CompressedParts {
        salt_version: sig[1],
        nonce,
        s2,
    })
}

fn check_salt_version(salt_version: u8) -> Result<(), Status> {
    if salt_version != CURRENT_SALT_VERSION {
        return Err(ERR_BADSIG);
    }
    Ok(())
}

fn verify_padded(
    padded: &[u8; PADDED_SIZE],
    pubkey: &[u8; PUBLIC_KEY_SIZE],
    msg: &[u8],
) -> Result<(), Status> {
    let vk = VerifyingKeyStandard::decode(pubkey).ok_or(ERR_FORMAT)?;
    if vk.verify(padded, &DOMAIN_NONE, &HASH_ID_RAW, msg) {
        Ok(())
    } else {
        Err(ERR_BADSIG)
    }
}

fn trim_padding(s2: &[u8]) -> &[u8] {
    let end = s2.iter().rposition(|&b| b != 0).map_or(0, |i| i + 1);
    &s2[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(PUBLIC_KEY_SIZE, 1793);
        assert_eq!(PRIVATE_KEY_SIZE, 2305);
        assert_eq!(SIGNATURE_MAX_SIZE, 1281);
        assert_eq!(CT_SIGNATURE_SIZE, 1578);
        assert_eq!(HEADER_COMPRESSED, 0x3A);
        assert_eq!(HEADER_CT, 0x5A);
    }

    #[test]
    fn trim_padding_keeps_last_set_byte() {
        assert_eq!(trim_padding(&[1, 0, 2, 0, 0]), &[1, 0, 2]);
        assert_eq!(trim_padding(&[0, 0]), &[] as &[u8]);
        assert_eq!(trim_padding(&[7]), &[7]);
    }

    #[test]
    fn split_rejects_bad_framing() {
        let mut sig = [0u8; 60];
        sig[0] = HEADER_COMPRESSED;
        sig[59] = 1;
        assert!(split_compressed(&sig).is_ok());

        assert_eq!(split_compressed(&sig[..42]).err(), Some(ERR_FORMAT));
        assert_eq!(split_compressed(&[]).err(), Some(ERR_FORMAT));

        let mut wrong_header = sig;
        wrong_header[0] = HEADER_CT;
        assert_eq!(split_compressed(&wrong_header).err(), Some(ERR_FORMAT));

        let mut padded = sig;
        padded[59] = 0;
        assert_eq!(split_compressed(&padded).err(), Some(ERR_FORMAT));

        let long = [1u8; SIGNATURE_MAX_SIZE + 1];
        assert_eq!(split_compressed(&long).err(), Some(ERR_FORMAT));
    }

    #[test]
    fn unknown_salt_version_is_rejected() {
        assert!(check_salt_version(CURRENT_SALT_VERSION).is_ok());
        assert_eq!(
            check_salt_version(CURRENT_SALT_VERSION.wrapping_add(1)).err(),
            Some(ERR_BADSIG)
        );
    }
}
