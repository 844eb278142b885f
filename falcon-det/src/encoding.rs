//! Codecs for the `s2` half of a signature.
//!
//! The compressed codec is Algorithm 17/18 p. 47-48 of the [Falcon paper]:
//! each coefficient is a sign bit, its 7 low bits in binary, and its high bits
//! in unary terminated by a one. The fixed-width codec stores every
//! coefficient in the same number of bits, two's complement, most significant
//! bit first; this is the layout of CT signatures.
//!
//! [Falcon paper]: https://falcon-sign.info/falcon.pdf

use alloc::vec::Vec;
use bit_vec::BitVec;

/// Largest coefficient magnitude accepted by either codec.
pub(crate) const MAX_COEFFICIENT: i16 = 2047;

/// Take as input a list of integers v and a byte length `byte_length`, and
/// return a bytestring of exactly `byte_length` bytes that encodes v,
/// zero-padded at the end.
///
/// Returns None if v is empty, if a coefficient is out of range, or if the
/// encoding does not fit.
pub(crate) fn compress(v: &[i16], byte_length: usize) -> Option<Vec<u8>> {
    if v.is_empty() {
        return None;
    }

    let capacity = byte_length * 8;
    let mut bits = BitVec::with_capacity(capacity);
    for &coeff in v {
        if coeff.unsigned_abs() > MAX_COEFFICIENT as u16 {
            return None;
        }
        let (length, head) = compress_coefficient(coeff);
        if bits.len() + length > capacity {
            return None;
        }
        // sign and low bits
        for i in (0..8).rev() {
            bits.push((head >> i) & 1 == 1);
        }
        // high bits, unary
        for _ in 9..length {
            bits.push(false);
        }
        bits.push(true);
    }

    let padding = capacity - bits.len();
    bits.grow(padding, false);
    Some(bits.to_bytes())
}

/// Bit length of one encoded coefficient, plus its leading byte
/// (sign bit followed by the 7 low bits).
fn compress_coefficient(coeff: i16) -> (usize, u8) {
    let sign = (coeff < 0) as u8;
    let abs = coeff.unsigned_abs();
    let low = abs as u8 & 127;
    let high = abs >> 7;
    (1 + 7 + high as usize + 1, (sign << 7) | low)
}

/// Take as input an encoding x, and a length n, and return the list of n
/// integers that x encodes. If x is not the canonical encoding of such a
/// list, including when its padding carries set bits, return None.
pub(crate) fn decompress(x: &[u8], n: usize) -> Option<Vec<i16>> {
    let bits = BitVec::from_bytes(x);
    let mut index = 0;
    let mut result = Vec::with_capacity(n);

    for _ in 0..n {
        // sign, 7 low bits and at least the unary terminator
        if index + 9 > bits.len() {
            return None;
        }

        let negative = bits[index];
        let low = (1..8).fold(0i16, |acc, i| (acc << 1) | bits[index + i] as i16);
        index += 8;

        let mut high = 0i16;
        loop {
            match bits.get(index) {
                None => return None,
                Some(true) => break,
                Some(false) => high += 1,
            }
            index += 1;
            if (high << 7) > MAX_COEFFICIENT {
                return None;
            }
        }
        index += 1;

        let magnitude = (high << 7) | low;
        if magnitude > MAX_COEFFICIENT {
            return None;
        }
        // "minus zero" has no canonical encoding
        if negative && magnitude == 0 {
            return None;
        }
        result.push(if negative { -magnitude } else { magnitude });
    }

    if bits.iter().skip(index).any(|b| b) {
        // unread part of input contains set bits
        return None;
    }

    Some(result)
}

/// Encode every coefficient of v on `bits` bits, two's complement.
///
/// Coefficients must lie in `-(2^(bits-1) - 1)..=(2^(bits-1) - 1)`; the most
/// negative value is reserved and never produced.
pub(crate) fn encode_fixed(v: &[i16], bits: u32) -> Option<Vec<u8>> {
    let bound = (1i32 << (bits - 1)) - 1;
    let mask = (1u32 << bits) - 1;

    let mut out = Vec::with_capacity((v.len() * bits as usize + 7) / 8);
    let mut acc = 0u32;
    let mut acc_len = 0u32;
    for &coeff in v {
        let c = i32::from(coeff);
        if c < -bound || c > bound {
            return None;
        }
        acc = (acc << bits) | (c as u32 & mask);
        acc_len += bits;
        while acc_len >= 8 {
            acc_len -= 8;
            out.push((acc >> acc_len) as u8);
        }
        acc &= (1 << acc_len) - 1;
    }
    if acc_len > 0 {
        out.push((acc << (8 - acc_len)) as u8);
    }
    Some(out)
}

/// Inverse of [`encode_fixed`]. The input must be exactly as long as the
/// encoding of n coefficients, and any trailing bits must be zero.
pub(crate) fn decode_fixed(x: &[u8], n: usize, bits: u32) -> Option<Vec<i16>> {
    if x.len() != (n * bits as usize + 7) / 8 {
        return None;
    }
    let mask = (1u32 << bits) - 1;
    let sign = 1u32 << (bits - 1);

    let mut bytes = x.iter();
    let mut result = Vec::with_capacity(n);
    let mut acc = 0u32;
    let mut acc_len = 0u32;
    while result.len() < n {
        while acc_len < bits {
            acc = (acc << 8) | u32::from(*bytes.next()?);
            acc_len += 8;
        }
        acc_len -= bits;
        let w = (acc >> acc_len) & mask;
        acc &= (1 << acc_len) - 1;

        if w == sign {
            return None;
        }
        let value = if w & sign != 0 {
            w as i32 - (1i32 << bits)
        } else {
            w as i32
        };
        result.push(value as i16);
    }

    if acc != 0 {
        return None;
    }
    Some(result)
}

#[cfg(test)]
mod test {
    use crate::encoding::{compress, decode_fixed, decompress, encode_fixed, MAX_COEFFICIENT};
    use alloc::vec::Vec;

    use proptest::prelude::*;

    fn coefficients(n: usize) -> impl Strategy<Value = Vec<i16>> {
        proptest::collection::vec(-MAX_COEFFICIENT..=MAX_COEFFICIENT, n)
    }

    proptest! {
        #[test]
        fn compress_does_not_crash(v in (0..2000usize).prop_flat_map(coefficients)) {
            compress(&v, 2 * v.len());
        }

        #[test]
        fn decompress_recovers(v in (1..1100usize).prop_flat_map(coefficients)) {
            let slen = 3 * v.len();
            let n = v.len();
            if let Some(compressed) = compress(&v, slen) {
                prop_assert_eq!(compressed.len(), slen);
                let recovered = decompress(&compressed, n).unwrap();
                prop_assert_eq!(&v, &recovered);
                let recompressed = compress(&recovered, slen).unwrap();
                prop_assert_eq!(compressed, recompressed);
            }
        }

        #[test]
        fn fixed_width_recovers(v in (1..1100usize).prop_flat_map(coefficients)) {
            let encoded = encode_fixed(&v, 12).unwrap();
            prop_assert_eq!(encoded.len(), (v.len() * 12 + 7) / 8);
            prop_assert_eq!(decode_fixed(&encoded, v.len(), 12).unwrap(), v);
        }
    }

    #[test]
    fn compress_empty_vec_fails() {
        assert!(compress(&[], 0).is_none());
        assert!(compress(&[], 16).is_none());
    }

    #[test]
    fn compress_rejects_short_buffer() {
        // 4 coefficients of magnitude 1 need 36 bits
        assert!(compress(&[1, -1, 1, -1], 4).is_none());
        assert!(compress(&[1, -1, 1, -1], 5).is_some());
    }

    #[test]
    fn compress_rejects_large_coefficient() {
        assert!(compress(&[MAX_COEFFICIENT + 1], 16).is_none());
        assert!(compress(&[-MAX_COEFFICIENT], 16).is_some());
    }

    #[test]
    fn known_encoding() {
        // 3 -> 0 0000011 1, -130 -> 1 0000010 0 1, padded
        let bytes = compress(&[3, -130], 3).unwrap();
        assert_eq!(bytes, alloc::vec![0b0000_0011, 0b1100_0001, 0b0010_0000]);
        assert_eq!(decompress(&bytes, 2).unwrap(), alloc::vec![3, -130]);
    }

    #[test]
    fn decompress_rejects_minus_zero() {
        // sign bit set, magnitude 0, terminator
        let bytes = [0b1000_0000, 0b1000_0000];
        assert!(decompress(&bytes, 1).is_none());
    }

    #[test]
    fn decompress_rejects_dirty_padding() {
        let mut bytes = compress(&[5, 6, 7], 8).unwrap();
        assert!(decompress(&bytes, 3).is_some());
        *bytes.last_mut().unwrap() |= 1;
        assert!(decompress(&bytes, 3).is_none());
    }

    #[test]
    fn decompress_rejects_truncated_input() {
        let bytes = compress(&[100; 16], 32).unwrap();
        assert!(decompress(&bytes[..10], 16).is_none());
        assert!(decompress(&[], 1).is_none());
    }

    #[test]
    fn fixed_width_rejects_reserved_value() {
        // 0x800 is -2048 on 12 bits
        let mut bytes = encode_fixed(&[0, 0], 12).unwrap();
        bytes[0] = 0x80;
        assert!(decode_fixed(&bytes, 2, 12).is_none());
        assert!(encode_fixed(&[-2048], 12).is_none());
        assert!(encode_fixed(&[2048], 12).is_none());
    }

    #[test]
    fn fixed_width_rejects_wrong_length_and_dirty_tail() {
        let bytes = encode_fixed(&[1, 2, 3], 12).unwrap();
        assert_eq!(bytes.len(), 5);
        assert!(decode_fixed(&bytes[..4], 3, 12).is_none());

        let mut dirty = bytes.clone();
        dirty[4] |= 0x01;
        assert!(decode_fixed(&dirty, 3, 12).is_none());
    }

    #[test]
    fn fixed_width_negative_values() {
        let v = [-1i16, -2047, 2047, 0];
        let bytes = encode_fixed(&v, 12).unwrap();
        assert_eq!(&bytes[..3], &[0xFF, 0xF8, 0x01]);
        assert_eq!(decode_fixed(&bytes, 4, 12).unwrap(), v.to_vec());
    }
}
