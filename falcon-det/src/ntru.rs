//! Consistency check for decoded private keys.
//!
//! A private key stores f, g and F. The fourth polynomial G is implied by the
//! NTRU equation `f*G - g*F = q` over `Z[x]/(x^n + 1)`. A key whose stored
//! polynomials admit no small G is not a lattice basis and the sampler never
//! finds a short vector for it, so such keys are refused before signing.
//!
//! G is recovered as `g*F/f mod q` by evaluating at the `n` roots of
//! `x^n + 1` modulo q and interpolating back. The transforms are the plain
//! quadratic ones; they run once per signature.

use alloc::vec::Vec;
use zeroize::Zeroizing;

use crate::encoding;

/// Falcon modulus.
const Q: u32 = 12289;

/// Bits per encoded coefficient of f and g at degree 1024.
const SMALL_BITS: u32 = 5;
/// Bits per encoded coefficient of F.
const BIG_BITS: u32 = 8;
/// Largest magnitude of a coefficient of G.
const MAX_BIG_G: i32 = 127;

type Poly = Zeroizing<Vec<i32>>;

/// Check that `body` (a private key without its header byte) holds f, g and
/// F of degree `n` such that `f*G - g*F = q` for a G whose coefficients lie
/// in `[-127, 127]`.
pub(crate) fn is_consistent(body: &[u8], n: usize) -> bool {
    let small_len = (n * SMALL_BITS as usize + 7) / 8;
    let big_len = (n * BIG_BITS as usize + 7) / 8;
    if body.len() != 2 * small_len + big_len {
        return false;
    }

    let (f, rest) = body.split_at(small_len);
    let (g, big_f) = rest.split_at(small_len);
    let (Some(f), Some(g), Some(big_f)) = (
        decode(f, n, SMALL_BITS),
        decode(g, n, SMALL_BITS),
        decode(big_f, n, BIG_BITS),
    ) else {
        return false;
    };

    let Some(big_g) = solve_big_g(&f, &g, &big_f) else {
        return false;
    };
    if big_g.iter().any(|c| c.abs() > MAX_BIG_G) {
        return false;
    }
    residue_is_q(&f, &g, &big_f, &big_g)
}

fn decode(x: &[u8], n: usize, bits: u32) -> Option<Poly> {
    let coefficients = Zeroizing::new(encoding::decode_fixed(x, n, bits)?);
    Some(Zeroizing::new(
        coefficients.iter().map(|&c| i32::from(c)).collect(),
    ))
}

/// `g*F/f mod q`, centered. None if f is not invertible modulo q.
fn solve_big_g(f: &[i32], g: &[i32], big_f: &[i32]) -> Option<Poly> {
    let n = f.len();
    let powers = root_powers(2 * n as u32)?;

    let f_hat = evaluate(f, &powers);
    let g_hat = evaluate(g, &powers);
    let big_f_hat = evaluate(big_f, &powers);

    let mut big_g_hat = Zeroizing::new(Vec::with_capacity(n));
    for i in 0..n {
        if f_hat[i] == 0 {
            return None;
        }
        let gf = mul_mod(g_hat[i], big_f_hat[i]);
        big_g_hat.push(mul_mod(gf, pow_mod(f_hat[i], Q - 2)));
    }

    let big_g = interpolate(&big_g_hat, &powers);
    Some(Zeroizing::new(
        big_g
            .iter()
            .map(|&c| if c > Q / 2 { c as i32 - Q as i32 } else { c as i32 })
            .collect(),
    ))
}

/// Exact integer check of `f*G - g*F == q` modulo `x^n + 1`.
fn residue_is_q(f: &[i32], g: &[i32], big_f: &[i32], big_g: &[i32]) -> bool {
    let n = f.len();
    let mut residue = Zeroizing::new(alloc::vec![0i32; n]);
    for i in 0..n {
        for j in 0..n {
            let t = f[i] * big_g[j] - g[i] * big_f[j];
            if i + j < n {
                residue[i + j] += t;
            } else {
                residue[i + j - n] -= t;
            }
        }
    }
    residue[0] == Q as i32 && residue[1..].iter().all(|&c| c == 0)
}

/// `w^k` for `k` in `0..order`, w a primitive `order`-th root of unity mod q.
fn root_powers(order: u32) -> Option<Vec<u32>> {
    let w = root_of_unity(order)?;
    let mut powers = Vec::with_capacity(order as usize);
    let mut p = 1;
    for _ in 0..order {
        powers.push(p);
        p = mul_mod(p, w);
    }
    Some(powers)
}

/// Primitive `order`-th root of unity mod q, `order` a power of two
/// dividing `q - 1`.
fn root_of_unity(order: u32) -> Option<u32> {
    if order < 2 || (Q - 1) % order != 0 {
        return None;
    }
    (2..Q)
        .map(|a| pow_mod(a, (Q - 1) / order))
        .find(|&w| pow_mod(w, order / 2) == Q - 1)
}

/// Values of `a` at `w^(2i+1)` for `i` in `0..n`, the roots of `x^n + 1`.
fn evaluate(a: &[i32], powers: &[u32]) -> Zeroizing<Vec<u32>> {
    let n = a.len();
    let mask = 2 * n - 1;
    let a: Zeroizing<Vec<u32>> =
        Zeroizing::new(a.iter().map(|&c| c.rem_euclid(Q as i32) as u32).collect());

    Zeroizing::new(
        (0..n)
            .map(|i| {
                let step = 2 * i + 1;
                let mut e = 0;
                let mut acc = 0u64;
                for &c in a.iter() {
                    acc += u64::from(c) * u64::from(powers[e]);
                    e = (e + step) & mask;
                }
                (acc % u64::from(Q)) as u32
            })
            .collect(),
    )
}

/// Inverse of [`evaluate`].
fn interpolate(values: &[u32], powers: &[u32]) -> Zeroizing<Vec<u32>> {
    let n = values.len();
    let mask = 2 * n - 1;
    let n_inv = u64::from(pow_mod(n as u32 % Q, Q - 2));

    Zeroizing::new(
        (0..n)
            .map(|j| {
                let mut acc = 0u64;
                for (i, &v) in values.iter().enumerate() {
                    let e = ((2 * i + 1) * j) & mask;
                    acc += u64::from(v) * u64::from(powers[(2 * n - e) & mask]);
                }
                (acc % u64::from(Q) * n_inv % u64::from(Q)) as u32
            })
            .collect(),
    )
}

fn mul_mod(a: u32, b: u32) -> u32 {
    (u64::from(a) * u64::from(b) % u64::from(Q)) as u32
}

fn pow_mod(mut base: u32, mut exp: u32) -> u32 {
    let mut result = 1;
    base %= Q;
    while exp > 0 {
        if exp & 1 == 1 {
            result = mul_mod(result, base);
        }
        base = mul_mod(base, base);
        exp >>= 1;
    }
    result
}
