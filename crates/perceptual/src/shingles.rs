//! Shingling and set overlap.
//!
//! Tokens are hashed once with xxh3, then combined into k-token shingles by a
//! polynomial rolling hash in O(n). The Jaccard term works on the resulting
//! hash sets.

use std::collections::HashSet;

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Hash each token with a seeded xxh3.
pub fn token_hashes<S: AsRef<str>>(tokens: &[S], seed: u64) -> Vec<u64> {
    tokens
        .iter()
        .map(|t| xxh3_64_with_seed(t.as_ref().as_bytes(), seed))
        .collect()
}

/// Compute rolling-hash shingles over pre-hashed tokens.
///
/// A non-empty sequence shorter than `k` yields exactly one shingle covering
/// the whole sequence, so short sentences still have something to compare.
pub fn make_shingles_rolling(hashes: &[u64], k: usize, seed: u64) -> Vec<u64> {
    let n = hashes.len();
    if k == 0 || n == 0 {
        return Vec::new();
    }
    let k = k.min(n);

    // Seed-derived base keeps shingle values independent across seeds.
    const BASE: u64 = 1_000_003;
    let base = BASE ^ splitmix64(seed);

    let mut base_km1 = 1u64;
    for _ in 1..k {
        base_km1 = base_km1.wrapping_mul(base);
    }

    let mut out = Vec::with_capacity(n - k + 1);
    let mut h = 0u64;
    for &val in hashes.iter().take(k) {
        h = h.wrapping_mul(base).wrapping_add(val);
    }
    out.push(h);

    for (&old, &new) in hashes.iter().zip(hashes.iter().skip(k)) {
        h = h.wrapping_sub(old.wrapping_mul(base_km1));
        h = h.wrapping_mul(base).wrapping_add(new);
        out.push(h);
    }
    out
}

/// Distinct shingle hashes of a token-hash sequence.
pub fn shingle_set(hashes: &[u64], k: usize, seed: u64) -> HashSet<u64> {
    make_shingles_rolling(hashes, k, seed).into_iter().collect()
}

/// `|A ∩ B| / |A ∪ B|`, computed on integer counts. Two empty sets score 1.0.
pub fn jaccard(a: &HashSet<u64>, b: &HashSet<u64>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let intersection = small.iter().filter(|h| large.contains(*h)).count();
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

#[inline]
pub(crate) fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}
