//! Protocol rolling hash over the canonical encoding.
//!
//! The remote service validates `s` with this exact schedule. Masking,
//! shift amounts and the two-step stride are fixed by the protocol.

/// Seed shared by both accumulators.
pub const HASH_SEED: u64 = 0x1505_1505;

const MASK: u64 = 0x7fff_ffff;

/// Compute the signature hash of a canonical string.
///
/// Walks code points from the end toward the front two at a time, folding
/// the current character into `a` and its predecessor into `b`. Returns the
/// unpadded lowercase hex of `a + b`.
pub fn cal_hash(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let length = chars.len() as i64;

    let mut a = HASH_SEED;
    let mut b = HASH_SEED;
    let mut i = length - 1;

    while i > 0 {
        let current = chars[i as usize] as u64;
        let previous = chars[(i - 1) as usize] as u64;
        a = MASK & (a ^ (current << ((length - i) % 30)));
        b = MASK & (b ^ (previous << (i % 30)));
        i -= 2;
    }

    format!("{:x}", a + b)
}
