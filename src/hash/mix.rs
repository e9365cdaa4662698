//! SplitMix64 bit mixer.
//!
//! The finalizer from Steele, Lea and Flood's SplitMix generator. Every output
//! bit depends on every input bit, which is what turns a seeded key into a
//! digest with no exploitable low-bit structure.

/// Golden-ratio increment added before mixing.
pub const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

const MIX_MUL_1: u64 = 0xbf58_476d_1ce4_e5b9;
const MIX_MUL_2: u64 = 0x94d0_49bb_1331_11eb;

/// Mixes `x` with SplitMix64. All arithmetic wraps.
#[inline]
#[must_use]
pub const fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(MIX_MUL_1);
    z = (z ^ (z >> 27)).wrapping_mul(MIX_MUL_2);
    z ^ (z >> 31)
}

/// Number of differing bits between two digests.
#[inline]
#[must_use]
pub const fn bit_distance(a: u64, b: u64) -> u32 {
    (a ^ b).count_ones()
}

/// Mean number of output bits flipped when each of the 64 input bits of each
/// key is flipped in turn.
///
/// An ideal 64-bit mixer scores 32.0.
pub fn mean_avalanche<F, I>(keys: I, mut digest: F) -> f64
where
    F: FnMut(u64) -> u64,
    I: IntoIterator<Item = u64>,
{
    let mut flips = 0u64;
    let mut samples = 0u64;
    for key in keys {
        let base = digest(key);
        for bit in 0..u64::BITS {
            flips += u64::from(bit_distance(base, digest(key ^ (1u64 << bit))));
            samples += 1;
        }
    }
    if samples == 0 {
        return 0.0;
    }
    flips as f64 / samples as f64
}
