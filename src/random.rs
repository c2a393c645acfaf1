//! Random source and encoding for generated element names.

use heapless::String;
use rand_core::{RngCore, SeedableRng};

pub(crate) use rand_xoshiro::Xoshiro128StarStar;

/// Generator for element names, seeded from four words in little-endian
/// order.
///
/// Only used to make element names unlikely to collide; it is not a
/// cryptographic source.
pub(crate) fn seeded(seed: [u32; 4]) -> Xoshiro128StarStar {
    let mut bytes = [0u8; 16];
    for (chunk, word) in bytes.chunks_exact_mut(4).zip(seed) {
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    Xoshiro128StarStar::from_seed(bytes)
}

/// 128 random bits.
pub(crate) fn next_id<R: RngCore>(rng: &mut R) -> [u8; 16] {
    let mut out = [0u8; 16];
    rng.fill_bytes(&mut out);
    out
}

const BASE64URL: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Unpadded URL-safe base64. Returns `None` if the output does not fit in `N`.
pub(crate) fn base64url<const N: usize>(data: &[u8]) -> Option<String<N>> {
    let mut out = String::new();
    let mut push = |sextet: u32| out.push(BASE64URL[(sextet & 0x3f) as usize] as char).ok();

    for chunk in data.chunks(3) {
        let b = [
            chunk[0] as u32,
            chunk.get(1).copied().unwrap_or(0) as u32,
            chunk.get(2).copied().unwrap_or(0) as u32,
        ];
        let group = (b[0] << 16) | (b[1] << 8) | b[2];

        push(group >> 18)?;
        push(group >> 12)?;
        if chunk.len() > 1 {
            push(group >> 6)?;
        }
        if chunk.len() > 2 {
            push(group)?;
        }
    }
    Some(out)
}
