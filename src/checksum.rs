//! The data XOR-checksum used by `FLASH_DATA` and `FLASH_DEFL_DATA`.

/// Seed XOR'd into every checksum before the data bytes are folded in.
pub const SEED: u8 = 0xEF;

/// Folds `data` into a running XOR checksum, seeded with [`SEED`].
///
/// `checksum(a) ^ checksum(b) ^ SEED == checksum(a ++ b)` — folding two
/// independently-seeded checksums together double-counts the seed, so
/// combining partial checksums requires re-XORing it out. Callers that only
/// ever checksum a single contiguous region don't need to know this; it
/// matters for the property test below and for nothing else in this crate.
pub fn checksum(data: &[u8]) -> u8 {
    data.iter().fold(SEED, |acc, &b| acc ^ b)
}
