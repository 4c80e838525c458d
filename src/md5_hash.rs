//! MD5 accumulation for `SPI_FLASH_MD5` and the `READ_FLASH` streaming
//! trailer.
//!
//! The MD5 algorithm itself is the opaque "MD5 primitive" named in the
//! system scope; we consume it through the `md-5` crate's `Digest` trait
//! rather than reimplementing it, exactly as the core is meant to treat any
//! vendor primitive.

use md5::{Digest, Md5};

/// A running MD5 accumulator over however many chunks the caller feeds it.
pub struct Md5Accumulator {
    hasher: Md5,
}

impl Md5Accumulator {
    pub fn new() -> Self {
        Self { hasher: Md5::new() }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// Consumes the accumulator, returning the 16-byte digest.
    pub fn finish(self) -> [u8; 16] {
        self.hasher.finalize().into()
    }
}

impl Default for Md5Accumulator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_known_digest_for_empty_input() {
        let acc = Md5Accumulator::new();
        let digest = acc.finish();
        // MD5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(
            digest,
            [
                0xd4, 0x1d, 0x8c, 0xd9, 0x8f, 0x00, 0xb2, 0x04, 0xe9, 0x80, 0x09, 0x98, 0xec, 0xf8,
                0x42, 0x7e
            ]
        );
    }

    #[test]
    fn chunked_updates_match_a_single_update() {
        let data = [0xAAu8; 4096];

        let mut chunked = Md5Accumulator::new();
        for chunk in data.chunks(731) {
            chunked.update(chunk);
        }

        let mut whole = Md5Accumulator::new();
        whole.update(&data);

        assert_eq!(chunked.finish(), whole.finish());
    }
}
