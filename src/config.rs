//! Compile-time tunables gathered in one place instead of scattered magic
//! numbers, mirroring the shape of the teacher's small settings structs
//! (`flasher::FlashSettings`).

/// Upper bound on `READ_FLASH`'s per-packet size, regardless of what the
/// host requests (see `handlers::read_flash`).
pub const READ_FLASH_MAX_PACKET: usize = 1024;

/// Drain chunk size for `FLASH_DEFL_DATA`'s streaming inflate output
/// buffer (see `handlers::flash_defl`).
pub const INFLATE_DRAIN_CHUNK: usize = 1024;

/// Read chunk size for `SPI_FLASH_MD5` (see `handlers::md5_cmd`).
pub const MD5_READ_CHUNK: usize = 4096;

/// A small bundle of the above, for callers that want them as values
/// rather than free constants (e.g. a target binding that wants to log
/// its configuration at startup).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    pub read_flash_max_packet: usize,
    pub inflate_drain_chunk: usize,
    pub md5_read_chunk: usize,
}

impl Config {
    pub const fn default() -> Self {
        Self {
            read_flash_max_packet: READ_FLASH_MAX_PACKET,
            inflate_drain_chunk: INFLATE_DRAIN_CHUNK,
            md5_read_chunk: MD5_READ_CHUNK,
        }
    }
}
