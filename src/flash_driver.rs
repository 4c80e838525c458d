//! The external flash-driver seam.
//!
//! Everything in this trait is a vendor-supplied, opaque capability per the
//! scope note in the system overview — sector geometry, the actual SPI
//! transactions and chip-erase timing are out of scope for this crate. The
//! trait exists only to give the flash-write pipeline and the dispatcher
//! handlers something concrete to call.

/// A vendor flash driver, bound once at startup via [`Core::new`](crate::dispatcher::Core::new).
pub trait FlashDriver {
    /// Sector size in bytes; erase extents are rounded out to this.
    fn sector_size(&self) -> u32;

    /// Attaches to the external flash (`SPI_ATTACH`).
    fn attach(&mut self, config: u32) -> Result<(), FlashDriverError>;

    /// Reconfigures geometry (`SPI_SET_PARAMS`).
    fn update_config(&mut self, params: SpiParams) -> Result<(), FlashDriverError>;

    /// Non-blocking: kicks off the next sector erase starting at or after
    /// `*next_addr`, advancing `*next_addr` and decrementing `*remaining` by
    /// one sector on success. Returns `Busy` if the previous erase hasn't
    /// completed yet; the caller is expected to retry later rather than
    /// block.
    fn start_next_erase(
        &mut self,
        next_addr: &mut u32,
        remaining: &mut u32,
    ) -> Result<(), FlashDriverError>;

    /// Erases the whole chip. Blocking.
    fn erase_chip(&mut self) -> Result<(), FlashDriverError>;

    /// Erases `[addr, addr + size)`, both sector-aligned. Blocking.
    fn erase_area(&mut self, addr: u32, size: u32) -> Result<(), FlashDriverError>;

    /// Blocks until the flash reports ready, or `timeout_us` elapses.
    fn wait_ready(&mut self, timeout_us: u32) -> Result<(), FlashDriverError>;

    /// Writes `data` to `addr`, optionally through the encryption engine.
    fn write_buff(&mut self, addr: u32, data: &[u8], encrypt: bool) -> Result<(), FlashDriverError>;

    /// Reads `len` bytes starting at `addr` into `out` (`out.len() >= len`).
    fn read_buff(&mut self, addr: u32, out: &mut [u8]) -> Result<(), FlashDriverError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashDriverError {
    Busy,
    Hardware,
    Unaligned,
}

/// Geometry carried by `SPI_SET_PARAMS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpiParams {
    pub flash_id: u32,
    pub flash_size: u32,
    pub block_size: u32,
    pub sector_size: u32,
    pub page_size: u32,
    pub status_mask: u32,
}
