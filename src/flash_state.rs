//! The flash-only extension of [`OperationState`] plus the erase-ahead
//! helper that hides sector-erase latency behind write traffic.

use crate::error::CoreError;
use crate::flash_driver::{FlashDriver, FlashDriverError};
use crate::operation::OperationState;

/// Flash-specific state layered on top of the shared `BEGIN..DATA..END`
/// shape: streaming-inflate bookkeeping and the erase-ahead high-water
/// mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashState {
    pub op: OperationState,
    pub encrypt: bool,
    pub next_erase_addr: u32,
    pub erase_remaining: u32,
}

impl FlashState {
    pub const fn idle() -> Self {
        Self {
            op: OperationState::idle(),
            encrypt: false,
            next_erase_addr: 0,
            erase_remaining: 0,
        }
    }

    /// Rounds `[offset, offset + total_size)` out to sector boundaries and
    /// arms the erase-ahead high-water mark, ready for `ensure_erased_to`.
    pub fn arm_erase(&mut self, sector_size: u32, offset: u32, total_size: u32) {
        let end = offset.saturating_add(total_size);
        let start_sector = (offset / sector_size) * sector_size;
        let end_sector = end.div_ceil(sector_size) * sector_size;

        self.next_erase_addr = start_sector;
        self.erase_remaining = end_sector - start_sector;
    }

    pub fn reset(&mut self) {
        *self = Self::idle();
    }
}

impl Default for FlashState {
    fn default() -> Self {
        Self::idle()
    }
}

/// Spin-drives sector erases until `next_erase_addr >= target`, satisfying
/// invariant 3 (every byte written to flash has been erased). Non-blocking
/// `Busy` results from the driver are treated as "keep trying"; the caller
/// may interleave other work between calls in the inflate loop.
pub fn ensure_erased_to(
    state: &mut FlashState,
    driver: &mut impl FlashDriver,
    target: u32,
) -> Result<(), CoreError> {
    while state.next_erase_addr < target && state.erase_remaining > 0 {
        match driver.start_next_erase(&mut state.next_erase_addr, &mut state.erase_remaining) {
            Ok(()) => {}
            Err(FlashDriverError::Busy) => return Ok(()),
            Err(_) => return Err(CoreError::FlashHardware),
        }
    }
    Ok(())
}

/// One opportunistic erase-ahead step, used inside the inflate loop to hide
/// erase latency without looping to completion on every call.
pub fn pump_erase(state: &mut FlashState, driver: &mut impl FlashDriver) -> Result<(), CoreError> {
    if state.erase_remaining == 0 {
        return Ok(());
    }
    match driver.start_next_erase(&mut state.next_erase_addr, &mut state.erase_remaining) {
        Ok(()) | Err(FlashDriverError::Busy) => Ok(()),
        Err(_) => Err(CoreError::FlashHardware),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingDriver {
        sector_size: u32,
        erase_calls: Vec<(u32, u32)>,
        fail_after: Option<usize>,
    }

    impl FlashDriver for RecordingDriver {
        fn sector_size(&self) -> u32 {
            self.sector_size
        }
        fn attach(&mut self, _config: u32) -> Result<(), FlashDriverError> {
            Ok(())
        }
        fn update_config(
            &mut self,
            _params: crate::flash_driver::SpiParams,
        ) -> Result<(), FlashDriverError> {
            Ok(())
        }
        fn start_next_erase(
            &mut self,
            next_addr: &mut u32,
            remaining: &mut u32,
        ) -> Result<(), FlashDriverError> {
            if let Some(n) = self.fail_after {
                if self.erase_calls.len() >= n {
                    return Err(FlashDriverError::Hardware);
                }
            }
            self.erase_calls.push((*next_addr, *remaining));
            *next_addr += self.sector_size;
            *remaining = remaining.saturating_sub(self.sector_size);
            Ok(())
        }
        fn erase_chip(&mut self) -> Result<(), FlashDriverError> {
            Ok(())
        }
        fn erase_area(&mut self, _addr: u32, _size: u32) -> Result<(), FlashDriverError> {
            Ok(())
        }
        fn wait_ready(&mut self, _timeout_us: u32) -> Result<(), FlashDriverError> {
            Ok(())
        }
        fn write_buff(
            &mut self,
            _addr: u32,
            _data: &[u8],
            _encrypt: bool,
        ) -> Result<(), FlashDriverError> {
            Ok(())
        }
        fn read_buff(&mut self, _addr: u32, _out: &mut [u8]) -> Result<(), FlashDriverError> {
            Ok(())
        }
    }

    #[test]
    fn arm_erase_rounds_out_to_sector_boundaries() {
        let mut fs = FlashState::idle();
        fs.arm_erase(4096, 0x10000 + 10, 4096 * 2 - 20);
        assert_eq!(fs.next_erase_addr, 0x10000);
        assert_eq!(fs.erase_remaining, 4096 * 3);
    }

    #[test]
    fn ensure_erased_to_drives_until_target_covered() {
        let mut fs = FlashState::idle();
        fs.arm_erase(4096, 0x10000, 4096 * 4);
        let mut driver = RecordingDriver {
            sector_size: 4096,
            erase_calls: Vec::new(),
            fail_after: None,
        };

        ensure_erased_to(&mut fs, &mut driver, 0x10000 + 4096 * 2).unwrap();
        assert_eq!(driver.erase_calls.len(), 2);
        assert!(fs.next_erase_addr >= 0x10000 + 4096 * 2);
    }

    #[test]
    fn ensure_erased_to_surfaces_hardware_failure() {
        let mut fs = FlashState::idle();
        fs.arm_erase(4096, 0, 4096 * 4);
        let mut driver = RecordingDriver {
            sector_size: 4096,
            erase_calls: Vec::new(),
            fail_after: Some(1),
        };
        assert_eq!(
            ensure_erased_to(&mut fs, &mut driver, 4096 * 3),
            Err(CoreError::FlashHardware)
        );
    }
}
