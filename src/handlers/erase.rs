//! `ERASE_FLASH` (0xD0) / `ERASE_REGION` (0xD1): whole-chip and bounded
//! erase. `ERASE_REGION` drives `start_next_erase` itself (the same
//! primitive the erase-ahead pipeline uses) rather than delegating to a
//! driver-side blocking `erase_area`, per the original `s_erase_region`.

use super::le_u32;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::flash_driver::{FlashDriver, FlashDriverError};

/// Erase timeout budget per sector, per spec.md §4.3/§5.
const MS_PER_SECTOR: u32 = 120;

pub fn erase_flash<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let _ = ctx;
    match core.platform.flash().erase_chip() {
        Ok(()) => HandlerOutcome::success(0),
        Err(_) => HandlerOutcome::error(ResponseCode::FailedSpiOp),
    }
}

pub fn erase_region<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let addr = le_u32(ctx.payload, 0);
    let size = le_u32(ctx.payload, 4);
    let sector_size = core.platform.flash().sector_size();
    if sector_size == 0 || addr % sector_size != 0 || size % sector_size != 0 {
        return HandlerOutcome::error(ResponseCode::BadDataLen);
    }

    let mut next_addr = addr;
    let mut remaining = size;
    let flash = core.platform.flash();
    while remaining > 0 {
        match flash.start_next_erase(&mut next_addr, &mut remaining) {
            Ok(()) => {}
            Err(FlashDriverError::Busy) => continue,
            Err(_) => return HandlerOutcome::error(ResponseCode::FailedSpiOp),
        }
    }

    let num_sectors = size / sector_size;
    let timeout_us = num_sectors.saturating_mul(MS_PER_SECTOR).saturating_mul(1000);
    match flash.wait_ready(timeout_us) {
        Ok(()) => HandlerOutcome::success(0),
        Err(_) => HandlerOutcome::error(ResponseCode::FailedSpiOp),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Core;
    use crate::test_support::FakePlatform;

    #[test]
    fn erase_region_rejects_unaligned_extents() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        let payload = {
            let mut p = Vec::new();
            p.extend_from_slice(&10u32.to_le_bytes());
            p.extend_from_slice(&4096u32.to_le_bytes());
            p
        };
        let ctx = Context {
            opcode: 0xD1,
            payload_len: payload.len() as u16,
            checksum_or_value: 0,
            payload: &payload,
        };
        assert_eq!(erase_region(&mut core, &ctx).code, ResponseCode::BadDataLen);
    }

    #[test]
    fn erase_region_accepts_sector_aligned_extents() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        let payload = {
            let mut p = Vec::new();
            p.extend_from_slice(&0x10000u32.to_le_bytes());
            p.extend_from_slice(&8192u32.to_le_bytes());
            p
        };
        let ctx = Context {
            opcode: 0xD1,
            payload_len: payload.len() as u16,
            checksum_or_value: 0,
            payload: &payload,
        };
        assert_eq!(erase_region(&mut core, &ctx).code, ResponseCode::Success);
        assert_eq!(core.platform.flash.erase_calls.len(), 2);
        assert_eq!(core.platform.flash.erase_calls[0], (0x10000, 8192));
        assert_eq!(core.platform.flash.erase_calls[1], (0x10000 + 4096, 4096));
    }
}
