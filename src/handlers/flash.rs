//! `FLASH_BEGIN` / `FLASH_DATA` / `FLASH_END` (0x02/0x03/0x04): the raw
//! (uncompressed) flash-write pipeline.

use super::le_u32;
use crate::command::DATA_SUBHEADER_LEN;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::flash_driver::FlashDriver;
use crate::flash_state::{ensure_erased_to, pump_erase};

pub fn flash_begin<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let total_size = le_u32(ctx.payload, 0);
    let num_blocks = le_u32(ctx.payload, 4);
    let block_size = le_u32(ctx.payload, 8);
    let offset = le_u32(ctx.payload, 12);
    let encrypt = ctx.payload.len() == 20 && le_u32(ctx.payload, 16) != 0;

    core.flash.reset();
    core.flash.op.begin(total_size, num_blocks, block_size, offset);
    core.flash.encrypt = encrypt;

    let sector_size = core.platform.flash().sector_size();
    core.flash.arm_erase(sector_size, offset, total_size);
    log::debug!("FLASH_BEGIN offset={offset:#x} total_size={total_size} blocks={num_blocks} encrypt={encrypt}");
    if let Err(err) = pump_erase(&mut core.flash, core.platform.flash()) {
        log::warn!("erase-ahead failed during FLASH_BEGIN: {err}");
        return HandlerOutcome::error(err.into());
    }
    HandlerOutcome::success(0)
}

pub fn flash_data<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let data_len = le_u32(ctx.payload, 0) as usize;
    let bulk_len = ctx.payload.len() - DATA_SUBHEADER_LEN;
    if data_len > bulk_len {
        return HandlerOutcome::error(ResponseCode::NotEnoughData);
    }
    if data_len < bulk_len {
        return HandlerOutcome::error(ResponseCode::TooMuchData);
    }
    if let Err(code) = core.flash.op.check_in_progress() {
        return HandlerOutcome::error(code);
    }
    HandlerOutcome::success(0).with_post(flash_data_post)
}

fn flash_data_post<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> Result<(), ResponseCode> {
    let data_len = le_u32(ctx.payload, 0);
    let bulk = &ctx.payload[DATA_SUBHEADER_LEN..DATA_SUBHEADER_LEN + data_len as usize];

    let write_size = data_len.min(core.flash.op.total_remaining);
    let target = core.flash.op.offset + write_size;
    ensure_erased_to(&mut core.flash, core.platform.flash(), target).map_err(Into::into)?;

    core.platform
        .flash()
        .write_buff(core.flash.op.offset, &bulk[..write_size as usize], core.flash.encrypt)
        .map_err(|_| ResponseCode::FailedSpiOp)?;

    core.flash.op.advance(write_size);
    Ok(())
}

pub fn flash_end<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    if let Err(code) = core.flash.op.end() {
        return HandlerOutcome::error(code);
    }
    let _ = ctx;
    HandlerOutcome::success(0).with_post(flash_end_post)
}

pub(super) fn flash_end_post<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> Result<(), ResponseCode> {
    let reboot = le_u32(ctx.payload, 0);
    log::info!("FLASH_END reboot={reboot}");
    if reboot != 0 {
        core.platform.reboot();
    }
    Ok(())
}
