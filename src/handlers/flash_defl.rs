//! `FLASH_DEFL_BEGIN` / `FLASH_DEFL_DATA` / `FLASH_DEFL_END`
//! (0x10/0x11/0x12): the streaming-inflate flash-write pipeline.

use super::le_u32;
use crate::command::DATA_SUBHEADER_LEN;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::flash_driver::FlashDriver;
use crate::flash_state::{ensure_erased_to, pump_erase};
use crate::config::INFLATE_DRAIN_CHUNK;
use crate::inflate::{Decompressor, InflateFlags, InflateStatus};

pub fn flash_defl_begin<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    let total_size = le_u32(ctx.payload, 0);
    let num_blocks = le_u32(ctx.payload, 4);
    let block_size = le_u32(ctx.payload, 8);
    let offset = le_u32(ctx.payload, 12);
    let encrypt = ctx.payload.len() == 20 && le_u32(ctx.payload, 16) != 0;

    core.flash.reset();
    core.flash.op.begin(total_size, num_blocks, block_size, offset);
    core.flash.encrypt = encrypt;
    core.platform.decompressor().reset();

    let sector_size = core.platform.flash().sector_size();
    core.flash.arm_erase(sector_size, offset, total_size);
    log::debug!("FLASH_DEFL_BEGIN offset={offset:#x} total_size={total_size} blocks={num_blocks}");
    if let Err(err) = pump_erase(&mut core.flash, core.platform.flash()) {
        log::warn!("erase-ahead failed during FLASH_DEFL_BEGIN: {err}");
        return HandlerOutcome::error(err.into());
    }
    HandlerOutcome::success(0)
}

pub fn flash_defl_data<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    if !core.flash.op.in_progress {
        return HandlerOutcome::error(ResponseCode::NotInFlashMode);
    }
    let seq = le_u32(ctx.payload, 4);
    if seq == 0 {
        core.platform.decompressor().reset();
    }
    HandlerOutcome::success(0).with_post(flash_defl_data_post)
}

fn flash_defl_data_post<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> Result<(), ResponseCode> {
    let data_len = le_u32(ctx.payload, 0) as usize;
    let seq = le_u32(ctx.payload, 4);
    let mut input = &ctx.payload[DATA_SUBHEADER_LEN..DATA_SUBHEADER_LEN + data_len];

    let mut flags = InflateFlags::HAS_MORE_INPUT;
    if seq == 0 {
        flags |= InflateFlags::PARSE_ZLIB_HEADER;
    }

    let mut out = [0u8; INFLATE_DRAIN_CHUNK];
    loop {
        pump_erase(&mut core.flash, core.platform.flash()).map_err(Into::<ResponseCode>::into)?;

        let (status, consumed, produced) = core
            .platform
            .decompressor()
            .decompress(input, &mut out, flags)
            .map_err(|_| ResponseCode::InflateError)?;
        input = &input[consumed..];

        if produced > 0 {
            let write_size = (produced as u32).min(core.flash.op.total_remaining);
            let target = core.flash.op.offset + write_size;
            ensure_erased_to(&mut core.flash, core.platform.flash(), target).map_err(Into::<ResponseCode>::into)?;
            core.platform
                .flash()
                .write_buff(core.flash.op.offset, &out[..write_size as usize], core.flash.encrypt)
                .map_err(|_| ResponseCode::FailedSpiOp)?;
            core.flash.op.advance(write_size);
        }

        match status {
            InflateStatus::Done | InflateStatus::NeedsMoreInput => break,
            InflateStatus::HasMoreOutput => continue,
        }
    }
    Ok(())
}

pub fn flash_defl_end<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    if let Err(code) = core.flash.op.end() {
        return HandlerOutcome::error(code);
    }
    let _ = ctx;
    HandlerOutcome::success(0).with_post(super::flash::flash_end_post)
}
