//! `SPI_ATTACH` (0x0D) / `SPI_SET_PARAMS` (0x0B): binding and reconfiguring
//! the external flash. First-class per the pinned revision (see
//! DESIGN.md) rather than stubbed `CMD_NOT_IMPLEMENTED`.

use super::le_u32;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::flash_driver::SpiParams;

pub fn spi_attach<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let config = le_u32(ctx.payload, 0);
    match core.platform.flash().attach(config) {
        Ok(()) => HandlerOutcome::success(0),
        Err(_) => HandlerOutcome::error(ResponseCode::FailedSpiOp),
    }
}

pub fn spi_set_params<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    let params = SpiParams {
        flash_id: le_u32(ctx.payload, 0),
        flash_size: le_u32(ctx.payload, 4),
        block_size: le_u32(ctx.payload, 8),
        sector_size: le_u32(ctx.payload, 12),
        page_size: le_u32(ctx.payload, 16),
        status_mask: le_u32(ctx.payload, 20),
    };
    match core.platform.flash().update_config(params) {
        Ok(()) => HandlerOutcome::success(0),
        Err(_) => HandlerOutcome::error(ResponseCode::FailedSpiOp),
    }
}
