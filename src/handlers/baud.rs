//! `CHANGE_BAUDRATE` (0x0F): acknowledge at the current rate, then
//! reprogram the divisor once the response is safely on the wire.

use super::le_u32;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;

pub fn change_baudrate<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    let _ = core;
    let _ = ctx;
    HandlerOutcome::success(0).with_post(change_baudrate_post)
}

fn change_baudrate_post<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> Result<(), ResponseCode> {
    let new_baud = le_u32(ctx.payload, 0);
    core.platform.set_baudrate(new_baud);
    Ok(())
}
