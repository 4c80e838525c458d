//! `READ_REG` (0x0A) / `WRITE_REG` (0x09): direct memory-mapped register
//! access, no framing beyond the fixed payload shapes.

use super::le_u32;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};

/// One `WRITE_REG` record: `(addr, value, mask, delay_us)`.
const RECORD_LEN: usize = 16;

pub fn read_reg<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let addr = le_u32(ctx.payload, 0);
    let value = core.platform.read_reg(addr);
    HandlerOutcome::success(value)
}

pub fn write_reg<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    for record in ctx.payload.chunks_exact(RECORD_LEN) {
        let addr = le_u32(record, 0);
        let value = le_u32(record, 4);
        let mask = le_u32(record, 8);
        let delay_us = le_u32(record, 12);

        if delay_us > 0 {
            core.platform.delay_us(delay_us);
        }
        core.platform.write_reg(addr, value, mask);
    }
    HandlerOutcome::success(0)
}
