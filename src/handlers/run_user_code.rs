//! `RUN_USER_CODE` (0xD3): the sole silent opcode. The foreground loop
//! reads `HandlerOutcome::silent` and exits without ever building a
//! response frame.

use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};

pub fn run_user_code<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    let _ = core;
    let _ = ctx;
    HandlerOutcome::silent()
}
