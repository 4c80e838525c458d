//! `GET_SECURITY_INFO` (0x14): an opaque blob the platform hands back
//! verbatim.

use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};

pub fn get_security_info<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    let _ = ctx;
    HandlerOutcome::success(0).with_data(core.platform.security_info())
}
