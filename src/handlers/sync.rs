//! `SYNC` (0x08): the handshake the host uses to detect a resident stub.

use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::response::ResponseBuilder;

/// Exactly 8 responses must reach the host (pinned revision, see
/// DESIGN.md). All 8 are composed and sent directly here rather than
/// leaning on the dispatcher's own epilogue for the final one, so the
/// handler's contract is self-contained.
const SYNC_RESPONSES: usize = 8;

pub fn sync<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    for _ in 0..SYNC_RESPONSES {
        let builder = ResponseBuilder::new(ctx.opcode, 0);
        let (buf, len) = builder.finish(ResponseCode::Success);
        let _ = crate::slip::send_frame(core.platform.tx(), &buf[..len]);
    }
    HandlerOutcome::already_sent()
}
