//! The foreground poll loop: drains complete frames out of the [`Decoder`]
//! and feeds them to [`Core::handle_frame`] until `RUN_USER_CODE` jumps away.
//!
//! Byte reception itself happens off this loop, in interrupt context via
//! [`crate::transport::pump_rx`]; this loop only ever looks at whatever the
//! ring already assembled.

use crate::dispatcher::{Core, Platform};
use crate::slip::FrameState;

/// Sends the startup greeting, then polls for frames until the core reports
/// `RUN_USER_CODE` was handled. Never returns in that case — control has
/// already passed to the user's firmware by the time `handle_frame` returns
/// `false` this call simply stops polling.
pub fn run<P: Platform, const N: usize>(core: &mut Core<P, N>) {
    core.send_greeting();
    loop {
        match core.decoder.frame_state() {
            FrameState::Complete => {
                // Copied out of the ring slot before calling into `core`
                // again: `handle_frame` needs `&mut Core`, which the
                // borrow checker won't grant while a slice still borrows
                // from `core.decoder`.
                let mut buf = [0u8; crate::frame::MAX_FRAME_SIZE];
                let len = {
                    let data = core.decoder.frame_data();
                    buf[..data.len()].copy_from_slice(data);
                    data.len()
                };
                let keep_going = core.handle_frame(&buf[..len]);
                core.decoder.recv_reset();
                if !keep_going {
                    return;
                }
            }
            FrameState::Error => core.decoder.recv_reset(),
            FrameState::Idle => {}
        }
    }
}
