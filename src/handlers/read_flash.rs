//! `READ_FLASH` (0xD2): streams a flash region back as a sequence of data
//! frames, each gated on a host ACK, followed by a trailing MD5 frame.
//!
//! The in-flight window is hardcoded to 1 (pinned revision, see
//! DESIGN.md): every data frame is followed by a wait for exactly one ACK
//! before the next is sent. This is the one handler whose post-process
//! drives the receive side directly — it needs the same [`Core`] the
//! foreground loop does, since waiting for an ACK means polling the
//! decoder for a *new* frame while the request's own frame is still the
//! processing slot.

use super::le_u32;
use crate::config::READ_FLASH_MAX_PACKET as MAX_PACKET;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::flash_driver::FlashDriver;
use crate::md5_hash::Md5Accumulator;
use crate::slip::FrameState;

pub fn read_flash<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let _ = core;
    let _ = ctx;
    HandlerOutcome::success(0).with_post(read_flash_post)
}

fn read_flash_post<P: Platform, const N: usize>(
    core: &mut Core<P, N>,
    ctx: &Context,
) -> Result<(), ResponseCode> {
    let offset = le_u32(ctx.payload, 0);
    let read_size = le_u32(ctx.payload, 4);
    let packet_size = (le_u32(ctx.payload, 8) as usize).clamp(1, MAX_PACKET);
    log::debug!("READ_FLASH offset={offset:#x} read_size={read_size} packet_size={packet_size}");
    // byte 12.. is the host's requested max-unacked window; ignored, the
    // window is hardcoded to 1 per the pinned revision.

    // The request's own frame is no longer needed; release its slot before
    // waiting on ACK frames, which otherwise would never look "new" to
    // `find_processable`.
    core.decoder.recv_reset();

    let mut acc = Md5Accumulator::new();
    let mut buf = [0u8; MAX_PACKET];
    let mut sent = 0u32;

    while sent < read_size {
        let n = (read_size - sent).min(packet_size as u32) as usize;
        core.platform
            .flash()
            .read_buff(offset + sent, &mut buf[..n])
            .map_err(|_| ResponseCode::FailedSpiOp)?;
        acc.update(&buf[..n]);
        crate::slip::send_frame(core.platform.tx(), &buf[..n]).map_err(|_| ResponseCode::FailedSpiOp)?;
        sent += n as u32;

        loop {
            match core.decoder.frame_state() {
                FrameState::Complete => {
                    let ack_len = core.decoder.frame_data().len();
                    core.decoder.recv_reset();
                    if ack_len != 4 {
                        return Err(ResponseCode::BadDataLen);
                    }
                    break;
                }
                FrameState::Error => core.decoder.recv_reset(),
                FrameState::Idle => {}
            }
        }
    }

    let digest = acc.finish();
    crate::slip::send_frame(core.platform.tx(), &digest).map_err(|_| ResponseCode::FailedSpiOp)?;
    Ok(())
}
