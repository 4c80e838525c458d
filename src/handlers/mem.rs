//! `MEM_BEGIN` / `MEM_DATA` / `MEM_END` (0x05/0x07/0x06): direct RAM copy
//! and the entry-point jump.

use super::le_u32;
use crate::command::DATA_SUBHEADER_LEN;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;

pub fn mem_begin<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let total_size = le_u32(ctx.payload, 0);
    let num_blocks = le_u32(ctx.payload, 4);
    let block_size = le_u32(ctx.payload, 8);
    let offset = le_u32(ctx.payload, 12);
    core.mem.begin(total_size, num_blocks, block_size, offset);
    HandlerOutcome::success(0)
}

pub fn mem_data<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let data_len = le_u32(ctx.payload, 0) as usize;
    let bulk_len = ctx.payload.len() - DATA_SUBHEADER_LEN;
    if data_len != bulk_len {
        return HandlerOutcome::error(ResponseCode::BadDataLen);
    }
    if let Err(code) = core.mem.check_data(data_len as u32) {
        return HandlerOutcome::error(code);
    }
    HandlerOutcome::success(0).with_post(mem_data_post)
}

fn mem_data_post<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> Result<(), ResponseCode> {
    let data_len = le_u32(ctx.payload, 0);
    let bulk = &ctx.payload[DATA_SUBHEADER_LEN..DATA_SUBHEADER_LEN + data_len as usize];

    // SAFETY: the host controls `offset` unconditionally on this wire (no
    // authentication, per the crate's non-goals); this is the one seam
    // where that trust is exercised.
    unsafe {
        crate::mem::write_to(core.mem.offset, bulk);
    }
    core.mem.advance(data_len);
    Ok(())
}

pub fn mem_end<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    if let Err(code) = core.mem.end() {
        return HandlerOutcome::error(code);
    }
    let _ = ctx;
    HandlerOutcome::success(0).with_post(mem_end_post)
}

fn mem_end_post<P: Platform, const N: usize>(_core: &mut Core<P, N>, ctx: &Context) -> Result<(), ResponseCode> {
    let flag = le_u32(ctx.payload, 0);
    let entrypoint = le_u32(ctx.payload, 4);
    if flag == 0 {
        // SAFETY: `entrypoint` is whatever the host supplied; the jump
        // contract (invariant 7) is that this never returns.
        unsafe {
            crate::mem::jump_to(entrypoint);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Core;
    use crate::test_support::FakePlatform;

    // `mem_data_post`/`mem_end_post` poke a host-supplied 32-bit address
    // directly; on a 64-bit test host there is no address that round-trips
    // through `u32`, so these tests exercise only the validation and
    // bookkeeping layered above that unsafe seam, never the seam itself.

    #[test]
    fn mem_begin_then_data_registers_a_post_process_without_advancing_yet() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());

        let mut begin_payload = Vec::new();
        begin_payload.extend_from_slice(&4u32.to_le_bytes());
        begin_payload.extend_from_slice(&1u32.to_le_bytes());
        begin_payload.extend_from_slice(&4u32.to_le_bytes());
        begin_payload.extend_from_slice(&0x4000_1000u32.to_le_bytes());
        let begin_ctx = Context {
            opcode: 0x05,
            payload_len: begin_payload.len() as u16,
            checksum_or_value: 0,
            payload: &begin_payload,
        };
        assert_eq!(mem_begin(&mut core, &begin_ctx).code, ResponseCode::Success);
        assert_eq!(core.mem.total_remaining, 4);

        let mut data_payload = vec![0u8; DATA_SUBHEADER_LEN];
        data_payload[0..4].copy_from_slice(&4u32.to_le_bytes());
        data_payload.extend_from_slice(&[1, 2, 3, 4]);
        let data_ctx = Context {
            opcode: 0x07,
            payload_len: data_payload.len() as u16,
            checksum_or_value: 0,
            payload: &data_payload,
        };
        let outcome = mem_data(&mut core, &data_ctx);
        assert_eq!(outcome.code, ResponseCode::Success);
        assert!(outcome.post.is_some());
        // Advancing is the post-process's job; validation alone doesn't
        // touch the operation state.
        assert_eq!(core.mem.total_remaining, 4);
    }

    #[test]
    fn mem_data_with_mismatched_length_is_rejected() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        core.mem.begin(4, 1, 4, 0x4000_1000);

        let mut data_payload = vec![0u8; DATA_SUBHEADER_LEN];
        data_payload[0..4].copy_from_slice(&99u32.to_le_bytes());
        data_payload.extend_from_slice(&[1, 2, 3, 4]);
        let ctx = Context {
            opcode: 0x07,
            payload_len: data_payload.len() as u16,
            checksum_or_value: 0,
            payload: &data_payload,
        };
        let outcome = mem_data(&mut core, &ctx);
        assert_eq!(outcome.code, ResponseCode::BadDataLen);
        assert!(outcome.post.is_none());
    }

    #[test]
    fn mem_end_with_a_nonzero_flag_registers_a_no_jump_post_process() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        core.mem.begin(4, 1, 4, 0x4000_1000);
        core.mem.advance(4);

        let mut end_payload = Vec::new();
        end_payload.extend_from_slice(&1u32.to_le_bytes()); // flag != 0: no jump
        end_payload.extend_from_slice(&0u32.to_le_bytes());
        let end_ctx = Context {
            opcode: 0x06,
            payload_len: end_payload.len() as u16,
            checksum_or_value: 0,
            payload: &end_payload,
        };
        let outcome = mem_end(&mut core, &end_ctx);
        assert_eq!(outcome.code, ResponseCode::Success);
        assert!(outcome.post.unwrap()(&mut core, &end_ctx).is_ok());
        assert!(!core.mem.in_progress);
    }

    #[test]
    fn mem_end_before_begin_is_not_in_flash_mode() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        let end_payload = [1u8, 0, 0, 0, 0, 0, 0, 0];
        let ctx = Context {
            opcode: 0x06,
            payload_len: end_payload.len() as u16,
            checksum_or_value: 0,
            payload: &end_payload,
        };
        assert_eq!(mem_end(&mut core, &ctx).code, ResponseCode::NotInFlashMode);
    }
}
