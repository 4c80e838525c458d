//! Per-opcode handlers and the dispatch table that ties them to
//! [`CommandType`].
//!
//! Every handler has the shape `fn(&mut Core<P, N>, &Context) ->
//! HandlerOutcome<P, N>`; [`dispatch`] is the tagged-variant match that
//! stands in for the handler table named in the dispatcher's design notes.

mod baud;
mod erase;
mod flash;
mod flash_defl;
mod md5_cmd;
mod mem;
mod read_flash;
mod run_user_code;
mod security;
mod spi;
mod sync;

pub(crate) mod reg;

use crate::command::CommandType;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};

pub fn dispatch<P: Platform, const N: usize>(
    cmd: CommandType,
    core: &mut Core<P, N>,
    ctx: &Context,
) -> HandlerOutcome<P, N> {
    match cmd {
        CommandType::Sync => sync::sync(core, ctx),
        CommandType::ReadReg => reg::read_reg(core, ctx),
        CommandType::WriteReg => reg::write_reg(core, ctx),
        CommandType::FlashBegin => flash::flash_begin(core, ctx),
        CommandType::FlashData => flash::flash_data(core, ctx),
        CommandType::FlashEnd => flash::flash_end(core, ctx),
        CommandType::FlashDeflBegin => flash_defl::flash_defl_begin(core, ctx),
        CommandType::FlashDeflData => flash_defl::flash_defl_data(core, ctx),
        CommandType::FlashDeflEnd => flash_defl::flash_defl_end(core, ctx),
        CommandType::MemBegin => mem::mem_begin(core, ctx),
        CommandType::MemData => mem::mem_data(core, ctx),
        CommandType::MemEnd => mem::mem_end(core, ctx),
        CommandType::SpiAttach => spi::spi_attach(core, ctx),
        CommandType::SpiSetParams => spi::spi_set_params(core, ctx),
        CommandType::ChangeBaudrate => baud::change_baudrate(core, ctx),
        CommandType::SpiFlashMd5 => md5_cmd::spi_flash_md5(core, ctx),
        CommandType::GetSecurityInfo => security::get_security_info(core, ctx),
        CommandType::ReadFlash => read_flash::read_flash(core, ctx),
        CommandType::EraseFlash => erase::erase_flash(core, ctx),
        CommandType::EraseRegion => erase::erase_region(core, ctx),
        CommandType::RunUserCode => run_user_code::run_user_code(core, ctx),
    }
}

/// Reads a little-endian `u32` out of `payload` at `offset`. Callers only
/// invoke this after the opcode's expected-length gate has already
/// validated `payload.len()`.
pub(crate) fn le_u32(payload: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(payload[offset..offset + 4].try_into().unwrap())
}
