//! `SPI_FLASH_MD5` (0x13): hash a flash region without ever materializing
//! it all at once.

use super::le_u32;
use crate::config::MD5_READ_CHUNK;
use crate::dispatcher::{Context, Core, HandlerOutcome, Platform};
use crate::error::ResponseCode;
use crate::flash_driver::FlashDriver;
use crate::md5_hash::Md5Accumulator;

pub fn spi_flash_md5<P: Platform, const N: usize>(core: &mut Core<P, N>, ctx: &Context) -> HandlerOutcome<P, N> {
    let addr = le_u32(ctx.payload, 0);
    let read_size = le_u32(ctx.payload, 4);
    log::trace!("SPI_FLASH_MD5 addr={addr:#x} read_size={read_size}");

    let aligned_addr = addr & !3;
    let leading_skip = (addr - aligned_addr) as usize;

    let mut acc = Md5Accumulator::new();
    let mut buf = [0u8; MD5_READ_CHUNK];
    let mut to_read = read_size as usize + leading_skip;
    let mut cursor = aligned_addr;
    let mut skip = leading_skip;

    while to_read > 0 {
        let n = to_read.min(MD5_READ_CHUNK);
        if core.platform.flash().read_buff(cursor, &mut buf[..n]).is_err() {
            log::warn!("SPI_FLASH_MD5 read failed at addr={cursor:#x}");
            return HandlerOutcome::error(ResponseCode::FailedSpiOp);
        }
        acc.update(&buf[skip..n]);
        cursor += n as u32;
        to_read -= n;
        skip = 0;
    }

    HandlerOutcome::success(0).with_data(&acc.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Core;
    use crate::flash_driver::FlashDriver;
    use crate::test_support::FakePlatform;
    use md5::{Digest, Md5};

    #[test]
    fn md5_over_an_aligned_region_matches_a_direct_hash() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        let pattern: Vec<u8> = (0..4096u32).map(|i| (i % 255) as u8).collect();
        core.platform.flash().write_buff(0x10000, &pattern, false).unwrap();

        let mut payload = Vec::new();
        payload.extend_from_slice(&0x10000u32.to_le_bytes());
        payload.extend_from_slice(&4096u32.to_le_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        let ctx = Context {
            opcode: 0x13,
            payload_len: payload.len() as u16,
            checksum_or_value: 0,
            payload: &payload,
        };

        let outcome = spi_flash_md5(&mut core, &ctx);
        assert_eq!(outcome.code, ResponseCode::Success);

        let mut expected = Md5::new();
        expected.update(&pattern);
        let expected: [u8; 16] = expected.finalize().into();
        assert_eq!(&outcome.inline_data[..], &expected[..]);
    }

    #[test]
    fn md5_masks_leading_bytes_on_an_unaligned_start() {
        let mut core: Core<FakePlatform, 2> = Core::new(FakePlatform::new());
        // Lay down 3 garbage bytes before the region of interest so an
        // aligned read at addr & !3 pulls them in too.
        let mut stored = vec![0xFFu8, 0xFF, 0xFF];
        let wanted: Vec<u8> = (0..64u32).map(|i| i as u8).collect();
        stored.extend_from_slice(&wanted);
        core.platform.flash().write_buff(0x10000, &stored, false).unwrap();

        let addr = 0x10000 + 3;
        let mut payload = Vec::new();
        payload.extend_from_slice(&addr.to_le_bytes());
        payload.extend_from_slice(&(wanted.len() as u32).to_le_bytes());
        payload.extend_from_slice(&[0u8; 8]);
        let ctx = Context {
            opcode: 0x13,
            payload_len: payload.len() as u16,
            checksum_or_value: 0,
            payload: &payload,
        };

        let outcome = spi_flash_md5(&mut core, &ctx);
        let mut expected = Md5::new();
        expected.update(&wanted);
        let expected: [u8; 16] = expected.finalize().into();
        assert_eq!(&outcome.inline_data[..], &expected[..]);
    }
}
