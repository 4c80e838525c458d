//! The opcode table and per-opcode payload-length validation.
//!
//! Opcode values follow the later of the two revisions the source carries
//! (`MemBegin/MemEnd/MemData = 0x05/0x06/0x07`,
//! `EraseFlash/EraseRegion/ReadFlash/RunUserCode = 0xD0/0xD1/0xD2/0xD3`),
//! matching the table `esp-rs/espflash`'s `CommandType` ships today. See
//! DESIGN.md for the rest of the revision-pinning rationale.

use strum::FromRepr;

/// Bulk-data opcodes carry a 16-byte sub-header (`data_len, seq, 0, 0`)
/// ahead of the bulk payload.
pub const DATA_SUBHEADER_LEN: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRepr)]
#[repr(u8)]
pub enum CommandType {
    FlashBegin = 0x02,
    FlashData = 0x03,
    FlashEnd = 0x04,
    MemBegin = 0x05,
    MemEnd = 0x06,
    MemData = 0x07,
    Sync = 0x08,
    WriteReg = 0x09,
    ReadReg = 0x0A,
    SpiSetParams = 0x0B,
    SpiAttach = 0x0D,
    ChangeBaudrate = 0x0F,
    FlashDeflBegin = 0x10,
    FlashDeflData = 0x11,
    FlashDeflEnd = 0x12,
    SpiFlashMd5 = 0x13,
    GetSecurityInfo = 0x14,
    EraseFlash = 0xD0,
    EraseRegion = 0xD1,
    ReadFlash = 0xD2,
    RunUserCode = 0xD3,
}

impl CommandType {
    pub fn from_opcode(opcode: u8) -> Option<Self> {
        Self::from_repr(opcode)
    }

    /// `true` for the one opcode that never gets a response frame.
    pub fn is_silent(self) -> bool {
        matches!(self, CommandType::RunUserCode)
    }

    /// The shape of an acceptable `payload_len` for this opcode.
    pub fn expected_len(self) -> ExpectedLen {
        use CommandType::*;
        use ExpectedLen::*;
        match self {
            FlashBegin | FlashDeflBegin => OneOf16Or20,
            FlashData | FlashDeflData | MemData => AtLeast(DATA_SUBHEADER_LEN),
            FlashEnd | FlashDeflEnd => Exact(4),
            MemBegin => Exact(16),
            MemEnd => Exact(8),
            Sync => Exact(36),
            WriteReg => MultipleOf(16),
            ReadReg => Exact(4),
            SpiSetParams => Exact(24),
            SpiAttach => Exact(4),
            ChangeBaudrate => Exact(8),
            SpiFlashMd5 => Exact(16),
            GetSecurityInfo => Exact(0),
            EraseFlash => Exact(0),
            EraseRegion => Exact(8),
            ReadFlash => Exact(16),
            RunUserCode => Unconstrained,
        }
    }
}

/// The payload-length constraint for a given opcode, as tabulated in the
/// wire contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedLen {
    Exact(usize),
    AtLeast(usize),
    MultipleOf(usize),
    OneOf16Or20,
    Unconstrained,
}

impl ExpectedLen {
    pub fn accepts(self, len: usize) -> bool {
        match self {
            ExpectedLen::Exact(n) => len == n,
            ExpectedLen::AtLeast(n) => len >= n,
            ExpectedLen::MultipleOf(n) => n > 0 && len % n == 0 && len >= n,
            ExpectedLen::OneOf16Or20 => len == 16 || len == 20,
            ExpectedLen::Unconstrained => true,
        }
    }
}
