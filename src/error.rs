//! Wire-visible response codes and the small set of internal errors that
//! never reach the host directly.

use thiserror::Error;

/// The 16-bit response code carried in the last two bytes of a response
/// payload, big-endian on the wire. The high byte is the category; `0x00xx`
/// is reserved for success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ResponseCode {
    Success = 0x0000,
    BadDataLen = 0xC000,
    BadDataChecksum = 0xC100,
    BadBlocksize = 0xC200,
    InvalidCommand = 0xC300,
    FailedSpiOp = 0xC400,
    FailedSpiUnlock = 0xC500,
    NotInFlashMode = 0xC600,
    InflateError = 0xC700,
    NotEnoughData = 0xC800,
    TooMuchData = 0xC900,
    CmdNotImplemented = 0xFF00,
}

impl ResponseCode {
    /// The two big-endian bytes that go at the end of a response payload.
    pub fn to_be_bytes(self) -> [u8; 2] {
        (self as u16).to_be_bytes()
    }

    pub fn is_success(self) -> bool {
        matches!(self, ResponseCode::Success)
    }
}

/// Errors internal to the core that are never themselves wire response
/// codes, but get mapped to one at the handler boundary (e.g. a hardware
/// primitive failing maps to [`ResponseCode::FailedSpiOp`]).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CoreError {
    #[error("flash primitive reported a hardware failure")]
    FlashHardware,
    #[error("flash primitive is still busy erasing")]
    FlashBusy,
    #[error("spi flash could not be unlocked")]
    SpiUnlock,
    #[error("decompressor reported a stream error")]
    Inflate,
    #[error("requested region is not sector-aligned")]
    Unaligned,
    #[error("operation exceeded its erase-region timeout budget")]
    EraseTimeout,
}

impl From<CoreError> for ResponseCode {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::FlashHardware
            | CoreError::FlashBusy
            | CoreError::Unaligned
            | CoreError::EraseTimeout => ResponseCode::FailedSpiOp,
            CoreError::SpiUnlock => ResponseCode::FailedSpiUnlock,
            CoreError::Inflate => ResponseCode::InflateError,
        }
    }
}
