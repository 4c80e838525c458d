//! The `BEGIN ... DATA* ... END` state shared by the flash-write and
//! memory-copy pipelines.

use crate::error::ResponseCode;

/// Accumulated context for one in-flight `BEGIN..DATA..END` operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationState {
    pub total_remaining: u32,
    pub block_size: u32,
    pub num_blocks: u32,
    pub offset: u32,
    pub in_progress: bool,
}

impl OperationState {
    pub const fn idle() -> Self {
        Self {
            total_remaining: 0,
            block_size: 0,
            num_blocks: 0,
            offset: 0,
            in_progress: false,
        }
    }

    pub fn begin(&mut self, total_size: u32, num_blocks: u32, block_size: u32, offset: u32) {
        *self = Self {
            total_remaining: total_size,
            block_size,
            num_blocks,
            offset,
            in_progress: true,
        };
    }

    /// Accounts for `n` bytes written at the current offset, advancing both.
    /// Clips to `total_remaining`, per the end-of-stream accounting rule.
    pub fn advance(&mut self, n: u32) -> u32 {
        let n = n.min(self.total_remaining);
        self.total_remaining -= n;
        self.offset += n;
        n
    }

    /// Validates and clears the operation on `_END`. The stricter revision
    /// is pinned: a non-zero `total_remaining` is always rejected.
    pub fn end(&mut self) -> Result<(), ResponseCode> {
        if !self.in_progress {
            return Err(ResponseCode::NotInFlashMode);
        }
        if self.total_remaining != 0 {
            return Err(ResponseCode::BadDataLen);
        }
        *self = Self::idle();
        Ok(())
    }

    /// Guards a `_DATA` call: must be in progress, and not ask for more
    /// than what's left. Used by `MEM_DATA`, where the original rejects an
    /// over-long block outright.
    pub fn check_data(&self, requested: u32) -> Result<(), ResponseCode> {
        self.check_in_progress()?;
        if requested > self.total_remaining {
            return Err(ResponseCode::TooMuchData);
        }
        Ok(())
    }

    /// Guards a `_DATA` call for the flash pipeline: in-progress only. The
    /// final block of a flash image legitimately pads `data_len` up to
    /// `block_size`, so `data_len > total_remaining` is not an error here —
    /// the post-process clips `write_size` to `total_remaining` instead.
    pub fn check_in_progress(&self) -> Result<(), ResponseCode> {
        if !self.in_progress {
            return Err(ResponseCode::NotInFlashMode);
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::idle();
    }
}

impl Default for OperationState {
    fn default() -> Self {
        Self::idle()
    }
}
