//! RAM-resident flasher stub core.
//!
//! This crate implements the serial wire protocol a flasher stub speaks to
//! a host-side programming tool once it has been loaded into RAM and
//! started: SLIP framing, the 8-byte command header, the erase-ahead flash
//! write pipeline, streaming inflate for compressed images, register
//! access, and the small set of bookkeeping opcodes (`SYNC`, `SPI_ATTACH`,
//! `CHANGE_BAUDRATE`, `GET_SECURITY_INFO`) a host tool needs to drive a
//! session end to end.
//!
//! Everything outside [`Platform`](dispatcher::Platform) is `no_std` and
//! allocation-free: buffers are fixed-size (`heapless`/const generics), and
//! the receive path is a lock-free single-producer/single-consumer ring
//! shared with the transport's RX interrupt. A concrete target binds the
//! crate by implementing [`Platform`](dispatcher::Platform) and driving
//! [`foreground::run`] from its main loop, with [`transport::pump_rx`]
//! wired into the byte-RX interrupt.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

pub mod checksum;
pub mod command;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod flash_driver;
pub mod flash_state;
pub mod foreground;
pub mod frame;
pub mod handlers;
pub mod inflate;
#[cfg(feature = "miniz")]
pub mod inflate_miniz;
pub mod md5_hash;
pub mod mem;
pub mod operation;
pub mod response;
pub mod ring;
pub mod slip;
pub mod soc;
pub mod transport;

#[cfg(test)]
mod test_support;
