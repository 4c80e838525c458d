//! Byte transport bindings: the seam between the framing codec and
//! whichever physical link (UART, USB CDC, JTAG side-channel) is carrying
//! the wire protocol.
//!
//! A transport provides two things: a non-blocking byte producer the RX
//! interrupt drains into the codec (`pump_rx`), and a [`embedded_io::Write`]
//! sink the dispatcher hands to [`crate::slip::send_frame`]. The hardware
//! FIFO primitives themselves (`uart_tx_one_char`, `usb_*`) are opaque
//! external collaborators; [`RawTx`]/[`RawRx`] are the narrow traits a board
//! support layer implements over them.

pub mod jtag_serial;
pub mod uart;
pub mod usb_serial_jtag;

use embedded_io::{ErrorType, Write};

use crate::slip::Decoder;
use crate::soc::{Capabilities, Descriptor};

/// The hardware's non-blocking single-byte transmit primitive.
pub trait RawTx {
    fn tx_byte(&mut self, byte: u8);
    /// Pushes any buffered bytes out to the wire. A no-op for transports
    /// with no host-side buffering quirks.
    fn hw_flush(&mut self) {}
}

/// The hardware's non-blocking single-byte receive primitive, polled from
/// interrupt context.
pub trait RawRx {
    /// Returns the next available byte, or `None` if the RX FIFO is empty.
    fn rx_byte(&mut self) -> Option<u8>;
}

/// Drains every byte currently available from `source` into `decoder`.
/// Called from the RX interrupt handler; non-blocking, returns as soon as
/// the hardware FIFO reports empty.
pub fn pump_rx<const N: usize>(decoder: &Decoder<N>, source: &mut impl RawRx) {
    while let Some(byte) = source.rx_byte() {
        decoder.recv_byte(byte);
    }
}

/// The TX sink [`init`] wires up, one of the three concrete bindings,
/// chosen from the target's [`Descriptor`]. `T` is the single physical
/// link implementation the board passes in (whichever peripheral it
/// actually wires up); the variant says which sink *policy* applies to
/// it (flush-per-frame, or the JTAG driver's flush-on-`END`-or-63-bytes
/// quirk).
pub enum TransportSink<T> {
    Uart(uart::UartSink<T>),
    UsbSerialJtag(usb_serial_jtag::UsbSerialJtagSink<T>),
    JtagSerial(jtag_serial::JtagSerialSink<T>),
}

impl<T: RawTx> ErrorType for TransportSink<T> {
    type Error = core::convert::Infallible;
}

impl<T: RawTx> Write for TransportSink<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        match self {
            TransportSink::Uart(s) => s.write(buf),
            TransportSink::UsbSerialJtag(s) => s.write(buf),
            TransportSink::JtagSerial(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        match self {
            TransportSink::Uart(s) => s.flush(),
            TransportSink::UsbSerialJtag(s) => s.flush(),
            TransportSink::JtagSerial(s) => s.flush(),
        }
    }
}

/// Binds the byte transport at startup: picks which TX sink policy the
/// target needs from its [`Descriptor`]'s capability bits, wraps `raw_tx`
/// in it, and drains whatever the RX side already had buffered into
/// `decoder` before the caller sends the `OHAI` greeting.
///
/// Either USB capability bit selects the CDC-style sink (both `USB_OTG`
/// and `USB_SERIAL_JTAG` are, per spec.md §6, "two flavors of USB" with
/// identical flush behavior from the sink's point of view — the
/// difference is entirely in what hardware backs `raw_tx`); anything
/// else falls back to plain UART. The JTAG side-channel sink is not
/// chosen here: its flush-on-`END`-or-63-bytes quirk is a host debug
/// probe behavior, not a chip capability, so a board that uses it
/// constructs [`jtag_serial::JtagSerialSink`] directly instead of going
/// through `init`.
pub fn init<T: RawTx, R: RawRx, const N: usize>(
    descriptor: &Descriptor,
    raw_tx: T,
    mut raw_rx: R,
    decoder: &Decoder<N>,
) -> TransportSink<T> {
    pump_rx(decoder, &mut raw_rx);
    let has_usb = descriptor.caps.contains(Capabilities::USB_OTG)
        || descriptor.caps.contains(Capabilities::USB_SERIAL_JTAG);
    if has_usb {
        TransportSink::UsbSerialJtag(usb_serial_jtag::UsbSerialJtagSink::new(raw_tx))
    } else {
        TransportSink::Uart(uart::UartSink::new(raw_tx))
    }
}
