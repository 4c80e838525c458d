//! Asynchronous serial (UART) transport binding.

use super::RawTx;

/// Writes bytes straight through to the UART FIFO and flushes after every
/// frame; no buffering quirks to paper over.
pub struct UartSink<T> {
    raw: T,
}

impl<T: RawTx> UartSink<T> {
    pub fn new(raw: T) -> Self {
        Self { raw }
    }
}

impl<T: RawTx> embedded_io::ErrorType for UartSink<T> {
    type Error = core::convert::Infallible;
}

impl<T: RawTx> embedded_io::Write for UartSink<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            self.raw.tx_byte(b);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.raw.hw_flush();
        Ok(())
    }
}
