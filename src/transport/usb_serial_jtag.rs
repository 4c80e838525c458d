//! CDC-style USB virtual serial transport binding.

use super::RawTx;

/// Like [`super::uart::UartSink`], but USB CDC endpoints need an explicit
/// flush to push a short packet out rather than waiting for it to fill —
/// the same policy as plain UART works here since the hardware primitive
/// already models that as `hw_flush`.
pub struct UsbSerialJtagSink<T> {
    raw: T,
}

impl<T: RawTx> UsbSerialJtagSink<T> {
    pub fn new(raw: T) -> Self {
        Self { raw }
    }
}

impl<T: RawTx> embedded_io::ErrorType for UsbSerialJtagSink<T> {
    type Error = core::convert::Infallible;
}

impl<T: RawTx> embedded_io::Write for UsbSerialJtagSink<T> {
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
