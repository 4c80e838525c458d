//! JTAG side-channel serial transport binding.
//!
//! The host driver on the other end of this link has a quirk: it only
//! notices new data once a packet boundary arrives, so this sink must flush
//! whenever it writes a SLIP `END` byte or whenever 63 bytes have
//! accumulated since the last flush, whichever comes first.

use super::RawTx;
use crate::frame::END;

const FLUSH_THRESHOLD: usize = 63;

pub struct JtagSerialSink<T> {
    raw: T,
    since_flush: usize,
}

impl<T: RawTx> JtagSerialSink<T> {
    pub fn new(raw: T) -> Self {
        Self { raw, since_flush: 0 }
    }
}

impl<T: RawTx> embedded_io::ErrorType for JtagSerialSink<T> {
    type Error = core::convert::Infallible;
}

impl<T: RawTx> embedded_io::Write for JtagSerialSink<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &b in buf {
            self.raw.tx_byte(b);
            self.since_flush += 1;
            if b == END || self.since_flush >= FLUSH_THRESHOLD {
                self.raw.hw_flush();
                self.since_flush = 0;
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.raw.hw_flush();
        self.since_flush = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::Write;

    #[derive(Default)]
    struct RecordingRaw {
        bytes: std::vec::Vec<u8>,
        flush_count: usize,
        bytes_at_flush: std::vec::Vec<usize>,
    }

    impl RawTx for RecordingRaw {
        fn tx_byte(&mut self, byte: u8) {
            self.bytes.push(byte);
        }
        fn hw_flush(&mut self) {
            self.flush_count += 1;
            self.bytes_at_flush.push(self.bytes.len());
        }
    }

    #[test]
    fn flushes_on_end_byte() {
        let mut sink = JtagSerialSink::new(RecordingRaw::default());
        sink.write(&[1, 2, 3, END, 4, 5]).unwrap();
        assert_eq!(sink.raw.flush_count, 1);
        assert_eq!(sink.raw.bytes_at_flush, [4]);
    }

    #[test]
    fn flushes_every_63_bytes_absent_end() {
        let mut sink = JtagSerialSink::new(RecordingRaw::default());
        let data = [0x41u8; 200];
        sink.write(&data).unwrap();
        // floor(200 / 63) = 3 threshold flushes; no END byte seen.
        assert_eq!(sink.raw.flush_count, 3);
        assert_eq!(sink.raw.bytes_at_flush, [63, 126, 189]);
    }
}
