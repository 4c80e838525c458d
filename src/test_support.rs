//! Test doubles shared by the handler unit tests. Host-only (`std`), never
//! compiled into the `no_std` target build.

#![cfg(test)]

use std::collections::HashMap;
use std::vec::Vec;

use crate::dispatcher::Platform;
use crate::flash_driver::{FlashDriver, FlashDriverError, SpiParams};
use crate::inflate_miniz::MinizDecompressor;

pub struct FakeTx {
    pub written: Vec<u8>,
}

impl FakeTx {
    pub fn new() -> Self {
        Self { written: Vec::new() }
    }
}

impl embedded_io::ErrorType for FakeTx {
    type Error = core::convert::Infallible;
}

impl embedded_io::Write for FakeTx {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

pub struct FakeFlash {
    pub sector_size: u32,
    pub storage: HashMap<u32, u8>,
    pub erase_calls: Vec<(u32, u32)>,
    pub write_calls: Vec<(u32, Vec<u8>, bool)>,
    pub fail_writes: bool,
}

impl FakeFlash {
    pub fn new() -> Self {
        Self {
            sector_size: 4096,
            storage: HashMap::new(),
            erase_calls: Vec::new(),
            write_calls: Vec::new(),
            fail_writes: false,
        }
    }
}

impl FlashDriver for FakeFlash {
    fn sector_size(&self) -> u32 {
        self.sector_size
    }

    fn attach(&mut self, _config: u32) -> Result<(), FlashDriverError> {
        Ok(())
    }

    fn update_config(&mut self, _params: SpiParams) -> Result<(), FlashDriverError> {
        Ok(())
    }

    fn start_next_erase(
        &mut self,
        next_addr: &mut u32,
        remaining: &mut u32,
    ) -> Result<(), FlashDriverError> {
        self.erase_calls.push((*next_addr, *remaining));
        *next_addr += self.sector_size;
        *remaining = remaining.saturating_sub(self.sector_size);
        Ok(())
    }

    fn erase_chip(&mut self) -> Result<(), FlashDriverError> {
        self.storage.clear();
        Ok(())
    }

    fn erase_area(&mut self, addr: u32, size: u32) -> Result<(), FlashDriverError> {
        for a in addr..addr + size {
            self.storage.remove(&a);
        }
        Ok(())
    }

    fn wait_ready(&mut self, _timeout_us: u32) -> Result<(), FlashDriverError> {
        Ok(())
    }

    fn write_buff(&mut self, addr: u32, data: &[u8], encrypt: bool) -> Result<(), FlashDriverError> {
        if self.fail_writes {
            return Err(FlashDriverError::Hardware);
        }
        for (i, &b) in data.iter().enumerate() {
            self.storage.insert(addr + i as u32, b);
        }
        self.write_calls.push((addr, data.to_vec(), encrypt));
        Ok(())
    }

    fn read_buff(&mut self, addr: u32, out: &mut [u8]) -> Result<(), FlashDriverError> {
        for (i, slot) in out.iter_mut().enumerate() {
            *slot = *self.storage.get(&(addr + i as u32)).unwrap_or(&0);
        }
        Ok(())
    }
}

pub struct FakePlatform {
    pub flash: FakeFlash,
    pub decompressor: MinizDecompressor,
    pub tx: FakeTx,
    pub regs: HashMap<u32, u32>,
    pub reg_read_calls: usize,
    pub delays: Vec<u32>,
    pub baud: Option<u32>,
    pub rebooted: bool,
    pub security_info: Vec<u8>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            flash: FakeFlash::new(),
            decompressor: MinizDecompressor::new(),
            tx: FakeTx::new(),
            regs: HashMap::new(),
            reg_read_calls: 0,
            delays: Vec::new(),
            baud: None,
            rebooted: false,
            security_info: Vec::new(),
        }
    }
}

impl Platform for FakePlatform {
    type Flash = FakeFlash;
    type Decompressor = MinizDecompressor;
    type Tx = FakeTx;

    fn flash(&mut self) -> &mut Self::Flash {
        &mut self.flash
    }

    fn decompressor(&mut self) -> &mut Self::Decompressor {
        &mut self.decompressor
    }

    fn tx(&mut self) -> &mut Self::Tx {
        &mut self.tx
    }

    fn read_reg(&mut self, addr: u32) -> u32 {
        self.reg_read_calls += 1;
        *self.regs.get(&addr).unwrap_or(&0)
    }

    fn write_reg(&mut self, addr: u32, value: u32, mask: u32) {
        let merged = if mask == 0xFFFF_FFFF {
            value
        } else {
            let old = self.read_reg(addr);
            (value & mask) | (old & !mask)
        };
        self.regs.insert(addr, merged);
    }

    fn delay_us(&mut self, us: u32) {
        self.delays.push(us);
    }

    fn set_baudrate(&mut self, baud: u32) {
        self.baud = Some(baud);
    }

    fn reboot(&mut self) {
        self.rebooted = true;
    }

    fn security_info(&self) -> &[u8] {
        &self.security_info
    }
}
