//! Per-target constant tables consumed by transport initialization.
//!
//! Real SoC bring-up (clocks, watchdog, interrupt controller wiring) is out
//! of scope for this crate; these descriptors are deliberately thin — just
//! enough register-address and capability data for `transport::init` to
//! pick between targets. Addresses are taken from the corresponding
//! `soc/targets/*.c` tables in the original firmware.

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        /// Chip exposes a USB-OTG peripheral usable as a transport.
        const USB_OTG = 0b001;
        /// Chip exposes a USB-Serial-JTAG peripheral usable as a transport.
        const USB_SERIAL_JTAG = 0b010;
        /// Chip's watchdog can be driven directly for a reset-to-user-code
        /// path.
        const WATCHDOG_RESET = 0b100;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descriptor {
    pub name: &'static str,
    pub uart_fifo_addr: u32,
    pub usb_otg_base: Option<u32>,
    pub caps: Capabilities,
}

pub const ESP32: Descriptor = Descriptor {
    name: "esp32",
    uart_fifo_addr: 0x3FF4_0000,
    usb_otg_base: None,
    caps: Capabilities::empty(),
};

pub const ESP32S2: Descriptor = Descriptor {
    name: "esp32s2",
    uart_fifo_addr: 0x3F40_0000,
    usb_otg_base: Some(0x6003_9000),
    caps: Capabilities::USB_OTG.union(Capabilities::WATCHDOG_RESET),
};

pub const ESP32C6: Descriptor = Descriptor {
    name: "esp32c6",
    uart_fifo_addr: 0x6000_0000,
    usb_otg_base: None,
    caps: Capabilities::USB_SERIAL_JTAG,
};

pub const ESP32P4: Descriptor = Descriptor {
    name: "esp32p4",
    uart_fifo_addr: 0x5400_0000,
    usb_otg_base: Some(0x5006_0000),
    caps: Capabilities::USB_OTG.union(Capabilities::WATCHDOG_RESET),
};
