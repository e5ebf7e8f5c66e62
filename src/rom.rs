//! # ROM routines
//!
//! The wake stub runs before the flash cache is up, so anything it calls
//! must live in RTC memory or in the mask ROM.

/// Busy-loop CPU for the given amount of microseconds.
#[inline(always)]
pub(crate) fn ets_delay_us(us: u32) {
    esp_rom_sys::rom::ets_delay_us(us);
}

/// Recomputes the CRC over RTC fast memory and stores it where the ROM
/// checks it before jumping to the wake stub.
#[inline(always)]
pub(crate) fn set_rtc_memory_crc() {
    unsafe extern "C" {
        fn set_rtc_memory_crc();
    }

    unsafe { set_rtc_memory_crc() };
}

#[cfg(feature = "rom-print")]
const UART_TX_ONE_CHAR: usize = 0x4000_9200;

/// Writes through the ROM `uart_tx_one_char` routine on the console UART.
#[cfg(feature = "rom-print")]
pub(crate) struct RomPrinter;

#[cfg(feature = "rom-print")]
impl core::fmt::Write for RomPrinter {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for &b in s.as_bytes() {
            unsafe {
                let uart_tx_one_char: unsafe extern "C" fn(u8) -> i32 =
                    core::mem::transmute(UART_TX_ONE_CHAR);
                uart_tx_one_char(b)
            };
        }
        Ok(())
    }
}
