//! # RTC register access
//!
//! Everything the wake stub does to the chip goes through [`RtcRegisters`].
//! Methods operate on register fields rather than whole words; packing and
//! unpacking the bit layout is the job of the implementation.

use crate::{
    power::{PowerDownFlags, RetainedSegments},
    wakeup::{Ext0Wakeup, Ext1Wakeup, WakeTriggers},
};

bitflags::bitflags! {
    /// Raw sleep handshake interrupt status.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SleepInterrupt: u32 {
        /// The chip woke up from sleep.
        const WAKEUP = 1 << 0;
        /// The sleep request was refused.
        const REJECT = 1 << 1;
    }
}

/// Field-level access to the RTC controller and the few peripherals the
/// wake stub touches.
///
/// Implementations used from a running wake stub must only reach code and
/// data that reside in RTC memory, so all methods are expected to inline.
pub trait RtcRegisters {
    /// Trigger enable mask used for the next sleep.
    fn wakeup_enable(&self) -> WakeTriggers;

    /// Sets the trigger enable mask.
    fn set_wakeup_enable(&mut self, triggers: WakeTriggers);

    /// Triggers that caused the last wakeup.
    fn wakeup_cause(&self) -> WakeTriggers;

    /// Sets the reject sources that may abort a sleep request.
    fn set_sleep_reject(&mut self, reject: u32);

    /// Writes the sleep enable bit. Sleep is requested on the 0 to 1 edge.
    fn set_sleep_enable(&mut self, enable: bool);

    /// Raw status of the sleep handshake interrupts.
    fn sleep_interrupt_raw(&self) -> SleepInterrupt;

    /// Clears the sleep reject and wakeup interrupts.
    fn clear_sleep_interrupts(&mut self);

    /// Pin channel and level of the EXT0 trigger.
    fn ext0_wakeup(&self) -> Ext0Wakeup;

    /// Selects the EXT0 pin channel and level.
    fn set_ext0_wakeup(&mut self, wakeup: Ext0Wakeup);

    /// Pin mask and mode of the EXT1 trigger.
    fn ext1_wakeup(&self) -> Ext1Wakeup;

    /// Selects the EXT1 pin mask and mode.
    fn set_ext1_wakeup(&mut self, wakeup: Ext1Wakeup);

    /// RTC IO channels that were active when EXT1 woke the chip.
    fn ext1_status(&self) -> u32;

    /// Clears the latched EXT1 pin status.
    fn clear_ext1_status(&mut self);

    /// Forces the ULP coprocessor wakeup path on.
    fn force_ulp_wakeup(&mut self);

    /// Applies power-down flags for the next sleep.
    fn set_power_down(&mut self, flags: PowerDownFlags);

    /// Wake stub entry address stored in RTC scratch memory.
    fn entry_address(&self) -> u32;

    /// Stores the address the ROM jumps to on the next wakeup.
    fn set_entry_address(&mut self, address: u32);

    /// Recomputes the CRC over RTC fast memory that the ROM checks before
    /// jumping to the wake stub.
    fn update_memory_crc(&mut self);

    /// CRC stored by [`Self::update_memory_crc`].
    fn memory_crc(&self) -> u32;

    /// RTC interrupt enable flags.
    fn interrupt_enable(&self) -> u32;

    /// Slow clock period calibration, see [`crate::time::RTC_CLK_CAL_FRACT`].
    fn slow_clk_cal(&self) -> u32;

    /// Asks the RTC timer to latch its current value.
    fn request_time_update(&mut self);

    /// Whether the latched value is ready.
    fn time_valid(&self) -> bool;

    /// Clears the "time valid" interrupt.
    fn clear_time_valid(&mut self);

    /// Low 32 bits of the latched timer value.
    fn time_lo(&self) -> u32;

    /// High bits of the latched timer value.
    fn time_hi(&self) -> u32;

    /// Programs the sleep timer alarm and arms it.
    fn set_sleep_timer(&mut self, lo: u32, hi: u32);

    /// Whether the transmitter of `uart` is still shifting out data.
    fn uart_tx_busy(&self, uart: u8) -> bool;

    /// Busy-waits for `us` microseconds.
    fn delay_us(&self, us: u32);

    /// RTC slow memory data and bss segments as laid out by the linker.
    fn retained_segments(&self) -> RetainedSegments;
}
