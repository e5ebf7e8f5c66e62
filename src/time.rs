//! # RTC slow clock time keeping
//!
//! The RTC timer counts slow clock ticks in a 48-bit counter that keeps
//! running through deep sleep. Its period is not fixed: the calibration
//! value stored by the bootloader gives the tick period in microseconds as
//! a fixed point number with [`RTC_CLK_CAL_FRACT`] fractional bits.

use crate::registers::RtcRegisters;

/// Number of fractional bits in the slow clock calibration value.
pub const RTC_CLK_CAL_FRACT: u32 = 19;

const TIME_UPDATE_DELAY_US: u32 =
    esp_config::esp_config_int!(u32, "ESP_WAKE_STUB_CONFIG_TIME_UPDATE_DELAY_US");

/// Converts slow clock ticks to microseconds.
///
/// The product is formed in two 32-bit halves so that `ticks * cal` never
/// needs more than 64 bits for any tick count the 48-bit counter produces.
/// Larger inputs wrap instead of panicking.
pub const fn ticks_to_us(ticks: u64, cal: u32) -> u64 {
    let cal = cal as u64;
    let lo = (ticks & 0xffff_ffff).wrapping_mul(cal) >> RTC_CLK_CAL_FRACT;
    let hi = (ticks >> 32).wrapping_mul(cal) << (32 - RTC_CLK_CAL_FRACT);
    lo.wrapping_add(hi)
}

/// Converts microseconds to slow clock ticks.
///
/// Durations at or above `2^45` microseconds lose their top bits in the
/// shift. An uncalibrated clock (`cal == 0`) yields zero ticks.
pub const fn us_to_ticks(us: u64, cal: u32) -> u64 {
    if cal == 0 {
        return 0;
    }
    (us << RTC_CLK_CAL_FRACT) / cal as u64
}

/// Latches and reads the current value of the RTC timer.
pub fn read_counter<R: RtcRegisters + ?Sized>(regs: &mut R) -> u64 {
    regs.request_time_update();
    while !regs.time_valid() {
        if TIME_UPDATE_DELAY_US > 0 {
            regs.delay_us(TIME_UPDATE_DELAY_US);
        }
    }
    regs.clear_time_valid();

    let lo = regs.time_lo() as u64;
    let hi = regs.time_hi() as u64;
    (hi << 32) | lo
}

/// Counter snapshots used to measure how long the chip slept.
///
/// Lives in RTC memory next to the [`WakeStubConfig`](crate::WakeStubConfig)
/// so that the previous snapshot survives the sleep it is measuring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct SleepClock {
    start: u64,
    stop: u64,
}

impl SleepClock {
    /// Creates a clock with both snapshots at zero.
    pub const fn new() -> Self {
        Self { start: 0, stop: 0 }
    }

    /// Shifts the last snapshot into the start slot, records `now` and
    /// returns the ticks elapsed between the two.
    pub fn advance(&mut self, now: u64) -> u64 {
        self.start = self.stop;
        self.stop = now;
        self.stop.wrapping_sub(self.start)
    }
}
