//! # ESP32 RTC registers
//!
//! [`RtcRegisters`] on the ESP32 peripheral access crate.

use crate::{
    power::{PowerDownFlags, RetainedSegments, Segment},
    registers::{RtcRegisters, SleepInterrupt},
    rom,
    wakeup::{Ext0Wakeup, Ext1Wakeup, Ext1WakeupMode, WakeTriggers, WakeupLevel},
};

// These symbols are from the linker script
unsafe extern "C" {
    static _rtc_slow_data_start: u32;
    static _rtc_slow_data_end: u32;
    static _rtc_slow_bss_start: u32;
    static _rtc_slow_bss_end: u32;
}

#[inline(always)]
fn rtc_cntl() -> &'static ::esp32::rtc_cntl::RegisterBlock {
    unsafe { &*::esp32::RTC_CNTL::ptr() }
}

#[inline(always)]
fn rtc_io() -> &'static ::esp32::rtc_io::RegisterBlock {
    unsafe { &*::esp32::RTC_IO::ptr() }
}

#[inline(always)]
fn uart(uart: u8) -> &'static ::esp32::uart0::RegisterBlock {
    unsafe {
        match uart {
            0 => &*::esp32::UART0::ptr(),
            1 => &*::esp32::UART1::ptr(),
            _ => &*::esp32::UART2::ptr(),
        }
    }
}

/// The ESP32 RTC controller, RTC IO and UART status registers.
pub struct Esp32Rtc {
    _private: (),
}

impl Esp32Rtc {
    /// Creates the register handle.
    ///
    /// # Safety
    ///
    /// Only one handle may exist at a time, and nothing else may use the
    /// RTC controller while it does. Inside a wake stub this holds as long
    /// as the stub does not hand the peripheral to other code.
    pub unsafe fn steal() -> Self {
        Self { _private: () }
    }
}

impl RtcRegisters for Esp32Rtc {
    #[inline(always)]
    fn wakeup_enable(&self) -> WakeTriggers {
        WakeTriggers::from_bits_truncate(rtc_cntl().wakeup_state().read().wakeup_ena().bits())
    }

    #[inline(always)]
    fn set_wakeup_enable(&mut self, triggers: WakeTriggers) {
        rtc_cntl()
            .wakeup_state()
            .modify(|_, w| unsafe { w.wakeup_ena().bits(triggers.bits()) });
    }

    #[inline(always)]
    fn wakeup_cause(&self) -> WakeTriggers {
        WakeTriggers::from_bits_truncate(rtc_cntl().wakeup_state().read().wakeup_cause().bits())
    }

    #[inline(always)]
    fn set_sleep_reject(&mut self, reject: u32) {
        rtc_cntl()
            .slp_reject_conf()
            .write(|w| unsafe { w.bits(reject) });
    }

    #[inline(always)]
    fn set_sleep_enable(&mut self, enable: bool) {
        rtc_cntl().state0().modify(|_, w| w.sleep_en().bit(enable));
    }

    #[inline(always)]
    fn sleep_interrupt_raw(&self) -> SleepInterrupt {
        let raw = rtc_cntl().int_raw().read();
        let mut status = SleepInterrupt::empty();
        status.set(SleepInterrupt::WAKEUP, raw.slp_wakeup().bit_is_set());
        status.set(SleepInterrupt::REJECT, raw.slp_reject().bit_is_set());
        status
    }

    #[inline(always)]
    fn clear_sleep_interrupts(&mut self) {
        rtc_cntl().int_clr().write(|w| {
            w.slp_reject()
                .clear_bit_by_one()
                .slp_wakeup()
                .clear_bit_by_one()
        });
    }

    #[inline(always)]
    fn ext0_wakeup(&self) -> Ext0Wakeup {
        let channel = rtc_io().ext_wakeup0().read().sel().bits();
        let high = rtc_cntl().ext_wakeup_conf().read().ext_wakeup0_lv().bit_is_set();
        Ext0Wakeup {
            channel,
            level: if high {
                WakeupLevel::High
            } else {
                WakeupLevel::Low
            },
        }
    }

    #[inline(always)]
    fn set_ext0_wakeup(&mut self, wakeup: Ext0Wakeup) {
        rtc_io()
            .ext_wakeup0()
            .modify(|_, w| unsafe { w.sel().bits(wakeup.channel) });
        rtc_cntl()
            .ext_wakeup_conf()
            .modify(|_, w| w.ext_wakeup0_lv().bit(wakeup.level == WakeupLevel::High));
    }

    #[inline(always)]
    fn ext1_wakeup(&self) -> Ext1Wakeup {
        let mask = rtc_cntl().ext_wakeup1().read().sel().bits();
        let any_high = rtc_cntl().ext_wakeup_conf().read().ext_wakeup1_lv().bit_is_set();
        Ext1Wakeup {
            mask,
            mode: if any_high {
                Ext1WakeupMode::AnyHigh
            } else {
                Ext1WakeupMode::AllLow
            },
        }
    }

    #[inline(always)]
    fn set_ext1_wakeup(&mut self, wakeup: Ext1Wakeup) {
        rtc_cntl()
            .ext_wakeup1()
            .modify(|_, w| unsafe { w.sel().bits(wakeup.mask) });
        rtc_cntl().ext_wakeup_conf().modify(|_, w| {
            w.ext_wakeup1_lv()
                .bit(wakeup.mode == Ext1WakeupMode::AnyHigh)
        });
    }

    #[inline(always)]
    fn ext1_status(&self) -> u32 {
        rtc_cntl()
            .ext_wakeup1_status()
            .read()
            .ext_wakeup1_status()
            .bits()
    }

    #[inline(always)]
    fn clear_ext1_status(&mut self) {
        rtc_cntl()
            .ext_wakeup1()
            .modify(|_, w| w.status_clr().set_bit());
    }

    #[inline(always)]
    fn force_ulp_wakeup(&mut self) {
        rtc_cntl()
            .state0()
            .modify(|_, w| w.ulp_cp_wakeup_force_en().set_bit());
    }

    #[inline(always)]
    fn set_power_down(&mut self, flags: PowerDownFlags) {
        let fastmem_pd = flags.contains(PowerDownFlags::RTC_FAST_MEM);
        let slowmem_pd = flags.contains(PowerDownFlags::RTC_SLOW_MEM);
        let dig_pd = flags.contains(PowerDownFlags::DIG);

        // `fastmem_pd_en` is left alone, the wake stub executes from there.
        rtc_cntl().pwc().modify(|_, w| {
            w.fastmem_force_pu()
                .bit(!fastmem_pd)
                .fastmem_force_lpu()
                .bit(!fastmem_pd)
                .fastmem_force_noiso()
                .bit(!fastmem_pd)
                .slowmem_pd_en()
                .bit(slowmem_pd)
                .slowmem_force_pu()
                .bit(!slowmem_pd)
                .slowmem_force_noiso()
                .bit(!slowmem_pd)
                .slowmem_force_lpu()
                .bit(!slowmem_pd)
                .pd_en()
                .bit(flags.contains(PowerDownFlags::RTC_PERIPH))
        });

        if dig_pd {
            rtc_cntl().dig_iso().modify(|_, w| {
                w.dg_wrap_force_noiso()
                    .clear_bit()
                    .dg_pad_force_iso()
                    .clear_bit()
                    .dg_pad_force_noiso()
                    .clear_bit()
            });
        }

        rtc_cntl().dig_pwc().modify(|_, w| {
            w.dg_wrap_pd_en()
                .bit(dig_pd)
                .dg_wrap_force_pu()
                .bit(!dig_pd)
                .dg_wrap_force_pd()
                .clear_bit()
        });
    }

    #[inline(always)]
    fn entry_address(&self) -> u32 {
        rtc_cntl().store6().read().bits()
    }

    #[inline(always)]
    fn set_entry_address(&mut self, address: u32) {
        rtc_cntl().store6().write(|w| unsafe { w.bits(address) });
    }

    #[inline(always)]
    fn update_memory_crc(&mut self) {
        rom::set_rtc_memory_crc();
    }

    #[inline(always)]
    fn memory_crc(&self) -> u32 {
        rtc_cntl().store7().read().bits()
    }

    #[inline(always)]
    fn interrupt_enable(&self) -> u32 {
        rtc_cntl().int_ena().read().bits()
    }

    #[inline(always)]
    fn slow_clk_cal(&self) -> u32 {
        rtc_cntl().store1().read().bits()
    }

    #[inline(always)]
    fn request_time_update(&mut self) {
        rtc_cntl()
            .time_update()
            .write(|w| w.time_update().set_bit());
    }

    #[inline(always)]
    fn time_valid(&self) -> bool {
        rtc_cntl().time_update().read().time_valid().bit_is_set()
    }

    #[inline(always)]
    fn clear_time_valid(&mut self) {
        rtc_cntl()
            .int_clr()
            .write(|w| w.time_valid().clear_bit_by_one());
    }

    #[inline(always)]
    fn time_lo(&self) -> u32 {
        rtc_cntl().time0().read().time_lo().bits()
    }

    #[inline(always)]
    fn time_hi(&self) -> u32 {
        rtc_cntl().time1().read().time_hi().bits() as u32
    }

    #[inline(always)]
    fn set_sleep_timer(&mut self, lo: u32, hi: u32) {
        unsafe {
            rtc_cntl()
                .slp_timer0()
                .write(|w| w.slp_val_lo().bits(lo));

            rtc_cntl().slp_timer1().write(|w| {
                w.slp_val_hi()
                    .bits((hi & 0xffff) as u16)
                    .main_timer_alarm_en()
                    .set_bit()
            });
        }
    }

    #[inline(always)]
    fn uart_tx_busy(&self, uart_num: u8) -> bool {
        uart(uart_num).status().read().st_utx_out().bits() != 0
    }

    #[inline(always)]
    fn delay_us(&self, us: u32) {
        rom::ets_delay_us(us);
    }

    #[inline(always)]
    fn retained_segments(&self) -> RetainedSegments {
        unsafe {
            RetainedSegments {
                data: Segment {
                    start: &raw const _rtc_slow_data_start as usize,
                    end: &raw const _rtc_slow_data_end as usize,
                },
                bss: Segment {
                    start: &raw const _rtc_slow_bss_start as usize,
                    end: &raw const _rtc_slow_bss_end as usize,
                },
            }
        }
    }
}
