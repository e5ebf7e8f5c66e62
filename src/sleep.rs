//! # Sleep commit
//!
//! The RTC controller enters sleep on a 0 to 1 edge of the sleep enable bit.
//! On a real deep sleep the CPU never executes past that write. Reaching the
//! end of [`rtc_sleep_start`] therefore always means the request did not
//! power the chip down.

use crate::{
    config::WakeStubConfig,
    power::{PowerDownFlags, compute_power_down_flags},
    registers::{RtcRegisters, SleepInterrupt},
    wakeup::{TriggerKind, WakeTriggers},
};

pub(crate) const CONSOLE_UART: u8 =
    esp_config::esp_config_int!(u8, "ESP_WAKE_STUB_CONFIG_CONSOLE_UART");

/// Requests sleep with the given trigger mask and reject sources.
///
/// Returns `true` if the hardware rejected the request. On a successful deep
/// sleep this function does not return.
pub fn rtc_sleep_start<R: RtcRegisters + ?Sized>(
    regs: &mut R,
    wakeup: WakeTriggers,
    reject: u32,
) -> bool {
    regs.set_wakeup_enable(wakeup);
    regs.set_sleep_reject(reject);

    regs.set_sleep_enable(false);
    regs.set_sleep_enable(true);

    while !regs
        .sleep_interrupt_raw()
        .intersects(SleepInterrupt::REJECT | SleepInterrupt::WAKEUP)
    {
        core::hint::spin_loop();
    }

    let rejected = regs.sleep_interrupt_raw().contains(SleepInterrupt::REJECT);
    regs.clear_sleep_interrupts();

    if rejected {
        warn!("sleep request rejected");
    }
    rejected
}

/// Busy-waits until the transmitter of `uart` is idle.
pub fn uart_tx_wait_idle<R: RtcRegisters + ?Sized>(regs: &R, uart: u8) {
    while regs.uart_tx_busy(uart) {
        core::hint::spin_loop();
    }
}

/// Prepares every armed trigger and commits to deep sleep.
///
/// RTC fast memory is never powered down, whatever its option resolved to.
/// Only the highest priority trigger that needs hardware setup is prepared;
/// all armed triggers stay enabled for the commit. Returns `true` if the
/// request was rejected.
pub(crate) fn deep_sleep_entry<R: RtcRegisters + ?Sized>(
    config: &mut WakeStubConfig,
    regs: &mut R,
) -> bool {
    let _ = config.sync_from_hardware(&*regs);

    let segments = regs.retained_segments();
    let mut pd_flags = compute_power_down_flags(config, &segments);
    // The next wake stub runs from RTC fast memory.
    if pd_flags.contains(PowerDownFlags::RTC_FAST_MEM) {
        warn!("keeping rtc fast memory powered for the wake stub");
        pd_flags.remove(PowerDownFlags::RTC_FAST_MEM);
    }

    uart_tx_wait_idle(regs, CONSOLE_UART);

    if let Some(kind) = TriggerKind::select(config) {
        kind.prepare(config, regs);
    }
    regs.set_power_down(PowerDownFlags::DIG | pd_flags);

    commit(config, regs)
}

/// Arms only the timer wakeup and commits to deep sleep.
///
/// Returns `true` if the request was rejected.
pub(crate) fn deep_sleep_timer<R: RtcRegisters + ?Sized>(
    config: &mut WakeStubConfig,
    regs: &mut R,
    duration_us: u64,
) -> bool {
    let _ = config.sync_from_hardware(&*regs);
    regs.set_sleep_enable(false);

    config.arm(WakeTriggers::TIMER);
    config.set_sleep_duration_us(duration_us);

    uart_tx_wait_idle(regs, CONSOLE_UART);
    TriggerKind::Timer.prepare(config, regs);

    commit(config, regs)
}

fn commit<R: RtcRegisters + ?Sized>(config: &mut WakeStubConfig, regs: &mut R) -> bool {
    let triggers = config.wakeup_triggers();
    config.invalidate();
    rtc_sleep_start(regs, triggers, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{Event, MockRtc},
        power::{PdDomain, PdOption, RetainedSegments, Segment},
        wakeup::{Ext0Wakeup, WakeupLevel},
    };

    #[test]
    fn sleep_enable_is_toggled() {
        let mut rtc = MockRtc::new();
        rtc.sleep_en = true;

        let rejected = rtc_sleep_start(&mut rtc, WakeTriggers::TIMER, 0);

        assert!(!rejected);
        assert_eq!(
            rtc.events,
            [
                Event::WakeupEnable(WakeTriggers::TIMER),
                Event::SleepReject(0),
                Event::SleepEnable(false),
                Event::SleepEnable(true),
                Event::ClearSleepInterrupts,
            ]
        );
        assert_eq!(rtc.sleep_requests(), 1);
        assert_eq!(rtc.int_raw, SleepInterrupt::empty());
    }

    #[test]
    fn rejection_is_reported() {
        let mut rtc = MockRtc::new();
        rtc.reject_sleep = true;

        assert!(rtc_sleep_start(&mut rtc, WakeTriggers::EXT0, 0x3));
        assert_eq!(rtc.reject_conf, 0x3);
        assert_eq!(rtc.int_raw, SleepInterrupt::empty());
    }

    #[test]
    fn uart_is_drained() {
        let rtc = MockRtc::new();
        rtc.uart_busy_polls.set(5);

        uart_tx_wait_idle(&rtc, 1);

        assert_eq!(rtc.uart_busy_polls.get(), 0);
        assert_eq!(rtc.uart_polled.get(), Some(1));
    }

    #[test]
    fn timer_entry_commits_timer_only() {
        let mut rtc = MockRtc::new();
        rtc.cal = 3_495_253;
        rtc.counter = 1_000;
        rtc.uart_busy_polls.set(2);
        let mut config = WakeStubConfig::new();
        config.set_sleep_duration_us(1_000_000);
        config.mark_synced(WakeTriggers::TIMER);

        let rejected = deep_sleep_entry(&mut config, &mut rtc);

        assert!(!rejected);
        let target = 1_000 + (1_000_000u64 << 19) / 3_495_253;
        assert_eq!(rtc.sleep_timer, Some((target as u32, 0)));
        assert_eq!(rtc.wakeup_ena, WakeTriggers::TIMER);
        assert_eq!(rtc.uart_busy_polls.get(), 0);
        assert_eq!(rtc.uart_polled.get(), Some(CONSOLE_UART));
        assert_eq!(rtc.sleep_requests(), 1);
    }

    #[test]
    fn entry_prepares_only_the_first_trigger() {
        let mut rtc = MockRtc::new();
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::EXT0 | WakeTriggers::EXT1 | WakeTriggers::TIMER);
        config.set_sleep_duration_us(500);
        config.set_ext0(Ext0Wakeup {
            channel: 14,
            level: WakeupLevel::High,
        });

        deep_sleep_entry(&mut config, &mut rtc);

        assert!(rtc.events.contains(&Event::Ext0(config.ext0())));
        assert!(!rtc.events.iter().any(|e| matches!(e, Event::Ext1(_) | Event::SleepTimer(..))));
        assert_eq!(rtc.ext1_status_clears, 0);
        assert_eq!(
            rtc.wakeup_ena,
            WakeTriggers::EXT0 | WakeTriggers::EXT1 | WakeTriggers::TIMER
        );
    }

    #[test]
    fn entry_applies_power_down_before_commit() {
        let mut rtc = MockRtc::new();
        rtc.segments = RetainedSegments {
            data: Segment::default(),
            bss: Segment {
                start: 0x5000_0000,
                end: 0x5000_0100,
            },
        };
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TOUCH);

        deep_sleep_entry(&mut config, &mut rtc);

        let power_down = rtc
            .events
            .iter()
            .position(|e| *e == Event::PowerDown(PowerDownFlags::DIG | PowerDownFlags::RTC_PERIPH));
        let sleep = rtc.events.iter().position(|e| *e == Event::SleepEnable(true));
        assert!(power_down.is_some());
        assert!(power_down < sleep);
    }

    #[test]
    fn entry_keeps_fast_memory_powered() {
        let mut rtc = MockRtc::new();
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TIMER);
        config.set_pd_option(PdDomain::RtcFastMem, PdOption::Off);

        deep_sleep_entry(&mut config, &mut rtc);

        assert_eq!(
            rtc.power_down,
            Some(PowerDownFlags::DIG | PowerDownFlags::RTC_PERIPH)
        );
        assert_eq!(config.pd_option(PdDomain::RtcFastMem), PdOption::Off);
    }

    #[test]
    fn commit_invalidates_record() {
        let mut rtc = MockRtc::new();
        rtc.reject_sleep = true;
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TOUCH);

        assert!(deep_sleep_entry(&mut config, &mut rtc));
        assert!(!config.is_synced());
    }

    #[test]
    fn unsynced_entry_reads_hardware_triggers() {
        let mut rtc = MockRtc::new();
        rtc.wakeup_ena = WakeTriggers::ULP;
        let mut config = WakeStubConfig::new();

        deep_sleep_entry(&mut config, &mut rtc);

        assert!(rtc.ulp_forced);
        assert_eq!(rtc.wakeup_ena, WakeTriggers::ULP);
    }

    #[test]
    fn timer_sleep_skips_other_preparers() {
        let mut rtc = MockRtc::new();
        rtc.wakeup_ena = WakeTriggers::EXT0;
        rtc.counter = 10;
        let mut config = WakeStubConfig::new();

        deep_sleep_timer(&mut config, &mut rtc, 1_000_000);

        assert_eq!(rtc.sleep_timer, Some((10 + 32_768, 0)));
        assert!(!rtc.events.iter().any(|e| matches!(e, Event::Ext0(_))));
        assert_eq!(rtc.wakeup_ena, WakeTriggers::EXT0 | WakeTriggers::TIMER);
        assert_eq!(rtc.events[0], Event::SleepEnable(false));
        assert_eq!(rtc.sleep_requests(), 1);
    }
}
