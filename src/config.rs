//! # Retained wake stub configuration
//!
//! A [`WakeStubConfig`] mirrors the wakeup related RTC registers. It lives in
//! RTC slow memory so that it survives deep sleep, and it is refreshed from
//! the hardware once per wake cycle by
//! [`WakeStubConfig::sync_from_hardware`].
//!
//! Place it in an initialized RTC section so that the first cold boot loads
//! a valid, stale record:
//!
//! ```rust, ignore
//! #[unsafe(link_section = ".rtc_slow.data")]
//! static mut CONFIG: WakeStubConfig = WakeStubConfig::new();
//! ```

use strum::EnumCount;

use crate::{
    AlreadySynced,
    power::{PdDomain, PdOption},
    registers::RtcRegisters,
    wakeup::{Ext0Wakeup, Ext1Wakeup, WakeTriggers},
};

/// Value of `init_flag` once the record reflects the current wake cycle.
pub const WAKE_STUB_CONF_ACTIVE_MARKER: u32 = 0x5555_5555;

/// Wakeup configuration retained across deep sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct WakeStubConfig {
    pd_options: [PdOption; PdDomain::COUNT],
    wake_stub_address: u32,
    rtc_interrupt_flags: u32,
    rtc_crc: u32,
    sleep_duration_us: u64,
    init_flag: u32,
    wakeup_triggers: WakeTriggers,
    ext0: Ext0Wakeup,
    ext1: Ext1Wakeup,
}

impl Default for WakeStubConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WakeStubConfig {
    /// A stale record with every power domain in [`PdOption::Auto`].
    pub const fn new() -> Self {
        Self {
            pd_options: [PdOption::Auto; PdDomain::COUNT],
            wake_stub_address: 0,
            rtc_interrupt_flags: 0,
            rtc_crc: 0,
            sleep_duration_us: 0,
            init_flag: 0,
            wakeup_triggers: WakeTriggers::empty(),
            ext0: Ext0Wakeup {
                channel: 0,
                level: crate::wakeup::WakeupLevel::High,
            },
            ext1: Ext1Wakeup {
                mask: 0,
                mode: crate::wakeup::Ext1WakeupMode::AllLow,
            },
        }
    }

    /// Loads the record from the hardware unless that already happened in
    /// this wake cycle.
    pub fn sync_from_hardware<R: RtcRegisters + ?Sized>(
        &mut self,
        regs: &R,
    ) -> Result<(), AlreadySynced> {
        if self.is_synced() {
            return Err(AlreadySynced);
        }

        self.wakeup_triggers = regs.wakeup_enable();
        self.ext0 = regs.ext0_wakeup();
        self.ext1 = regs.ext1_wakeup();
        self.wake_stub_address = regs.entry_address();
        self.rtc_interrupt_flags = regs.interrupt_enable();
        self.rtc_crc = regs.memory_crc();
        self.init_flag = WAKE_STUB_CONF_ACTIVE_MARKER;

        debug!("wakeup triggers {:#x}", self.wakeup_triggers.bits());
        debug!("ext0 channel {} level {}", self.ext0.channel, self.ext0.level as u8);
        debug!("ext1 mask {:#x} mode {}", self.ext1.mask, self.ext1.mode as u8);
        debug!("wake stub address {:#x}", self.wake_stub_address);
        debug!("interrupt flags {:#x} crc {:#x}", self.rtc_interrupt_flags, self.rtc_crc);

        Ok(())
    }

    /// `true` if the record reflects the current wake cycle.
    pub fn is_synced(&self) -> bool {
        self.init_flag == WAKE_STUB_CONF_ACTIVE_MARKER
    }

    /// Marks the record stale so the next wake cycle reloads it.
    pub(crate) fn invalidate(&mut self) {
        self.init_flag = 0;
    }

    /// Armed wakeup triggers.
    pub fn wakeup_triggers(&self) -> WakeTriggers {
        self.wakeup_triggers
    }

    pub(crate) fn arm(&mut self, triggers: WakeTriggers) {
        self.wakeup_triggers |= triggers;
    }

    pub(crate) fn disarm(&mut self, triggers: WakeTriggers) {
        self.wakeup_triggers &= !triggers;
    }

    /// Requested timer wakeup interval, 0 if unused.
    pub fn sleep_duration_us(&self) -> u64 {
        self.sleep_duration_us
    }

    pub(crate) fn set_sleep_duration_us(&mut self, duration_us: u64) {
        self.sleep_duration_us = duration_us;
    }

    /// EXT0 pin and level.
    pub fn ext0(&self) -> Ext0Wakeup {
        self.ext0
    }

    pub(crate) fn set_ext0(&mut self, wakeup: Ext0Wakeup) {
        self.ext0 = wakeup;
    }

    /// EXT1 pin mask and mode.
    pub fn ext1(&self) -> Ext1Wakeup {
        self.ext1
    }

    pub(crate) fn set_ext1(&mut self, wakeup: Ext1Wakeup) {
        self.ext1 = wakeup;
    }

    /// Requested (or, after a sleep attempt, resolved) option of `domain`.
    pub fn pd_option(&self, domain: PdDomain) -> PdOption {
        self.pd_options[domain as usize]
    }

    pub(crate) fn set_pd_option(&mut self, domain: PdDomain, option: PdOption) {
        self.pd_options[domain as usize] = option;
    }

    /// Wake stub entry address captured at sync or set through
    /// [`WakeStub::set_wake_stub_entry`](crate::WakeStub::set_wake_stub_entry).
    pub fn wake_stub_address(&self) -> u32 {
        self.wake_stub_address
    }

    pub(crate) fn set_wake_stub_address(&mut self, address: u32, crc: u32) {
        self.wake_stub_address = address;
        self.rtc_crc = crc;
    }

    /// RTC interrupt enable flags captured at sync.
    pub fn rtc_interrupt_flags(&self) -> u32 {
        self.rtc_interrupt_flags
    }

    /// RTC memory CRC captured at sync.
    pub fn rtc_crc(&self) -> u32 {
        self.rtc_crc
    }

    #[cfg(test)]
    pub(crate) fn mark_synced(&mut self, triggers: WakeTriggers) {
        self.wakeup_triggers = triggers;
        self.init_flag = WAKE_STUB_CONF_ACTIVE_MARKER;
    }
}
