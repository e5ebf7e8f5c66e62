//! Register-level model of the RTC controller for host tests.

use core::cell::Cell;
use std::vec::Vec;

use crate::{
    power::{PowerDownFlags, RetainedSegments},
    registers::{RtcRegisters, SleepInterrupt},
    wakeup::{Ext0Wakeup, Ext1Wakeup, WakeTriggers},
};

/// Register writes that matter for ordering checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Event {
    WakeupEnable(WakeTriggers),
    SleepReject(u32),
    SleepEnable(bool),
    ClearSleepInterrupts,
    PowerDown(PowerDownFlags),
    SleepTimer(u32, u32),
    Ext0(Ext0Wakeup),
    Ext1(Ext1Wakeup),
    UlpForce,
}

pub(crate) struct MockRtc {
    pub wakeup_ena: WakeTriggers,
    pub wakeup_cause: WakeTriggers,
    pub ext0: Ext0Wakeup,
    pub ext1: Ext1Wakeup,
    pub ext1_status: u32,
    pub ext1_status_clears: usize,
    pub ulp_forced: bool,
    pub power_down: Option<PowerDownFlags>,
    pub entry_address: u32,
    pub crc: u32,
    pub crc_updates: usize,
    pub int_ena: u32,
    pub reject_conf: u32,

    pub sleep_en: bool,
    /// Outcome of the next sleep request: reject or wake up.
    pub reject_sleep: bool,
    pub int_raw: SleepInterrupt,

    pub cal: u32,
    /// Free running counter, latched on update requests.
    pub counter: u64,
    pub polls_until_valid: u32,
    pending_polls: Cell<u32>,
    update_pending: Cell<bool>,
    latched: Cell<u64>,
    pub time_updates: usize,
    pub time_valid_clears: usize,
    pub sleep_timer: Option<(u32, u32)>,

    pub uart_busy_polls: Cell<u32>,
    pub uart_polled: Cell<Option<u8>>,
    pub delays: Cell<u32>,

    pub segments: RetainedSegments,
    pub events: Vec<Event>,
}

impl MockRtc {
    pub fn new() -> Self {
        Self {
            wakeup_ena: WakeTriggers::empty(),
            wakeup_cause: WakeTriggers::empty(),
            ext0: Ext0Wakeup::default(),
            ext1: Ext1Wakeup::default(),
            ext1_status: 0,
            ext1_status_clears: 0,
            ulp_forced: false,
            power_down: None,
            entry_address: 0,
            crc: 0,
            crc_updates: 0,
            int_ena: 0,
            reject_conf: 0,
            sleep_en: false,
            reject_sleep: false,
            int_raw: SleepInterrupt::empty(),
            cal: 16_000_000,
            counter: 0,
            polls_until_valid: 1,
            pending_polls: Cell::new(0),
            update_pending: Cell::new(false),
            latched: Cell::new(0),
            time_updates: 0,
            time_valid_clears: 0,
            sleep_timer: None,
            uart_busy_polls: Cell::new(0),
            uart_polled: Cell::new(None),
            delays: Cell::new(0),
            segments: RetainedSegments::default(),
            events: Vec::new(),
        }
    }

    /// Number of 0 to 1 edges of the sleep enable bit.
    pub fn sleep_requests(&self) -> usize {
        let mut level = false;
        let mut edges = 0;
        for event in &self.events {
            if let Event::SleepEnable(enable) = *event {
                if enable && !level {
                    edges += 1;
                }
                level = enable;
            }
        }
        edges
    }
}

impl RtcRegisters for MockRtc {
    fn wakeup_enable(&self) -> WakeTriggers {
        self.wakeup_ena
    }

    fn set_wakeup_enable(&mut self, triggers: WakeTriggers) {
        self.wakeup_ena = triggers;
        self.events.push(Event::WakeupEnable(triggers));
    }

    fn wakeup_cause(&self) -> WakeTriggers {
        self.wakeup_cause
    }

    fn set_sleep_reject(&mut self, reject: u32) {
        self.reject_conf = reject;
        self.events.push(Event::SleepReject(reject));
    }

    fn set_sleep_enable(&mut self, enable: bool) {
        if enable && !self.sleep_en {
            self.int_raw |= if self.reject_sleep {
                SleepInterrupt::REJECT
            } else {
                SleepInterrupt::WAKEUP
            };
        }
        self.sleep_en = enable;
        self.events.push(Event::SleepEnable(enable));
    }

    fn sleep_interrupt_raw(&self) -> SleepInterrupt {
        self.int_raw
    }

    fn clear_sleep_interrupts(&mut self) {
        self.int_raw = SleepInterrupt::empty();
        self.events.push(Event::ClearSleepInterrupts);
    }

    fn ext0_wakeup(&self) -> Ext0Wakeup {
        self.ext0
    }

    fn set_ext0_wakeup(&mut self, wakeup: Ext0Wakeup) {
        self.ext0 = wakeup;
        self.events.push(Event::Ext0(wakeup));
    }

    fn ext1_wakeup(&self) -> Ext1Wakeup {
        self.ext1
    }

    fn set_ext1_wakeup(&mut self, wakeup: Ext1Wakeup) {
        self.ext1 = wakeup;
        self.events.push(Event::Ext1(wakeup));
    }

    fn ext1_status(&self) -> u32 {
        self.ext1_status
    }

    fn clear_ext1_status(&mut self) {
        self.ext1_status = 0;
        self.ext1_status_clears += 1;
    }

    fn force_ulp_wakeup(&mut self) {
        self.ulp_forced = true;
        self.events.push(Event::UlpForce);
    }

    fn set_power_down(&mut self, flags: PowerDownFlags) {
        self.power_down = Some(flags);
        self.events.push(Event::PowerDown(flags));
    }

    fn entry_address(&self) -> u32 {
        self.entry_address
    }

    fn set_entry_address(&mut self, address: u32) {
        self.entry_address = address;
    }

    fn update_memory_crc(&mut self) {
        self.crc_updates += 1;
        self.crc = 0x1000_0000 | self.entry_address >> 4;
    }

    fn memory_crc(&self) -> u32 {
        self.crc
    }

    fn interrupt_enable(&self) -> u32 {
        self.int_ena
    }

    fn slow_clk_cal(&self) -> u32 {
        self.cal
    }

    fn request_time_update(&mut self) {
        self.time_updates += 1;
        self.update_pending.set(true);
        self.pending_polls.set(self.polls_until_valid);
    }

    fn time_valid(&self) -> bool {
        if !self.update_pending.get() {
            return true;
        }
        match self.pending_polls.get() {
            0 => {
                self.latched.set(self.counter);
                self.update_pending.set(false);
                true
            }
            n => {
                self.pending_polls.set(n - 1);
                false
            }
        }
    }

    fn clear_time_valid(&mut self) {
        self.time_valid_clears += 1;
    }

    fn time_lo(&self) -> u32 {
        self.latched.get() as u32
    }

    fn time_hi(&self) -> u32 {
        (self.latched.get() >> 32) as u32 & 0xffff
    }

    fn set_sleep_timer(&mut self, lo: u32, hi: u32) {
        self.sleep_timer = Some((lo, hi));
        self.events.push(Event::SleepTimer(lo, hi));
    }

    fn uart_tx_busy(&self, uart: u8) -> bool {
        self.uart_polled.set(Some(uart));
        match self.uart_busy_polls.get() {
            0 => false,
            n => {
                self.uart_busy_polls.set(n - 1);
                true
            }
        }
    }

    fn delay_us(&self, us: u32) {
        self.delays.set(self.delays.get() + us);
    }

    fn retained_segments(&self) -> RetainedSegments {
        self.segments
    }
}
