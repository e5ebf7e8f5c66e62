//! # Wake stub API
//!
//! [`WakeStub`] is what a wake stub callback works with: it arms wakeup
//! sources, reports why the chip woke up and sends it back to sleep.
//!
//! ## Examples
//!
//! ```rust, ignore
//! let mut stub = WakeStub::new(rtc, config, clock);
//!
//! if stub.wakeup_cause() == WakeupCause::Ext0 {
//!     // Fall through to the normal boot.
//!     return;
//! }
//!
//! stub.disable_wakeup_source(SleepSource::All)?;
//! stub.enable_ext0_wakeup(13, WakeupLevel::High)?;
//! stub.deep_sleep_start();
//! ```

use crate::{
    Error,
    config::WakeStubConfig,
    power::{PdDomain, PdOption},
    registers::RtcRegisters,
    rtc_io::{gpio_mask_to_rtc_mask, rtc_io_channel, rtc_mask_to_gpio_mask},
    sleep::{deep_sleep_entry, deep_sleep_timer, uart_tx_wait_idle},
    time::{SleepClock, read_counter, ticks_to_us},
    wakeup::{
        Ext0Wakeup,
        Ext1Wakeup,
        Ext1WakeupMode,
        SleepSource,
        WakeTriggers,
        WakeupCause,
        WakeupLevel,
    },
};

/// Wake stub handle over the RTC registers and the retained state.
///
/// Create one handle per wake cycle. Dropping it, which is what happens when
/// the stub returns to the normal boot, marks the configuration stale so the
/// next wake cycle reloads it from the hardware.
pub struct WakeStub<'a, R: RtcRegisters> {
    regs: R,
    config: &'a mut WakeStubConfig,
    clock: &'a mut SleepClock,
}

impl<'a, R: RtcRegisters> WakeStub<'a, R> {
    /// Creates the handle. The configuration is synchronized lazily by the
    /// first call that needs it.
    pub fn new(regs: R, config: &'a mut WakeStubConfig, clock: &'a mut SleepClock) -> Self {
        Self {
            regs,
            config,
            clock,
        }
    }

    /// The retained configuration, synchronized with the hardware.
    pub fn config(&mut self) -> &WakeStubConfig {
        self.sync();
        self.config
    }

    fn sync(&mut self) {
        let _ = self.config.sync_from_hardware(&self.regs);
    }

    /// Arms the timer wakeup `duration_us` microseconds after sleep entry.
    pub fn enable_timer_wakeup(&mut self, duration_us: u64) {
        self.sync();
        self.config.arm(WakeTriggers::TIMER);
        self.config.set_sleep_duration_us(duration_us);
    }

    /// Arms wakeup on `level` of a single RTC capable pin.
    ///
    /// Fails with [`Error::InvalidArgument`] if `gpio` has no RTC IO channel
    /// and with [`Error::InvalidState`] if touch or ULP wakeup is armed.
    pub fn enable_ext0_wakeup(&mut self, gpio: u8, level: WakeupLevel) -> Result<(), Error> {
        self.sync();

        let channel = rtc_io_channel(gpio).ok_or(Error::InvalidArgument)?;
        if self
            .config
            .wakeup_triggers()
            .intersects(WakeTriggers::TOUCH | WakeTriggers::ULP)
        {
            error!("conflicting wake-up trigger: ulp or touch");
            return Err(Error::InvalidState);
        }

        self.config.set_ext0(Ext0Wakeup { channel, level });
        self.config.arm(WakeTriggers::EXT0);
        Ok(())
    }

    /// Arms wakeup on a set of RTC capable pins, given as a mask of GPIO
    /// numbers.
    ///
    /// Fails with [`Error::InvalidArgument`] if any pin in `gpio_mask` has no
    /// RTC IO channel.
    pub fn enable_ext1_wakeup(&mut self, gpio_mask: u64, mode: Ext1WakeupMode) -> Result<(), Error> {
        self.sync();

        let mask = gpio_mask_to_rtc_mask(gpio_mask).ok_or(Error::InvalidArgument)?;

        self.config.set_ext1(Ext1Wakeup { mask, mode });
        self.config.arm(WakeTriggers::EXT1);
        Ok(())
    }

    /// Arms wakeup by the ULP coprocessor.
    ///
    /// Fails with [`Error::InvalidState`] if EXT0 wakeup is armed.
    pub fn enable_ulp_wakeup(&mut self) -> Result<(), Error> {
        self.arm_exclusive_of_ext0(WakeTriggers::ULP)
    }

    /// Arms wakeup by the touch pads.
    ///
    /// Fails with [`Error::InvalidState`] if EXT0 wakeup is armed.
    pub fn enable_touchpad_wakeup(&mut self) -> Result<(), Error> {
        self.arm_exclusive_of_ext0(WakeTriggers::TOUCH)
    }

    fn arm_exclusive_of_ext0(&mut self, trigger: WakeTriggers) -> Result<(), Error> {
        self.sync();

        if self.config.wakeup_triggers().contains(WakeTriggers::EXT0) {
            error!("conflicting wake-up trigger: ext0");
            return Err(Error::InvalidState);
        }

        self.config.arm(trigger);
        Ok(())
    }

    /// Removes a wakeup source.
    ///
    /// [`SleepSource::All`] clears every trigger. Removing a single source
    /// that is not armed fails with [`Error::InvalidState`].
    pub fn disable_wakeup_source(&mut self, source: SleepSource) -> Result<(), Error> {
        self.sync();

        let triggers = source.triggers();
        if source != SleepSource::All && !self.config.wakeup_triggers().contains(triggers) {
            error!("incorrect wake-up source to disable");
            return Err(Error::InvalidState);
        }

        self.config.disarm(triggers);
        if triggers.contains(WakeTriggers::TIMER) {
            self.config.set_sleep_duration_us(0);
        }
        Ok(())
    }

    /// Requests a power state for `domain` during sleep.
    ///
    /// RTC slow memory stays on while anything lives in it regardless of
    /// the request.
    pub fn configure_power_domain(&mut self, domain: PdDomain, option: PdOption) {
        self.sync();
        self.config.set_pd_option(domain, option);
    }

    /// Sleeps for `duration_us` with the timer as the only prepared trigger.
    ///
    /// Returns `false` if the hardware rejected the request, which leaves
    /// the chip awake.
    pub fn try_deep_sleep(&mut self, duration_us: u64) -> bool {
        !deep_sleep_timer(self.config, &mut self.regs, duration_us)
    }

    /// Sleeps for `duration_us` with the timer as the only prepared trigger.
    pub fn deep_sleep(mut self, duration_us: u64) -> ! {
        self.try_deep_sleep(duration_us);
        loop {
            core::hint::spin_loop();
        }
    }

    /// Enters deep sleep with every armed trigger.
    ///
    /// Returns `false` if the hardware rejected the request, which leaves
    /// the chip awake.
    pub fn try_deep_sleep_start(&mut self) -> bool {
        !deep_sleep_entry(self.config, &mut self.regs)
    }

    /// Enters deep sleep with every armed trigger.
    ///
    /// The RTC runs on a slower clock than the CPU, so the CPU keeps
    /// executing for a few cycles after the commit. This spins through them.
    pub fn deep_sleep_start(mut self) -> ! {
        self.try_deep_sleep_start();
        loop {
            core::hint::spin_loop();
        }
    }

    /// Microseconds elapsed since the previous call.
    ///
    /// The first call after a wakeup measures the sleep that just ended,
    /// provided the previous call happened right before the sleep started.
    pub fn sleep_time_us(&mut self) -> u64 {
        let now = read_counter(&mut self.regs);
        let ticks = self.clock.advance(now);
        ticks_to_us(ticks, self.regs.slow_clk_cal())
    }

    /// The trigger that woke the chip.
    pub fn wakeup_cause(&self) -> WakeupCause {
        WakeupCause::from(self.regs.wakeup_cause())
    }

    /// GPIO numbers of the pins that caused an EXT1 wakeup, or 0 if the chip
    /// woke up for another reason.
    pub fn ext1_wakeup_status(&self) -> u64 {
        if self.wakeup_cause() != WakeupCause::Ext1 {
            return 0;
        }
        rtc_mask_to_gpio_mask(self.regs.ext1_status())
    }

    /// Waits until `uart` has shifted out all pending data.
    pub fn uart_tx_wait_idle(&self, uart: u8) {
        uart_tx_wait_idle(&self.regs, uart);
    }

    /// Points the ROM at a new wake stub entry and updates the RTC memory
    /// CRC the ROM checks before jumping there.
    pub fn set_wake_stub_entry(&mut self, address: u32) {
        self.sync();
        self.regs.set_entry_address(address);
        self.regs.update_memory_crc();
        let crc = self.regs.memory_crc();
        self.config.set_wake_stub_address(address, crc);
        debug!("wake stub entry {:#x} crc {:#x}", address, crc);
    }
}

impl<R: RtcRegisters> Drop for WakeStub<'_, R> {
    fn drop(&mut self) {
        self.config.invalidate();
    }
}
