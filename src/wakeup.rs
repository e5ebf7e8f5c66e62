//! # Wakeup triggers
//!
//! Trigger types and the preparers that program a trigger's hardware right
//! before the sleep commit.

use crate::{
    Error,
    config::WakeStubConfig,
    registers::RtcRegisters,
    time::{read_counter, us_to_ticks},
};

bitflags::bitflags! {
    /// Wakeup trigger enable bits as laid out in the RTC controller.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct WakeTriggers: u16 {
        /// Single RTC pin level.
        const EXT0  = 1 << 0;
        /// Set of RTC pins.
        const EXT1  = 1 << 1;
        const GPIO  = 1 << 2;
        /// RTC sleep timer alarm.
        const TIMER = 1 << 3;
        const SDIO  = 1 << 4;
        const MAC   = 1 << 5;
        const UART0 = 1 << 6;
        const UART1 = 1 << 7;
        /// Touch pad.
        const TOUCH = 1 << 8;
        /// ULP coprocessor.
        const ULP   = 1 << 9;
        const BT    = 1 << 10;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for WakeTriggers {
    fn format(&self, fmt: defmt::Formatter<'_>) {
        defmt::write!(fmt, "WakeTriggers({=u16:#x})", self.bits())
    }
}

/// Level of an EXT0 pin that wakes the chip.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeupLevel {
    /// Wake on low level.
    Low,
    /// Wake on high level.
    #[default]
    High,
}

impl TryFrom<u8> for WakeupLevel {
    type Error = Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            0 => Ok(Self::Low),
            1 => Ok(Self::High),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// How the pins of an EXT1 trigger are combined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ext1WakeupMode {
    /// Wake when all selected pins are low.
    #[default]
    AllLow,
    /// Wake when any selected pin is high.
    AnyHigh,
}

impl TryFrom<u8> for Ext1WakeupMode {
    type Error = Error;

    fn try_from(mode: u8) -> Result<Self, Self::Error> {
        match mode {
            0 => Ok(Self::AllLow),
            1 => Ok(Self::AnyHigh),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// EXT0 trigger settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ext0Wakeup {
    /// RTC IO channel of the pin.
    pub channel: u8,
    /// Level that wakes the chip.
    pub level: WakeupLevel,
}

/// EXT1 trigger settings.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ext1Wakeup {
    /// Mask of RTC IO channels.
    pub mask: u32,
    /// How the pin levels combine.
    pub mode: Ext1WakeupMode,
}

/// What woke the chip, as far as the wake stub can tell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WakeupCause {
    /// Not a wakeup from deep sleep, or a trigger the wake stub does not arm.
    Undefined,
    Ext0,
    Ext1,
    Timer,
    TouchPad,
    Ulp,
}

impl From<WakeTriggers> for WakeupCause {
    fn from(cause: WakeTriggers) -> Self {
        if cause.contains(WakeTriggers::EXT0) {
            Self::Ext0
        } else if cause.contains(WakeTriggers::EXT1) {
            Self::Ext1
        } else if cause.contains(WakeTriggers::TIMER) {
            Self::Timer
        } else if cause.contains(WakeTriggers::TOUCH) {
            Self::TouchPad
        } else if cause.contains(WakeTriggers::ULP) {
            Self::Ulp
        } else {
            Self::Undefined
        }
    }
}

/// A source that can be removed with
/// [`WakeStub::disable_wakeup_source`](crate::WakeStub::disable_wakeup_source).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepSource {
    /// Every source, including the sleep duration.
    All,
    Ext0,
    Ext1,
    Timer,
    TouchPad,
    Ulp,
}

impl SleepSource {
    pub(crate) fn triggers(self) -> WakeTriggers {
        match self {
            Self::All => WakeTriggers::all(),
            Self::Ext0 => WakeTriggers::EXT0,
            Self::Ext1 => WakeTriggers::EXT1,
            Self::Timer => WakeTriggers::TIMER,
            Self::TouchPad => WakeTriggers::TOUCH,
            Self::Ulp => WakeTriggers::ULP,
        }
    }
}

/// Triggers that need hardware set up before the commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) enum TriggerKind {
    Ext0,
    Ext1,
    Ulp,
    Timer,
}

impl TriggerKind {
    /// Preparation order. Only the first armed trigger is prepared.
    const PRIORITY: [Self; 4] = [Self::Ext0, Self::Ext1, Self::Ulp, Self::Timer];

    /// Picks the trigger to prepare for the armed set in `config`.
    ///
    /// The timer is only eligible with a non-zero sleep duration.
    pub(crate) fn select(config: &WakeStubConfig) -> Option<Self> {
        let armed = config.wakeup_triggers();
        Self::PRIORITY.into_iter().find(|kind| match kind {
            Self::Ext0 => armed.contains(WakeTriggers::EXT0),
            Self::Ext1 => armed.contains(WakeTriggers::EXT1),
            Self::Ulp => armed.contains(WakeTriggers::ULP),
            Self::Timer => armed.contains(WakeTriggers::TIMER) && config.sleep_duration_us() > 0,
        })
    }

    /// Programs the hardware for this trigger.
    pub(crate) fn prepare<R: RtcRegisters + ?Sized>(self, config: &mut WakeStubConfig, regs: &mut R) {
        match self {
            Self::Ext0 => prepare_ext0(config, regs),
            Self::Ext1 => prepare_ext1(config, regs),
            Self::Ulp => prepare_ulp(regs),
            Self::Timer => prepare_timer(config, regs),
        }
    }
}

fn prepare_ext0<R: RtcRegisters + ?Sized>(config: &WakeStubConfig, regs: &mut R) {
    let wakeup = config.ext0();
    trace!("ext0 channel {} level high {}", wakeup.channel, wakeup.level == WakeupLevel::High);
    regs.set_ext0_wakeup(wakeup);
}

fn prepare_ext1<R: RtcRegisters + ?Sized>(config: &WakeStubConfig, regs: &mut R) {
    let wakeup = config.ext1();
    trace!("ext1 mask {:#x} any high {}", wakeup.mask, wakeup.mode == Ext1WakeupMode::AnyHigh);
    regs.clear_ext1_status();
    regs.set_ext1_wakeup(wakeup);
}

fn prepare_ulp<R: RtcRegisters + ?Sized>(regs: &mut R) {
    regs.force_ulp_wakeup();
}

/// Arms the sleep timer `sleep_duration_us` past the current counter value.
fn prepare_timer<R: RtcRegisters + ?Sized>(config: &mut WakeStubConfig, regs: &mut R) {
    let _ = config.sync_from_hardware(&*regs);

    let cal = regs.slow_clk_cal();
    if cal == 0 {
        warn!("slow clock is not calibrated, timer fires immediately");
    }
    let ticks = us_to_ticks(config.sleep_duration_us(), cal);
    let target = read_counter(regs).wrapping_add(ticks);
    trace!("sleep timer target {}", target);

    regs.set_sleep_timer(target as u32, (target >> 32) as u32);
}
