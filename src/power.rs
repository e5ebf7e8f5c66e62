//! # Power domains
//!
//! Deciding which RTC power domains stay up during deep sleep.

use crate::{config::WakeStubConfig, wakeup::WakeTriggers};

/// RTC power domains that can be kept up or powered down during sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumCount)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PdDomain {
    /// RTC IO, sensors and the ULP coprocessor.
    RtcPeriph  = 0,
    /// RTC slow memory.
    RtcSlowMem = 1,
    /// RTC fast memory, where the wake stub itself lives.
    RtcFastMem = 2,
}

/// Requested power state of a [`PdDomain`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PdOption {
    /// Power down during sleep.
    Off  = 0,
    /// Keep powered during sleep.
    On   = 1,
    /// Let the wake stub decide based on the armed triggers.
    #[default]
    Auto = 2,
}

bitflags::bitflags! {
    /// Power-down flags for the sleep commit.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PowerDownFlags: u32 {
        /// Digital core.
        const DIG          = 1 << 0;
        /// RTC peripherals.
        const RTC_PERIPH   = 1 << 1;
        /// RTC slow memory.
        const RTC_SLOW_MEM = 1 << 2;
        /// RTC fast memory.
        const RTC_FAST_MEM = 1 << 3;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PowerDownFlags {
    fn format(&self, fmt: defmt::Formatter<'_>) {
        defmt::write!(fmt, "PowerDownFlags({=u32:#x})", self.bits())
    }
}

/// A linker-defined address range.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

impl Segment {
    /// `true` when nothing was placed in the segment.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Data and bss segments placed in RTC slow memory.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RetainedSegments {
    pub data: Segment,
    pub bss: Segment,
}

impl RetainedSegments {
    /// `true` if any variable lives in RTC slow memory.
    pub fn is_occupied(&self) -> bool {
        !self.data.is_empty() || !self.bss.is_empty()
    }
}

/// Resolves [`PdOption::Auto`] options in `config` and returns the flags of
/// every domain that is not kept on.
///
/// Resolution rules:
/// - RTC slow memory is turned on when it is `Auto` or when anything lives in
///   it, whatever was requested.
/// - RTC fast memory is turned on when it is `Auto`. The wake stub runs from it.
/// - RTC peripherals in `Auto` are turned on for EXT0 and turned off for touch
///   or ULP wakeup. Powering them on breaks the touch and ULP timer state
///   machines. Otherwise they stay `Auto`.
///
/// `Auto` options still left are treated as off.
pub fn compute_power_down_flags(
    config: &mut WakeStubConfig,
    segments: &RetainedSegments,
) -> PowerDownFlags {
    if config.pd_option(PdDomain::RtcSlowMem) == PdOption::Auto || segments.is_occupied() {
        config.set_pd_option(PdDomain::RtcSlowMem, PdOption::On);
    }

    if config.pd_option(PdDomain::RtcFastMem) == PdOption::Auto {
        config.set_pd_option(PdDomain::RtcFastMem, PdOption::On);
    }

    if config.pd_option(PdDomain::RtcPeriph) == PdOption::Auto {
        let triggers = config.wakeup_triggers();
        if triggers.contains(WakeTriggers::EXT0) {
            config.set_pd_option(PdDomain::RtcPeriph, PdOption::On);
        } else if triggers.intersects(WakeTriggers::TOUCH | WakeTriggers::ULP) {
            config.set_pd_option(PdDomain::RtcPeriph, PdOption::Off);
        }
    }

    let mut flags = PowerDownFlags::empty();
    for (domain, flag) in [
        (PdDomain::RtcSlowMem, PowerDownFlags::RTC_SLOW_MEM),
        (PdDomain::RtcFastMem, PowerDownFlags::RTC_FAST_MEM),
        (PdDomain::RtcPeriph, PowerDownFlags::RTC_PERIPH),
    ] {
        if config.pd_option(domain) != PdOption::On {
            flags |= flag;
        }
    }

    debug!("power down flags {:#x}", flags.bits());
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    fn occupied() -> RetainedSegments {
        RetainedSegments {
            data: Segment {
                start: 0x5000_0000,
                end: 0x5000_0010,
            },
            bss: Segment::default(),
        }
    }

    #[test]
    fn touch_only_powers_down_peripherals() {
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TOUCH);

        let flags = compute_power_down_flags(&mut config, &RetainedSegments::default());

        assert_eq!(flags, PowerDownFlags::RTC_PERIPH);
        assert_eq!(config.pd_option(PdDomain::RtcPeriph), PdOption::Off);
        assert_eq!(config.pd_option(PdDomain::RtcFastMem), PdOption::On);
        assert_eq!(config.pd_option(PdDomain::RtcSlowMem), PdOption::On);
    }

    #[test]
    fn ext0_keeps_peripherals_on() {
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::EXT0 | WakeTriggers::TOUCH);

        let flags = compute_power_down_flags(&mut config, &RetainedSegments::default());

        assert_eq!(flags, PowerDownFlags::empty());
        assert_eq!(config.pd_option(PdDomain::RtcPeriph), PdOption::On);
    }

    #[test]
    fn undecided_peripherals_are_powered_down() {
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TIMER);

        let flags = compute_power_down_flags(&mut config, &RetainedSegments::default());

        assert_eq!(flags, PowerDownFlags::RTC_PERIPH);
        assert_eq!(config.pd_option(PdDomain::RtcPeriph), PdOption::Auto);
    }

    #[test]
    fn occupied_slow_memory_overrides_request() {
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TIMER);
        config.set_pd_option(PdDomain::RtcSlowMem, PdOption::Off);
        config.set_pd_option(PdDomain::RtcFastMem, PdOption::Off);

        let flags = compute_power_down_flags(&mut config, &occupied());

        assert_eq!(config.pd_option(PdDomain::RtcSlowMem), PdOption::On);
        assert_eq!(flags, PowerDownFlags::RTC_FAST_MEM | PowerDownFlags::RTC_PERIPH);
    }

    #[test]
    fn explicit_off_is_kept_when_slow_memory_is_empty() {
        let mut config = WakeStubConfig::new();
        config.mark_synced(WakeTriggers::TIMER);
        config.set_pd_option(PdDomain::RtcSlowMem, PdOption::Off);

        let flags = compute_power_down_flags(&mut config, &RetainedSegments::default());

        assert!(flags.contains(PowerDownFlags::RTC_SLOW_MEM));
    }

    #[test]
    fn segment_bounds() {
        assert!(Segment { start: 4, end: 4 }.is_empty());
        assert!(Segment { start: 8, end: 4 }.is_empty());
        assert!(!Segment { start: 4, end: 8 }.is_empty());
        assert!(occupied().is_occupied());
        assert!(!RetainedSegments::default().is_occupied());
    }
}
