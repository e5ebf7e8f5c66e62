//! # Deep-sleep wake stub support
//!
//! ## Overview
//!
//! A wake stub is a small function that the ROM runs right after the chip
//! wakes from deep sleep, before the 2nd stage bootloader loads the
//! application. It can inspect why the chip woke up and either let the boot
//! continue or send the chip back to sleep, which is far cheaper than a full
//! boot.
//!
//! Only RTC memory and the mask ROM are usable at that point. This crate
//! keeps its state in a [`WakeStubConfig`] and a [`SleepClock`] placed in
//! RTC slow memory, and reaches the hardware through [`RtcRegisters`].
//!
//! - arm timer, EXT0, EXT1, touch pad and ULP wakeups
//! - decide which RTC power domains stay up during sleep
//! - commit to deep sleep through the RTC controller handshake
//! - report the wakeup cause and the time spent asleep
//!
//! ## Examples
//!
//! ```rust, ignore
//! use esp_wake_stub::{SleepClock, WakeStub, WakeStubConfig, WakeupLevel, esp32::Esp32Rtc};
//!
//! #[unsafe(link_section = ".rtc_slow.data")]
//! static mut CONFIG: WakeStubConfig = WakeStubConfig::new();
//! #[unsafe(link_section = ".rtc_slow.data")]
//! static mut CLOCK: SleepClock = SleepClock::new();
//!
//! #[unsafe(link_section = ".rtc_fast.text")]
//! extern "C" fn wake_stub() {
//!     let (config, clock) = unsafe { (&mut *(&raw mut CONFIG), &mut *(&raw mut CLOCK)) };
//!     let mut stub = WakeStub::new(unsafe { Esp32Rtc::steal() }, config, clock);
//!
//!     if stub.sleep_time_us() < 60_000_000 {
//!         stub.deep_sleep(1_000_000);
//!     }
//! }
//! ```
//!
//! All code reachable from the stub, including this crate's, must be linked
//! into RTC fast memory.
//!
//! ## Additional configuration
//!
//! We've exposed some configuration options that don't fit into cargo
//! features. These can be set via environment variables, or via cargo's `[env]`
//! section inside `.cargo/config.toml`. Below is a table of tunable parameters
//! for this crate:
#![doc = ""]
#![doc = include_str!(concat!(env!("OUT_DIR"), "/esp_wake_stub_config_table.md"))]
#![doc = ""]
//! ## Feature Flags
#![doc = document_features::document_features!(feature_label = r#"<span class="stab portability"><code>{feature}</code></span>"#)]
#![doc(html_logo_url = "https://avatars.githubusercontent.com/u/46717278")]
#![cfg_attr(not(test), no_std)]

// MUST be the first module
mod fmt;

#[cfg(feature = "esp32")]
pub mod esp32;
#[cfg(feature = "esp32")]
mod rom;

pub mod config;
pub mod power;
pub mod registers;
pub mod rtc_io;
pub mod sleep;
pub mod stub;
pub mod time;
pub mod wakeup;

#[cfg(test)]
mod mock;

pub use config::WakeStubConfig;
pub use power::{PdDomain, PdOption};
pub use registers::RtcRegisters;
pub use stub::WakeStub;
pub use time::SleepClock;
pub use wakeup::{Ext1WakeupMode, SleepSource, WakeupCause, WakeupLevel};

/// Errors which can be returned.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, strum::Display)]
pub enum Error {
    /// A pin cannot wake the chip, or a level or mode is out of range.
    InvalidArgument,
    /// The request conflicts with an armed wakeup source.
    InvalidState,
}

impl core::error::Error for Error {}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", defmt::Display2Format(self))
    }
}

/// The configuration was already synchronized in this wake cycle.
///
/// Informational, callers treat it as success.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct AlreadySynced;

impl core::fmt::Display for AlreadySynced {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AlreadySynced")
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for AlreadySynced {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "AlreadySynced")
    }
}
