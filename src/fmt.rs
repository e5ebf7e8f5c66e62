#![macro_use]
#![allow(unused_macros)]

#[cfg(feature = "rom-print")]
pub(crate) const LOG_LEVEL: u8 = esp_config::esp_config_int!(u8, "ESP_WAKE_STUB_CONFIG_LOG_LEVEL");

#[cfg(feature = "rom-print")]
#[collapse_debuginfo(yes)]
macro_rules! rom_log {
    ($level:literal, $prefix:literal, $s:literal $(, $x:expr)*) => {
        if $crate::fmt::LOG_LEVEL >= $level {
            use core::fmt::Write as _;
            let _ = ::core::writeln!($crate::rom::RomPrinter, ::core::concat!($prefix, $s) $(, $x)*);
        }
    };
}

#[collapse_debuginfo(yes)]
macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            cfg_if::cfg_if! {
                if #[cfg(feature = "defmt")] {
                    ::defmt::trace!($s $(, $x)*);
                } else if #[cfg(feature = "log-04")] {
                    ::log_04::trace!($s $(, $x)*);
                } else if #[cfg(feature = "rom-print")] {
                    rom_log!(5, "T (wake stub) ", $s $(, $x)*);
                } else {
                    let _ = ($( & $x ),*);
                }
            }
        }
    };
}

#[collapse_debuginfo(yes)]
macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            cfg_if::cfg_if! {
                if #[cfg(feature = "defmt")] {
                    ::defmt::debug!($s $(, $x)*);
                } else if #[cfg(feature = "log-04")] {
                    ::log_04::debug!($s $(, $x)*);
                } else if #[cfg(feature = "rom-print")] {
                    rom_log!(4, "D (wake stub) ", $s $(, $x)*);
                } else {
                    let _ = ($( & $x ),*);
                }
            }
        }
    };
}

#[collapse_debuginfo(yes)]
macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            cfg_if::cfg_if! {
                if #[cfg(feature = "defmt")] {
                    ::defmt::info!($s $(, $x)*);
                } else if #[cfg(feature = "log-04")] {
                    ::log_04::info!($s $(, $x)*);
                } else if #[cfg(feature = "rom-print")] {
                    rom_log!(3, "I (wake stub) ", $s $(, $x)*);
                } else {
                    let _ = ($( & $x ),*);
                }
            }
        }
    };
}

#[collapse_debuginfo(yes)]
macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            cfg_if::cfg_if! {
                if #[cfg(feature = "defmt")] {
                    ::defmt::warn!($s $(, $x)*);
                } else if #[cfg(feature = "log-04")] {
                    ::log_04::warn!($s $(, $x)*);
                } else if #[cfg(feature = "rom-print")] {
                    rom_log!(2, "W (wake stub) ", $s $(, $x)*);
                } else {
                    let _ = ($( & $x ),*);
                }
            }
        }
    };
}

#[collapse_debuginfo(yes)]
macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        {
            cfg_if::cfg_if! {
                if #[cfg(feature = "defmt")] {
                    ::defmt::error!($s $(, $x)*);
                } else if #[cfg(feature = "log-04")] {
                    ::log_04::error!($s $(, $x)*);
                } else if #[cfg(feature = "rom-print")] {
                    rom_log!(1, "E (wake stub) ", $s $(, $x)*);
                } else {
                    let _ = ($( & $x ),*);
                }
            }
        }
    };
}
