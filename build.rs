use esp_config::{ConfigOption, DisplayHint, Stability, Validator, Value, generate_config};

fn main() {
    if cfg!(feature = "defmt") && cfg!(feature = "log-04") {
        panic!("Only one of `defmt` and `log-04` can be enabled");
    }

    // emit config
    generate_config(
        "esp-wake-stub",
        &[
            ConfigOption {
                name: "console-uart".to_string(),
                description: "The UART whose transmitter is drained before the wake stub \
                commits to sleep, so that diagnostic output is not cut off by the clock \
                change during sleep entry.".to_string(),
                default_value: Value::Integer(0),
                constraint: Some(Validator::IntegerInRange(0..3)),
                stability: Stability::Unstable,
                active: true,
                display_hint: DisplayHint::None,
            },
            ConfigOption {
                name: "log-level".to_string(),
                description: "Verbosity of the ROM printer used by the `rom-print` feature: \
                0 = off, 1 = error, 2 = warn, 3 = info, 4 = debug, 5 = trace. Messages above \
                this level are not compiled in.".to_string(),
                default_value: Value::Integer(3),
                constraint: Some(Validator::IntegerInRange(0..6)),
                stability: Stability::Unstable,
                active: true,
                display_hint: DisplayHint::None,
            },
            ConfigOption {
                name: "time-update-delay-us".to_string(),
                description: "Delay in microseconds between polls of the RTC timer \
                \"value valid\" bit. The latch may take one slow clock period; polling \
                without a delay floods the RTC bus. 0 polls without delay.".to_string(),
                default_value: Value::Integer(1),
                constraint: Some(Validator::IntegerInRange(0..1001)),
                stability: Stability::Unstable,
                active: true,
                display_hint: DisplayHint::None,
            },
        ],
        true,
        true,
    );
}
