//! GPIO to RTC IO channel mapping.

const GPIO_COUNT: usize = 40;

#[rustfmt::skip]
const RTC_IO_CHANNELS: [Option<u8>; GPIO_COUNT] = [
    Some(11), None,     Some(12), None,     Some(10), None,     None,     None,     // 0..=7
    None,     None,     None,     None,     Some(15), Some(14), Some(16), Some(13), // 8..=15
    None,     None,     None,     None,     None,     None,     None,     None,     // 16..=23
    None,     Some(6),  Some(7),  Some(17), None,     None,     None,     None,     // 24..=31
    Some(9),  Some(8),  Some(4),  Some(5),  Some(0),  Some(1),  Some(2),  Some(3),  // 32..=39
];

/// RTC IO channel of `gpio`, or `None` if the pin cannot be routed to the
/// RTC domain.
pub fn rtc_io_channel(gpio: u8) -> Option<u8> {
    RTC_IO_CHANNELS.get(gpio as usize).copied().flatten()
}

/// Translates a mask of GPIO numbers to a mask of RTC IO channels.
///
/// Returns `None` if any bit names a pin without an RTC IO channel.
pub fn gpio_mask_to_rtc_mask(gpio_mask: u64) -> Option<u32> {
    let mut rtc_mask = 0;
    let mut remaining = gpio_mask;
    while remaining != 0 {
        let gpio = remaining.trailing_zeros();
        remaining &= remaining - 1;

        let channel = rtc_io_channel(u8::try_from(gpio).ok()?)?;
        rtc_mask |= 1 << channel;
    }
    Some(rtc_mask)
}

/// Translates a mask of RTC IO channels back to a mask of GPIO numbers.
pub fn rtc_mask_to_gpio_mask(rtc_mask: u32) -> u64 {
    (0..GPIO_COUNT as u8)
        .filter(|&gpio| matches!(rtc_io_channel(gpio), Some(channel) if rtc_mask & (1 << channel) != 0))
        .fold(0, |mask, gpio| mask | (1 << gpio))
}
