//! Register definitions and bitfield structures for the RTC-8564.
//!
//! This module contains all register addresses, bitfield definitions, and
//! related types for interacting with the RTC-8564 real-time clock registers.
//! The register map is shared with the NXP PCF8563.

use bitfield::bitfield;

/// Register addresses for the RTC-8564.
#[allow(unused)]
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegAddr {
    /// Control register 1 (STOP bit)
    Control1 = 0x00,
    /// Control register 2 (interrupt enables and flags)
    Control2 = 0x01,
    /// Seconds register (0-59), VL flag in bit 7
    Seconds = 0x02,
    /// Minutes register (0-59)
    Minutes = 0x03,
    /// Hours register (0-23)
    Hours = 0x04,
    /// Days register (1-31)
    Days = 0x05,
    /// Weekdays register (0-6, 0 = Sunday)
    Weekdays = 0x06,
    /// Month register (1-12), century flag in bit 7
    Months = 0x07,
    /// Years register (0-99)
    Years = 0x08,
    /// Minute alarm register
    MinuteAlarm = 0x09,
    /// Hour alarm register
    HourAlarm = 0x0A,
    /// Day alarm register
    DayAlarm = 0x0B,
    /// Weekday alarm register
    WeekdayAlarm = 0x0C,
    /// CLKOUT frequency register
    ClkoutControl = 0x0D,
    /// Timer control register (clock source and enable)
    TimerControl = 0x0E,
    /// Timer countdown value register
    Timer = 0x0F,
}

/// CLKOUT pin output frequency options.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClkoutFrequency {
    /// 32.768 kHz output
    Hz32768 = 0b00,
    /// 1.024 kHz output
    Hz1024 = 0b01,
    /// 32 Hz output
    Hz32 = 0b10,
    /// 1 Hz output
    Hz1 = 0b11,
}
impl From<u8> for ClkoutFrequency {
    /// Creates a `ClkoutFrequency` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0b00, 0b01, 0b10, or 0b11.
    fn from(v: u8) -> Self {
        match v {
            0b00 => ClkoutFrequency::Hz32768,
            0b01 => ClkoutFrequency::Hz1024,
            0b10 => ClkoutFrequency::Hz32,
            0b11 => ClkoutFrequency::Hz1,
            _ => panic!("Invalid value for ClkoutFrequency: {}", v),
        }
    }
}
impl From<ClkoutFrequency> for u8 {
    /// Converts a `ClkoutFrequency` to its raw register value.
    fn from(v: ClkoutFrequency) -> Self {
        v as u8
    }
}

/// Countdown timer clock source options.
///
/// The selected source determines the tick period of the 8-bit countdown
/// counter.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerClock {
    /// 4096 Hz source (244 µs per tick)
    Hz4096 = 0b00,
    /// 64 Hz source (15.625 ms per tick)
    Hz64 = 0b01,
    /// 1 Hz source (1 s per tick)
    Hz1 = 0b10,
    /// 1/60 Hz source (1 min per tick)
    PerMinute = 0b11,
}
impl From<u8> for TimerClock {
    /// Creates a `TimerClock` from a raw register value.
    ///
    /// # Panics
    /// Panics if the value is not 0b00, 0b01, 0b10, or 0b11.
    fn from(v: u8) -> Self {
        match v {
            0b00 => TimerClock::Hz4096,
            0b01 => TimerClock::Hz64,
            0b10 => TimerClock::Hz1,
            0b11 => TimerClock::PerMinute,
            _ => panic!("Invalid value for TimerClock: {}", v),
        }
    }
}
impl From<TimerClock> for u8 {
    /// Converts a `TimerClock` to its raw register value.
    fn from(v: TimerClock) -> Self {
        v as u8
    }
}

// This macro generates the From<u8> and Into<u8> implementations for the
// register type
macro_rules! from_register_u8 {
    ($typ:ty) => {
        impl From<u8> for $typ {
            fn from(v: u8) -> Self {
                paste::paste!([< $typ >](v))
            }
        }
        impl From<$typ> for u8 {
            fn from(v: $typ) -> Self {
                v.0
            }
        }
    };
}

bitfield! {
    /// Control register 1.
    ///
    /// Writing the STOP bit halts the clock divider chain so the seven
    /// time registers can be updated atomically.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control1(u8);
    impl Debug;
    /// Test mode bit (must stay 0 in normal operation)
    pub test1, set_test1: 7;
    /// STOP bit: halts the clock counters while set
    pub stop, set_stop: 5;
    /// Test mode bit (must stay 0 in normal operation)
    pub testc, set_testc: 3;
}
from_register_u8!(Control1);

#[cfg(feature = "defmt")]
impl defmt::Format for Control1 {
    fn format(&self, f: defmt::Formatter) {
        if self.stop() {
            defmt::write!(f, "Control1(STOP)");
        } else {
            defmt::write!(f, "Control1(running)");
        }
    }
}

bitfield! {
    /// Control register 2: interrupt enables and event flags.
    ///
    /// TF and AF are set by the hardware when the timer expires or the
    /// alarm matches; they stay set until cleared by the host.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Control2(u8);
    impl Debug;
    /// TI/TP: timer interrupt generates repeated pulses instead of a level
    pub timer_interrupt_pulse, set_timer_interrupt_pulse: 4;
    /// AF: alarm flag, set by hardware on alarm match
    pub alarm_flag, set_alarm_flag: 3;
    /// TF: timer flag, set by hardware when the countdown reaches zero
    pub timer_flag, set_timer_flag: 2;
    /// AIE: alarm interrupt enable
    pub alarm_interrupt_enable, set_alarm_interrupt_enable: 1;
    /// TIE: timer interrupt enable
    pub timer_interrupt_enable, set_timer_interrupt_enable: 0;
}
from_register_u8!(Control2);

#[cfg(feature = "defmt")]
impl defmt::Format for Control2 {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Control2(");
        let mut first = true;
        if self.timer_interrupt_pulse() {
            defmt::write!(f, "TI/TP");
            first = false;
        }
        if self.alarm_flag() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "AF");
            first = false;
        }
        if self.timer_flag() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "TF");
            first = false;
        }
        if self.alarm_interrupt_enable() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "AIE");
            first = false;
        }
        if self.timer_interrupt_enable() {
            if !first {
                defmt::write!(f, ", ");
            }
            defmt::write!(f, "TIE");
            first = false;
        }
        if first {
            defmt::write!(f, "clear");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Seconds register (0-59) with BCD encoding and voltage-low flag.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Seconds(u8);
    impl Debug;
    /// VL: voltage-low flag, set when the oscillator stopped and the
    /// clock integrity is no longer guaranteed
    pub voltage_low, set_voltage_low: 7;
    /// Tens place of seconds (0-5)
    pub ten_seconds, set_ten_seconds: 6, 4;
    /// Ones place of seconds (0-9)
    pub seconds, set_seconds: 3, 0;
}
from_register_u8!(Seconds);

#[cfg(feature = "defmt")]
impl defmt::Format for Seconds {
    fn format(&self, f: defmt::Formatter) {
        let seconds = 10 * self.ten_seconds() + self.seconds();
        defmt::write!(f, "Seconds({}s", seconds);
        if self.voltage_low() {
            defmt::write!(f, ", VL");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Minutes register (0-59) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Minutes(u8);
    impl Debug;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(Minutes);

#[cfg(feature = "defmt")]
impl defmt::Format for Minutes {
    fn format(&self, f: defmt::Formatter) {
        let minutes = 10 * self.ten_minutes() + self.minutes();
        defmt::write!(f, "Minutes({}m)", minutes);
    }
}

bitfield! {
    /// Hours register (0-23) with BCD encoding.
    ///
    /// The RTC-8564 only runs in 24-hour mode.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Hours(u8);
    impl Debug;
    /// Tens place of hours (0-2)
    pub ten_hours, set_ten_hours: 5, 4;
    /// Ones place of hours (0-9)
    pub hours, set_hours: 3, 0;
}
from_register_u8!(Hours);

#[cfg(feature = "defmt")]
impl defmt::Format for Hours {
    fn format(&self, f: defmt::Formatter) {
        let hours = 10 * self.ten_hours() + self.hours();
        defmt::write!(f, "Hours({}h)", hours);
    }
}

bitfield! {
    /// Days register (1-31) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Days(u8);
    impl Debug;
    /// Tens place of the day of month (0-3)
    pub ten_days, set_ten_days: 5, 4;
    /// Ones place of the day of month (0-9)
    pub days, set_days: 3, 0;
}
from_register_u8!(Days);

#[cfg(feature = "defmt")]
impl defmt::Format for Days {
    fn format(&self, f: defmt::Formatter) {
        let days = 10 * self.ten_days() + self.days();
        defmt::write!(f, "Days({})", days);
    }
}

bitfield! {
    /// Weekdays register (0-6, 0 = Sunday).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Weekdays(u8);
    impl Debug;
    /// Day of week (0-6)
    pub weekday, set_weekday: 2, 0;
}
from_register_u8!(Weekdays);

#[cfg(feature = "defmt")]
impl defmt::Format for Weekdays {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Weekdays({})", self.weekday());
    }
}

bitfield! {
    /// Month register (1-12) with century flag and BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Month(u8);
    impl Debug;
    /// Century flag (1 = year 2100-2199)
    pub century, set_century: 7;
    /// Tens place of month (0-1)
    pub ten_month, set_ten_month: 4, 4;
    /// Ones place of month (0-9)
    pub month, set_month: 3, 0;
}
from_register_u8!(Month);

#[cfg(feature = "defmt")]
impl defmt::Format for Month {
    fn format(&self, f: defmt::Formatter) {
        let month = 10 * self.ten_month() + self.month();
        defmt::write!(f, "Month({}", month);
        if self.century() {
            defmt::write!(f, ", century");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Years register (0-99) with BCD encoding.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Years(u8);
    impl Debug;
    /// Tens place of year (0-9)
    pub ten_years, set_ten_years: 7, 4;
    /// Ones place of year (0-9)
    pub years, set_years: 3, 0;
}
from_register_u8!(Years);

#[cfg(feature = "defmt")]
impl defmt::Format for Years {
    fn format(&self, f: defmt::Formatter) {
        let years = 10 * self.ten_years() + self.years();
        defmt::write!(f, "Years({})", years);
    }
}

// Alarm register types. Each carries an AE bit in bit 7; while AE is set
// the field always matches and takes no part in the comparison.

bitfield! {
    /// Minute alarm register with AE (field disable) bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct MinuteAlarm(u8);
    impl Debug;
    /// AE bit: while set, the minute field is excluded from the match
    pub disabled, set_disabled: 7;
    /// Tens place of minutes (0-5)
    pub ten_minutes, set_ten_minutes: 6, 4;
    /// Ones place of minutes (0-9)
    pub minutes, set_minutes: 3, 0;
}
from_register_u8!(MinuteAlarm);

#[cfg(feature = "defmt")]
impl defmt::Format for MinuteAlarm {
    fn format(&self, f: defmt::Formatter) {
        let minutes = 10 * self.ten_minutes() + self.minutes();
        defmt::write!(f, "MinuteAlarm({}m", minutes);
        if self.disabled() {
            defmt::write!(f, ", disabled");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Hour alarm register with AE (field disable) bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct HourAlarm(u8);
    impl Debug;
    /// AE bit: while set, the hour field is excluded from the match
    pub disabled, set_disabled: 7;
    /// Tens place of hours (0-2)
    pub ten_hours, set_ten_hours: 5, 4;
    /// Ones place of hours (0-9)
    pub hours, set_hours: 3, 0;
}
from_register_u8!(HourAlarm);

#[cfg(feature = "defmt")]
impl defmt::Format for HourAlarm {
    fn format(&self, f: defmt::Formatter) {
        let hours = 10 * self.ten_hours() + self.hours();
        defmt::write!(f, "HourAlarm({}h", hours);
        if self.disabled() {
            defmt::write!(f, ", disabled");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Day alarm register with AE (field disable) bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct DayAlarm(u8);
    impl Debug;
    /// AE bit: while set, the day field is excluded from the match
    pub disabled, set_disabled: 7;
    /// Tens place of the day of month (0-3)
    pub ten_days, set_ten_days: 5, 4;
    /// Ones place of the day of month (0-9)
    pub days, set_days: 3, 0;
}
from_register_u8!(DayAlarm);

#[cfg(feature = "defmt")]
impl defmt::Format for DayAlarm {
    fn format(&self, f: defmt::Formatter) {
        let days = 10 * self.ten_days() + self.days();
        defmt::write!(f, "DayAlarm({}", days);
        if self.disabled() {
            defmt::write!(f, ", disabled");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Weekday alarm register with AE (field disable) bit.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct WeekdayAlarm(u8);
    impl Debug;
    /// AE bit: while set, the weekday field is excluded from the match
    pub disabled, set_disabled: 7;
    /// Day of week (0-6, 0 = Sunday)
    pub weekday, set_weekday: 2, 0;
}
from_register_u8!(WeekdayAlarm);

#[cfg(feature = "defmt")]
impl defmt::Format for WeekdayAlarm {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "WeekdayAlarm({}", self.weekday());
        if self.disabled() {
            defmt::write!(f, ", disabled");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// CLKOUT frequency register.
    ///
    /// The frequency code is retained even while the output is disabled;
    /// FE only gates the pin function.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct ClkoutControl(u8);
    impl Debug;
    /// FE bit: enables the CLKOUT pin function
    pub enabled, set_enabled: 7;
    /// Output frequency selection
    pub from into ClkoutFrequency, frequency, set_frequency: 1, 0;
}
from_register_u8!(ClkoutControl);

#[cfg(feature = "defmt")]
impl defmt::Format for ClkoutControl {
    fn format(&self, f: defmt::Formatter) {
        match self.frequency() {
            ClkoutFrequency::Hz32768 => defmt::write!(f, "ClkoutControl(32768 Hz"),
            ClkoutFrequency::Hz1024 => defmt::write!(f, "ClkoutControl(1024 Hz"),
            ClkoutFrequency::Hz32 => defmt::write!(f, "ClkoutControl(32 Hz"),
            ClkoutFrequency::Hz1 => defmt::write!(f, "ClkoutControl(1 Hz"),
        }
        if self.enabled() {
            defmt::write!(f, ", enabled");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Timer control register.
    ///
    /// Writing TE starts the countdown from the value staged in the timer
    /// register; clearing it stops the timer.
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct TimerControl(u8);
    impl Debug;
    /// TE bit: enables the countdown timer
    pub enabled, set_enabled: 7;
    /// Countdown clock source selection
    pub from into TimerClock, clock, set_clock: 1, 0;
}
from_register_u8!(TimerControl);

#[cfg(feature = "defmt")]
impl defmt::Format for TimerControl {
    fn format(&self, f: defmt::Formatter) {
        match self.clock() {
            TimerClock::Hz4096 => defmt::write!(f, "TimerControl(4096 Hz"),
            TimerClock::Hz64 => defmt::write!(f, "TimerControl(64 Hz"),
            TimerClock::Hz1 => defmt::write!(f, "TimerControl(1 Hz"),
            TimerClock::PerMinute => defmt::write!(f, "TimerControl(1/60 Hz"),
        }
        if self.enabled() {
            defmt::write!(f, ", enabled");
        }
        defmt::write!(f, ")");
    }
}

bitfield! {
    /// Timer countdown value register (0-255).
    #[derive(Clone, Copy, Default, PartialEq)]
    pub struct Timer(u8);
    impl Debug;
    /// Countdown value
    pub value, set_value: 7, 0;
}
from_register_u8!(Timer);

#[cfg(feature = "defmt")]
impl defmt::Format for Timer {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Timer({})", self.value());
    }
}
