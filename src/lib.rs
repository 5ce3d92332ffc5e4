//! A platform-agnostic driver for the Epson RTC-8564NB real-time clock.
//!
//! The RTC-8564 is an I²C real-time clock module with a calendar spanning
//! 2000-2199, a four-field match alarm, an 8-bit countdown timer, and a
//! programmable CLKOUT square-wave output. Its register map is shared with
//! the NXP PCF8563, so this driver works with that part as well. The device
//! answers at the fixed 7-bit address `0x51`.
//!
//! The driver is built on the `embedded-hal` 1.0 I²C traits; an async
//! variant using `embedded-hal-async` is available in the `asynch` module
//! behind the `async` feature.
//!
//! # Example
//!
//! ```rust,ignore
//! use rtc8564::{AlarmConfig, DEFAULT_ADDRESS, RTC8564};
//!
//! let mut rtc = RTC8564::new(i2c, DEFAULT_ADDRESS);
//!
//! // Start the clock from a known date/time
//! rtc.init(Some(&datetime))?;
//!
//! // Fire the alarm at minute 30 of every hour
//! let alarm = AlarmConfig {
//!     minute: Some(30),
//!     ..AlarmConfig::disabled()
//! };
//! rtc.set_alarm(&alarm, true)?;
//!
//! let now = rtc.datetime()?;
//! ```

#![no_std]

use chrono::NaiveDateTime;
use embedded_hal::i2c::I2c;

#[cfg(feature = "log")]
macro_rules! debug {
    ($($arg:tt)*) => { ::log::debug!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

#[cfg(feature = "log")]
macro_rules! error {
    ($($arg:tt)*) => { ::log::error!($($arg)*) };
}
#[cfg(not(feature = "log"))]
macro_rules! error {
    ($($arg:tt)*) => {{}};
}

mod alarm;
#[cfg(feature = "async")]
pub mod asynch;
mod datetime;
mod registers;

pub use alarm::{AlarmConfig, AlarmError};
pub use datetime::RTC8564DateTimeError;
pub use registers::*;

pub(crate) use alarm::RTC8564Alarm;
pub(crate) use datetime::RTC8564DateTime;

/// The fixed 7-bit I²C address of the RTC-8564.
pub const DEFAULT_ADDRESS: u8 = 0x51;

/// Factory default date/time programmed by [`RTC8564::init`] when no
/// date/time is supplied: 2013-01-01 (Tuesday) 00:00:00.
const DEFAULT_DATETIME_RAW: [u8; 7] = [0x00, 0x00, 0x00, 0x01, 0x02, 0x01, 0x13];

/// Error type for RTC-8564 operations.
#[derive(Debug, PartialEq)]
pub enum RTC8564Error<I2CE> {
    /// I²C bus error
    I2c(I2CE),
    /// Date/time conversion error
    DateTime(RTC8564DateTimeError),
    /// Alarm configuration error
    Alarm(AlarmError),
    /// The voltage-low flag is set: the oscillator stopped at some point and
    /// the clock contents are no longer trustworthy
    LowVoltage,
}

impl<I2CE> From<I2CE> for RTC8564Error<I2CE> {
    fn from(e: I2CE) -> Self {
        RTC8564Error::I2c(e)
    }
}

/// Countdown timer configuration.
///
/// The timer counts the 8-bit value down to zero at the selected clock rate
/// and raises the TF flag on expiry. With `repeat` the interrupt output
/// pulses and the countdown reloads; with `interrupt_enable` the TF flag
/// drives the INT pin.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerConfig {
    /// Start the countdown after the configuration is written
    pub enabled: bool,
    /// TI/TP: pulse the interrupt and reload instead of a one-shot level
    pub repeat: bool,
    /// Countdown clock source
    pub clock: TimerClock,
    /// Countdown start value
    pub counter: u8,
    /// TIE: drive the INT pin from the timer flag
    pub interrupt_enable: bool,
}

impl TimerConfig {
    /// Returns a configuration with the timer stopped and all timer
    /// interrupt sources off.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            repeat: false,
            clock: TimerClock::Hz4096,
            counter: 0,
            interrupt_enable: false,
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::disabled()
    }
}

// Generates get/set accessors for a single register
macro_rules! set_and_get_register {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        $(
            paste::paste! {
                #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                pub fn [< set_ $name >](&mut self, value: $typ) -> Result<(), RTC8564Error<I2C::Error>> {
                    self.i2c.write(
                        self.address,
                        &[$regaddr as u8, value.into()],
                        )?;
                    Ok(())
                }

                #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                pub fn $name(&mut self) -> Result<$typ, RTC8564Error<I2C::Error>> {
                    let mut data = [0];
                    self.i2c
                        .write_read(self.address, &[$regaddr as u8], &mut data)?;
                    Ok([<$typ>](data[0]))
                }
            }
        )+
    }
}

/// RTC-8564 real-time clock driver.
///
/// Owns the I²C bus handle it is constructed with; multiple devices on the
/// same bus are the caller's concern (via bus sharing at the HAL level).
pub struct RTC8564<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> RTC8564<I2C> {
    /// Creates a new RTC-8564 driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The I²C bus implementation
    /// * `address` - The I²C address of the device (always [`DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Brings the device into a known state after power-up.
    ///
    /// Halts the clock and clears all interrupt state, programs the supplied
    /// date/time (or the factory default 2013-01-01 00:00:00 when `None`),
    /// disables every alarm field, switches CLKOUT off, and stops the
    /// countdown timer.
    ///
    /// The host owns any crystal settling delay required before calling
    /// this.
    ///
    /// # Errors
    ///
    /// Returns an error if the supplied date/time is out of range or a bus
    /// transfer fails.
    pub fn init(
        &mut self,
        datetime: Option<&NaiveDateTime>,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut control1 = Control1::default();
        control1.set_stop(true);
        // Control1 and Control2 are adjacent, written in one transaction
        self.i2c.write(
            self.address,
            &[
                RegAddr::Control1 as u8,
                control1.into(),
                Control2::default().into(),
            ],
        )?;

        match datetime {
            Some(datetime) => self.set_datetime(datetime)?,
            None => {
                let raw = RTC8564DateTime::from(DEFAULT_DATETIME_RAW);
                self.set_control1(control1)?;
                self.write_raw_datetime(&raw)?;
                self.set_control1(Control1::default())?;
            }
        }

        self.set_alarm(&AlarmConfig::disabled(), false)?;
        self.set_clkout_frequency(false, ClkoutFrequency::Hz32768)?;
        self.set_timer(&TimerConfig::disabled())?;
        Ok(())
    }

    fn read_raw_datetime(&mut self) -> Result<RTC8564DateTime, RTC8564Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)?;
        Ok(data.into())
    }

    fn write_raw_datetime(
        &mut self,
        datetime: &RTC8564DateTime,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let data: [u8; 7] = datetime.into();
        self.i2c.write(
            self.address,
            &[
                RegAddr::Seconds as u8,
                data[0],
                data[1],
                data[2],
                data[3],
                data[4],
                data[5],
                data[6],
            ],
        )?;
        Ok(())
    }

    /// Gets the current date and time from the device.
    ///
    /// # Errors
    ///
    /// Returns [`RTC8564Error::LowVoltage`] without decoding when the VL
    /// flag is set, or an error if the registers hold an invalid date.
    pub fn datetime(&mut self) -> Result<NaiveDateTime, RTC8564Error<I2C::Error>> {
        let raw = self.read_raw_datetime()?;
        if raw.voltage_low() {
            error!("voltage-low flag set, clock contents not trustworthy");
            return Err(RTC8564Error::LowVoltage);
        }
        raw.into_datetime().map_err(RTC8564Error::DateTime)
    }

    /// Sets the current date and time on the device.
    ///
    /// The clock is halted via the STOP bit, all seven time registers are
    /// written in a single transaction, and the clock is released again, so
    /// the device never runs on a half-written time.
    ///
    /// # Errors
    ///
    /// Returns an error if the date/time is outside 2000-2199 or a bus
    /// transfer fails.
    pub fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let raw = RTC8564DateTime::from_datetime(datetime).map_err(RTC8564Error::DateTime)?;
        let mut control1 = Control1::default();
        control1.set_stop(true);
        self.set_control1(control1)?;
        self.write_raw_datetime(&raw)?;
        self.set_control1(Control1::default())?;
        Ok(())
    }

    fn write_raw_alarm(&mut self, alarm: &RTC8564Alarm) -> Result<(), RTC8564Error<I2C::Error>> {
        let data: [u8; 4] = alarm.into();
        self.i2c.write(
            self.address,
            &[
                RegAddr::MinuteAlarm as u8,
                data[0],
                data[1],
                data[2],
                data[3],
            ],
        )?;
        Ok(())
    }

    /// Programs the alarm registers.
    ///
    /// The alarm interrupt is disabled before the field registers are
    /// rewritten and only re-enabled (per `interrupt_enable`) afterwards, so
    /// a half-updated alarm can never fire.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds out-of-range values or a
    /// bus transfer fails.
    pub fn set_alarm(
        &mut self,
        config: &AlarmConfig,
        interrupt_enable: bool,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let alarm = RTC8564Alarm::from_config(config).map_err(RTC8564Error::Alarm)?;
        let mut control2 = self.control2()?;
        control2.set_alarm_interrupt_enable(false);
        self.set_control2(control2)?;
        self.write_raw_alarm(&alarm)?;
        control2.set_alarm_interrupt_enable(interrupt_enable);
        debug!("control2: {:?}", control2);
        self.set_control2(control2)?;
        Ok(())
    }

    /// Reads the alarm configuration back from the device.
    ///
    /// # Errors
    ///
    /// Returns an error if an enabled alarm register holds an invalid BCD
    /// value or a bus transfer fails.
    pub fn alarm(&mut self) -> Result<AlarmConfig, RTC8564Error<I2C::Error>> {
        let mut data = [0; 4];
        self.i2c
            .write_read(self.address, &[RegAddr::MinuteAlarm as u8], &mut data)?;
        RTC8564Alarm::from(data)
            .to_config()
            .map_err(RTC8564Error::Alarm)
    }

    /// Reports whether the alarm flag (AF) is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub fn alarm_flag(&mut self) -> Result<bool, RTC8564Error<I2C::Error>> {
        Ok(self.control2()?.alarm_flag())
    }

    /// Clears the alarm flag (AF), leaving every other Control2 bit as the
    /// hardware currently reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub fn clear_alarm_flag(&mut self) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut control2 = self.control2()?;
        control2.set_alarm_flag(false);
        self.set_control2(control2)?;
        Ok(())
    }

    /// Programs the countdown timer.
    ///
    /// The timer is stopped first and its interrupt state (TI/TP, TF, TIE)
    /// cleared, then the requested repeat/interrupt mode and counter value
    /// are staged, and only then, when `enabled`, is the timer started on
    /// the selected clock. Staging happens even for a disabled
    /// configuration, so a later enabling call always starts from the state
    /// written here.
    ///
    /// # Errors
    ///
    /// Returns an error if a bus transfer fails.
    pub fn set_timer(&mut self, config: &TimerConfig) -> Result<(), RTC8564Error<I2C::Error>> {
        self.set_timer_control(TimerControl::default())?;

        let mut control2 = self.control2()?;
        control2.set_timer_interrupt_pulse(false);
        control2.set_timer_flag(false);
        control2.set_timer_interrupt_enable(false);
        self.set_control2(control2)?;

        control2.set_timer_interrupt_pulse(config.repeat);
        control2.set_timer_interrupt_enable(config.interrupt_enable);
        debug!("control2: {:?}", control2);
        self.set_control2(control2)?;

        let mut counter = Timer::default();
        counter.set_value(config.counter);
        self.set_timer_value(counter)?;

        if config.enabled {
            let mut timer_control = TimerControl::default();
            timer_control.set_clock(config.clock);
            timer_control.set_enabled(true);
            self.set_timer_control(timer_control)?;
        }
        Ok(())
    }

    /// Reports whether the timer flag (TF) is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub fn timer_flag(&mut self) -> Result<bool, RTC8564Error<I2C::Error>> {
        Ok(self.control2()?.timer_flag())
    }

    /// Clears the timer flag (TF), leaving every other Control2 bit as the
    /// hardware currently reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub fn clear_timer_flag(&mut self) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut control2 = self.control2()?;
        control2.set_timer_flag(false);
        self.set_control2(control2)?;
        Ok(())
    }

    /// Configures the CLKOUT pin.
    ///
    /// The frequency code is written even while the output is disabled; FE
    /// only gates the pin function.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub fn set_clkout_frequency(
        &mut self,
        enabled: bool,
        frequency: ClkoutFrequency,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut clkout = ClkoutControl::default();
        clkout.set_frequency(frequency);
        clkout.set_enabled(enabled);
        self.set_clkout_control(clkout)?;
        Ok(())
    }

    set_and_get_register!(
        (control1, RegAddr::Control1, Control1),
        (control2, RegAddr::Control2, Control2),
        (second, RegAddr::Seconds, Seconds),
        (minute, RegAddr::Minutes, Minutes),
        (hour, RegAddr::Hours, Hours),
        (day, RegAddr::Days, Days),
        (weekday, RegAddr::Weekdays, Weekdays),
        (month, RegAddr::Months, Month),
        (year, RegAddr::Years, Years),
        (minute_alarm, RegAddr::MinuteAlarm, MinuteAlarm),
        (hour_alarm, RegAddr::HourAlarm, HourAlarm),
        (day_alarm, RegAddr::DayAlarm, DayAlarm),
        (weekday_alarm, RegAddr::WeekdayAlarm, WeekdayAlarm),
        (clkout_control, RegAddr::ClkoutControl, ClkoutControl),
        (timer_control, RegAddr::TimerControl, TimerControl),
        (timer_value, RegAddr::Timer, Timer)
    );
}
