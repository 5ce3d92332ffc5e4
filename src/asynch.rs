//! Async implementation of the RTC-8564 driver.
//!
//! This module provides an async interface to the RTC-8564 device using
//! `embedded-hal-async` traits. It is only available when the `async`
//! feature is enabled.
//!
//! # Example
//!
//! ```rust,ignore
//! use rtc8564::asynch::RTC8564;
//! use rtc8564::DEFAULT_ADDRESS;
//!
//! let mut rtc = RTC8564::new(i2c, DEFAULT_ADDRESS);
//!
//! // Initialize asynchronously
//! rtc.init(Some(&datetime)).await?;
//!
//! // Get the current date/time asynchronously
//! let now = rtc.datetime().await?;
//! ```

use chrono::NaiveDateTime;
use embedded_hal_async::i2c::I2c;
use paste::paste;

use crate::{
    AlarmConfig, ClkoutControl, ClkoutFrequency, Control1, Control2, DayAlarm, Days, HourAlarm,
    Hours, MinuteAlarm, Minutes, Month, RTC8564Alarm, RTC8564DateTime, RTC8564Error, RegAddr,
    Seconds, Timer, TimerConfig, TimerControl, WeekdayAlarm, Weekdays, Years,
    DEFAULT_DATETIME_RAW,
};

/// RTC-8564 real-time clock async driver.
///
/// Mirrors the blocking [`crate::RTC8564`] driver over the
/// `embedded-hal-async` I²C traits; the register sequencing is identical.
pub struct RTC8564<I2C: I2c> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2c> RTC8564<I2C> {
    /// Creates a new RTC-8564 async driver instance.
    ///
    /// # Arguments
    /// * `i2c` - The async I²C bus implementation
    /// * `address` - The I²C address of the device (always [`crate::DEFAULT_ADDRESS`])
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Brings the device into a known state after power-up.
    ///
    /// See [`crate::RTC8564::init`] for the register sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the supplied date/time is out of range or a bus
    /// transfer fails.
    pub async fn init(
        &mut self,
        datetime: Option<&NaiveDateTime>,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut control1 = Control1::default();
        control1.set_stop(true);
        self.i2c
            .write(
                self.address,
                &[
                    RegAddr::Control1 as u8,
                    control1.into(),
                    Control2::default().into(),
                ],
            )
            .await?;

        match datetime {
            Some(datetime) => self.set_datetime(datetime).await?,
            None => {
                let raw = RTC8564DateTime::from(DEFAULT_DATETIME_RAW);
                self.set_control1(control1).await?;
                self.write_raw_datetime(&raw).await?;
                self.set_control1(Control1::default()).await?;
            }
        }

        self.set_alarm(&AlarmConfig::disabled(), false).await?;
        self.set_clkout_frequency(false, ClkoutFrequency::Hz32768)
            .await?;
        self.set_timer(&TimerConfig::disabled()).await?;
        Ok(())
    }

    async fn read_raw_datetime(&mut self) -> Result<RTC8564DateTime, RTC8564Error<I2C::Error>> {
        let mut data = [0; 7];
        self.i2c
            .write_read(self.address, &[RegAddr::Seconds as u8], &mut data)
            .await?;
        Ok(data.into())
    }

    async fn write_raw_datetime(
        &mut self,
        datetime: &RTC8564DateTime,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let data: [u8; 7] = datetime.into();
        self.i2c
            .write(
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
            )
            .await?;
        Ok(())
    }

    /// Gets the current date and time from the device.
    ///
    /// # Errors
    ///
    /// Returns [`RTC8564Error::LowVoltage`] without decoding when the VL
    /// flag is set, or an error if the registers hold an invalid date.
    pub async fn datetime(&mut self) -> Result<NaiveDateTime, RTC8564Error<I2C::Error>> {
        let raw = self.read_raw_datetime().await?;
        if raw.voltage_low() {
            return Err(RTC8564Error::LowVoltage);
        }
        raw.into_datetime().map_err(RTC8564Error::DateTime)
    }

    /// Sets the current date and time on the device.
    ///
    /// The clock is halted via the STOP bit, all seven time registers are
    /// written in a single transaction, and the clock is released again.
    ///
    /// # Errors
    ///
    /// Returns an error if the date/time is outside 2000-2199 or a bus
    /// transfer fails.
    pub async fn set_datetime(
        &mut self,
        datetime: &NaiveDateTime,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let raw = RTC8564DateTime::from_datetime(datetime).map_err(RTC8564Error::DateTime)?;
        let mut control1 = Control1::default();
        control1.set_stop(true);
        self.set_control1(control1).await?;
        self.write_raw_datetime(&raw).await?;
        self.set_control1(Control1::default()).await?;
        Ok(())
    }

    async fn write_raw_alarm(
        &mut self,
        alarm: &RTC8564Alarm,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let data: [u8; 4] = alarm.into();
        self.i2c
            .write(
                self.address,
                &[
                    RegAddr::MinuteAlarm as u8,
                    data[0],
                    data[1],
                    data[2],
                    data[3],
                ],
            )
            .await?;
        Ok(())
    }

    /// Programs the alarm registers.
    ///
    /// The alarm interrupt is disabled before the field registers are
    /// rewritten and only re-enabled (per `interrupt_enable`) afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration holds out-of-range values or a
    /// bus transfer fails.
    pub async fn set_alarm(
        &mut self,
        config: &AlarmConfig,
        interrupt_enable: bool,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let alarm = RTC8564Alarm::from_config(config).map_err(RTC8564Error::Alarm)?;
        let mut control2 = self.control2().await?;
        control2.set_alarm_interrupt_enable(false);
        self.set_control2(control2).await?;
        self.write_raw_alarm(&alarm).await?;
        control2.set_alarm_interrupt_enable(interrupt_enable);
        self.set_control2(control2).await?;
        Ok(())
    }

    /// Reads the alarm configuration back from the device.
    ///
    /// # Errors
    ///
    /// Returns an error if an enabled alarm register holds an invalid BCD
    /// value or a bus transfer fails.
    pub async fn alarm(&mut self) -> Result<AlarmConfig, RTC8564Error<I2C::Error>> {
        let mut data = [0; 4];
        self.i2c
            .write_read(self.address, &[RegAddr::MinuteAlarm as u8], &mut data)
            .await?;
        RTC8564Alarm::from(data)
            .to_config()
            .map_err(RTC8564Error::Alarm)
    }

    /// Reports whether the alarm flag (AF) is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub async fn alarm_flag(&mut self) -> Result<bool, RTC8564Error<I2C::Error>> {
        Ok(self.control2().await?.alarm_flag())
    }

    /// Clears the alarm flag (AF), leaving every other Control2 bit as the
    /// hardware currently reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub async fn clear_alarm_flag(&mut self) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut control2 = self.control2().await?;
        control2.set_alarm_flag(false);
        self.set_control2(control2).await?;
        Ok(())
    }

    /// Programs the countdown timer.
    ///
    /// See [`crate::RTC8564::set_timer`] for the register sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if a bus transfer fails.
    pub async fn set_timer(
        &mut self,
        config: &TimerConfig,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        self.set_timer_control(TimerControl::default()).await?;

        let mut control2 = self.control2().await?;
        control2.set_timer_interrupt_pulse(false);
        control2.set_timer_flag(false);
        control2.set_timer_interrupt_enable(false);
        self.set_control2(control2).await?;

        control2.set_timer_interrupt_pulse(config.repeat);
        control2.set_timer_interrupt_enable(config.interrupt_enable);
        self.set_control2(control2).await?;

        let mut counter = Timer::default();
        counter.set_value(config.counter);
        self.set_timer_value(counter).await?;

        if config.enabled {
            let mut timer_control = TimerControl::default();
            timer_control.set_clock(config.clock);
            timer_control.set_enabled(true);
            self.set_timer_control(timer_control).await?;
        }
        Ok(())
    }

    /// Reports whether the timer flag (TF) is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub async fn timer_flag(&mut self) -> Result<bool, RTC8564Error<I2C::Error>> {
        Ok(self.control2().await?.timer_flag())
    }

    /// Clears the timer flag (TF), leaving every other Control2 bit as the
    /// hardware currently reports it.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub async fn clear_timer_flag(&mut self) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut control2 = self.control2().await?;
        control2.set_timer_flag(false);
        self.set_control2(control2).await?;
        Ok(())
    }

    /// Configures the CLKOUT pin.
    ///
    /// # Errors
    ///
    /// Returns an error if the bus transfer fails.
    pub async fn set_clkout_frequency(
        &mut self,
        enabled: bool,
        frequency: ClkoutFrequency,
    ) -> Result<(), RTC8564Error<I2C::Error>> {
        let mut clkout = ClkoutControl::default();
        clkout.set_frequency(frequency);
        clkout.set_enabled(enabled);
        self.set_clkout_control(clkout).await?;
        Ok(())
    }
}

// Register access implementations
macro_rules! impl_register_access {
    ($(($name:ident, $regaddr:expr, $typ:ty)),+) => {
        impl<I2C: I2c> RTC8564<I2C> {
            $(
                paste! {
                    #[doc = concat!("Gets the value of the ", stringify!($name), " register.")]
                    pub async fn $name(&mut self) -> Result<$typ, RTC8564Error<I2C::Error>> {
                        let mut data = [0];
                        self.i2c
                            .write_read(self.address, &[$regaddr as u8], &mut data)
                            .await?;
                        Ok($typ(data[0]))
                    }

                    #[doc = concat!("Sets the value of the ", stringify!($name), " register.")]
                    pub async fn [<set_ $name>](&mut self, value: $typ) -> Result<(), RTC8564Error<I2C::Error>> {
                        self.i2c.write(
                            self.address,
                            &[$regaddr as u8, value.into()],
                        ).await?;
                        Ok(())
                    }
                }
            )+
        }
    }
}

impl_register_access!(
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
