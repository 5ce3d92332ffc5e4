//! Alarm configuration utilities for the RTC-8564.
//!
//! This module provides type-safe alarm configuration for the RTC-8564's
//! four alarm registers (minute, hour, day, weekday). Each field carries its
//! own AE bit in the register's top bit: while AE is set the chip excludes
//! that field from the match comparison, so any combination of fields can
//! participate in the alarm.
//!
//! Fields are expressed as `Option` values: `Some(v)` means the field takes
//! part in the match, `None` means the AE sentinel is written and the field
//! always matches.
//!
//! # Examples
//!
//! Fire at minute 30 of every hour:
//!
//! ```rust,ignore
//! let alarm = AlarmConfig {
//!     minute: Some(30),
//!     ..AlarmConfig::disabled()
//! };
//! rtc.set_alarm(&alarm, true)?;
//! ```

use crate::{DayAlarm, HourAlarm, MinuteAlarm, RTC8564DateTime, RTC8564DateTimeError, WeekdayAlarm};

/// Error type for alarm configuration operations.
#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmError {
    /// Invalid time component value
    InvalidTime(&'static str),
    /// Invalid day of month (must be 1-31)
    InvalidDayOfMonth,
    /// Invalid day of week (must be 0-6, 0 = Sunday)
    InvalidWeekday,
    /// `DateTime` conversion error
    DateTime(RTC8564DateTimeError),
}

impl From<RTC8564DateTimeError> for AlarmError {
    fn from(e: RTC8564DateTimeError) -> Self {
        AlarmError::DateTime(e)
    }
}

/// Alarm match configuration.
///
/// Each field is compared against the running clock independently; the alarm
/// flag is raised when every enabled field matches. A field set to `None` is
/// written as the AE sentinel and always matches.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmConfig {
    /// Minute to match (0-59), or `None` to ignore minutes
    pub minute: Option<u8>,
    /// Hour to match (0-23), or `None` to ignore hours
    pub hour: Option<u8>,
    /// Day of month to match (1-31), or `None` to ignore the day
    pub day: Option<u8>,
    /// Weekday to match (0-6, 0 = Sunday), or `None` to ignore the weekday
    pub weekday: Option<u8>,
}

impl AlarmConfig {
    /// Returns a configuration with every field disabled.
    ///
    /// Writing this configuration parks the alarm: no field participates in
    /// the comparison, so the alarm flag is never raised by the hardware.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            minute: None,
            hour: None,
            day: None,
            weekday: None,
        }
    }

    /// Validates the alarm configuration and returns any errors.
    ///
    /// # Errors
    ///
    /// Returns an error if any enabled field is out of its valid range.
    pub fn validate(&self) -> Result<(), AlarmError> {
        if let Some(minute) = self.minute {
            if minute > 59 {
                return Err(AlarmError::InvalidTime("minutes must be 0-59"));
            }
        }
        if let Some(hour) = self.hour {
            if hour > 23 {
                return Err(AlarmError::InvalidTime("hours must be 0-23"));
            }
        }
        if let Some(day) = self.day {
            if day == 0 || day > 31 {
                return Err(AlarmError::InvalidDayOfMonth);
            }
        }
        if let Some(weekday) = self.weekday {
            if weekday > 6 {
                return Err(AlarmError::InvalidWeekday);
            }
        }
        Ok(())
    }
}

/// Internal representation of the RTC-8564 alarm registers.
///
/// This struct models the 4 alarm registers, using strongly-typed bitfield
/// wrappers for each field.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct RTC8564Alarm {
    minute: MinuteAlarm,
    hour: HourAlarm,
    day: DayAlarm,
    weekday: WeekdayAlarm,
}

impl RTC8564Alarm {
    /// Creates an alarm register configuration from an `AlarmConfig`.
    ///
    /// Disabled fields encode as the bare AE sentinel (0x80); enabled fields
    /// encode their BCD value with AE clear.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration contains out-of-range values.
    pub(crate) fn from_config(config: &AlarmConfig) -> Result<Self, AlarmError> {
        config.validate()?;

        let minute = match config.minute {
            Some(value) => {
                let (ones, tens) = RTC8564DateTime::make_bcd(u32::from(value), 59)?;
                let mut reg = MinuteAlarm::default();
                reg.set_minutes(ones);
                reg.set_ten_minutes(tens);
                reg
            }
            None => {
                let mut reg = MinuteAlarm::default();
                reg.set_disabled(true);
                reg
            }
        };

        let hour = match config.hour {
            Some(value) => {
                let (ones, tens) = RTC8564DateTime::make_bcd(u32::from(value), 23)?;
                let mut reg = HourAlarm::default();
                reg.set_hours(ones);
                reg.set_ten_hours(tens);
                reg
            }
            None => {
                let mut reg = HourAlarm::default();
                reg.set_disabled(true);
                reg
            }
        };

        let day = match config.day {
            Some(value) => {
                let (ones, tens) = RTC8564DateTime::make_bcd(u32::from(value), 31)?;
                let mut reg = DayAlarm::default();
                reg.set_days(ones);
                reg.set_ten_days(tens);
                reg
            }
            None => {
                let mut reg = DayAlarm::default();
                reg.set_disabled(true);
                reg
            }
        };

        let weekday = match config.weekday {
            Some(value) => {
                let mut reg = WeekdayAlarm::default();
                reg.set_weekday(value);
                reg
            }
            None => {
                let mut reg = WeekdayAlarm::default();
                reg.set_disabled(true);
                reg
            }
        };

        Ok(Self {
            minute,
            hour,
            day,
            weekday,
        })
    }

    /// Decodes the alarm registers back into an `AlarmConfig`.
    ///
    /// A register with AE set decodes to `None`; the stale value bits the
    /// chip ignores are not reported.
    ///
    /// # Errors
    ///
    /// Returns an error if an enabled register holds an invalid BCD value.
    pub(crate) fn to_config(self) -> Result<AlarmConfig, AlarmError> {
        let minute = if self.minute.disabled() {
            None
        } else {
            let value = 10 * self.minute.ten_minutes() + self.minute.minutes();
            if self.minute.minutes() > 9 || value > 59 {
                return Err(AlarmError::InvalidTime("Invalid BCD minutes value"));
            }
            Some(value)
        };

        let hour = if self.hour.disabled() {
            None
        } else {
            let value = 10 * self.hour.ten_hours() + self.hour.hours();
            if self.hour.hours() > 9 || value > 23 {
                return Err(AlarmError::InvalidTime("Invalid BCD hours value"));
            }
            Some(value)
        };

        let day = if self.day.disabled() {
            None
        } else {
            let value = 10 * self.day.ten_days() + self.day.days();
            if self.day.days() > 9 {
                return Err(AlarmError::InvalidTime("Invalid BCD day value"));
            }
            if value == 0 || value > 31 {
                return Err(AlarmError::InvalidDayOfMonth);
            }
            Some(value)
        };

        let weekday = if self.weekday.disabled() {
            None
        } else {
            Some(self.weekday.weekday())
        };

        Ok(AlarmConfig {
            minute,
            hour,
            day,
            weekday,
        })
    }
}

impl From<[u8; 4]> for RTC8564Alarm {
    fn from(data: [u8; 4]) -> Self {
        RTC8564Alarm {
            minute: MinuteAlarm(data[0]),
            hour: HourAlarm(data[1]),
            day: DayAlarm(data[2]),
            weekday: WeekdayAlarm(data[3]),
        }
    }
}

impl From<&RTC8564Alarm> for [u8; 4] {
    fn from(alarm: &RTC8564Alarm) -> [u8; 4] {
        [
            alarm.minute.0,
            alarm.hour.0,
            alarm.day.0,
            alarm.weekday.0,
        ]
    }
}
