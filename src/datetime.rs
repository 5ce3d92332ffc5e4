//! `DateTime` conversion and register utilities for the RTC-8564.
//!
//! This module provides the internal representation and conversion logic for
//! the RTC-8564's seven date and time registers. It enables safe, validated
//! conversion between the chip's BCD-encoded registers and chrono's
//! `NaiveDateTime`.
//!
//! # Register Model
//!
//! The RTC-8564 stores date and time in 7 consecutive registers starting at
//! 0x02: Seconds, Minutes, Hours, Days, Weekdays, Month/Century, Years. The
//! century flag lives in bit 7 of the month register and extends the year
//! range to 2000-2199; the voltage-low flag lives in bit 7 of the seconds
//! register and is handled by the driver before decoding.
//!
//! # Error Handling
//!
//! Conversion errors are reported via [`RTC8564DateTimeError`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

use crate::{Days, Hours, Minutes, Month, Seconds, Weekdays, Years};

/// Internal representation of the RTC-8564 date and time.
///
/// This struct models the 7 date/time registers of the RTC-8564, using
/// strongly-typed bitfield wrappers for each field. It is used for
/// register-level I/O and conversion to/from chrono's `NaiveDateTime`.
///
/// Values are always validated and encoded/decoded as BCD.
#[derive(Debug, Copy, Clone, PartialEq)]
pub(crate) struct RTC8564DateTime {
    seconds: Seconds,
    minutes: Minutes,
    hours: Hours,
    days: Days,
    weekdays: Weekdays,
    month: Month,
    years: Years,
}

impl RTC8564DateTime {
    /// Helper function to convert a number to BCD format with validation
    pub(crate) fn make_bcd(value: u32, max_value: u32) -> Result<(u8, u8), RTC8564DateTimeError> {
        if value > max_value {
            return Err(RTC8564DateTimeError::InvalidDateTime);
        }
        let ones = u8::try_from(value % 10).map_err(|_| RTC8564DateTimeError::InvalidDateTime)?;
        let tens = u8::try_from(value / 10).map_err(|_| RTC8564DateTimeError::InvalidDateTime)?;
        Ok((ones, tens))
    }

    fn convert_seconds(seconds: u32) -> Result<Seconds, RTC8564DateTimeError> {
        let (ones, tens) = Self::make_bcd(seconds, 59)?;
        let mut value = Seconds::default();
        value.set_seconds(ones);
        value.set_ten_seconds(tens);
        Ok(value)
    }

    fn convert_minutes(minutes: u32) -> Result<Minutes, RTC8564DateTimeError> {
        let (ones, tens) = Self::make_bcd(minutes, 59)?;
        let mut value = Minutes::default();
        value.set_minutes(ones);
        value.set_ten_minutes(tens);
        Ok(value)
    }

    fn convert_hours(hours: u32) -> Result<Hours, RTC8564DateTimeError> {
        let (ones, tens) = Self::make_bcd(hours, 23)?;
        let mut value = Hours::default();
        value.set_hours(ones);
        value.set_ten_hours(tens);
        Ok(value)
    }

    fn convert_days(days: u32) -> Result<Days, RTC8564DateTimeError> {
        let (ones, tens) = Self::make_bcd(days, 31)?;
        let mut value = Days::default();
        value.set_days(ones);
        value.set_ten_days(tens);
        Ok(value)
    }

    fn convert_weekday(weekday: u32) -> Result<Weekdays, RTC8564DateTimeError> {
        if weekday > 6 {
            return Err(RTC8564DateTimeError::InvalidDateTime);
        }
        let mut value = Weekdays::default();
        value.set_weekday(
            u8::try_from(weekday).map_err(|_| RTC8564DateTimeError::InvalidDateTime)?,
        );
        Ok(value)
    }

    fn convert_month(month: u32) -> Result<Month, RTC8564DateTimeError> {
        let (ones, tens) = Self::make_bcd(month, 12)?;
        let mut value = Month::default();
        value.set_month(ones);
        value.set_ten_month(tens);
        Ok(value)
    }

    pub(crate) fn convert_year(year: i32) -> Result<(Years, bool), RTC8564DateTimeError> {
        if year > 2199 {
            error!("Year {} is too late! must be before 2200", year);
            return Err(RTC8564DateTimeError::YearNotBefore2200);
        }
        if year < 2000 {
            error!("Year {} is too early! must be greater than 1999", year);
            return Err(RTC8564DateTimeError::YearNotAfter1999);
        }

        let mut year_offset =
            u8::try_from(year - 2000).map_err(|_| RTC8564DateTimeError::InvalidDateTime)?;
        let century = if year_offset > 99 {
            year_offset = year_offset.wrapping_sub(100);
            true
        } else {
            false
        };

        let ones = year_offset % 10;
        let tens = year_offset / 10;

        let mut value = Years::default();
        value.set_years(ones);
        value.set_ten_years(tens);
        Ok((value, century))
    }

    /// Reports the voltage-low flag carried in the seconds register.
    ///
    /// While set, the oscillator stopped at some point and the register
    /// contents are not trustworthy.
    pub(crate) fn voltage_low(&self) -> bool {
        self.seconds.voltage_low()
    }

    pub(crate) fn from_datetime(datetime: &NaiveDateTime) -> Result<Self, RTC8564DateTimeError> {
        let seconds = Self::convert_seconds(datetime.second())?;
        let minutes = Self::convert_minutes(datetime.minute())?;
        let hours = Self::convert_hours(datetime.hour())?;
        let days = Self::convert_days(datetime.day())?;
        let weekdays = Self::convert_weekday(datetime.weekday().num_days_from_sunday())?;
        let mut month = Self::convert_month(datetime.month())?;
        let (years, century) = Self::convert_year(datetime.year())?;

        if century {
            month.set_century(true);
        }

        let raw = RTC8564DateTime {
            seconds,
            minutes,
            hours,
            days,
            weekdays,
            month,
            years,
        };

        debug!("raw={:?}", raw);

        Ok(raw)
    }

    pub(crate) fn into_datetime(self) -> Result<NaiveDateTime, RTC8564DateTimeError> {
        // The bitfield getters mask out the flag bits (VL, century) and any
        // unimplemented high bits of each register.
        let seconds =
            10 * u32::from(self.seconds.ten_seconds()) + u32::from(self.seconds.seconds());
        let minutes =
            10 * u32::from(self.minutes.ten_minutes()) + u32::from(self.minutes.minutes());
        let hours = 10 * u32::from(self.hours.ten_hours()) + u32::from(self.hours.hours());

        let year_offset = 10 * u32::from(self.years.ten_years()) + u32::from(self.years.years());
        let century_offset = if self.month.century() { 100 } else { 0 };
        let year = 2000_i32
            + i32::try_from(year_offset + century_offset)
                .map_err(|_| RTC8564DateTimeError::InvalidDateTime)?;
        let month = 10 * u32::from(self.month.ten_month()) + u32::from(self.month.month());
        let days = 10 * u32::from(self.days.ten_days()) + u32::from(self.days.days());

        // Validate the date components before creating NaiveDateTime
        NaiveDate::from_ymd_opt(year, month, days)
            .and_then(|d| d.and_hms_opt(hours, minutes, seconds))
            .ok_or(RTC8564DateTimeError::InvalidDateTime)
    }
}

impl From<[u8; 7]> for RTC8564DateTime {
    fn from(data: [u8; 7]) -> Self {
        RTC8564DateTime {
            seconds: Seconds(data[0]),
            minutes: Minutes(data[1]),
            hours: Hours(data[2]),
            days: Days(data[3]),
            weekdays: Weekdays(data[4]),
            month: Month(data[5]),
            years: Years(data[6]),
        }
    }
}

impl From<&RTC8564DateTime> for [u8; 7] {
    fn from(dt: &RTC8564DateTime) -> [u8; 7] {
        [
            dt.seconds.0,
            dt.minutes.0,
            dt.hours.0,
            dt.days.0,
            dt.weekdays.0,
            dt.month.0,
            dt.years.0,
        ]
    }
}

#[derive(Debug, PartialEq)]
/// Errors that can occur during RTC-8564 date/time conversion or validation.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RTC8564DateTimeError {
    /// The provided or decoded date/time is invalid (e.g., out of range, not representable)
    InvalidDateTime,
    /// The year is not before 2200 (the RTC-8564 only supports years < 2200)
    YearNotBefore2200,
    /// The year is not after 1999 (the RTC-8564 only supports years >= 2000)
    YearNotAfter1999,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_make_bcd_valid() {
        assert_eq!(RTC8564DateTime::make_bcd(0, 59).unwrap(), (0, 0));
        assert_eq!(RTC8564DateTime::make_bcd(9, 59).unwrap(), (9, 0));
        assert_eq!(RTC8564DateTime::make_bcd(10, 59).unwrap(), (0, 1));
        assert_eq!(RTC8564DateTime::make_bcd(45, 59).unwrap(), (5, 4));
        assert_eq!(RTC8564DateTime::make_bcd(59, 59).unwrap(), (9, 5));
        assert_eq!(RTC8564DateTime::make_bcd(99, 99).unwrap(), (9, 9));
    }

    #[test]
    fn test_make_bcd_invalid() {
        // Values exceeding max_value
        assert!(matches!(
            RTC8564DateTime::make_bcd(60, 59),
            Err(RTC8564DateTimeError::InvalidDateTime)
        ));
        assert!(matches!(
            RTC8564DateTime::make_bcd(99, 59),
            Err(RTC8564DateTimeError::InvalidDateTime)
        ));
        assert!(matches!(
            RTC8564DateTime::make_bcd(32, 31),
            Err(RTC8564DateTimeError::InvalidDateTime)
        ));
        assert!(matches!(
            RTC8564DateTime::make_bcd(13, 12),
            Err(RTC8564DateTimeError::InvalidDateTime)
        ));
    }

    #[test]
    fn test_from_datetime_and_into_datetime_roundtrip() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        let raw = RTC8564DateTime::from_datetime(&dt).unwrap();
        let dt2 = raw.into_datetime().unwrap();
        core::assert_eq!(dt, dt2);
    }

    #[test]
    fn test_from_datetime_register_encoding() {
        // 2024-06-15 is a Saturday
        let dt = NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let raw = RTC8564DateTime::from_datetime(&dt).unwrap();
        let arr: [u8; 7] = (&raw).into();
        assert_eq!(arr, [0x00, 0x00, 0x00, 0x15, 0x06, 0x06, 0x24]);
    }

    #[test]
    fn test_from_datetime_century_flag() {
        let dt = NaiveDate::from_ymd_opt(2099, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let raw = RTC8564DateTime::from_datetime(&dt).unwrap();
        // The month register should have the century bit set only for years >= 2100
        assert_eq!(raw.month.century(), false);
        let dt2 = NaiveDate::from_ymd_opt(2100, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let raw2 = RTC8564DateTime::from_datetime(&dt2).unwrap();
        assert_eq!(raw2.month.century(), true);
    }

    #[test]
    fn test_from_datetime_year_too_early() {
        let dt = NaiveDate::from_ymd_opt(1999, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let err = RTC8564DateTime::from_datetime(&dt).unwrap_err();
        assert!(matches!(err, RTC8564DateTimeError::YearNotAfter1999));
    }

    #[test]
    fn test_from_datetime_year_too_late() {
        let dt = NaiveDate::from_ymd_opt(2200, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let err = RTC8564DateTime::from_datetime(&dt).unwrap_err();
        assert!(matches!(err, RTC8564DateTimeError::YearNotBefore2200));
    }

    #[test]
    fn test_from_and_into_bcd_array() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();
        let raw = RTC8564DateTime::from_datetime(&dt).unwrap();
        let arr: [u8; 7] = (&raw).into();
        let raw2 = RTC8564DateTime::from(arr);
        let dt2 = raw2.into_datetime().unwrap();
        core::assert_eq!(dt, dt2);
    }

    #[test]
    fn test_invalid_bcd_to_datetime() {
        // Invalid BCD values for month (0x13 = 19 in decimal)
        let arr = [0x00, 0x00, 0x00, 0x01, 0x01, 0x13, 0x24];
        let raw = RTC8564DateTime::from(arr);
        let result = raw.into_datetime();
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            RTC8564DateTimeError::InvalidDateTime
        ));
    }

    #[test]
    fn test_flag_bits_masked_on_decode() {
        // Century bit set in the month byte adds 100 years and is not
        // decoded as part of the month value.
        let arr = [0x00, 0x00, 0x00, 0x15, 0x06, 0x86, 0x24];
        let raw = RTC8564DateTime::from(arr);
        let dt = raw.into_datetime().unwrap();
        assert_eq!(dt.year(), 2124);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 15);
    }

    #[test]
    fn test_voltage_low_flag() {
        let raw = RTC8564DateTime::from([0x80, 0x00, 0x00, 0x01, 0x01, 0x01, 0x24]);
        assert!(raw.voltage_low());

        let raw = RTC8564DateTime::from([0x30, 0x00, 0x00, 0x01, 0x01, 0x01, 0x24]);
        assert!(!raw.voltage_low());
    }

    #[test]
    fn test_valid_edge_cases() {
        // Maximum valid values
        let dt = NaiveDate::from_ymd_opt(2199, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let result = RTC8564DateTime::from_datetime(&dt);
        assert!(result.is_ok());

        // Minimum valid values
        let dt = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let result = RTC8564DateTime::from_datetime(&dt);
        assert!(result.is_ok());
    }

    #[test]
    fn test_convert_functions_coverage() {
        assert!(RTC8564DateTime::convert_seconds(60).is_err());
        assert!(RTC8564DateTime::convert_seconds(0).is_ok());
        assert!(RTC8564DateTime::convert_seconds(59).is_ok());

        assert!(RTC8564DateTime::convert_minutes(60).is_err());
        assert!(RTC8564DateTime::convert_minutes(0).is_ok());
        assert!(RTC8564DateTime::convert_minutes(59).is_ok());

        assert!(RTC8564DateTime::convert_hours(24).is_err());
        assert!(RTC8564DateTime::convert_hours(0).is_ok());
        assert!(RTC8564DateTime::convert_hours(23).is_ok());

        assert!(RTC8564DateTime::convert_weekday(7).is_err());
        assert!(RTC8564DateTime::convert_weekday(0).is_ok());
        assert!(RTC8564DateTime::convert_weekday(6).is_ok());

        assert!(RTC8564DateTime::convert_days(32).is_err());
        assert!(RTC8564DateTime::convert_days(1).is_ok());
        assert!(RTC8564DateTime::convert_days(31).is_ok());

        assert!(RTC8564DateTime::convert_month(13).is_err());
        assert!(RTC8564DateTime::convert_month(1).is_ok());
        assert!(RTC8564DateTime::convert_month(12).is_ok());
    }

    #[test]
    fn test_convert_year_comprehensive() {
        let (years_2000, century_2000) = RTC8564DateTime::convert_year(2000).unwrap();
        assert_eq!(years_2000.years(), 0);
        assert_eq!(years_2000.ten_years(), 0);
        assert!(!century_2000);

        let (years_2099, century_2099) = RTC8564DateTime::convert_year(2099).unwrap();
        assert_eq!(years_2099.years(), 9);
        assert_eq!(years_2099.ten_years(), 9);
        assert!(!century_2099);

        let (years_2100, century_2100) = RTC8564DateTime::convert_year(2100).unwrap();
        assert_eq!(years_2100.years(), 0);
        assert_eq!(years_2100.ten_years(), 0);
        assert!(century_2100);

        let (years_2199, century_2199) = RTC8564DateTime::convert_year(2199).unwrap();
        assert_eq!(years_2199.years(), 9);
        assert_eq!(years_2199.ten_years(), 9);
        assert!(century_2199);

        assert!(matches!(
            RTC8564DateTime::convert_year(1999),
            Err(RTC8564DateTimeError::YearNotAfter1999)
        ));
        assert!(matches!(
            RTC8564DateTime::convert_year(2200),
            Err(RTC8564DateTimeError::YearNotBefore2200)
        ));
    }

    #[test]
    fn test_invalid_bcd_values() {
        // Invalid seconds BCD (0x6A decodes to 70)
        let invalid_seconds = RTC8564DateTime::from([0x6A, 0x00, 0x00, 0x01, 0x01, 0x01, 0x00]);
        assert!(invalid_seconds.into_datetime().is_err());

        // Invalid minutes BCD
        let invalid_minutes = RTC8564DateTime::from([0x00, 0x6A, 0x00, 0x01, 0x01, 0x01, 0x00]);
        assert!(invalid_minutes.into_datetime().is_err());

        // 32nd day doesn't exist
        let invalid_days = RTC8564DateTime::from([0x00, 0x00, 0x00, 0x32, 0x01, 0x01, 0x00]);
        assert!(invalid_days.into_datetime().is_err());
    }

    #[test]
    fn test_leap_year_handling() {
        let leap_year_dt = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let raw = RTC8564DateTime::from_datetime(&leap_year_dt).unwrap();
        let converted_back = raw.into_datetime().unwrap();
        assert_eq!(leap_year_dt, converted_back);

        let non_leap_year_dt = NaiveDate::from_ymd_opt(2023, 2, 28)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let raw = RTC8564DateTime::from_datetime(&non_leap_year_dt).unwrap();
        let converted_back = raw.into_datetime().unwrap();
        assert_eq!(non_leap_year_dt, converted_back);
    }

    #[test]
    fn test_weekday_conversion() {
        let sunday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(); // Sunday
        let raw = RTC8564DateTime::from_datetime(&sunday.and_hms_opt(0, 0, 0).unwrap()).unwrap();
        assert_eq!(raw.weekdays.weekday(), 0); // Sunday = 0 on the RTC-8564

        let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(); // Monday
        let raw = RTC8564DateTime::from_datetime(&monday.and_hms_opt(0, 0, 0).unwrap()).unwrap();
        assert_eq!(raw.weekdays.weekday(), 1);

        let saturday = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap(); // Saturday
        let raw = RTC8564DateTime::from_datetime(&saturday.and_hms_opt(0, 0, 0).unwrap()).unwrap();
        assert_eq!(raw.weekdays.weekday(), 6);
    }

    #[test]
    fn test_century_boundary_years() {
        // Year 2099 -> 2100 transition
        let year_2099 = NaiveDate::from_ymd_opt(2099, 12, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let raw_2099 = RTC8564DateTime::from_datetime(&year_2099).unwrap();
        assert!(!raw_2099.month.century());

        let year_2100 = NaiveDate::from_ymd_opt(2100, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let raw_2100 = RTC8564DateTime::from_datetime(&year_2100).unwrap();
        assert!(raw_2100.month.century());

        // Roundtrip both sides of the boundary
        let converted_2099 = raw_2099.into_datetime().unwrap();
        assert_eq!(year_2099, converted_2099);

        let converted_2100 = raw_2100.into_datetime().unwrap();
        assert_eq!(year_2100, converted_2100);
    }

    #[test]
    fn test_error_debug_formatting() {
        extern crate alloc;

        let invalid_error = RTC8564DateTimeError::InvalidDateTime;
        let debug_str = alloc::format!("{:?}", invalid_error);
        assert!(debug_str.contains("InvalidDateTime"));

        let year_early_error = RTC8564DateTimeError::YearNotAfter1999;
        let debug_str = alloc::format!("{:?}", year_early_error);
        assert!(debug_str.contains("YearNotAfter1999"));

        let year_late_error = RTC8564DateTimeError::YearNotBefore2200;
        let debug_str = alloc::format!("{:?}", year_late_error);
        assert!(debug_str.contains("YearNotBefore2200"));
    }
}
