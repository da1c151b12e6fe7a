//! Coordinate-transform context: the date/time pair every field evaluation is made at, and the
//! rotations between the geographic, GSM and SM frames at that instant.
use crate::error::LgmError;
use crate::igrf::{DipoleCoefficients, IgrfDipole};
use crate::utils::constants::{DAYS_PER_JULIAN_CENTURY, J2000_JULIAN_DATE};
use crate::vector::Vector;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use nalgebra::{Matrix3, Vector3};

/// Packs the calendar date of `dt` as the integer `YYYYMMDD`.
pub fn date_to_date_long(dt: &NaiveDateTime) -> i64 {
    dt.year() as i64 * 10_000 + dt.month() as i64 * 100 + dt.day() as i64
}

/// Time of day of `dt` in fractional hours.
pub fn date_to_fp_hours(dt: &NaiveDateTime) -> f64 {
    let seconds = dt.second() as f64 + dt.nanosecond() as f64 * 1e-9;
    dt.hour() as f64 + dt.minute() as f64 / 60.0 + seconds / 3600.0
}

/// Unpacks a `YYYYMMDD` integer.
pub fn date_long_to_date(date: i64) -> Result<NaiveDate, LgmError> {
    if date < 0 {
        Err(LgmError::InvalidDate(date))?
    }
    let year = i32::try_from(date / 10_000).map_err(|_| LgmError::InvalidDate(date))?;
    let month = ((date / 100) % 100) as u32;
    let day = (date % 100) as u32;
    NaiveDate::from_ymd_opt(year, month, day).ok_or(LgmError::InvalidDate(date))
}

#[derive(Debug, Clone)]
pub struct CTrans {
    igrf: IgrfDipole,
    julian_date: f64,
    decimal_year: f64,
    sun_geo: Vector3<f64>,
    dipole: DipoleCoefficients,
    dipole_axis_geo: Vector3<f64>,
    geo_to_gsm: Matrix3<f64>,
    gsm_to_sm: Matrix3<f64>,
    tilt: f64,
}

impl CTrans {
    /// Creates a context set to the J2000 epoch.
    pub fn new() -> Result<CTrans, LgmError> {
        let igrf = IgrfDipole::load()?;
        let mut c = CTrans {
            dipole: igrf.at(2000.0)?,
            igrf,
            julian_date: 0.0,
            decimal_year: 0.0,
            sun_geo: Vector3::x(),
            dipole_axis_geo: Vector3::z(),
            geo_to_gsm: Matrix3::identity(),
            gsm_to_sm: Matrix3::identity(),
            tilt: 0.0,
        };
        c.set_coord_transforms(20000101, 12.0)?;
        Ok(c)
    }

    /// Resets the context to `date` (YYYYMMDD) at `utc` hours.
    ///
    /// # Errors
    /// Will return `Err` if `date` is not a calendar date, or if it lies outside the span of the
    /// IGRF coefficient table.
    pub fn set_coord_transforms(&mut self, date: i64, utc: f64) -> Result<(), LgmError> {
        let day = date_long_to_date(date)?;
        let j2000_midnight =
            NaiveDate::from_ymd_opt(2000, 1, 1).ok_or(LgmError::InvalidDate(date))?;
        let julian_date =
            J2000_JULIAN_DATE - 0.5 + (day - j2000_midnight).num_days() as f64 + utc / 24.0;

        let days_in_year = if NaiveDate::from_ymd_opt(day.year(), 2, 29).is_some() {
            366.0
        } else {
            365.0
        };
        let decimal_year =
            day.year() as f64 + (day.ordinal0() as f64 + utc / 24.0) / days_in_year;
        let dipole = self.igrf.at(decimal_year)?;

        // Low-precision solar coordinates from the Astronomical Almanac, good to ~0.01 degrees
        let n = julian_date - J2000_JULIAN_DATE;
        let centuries = n / DAYS_PER_JULIAN_CENTURY;
        let gmst = (280.46061837 + 360.98564736629 * n + 0.000387933 * centuries * centuries)
            .rem_euclid(360.0)
            .to_radians();
        let mean_longitude = (280.460 + 0.9856474 * n).rem_euclid(360.0);
        let mean_anomaly = (357.528 + 0.9856003 * n).rem_euclid(360.0).to_radians();
        let ecliptic_longitude = (mean_longitude
            + 1.915 * mean_anomaly.sin()
            + 0.020 * (2.0 * mean_anomaly).sin())
        .to_radians();
        let obliquity = (23.439 - 0.0000004 * n).to_radians();
        let sun_gei = Vector3::new(
            ecliptic_longitude.cos(),
            obliquity.cos() * ecliptic_longitude.sin(),
            obliquity.sin() * ecliptic_longitude.sin(),
        );
        #[rustfmt::skip]
        let gei_to_geo = Matrix3::new(
            gmst.cos(), gmst.sin(), 0.0,
            -gmst.sin(), gmst.cos(), 0.0,
            0.0, 0.0, 1.0,
        );
        let sun_geo = (gei_to_geo * sun_gei).normalize();

        // North geomagnetic pole; the dipole moment points the other way
        let dipole_axis_geo = -Vector3::new(dipole.g11, dipole.h11, dipole.g10) / dipole.b0();

        let y_gsm = dipole_axis_geo.cross(&sun_geo).normalize();
        let z_gsm = sun_geo.cross(&y_gsm);
        let geo_to_gsm =
            Matrix3::from_rows(&[sun_geo.transpose(), y_gsm.transpose(), z_gsm.transpose()]);

        let tilt = dipole_axis_geo.dot(&sun_geo).atan2(dipole_axis_geo.dot(&z_gsm));
        let (sin_tilt, cos_tilt) = tilt.sin_cos();
        #[rustfmt::skip]
        let gsm_to_sm = Matrix3::new(
            cos_tilt, 0.0, -sin_tilt,
            0.0, 1.0, 0.0,
            sin_tilt, 0.0, cos_tilt,
        );

        log::debug!(
            "coordinate transforms set to {date} {utc:.6}h (tilt {:.3} deg)",
            tilt.to_degrees()
        );

        self.julian_date = julian_date;
        self.decimal_year = decimal_year;
        self.sun_geo = sun_geo;
        self.dipole = dipole;
        self.dipole_axis_geo = dipole_axis_geo;
        self.geo_to_gsm = geo_to_gsm;
        self.gsm_to_sm = gsm_to_sm;
        self.tilt = tilt;
        Ok(())
    }

    /// Same as [`CTrans::set_coord_transforms`] with the pair taken from `dt`.
    pub fn set_datetime(&mut self, dt: &NaiveDateTime) -> Result<(), LgmError> {
        self.set_coord_transforms(date_to_date_long(dt), date_to_fp_hours(dt))
    }

    pub fn julian_date(&self) -> f64 {
        self.julian_date
    }

    pub fn decimal_year(&self) -> f64 {
        self.decimal_year
    }

    /// Dipole tilt angle in radians, positive when the northern magnetic pole leans sunward
    pub fn dipole_tilt(&self) -> f64 {
        self.tilt
    }

    /// Dipole coefficients in effect
    pub fn dipole(&self) -> DipoleCoefficients {
        self.dipole
    }

    /// Unit vector towards the north geomagnetic pole, in GSM
    pub fn dipole_axis_gsm(&self) -> Vector {
        (self.geo_to_gsm * self.dipole_axis_geo).into()
    }

    pub fn sun_geo(&self) -> Vector {
        self.sun_geo.into()
    }

    pub fn geo_to_gsm(&self, v: &Vector) -> Vector {
        (self.geo_to_gsm * Vector3::from(*v)).into()
    }

    pub fn gsm_to_geo(&self, v: &Vector) -> Vector {
        (self.geo_to_gsm.transpose() * Vector3::from(*v)).into()
    }

    pub fn gsm_to_sm(&self, v: &Vector) -> Vector {
        (self.gsm_to_sm * Vector3::from(*v)).into()
    }

    pub fn sm_to_gsm(&self, v: &Vector) -> Vector {
        (self.gsm_to_sm.transpose() * Vector3::from(*v)).into()
    }
}
