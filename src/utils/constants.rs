/// Mean Earth radius used to scale positions, km
pub const RADIUS_EARTH_KM: f64 = 6371.2;

/// Julian date of the J2000 epoch, 2000-01-01 12:00
pub(crate) const J2000_JULIAN_DATE: f64 = 2_451_545.0;
pub(crate) const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Return code the field evaluators use for a good evaluation
pub const EVAL_OK: i32 = 1;
