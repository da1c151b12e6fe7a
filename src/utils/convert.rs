//! Conversion of loosely-typed Python inputs into request inputs.
use crate::error::LgmError;
use crate::field::request::OneOrMany;
use crate::field::InternalModel;
use crate::vector::Vector;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use numpy::PyReadonlyArrayDyn;
use pyo3::prelude::*;

fn type_name(obj: &Bound<'_, PyAny>) -> String {
    obj.get_type()
        .qualname()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string())
}

fn is_numpy_array(obj: &Bound<'_, PyAny>) -> bool {
    obj.get_type()
        .getattr("__module__")
        .and_then(|m| m.extract::<String>())
        .map_or(false, |m| m == "numpy")
}

/// Accepts a `Lgm_Vector`, a 3-sequence, a list of vectors or 3-sequences, or a `(3,)` or
/// `(n, 3)` float array. Arrays are only inspected once the plain Python forms have failed, so
/// numpy is never touched for list input.
pub(crate) fn extract_positions(obj: &Bound<'_, PyAny>) -> PyResult<OneOrMany<Vector>> {
    if let Ok(v) = obj.extract::<Vector>() {
        return Ok(OneOrMany::One(v));
    }
    if let Ok(xyz) = obj.extract::<[f64; 3]>() {
        return Ok(OneOrMany::One(Vector::from(xyz)));
    }
    if let Ok(vs) = obj.extract::<Vec<Vector>>() {
        return Ok(OneOrMany::Many(vs));
    }
    if let Ok(xyzs) = obj.extract::<Vec<[f64; 3]>>() {
        return Ok(OneOrMany::Many(xyzs.into_iter().map(Vector::from).collect()));
    }
    if is_numpy_array(obj) {
        if let Ok(arr) = obj.extract::<PyReadonlyArrayDyn<'_, f64>>() {
            let view = arr.as_array();
            let flat: Vec<f64> = view.iter().copied().collect();
            return match view.shape() {
                [3] => Ok(OneOrMany::One(Vector::new(flat[0], flat[1], flat[2]))),
                [_, 3] => Ok(OneOrMany::Many(
                    flat.chunks_exact(3)
                        .map(|c| Vector::new(c[0], c[1], c[2]))
                        .collect(),
                )),
                shape => Err(LgmError::InvalidPosition(format!("array of shape {shape:?}")))?,
            };
        }
    }
    Err(LgmError::InvalidPosition(format!("got {}", type_name(obj))))?
}

fn is_datetime(obj: &Bound<'_, PyAny>) -> PyResult<bool> {
    let datetime = obj.py().import_bound("datetime")?.getattr("datetime")?;
    obj.is_instance(&datetime)
}

/// Reads a `datetime.datetime` as a naive UTC time. Aware datetimes are shifted to UTC.
pub(crate) fn datetime_to_naive(obj: &Bound<'_, PyAny>) -> PyResult<NaiveDateTime> {
    let field = |name: &str| -> PyResult<u32> { obj.getattr(name)?.extract::<u32>() };
    let year = obj.getattr("year")?.extract::<i32>()?;
    let naive = NaiveDate::from_ymd_opt(year, field("month")?, field("day")?)
        .and_then(|d| {
            d.and_hms_micro_opt(
                field("hour").ok()?,
                field("minute").ok()?,
                field("second").ok()?,
                field("microsecond").ok()?,
            )
        })
        .ok_or_else(|| LgmError::InvalidTime(format!("unrepresentable datetime {obj}")))?;

    let offset = obj.call_method0("utcoffset")?;
    if offset.is_none() {
        return Ok(naive);
    }
    let seconds = offset.call_method0("total_seconds")?.extract::<f64>()?;
    Ok(naive - Duration::microseconds((seconds * 1e6).round() as i64))
}

pub(crate) fn naive_to_datetime<'py>(
    py: Python<'py>,
    dt: &NaiveDateTime,
) -> PyResult<Bound<'py, PyAny>> {
    use chrono::{Datelike, Timelike};
    let datetime = py.import_bound("datetime")?.getattr("datetime")?;
    datetime.call1((
        dt.year(),
        dt.month(),
        dt.day(),
        dt.hour(),
        dt.minute(),
        dt.second(),
        dt.nanosecond() / 1000,
    ))
}

/// Accepts a `datetime.datetime` or a list of them.
pub(crate) fn extract_epochs(obj: &Bound<'_, PyAny>) -> PyResult<OneOrMany<NaiveDateTime>> {
    if is_datetime(obj)? {
        return Ok(OneOrMany::One(datetime_to_naive(obj)?));
    }
    let items = obj
        .extract::<Vec<Bound<'_, PyAny>>>()
        .map_err(|_| LgmError::InvalidTime(format!("got {}", type_name(obj))))?;
    let mut epochs = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        if !is_datetime(item)? {
            Err(LgmError::InvalidTime(format!(
                "element {i} is {}",
                type_name(item)
            )))?
        }
        epochs.push(datetime_to_naive(item)?);
    }
    Ok(OneOrMany::Many(epochs))
}

/// Accepts the integer symbol (`LGM_IGRF`) or its name as a string.
pub(crate) fn extract_internal_model(obj: &Bound<'_, PyAny>) -> PyResult<InternalModel> {
    if let Ok(code) = obj.extract::<i32>() {
        return Ok(InternalModel::try_from(code)?);
    }
    if let Ok(name) = obj.extract::<String>() {
        return Ok(name.parse::<InternalModel>()?);
    }
    Err(LgmError::UnknownInternalModel(type_name(obj)))?
}
