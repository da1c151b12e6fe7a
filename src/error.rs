use crate::field::InternalModel;
use pyo3::exceptions::{PyNotImplementedError, PyRuntimeError, PyTypeError, PyValueError};
use pyo3::PyErr;
use thiserror::Error;

/// Enum of the possible error variants that may be encountered
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LgmError {
    /// Arithmetic with an operand that is neither a vector nor a number
    #[error("Cannot {operation} type {type_name} {preposition} a Lgm_Vector")]
    InvalidOperand {
        operation: &'static str,
        preposition: &'static str,
        type_name: String,
    },

    /// Position input that cannot be turned into vectors
    #[error("pos must be a Lgm_Vector or list of Lgm_vectors: {0}")]
    InvalidPosition(String),

    /// Time input that is not a datetime or list of datetimes
    #[error("time must be a datetime or list of datetime: {0}")]
    InvalidTime(String),

    /// Positions and times are not both scalars or equal-length lists
    #[error("Inputs must be the same length, scalars or lists (got {positions} positions and {times} times)")]
    LengthMismatch { positions: String, times: String },

    /// Only GSM positions are supported
    #[error("Different coord systems are not yet ready to use: {0}")]
    UnsupportedCoordSystem(String),

    /// Internal model selector that names none of the known models
    #[error("INTERNAL_MODEL must be LGM_CDIP, LGM_EDIP, or LGM_IGRF, got {0}")]
    UnknownInternalModel(String),

    /// Known internal model that the chosen evaluator cannot compute
    #[error("{evaluator} does not implement internal model {model}")]
    UnsupportedModel {
        evaluator: &'static str,
        model: InternalModel,
    },

    /// Evaluator that was not compiled in
    #[error("The {0} backend requires building with the lanlgeomag feature")]
    BackendUnavailable(&'static str),

    /// Native library failed to allocate its model context
    #[error("{0} returned a null context")]
    NativeInit(&'static str),

    /// Date integer that is not a valid YYYYMMDD calendar date
    #[error("Invalid date {0}, expected YYYYMMDD")]
    InvalidDate(i64),

    /// Date outside the IGRF coefficient table
    #[error("Decimal year {year:.3} is outside the IGRF range {first}-{last}")]
    DateOutOfRange { year: f64, first: f64, last: f64 },

    /// Embedded IGRF table could not be read
    #[error("{0}")]
    Igrf(String),
}

impl From<LgmError> for PyErr {
    fn from(value: LgmError) -> Self {
        let msg = value.to_string();
        match value {
            LgmError::InvalidOperand { .. }
            | LgmError::InvalidPosition(_)
            | LgmError::InvalidTime(_) => PyTypeError::new_err(msg),
            LgmError::UnsupportedCoordSystem(_)
            | LgmError::UnsupportedModel { .. }
            | LgmError::BackendUnavailable(_) => PyNotImplementedError::new_err(msg),
            LgmError::NativeInit(_) => PyRuntimeError::new_err(msg),
            LgmError::LengthMismatch { .. }
            | LgmError::UnknownInternalModel(_)
            | LgmError::InvalidDate(_)
            | LgmError::DateOutOfRange { .. }
            | LgmError::Igrf(_) => PyValueError::new_err(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::Python;

    #[test]
    fn python_exception_types() {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let err: PyErr = LgmError::NativeInit("Lgm_InitMagInfo").into();
            assert!(err.is_instance_of::<PyRuntimeError>(py));
            assert_eq!(
                err.value_bound(py).to_string(),
                "Lgm_InitMagInfo returned a null context"
            );
            let err: PyErr = LgmError::BackendUnavailable("op77").into();
            assert!(err.is_instance_of::<PyNotImplementedError>(py));
            let err: PyErr = LgmError::InvalidDate(20010230).into();
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }
}
