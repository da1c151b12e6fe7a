//! Olson-Pfitzer 1977 quiet-time model, evaluated by libLanlGeoMag.
use crate::error::LgmError;
use crate::ffi;
use crate::field::request::{FieldOptions, FieldRequest, OneOrMany};
use crate::field::{Evaluation, FieldEvaluator, InternalModel};
use crate::vector::Vector;
use chrono::NaiveDateTime;
use std::os::raw::c_long;
use std::ptr::NonNull;

/// Owns a native `Lgm_MagModelInfo` and evaluates `Lgm_B_OP77` with it.
///
/// The native context is not thread-safe, so the evaluator is neither `Send` nor `Sync`.
pub struct Op77Evaluator {
    info: NonNull<ffi::Lgm_MagModelInfo>,
    internal_model: InternalModel,
}

impl Op77Evaluator {
    /// Allocates a native context set up for OP77 over IGRF.
    ///
    /// # Errors
    /// Will return `Err` if libLanlGeoMag hands back a null context.
    pub fn new() -> Result<Op77Evaluator, LgmError> {
        // SAFETY: Lgm_InitMagInfo takes no arguments and returns an owned context or null
        let raw = unsafe { ffi::Lgm_InitMagInfo() };
        let info = NonNull::new(raw).ok_or(LgmError::NativeInit("Lgm_InitMagInfo"))?;
        let mut evaluator = Op77Evaluator {
            info,
            internal_model: InternalModel::default(),
        };
        evaluator.apply_model();
        Ok(evaluator)
    }

    pub fn internal_model(&self) -> InternalModel {
        self.internal_model
    }

    fn apply_model(&mut self) {
        // SAFETY: info is a live context owned by self
        unsafe {
            ffi::Lgm_MagModelInfo_Set_MagModel(
                self.internal_model.code(),
                ffi::LGM_EXTMODEL_OP77,
                self.info.as_ptr(),
            )
        }
    }
}

impl Drop for Op77Evaluator {
    fn drop(&mut self) {
        // SAFETY: info came from Lgm_InitMagInfo and is freed exactly once
        unsafe { ffi::Lgm_FreeMagInfo(self.info.as_ptr()) }
    }
}

impl FieldEvaluator for Op77Evaluator {
    fn name(&self) -> &'static str {
        "OP77"
    }

    fn set_internal_model(&mut self, model: InternalModel) -> Result<(), LgmError> {
        self.internal_model = model;
        self.apply_model();
        Ok(())
    }

    fn set_coord_transforms(&mut self, date: i64, utc: f64) -> Result<(), LgmError> {
        let date = c_long::try_from(date).map_err(|_| LgmError::InvalidDate(date))?;
        // SAFETY: c is set up by Lgm_InitMagInfo and lives as long as info
        unsafe {
            let c = (*self.info.as_ptr()).c;
            ffi::Lgm_Set_Coord_Transforms(date, utc, c);
        }
        Ok(())
    }

    fn evaluate(&mut self, position: &Vector) -> Evaluation {
        let mut pos = *position;
        let mut b = Vector::default();
        // SAFETY: both vectors are valid for the duration of the call and share Lgm_Vector's
        // layout
        let status = unsafe { ffi::Lgm_B_OP77(&mut pos, &mut b, self.info.as_ptr()) };
        Evaluation { b, status }
    }
}

/// OP77 field at each position/time pair.
///
/// # Errors
/// Will return `Err` on mismatched input shapes.
pub fn op77(
    positions: OneOrMany<Vector>,
    epochs: OneOrMany<NaiveDateTime>,
    options: FieldOptions,
) -> Result<FieldRequest, LgmError> {
    let mut evaluator = Op77Evaluator::new()?;
    FieldRequest::new(positions, epochs, options, &mut evaluator)
}
