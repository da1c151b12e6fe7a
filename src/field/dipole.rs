//! Centred-dipole field computed in Rust, for use where the native library is not available.
use crate::ctrans::CTrans;
use crate::error::LgmError;
use crate::field::request::{FieldOptions, FieldRequest, OneOrMany};
use crate::field::{CoordSystem, Evaluation, FieldEvaluator, InternalModel};
use crate::utils::constants::EVAL_OK;
use crate::vector::Vector;
use chrono::NaiveDateTime;

/// Evaluates the IGRF centred dipole (`LGM_CDIP`) in GSM.
#[derive(Debug, Clone)]
pub struct DipoleEvaluator {
    ctrans: CTrans,
}

impl DipoleEvaluator {
    pub fn new() -> Result<DipoleEvaluator, LgmError> {
        Ok(DipoleEvaluator {
            ctrans: CTrans::new()?,
        })
    }

    /// Coordinate-transform context of the last reset
    pub fn ctrans(&self) -> &CTrans {
        &self.ctrans
    }
}

impl FieldEvaluator for DipoleEvaluator {
    fn name(&self) -> &'static str {
        "centred dipole"
    }

    fn set_internal_model(&mut self, model: InternalModel) -> Result<(), LgmError> {
        match model {
            InternalModel::Cdip => Ok(()),
            _ => Err(LgmError::UnsupportedModel {
                evaluator: self.name(),
                model,
            }),
        }
    }

    fn set_coord_transforms(&mut self, date: i64, utc: f64) -> Result<(), LgmError> {
        self.ctrans.set_coord_transforms(date, utc)
    }

    /// `B = B0 / r^3 (3 (m.r) r - m)` with `m` the unit moment, antiparallel to the north
    /// geomagnetic pole. The origin has no field and comes back as a zero vector with status 0.
    fn evaluate(&mut self, position: &Vector) -> Evaluation {
        let r = position.magnitude();
        if r == 0.0 || !r.is_finite() {
            return Evaluation {
                b: Vector::default(),
                status: 0,
            };
        }
        let moment = -self.ctrans.dipole_axis_gsm();
        let r_hat = *position / r;
        let b0 = self.ctrans.dipole().b0();
        let b = (r_hat * (3.0 * moment.dot(&r_hat)) - moment) * (b0 / (r * r * r));
        Evaluation { b, status: EVAL_OK }
    }
}

/// Centred-dipole field at each position/time pair.
///
/// # Errors
/// Will return `Err` on mismatched input shapes, or for times outside the IGRF table.
pub fn cdip(
    positions: OneOrMany<Vector>,
    epochs: OneOrMany<NaiveDateTime>,
    coord_system: CoordSystem,
) -> Result<FieldRequest, LgmError> {
    let mut evaluator = DipoleEvaluator::new()?;
    let options = FieldOptions {
        coord_system,
        internal_model: InternalModel::Cdip,
    };
    FieldRequest::new(positions, epochs, options, &mut evaluator)
}
