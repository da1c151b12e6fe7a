//! A batch of field samples: positions and times bound to a coordinate system and internal model,
//! evaluated one pair at a time.
use crate::ctrans::{date_to_date_long, date_to_fp_hours};
use crate::error::LgmError;
use crate::field::{CoordSystem, Evaluation, FieldEvaluator, InternalModel};
use crate::utils::constants::EVAL_OK;
use crate::vector::Vector;
use chrono::NaiveDateTime;
use indexmap::IndexMap;

type Result<T> = std::result::Result<T, LgmError>;

/// A single input, or a list of them
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn as_slice(&self) -> &[T] {
        match self {
            OneOrMany::One(x) => std::slice::from_ref(x),
            OneOrMany::Many(xs) => xs.as_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    fn describe(&self) -> String {
        match self {
            OneOrMany::One(_) => "a scalar".to_string(),
            OneOrMany::Many(xs) => format!("a list of {}", xs.len()),
        }
    }
}

/// Settings shared by every sample of a request
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldOptions {
    pub coord_system: CoordSystem,
    pub internal_model: InternalModel,
}

impl FieldOptions {
    /// Parses both options from their text names.
    ///
    /// # Errors
    /// Will return `Err` if the coordinate system is anything but GSM, or if the model name is
    /// not one of the known internal models.
    pub fn parse(coord_system: &str, internal_model: &str) -> Result<FieldOptions> {
        Ok(FieldOptions {
            coord_system: coord_system.parse()?,
            internal_model: internal_model.parse()?,
        })
    }
}

/// A sample whose evaluator returned something other than a good status
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWarning {
    pub index: usize,
    pub status: i32,
    pub evaluator: &'static str,
}

impl SampleWarning {
    pub fn message(&self) -> String {
        format!(
            "Odd return ({}) from {} for sample {}",
            self.status, self.evaluator, self.index
        )
    }
}

/// Positions and times bound to a coordinate system and internal model, together with the field
/// computed for each pair.
#[derive(Debug, Clone)]
pub struct FieldRequest {
    positions: OneOrMany<Vector>,
    epochs: OneOrMany<NaiveDateTime>,
    options: FieldOptions,
    b: OneOrMany<Vector>,
    warnings: Vec<SampleWarning>,
}

impl FieldRequest {
    /// Validates the inputs and evaluates the field at every position/time pair.
    ///
    /// Positions and epochs must both be scalars or both be lists of the same length. Each sample
    /// resets the evaluator's coordinate transforms to its own time before evaluating. An
    /// evaluation with a bad status is logged and recorded in [`FieldRequest::warnings`], and its
    /// vector is kept.
    ///
    /// # Errors
    /// Will return `Err` if the input shapes do not match, if the evaluator does not support the
    /// internal model, or if a sample time cannot be used to set up the coordinate transforms.
    pub fn new<E: FieldEvaluator + ?Sized>(
        positions: OneOrMany<Vector>,
        epochs: OneOrMany<NaiveDateTime>,
        options: FieldOptions,
        evaluator: &mut E,
    ) -> Result<FieldRequest> {
        let compatible = match (&positions, &epochs) {
            (OneOrMany::One(_), OneOrMany::One(_)) => true,
            (OneOrMany::Many(p), OneOrMany::Many(t)) => p.len() == t.len(),
            _ => false,
        };
        if !compatible {
            Err(LgmError::LengthMismatch {
                positions: positions.describe(),
                times: epochs.describe(),
            })?
        }
        evaluator.set_internal_model(options.internal_model)?;

        let mut b_values = Vec::with_capacity(positions.len());
        let mut warnings = vec![];
        for (index, (position, epoch)) in positions
            .as_slice()
            .iter()
            .zip(epochs.as_slice())
            .enumerate()
        {
            evaluator.set_coord_transforms(date_to_date_long(epoch), date_to_fp_hours(epoch))?;
            let Evaluation { b, status } = evaluator.evaluate(position);
            if status != EVAL_OK {
                let warning = SampleWarning {
                    index,
                    status,
                    evaluator: evaluator.name(),
                };
                log::warn!("{} at {position} {epoch}", warning.message());
                warnings.push(warning);
            }
            b_values.push(b);
        }

        let b = match positions {
            OneOrMany::One(_) => OneOrMany::One(b_values[0]),
            OneOrMany::Many(_) => OneOrMany::Many(b_values),
        };
        Ok(FieldRequest {
            positions,
            epochs,
            options,
            b,
            warnings,
        })
    }

    pub fn positions(&self) -> &OneOrMany<Vector> {
        &self.positions
    }

    pub fn epochs(&self) -> &OneOrMany<NaiveDateTime> {
        &self.epochs
    }

    /// Field at each sample, shaped like the input positions
    pub fn b(&self) -> &OneOrMany<Vector> {
        &self.b
    }

    pub fn warnings(&self) -> &[SampleWarning] {
        &self.warnings
    }

    /// Request metadata, in insertion order
    pub fn attrs(&self) -> IndexMap<String, String> {
        let mut attrs = IndexMap::new();
        attrs.insert(
            "coord_system".to_string(),
            self.options.coord_system.to_string(),
        );
        attrs.insert(
            "internal_model".to_string(),
            self.options.internal_model.to_string(),
        );
        attrs.insert("units".to_string(), "nT".to_string());
        attrs
    }
}
