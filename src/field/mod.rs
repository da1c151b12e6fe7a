//! Magnetic field requests and the evaluators that answer them.
use crate::error::LgmError;
use crate::vector::Vector;
use std::fmt;
use std::str::FromStr;

pub mod dipole;
#[cfg(feature = "lanlgeomag")]
pub mod op77;
pub mod request;

/// Internal (background) field model, numbered as in LanlGeoMag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InternalModel {
    /// Centred dipole
    Cdip = 0,
    /// Eccentric dipole
    Edip = 1,
    /// Full IGRF expansion
    #[default]
    Igrf = 2,
}

impl InternalModel {
    pub const ALL: [InternalModel; 3] = [
        InternalModel::Cdip,
        InternalModel::Edip,
        InternalModel::Igrf,
    ];

    /// Name of the LanlGeoMag symbol, e.g. `LGM_IGRF`
    pub fn symbol(&self) -> &'static str {
        match self {
            InternalModel::Cdip => "LGM_CDIP",
            InternalModel::Edip => "LGM_EDIP",
            InternalModel::Igrf => "LGM_IGRF",
        }
    }

    pub fn code(&self) -> i32 {
        *self as i32
    }
}

impl fmt::Display for InternalModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for InternalModel {
    type Err = LgmError;

    /// Accepts the symbol name (`LGM_CDIP`) or the bare model name (`CDIP`), in any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        match upper.strip_prefix("LGM_").unwrap_or(upper.as_str()) {
            "CDIP" => Ok(InternalModel::Cdip),
            "EDIP" => Ok(InternalModel::Edip),
            "IGRF" => Ok(InternalModel::Igrf),
            _ => Err(LgmError::UnknownInternalModel(s.to_string())),
        }
    }
}

impl TryFrom<i32> for InternalModel {
    type Error = LgmError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        InternalModel::ALL
            .into_iter()
            .find(|m| m.code() == value)
            .ok_or_else(|| LgmError::UnknownInternalModel(value.to_string()))
    }
}

/// Coordinate system of the input positions and the returned field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordSystem {
    #[default]
    Gsm,
}

impl fmt::Display for CoordSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordSystem::Gsm => f.write_str("GSM"),
        }
    }
}

impl FromStr for CoordSystem {
    type Err = LgmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GSM" => Ok(CoordSystem::Gsm),
            _ => Err(LgmError::UnsupportedCoordSystem(s.to_string())),
        }
    }
}

/// Field vector and return code from one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub b: Vector,
    /// 1 for a good evaluation; anything else is reported as a warning
    pub status: i32,
}

/// A magnetic field model that can be evaluated one position at a time.
///
/// Evaluators carry a coordinate-transform context that must be reset with
/// [`FieldEvaluator::set_coord_transforms`] before each evaluation.
pub trait FieldEvaluator {
    /// Short name used in log and warning messages
    fn name(&self) -> &'static str;

    /// Selects the internal field model.
    ///
    /// # Errors
    /// Will return `Err` if the evaluator cannot compute `model`.
    fn set_internal_model(&mut self, model: InternalModel) -> Result<(), LgmError>;

    /// Resets the coordinate-transform context to `date` (YYYYMMDD) at `utc` hours.
    fn set_coord_transforms(&mut self, date: i64, utc: f64) -> Result<(), LgmError>;

    /// Field at `position` (GSM, Earth radii), in nT.
    fn evaluate(&mut self, position: &Vector) -> Evaluation;
}
