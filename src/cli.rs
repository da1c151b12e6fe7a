//! Argument parsing and execution for the `magfield` command.
use crate::error::LgmError;
use crate::field::dipole::DipoleEvaluator;
use crate::field::request::{FieldOptions, FieldRequest, OneOrMany};
use crate::field::{CoordSystem, InternalModel};
use crate::utils::constants::RADIUS_EARTH_KM;
use crate::vector::Vector;
use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Centred dipole computed in Rust
    Dipole,
    /// OP77 from libLanlGeoMag, when built with the `lanlgeomag` feature
    Op77,
}

/// Evaluates a magnetic field model at one position and time
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct MagfieldArgs {
    /// Position x, Earth radii
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// Position y, Earth radii
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// Position z, Earth radii
    #[arg(allow_negative_numbers = true)]
    pub z: f64,

    /// UTC time, e.g. 2001-04-22T12:00:00
    #[arg(short, long)]
    pub time: NaiveDateTime,

    /// Coordinate system of the position
    #[arg(long, default_value = "GSM")]
    pub coord_system: String,

    /// Internal field model [default: LGM_CDIP for dipole, LGM_IGRF for op77]
    #[arg(long)]
    pub internal_model: Option<String>,

    /// Field model to evaluate
    #[arg(long, value_enum, default_value_t = Backend::Dipole)]
    pub backend: Backend,

    /// Position is given in km rather than Earth radii
    #[arg(long)]
    pub km: bool,
}

impl MagfieldArgs {
    fn options(&self, default_model: InternalModel) -> Result<FieldOptions, LgmError> {
        let coord_system: CoordSystem = self.coord_system.parse()?;
        let internal_model = match &self.internal_model {
            Some(name) => name.parse()?,
            None => default_model,
        };
        Ok(FieldOptions {
            coord_system,
            internal_model,
        })
    }

    fn position(&self) -> Vector {
        let position = Vector::new(self.x, self.y, self.z);
        if self.km {
            position / RADIUS_EARTH_KM
        } else {
            position
        }
    }
}

/// Evaluates the selected model at the position and time given on the command line.
///
/// # Errors
/// Will return `Err` if the options are invalid for the selected backend, or if the time cannot
/// be used with it.
pub fn run_magfield(args: &MagfieldArgs) -> Result<FieldRequest, LgmError> {
    let position = OneOrMany::One(args.position());
    let epoch = OneOrMany::One(args.time);
    match args.backend {
        Backend::Dipole => {
            let options = args.options(InternalModel::Cdip)?;
            let mut evaluator = DipoleEvaluator::new()?;
            FieldRequest::new(position, epoch, options, &mut evaluator)
        }
        #[cfg(feature = "lanlgeomag")]
        Backend::Op77 => {
            let options = args.options(InternalModel::Igrf)?;
            crate::field::op77::op77(position, epoch, options)
        }
        #[cfg(not(feature = "lanlgeomag"))]
        Backend::Op77 => Err(LgmError::BackendUnavailable("op77")),
    }
}
