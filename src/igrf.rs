//! IGRF dipole (degree-1) coefficients, embedded in the binary and interpolated in time.
use crate::error::LgmError;
use rust_embed::RustEmbed;
use std::io::{BufRead, BufReader};

#[derive(RustEmbed)]
#[folder = "data/"]
struct IgrfData;

const IGRF_FILE: &str = "igrf_dipole.dat";

/// Years past the last epoch over which the secular variation may be applied
const EXTRAPOLATION_YEARS: f64 = 5.0;

/// First-degree Gauss coefficients at one epoch, in nT
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DipoleCoefficients {
    pub epoch: f64,
    pub g10: f64,
    pub g11: f64,
    pub h11: f64,
}

impl DipoleCoefficients {
    /// Reference field strength at the surface, `sqrt(g10^2 + g11^2 + h11^2)`
    pub fn b0(&self) -> f64 {
        (self.g10 * self.g10 + self.g11 * self.g11 + self.h11 * self.h11).sqrt()
    }
}

#[derive(Debug, Clone)]
pub struct IgrfDipole {
    epochs: Vec<DipoleCoefficients>,
    secular_variation: [f64; 3],
}

fn parse_field(elements: &[&str], idx: usize, name: &str) -> Result<f64, LgmError> {
    elements
        .get(idx)
        .ok_or_else(|| LgmError::Igrf(format!("Missing {name} in IGRF file")))?
        .parse::<f64>()
        .map_err(|_| LgmError::Igrf(format!("Unable to read {name} from IGRF file")))
}

impl IgrfDipole {
    /// Reads the coefficient table that ships with the crate.
    pub fn load() -> Result<IgrfDipole, LgmError> {
        let file = IgrfData::get(IGRF_FILE)
            .ok_or_else(|| LgmError::Igrf(format!("{IGRF_FILE} not embedded")))?;
        IgrfDipole::parse(file.data.as_ref())
    }

    pub(crate) fn parse(data: &[u8]) -> Result<IgrfDipole, LgmError> {
        let mut epochs: Vec<DipoleCoefficients> = vec![];
        let mut secular_variation = None;
        for line in BufReader::new(data).lines() {
            let line =
                line.map_err(|_| LgmError::Igrf("Unable to read line from IGRF file".to_string()))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let elements: Vec<&str> = line.split_whitespace().collect();
            if elements[0] == "SV" {
                secular_variation = Some([
                    parse_field(&elements, 1, "g10 SV")?,
                    parse_field(&elements, 2, "g11 SV")?,
                    parse_field(&elements, 3, "h11 SV")?,
                ]);
                continue;
            }
            let coeffs = DipoleCoefficients {
                epoch: parse_field(&elements, 0, "epoch")?,
                g10: parse_field(&elements, 1, "g10")?,
                g11: parse_field(&elements, 2, "g11")?,
                h11: parse_field(&elements, 3, "h11")?,
            };
            if let Some(prev) = epochs.last() {
                if coeffs.epoch <= prev.epoch {
                    Err(LgmError::Igrf(format!(
                        "IGRF epochs out of order at {}",
                        coeffs.epoch
                    )))?
                }
            }
            epochs.push(coeffs);
        }
        if epochs.is_empty() {
            Err(LgmError::Igrf("No epochs found in IGRF file".to_string()))?
        }
        Ok(IgrfDipole {
            epochs,
            secular_variation: secular_variation
                .ok_or_else(|| LgmError::Igrf("No SV line found in IGRF file".to_string()))?,
        })
    }

    /// First and last decimal years the table can be evaluated at
    pub fn valid_range(&self) -> (f64, f64) {
        let first = self.epochs[0].epoch;
        let last = self.epochs[self.epochs.len() - 1].epoch + EXTRAPOLATION_YEARS;
        (first, last)
    }

    /// Coefficients at `year`, linearly interpolated between epochs and extrapolated with the
    /// secular variation past the last one.
    pub fn at(&self, year: f64) -> Result<DipoleCoefficients, LgmError> {
        let (first, last) = self.valid_range();
        if !(first..=last).contains(&year) {
            Err(LgmError::DateOutOfRange { year, first, last })?
        }
        let idx = self.epochs.partition_point(|c| c.epoch <= year);
        let lower = self.epochs[idx - 1];
        let coeffs = match self.epochs.get(idx) {
            Some(upper) => {
                let frac = (year - lower.epoch) / (upper.epoch - lower.epoch);
                DipoleCoefficients {
                    epoch: year,
                    g10: lower.g10 + frac * (upper.g10 - lower.g10),
                    g11: lower.g11 + frac * (upper.g11 - lower.g11),
                    h11: lower.h11 + frac * (upper.h11 - lower.h11),
                }
            }
            None => {
                let dt = year - lower.epoch;
                let [sv_g10, sv_g11, sv_h11] = self.secular_variation;
                DipoleCoefficients {
                    epoch: year,
                    g10: lower.g10 + dt * sv_g10,
                    g11: lower.g11 + dt * sv_g11,
                    h11: lower.h11 + dt * sv_h11,
                }
            }
        };
        Ok(coeffs)
    }
}
