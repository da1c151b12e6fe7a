//! Sweeps the centred dipole over radial distances and times, comparing the field on the SM
//! equator against the analytic `B0 / r^3`.
use chrono::{Duration, NaiveDateTime};
use clap::Parser;
use itertools::Itertools;
use lgmpy::ctrans::{date_to_date_long, date_to_fp_hours};
use lgmpy::error::LgmError;
use lgmpy::field::dipole::DipoleEvaluator;
use lgmpy::field::{FieldEvaluator, InternalModel};
use lgmpy::Vector;
use rayon::prelude::*;

pub type BinResult<T, E = Box<dyn std::error::Error + Send + Sync>> = Result<T, E>;

fn main() {
    env_logger::init();
    if let Err(e) = bin_main() {
        eprintln!("error: {e}");
        if let Some(e) = e.source() {
            eprintln!("error: {e}");
        }
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// First time of the sweep (UTC)
    #[arg(long, default_value = "2001-04-22T12:00:00")]
    start: NaiveDateTime,

    /// Number of hourly steps
    #[arg(long, default_value_t = 36)]
    hours: i64,

    /// Radial distances on the SM -x axis, Earth radii
    #[arg(long, value_delimiter = ',', default_value = "2,3,4,5,6")]
    radii: Vec<f64>,
}

/// Relative error of |B| against the equatorial dipole value for one radius and time
fn relative_error(
    evaluator: &mut DipoleEvaluator,
    radius: f64,
    time: &NaiveDateTime,
) -> Result<f64, LgmError> {
    evaluator.set_coord_transforms(date_to_date_long(time), date_to_fp_hours(time))?;
    let position = evaluator.ctrans().sm_to_gsm(&Vector::new(-radius, 0.0, 0.0));
    let b = evaluator.evaluate(&position).b;
    let expected = evaluator.ctrans().dipole().b0() / radius.powi(3);
    Ok((b.magnitude() - expected) / expected)
}

fn bin_main() -> BinResult<()> {
    let args = Args::parse();
    let times = (0..args.hours)
        .map(|h| args.start + Duration::hours(h))
        .collect_vec();
    let work = args
        .radii
        .iter()
        .copied()
        .cartesian_product(times.iter())
        .collect_vec();

    let results = work
        .par_iter()
        .map_init(
            || -> Result<DipoleEvaluator, LgmError> {
                let mut evaluator = DipoleEvaluator::new()?;
                evaluator.set_internal_model(InternalModel::Cdip)?;
                Ok(evaluator)
            },
            |evaluator, (radius, time)| -> Result<(f64, f64), LgmError> {
                let evaluator = evaluator.as_mut().map_err(|e| e.clone())?;
                Ok((*radius, relative_error(evaluator, *radius, time)?))
            },
        )
        .collect::<Result<Vec<(f64, f64)>, LgmError>>()?;

    println!("radius,samples,max_relative_error");
    for (radius, group) in &results.into_iter().group_by(|(r, _)| *r) {
        let errors = group.map(|(_, e)| e.abs()).collect_vec();
        let max = errors.iter().copied().fold(0.0, f64::max);
        println!("{radius},{},{max:e}", errors.len());
    }
    Ok(())
}
