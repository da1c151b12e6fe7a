use approx::assert_relative_eq;
use chrono::NaiveDateTime;
use lgmpy::ctrans::CTrans;
use lgmpy::error::LgmError;
use lgmpy::field::dipole::{cdip, DipoleEvaluator};
use lgmpy::field::request::{FieldOptions, FieldRequest, OneOrMany};
use lgmpy::field::{CoordSystem, InternalModel};
use lgmpy::Vector;

fn epoch(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").expect("Bad test time")
}

#[test]
fn vector_identities() {
    let a = Vector::new(1.5, -2.0, 0.25);
    let b = Vector::new(-0.5, 4.0, 3.0);
    assert_eq!(a + b - b, a);
    assert_relative_eq!(a.cross(&b).dot(&a), 0.0, epsilon = 1e-12);
    assert_relative_eq!(a.dot(&a), a.magnitude().powi(2), epsilon = 1e-12);

    let mut c = a;
    c.force_magnitude(7.0);
    assert_relative_eq!(c.magnitude(), 7.0, epsilon = 1e-12);
    assert_relative_eq!(c.dot(&a), c.magnitude() * a.magnitude(), epsilon = 1e-9);
}

#[test]
fn dipole_list_request() {
    let t = epoch("2001-04-22T12:00:00");
    let positions = OneOrMany::Many(vec![
        Vector::new(-2.0, 0.0, 0.0),
        Vector::new(-4.0, 0.0, 0.0),
        Vector::new(-8.0, 0.0, 0.0),
    ]);
    let req = cdip(positions, OneOrMany::Many(vec![t; 3]), CoordSystem::Gsm)
        .expect("Dipole request failed");
    let b = req.b().as_slice();
    assert_eq!(b.len(), 3);
    assert!(req.warnings().is_empty());
    // |B| falls off as r^-3 along a fixed direction
    assert_relative_eq!(b[0].magnitude() / b[1].magnitude(), 8.0, max_relative = 1e-12);
    assert_relative_eq!(b[1].magnitude() / b[2].magnitude(), 8.0, max_relative = 1e-12);
}

#[test]
fn dipole_matches_analytic_equator() {
    let t = epoch("2010-01-01T00:00:00");
    let mut ctrans = CTrans::new().expect("Could not build transforms");
    ctrans.set_datetime(&t).expect("Bad time");
    let position = ctrans.sm_to_gsm(&Vector::new(0.0, 5.0, 0.0));

    let req = cdip(OneOrMany::One(position), OneOrMany::One(t), CoordSystem::Gsm)
        .expect("Dipole request failed");
    let b = req.b().as_slice()[0];
    assert_relative_eq!(
        b.magnitude(),
        ctrans.dipole().b0() / 125.0,
        max_relative = 1e-10
    );
}

#[test]
fn mismatched_lengths_are_rejected() {
    let t = epoch("2001-04-22T12:00:00");
    let mut evaluator = DipoleEvaluator::new().expect("Could not build evaluator");
    let options = FieldOptions {
        coord_system: CoordSystem::Gsm,
        internal_model: InternalModel::Cdip,
    };
    let err = FieldRequest::new(
        OneOrMany::Many(vec![Vector::new(1.0, 0.0, 0.0); 2]),
        OneOrMany::Many(vec![t; 3]),
        options,
        &mut evaluator,
    )
    .unwrap_err();
    assert!(matches!(err, LgmError::LengthMismatch { .. }));
}

#[test]
fn only_gsm_is_accepted() {
    assert!(matches!(
        FieldOptions::parse("SM", "LGM_CDIP"),
        Err(LgmError::UnsupportedCoordSystem(_))
    ));
    assert!(matches!(
        FieldOptions::parse("GSM", "LGM_NOPE"),
        Err(LgmError::UnknownInternalModel(_))
    ));
}

#[cfg(feature = "lanlgeomag")]
#[test]
fn op77_matches_reference_value() {
    use lgmpy::field::op77::op77;

    let t = epoch("1999-01-16T12:34:12");
    let options = FieldOptions::parse("GSM", "LGM_IGRF").expect("Bad options");
    let req = op77(
        OneOrMany::Many(vec![Vector::new(1.0, 2.0, 3.0); 2]),
        OneOrMany::Many(vec![t; 2]),
        options,
    )
    .expect("OP77 request failed");
    assert!(req.warnings().is_empty());
    for b in req.b().as_slice() {
        assert_relative_eq!(b.x, -498.5006017, max_relative = 1e-6);
        assert_relative_eq!(b.y, -614.7106283, max_relative = 1e-6);
        assert_relative_eq!(b.z, -430.26894377, max_relative = 1e-6);
    }
}
