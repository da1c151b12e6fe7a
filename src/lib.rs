use crate::cli::{run_magfield, MagfieldArgs};
use crate::field::dipole::DipoleEvaluator;
use crate::field::request::{FieldOptions, FieldRequest, OneOrMany};
use crate::field::{CoordSystem, FieldEvaluator, InternalModel};
use crate::utils::convert::{
    extract_epochs, extract_internal_model, extract_positions, naive_to_datetime,
};
use clap::Parser;
use indexmap::IndexMap;
use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2};
use pyo3::exceptions::{PyKeyError, PyRuntimeWarning, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyList;

pub mod cli;
pub mod ctrans;
pub mod error;
#[cfg(feature = "lanlgeomag")]
pub mod ffi;
pub mod field;
pub mod igrf;
pub mod utils;
pub mod vector;

pub use crate::vector::Vector;

/// Field values and the inputs they were computed from
#[pyclass(module = "lgmpy")]
pub struct MagData {
    inner: FieldRequest,
}

fn one_or_many_to_py<T>(py: Python<'_>, x: &OneOrMany<T>) -> PyObject
where
    T: Clone + IntoPy<PyObject>,
{
    match x {
        OneOrMany::One(v) => v.clone().into_py(py),
        OneOrMany::Many(vs) => vs.clone().into_py(py),
    }
}

#[allow(non_snake_case)]
#[pymethods]
impl MagData {
    /// Field vector(s) in nT, shaped like the input positions
    #[getter]
    fn B(&self, py: Python<'_>) -> PyObject {
        one_or_many_to_py(py, self.inner.b())
    }

    #[getter]
    fn Position(&self, py: Python<'_>) -> PyObject {
        one_or_many_to_py(py, self.inner.positions())
    }

    #[getter]
    fn Epoch(&self, py: Python<'_>) -> PyResult<PyObject> {
        Ok(match self.inner.epochs() {
            OneOrMany::One(t) => naive_to_datetime(py, t)?.unbind(),
            OneOrMany::Many(ts) => {
                let datetimes = ts
                    .iter()
                    .map(|t| naive_to_datetime(py, t))
                    .collect::<PyResult<Vec<_>>>()?;
                PyList::new_bound(py, datetimes).into_any().unbind()
            }
        })
    }

    #[getter]
    fn attrs(&self) -> IndexMap<String, String> {
        self.inner.attrs()
    }

    /// Messages for samples where the evaluator reported a bad status
    #[getter]
    fn warnings(&self) -> Vec<String> {
        self.inner.warnings().iter().map(|w| w.message()).collect()
    }

    /// Field vectors as an (n, 3) array
    fn B_array<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyArray2<f64>>> {
        let b = self.inner.b().as_slice();
        let flat = bytemuck::cast_slice::<Vector, f64>(b).to_vec();
        let array = Array2::from_shape_vec((b.len(), 3), flat)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(array.into_pyarray_bound(py))
    }

    /// Field values as plain lists
    fn tolist(&self, py: Python<'_>) -> PyObject {
        match self.inner.b() {
            OneOrMany::One(v) => v.to_array().into_py(py),
            OneOrMany::Many(vs) => vs
                .iter()
                .map(|v| v.to_array())
                .collect::<Vec<_>>()
                .into_py(py),
        }
    }

    fn __getitem__(&self, py: Python<'_>, key: &str) -> PyResult<PyObject> {
        match key {
            "B" => Ok(self.B(py)),
            "Position" => Ok(self.Position(py)),
            "Epoch" => self.Epoch(py),
            _ => Err(PyKeyError::new_err(key.to_string())),
        }
    }

    fn __len__(&self) -> usize {
        self.inner.b().len()
    }

    fn __repr__(&self) -> String {
        let attrs = self.inner.attrs();
        format!(
            "<MagData {} samples, {} {}>",
            self.inner.b().len(),
            attrs["internal_model"],
            attrs["coord_system"]
        )
    }
}

/// Builds a request from Python inputs and raises a RuntimeWarning for each bad evaluation.
fn field_request_py<E: FieldEvaluator>(
    py: Python<'_>,
    pos: &Bound<'_, PyAny>,
    time: &Bound<'_, PyAny>,
    coord_system: &str,
    internal_model: InternalModel,
    evaluator: &mut E,
) -> PyResult<MagData> {
    let positions = extract_positions(pos)?;
    let epochs = extract_epochs(time)?;
    let options = FieldOptions {
        coord_system: coord_system.parse::<CoordSystem>()?,
        internal_model,
    };
    let inner = FieldRequest::new(positions, epochs, options, evaluator)?;
    let category = py.get_type_bound::<PyRuntimeWarning>();
    for warning in inner.warnings() {
        PyErr::warn_bound(py, category.as_any(), &warning.message(), 1)?;
    }
    Ok(MagData { inner })
}

/// Centred-dipole field at the given GSM position(s) and time(s).
#[pyfunction]
#[pyo3(name = "Lgm_Dipole")]
#[pyo3(signature = (pos, time, coord_system = "GSM", INTERNAL_MODEL = None))]
#[allow(non_snake_case)]
fn dipole_py(
    py: Python<'_>,
    pos: &Bound<'_, PyAny>,
    time: &Bound<'_, PyAny>,
    coord_system: &str,
    INTERNAL_MODEL: Option<&Bound<'_, PyAny>>,
) -> PyResult<MagData> {
    let internal_model = match INTERNAL_MODEL {
        Some(m) => extract_internal_model(m)?,
        None => InternalModel::Cdip,
    };
    let mut evaluator = DipoleEvaluator::new()?;
    field_request_py(py, pos, time, coord_system, internal_model, &mut evaluator)
}

/// Centred-dipole field in GSM [nT], returned as lists.
#[pyfunction]
#[pyo3(name = "CDIP")]
#[pyo3(signature = (pos, time, coord_system = "GSM"))]
fn cdip_py(
    py: Python<'_>,
    pos: &Bound<'_, PyAny>,
    time: &Bound<'_, PyAny>,
    coord_system: &str,
) -> PyResult<PyObject> {
    Ok(dipole_py(py, pos, time, coord_system, None)?.tolist(py))
}

#[cfg(feature = "lanlgeomag")]
mod op77_py {
    use super::*;
    use crate::field::op77::Op77Evaluator;

    /// OP77 field at the given GSM position(s) and time(s), evaluated by LanlGeoMag.
    #[pyfunction]
    #[pyo3(name = "Lgm_OP77")]
    #[pyo3(signature = (pos, time, coord_system = "GSM", INTERNAL_MODEL = None))]
    #[allow(non_snake_case)]
    pub(super) fn lgm_op77_py(
        py: Python<'_>,
        pos: &Bound<'_, PyAny>,
        time: &Bound<'_, PyAny>,
        coord_system: &str,
        INTERNAL_MODEL: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<MagData> {
        let internal_model = match INTERNAL_MODEL {
            Some(m) => extract_internal_model(m)?,
            None => InternalModel::Igrf,
        };
        let mut evaluator = Op77Evaluator::new()?;
        field_request_py(py, pos, time, coord_system, internal_model, &mut evaluator)
    }

    /// OP77 field in GSM [nT], returned as lists.
    #[pyfunction]
    #[pyo3(name = "OP77")]
    #[pyo3(signature = (pos, time, coord_system = "GSM", INTERNAL_MODEL = None))]
    #[allow(non_snake_case)]
    pub(super) fn op77_py(
        py: Python<'_>,
        pos: &Bound<'_, PyAny>,
        time: &Bound<'_, PyAny>,
        coord_system: &str,
        INTERNAL_MODEL: Option<&Bound<'_, PyAny>>,
    ) -> PyResult<PyObject> {
        Ok(lgm_op77_py(py, pos, time, coord_system, INTERNAL_MODEL)?.tolist(py))
    }
}

/// Evaluates a magnetic field model at one position and time, printing the field in nT.
#[pyfunction]
#[pyo3(name = "magfield")]
fn magfield_cli(py: Python) -> PyResult<()> {
    let argv = py
        .import_bound("sys")?
        .getattr("argv")?
        .extract::<Vec<String>>()?;
    let args = MagfieldArgs::parse_from(argv);

    let request = run_magfield(&args)?;
    for b in request.b().as_slice() {
        println!("{b}");
    }
    Ok(())
}

/// Python bindings for LanlGeoMag magnetic field models.
#[pymodule]
fn lgmpy(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Vector>()?;
    m.add_class::<MagData>()?;
    for model in InternalModel::ALL {
        m.add(model.symbol(), model.code())?;
    }
    m.add_function(wrap_pyfunction!(dipole_py, m)?)?;
    m.add_function(wrap_pyfunction!(cdip_py, m)?)?;
    #[cfg(feature = "lanlgeomag")]
    {
        m.add_function(wrap_pyfunction!(op77_py::lgm_op77_py, m)?)?;
        m.add_function(wrap_pyfunction!(op77_py::op77_py, m)?)?;
    }
    m.add_wrapped(wrap_pyfunction!(magfield_cli))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pyo3::exceptions::{PyNotImplementedError, PyTypeError, PyZeroDivisionError};
    use pyo3::types::PyDict;

    fn with_module<F>(f: F)
    where
        F: for<'py> FnOnce(Python<'py>, &Bound<'py, PyDict>),
    {
        pyo3::prepare_freethreaded_python();
        Python::with_gil(|py| {
            let module = PyModule::new_bound(py, "lgmpy").unwrap();
            lgmpy(&module).unwrap();
            let globals = PyDict::new_bound(py);
            globals.set_item("lgmpy", module).unwrap();
            py.run_bound("import datetime\nimport warnings", Some(&globals), None)
                .unwrap();
            f(py, &globals);
        });
    }

    fn run_err(py: Python<'_>, globals: &Bound<'_, PyDict>, code: &str) -> PyErr {
        py.run_bound(code, Some(globals), None).unwrap_err()
    }

    #[test]
    fn vector_arithmetic() {
        with_module(|py, globals| {
            py.run_bound(
                r#"
v = lgmpy.Lgm_Vector(1, 2, 3)
assert (v + lgmpy.Lgm_Vector(1, 1, 1)).tolist() == [2.0, 3.0, 4.0]
assert (v - 1).tolist() == [0.0, 1.0, 2.0]
assert (2 * v).tolist() == [2.0, 4.0, 6.0]
assert (v * lgmpy.Lgm_Vector(1, 2, 3)).tolist() == [0.0, 0.0, 0.0]
assert v == lgmpy.Lgm_Vector(1.0, 2.0, 3.0)
assert str(v) == '[1.0, 2.0, 3.0]'
assert repr(lgmpy.Lgm_Vector()) == 'Lgm_Vector(0.0, 0.0, 0.0)'
v.normalize()
assert abs(v.mag - 1.0) < 1e-12
"#,
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[test]
    fn vector_rejects_other_operands() {
        with_module(|py, globals| {
            let err = run_err(py, globals, "lgmpy.Lgm_Vector() + 'a'");
            assert!(err.is_instance_of::<PyTypeError>(py));
            assert_eq!(
                err.value_bound(py).to_string(),
                "Cannot add type str to a Lgm_Vector"
            );
            let err = run_err(py, globals, "lgmpy.Lgm_Vector() / lgmpy.Lgm_Vector()");
            assert!(err.is_instance_of::<PyTypeError>(py));
            let err = run_err(py, globals, "lgmpy.Lgm_Vector(1, 2, 3) / 0");
            assert!(err.is_instance_of::<PyZeroDivisionError>(py));
            py.run_bound(
                "assert (lgmpy.Lgm_Vector(2, 4, 6) / 2).tolist() == [1.0, 2.0, 3.0]",
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[test]
    fn dipole_scalar_and_list() {
        with_module(|py, globals| {
            py.run_bound(
                r#"
t = datetime.datetime(2001, 4, 22, 12)
b = lgmpy.CDIP([-3, 0, 0], t)
assert len(b) == 3
m = lgmpy.Lgm_Dipole([[-3, 0, 0], [-4, 0, 0]], [t, t])
assert len(m) == 2
assert m.attrs['internal_model'] == 'LGM_CDIP'
assert m.attrs['units'] == 'nT'
assert m['Epoch'] == [t, t]
assert m.B[0].mag > m.B[1].mag
"#,
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[test]
    fn plain_sequences_do_not_load_numpy() {
        with_module(|py, globals| {
            py.run_bound(
                r#"
import sys
before = 'numpy' in sys.modules
t = datetime.datetime(2001, 4, 22, 12)
assert len(lgmpy.CDIP((-3, 0, 0), t)) == 3
assert len(lgmpy.CDIP([(-3, 0, 0), (0, -4, 1)], [t, t])) == 2
assert len(lgmpy.CDIP([lgmpy.Lgm_Vector(-3, 0, 0)], [t])) == 1
assert ('numpy' in sys.modules) == before
"#,
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[test]
    fn aware_times_are_converted_to_utc() {
        with_module(|py, globals| {
            py.run_bound(
                r#"
tz = datetime.timezone(datetime.timedelta(hours=2))
aware = datetime.datetime(2001, 4, 22, 14, tzinfo=tz)
naive = datetime.datetime(2001, 4, 22, 12)
assert lgmpy.CDIP([-3, 1, 0], aware) == lgmpy.CDIP([-3, 1, 0], naive)
"#,
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[test]
    fn bad_inputs_raise() {
        with_module(|py, globals| {
            let t = "datetime.datetime(2001, 4, 22)";
            let err = run_err(py, globals, &format!("lgmpy.CDIP([[1, 0, 0], [2, 0, 0]], [{t}])"));
            assert!(err.is_instance_of::<PyValueError>(py));
            let err = run_err(py, globals, &format!("lgmpy.CDIP([1, 0, 0], {t}, 'SM')"));
            assert!(err.is_instance_of::<PyNotImplementedError>(py));
            let err = run_err(py, globals, "lgmpy.CDIP([1, 0, 0], '2001-04-22')");
            assert!(err.is_instance_of::<PyTypeError>(py));
            let err = run_err(py, globals, &format!("lgmpy.CDIP('abc', {t})"));
            assert!(err.is_instance_of::<PyTypeError>(py));
            let err = run_err(
                py,
                globals,
                &format!("lgmpy.Lgm_Dipole([1, 0, 0], {t}, INTERNAL_MODEL='LGM_EDIP')"),
            );
            assert!(err.is_instance_of::<PyNotImplementedError>(py));
            let err = run_err(
                py,
                globals,
                &format!("lgmpy.Lgm_Dipole([1, 0, 0], {t}, INTERNAL_MODEL='LGM_FOO')"),
            );
            assert!(err.is_instance_of::<PyValueError>(py));
        });
    }

    #[test]
    fn bad_status_warns() {
        with_module(|py, globals| {
            py.run_bound(
                r#"
with warnings.catch_warnings(record=True) as caught:
    warnings.simplefilter('always')
    m = lgmpy.Lgm_Dipole([0, 0, 0], datetime.datetime(2001, 4, 22))
assert len(caught) == 1
assert issubclass(caught[0].category, RuntimeWarning)
assert m.B.tolist() == [0.0, 0.0, 0.0]
assert len(m.warnings) == 1
"#,
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[cfg(feature = "lanlgeomag")]
    #[test]
    fn op77_reference_value() {
        with_module(|py, globals| {
            py.run_bound(
                r#"
t = datetime.datetime(1999, 1, 16, 12, 34, 12)
expected = [-498.5006017, -614.7106283, -430.26894377]
b = lgmpy.OP77([1, 2, 3], t)
assert all(abs(x - e) < 1e-6 * abs(e) for x, e in zip(b, expected))
m = lgmpy.Lgm_OP77([[1, 2, 3], [1, 2, 3]], [t, t], INTERNAL_MODEL=lgmpy.LGM_IGRF)
assert len(m) == 2 and m.warnings == []
assert m.attrs['internal_model'] == 'LGM_IGRF'
"#,
                Some(globals),
                None,
            )
            .unwrap();
        });
    }

    #[test]
    fn exports_model_constants() {
        with_module(|py, globals| {
            py.run_bound(
                "assert (lgmpy.LGM_CDIP, lgmpy.LGM_EDIP, lgmpy.LGM_IGRF) == (0, 1, 2)",
                Some(globals),
                None,
            )
            .unwrap();
        });
    }
}
