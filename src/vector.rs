//! Three-component Cartesian vector, exposed to Python as `Lgm_Vector`.
use crate::error::LgmError;
use bytemuck::{Pod, Zeroable};
use nalgebra::Vector3;
use pyo3::exceptions::PyZeroDivisionError;
use pyo3::prelude::*;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A Cartesian vector in whatever frame the caller is working in (usually GSM, in Earth radii,
/// or a field vector in nT).
///
/// Layout matches `Lgm_Vector` from LanlGeoMag so a slice of vectors can be handed to the native
/// library or reinterpreted as a flat `[f64]`.
#[pyclass(name = "Lgm_Vector", module = "lgmpy")]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vector {
    #[pyo3(get, set)]
    pub x: f64,
    #[pyo3(get, set)]
    pub y: f64,
    #[pyo3(get, set)]
    pub z: f64,
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Vector {
        Vector { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector) -> Vector {
        Vector {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Normalizes the vector in place. A zero vector is left as it is.
    pub fn normalize(&mut self) {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.scale(1.0 / mag);
        }
    }

    /// Multiplies every component by `factor` in place.
    pub fn scale(&mut self, factor: f64) {
        self.x *= factor;
        self.y *= factor;
        self.z *= factor;
    }

    /// Rescales the vector in place so that its magnitude is `magnitude`, keeping its direction.
    /// A zero vector has no direction and is left as it is.
    pub fn force_magnitude(&mut self, magnitude: f64) {
        let mag = self.magnitude();
        if mag > 0.0 {
            self.scale(magnitude / mag);
        }
    }

    /// Magnitude of the difference `self - other`, i.e. the distance between two points.
    pub fn diff_mag(&self, other: &Vector) -> f64 {
        (*self - *other).magnitude()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vector {
    fn from(value: [f64; 3]) -> Self {
        Vector::new(value[0], value[1], value[2])
    }
}

impl From<Vector> for [f64; 3] {
    fn from(value: Vector) -> Self {
        value.to_array()
    }
}

impl From<Vector3<f64>> for Vector {
    fn from(value: Vector3<f64>) -> Self {
        Vector::new(value.x, value.y, value.z)
    }
}

impl From<Vector> for Vector3<f64> {
    fn from(value: Vector) -> Self {
        Vector3::new(value.x, value.y, value.z)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Add<f64> for Vector {
    type Output = Vector;
    fn add(self, rhs: f64) -> Vector {
        Vector::new(self.x + rhs, self.y + rhs, self.z + rhs)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Sub<f64> for Vector {
    type Output = Vector;
    fn sub(self, rhs: f64) -> Vector {
        Vector::new(self.x - rhs, self.y - rhs, self.z - rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, rhs: f64) -> Vector {
        Vector::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;
    fn mul(self, rhs: Vector) -> Vector {
        rhs * self
    }
}

impl Div<f64> for Vector {
    type Output = Vector;
    fn div(self, rhs: f64) -> Vector {
        Vector::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}, {:?}, {:?}]", self.x, self.y, self.z)
    }
}

/// Right-hand operand of a Python arithmetic operator
enum Operand {
    Vector(Vector),
    Scalar(f64),
}

fn operand(
    other: &Bound<'_, PyAny>,
    operation: &'static str,
    preposition: &'static str,
) -> PyResult<Operand> {
    if let Ok(v) = other.extract::<Vector>() {
        return Ok(Operand::Vector(v));
    }
    if let Ok(s) = other.extract::<f64>() {
        return Ok(Operand::Scalar(s));
    }
    Err(LgmError::InvalidOperand {
        operation,
        preposition,
        type_name: other.get_type().qualname()?.to_string(),
    })?
}

#[pymethods]
impl Vector {
    #[new]
    #[pyo3(signature = (x=0.0, y=0.0, z=0.0))]
    fn py_new(x: f64, y: f64, z: f64) -> Self {
        Vector::new(x, y, z)
    }

    /// Magnitude of the vector, computed on access
    #[getter]
    fn mag(&self) -> f64 {
        self.magnitude()
    }

    #[pyo3(name = "magnitude")]
    fn py_magnitude(&self) -> f64 {
        self.magnitude()
    }

    /// Cross product with `other` on the right
    #[pyo3(name = "crossProduct")]
    fn py_cross(&self, other: Vector) -> Vector {
        self.cross(&other)
    }

    #[pyo3(name = "dotProduct")]
    fn py_dot(&self, other: Vector) -> f64 {
        self.dot(&other)
    }

    /// Normalize the vector in place
    #[pyo3(name = "normalize")]
    fn py_normalize(&mut self) {
        self.normalize()
    }

    /// Multiply every component by `val` in place
    #[pyo3(name = "scale")]
    fn py_scale(&mut self, val: f64) {
        self.scale(val)
    }

    /// Force the vector to have magnitude `val` in place
    #[pyo3(name = "forceMagnitude")]
    fn py_force_magnitude(&mut self, val: f64) {
        self.force_magnitude(val)
    }

    /// Magnitude of the difference between two vectors
    #[pyo3(name = "diffMag")]
    fn py_diff_mag(&self, other: Vector) -> f64 {
        self.diff_mag(&other)
    }

    fn tolist(&self) -> [f64; 3] {
        self.to_array()
    }

    fn __add__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        Ok(match operand(other, "add", "to")? {
            Operand::Vector(v) => *self + v,
            Operand::Scalar(s) => *self + s,
        })
    }

    fn __radd__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        self.__add__(other)
    }

    fn __sub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        Ok(match operand(other, "subtract", "from")? {
            Operand::Vector(v) => *self - v,
            Operand::Scalar(s) => *self - s,
        })
    }

    fn __rsub__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        Ok(match operand(other, "subtract", "from")? {
            Operand::Vector(v) => v - *self,
            Operand::Scalar(s) => -*self + s,
        })
    }

    /// Cross product for a vector operand, component scaling for a number
    fn __mul__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        Ok(match operand(other, "multiply", "with")? {
            Operand::Vector(v) => self.cross(&v),
            Operand::Scalar(s) => *self * s,
        })
    }

    fn __rmul__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        Ok(match operand(other, "multiply", "with")? {
            Operand::Vector(v) => v.cross(self),
            Operand::Scalar(s) => s * *self,
        })
    }

    fn __truediv__(&self, other: &Bound<'_, PyAny>) -> PyResult<Vector> {
        match operand(other, "divide", "into")? {
            Operand::Scalar(s) if s == 0.0 => {
                Err(PyZeroDivisionError::new_err("float division by zero"))
            }
            Operand::Scalar(s) => Ok(*self / s),
            Operand::Vector(_) => Err(LgmError::InvalidOperand {
                operation: "divide",
                preposition: "into",
                type_name: "Lgm_Vector".to_string(),
            })?,
        }
    }

    fn __neg__(&self) -> Vector {
        -*self
    }

    fn __eq__(&self, other: &Bound<'_, PyAny>) -> bool {
        other.extract::<Vector>().map_or(false, |v| v == *self)
    }

    fn __str__(&self) -> String {
        self.to_string()
    }

    fn __repr__(&self) -> String {
        format!("Lgm_Vector({:?}, {:?}, {:?})", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_vec_eq(a: Vector, b: Vector) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-12);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-12);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-12);
    }

    #[test]
    fn add_then_subtract_is_identity() {
        let a = Vector::new(1.5, -2.25, 3.0);
        let b = Vector::new(-0.3, 7.1, 2.2);
        assert_vec_eq((a + b) - b, a);
    }

    #[test]
    fn scalar_broadcast() {
        let a = Vector::new(1.0, 2.0, 3.0);
        assert_eq!(a + 1.0, Vector::new(2.0, 3.0, 4.0));
        assert_eq!(a - 1.0, Vector::new(0.0, 1.0, 2.0));
        assert_eq!(a * 2.0, Vector::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(a / 2.0, Vector::new(0.5, 1.0, 1.5));
    }

    #[test]
    fn cross_product_is_anticommutative() {
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(-4.0, 0.5, 2.0);
        assert_vec_eq(a.cross(&b), -b.cross(&a));
        assert_eq!(
            Vector::new(1.0, 0.0, 0.0).cross(&Vector::new(0.0, 1.0, 0.0)),
            Vector::new(0.0, 0.0, 1.0)
        );
    }

    #[test]
    fn dot_with_self_is_magnitude_squared() {
        let a = Vector::new(3.0, -4.0, 12.0);
        assert_relative_eq!(a.magnitude(), 13.0);
        assert_relative_eq!(a.dot(&a), a.magnitude().powi(2), epsilon = 1e-12);
    }

    #[test]
    fn normalize_keeps_direction() {
        let original = Vector::new(2.0, -1.0, 0.5);
        let mut a = original;
        a.normalize();
        assert_relative_eq!(a.magnitude(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(a.cross(&original).magnitude(), 0.0, epsilon = 1e-12);
        assert!(a.dot(&original) > 0.0);
    }

    #[test]
    fn zero_vector_normalize_is_noop() {
        let mut a = Vector::default();
        a.normalize();
        assert_eq!(a, Vector::default());
        a.force_magnitude(4.0);
        assert_eq!(a, Vector::default());
    }

    #[test]
    fn force_magnitude_sets_magnitude() {
        let mut a = Vector::new(1.0, 1.0, 1.0);
        a.force_magnitude(6.6);
        assert_relative_eq!(a.magnitude(), 6.6, epsilon = 1e-12);
        assert_relative_eq!(a.x, a.z);
    }

    #[test]
    fn scale_multiplies_components() {
        let mut a = Vector::new(1.0, -2.0, 4.0);
        a.scale(-0.5);
        assert_eq!(a, Vector::new(-0.5, 1.0, -2.0));
    }

    #[test]
    fn diff_mag_is_distance() {
        let a = Vector::new(1.0, 2.0, 3.0);
        let b = Vector::new(4.0, 6.0, 3.0);
        assert_relative_eq!(a.diff_mag(&b), 5.0);
        assert_relative_eq!(b.diff_mag(&a), 5.0);
    }

    #[test]
    fn display_as_list() {
        assert_eq!(Vector::new(1.0, -2.5, 0.0).to_string(), "[1.0, -2.5, 0.0]");
    }

    #[test]
    fn flat_cast() {
        let vs = [Vector::new(1.0, 2.0, 3.0), Vector::new(4.0, 5.0, 6.0)];
        let flat: &[f64] = bytemuck::cast_slice(&vs);
        assert_eq!(flat, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
