//! # Tensor Operations
//!
//! Elementwise arithmetic for Tensors. Binary operations accept operands of
//! identical shape, or a one-element tensor on either side which is broadcast
//! as a scalar.

use super::{Tensor, TensorData, TensorError};
use ndarray::{ArrayD, Zip};

// --- Helper Function for Binary Ops ---

/// Applies `f` elementwise over `a` and `b`, broadcasting a one-element operand.
fn binary_op<F>(op: &str, a: &Tensor, b: &Tensor, f: F) -> Result<Tensor, TensorError>
where
    F: Fn(TensorData, TensorData) -> TensorData,
{
    let a_data = a.data();
    let b_data = b.data();

    let result_data = if a.shape() == b.shape() {
        Zip::from(a_data).and(b_data).map_collect(|&x, &y| f(x, y))
    } else if a.is_scalar() {
        // Scalar (op) Tensor: keep operand order for sub/div
        let scalar_val = *a_data.first().ok_or(TensorError::EmptyScalar)?;
        b_data.mapv(|y| f(scalar_val, y))
    } else if b.is_scalar() {
        let scalar_val = *b_data.first().ok_or(TensorError::EmptyScalar)?;
        a_data.mapv(|x| f(x, scalar_val))
    } else {
        return Err(TensorError::IncompatibleShapes {
            op: op.to_string(),
            shape1: a.shape().to_vec(),
            shape2: b.shape().to_vec(),
        });
    };

    Ok(Tensor::new(result_data))
}

// --- Arithmetic Operations ---

/// Element-wise addition of two tensors.
pub fn add(a: &Tensor, b: &Tensor) -> Result<Tensor, TensorError> {
    binary_op("add", a, b, |x, y| x + y)
}

/// Element-wise subtraction of two tensors (a - b).
pub fn sub(a: &Tensor, b: &Tensor) -> Result<Tensor, TensorError> {
    binary_op("sub", a, b, |x, y| x - y)
}

/// Element-wise multiplication of two tensors.
pub fn mul(a: &Tensor, b: &Tensor) -> Result<Tensor, TensorError> {
    binary_op("mul", a, b, |x, y| x * y)
}

/// Element-wise division of two tensors (a / b). Division by zero follows
/// IEEE-754 (inf / NaN), no error is raised.
pub fn div(a: &Tensor, b: &Tensor) -> Result<Tensor, TensorError> {
    binary_op("div", a, b, |x, y| x / y)
}

// --- Scalar Operations ---

pub fn add_scalar(a: &Tensor, scalar: TensorData) -> Tensor {
    Tensor::new(a.data().mapv(|x| x + scalar))
}

pub fn mul_scalar(a: &Tensor, scalar: TensorData) -> Tensor {
    Tensor::new(a.data().mapv(|x| x * scalar))
}

/// Raises every element to `exponent`.
pub fn powf(a: &Tensor, exponent: TensorData) -> Tensor {
    Tensor::new(a.data().mapv(|x| x.powf(exponent)))
}

/// Element-wise square root.
pub fn sqrt(a: &Tensor) -> Tensor {
    Tensor::new(a.data().mapv(TensorData::sqrt))
}

pub fn neg(a: &Tensor) -> Tensor {
    Tensor::new(a.data().mapv(|x| -x))
}

/// Builds a new tensor from `f(a[i], b[i])`. Shapes must match exactly.
pub fn zip_map<F>(a: &Tensor, b: &Tensor, f: F) -> Result<Tensor, TensorError>
where
    F: Fn(TensorData, TensorData) -> TensorData,
{
    if a.shape() != b.shape() {
        return Err(TensorError::IncompatibleShapes {
            op: "zip_map".to_string(),
            shape1: a.shape().to_vec(),
            shape2: b.shape().to_vec(),
        });
    }
    let result: ArrayD<TensorData> = Zip::from(a.data()).and(b.data()).map_collect(|&x, &y| f(x, y));
    Ok(Tensor::new(result))
}

/// Inner product <a, b> over all elements.
pub fn dot(a: &Tensor, b: &Tensor) -> Result<TensorData, TensorError> {
    if a.shape() != b.shape() {
        return Err(TensorError::IncompatibleShapes {
            op: "dot".to_string(),
            shape1: a.shape().to_vec(),
            shape2: b.shape().to_vec(),
        });
    }
    Ok(Zip::from(a.data()).and(b.data()).fold(0.0, |acc, &x, &y| acc + x * y))
}
