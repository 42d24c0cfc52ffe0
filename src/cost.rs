use ndarray::{ArrayView, Dimension, Zip};

use crate::error::{Error, Result};

/// Scores a network output against the desired values.
pub trait Cost {
    fn compute<D: Dimension>(output: ArrayView<f64, D>, target: ArrayView<f64, D>) -> Result<Self>
    where
        Self: Sized;

    fn value(&self) -> f64;
}

fn squared_error_sum<D: Dimension>(
    output: &ArrayView<f64, D>,
    target: &ArrayView<f64, D>,
) -> Result<f64> {
    if output.shape() != target.shape() {
        return Err(Error::CostShape {
            expected: output.shape().to_vec(),
            got: target.shape().to_vec(),
        });
    }
    if output.is_empty() {
        return Err(Error::EmptyOutput);
    }

    Ok(Zip::from(output)
        .and(target)
        .fold(0.0, |sum, &output, &target| sum + (output - target).powi(2)))
}

/// Mean of the squared differences over every element.
pub struct MeanSquaredError {
    value: f64,
}

impl Cost for MeanSquaredError {
    fn compute<D: Dimension>(output: ArrayView<f64, D>, target: ArrayView<f64, D>) -> Result<Self> {
        let sum = squared_error_sum(&output, &target)?;
        Ok(Self {
            value: sum / output.len() as f64,
        })
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// Sum of the squared differences over every element.
pub struct SumSquaredError {
    value: f64,
}

impl Cost for SumSquaredError {
    fn compute<D: Dimension>(output: ArrayView<f64, D>, target: ArrayView<f64, D>) -> Result<Self> {
        Ok(Self {
            value: squared_error_sum(&output, &target)?,
        })
    }

    fn value(&self) -> f64 {
        self.value
    }
}
