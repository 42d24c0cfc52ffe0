use ndarray::{Array, Dimension};

pub trait Activation {
    fn compute_one(&self, x: f64) -> f64;

    fn compute<D: Dimension>(&self, x: &Array<f64, D>) -> Array<f64, D>
    where
        Self: Sized,
    {
        x.mapv(|v| self.compute_one(v))
    }
}

pub struct Identity;

impl Activation for Identity {
    fn compute_one(&self, x: f64) -> f64 {
        x
    }
}

/// Threshold of a perceptron: fires only for a strictly positive input.
pub struct Step;

impl Activation for Step {
    fn compute_one(&self, x: f64) -> f64 {
        if x <= 0.0 {
            0.0
        } else {
            1.0
        }
    }
}

pub struct Sigmoid;

impl Activation for Sigmoid {
    fn compute_one(&self, x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }
}

pub struct Relu;

impl Activation for Relu {
    fn compute_one(&self, x: f64) -> f64 {
        if x > 0.0 {
            x
        } else {
            0.0
        }
    }
}
