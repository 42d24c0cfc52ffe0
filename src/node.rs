use std::{fmt, str::FromStr};

use ndarray::{Array1, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::{
    activation::{Activation, Identity, Relu, Sigmoid, Step},
    error::{Error, Result},
};

/// Kind of the units in a layer. Each kind fixes the activation applied to the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    #[default]
    Perceptron,
    Sigmoid,
    Input,
    Relu,
}

impl Activation for NodeKind {
    fn compute_one(&self, x: f64) -> f64 {
        match self {
            NodeKind::Perceptron => Step.compute_one(x),
            NodeKind::Sigmoid => Sigmoid.compute_one(x),
            NodeKind::Input => Identity.compute_one(x),
            NodeKind::Relu => Relu.compute_one(x),
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Perceptron => "perceptron",
            NodeKind::Sigmoid => "sigmoid",
            NodeKind::Input => "input",
            NodeKind::Relu => "relu",
        };
        f.write_str(name)
    }
}

impl FromStr for NodeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "perceptron" => Ok(NodeKind::Perceptron),
            "sigmoid" => Ok(NodeKind::Sigmoid),
            "input" => Ok(NodeKind::Input),
            "relu" => Ok(NodeKind::Relu),
            other => Err(Error::Config(format!("unknown node kind `{}`", other))),
        }
    }
}

/// A single unit: weighted sum of its inputs plus bias, passed through the activation of `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    kind: NodeKind,
    weights: Array1<f64>,
    bias: f64,
}

impl Node {
    pub fn new(kind: NodeKind, weights: Array1<f64>, bias: f64) -> Self {
        Self {
            kind,
            weights,
            bias,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn forward(&self, inputs: ArrayView1<f64>) -> Result<f64> {
        if inputs.len() != self.weights.len() {
            return Err(Error::ShapeMismatch {
                expected: self.weights.len(),
                got: inputs.len(),
            });
        }
        Ok(self.kind.compute_one(self.weights.dot(&inputs) + self.bias))
    }

    pub fn definition(&self) -> String {
        format!(
            "{}(weights: {}, bias: {})",
            self.kind,
            self.weights.len(),
            self.bias
        )
    }
}
