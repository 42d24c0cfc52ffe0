use std::fmt;

use ndarray::{Array, Array1, Array2, ArrayView1, ArrayView2, Zip};
use ndarray_rand::rand::{thread_rng, Rng};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

use crate::{
    activation::Activation,
    error::{Error, Result},
    node::{Node, NodeKind},
};

/// Which nodes of the previous layer each node of a layer reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum Connectivity {
    Full,
    /// Node `i` reads previous node `j` iff `mask[[i, j]]` is true.
    Masked(Array2<bool>),
}

impl Connectivity {
    /// Node `i` reads only node `i` of the previous layer.
    pub fn one_to_one(width: usize) -> Self {
        Connectivity::Masked(Array2::from_shape_fn((width, width), |(i, j)| i == j))
    }

    pub fn is_full(&self) -> bool {
        matches!(self, Connectivity::Full)
    }
}

#[derive(Debug)]
struct Parameters {
    // (width, fan_in)
    weights: Array2<f64>,
    bias: Array1<f64>,
}

#[derive(Debug)]
pub struct Layer {
    width: usize,
    kind: NodeKind,
    connectivity: Connectivity,
    parameters: Option<Parameters>,
}

impl Layer {
    pub fn new(width: usize, kind: NodeKind) -> Self {
        Layer::with_connectivity(width, kind, Connectivity::Full)
    }

    /// Create a layer which is not fully connected to its predecessor.
    /// `mask` must have the shape `(width, previous layer width)`.
    pub fn masked(width: usize, kind: NodeKind, mask: Array2<bool>) -> Self {
        Layer::with_connectivity(width, kind, Connectivity::Masked(mask))
    }

    pub fn with_connectivity(width: usize, kind: NodeKind, connectivity: Connectivity) -> Self {
        Self {
            width,
            kind,
            connectivity,
            parameters: None,
        }
    }

    /// Install explicit weights of shape `(width, fan_in)` and a bias of length `width`.
    pub fn with_parameters(mut self, weights: Array2<f64>, bias: Array1<f64>) -> Result<Self> {
        self.install(weights, bias)?;
        Ok(self)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn is_initialized(&self) -> bool {
        self.parameters.is_some()
    }

    /// Width of the previous layer, known once weights are in place.
    pub fn fan_in(&self) -> Option<usize> {
        self.parameters.as_ref().map(|p| p.weights.ncols())
    }

    pub fn weights(&self) -> Option<&Array2<f64>> {
        self.parameters.as_ref().map(|p| &p.weights)
    }

    pub fn bias(&self) -> Option<&Array1<f64>> {
        self.parameters.as_ref().map(|p| &p.bias)
    }

    /// Draw weights from `Uniform(-1, 1)` for a predecessor of width `fan_in`. Bias starts at zero.
    pub fn initialize(&mut self, fan_in: usize) -> Result<()> {
        self.initialize_with_rng(fan_in, &mut thread_rng())
    }

    pub fn initialize_with_rng<R: Rng + ?Sized>(&mut self, fan_in: usize, rng: &mut R) -> Result<()> {
        let weights = Array::random_using((self.width, fan_in), Uniform::new(-1.0, 1.0), rng);
        let bias = Array1::zeros(self.width);
        self.install(weights, bias)
    }

    /// Input layers receive one value per node, so every node has a single unit weight.
    pub fn initialize_input(&mut self) -> Result<()> {
        self.install(Array2::eye(self.width), Array1::zeros(self.width))
    }

    fn install(&mut self, mut weights: Array2<f64>, bias: Array1<f64>) -> Result<()> {
        if self.width == 0 {
            return Err(Error::ZeroWidth);
        }
        if weights.nrows() != self.width {
            return Err(Error::ShapeMismatch {
                expected: self.width,
                got: weights.nrows(),
            });
        }
        if bias.len() != self.width {
            return Err(Error::ShapeMismatch {
                expected: self.width,
                got: bias.len(),
            });
        }
        if let Connectivity::Masked(mask) = &self.connectivity {
            if mask.dim() != weights.dim() {
                return Err(Error::MaskShape {
                    expected: weights.dim(),
                    got: mask.dim(),
                });
            }
            Zip::from(&mut weights).and(mask).for_each(|w, &connected| {
                if !connected {
                    *w = 0.0;
                }
            });
        }

        self.parameters = Some(Parameters { weights, bias });
        Ok(())
    }

    fn parameters(&self) -> Result<&Parameters> {
        self.parameters.as_ref().ok_or(Error::Uninitialized)
    }

    pub fn forward(&self, inputs: ArrayView1<f64>) -> Result<Array1<f64>> {
        let parameters = self.parameters()?;
        if inputs.len() != parameters.weights.ncols() {
            return Err(Error::ShapeMismatch {
                expected: parameters.weights.ncols(),
                got: inputs.len(),
            });
        }

        let dot_products = parameters.weights.dot(&inputs) + &parameters.bias;
        Ok(self.kind.compute(&dot_products))
    }

    /// `inputs` is `(batch_size, fan_in)`, the result is `(batch_size, width)`.
    pub fn forward_batch(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>> {
        let parameters = self.parameters()?;
        if inputs.ncols() != parameters.weights.ncols() {
            return Err(Error::ShapeMismatch {
                expected: parameters.weights.ncols(),
                got: inputs.ncols(),
            });
        }

        let dot_products = inputs.dot(&parameters.weights.t()) + &parameters.bias;
        Ok(self.kind.compute(&dot_products))
    }

    pub fn node(&self, index: usize) -> Option<Node> {
        let parameters = self.parameters.as_ref()?;
        if index >= self.width {
            return None;
        }
        Some(Node::new(
            self.kind,
            parameters.weights.row(index).to_owned(),
            parameters.bias[index],
        ))
    }

    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.width).filter_map(move |index| self.node(index))
    }

    pub fn definition(&self) -> String {
        let sample = self
            .node(0)
            .map(|node| node.definition())
            .unwrap_or_else(|| "uninitialized".to_string());
        format!(
            "Width: {}, Function: {}, Fully Connected: {}, Sample Node: {}",
            self.width,
            self.kind,
            self.connectivity.is_full(),
            sample
        )
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.definition())
    }
}
