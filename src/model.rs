use std::fmt;

use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use ndarray_rand::rand::{thread_rng, Rng};

use crate::{
    config::ModelConfig,
    cost::Cost,
    error::{Error, Result},
    layer::Layer,
};

/// Feed-forward network. The first layer is the input layer, the last one the output layer.
#[derive(Debug)]
pub struct Model {
    layers: Vec<Layer>,
}

impl Model {
    /// Wire `layers` together, drawing weights for every layer which has none yet.
    pub fn new(layers: Vec<Layer>) -> Result<Self> {
        Model::with_rng(layers, &mut thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(mut layers: Vec<Layer>, rng: &mut R) -> Result<Self> {
        if layers.is_empty() {
            return Err(Error::EmptyModel);
        }

        let mut fan_in = None;
        for (index, layer) in layers.iter_mut().enumerate() {
            if !layer.is_initialized() {
                let initialized = match fan_in {
                    None => layer.initialize_input(),
                    Some(fan_in) => layer.initialize_with_rng(fan_in, &mut *rng),
                };
                initialized.map_err(|e| e.in_layer(index))?;
            }
            fan_in = Some(layer.width());
        }

        connect_input(&layers[0]).map_err(|e| e.in_layer(0))?;
        for (index, pair) in layers.windows(2).enumerate() {
            connect(&pair[0], &pair[1]).map_err(|e| e.in_layer(index + 1))?;
        }

        let model = Self { layers };
        debug!("built model with {} layers", model.depth());
        for line in model.details().lines() {
            debug!("  {}", line);
        }
        Ok(model)
    }

    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        Model::new(config.build_layers()?)
    }

    pub fn from_config_with_rng<R: Rng + ?Sized>(config: &ModelConfig, rng: &mut R) -> Result<Self> {
        Model::with_rng(config.build_layers()?, rng)
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn input_layer(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    pub fn input_width(&self) -> usize {
        self.input_layer().width()
    }

    pub fn output_width(&self) -> usize {
        self.output_layer().width()
    }

    /// Evaluate every layer from left to right.
    pub fn forward(&self, input: ArrayView1<f64>) -> Result<Array1<f64>> {
        let mut activations = input.to_owned();
        for (index, layer) in self.layers.iter().enumerate() {
            activations = layer
                .forward(activations.view())
                .map_err(|e| e.in_layer(index))?;
            trace!("layer {}: {}", index, activations);
        }
        Ok(activations)
    }

    /// Same as `forward` with one sample per row of `inputs`.
    pub fn forward_batch(&self, inputs: ArrayView2<f64>) -> Result<Array2<f64>> {
        let mut activations = inputs.to_owned();
        for (index, layer) in self.layers.iter().enumerate() {
            activations = layer
                .forward_batch(activations.view())
                .map_err(|e| e.in_layer(index))?;
            trace!("layer {}: {}", index, activations);
        }
        Ok(activations)
    }

    /// Activations of every layer, in order. The last item equals `forward(input)`.
    pub fn trace(&self, input: ArrayView1<f64>) -> Result<Vec<Array1<f64>>> {
        let mut outputs: Vec<Array1<f64>> = Vec::with_capacity(self.depth());
        for (index, layer) in self.layers.iter().enumerate() {
            let output = match outputs.last() {
                Some(previous) => layer.forward(previous.view()),
                None => layer.forward(input),
            }
            .map_err(|e| e.in_layer(index))?;
            outputs.push(output);
        }
        Ok(outputs)
    }

    /// Run `input` through the model and score the output against `target`.
    pub fn cost<C: Cost>(&self, input: ArrayView1<f64>, target: ArrayView1<f64>) -> Result<C> {
        let output = self.forward(input)?;
        C::compute(output.view(), target)
    }

    pub fn details(&self) -> String {
        self.layers
            .iter()
            .map(Layer::definition)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.details())
    }
}

fn connect_input(input: &Layer) -> Result<()> {
    match input.fan_in() {
        Some(fan_in) if fan_in == input.width() => Ok(()),
        Some(fan_in) => Err(Error::ShapeMismatch {
            expected: input.width(),
            got: fan_in,
        }),
        None => Err(Error::Uninitialized),
    }
}

/// Check that `next` reads exactly as many values as `previous` produces.
fn connect(previous: &Layer, next: &Layer) -> Result<()> {
    match next.fan_in() {
        Some(fan_in) if fan_in == previous.width() => Ok(()),
        Some(fan_in) => Err(Error::ShapeMismatch {
            expected: previous.width(),
            got: fan_in,
        }),
        None => Err(Error::Uninitialized),
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        assert_rel_eq_arr1, assert_rel_eq_arr2,
        cost::MeanSquaredError,
        node::NodeKind,
    };

    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};
    use ndarray_rand::rand::{rngs::StdRng, SeedableRng};

    fn small_model() -> Model {
        let hidden = Layer::new(2, NodeKind::Sigmoid)
            .with_parameters(arr2(&[[1.0, -1.0], [0.5, 0.5]]), arr1(&[0.0, -0.5]))
            .unwrap();
        let output = Layer::new(1, NodeKind::Sigmoid)
            .with_parameters(arr2(&[[1.0, -1.0]]), arr1(&[0.0]))
            .unwrap();
        Model::new(vec![Layer::new(2, NodeKind::Input), hidden, output]).unwrap()
    }

    #[test]
    fn forward_through_layers() {
        let model = small_model();
        let output = model.forward(arr1(&[1.0, 1.0]).view()).unwrap();
        assert_rel_eq_arr1!(output, arr1(&[0.469423368982364]));
    }

    #[test]
    fn trace_keeps_every_layer() {
        let model = small_model();
        let outputs = model.trace(arr1(&[1.0, 1.0]).view()).unwrap();
        assert_eq!(3, outputs.len());
        assert_rel_eq_arr1!(outputs[0], arr1(&[1.0, 1.0]));
        assert_rel_eq_arr1!(outputs[1], arr1(&[0.5, 0.6224593312018546]));
        assert_rel_eq_arr1!(outputs[2], arr1(&[0.469423368982364]));
    }

    #[test]
    fn forward_batch_matches_forward() {
        let model = small_model();
        let inputs = arr2(&[[1.0, 1.0], [0.5, -2.0], [0.0, 0.0]]);
        let outputs = model.forward_batch(inputs.view()).unwrap();
        assert_eq!((3, 1), outputs.dim());
        for (input, output) in inputs.rows().into_iter().zip(outputs.rows()) {
            assert_rel_eq_arr1!(model.forward(input).unwrap(), output.to_owned());
        }
    }

    #[test]
    fn initialize_from_previous_width() {
        let layers = vec![
            Layer::new(5, NodeKind::Input),
            Layer::new(4, NodeKind::Sigmoid),
            Layer::new(3, NodeKind::Perceptron),
        ];
        let model = Model::with_rng(layers, &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(3, model.depth());
        assert_eq!(5, model.input_width());
        assert_eq!(3, model.output_width());

        assert_rel_eq_arr2!(
            model.input_layer().weights().unwrap().clone(),
            Array2::<f64>::eye(5)
        );
        assert_eq!((4, 5), model.layers()[1].weights().unwrap().dim());
        assert_eq!((3, 4), model.output_layer().weights().unwrap().dim());

        let output = model.forward(Array1::ones(5).view()).unwrap();
        assert_eq!(3, output.len());
        assert!(output.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn same_seed_gives_same_model() {
        let build = || {
            let layers = vec![
                Layer::new(3, NodeKind::Input),
                Layer::new(6, NodeKind::Relu),
                Layer::new(2, NodeKind::Sigmoid),
            ];
            Model::with_rng(layers, &mut StdRng::seed_from_u64(7)).unwrap()
        };
        let input = arr1(&[0.3, -0.2, 0.9]);
        let first = build().forward(input.view()).unwrap();
        let second = build().forward(input.view()).unwrap();
        assert_rel_eq_arr1!(first, second);
    }

    #[test]
    fn empty_model_is_rejected() {
        assert!(matches!(Model::new(Vec::new()), Err(Error::EmptyModel)));
    }

    #[test]
    fn zero_width_layer_is_reported_with_index() {
        let layers = vec![
            Layer::new(2, NodeKind::Input),
            Layer::new(0, NodeKind::Sigmoid),
        ];
        match Model::new(layers) {
            Err(Error::Layer { index, source }) => {
                assert_eq!(1, index);
                assert!(matches!(*source, Error::ZeroWidth));
            }
            _ => panic!("expected a layer error"),
        }
    }

    #[test]
    fn mismatched_parameters_fail_to_connect() {
        let hidden = Layer::new(2, NodeKind::Sigmoid)
            .with_parameters(Array2::zeros((2, 3)), Array1::zeros(2))
            .unwrap();
        match Model::new(vec![Layer::new(4, NodeKind::Input), hidden]) {
            Err(Error::Layer { index, source }) => {
                assert_eq!(1, index);
                assert!(matches!(
                    *source,
                    Error::ShapeMismatch {
                        expected: 4,
                        got: 3
                    }
                ));
            }
            _ => panic!("expected a layer error"),
        }
    }

    #[test]
    fn input_length_must_match_input_layer() {
        let model = small_model();
        match model.forward(arr1(&[1.0, 1.0, 1.0]).view()) {
            Err(Error::Layer { index, source }) => {
                assert_eq!(0, index);
                assert!(matches!(
                    *source,
                    Error::ShapeMismatch {
                        expected: 2,
                        got: 3
                    }
                ));
            }
            _ => panic!("expected a layer error"),
        }
    }

    #[test]
    fn input_layer_parameters_must_be_square() {
        let input = Layer::new(3, NodeKind::Input)
            .with_parameters(Array2::zeros((3, 2)), Array1::zeros(3))
            .unwrap();
        let err = Model::new(vec![input, Layer::new(2, NodeKind::Sigmoid)]).unwrap_err();
        match err {
            Error::Layer { index, source } => {
                assert_eq!(0, index);
                assert!(matches!(
                    *source,
                    Error::ShapeMismatch {
                        expected: 3,
                        got: 2
                    }
                ));
            }
            other => panic!("expected a layer error, got {:?}", other),
        }
    }

    #[test]
    fn batch_columns_must_match_input_layer() {
        let model = small_model();
        let inputs = Array2::zeros((4, 3));
        match model.forward_batch(inputs.view()).unwrap_err() {
            Error::Layer { index, source } => {
                assert_eq!(0, index);
                assert!(matches!(
                    *source,
                    Error::ShapeMismatch {
                        expected: 2,
                        got: 3
                    }
                ));
            }
            other => panic!("expected a layer error, got {:?}", other),
        }
    }

    #[test]
    fn model_is_debug_printable() {
        let model = small_model();
        assert!(format!("{:?}", model).starts_with("Model { layers: ["));
    }

    #[test]
    fn cost_of_forward_output() {
        let model = small_model();
        let cost: MeanSquaredError = model
            .cost(arr1(&[1.0, 1.0]).view(), arr1(&[1.0]).view())
            .unwrap();
        assert_relative_eq!((1.0 - 0.469423368982364f64).powi(2), cost.value());
    }

    #[test]
    fn details_lists_each_layer() {
        let model = small_model();
        let details = model.details();
        let lines = details.lines().collect::<Vec<_>>();
        assert_eq!(3, lines.len());
        assert_eq!(
            "Width: 2, Function: input, Fully Connected: true, Sample Node: input(weights: 2, bias: 0)",
            lines[0]
        );
        assert!(lines[2].starts_with("Width: 1, Function: sigmoid"));
        assert_eq!(details, model.to_string());
    }
}
