use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    layer::{Connectivity, Layer},
    node::NodeKind,
};

fn fully_connected_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub width: usize,
    #[serde(default)]
    pub node: NodeKind,
    /// When false, node `i` reads only node `i` of the previous layer.
    #[serde(default = "fully_connected_default")]
    pub fully_connected: bool,
}

/// Layer description of a model, e.g.
///
/// ```json
/// { "layers": [{ "width": 3, "node": "input" }, { "width": 2, "node": "sigmoid" }] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub layers: Vec<LayerConfig>,
}

impl ModelConfig {
    /// The first width becomes an input layer, the others use `node`.
    pub fn from_widths(widths: &[usize], node: NodeKind) -> Self {
        let layers = widths
            .iter()
            .enumerate()
            .map(|(index, &width)| LayerConfig {
                width,
                node: if index == 0 { NodeKind::Input } else { node },
                fully_connected: true,
            })
            .collect();
        Self { layers }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        ModelConfig::from_json_str(&json)
    }

    pub fn build_layers(&self) -> Result<Vec<Layer>> {
        let mut previous_width = None;
        let mut layers = Vec::with_capacity(self.layers.len());
        for (index, config) in self.layers.iter().enumerate() {
            let layer = if config.fully_connected {
                Layer::new(config.width, config.node)
            } else {
                // The input layer is read one-to-one in any case.
                if let Some(previous) = previous_width.filter(|&w| w != config.width) {
                    return Err(Error::Config(format!(
                        "layer {} is not fully connected, so its width must equal the previous width {}, got {}",
                        index, previous, config.width
                    )));
                }
                Layer::with_connectivity(
                    config.width,
                    config.node,
                    Connectivity::one_to_one(config.width),
                )
            };
            layers.push(layer);
            previous_width = Some(config.width);
        }
        Ok(layers)
    }
}
