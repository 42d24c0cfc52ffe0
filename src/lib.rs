pub mod activation;
pub mod config;
pub mod cost;
pub mod error;
pub mod layer;
pub mod model;
pub mod node;

pub use config::{LayerConfig, ModelConfig};
pub use error::{Error, Result};
pub use layer::{Connectivity, Layer};
pub use model::Model;
pub use node::{Node, NodeKind};

#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}

#[macro_export]
macro_rules! assert_rel_eq_arr2 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}
