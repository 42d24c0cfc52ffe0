use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("model needs at least one layer")]
    EmptyModel,

    #[error("layer width must be positive")]
    ZeroWidth,

    #[error("layer has no weights yet, initialize it first")]
    Uninitialized,

    #[error("expected {expected} values, but got {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("connection mask has shape {got:?}, but weights have shape {expected:?}")]
    MaskShape {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("target has shape {got:?}, but output has shape {expected:?}")]
    CostShape {
        expected: Vec<usize>,
        got: Vec<usize>,
    },

    #[error("cannot score an empty output")]
    EmptyOutput,

    #[error("layer {index}: {source}")]
    Layer {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Attach the index of the layer which produced this error.
    pub(crate) fn in_layer(self, index: usize) -> Self {
        Error::Layer {
            index,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
