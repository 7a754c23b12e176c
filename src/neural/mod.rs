// Feed-forward neural network used as a learned position evaluator
//
// Layers are fully connected, every layer carries a bias neuron pinned to 1.0,
// and training is online backpropagation with per-layer learning rate and
// momentum. Networks persist to a small line-oriented text format.

mod activation;
mod network;
mod neuron;
mod persist;

pub use activation::Activation;
pub use network::Network;
pub use neuron::{Connection, Layer, LayerSpec, Neuron};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("a network needs at least two non-empty layers, got sizes {0:?}")]
    Topology(Vec<usize>),

    #[error("expected {expected} inputs, got {got}")]
    InputSize { expected: usize, got: usize },

    #[error("expected {expected} targets, got {got}")]
    TargetSize { expected: usize, got: usize },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unknown activation id {0}")]
    UnknownActivation(u8),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
