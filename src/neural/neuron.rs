use super::activation::Activation;
use serde::{Deserialize, Serialize};

/// Outgoing edge of a neuron: its weight and the last applied weight change,
/// which feeds the momentum term of the next update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub weight: f64,
    pub delta_weight: f64,
}

impl Connection {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            delta_weight: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Neuron {
    pub(crate) output: f64,
    pub(crate) gradient: f64,
    /// One connection per non-bias neuron of the next layer
    pub(crate) connections: Vec<Connection>,
}

impl Neuron {
    pub fn new(connections: Vec<Connection>) -> Self {
        Self {
            output: 0.0,
            gradient: 0.0,
            connections,
        }
    }

    pub fn output(&self) -> f64 {
        self.output
    }

    pub fn gradient(&self) -> f64 {
        self.gradient
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }
}

/// Shape and hyperparameters of one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    /// Neurons in the layer, not counting the bias neuron
    pub size: usize,
    /// Learning rate applied to the weights entering this layer
    pub eta: f64,
    /// Momentum applied to the weights entering this layer
    pub alpha: f64,
    pub activation: Activation,
}

impl LayerSpec {
    pub fn new(size: usize, eta: f64, alpha: f64, activation: Activation) -> Self {
        Self {
            size,
            eta,
            alpha,
            activation,
        }
    }
}

/// A layer of `spec.size` neurons followed by a bias neuron whose output is
/// pinned to 1.0.
#[derive(Debug, Clone)]
pub struct Layer {
    pub(crate) spec: LayerSpec,
    pub(crate) neurons: Vec<Neuron>,
}

impl Layer {
    pub(crate) fn new(spec: LayerSpec, neurons: Vec<Neuron>) -> Self {
        let mut layer = Self { spec, neurons };
        if let Some(bias) = layer.neurons.last_mut() {
            bias.output = 1.0;
        }
        layer
    }

    pub fn spec(&self) -> &LayerSpec {
        &self.spec
    }

    /// All neurons including the trailing bias neuron
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn bias(&self) -> &Neuron {
        &self.neurons[self.spec.size]
    }
}
