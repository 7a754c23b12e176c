use serde::{Deserialize, Serialize};

/// Negative-side slope of the leaky ReLU
const LEAKY_SLOPE: f64 = 0.01;
/// Saturation value of the ELU for large negative inputs
const ELU_ALPHA: f64 = 0.1;

/// Transfer functions available to a layer.
///
/// The numeric ids are part of the persisted network format and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Sigmoid,
    Tanh,
    /// `1.7 tanh(2x/3) + 0.05x`, a tanh that keeps a small slope when saturated
    ScaledTanh,
    Relu,
    LeakyRelu,
    Elu,
}

impl Activation {
    pub fn all() -> &'static [Activation] {
        &[
            Activation::Sigmoid,
            Activation::Tanh,
            Activation::ScaledTanh,
            Activation::Relu,
            Activation::LeakyRelu,
            Activation::Elu,
        ]
    }

    pub fn id(self) -> u8 {
        match self {
            Activation::Sigmoid => 0,
            Activation::Tanh => 1,
            Activation::ScaledTanh => 2,
            Activation::Relu => 3,
            Activation::LeakyRelu => 4,
            Activation::Elu => 5,
        }
    }

    pub fn from_id(id: u8) -> Option<Activation> {
        Activation::all().get(id as usize).copied()
    }

    pub fn apply(self, x: f64) -> f64 {
        match self {
            Activation::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::ScaledTanh => 1.7 * (2.0 * x / 3.0).tanh() + 0.05 * x,
            Activation::Relu => x.max(0.0),
            Activation::LeakyRelu => {
                if x > 0.0 {
                    x
                } else {
                    LEAKY_SLOPE * x
                }
            }
            Activation::Elu => {
                if x > 0.0 {
                    x
                } else {
                    ELU_ALPHA * (x.exp() - 1.0)
                }
            }
        }
    }

    /// Closed-form derivative, evaluated at a neuron's output value.
    pub fn derivative(self, y: f64) -> f64 {
        match self {
            Activation::Sigmoid => {
                let e = (-y).exp();
                e / ((1.0 + e) * (1.0 + e))
            }
            Activation::Tanh => 1.0 - y.tanh().powi(2),
            Activation::ScaledTanh => 1.7 * (1.0 - (2.0 * y / 3.0).tanh().powi(2)) + 0.05,
            Activation::Relu => {
                if y > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Activation::LeakyRelu => {
                if y > 0.0 {
                    1.0
                } else {
                    LEAKY_SLOPE
                }
            }
            Activation::Elu => {
                if y > 0.0 {
                    1.0
                } else {
                    ELU_ALPHA * y.exp()
                }
            }
        }
    }
}
