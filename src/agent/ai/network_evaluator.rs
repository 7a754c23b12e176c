// Evaluators backed by the neural network, and the dispatch enum an engine
// session builds from its configuration.

use super::evaluation::{Evaluator, EvaluatorKind, MaterialEvaluator, StaticEvaluator};
use super::features::{extract_features, FEATURE_COUNT};
use crate::game_repr::Position;
use crate::neural::{Network, NetworkError};
use log::warn;

/// Checks that `network` maps the position features to a single score.
pub fn check_evaluation_shape(network: &Network) -> Result<(), NetworkError> {
    if network.input_size() != FEATURE_COUNT {
        return Err(NetworkError::InputSize {
            expected: FEATURE_COUNT,
            got: network.input_size(),
        });
    }
    if network.output_size() != 1 {
        return Err(NetworkError::TargetSize {
            expected: 1,
            got: network.output_size(),
        });
    }
    Ok(())
}

/// Scores a position with the network's single output.
pub struct NetworkEvaluator<'a> {
    network: &'a mut Network,
}

impl<'a> NetworkEvaluator<'a> {
    pub fn new(network: &'a mut Network) -> Self {
        Self { network }
    }
}

impl Evaluator<Position> for NetworkEvaluator<'_> {
    fn evaluate(&mut self, pos: &Position) -> f64 {
        self.network
            .predict(&extract_features(pos))
            .unwrap_or_else(|err| {
                warn!("network evaluation failed: {}", err);
                0.0
            })
    }

    fn name(&self) -> &'static str {
        "network"
    }
}

/// `static_weight * static + network_weight * network`
pub struct BlendEvaluator<'a> {
    static_eval: StaticEvaluator,
    network: NetworkEvaluator<'a>,
    static_weight: f64,
    network_weight: f64,
}

impl<'a> BlendEvaluator<'a> {
    pub fn new(network: &'a mut Network, static_weight: f64, network_weight: f64) -> Self {
        Self {
            static_eval: StaticEvaluator::default(),
            network: NetworkEvaluator::new(network),
            static_weight,
            network_weight,
        }
    }
}

impl Evaluator<Position> for BlendEvaluator<'_> {
    fn evaluate(&mut self, pos: &Position) -> f64 {
        self.static_weight * self.static_eval.evaluate(pos) + self.network_weight * self.network.evaluate(pos)
    }

    fn name(&self) -> &'static str {
        "blend"
    }
}

/// The evaluator chosen by `EvaluatorKind`, borrowing the session network.
pub enum SelectedEvaluator<'a> {
    Material(MaterialEvaluator),
    Static(StaticEvaluator),
    Network(NetworkEvaluator<'a>),
    Blend(BlendEvaluator<'a>),
}

impl<'a> SelectedEvaluator<'a> {
    pub fn new(kind: EvaluatorKind, network: &'a mut Network, static_weight: f64, network_weight: f64) -> Self {
        match kind {
            EvaluatorKind::Material => SelectedEvaluator::Material(MaterialEvaluator),
            EvaluatorKind::Static => SelectedEvaluator::Static(StaticEvaluator::default()),
            EvaluatorKind::Network => SelectedEvaluator::Network(NetworkEvaluator::new(network)),
            EvaluatorKind::Blend => {
                SelectedEvaluator::Blend(BlendEvaluator::new(network, static_weight, network_weight))
            }
        }
    }
}

impl Evaluator<Position> for SelectedEvaluator<'_> {
    fn evaluate(&mut self, pos: &Position) -> f64 {
        match self {
            SelectedEvaluator::Material(e) => e.evaluate(pos),
            SelectedEvaluator::Static(e) => e.evaluate(pos),
            SelectedEvaluator::Network(e) => e.evaluate(pos),
            SelectedEvaluator::Blend(e) => e.evaluate(pos),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SelectedEvaluator::Material(e) => e.name(),
            SelectedEvaluator::Static(e) => e.name(),
            SelectedEvaluator::Network(e) => e.name(),
            SelectedEvaluator::Blend(e) => e.name(),
        }
    }
}
