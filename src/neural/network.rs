// Fully connected feed-forward network trained with online backpropagation
// and momentum.

use super::neuron::{Connection, Layer, LayerSpec, Neuron};
use super::NetworkError;
use rand::Rng;

#[derive(Debug, Clone)]
pub struct Network {
    layers: Vec<Layer>,
    /// RMS error of the last `back_prop` call
    error: f64,
}

impl Network {
    /// Build a network with weights drawn uniformly from [0, 1).
    pub fn new<R: Rng>(specs: &[LayerSpec], rng: &mut R) -> Result<Network, NetworkError> {
        Self::build(specs, |_, _, _| Connection::new(rng.gen_range(0.0..1.0)))
    }

    /// Build a network whose connection for (layer, source neuron, destination
    /// neuron) is produced by `connection`. Sources include the bias neuron.
    pub(crate) fn build<F>(specs: &[LayerSpec], mut connection: F) -> Result<Network, NetworkError>
    where
        F: FnMut(usize, usize, usize) -> Connection,
    {
        if specs.len() < 2 || specs.iter().any(|spec| spec.size == 0) {
            return Err(NetworkError::Topology(specs.iter().map(|spec| spec.size).collect()));
        }

        let mut layers = Vec::with_capacity(specs.len());
        for (l, spec) in specs.iter().enumerate() {
            let outputs = specs.get(l + 1).map_or(0, |next| next.size);
            let neurons = (0..=spec.size)
                .map(|n| Neuron::new((0..outputs).map(|k| connection(l, n, k)).collect()))
                .collect();
            layers.push(Layer::new(*spec, neurons));
        }

        Ok(Network { layers, error: 0.0 })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn topology(&self) -> Vec<LayerSpec> {
        self.layers.iter().map(|layer| layer.spec).collect()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].spec.size
    }

    pub fn output_size(&self) -> usize {
        self.output_layer().spec.size
    }

    fn output_layer(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Propagate `inputs` through the network. Read the outputs with `results`.
    pub fn feed_forward(&mut self, inputs: &[f64]) -> Result<(), NetworkError> {
        let expected = self.input_size();
        if inputs.len() != expected {
            return Err(NetworkError::InputSize {
                expected,
                got: inputs.len(),
            });
        }

        for (neuron, &value) in self.layers[0].neurons.iter_mut().zip(inputs) {
            neuron.output = value;
        }

        for l in 1..self.layers.len() {
            let (before, after) = self.layers.split_at_mut(l);
            let prev = &before[l - 1];
            let layer = &mut after[0];
            let activation = layer.spec.activation;

            for (n, neuron) in layer.neurons[..layer.spec.size].iter_mut().enumerate() {
                let sum: f64 = prev
                    .neurons
                    .iter()
                    .map(|source| source.output * source.connections[n].weight)
                    .sum();
                neuron.output = activation.apply(sum);
            }
        }

        Ok(())
    }

    /// Outputs of the last layer, bias excluded.
    pub fn results(&self) -> Vec<f64> {
        let layer = self.output_layer();
        layer.neurons[..layer.spec.size].iter().map(|n| n.output).collect()
    }

    /// One gradient step toward `targets` for the inputs of the last
    /// `feed_forward` call.
    pub fn back_prop(&mut self, targets: &[f64]) -> Result<(), NetworkError> {
        let last = self.layers.len() - 1;
        let expected = self.layers[last].spec.size;
        if targets.len() != expected {
            return Err(NetworkError::TargetSize {
                expected,
                got: targets.len(),
            });
        }

        let output_layer = &mut self.layers[last];
        let activation = output_layer.spec.activation;
        let mut squared = 0.0;
        for (neuron, &target) in output_layer.neurons.iter_mut().zip(targets) {
            let delta = target - neuron.output;
            squared += delta * delta;
            neuron.gradient = delta * activation.derivative(neuron.output);
        }
        self.error = (squared / expected as f64).sqrt();

        // Hidden gradients, last hidden layer first. The bias neuron gets one too.
        for l in (1..last).rev() {
            let (before, after) = self.layers.split_at_mut(l + 1);
            let layer = &mut before[l];
            let next = &after[0];
            let activation = layer.spec.activation;

            for neuron in layer.neurons.iter_mut() {
                let downstream: f64 = next.neurons[..next.spec.size]
                    .iter()
                    .zip(&neuron.connections)
                    .map(|(target, conn)| conn.weight * target.gradient)
                    .sum();
                neuron.gradient = downstream * activation.derivative(neuron.output);
            }
        }

        // Weights change only once every gradient of this pass is final.
        for l in (1..=last).rev() {
            let (before, after) = self.layers.split_at_mut(l);
            let prev = &mut before[l - 1];
            let layer = &after[0];
            let (eta, alpha) = (layer.spec.eta, layer.spec.alpha);

            for (n, neuron) in layer.neurons[..layer.spec.size].iter().enumerate() {
                for source in prev.neurons.iter_mut() {
                    let conn = &mut source.connections[n];
                    let delta = (1.0 - alpha) * eta * source.output * neuron.gradient + alpha * conn.delta_weight;
                    conn.delta_weight = delta;
                    conn.weight += delta;
                }
            }
        }

        Ok(())
    }

    /// RMS error of the most recent `back_prop`
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Feed forward and return the first output.
    pub fn predict(&mut self, inputs: &[f64]) -> Result<f64, NetworkError> {
        self.feed_forward(inputs)?;
        let layer = self.output_layer();
        Ok(layer.neurons[0].output)
    }
}
