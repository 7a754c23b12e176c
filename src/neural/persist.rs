// Text layout of a trained network:
//
//   <layer count>
//   <size> <eta> <alpha> <activation id>        one line per layer
//   <weight> <delta weight>                     one line per connection
//
// Connections are listed per layer, source neuron major (bias included) and
// destination neuron minor (bias excluded). Floats use Rust's shortest
// round-trip formatting, so save followed by load is bit exact.

use super::neuron::{Connection, LayerSpec};
use super::{Activation, Network, NetworkError};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

impl Network {
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let layers = self.layers();
        writeln!(out, "{}", layers.len())?;
        for layer in layers {
            let spec = layer.spec();
            writeln!(out, "{} {} {} {}", spec.size, spec.eta, spec.alpha, spec.activation.id())?;
        }
        for layer in &layers[..layers.len() - 1] {
            for neuron in layer.neurons() {
                for conn in neuron.connections() {
                    writeln!(out, "{} {}", conn.weight, conn.delta_weight)?;
                }
            }
        }
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), NetworkError> {
        let file = fs::File::create(path)?;
        let mut out = BufWriter::new(file);
        self.write_to(&mut out)?;
        out.flush()?;
        Ok(())
    }

    /// Parse a network from its text layout. Nothing is returned unless the
    /// whole text is valid.
    pub fn parse(text: &str) -> Result<Network, NetworkError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (line_no, header) = lines.next().ok_or_else(|| parse_error(1, "empty network file"))?;
        let layer_count: usize = parse_token(line_no, header, "layer count")?;
        let mut last_line = line_no;

        let mut specs = Vec::new();
        for _ in 0..layer_count {
            let (line_no, line) = lines
                .next()
                .ok_or_else(|| parse_error(last_line + 1, "missing layer description"))?;
            last_line = line_no;
            specs.push(parse_layer(line_no, line)?);
        }

        let mut connections = Vec::new();
        for (l, spec) in specs.iter().enumerate().take(layer_count.saturating_sub(1)) {
            let destinations = specs[l + 1].size;
            let count = spec
                .size
                .checked_add(1)
                .and_then(|sources| sources.checked_mul(destinations))
                .ok_or_else(|| parse_error(last_line + 1, "layer too large"))?;
            for _ in 0..count {
                let (line_no, line) = lines
                    .next()
                    .ok_or_else(|| parse_error(last_line + 1, "truncated connection list"))?;
                last_line = line_no;
                let mut tokens = line.split_whitespace();
                let weight = parse_token(line_no, tokens.next().unwrap_or(""), "weight")?;
                let delta = parse_token(line_no, tokens.next().unwrap_or(""), "delta weight")?;
                if tokens.next().is_some() {
                    return Err(parse_error(line_no, "expected two values per connection"));
                }
                connections.push(Connection {
                    weight,
                    delta_weight: delta,
                });
            }
        }

        if let Some((line_no, _)) = lines.next() {
            return Err(parse_error(line_no, "unexpected trailing data"));
        }

        let mut stored = connections.into_iter();
        Network::build(&specs, |_, _, _| stored.next().unwrap_or(Connection::new(0.0)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Network, NetworkError> {
        let text = fs::read_to_string(path)?;
        Network::parse(&text)
    }
}

fn parse_layer(line_no: usize, line: &str) -> Result<LayerSpec, NetworkError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 4 {
        return Err(parse_error(line_no, "expected `<size> <eta> <alpha> <activation>`"));
    }
    let size = parse_token(line_no, tokens[0], "layer size")?;
    let eta = parse_token(line_no, tokens[1], "eta")?;
    let alpha = parse_token(line_no, tokens[2], "alpha")?;
    let id: u8 = parse_token(line_no, tokens[3], "activation id")?;
    let activation = Activation::from_id(id).ok_or(NetworkError::UnknownActivation(id))?;
    Ok(LayerSpec::new(size, eta, alpha, activation))
}

fn parse_token<T: std::str::FromStr>(line_no: usize, token: &str, what: &str) -> Result<T, NetworkError> {
    token
        .parse()
        .map_err(|_| parse_error(line_no, &format!("invalid {}: {:?}", what, token)))
}

fn parse_error(line: usize, message: &str) -> NetworkError {
    NetworkError::Parse {
        line,
        message: message.to_string(),
    }
}
