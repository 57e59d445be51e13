//! Dense layers, activations and weight initialization

use super::config::WeightInit;
use crate::error::{ForecastError, Result};
use ndarray::{Array1, Array2, Axis};
use ndarray_rand::rand_distr::{Normal, Uniform};
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;

/// Activation applied after the affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Activation {
    Linear,
    ReLU,
    Sigmoid,
    Tanh,
}

impl Activation {
    pub fn apply(&self, z: &Array1<f64>) -> Array1<f64> {
        match self {
            Activation::Linear => z.clone(),
            Activation::ReLU => z.mapv(|v| v.max(0.0)),
            Activation::Sigmoid => z.mapv(sigmoid),
            Activation::Tanh => z.mapv(f64::tanh),
        }
    }

    /// Derivative evaluated at the pre-activation `z`
    pub fn derivative(&self, z: &Array1<f64>) -> Array1<f64> {
        match self {
            Activation::Linear => Array1::ones(z.len()),
            Activation::ReLU => z.mapv(|v| if v > 0.0 { 1.0 } else { 0.0 }),
            Activation::Sigmoid => z.mapv(|v| {
                let s = sigmoid(v);
                s * (1.0 - s)
            }),
            Activation::Tanh => z.mapv(|v| 1.0 - v.tanh().powi(2)),
        }
    }
}

pub(crate) fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

/// Random `(rows, cols)` matrix for a layer with the given fan-in/fan-out
pub(crate) fn init_matrix(
    rows: usize,
    cols: usize,
    fan_in: usize,
    fan_out: usize,
    init: WeightInit,
    rng: &mut StdRng,
) -> Result<Array2<f64>> {
    let shape = (rows, cols);
    let matrix = match init {
        WeightInit::Xavier => {
            let limit = (6.0 / (fan_in + fan_out) as f64).sqrt();
            Array2::random_using(shape, Uniform::new(-limit, limit), rng)
        }
        WeightInit::He => {
            let limit = (6.0 / fan_in as f64).sqrt();
            Array2::random_using(shape, Uniform::new(-limit, limit), rng)
        }
        WeightInit::Normal { mean, std } => {
            let dist = Normal::new(mean, std)
                .map_err(|e| ForecastError::InvalidInput(format!("normal init: {}", e)))?;
            Array2::random_using(shape, dist, rng)
        }
        WeightInit::Uniform { low, high } => {
            if !(low < high) {
                return Err(ForecastError::InvalidInput(format!(
                    "uniform init needs low < high, got [{}, {})",
                    low, high
                )));
            }
            Array2::random_using(shape, Uniform::new(low, high), rng)
        }
    };
    Ok(matrix)
}

/// Values kept from a forward pass for back-propagation
#[derive(Debug, Clone)]
pub struct DenseCache {
    pub input: Array1<f64>,
    pub z: Array1<f64>,
}

/// Fully connected layer: `activation(W x + b)`
#[derive(Debug, Clone)]
pub struct Dense {
    /// `(output, input)`
    pub weights: Array2<f64>,
    pub biases: Array1<f64>,
    pub activation: Activation,
}

impl Dense {
    pub fn new(
        input_size: usize,
        output_size: usize,
        activation: Activation,
        init: WeightInit,
        rng: &mut StdRng,
    ) -> Result<Self> {
        Ok(Self {
            weights: init_matrix(output_size, input_size, input_size, output_size, init, rng)?,
            biases: Array1::zeros(output_size),
            activation,
        })
    }

    pub fn forward(&self, input: &Array1<f64>) -> Array1<f64> {
        self.activation.apply(&(self.weights.dot(input) + &self.biases))
    }

    pub fn forward_cached(&self, input: &Array1<f64>) -> (Array1<f64>, DenseCache) {
        let z = self.weights.dot(input) + &self.biases;
        let output = self.activation.apply(&z);
        (
            output,
            DenseCache {
                input: input.clone(),
                z,
            },
        )
    }

    /// Returns `(input_gradient, weight_gradient, bias_gradient)`
    pub fn backward(
        &self,
        cache: &DenseCache,
        output_gradient: &Array1<f64>,
    ) -> (Array1<f64>, Array2<f64>, Array1<f64>) {
        let delta = output_gradient * &self.activation.derivative(&cache.z);
        let weight_gradient = outer(&delta, &cache.input);
        let input_gradient = self.weights.t().dot(&delta);
        (input_gradient, weight_gradient, delta)
    }

    pub fn num_parameters(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

/// `a b^T`
pub(crate) fn outer(a: &Array1<f64>, b: &Array1<f64>) -> Array2<f64> {
    a.view()
        .insert_axis(Axis(1))
        .dot(&b.view().insert_axis(Axis(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::SeedableRng;

    #[test]
    fn test_layer_creation() {
        let mut rng = StdRng::seed_from_u64(1);
        let layer = Dense::new(10, 5, Activation::ReLU, WeightInit::Xavier, &mut rng).unwrap();
        assert_eq!(layer.weights.dim(), (5, 10));
        assert_eq!(layer.biases.len(), 5);
        assert_eq!(layer.num_parameters(), 55);

        let limit = (6.0_f64 / 15.0).sqrt();
        assert!(layer.weights.iter().all(|w| w.abs() <= limit));
    }

    #[test]
    fn test_forward_and_backward() {
        let layer = Dense {
            weights: array![[1.0, -2.0], [0.5, 0.5]],
            biases: array![0.0, -1.0],
            activation: Activation::ReLU,
        };
        let input = array![1.0, 1.0];

        let (output, cache) = layer.forward_cached(&input);
        // z = [-1.0, 0.0] -> relu -> [0, 0]
        assert_eq!(output, array![0.0, 0.0]);
        assert_eq!(layer.forward(&input), output);

        let layer = Dense {
            activation: Activation::Linear,
            ..layer
        };
        let (_, cache_linear) = layer.forward_cached(&input);
        let (dx, dw, db) = layer.backward(&cache_linear, &array![1.0, 2.0]);
        assert_eq!(db, array![1.0, 2.0]);
        assert_eq!(dw, array![[1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(dx, array![2.0, -1.0]);
        assert_eq!(cache.z, array![-1.0, 0.0]);
    }

    #[test]
    fn test_activation_derivatives() {
        let z = array![-0.7, 0.3, 1.2];
        let h = 1e-6;
        for act in [Activation::Sigmoid, Activation::Tanh, Activation::Linear] {
            let analytic = act.derivative(&z);
            let numeric = (act.apply(&(&z + h)) - act.apply(&(&z - h))) / (2.0 * h);
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                assert_relative_eq!(*a, *n, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_seeded_init_is_reproducible() {
        let a = init_matrix(4, 3, 3, 4, WeightInit::He, &mut StdRng::seed_from_u64(9)).unwrap();
        let b = init_matrix(4, 3, 3, 4, WeightInit::He, &mut StdRng::seed_from_u64(9)).unwrap();
        assert_eq!(a, b);

        let bad = init_matrix(
            2,
            2,
            2,
            2,
            WeightInit::Uniform { low: 1.0, high: 0.0 },
            &mut StdRng::seed_from_u64(1),
        );
        assert!(bad.is_err());
    }
}
