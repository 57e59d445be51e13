//! Adam optimizer (Adaptive Moment Estimation)

use ndarray::{Array, ArrayD, Dimension, IxDyn, Zip};

/// Adam with one pair of moment estimates per parameter slot.
///
/// Call [`Adam::begin_step`] once per mini-batch, then [`Adam::update`] for
/// every parameter tensor with a stable slot index.
#[derive(Debug, Clone)]
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: u32,
    moments: Vec<Option<(ArrayD<f64>, ArrayD<f64>)>>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            t: 0,
            moments: Vec::new(),
        }
    }

    pub fn with_betas(mut self, beta1: f64, beta2: f64) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Advances the timestep used for bias correction
    pub fn begin_step(&mut self) {
        self.t += 1;
    }

    pub fn timestep(&self) -> u32 {
        self.t
    }

    /// Applies one Adam update to `param` from `grad`
    pub fn update<D: Dimension>(
        &mut self,
        slot: usize,
        param: &mut Array<f64, D>,
        grad: &Array<f64, D>,
    ) {
        let (lr, beta1, beta2, eps) = (self.learning_rate, self.beta1, self.beta2, self.epsilon);
        let t = self.t.max(1) as i32;
        let bias1 = 1.0 - beta1.powi(t);
        let bias2 = 1.0 - beta2.powi(t);

        if self.moments.len() <= slot {
            self.moments.resize_with(slot + 1, || None);
        }
        let (m, v) = self.moments[slot].get_or_insert_with(|| {
            (
                ArrayD::zeros(IxDyn(param.shape())),
                ArrayD::zeros(IxDyn(param.shape())),
            )
        });

        Zip::from(param.view_mut().into_dyn())
            .and(grad.view().into_dyn())
            .and(m.view_mut())
            .and(v.view_mut())
            .for_each(|p, &g, m, v| {
                *m = beta1 * *m + (1.0 - beta1) * g;
                *v = beta2 * *v + (1.0 - beta2) * g * g;
                let m_hat = *m / bias1;
                let v_hat = *v / bias2;
                *p -= lr * m_hat / (v_hat.sqrt() + eps);
            });
    }

    /// Clears moments and timestep
    pub fn reset(&mut self) {
        self.t = 0;
        self.moments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{array, Array1};

    #[test]
    fn test_first_step_moves_by_learning_rate() {
        let mut adam = Adam::new(0.01);
        let mut w = array![[1.0, -1.0], [0.5, 0.0]];
        let grad = array![[2.0, -3.0], [0.1, 0.0]];

        adam.begin_step();
        adam.update(0, &mut w, &grad);

        // bias-corrected first step is lr * sign(g)
        assert_relative_eq!(w[[0, 0]], 0.99, epsilon = 1e-6);
        assert_relative_eq!(w[[0, 1]], -0.99, epsilon = 1e-6);
        assert_relative_eq!(w[[1, 0]], 0.49, epsilon = 1e-6);
        assert_eq!(w[[1, 1]], 0.0);
    }

    #[test]
    fn test_minimizes_quadratic() {
        let mut adam = Adam::new(0.1);
        let mut x: Array1<f64> = array![3.0, -2.0];

        for _ in 0..1000 {
            let grad = &x * 2.0;
            adam.begin_step();
            adam.update(0, &mut x, &grad);
        }

        assert!(x.iter().all(|v| v.abs() < 0.05));
    }

    #[test]
    fn test_slots_are_independent() {
        let mut adam = Adam::new(0.01);
        let mut a = array![1.0];
        let mut b = array![[1.0]];

        adam.begin_step();
        adam.update(0, &mut a, &array![1.0]);
        adam.update(3, &mut b, &array![[-1.0]]);

        assert!(a[0] < 1.0);
        assert!(b[[0, 0]] > 1.0);
        assert_eq!(adam.timestep(), 1);

        adam.reset();
        assert_eq!(adam.timestep(), 0);
    }
}
