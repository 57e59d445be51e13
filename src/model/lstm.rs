//! LSTM regressor trained with back-propagation through time

use super::config::ModelConfig;
use super::layers::{init_matrix, outer, sigmoid, Activation, Dense, DenseCache};
use super::optimizer::Adam;
use super::{SequenceRegressor, TrainingReport};
use crate::error::{ForecastError, Result};
use crate::forecast::CancelToken;
use crate::preprocessing::TrainingExample;
use crate::utils::{directional_accuracy, mae, r2_score, rmse};
use indicatif::{ProgressBar, ProgressStyle};
use ndarray::{s, Array1, Array2};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// LSTM cell with the four gates fused into one weight pair.
///
/// Rows of `w_x`, `w_h` and `b` come in blocks of `hidden_size`:
/// input gate, forget gate, cell candidate, output gate.
#[derive(Debug, Clone)]
struct LstmCell {
    hidden_size: usize,
    /// `(4H, input)`
    w_x: Array2<f64>,
    /// `(4H, H)`
    w_h: Array2<f64>,
    /// `(4H)`
    b: Array1<f64>,
}

/// Activations of one time step, kept for BPTT
#[derive(Debug, Clone)]
struct StepCache {
    x: Array1<f64>,
    h_prev: Array1<f64>,
    c_prev: Array1<f64>,
    i: Array1<f64>,
    f: Array1<f64>,
    g: Array1<f64>,
    o: Array1<f64>,
    c: Array1<f64>,
    tanh_c: Array1<f64>,
    h: Array1<f64>,
}

impl LstmCell {
    fn new(
        input_size: usize,
        hidden_size: usize,
        config: &ModelConfig,
        rng: &mut StdRng,
    ) -> Result<Self> {
        let gates = 4 * hidden_size;
        let w_x = init_matrix(gates, input_size, input_size, hidden_size, config.weight_init, rng)?;
        let w_h = init_matrix(gates, hidden_size, hidden_size, hidden_size, config.weight_init, rng)?;

        // Forget gate starts open
        let mut b = Array1::zeros(gates);
        b.slice_mut(s![hidden_size..2 * hidden_size]).fill(1.0);

        Ok(Self {
            hidden_size,
            w_x,
            w_h,
            b,
        })
    }

    fn step(&self, x: Array1<f64>, h_prev: Array1<f64>, c_prev: Array1<f64>) -> StepCache {
        let hs = self.hidden_size;
        let z = self.w_x.dot(&x) + self.w_h.dot(&h_prev) + &self.b;

        let i = z.slice(s![0..hs]).mapv(sigmoid);
        let f = z.slice(s![hs..2 * hs]).mapv(sigmoid);
        let g = z.slice(s![2 * hs..3 * hs]).mapv(f64::tanh);
        let o = z.slice(s![3 * hs..]).mapv(sigmoid);

        // c = f * c_prev + i * g, h = o * tanh(c)
        let c = &f * &c_prev + &i * &g;
        let tanh_c = c.mapv(f64::tanh);
        let h = &o * &tanh_c;

        StepCache {
            x,
            h_prev,
            c_prev,
            i,
            f,
            g,
            o,
            c,
            tanh_c,
            h,
        }
    }

    fn num_parameters(&self) -> usize {
        self.w_x.len() + self.w_h.len() + self.b.len()
    }
}

/// Everything a backward pass needs from one forward pass
struct ForwardCache {
    steps: Vec<StepCache>,
    hidden: DenseCache,
    output: DenseCache,
}

/// Accumulated gradients, one tensor per parameter
#[derive(Debug, Clone)]
struct Gradients {
    w_x: Array2<f64>,
    w_h: Array2<f64>,
    b: Array1<f64>,
    w1: Array2<f64>,
    b1: Array1<f64>,
    w2: Array2<f64>,
    b2: Array1<f64>,
}

impl Gradients {
    fn zeros_like(model: &LstmRegressor) -> Self {
        Self {
            w_x: Array2::zeros(model.cell.w_x.raw_dim()),
            w_h: Array2::zeros(model.cell.w_h.raw_dim()),
            b: Array1::zeros(model.cell.b.len()),
            w1: Array2::zeros(model.hidden.weights.raw_dim()),
            b1: Array1::zeros(model.hidden.biases.len()),
            w2: Array2::zeros(model.output.weights.raw_dim()),
            b2: Array1::zeros(model.output.biases.len()),
        }
    }

    fn norm(&self) -> f64 {
        let sum_sq = self.w_x.mapv(|v| v * v).sum()
            + self.w_h.mapv(|v| v * v).sum()
            + self.b.mapv(|v| v * v).sum()
            + self.w1.mapv(|v| v * v).sum()
            + self.b1.mapv(|v| v * v).sum()
            + self.w2.mapv(|v| v * v).sum()
            + self.b2.mapv(|v| v * v).sum();
        sum_sq.sqrt()
    }

    fn scale(&mut self, factor: f64) {
        self.w_x *= factor;
        self.w_h *= factor;
        self.b *= factor;
        self.w1 *= factor;
        self.b1 *= factor;
        self.w2 *= factor;
        self.b2 *= factor;
    }
}

/// `LSTM(hidden) -> Dense(dense, ReLU) -> Dense(1)` over a univariate window.
///
/// Each instance owns its random generator: a fixed `seed` in the
/// [`ModelConfig`] reproduces both the initial weights and the batch order.
#[derive(Debug, Clone)]
pub struct LstmRegressor {
    config: ModelConfig,
    cell: LstmCell,
    hidden: Dense,
    output: Dense,
    rng: StdRng,
    loss_history: Vec<f64>,
}

impl LstmRegressor {
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let cell = LstmCell::new(1, config.hidden_size, &config, &mut rng)?;
        let hidden = Dense::new(
            config.hidden_size,
            config.dense_size,
            Activation::ReLU,
            config.weight_init,
            &mut rng,
        )?;
        let output = Dense::new(
            config.dense_size,
            1,
            Activation::Linear,
            config.weight_init,
            &mut rng,
        )?;

        Ok(Self {
            config,
            cell,
            hidden,
            output,
            rng,
            loss_history: Vec::new(),
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Mean training loss of every finished epoch
    pub fn loss_history(&self) -> &[f64] {
        &self.loss_history
    }

    pub fn num_parameters(&self) -> usize {
        self.cell.num_parameters() + self.hidden.num_parameters() + self.output.num_parameters()
    }

    fn forward_sample(&self, window: &Array1<f64>) -> (f64, ForwardCache) {
        let hs = self.cell.hidden_size;
        let mut h = Array1::zeros(hs);
        let mut c = Array1::zeros(hs);
        let mut steps = Vec::with_capacity(window.len());

        for &value in window.iter() {
            let step = self.cell.step(Array1::from_elem(1, value), h, c);
            h = step.h.clone();
            c = step.c.clone();
            steps.push(step);
        }

        let (dense_out, hidden) = self.hidden.forward_cached(&h);
        let (out, output) = self.output.forward_cached(&dense_out);

        (
            out[0],
            ForwardCache {
                steps,
                hidden,
                output,
            },
        )
    }

    fn backward_sample(&self, cache: &ForwardCache, dy: f64, grads: &mut Gradients) {
        let (d_dense, dw2, db2) = self
            .output
            .backward(&cache.output, &Array1::from_elem(1, dy));
        grads.w2 += &dw2;
        grads.b2 += &db2;

        let (mut dh, dw1, db1) = self.hidden.backward(&cache.hidden, &d_dense);
        grads.w1 += &dw1;
        grads.b1 += &db1;

        let hs = self.cell.hidden_size;
        let mut dc_next: Array1<f64> = Array1::zeros(hs);

        for step in cache.steps.iter().rev() {
            let d_o = &dh * &step.tanh_c;
            let dc = &dc_next + &(&dh * &step.o * &step.tanh_c.mapv(|t| 1.0 - t * t));
            let d_f = &dc * &step.c_prev;
            let d_i = &dc * &step.g;
            let d_g = &dc * &step.i;

            let mut dz: Array1<f64> = Array1::zeros(4 * hs);
            dz.slice_mut(s![0..hs])
                .assign(&(&d_i * &step.i.mapv(|v| v * (1.0 - v))));
            dz.slice_mut(s![hs..2 * hs])
                .assign(&(&d_f * &step.f.mapv(|v| v * (1.0 - v))));
            dz.slice_mut(s![2 * hs..3 * hs])
                .assign(&(&d_g * &step.g.mapv(|v| 1.0 - v * v)));
            dz.slice_mut(s![3 * hs..])
                .assign(&(&d_o * &step.o.mapv(|v| v * (1.0 - v))));

            grads.w_x += &outer(&dz, &step.x);
            grads.w_h += &outer(&dz, &step.h_prev);
            grads.b += &dz;

            dh = self.cell.w_h.t().dot(&dz);
            dc_next = &dc * &step.f;
        }
    }

    /// Mean squared error of a batch and its gradients
    fn batch_gradients(&self, batch: &[&TrainingExample]) -> (f64, Gradients) {
        let mut grads = Gradients::zeros_like(self);
        let n = batch.len() as f64;
        let mut loss = 0.0;

        for example in batch {
            let (y, cache) = self.forward_sample(&example.window);
            let err = y - example.target;
            loss += err * err;
            self.backward_sample(&cache, 2.0 * err / n, &mut grads);
        }

        (loss / n, grads)
    }

    fn apply_gradients(&mut self, adam: &mut Adam, grads: &mut Gradients) {
        if let Some(clip) = self.config.gradient_clip {
            let norm = grads.norm();
            if norm > clip {
                grads.scale(clip / norm);
            }
        }

        adam.begin_step();
        adam.update(0, &mut self.cell.w_x, &grads.w_x);
        adam.update(1, &mut self.cell.w_h, &grads.w_h);
        adam.update(2, &mut self.cell.b, &grads.b);
        adam.update(3, &mut self.hidden.weights, &grads.w1);
        adam.update(4, &mut self.hidden.biases, &grads.b1);
        adam.update(5, &mut self.output.weights, &grads.w2);
        adam.update(6, &mut self.output.biases, &grads.b2);
    }

    fn progress_bar(&self) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }
        let pb = ProgressBar::new(self.config.epochs as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) Loss: {msg}",
        )
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
        pb.set_style(style);
        Some(pb)
    }
}

impl SequenceRegressor for LstmRegressor {
    fn fit(&mut self, examples: &[TrainingExample], cancel: &CancelToken) -> Result<TrainingReport> {
        if examples.len() < 2 {
            return Err(ForecastError::insufficient(2, examples.len()));
        }

        let n = examples.len();
        let epochs = self.config.epochs;
        let batch_size = self.config.batch_size.min(n);
        let mut adam = Adam::new(self.config.learning_rate);
        let mut order: Vec<usize> = (0..n).collect();

        info!(
            "Training LSTM({}) on {} examples: {} epochs, batch {}",
            self.cell.hidden_size, n, epochs, batch_size
        );

        self.loss_history.clear();
        let progress = self.progress_bar();

        for epoch in 0..epochs {
            cancel.check("training")?;
            order.shuffle(&mut self.rng);

            let mut epoch_loss = 0.0;
            for chunk in order.chunks(batch_size) {
                let batch: Vec<&TrainingExample> = chunk.iter().map(|&i| &examples[i]).collect();
                let (loss, mut grads) = self.batch_gradients(&batch);

                if !loss.is_finite() {
                    if let Some(pb) = &progress {
                        pb.abandon_with_message("non-finite loss");
                    }
                    return Err(ForecastError::ModelTraining(format!(
                        "non-finite loss at epoch {}",
                        epoch + 1
                    )));
                }

                epoch_loss += loss * batch.len() as f64;
                self.apply_gradients(&mut adam, &mut grads);
            }

            let epoch_loss = epoch_loss / n as f64;
            self.loss_history.push(epoch_loss);
            debug!("Epoch {}/{}: loss {:.6}", epoch + 1, epochs, epoch_loss);

            if let Some(pb) = &progress {
                pb.set_message(format!("{:.6}", epoch_loss));
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let targets: Vec<f64> = examples.iter().map(|e| e.target).collect();
        let fitted: Vec<f64> = examples.iter().map(|e| self.predict(&e.window)).collect();
        if fitted.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ModelTraining(
                "non-finite prediction after training".to_string(),
            ));
        }

        let report = TrainingReport {
            epochs,
            final_loss: self.loss_history.last().copied().unwrap_or_default(),
            loss_history: self.loss_history.clone(),
            in_sample_rmse: rmse(&targets, &fitted),
            in_sample_mae: mae(&targets, &fitted),
            in_sample_r2: r2_score(&targets, &fitted),
            directional_accuracy: directional_accuracy(&targets, &fitted),
        };

        info!(
            "Training finished: loss {:.6}, in-sample RMSE {:.4}",
            report.final_loss, report.in_sample_rmse
        );

        Ok(report)
    }

    fn predict(&self, window: &Array1<f64>) -> f64 {
        self.forward_sample(window).0
    }
}
