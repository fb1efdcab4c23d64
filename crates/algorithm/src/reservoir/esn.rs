//! Echo state network forecaster
//!
//! A single-input, single-output ESN with output feedback. The network is
//! driven by a constant unit input while the observed series is fed back
//! through the feedback weights (teacher forcing), so after training it can
//! free-run past the end of the window and emit a forecast.
//!
//! ## Training
//!
//! 1. Harvest reservoir states `x[n] = tanh(W x[n-1] + w_in u + w_fb y[n-1]) + noise`
//! 2. Discard a washout prefix of `min(len / 10, 100)` states
//! 3. Solve the readout `y = W_out [x; u]` by ridge-regularized least squares
//!
//! ## Example
//!
//! ```rust
//! use algorithm::reservoir::{EchoStateNetwork, EsnConfig};
//! use algorithm::Predictor;
//!
//! let config = EsnConfig::default().with_reservoir_size(50);
//! let mut esn = EchoStateNetwork::new(config).unwrap();
//! let data: Vec<f64> = (0..60).map(|i| (i as f64 * 0.2).sin()).collect();
//! esn.fit(&data).unwrap();
//! assert_eq!(esn.predict(5).unwrap().len(), 5);
//! ```

use crate::error::{ensure_finite, Result, TsError};
use crate::linalg;
use crate::Predictor;
use ndarray::{s, Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Largest reservoir accepted; the recurrent matrix holds `n * n` weights.
pub const MAX_RESERVOIR_SIZE: usize = 5_000;
/// Constant input fed to the reservoir at every step.
const BIAS_INPUT: f64 = 1.0;
/// Shortest window the readout can be trained on.
const MIN_TRAIN_LEN: usize = 10;
/// Power iterations used to estimate the spectral radius.
const RADIUS_ITERATIONS: usize = 200;
/// Leading power iterations excluded from the growth-rate average.
const RADIUS_BURN_IN: usize = 50;

/// Echo state network hyperparameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsnConfig {
    /// Number of reservoir neurons
    pub n_reservoir: usize,
    /// Largest absolute eigenvalue of the recurrent weight matrix
    pub spectral_radius: f64,
    /// Fraction of recurrent weights set to zero
    pub sparsity: f64,
    /// Amplitude of the uniform noise added to states during training
    pub noise: f64,
    /// Seed for weight initialization and training noise
    pub random_state: u64,
    /// Ridge penalty of the readout, relative to the state energy
    pub regularization: f64,
    /// Feed the previous output back into the reservoir
    pub teacher_forcing: bool,
}

impl Default for EsnConfig {
    fn default() -> Self {
        Self {
            n_reservoir: 500,
            spectral_radius: 1.2,
            sparsity: 0.2,
            noise: 0.005,
            random_state: 23,
            regularization: 1e-8,
            teacher_forcing: true,
        }
    }
}

impl EsnConfig {
    /// Set the reservoir size
    pub fn with_reservoir_size(mut self, size: usize) -> Self {
        self.n_reservoir = size;
        self
    }

    /// Set the spectral radius
    pub fn with_spectral_radius(mut self, radius: f64) -> Self {
        self.spectral_radius = radius;
        self
    }

    /// Set the training noise amplitude
    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Check every hyperparameter is in range
    pub fn validate(&self) -> Result<()> {
        if self.n_reservoir == 0 {
            return Err(TsError::invalid_parameter("n_reservoir", "must be at least 1"));
        }
        if self.n_reservoir > MAX_RESERVOIR_SIZE {
            return Err(TsError::invalid_parameter(
                "n_reservoir",
                "must be at most 5000",
            ));
        }
        if !(self.spectral_radius.is_finite() && self.spectral_radius > 0.0) {
            return Err(TsError::invalid_parameter(
                "spectral_radius",
                "must be a positive finite number",
            ));
        }
        if !(0.0..1.0).contains(&self.sparsity) {
            return Err(TsError::invalid_parameter("sparsity", "must be in [0, 1)"));
        }
        if !(self.noise.is_finite() && self.noise >= 0.0) {
            return Err(TsError::invalid_parameter("noise", "must be non-negative"));
        }
        if !(self.regularization.is_finite() && self.regularization >= 0.0) {
            return Err(TsError::invalid_parameter(
                "regularization",
                "must be non-negative",
            ));
        }
        Ok(())
    }
}

/// Echo state network with a ridge-trained linear readout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoStateNetwork {
    config: EsnConfig,
    /// Recurrent weights (n x n)
    w: Array2<f64>,
    /// Input weights
    w_in: Array1<f64>,
    /// Output feedback weights
    w_feedback: Array1<f64>,
    /// Readout weights over `[state; input]`
    w_out: Array1<f64>,
    /// Reservoir state after the last training step
    last_state: Array1<f64>,
    /// Last observed value of the training window
    last_output: f64,
    fitted: bool,
}

impl EchoStateNetwork {
    /// Build the reservoir for the given configuration.
    ///
    /// Weight generation is fully determined by `config.random_state`, so two
    /// networks built from the same configuration are identical.
    pub fn new(config: EsnConfig) -> Result<Self> {
        config.validate()?;

        let n = config.n_reservoir;
        let mut rng = StdRng::seed_from_u64(config.random_state);

        let mut w = Array2::from_shape_fn((n, n), |_| rng.gen::<f64>() - 0.5);
        for weight in w.iter_mut() {
            if rng.gen::<f64>() < config.sparsity {
                *weight = 0.0;
            }
        }
        let radius = estimate_spectral_radius(&w, &mut rng);
        if radius > 1e-12 {
            w *= config.spectral_radius / radius;
        }

        let w_in = Array1::from_shape_fn(n, |_| rng.gen::<f64>() * 2.0 - 1.0);
        let w_feedback = Array1::from_shape_fn(n, |_| rng.gen::<f64>() * 2.0 - 1.0);

        Ok(Self {
            config,
            w,
            w_in,
            w_feedback,
            w_out: Array1::zeros(n + 1),
            last_state: Array1::zeros(n),
            last_output: 0.0,
            fitted: false,
        })
    }

    /// Model configuration
    pub fn config(&self) -> &EsnConfig {
        &self.config
    }

    /// Reservoir size
    pub fn size(&self) -> usize {
        self.config.n_reservoir
    }

    /// Trained readout weights (last entry is the input weight)
    pub fn readout(&self) -> &Array1<f64> {
        &self.w_out
    }

    /// Spectral radius of the recurrent matrix as actually built
    pub fn spectral_radius(&self) -> f64 {
        let mut rng = StdRng::seed_from_u64(self.config.random_state);
        estimate_spectral_radius(&self.w, &mut rng)
    }

    fn step(&self, state: &Array1<f64>, feedback: f64) -> Array1<f64> {
        let feedback = if self.config.teacher_forcing {
            feedback
        } else {
            0.0
        };
        let preactivation =
            self.w.dot(state) + &self.w_in * BIAS_INPUT + &self.w_feedback * feedback;
        preactivation.mapv_into(f64::tanh)
    }
}

impl Predictor for EchoStateNetwork {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        if data.len() < MIN_TRAIN_LEN {
            return Err(TsError::InsufficientData {
                required: MIN_TRAIN_LEN,
                actual: data.len(),
            });
        }
        ensure_finite(data)?;

        let n = self.config.n_reservoir;
        let len = data.len();
        // Noise is reseeded per fit so refitting never depends on earlier fits
        let mut noise_rng = StdRng::seed_from_u64(self.config.random_state.wrapping_add(1));

        let mut states = Array2::<f64>::zeros((len, n));
        for t in 1..len {
            let previous = states.row(t - 1).to_owned();
            let mut next = self.step(&previous, data[t - 1]);
            if self.config.noise > 0.0 {
                for value in next.iter_mut() {
                    *value += self.config.noise * (noise_rng.gen::<f64>() - 0.5);
                }
            }
            states.row_mut(t).assign(&next);
        }

        let washout = (len / 10).min(100);
        let rows = len - washout;
        let mut design = Array2::<f64>::zeros((rows, n + 1));
        design
            .slice_mut(s![.., ..n])
            .assign(&states.slice(s![washout.., ..]));
        design.column_mut(n).fill(BIAS_INPUT);
        let target = Array1::from(data[washout..].to_vec());

        self.w_out = linalg::ridge(&design, &target, self.config.regularization)?;
        self.last_state = states.row(len - 1).to_owned();
        self.last_output = data[len - 1];
        self.fitted = true;

        tracing::trace!(
            reservoir = n,
            window = len,
            washout,
            "echo state network fitted"
        );
        Ok(())
    }

    fn predict(&self, steps: usize) -> Result<Vec<f64>> {
        if !self.fitted {
            return Err(TsError::NotFitted);
        }

        let n = self.config.n_reservoir;
        let readout = self.w_out.slice(s![..n]);
        let input_weight = self.w_out[n];

        let mut state = self.last_state.clone();
        let mut output = self.last_output;
        let mut forecasts = Vec::with_capacity(steps);
        for _ in 0..steps {
            state = self.step(&state, output);
            output = state.dot(&readout) + input_weight * BIAS_INPUT;
            if !output.is_finite() {
                return Err(TsError::NumericalError(
                    "Echo state network diverged during free run".to_string(),
                ));
            }
            forecasts.push(output);
        }

        Ok(forecasts)
    }

    fn is_fitted(&self) -> bool {
        self.fitted
    }
}

/// Estimate the largest eigenvalue modulus through the average growth rate
/// of repeated matrix-vector products. Complex dominant pairs make single
/// power-iteration ratios oscillate, but their geometric mean still converges.
fn estimate_spectral_radius(matrix: &Array2<f64>, rng: &mut StdRng) -> f64 {
    let n = matrix.nrows();
    let mut v = Array1::from_shape_fn(n, |_| rng.gen::<f64>() - 0.5);
    let norm = v.dot(&v).sqrt();
    if norm < 1e-300 {
        return 0.0;
    }
    v /= norm;

    let mut log_growth = 0.0;
    for k in 0..RADIUS_ITERATIONS {
        let next = matrix.dot(&v);
        let norm = next.dot(&next).sqrt();
        if norm < 1e-300 {
            return 0.0;
        }
        v = next / norm;
        if k >= RADIUS_BURN_IN {
            log_growth += norm.ln();
        }
    }

    (log_growth / (RADIUS_ITERATIONS - RADIUS_BURN_IN) as f64).exp()
}
