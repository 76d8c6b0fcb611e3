//! Trainable SSM layer and the per-channel stack.
//!
//! `SsmLayer` holds the parameters of one SSM channel as explicit data:
//! a `LinearSystem` (A initialized from HiPPO, B and C random), a skip
//! coefficient D, and a log-space step size. There is no mode flag: the
//! convolutional and recurrent evaluations are two entry points over the
//! same discretized system, so a long-lived layer cannot be left in a
//! stale half-switched state.
//!
//! `SsmStack` broadcasts the definition across independent channels; each
//! channel owns its own system and hidden state, and the stack runs the
//! core evaluators per channel.

use rand::Rng;
use strand_core::{Matrix, Result, StrandError};

use crate::cache::DecodeState;
use crate::config::SsmConfig;
use crate::conv::causal_convolve;
use crate::hippo::make_hippo;
use crate::kernel::impulse_kernel;
use crate::scan::{scan, step_one, SsmState};
use crate::system::{discretize, DiscreteSystem, LinearSystem};

/// One SSM channel: (A, B, C) plus skip D and log-space step size.
#[derive(Clone, Debug)]
pub struct SsmLayer {
    pub system: LinearSystem,
    /// Skip connection coefficient: y += D·u
    pub d: f64,
    /// Step size is exp(log_step); stored in log space so a trainer can
    /// move it multiplicatively.
    pub log_step: f64,
}

impl SsmLayer {
    /// Random initialization: HiPPO-LegS transition, uniform B/C/D, step
    /// size log-uniform in [dt_min, dt_max].
    pub fn init(n: usize, dt_min: f64, dt_max: f64) -> Self {
        let mut rng = rand::thread_rng();

        let a = make_hippo(n);
        let b = Matrix::from_fn(n, 1, |_, _| rng.gen_range(-1.0..1.0));
        let c = Matrix::from_fn(1, n, |_, _| rng.gen_range(-1.0..1.0));
        // Shapes are consistent by construction.
        let system = LinearSystem { a, b, c };

        let log_step = rng.gen_range(dt_min.ln()..dt_max.ln());
        let d = rng.gen_range(-1.0..1.0);

        Self {
            system,
            d,
            log_step,
        }
    }

    /// Wrap an explicit system with a fixed step size.
    pub fn with_system(system: LinearSystem, step: f64, d: f64) -> Self {
        Self {
            system,
            d,
            log_step: step.ln(),
        }
    }

    /// Current step size, exp(log_step).
    pub fn step_size(&self) -> f64 {
        self.log_step.exp()
    }

    /// Discretize the layer's system at its current step size.
    ///
    /// Decode loops call this once and reuse the result across samples.
    pub fn setup_step(&self) -> Result<DiscreteSystem> {
        discretize(&self.system, self.step_size())
    }

    /// Convolutional ("train"/batch) evaluation: build the impulse kernel,
    /// convolve, add the skip term.
    pub fn forward_conv(&self, u: &[f64], use_fft: bool) -> Result<Vec<f64>> {
        let disc = self.setup_step()?;
        let kernel = impulse_kernel(&disc, u.len())?;
        let mut y = causal_convolve(u, &kernel, use_fft)?;
        for (y_k, &u_k) in y.iter_mut().zip(u.iter()) {
            *y_k += self.d * u_k;
        }
        Ok(y)
    }

    /// Recurrent ("decode"/streaming) evaluation over a chunk. The caller
    /// owns `state` and carries it between chunks.
    pub fn forward_recurrent(&self, u: &[f64], state: &mut SsmState) -> Result<Vec<f64>> {
        let disc = self.setup_step()?;
        let mut y = scan(&disc, u, state)?;
        for (y_k, &u_k) in y.iter_mut().zip(u.iter()) {
            *y_k += self.d * u_k;
        }
        Ok(y)
    }

    /// Single-sample decode against a prepared `DiscreteSystem`.
    pub fn forward_step(
        &self,
        disc: &DiscreteSystem,
        u: f64,
        state: &mut SsmState,
    ) -> Result<f64> {
        Ok(step_one(disc, u, state)? + self.d * u)
    }

    /// State dimension N.
    pub fn state_dim(&self) -> usize {
        self.system.state_dim()
    }

    /// Total trainable scalar count: A + B + C + D + log_step.
    pub fn param_count(&self) -> usize {
        let n = self.state_dim();
        n * n + n + n + 1 + 1
    }
}

/// Independent SSM channels evaluated side by side.
///
/// Input and output are channel-major flat buffers of shape
/// (channels, seq_len): sample t of channel ch lives at `ch * seq_len + t`.
pub struct SsmStack {
    pub layers: Vec<SsmLayer>,
    pub use_fft: bool,
}

impl SsmStack {
    /// One independently-initialized layer per channel.
    pub fn from_config(config: &SsmConfig) -> Self {
        let layers = (0..config.channels)
            .map(|_| SsmLayer::init(config.d_state, config.dt_min, config.dt_max))
            .collect();
        Self {
            layers,
            use_fft: config.use_fft,
        }
    }

    pub fn channels(&self) -> usize {
        self.layers.len()
    }

    fn check_input(&self, u: &[f64], seq_len: usize) -> Result<()> {
        let expected = self.channels() * seq_len;
        if u.len() != expected {
            return Err(StrandError::ShapeMismatch {
                expected: vec![self.channels(), seq_len],
                got: vec![u.len()],
            });
        }
        Ok(())
    }

    /// Batch evaluation: every channel through its convolutional path.
    pub fn forward_conv(&self, u: &[f64], seq_len: usize) -> Result<Vec<f64>> {
        self.check_input(u, seq_len)?;
        let mut y = Vec::with_capacity(u.len());
        for (ch, layer) in self.layers.iter().enumerate() {
            let u_ch = &u[ch * seq_len..(ch + 1) * seq_len];
            y.extend(layer.forward_conv(u_ch, self.use_fft)?);
        }
        Ok(y)
    }

    /// Streaming evaluation of a chunk; hidden states live in `decode` and
    /// persist across calls.
    pub fn forward_recurrent(
        &self,
        u: &[f64],
        seq_len: usize,
        decode: &mut DecodeState,
    ) -> Result<Vec<f64>> {
        self.check_input(u, seq_len)?;
        let mut y = Vec::with_capacity(u.len());
        for (ch, layer) in self.layers.iter().enumerate() {
            let u_ch = &u[ch * seq_len..(ch + 1) * seq_len];
            let state = decode.get_or_create(ch, layer.state_dim());
            y.extend(layer.forward_recurrent(u_ch, state)?);
        }
        decode.advance(seq_len);
        Ok(y)
    }

    /// Total trainable scalar count across channels.
    pub fn param_count(&self) -> usize {
        self.layers.iter().map(|l| l.param_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_init_shapes() {
        let layer = SsmLayer::init(8, 0.001, 0.1);
        assert_eq!(layer.state_dim(), 8);
        let dt = layer.step_size();
        assert!(dt >= 0.001 && dt <= 0.1, "dt = {dt}");
    }

    #[test]
    fn test_layer_modes_agree() {
        let layer = SsmLayer::init(4, 0.001, 0.1);
        let u: Vec<f64> = (0..24).map(|k| (k as f64 * 0.5).sin()).collect();

        let y_conv = layer.forward_conv(&u, true).unwrap();
        let mut state = SsmState::zeros(4);
        let y_rec = layer.forward_recurrent(&u, &mut state).unwrap();

        for (i, (a, b)) in y_conv.iter().zip(y_rec.iter()).enumerate() {
            assert!(
                (a - b).abs() < 1e-8,
                "sample {i}: conv {a} vs recurrent {b}"
            );
        }
    }

    #[test]
    fn test_layer_forward_step_matches_chunk() {
        let layer = SsmLayer::init(3, 0.01, 0.1);
        let u = vec![1.0, -0.3, 0.8, 0.0];

        let mut s1 = SsmState::zeros(3);
        let y_chunk = layer.forward_recurrent(&u, &mut s1).unwrap();

        let disc = layer.setup_step().unwrap();
        let mut s2 = SsmState::zeros(3);
        let y_steps: Vec<f64> = u
            .iter()
            .map(|&u_k| layer.forward_step(&disc, u_k, &mut s2).unwrap())
            .collect();

        assert_eq!(y_chunk, y_steps);
    }

    #[test]
    fn test_layer_with_explicit_system() {
        let sys = LinearSystem::new(
            Matrix::from_rows(&[&[-0.5]]).unwrap(),
            Matrix::column(&[1.0]),
            Matrix::from_rows(&[&[1.0]]).unwrap(),
        )
        .unwrap();
        let layer = SsmLayer::with_system(sys, 0.05, 0.5);
        assert!((layer.step_size() - 0.05).abs() < 1e-15);

        let u = vec![1.0, 0.0, -1.0, 0.5];
        let y_conv = layer.forward_conv(&u, false).unwrap();
        let mut state = SsmState::zeros(1);
        let y_rec = layer.forward_recurrent(&u, &mut state).unwrap();
        for (a, b) in y_conv.iter().zip(y_rec.iter()) {
            assert!((a - b).abs() < 1e-12);
        }

        // The skip term is present: y[0] = cb·bb·u[0] + d·u[0].
        let disc = layer.setup_step().unwrap();
        let expected = disc.cb.at(0, 0) * disc.bb.at(0, 0) * u[0] + 0.5 * u[0];
        assert!((y_rec[0] - expected).abs() < 1e-15);
    }

    #[test]
    fn test_layer_param_count() {
        let layer = SsmLayer::init(8, 0.001, 0.1);
        assert_eq!(layer.param_count(), 64 + 8 + 8 + 2);
    }

    #[test]
    fn test_stack_forward_shapes() {
        let config = SsmConfig {
            d_state: 4,
            channels: 3,
            ..Default::default()
        };
        let stack = SsmStack::from_config(&config);
        let seq_len = 10;
        let u = vec![0.1; 3 * seq_len];

        let y = stack.forward_conv(&u, seq_len).unwrap();
        assert_eq!(y.len(), 3 * seq_len);

        let mut decode = DecodeState::new();
        let y = stack.forward_recurrent(&u, seq_len, &mut decode).unwrap();
        assert_eq!(y.len(), 3 * seq_len);
        assert_eq!(decode.seqlen_offset, seq_len);
    }

    #[test]
    fn test_stack_input_shape_mismatch() {
        let stack = SsmStack::from_config(&SsmConfig {
            channels: 2,
            ..Default::default()
        });
        assert!(matches!(
            stack.forward_conv(&[0.0; 5], 4),
            Err(StrandError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_stack_streaming_matches_batch() {
        let config = SsmConfig {
            d_state: 4,
            channels: 2,
            ..Default::default()
        };
        let stack = SsmStack::from_config(&config);
        let seq_len = 12;
        let u: Vec<f64> = (0..2 * seq_len).map(|k| (k as f64 * 0.17).cos()).collect();

        let mut batch_decode = DecodeState::new();
        let y_batch = stack
            .forward_recurrent(&u, seq_len, &mut batch_decode)
            .unwrap();

        // Same input split in two chunks per channel.
        let half = seq_len / 2;
        let mut chunked_decode = DecodeState::new();
        let first: Vec<f64> = (0..2)
            .flat_map(|ch| u[ch * seq_len..ch * seq_len + half].to_vec())
            .collect();
        let second: Vec<f64> = (0..2)
            .flat_map(|ch| u[ch * seq_len + half..(ch + 1) * seq_len].to_vec())
            .collect();
        let y1 = stack
            .forward_recurrent(&first, half, &mut chunked_decode)
            .unwrap();
        let y2 = stack
            .forward_recurrent(&second, half, &mut chunked_decode)
            .unwrap();

        for ch in 0..2 {
            for t in 0..seq_len {
                let batch_val = y_batch[ch * seq_len + t];
                let chunk_val = if t < half {
                    y1[ch * half + t]
                } else {
                    y2[ch * half + (t - half)]
                };
                assert_eq!(
                    batch_val, chunk_val,
                    "channel {ch} sample {t}: streaming must match batch"
                );
            }
        }
        assert_eq!(chunked_decode.seqlen_offset, seq_len);
    }

    #[test]
    fn test_stack_param_count() {
        let stack = SsmStack::from_config(&SsmConfig {
            d_state: 4,
            channels: 3,
            ..Default::default()
        });
        assert_eq!(stack.param_count(), 3 * (16 + 4 + 4 + 2));
    }
}
