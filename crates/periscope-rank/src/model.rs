//! Feed-forward slot classifier trained one sample at a time.
//!
//! `input -> [Linear -> activation]* -> Linear(capacity) -> softmax`.
//! Hidden weights use a seeded He-uniform draw; the output layer starts at zero,
//! so before any training every slot gets the same probability.

use candle_core::{DType, Device, Tensor, Var, D};
use candle_nn::{Linear, Module, Optimizer, SGD};
use rand::distributions::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{Activation, RankingConfig};
use crate::encoder::FeatureVector;
use crate::error::{RankError, Result};

pub struct SlotClassifier {
    layers: Vec<Linear>,
    weights: Vec<Var>,
    activation: Activation,
    optimizer: SGD,
    l2: f64,
    input_width: usize,
    output_width: usize,
    device: Device,
}

impl SlotClassifier {
    pub fn new(config: &RankingConfig, device: Device) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let input_width = config.feature_width();
        let output_width = config.capacity;

        let mut widths = Vec::with_capacity(config.hidden_layers.len() + 2);
        widths.push(input_width);
        widths.extend(config.hidden_layers.iter().copied());
        widths.push(output_width);

        let mut layers = Vec::new();
        let mut weights = Vec::new();
        let mut vars = Vec::new();
        let last = widths.len() - 2;
        for (i, pair) in widths.windows(2).enumerate() {
            let (fan_in, fan_out) = (pair[0], pair[1]);
            let weight = if i == last {
                Var::zeros((fan_out, fan_in), DType::F32, &device)?
            } else {
                he_uniform(&mut rng, fan_in, fan_out, &device)?
            };
            let bias = Var::zeros(fan_out, DType::F32, &device)?;
            layers.push(Linear::new(weight.as_tensor().clone(), Some(bias.as_tensor().clone())));
            weights.push(weight.clone());
            vars.push(weight);
            vars.push(bias);
        }
        let optimizer = SGD::new(vars, config.learning_rate)?;
        tracing::debug!(?widths, activation = ?config.activation, "slot classifier initialised");

        Ok(Self { layers, weights, activation: config.activation, optimizer, l2: config.l2, input_width, output_width, device })
    }

    pub fn output_width(&self) -> usize { self.output_width }

    /// Softmax probability per output slot.
    pub fn predict(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let logits = self.logits(&self.input(features)?)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }

    /// One SGD step towards `target_slot`. Returns the loss before the step.
    pub fn fit(&mut self, features: &FeatureVector, target_slot: usize) -> Result<f32> {
        if target_slot >= self.output_width {
            return Err(RankError::CapacityExceeded { capacity: self.output_width, id: format!("slot {target_slot}") });
        }
        let input = self.input(features)?;
        let mut one_hot = vec![0f32; self.output_width];
        one_hot[target_slot] = 1.0;
        let target = Tensor::from_vec(one_hot, (1, self.output_width), &self.device)?;

        let log_probs = candle_nn::ops::log_softmax(&self.logits(&input)?, D::Minus1)?;
        let mut loss = (target * log_probs)?.sum_all()?.neg()?;
        if self.l2 > 0.0 {
            for weight in &self.weights {
                let penalty = weight.as_tensor().sqr()?.sum_all()?.affine(self.l2 / 2.0, 0.0)?;
                loss = (loss + penalty)?;
            }
        }
        self.optimizer.backward_step(&loss)?;
        Ok(loss.to_scalar::<f32>()?)
    }

    fn input(&self, features: &FeatureVector) -> Result<Tensor> {
        if features.width() != self.input_width {
            return Err(RankError::InvalidConfig(format!(
                "feature width {} does not match model input {}",
                features.width(),
                self.input_width
            )));
        }
        Ok(Tensor::from_slice(features.as_slice(), (1, self.input_width), &self.device)?)
    }

    fn logits(&self, input: &Tensor) -> Result<Tensor> {
        let last = self.layers.len() - 1;
        let mut xs = input.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            xs = layer.forward(&xs)?;
            if i < last {
                xs = match self.activation {
                    Activation::Tanh => xs.tanh()?,
                    Activation::Relu => xs.relu()?,
                };
            }
        }
        Ok(xs)
    }
}

fn he_uniform(rng: &mut StdRng, fan_in: usize, fan_out: usize, device: &Device) -> Result<Var> {
    let bound = (6.0f32 / fan_in as f32).sqrt();
    let dist = Uniform::new_inclusive(-bound, bound);
    let values: Vec<f32> = (0..fan_in * fan_out).map(|_| rng.sample(dist)).collect();
    Ok(Var::from_tensor(&Tensor::from_vec(values, (fan_out, fan_in), device)?)?)
}
