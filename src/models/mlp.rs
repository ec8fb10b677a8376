//! Feed-forward neural network (multi-layer perceptron).

use serde::{Deserialize, Serialize};

use super::normalize::{sigmoid, softmax, top_of_probabilities};
use super::{Classifier, ModelFamily};
use crate::Result;
use crate::artifact;
use crate::types::{FeatureVector, LabelPrediction};

/// Hidden-layer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Activation {
    #[default]
    Relu,
    Tanh,
    Logistic,
    Identity,
}

impl Activation {
    fn apply(self, x: f32) -> f32 {
        match self {
            Self::Relu => x.max(0.0),
            Self::Tanh => x.tanh(),
            Self::Logistic => sigmoid(x),
            Self::Identity => x,
        }
    }
}

/// Dense layer: `weights` is `out × in`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlpArtifact {
    pub classes: Vec<String>,
    #[serde(default)]
    pub activation: Activation,
    pub layers: Vec<DenseLayer>,
}

/// MLP classifier with softmax output (sigmoid for a single binary output unit).
#[derive(Debug, Clone)]
pub struct Mlp {
    classes: Vec<String>,
    activation: Activation,
    layers: Vec<DenseLayer>,
    input_width: usize,
}

impl Mlp {
    pub fn from_artifact(a: MlpArtifact, origin: &str) -> Result<Self> {
        if a.classes.len() < 2 {
            return Err(artifact::invalid(origin, "need at least two classes"));
        }
        let Some(first) = a.layers.first() else {
            return Err(artifact::invalid(origin, "network has no layers"));
        };
        let input_width = first.weights.first().map_or(0, Vec::len);
        if input_width == 0 {
            return Err(artifact::invalid(origin, "first layer has no inputs"));
        }

        let mut width = input_width;
        for (i, layer) in a.layers.iter().enumerate() {
            if layer.weights.is_empty()
                || layer.bias.len() != layer.weights.len()
                || layer.weights.iter().any(|row| row.len() != width)
            {
                return Err(artifact::invalid(
                    origin,
                    format!("layer {i} does not accept {width} inputs"),
                ));
            }
            width = layer.weights.len();
        }

        let binary_unit = a.classes.len() == 2 && width == 1;
        if width != a.classes.len() && !binary_unit {
            return Err(artifact::invalid(
                origin,
                format!("{width} output units for {} classes", a.classes.len()),
            ));
        }

        Ok(Self {
            classes: a.classes,
            activation: a.activation,
            layers: a.layers,
            input_width,
        })
    }

    /// Class probabilities in `classes()` order.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        features.check_dimension(self.input_width)?;

        // First layer reads the sparse input directly.
        let first = &self.layers[0];
        let mut activations: Vec<f32> = first
            .weights
            .iter()
            .zip(&first.bias)
            .map(|(row, b)| features.dot(row) + b)
            .collect();

        for layer in &self.layers[1..] {
            for a in &mut activations {
                *a = self.activation.apply(*a);
            }
            activations = layer
                .weights
                .iter()
                .zip(&layer.bias)
                .map(|(row, b)| row.iter().zip(&activations).map(|(w, x)| w * x).sum::<f32>() + b)
                .collect();
        }

        if activations.len() == 1 {
            let p = sigmoid(activations[0]);
            Ok(vec![1.0 - p, p])
        } else {
            Ok(softmax(&activations))
        }
    }
}

impl Classifier for Mlp {
    fn family(&self) -> ModelFamily {
        ModelFamily::Mlp
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.input_width)
    }

    fn predict(&self, features: &FeatureVector) -> Result<LabelPrediction> {
        let probabilities = self.predict_proba(features)?;
        top_of_probabilities(self.family(), &self.classes, &probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network() -> Mlp {
        Mlp::from_artifact(
            MlpArtifact {
                classes: vec!["Migraine".into(), "Malaria".into()],
                activation: Activation::Relu,
                layers: vec![
                    DenseLayer {
                        weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                        bias: vec![0.0, 0.0],
                    },
                    DenseLayer {
                        weights: vec![vec![3.0, -3.0], vec![-3.0, 3.0]],
                        bias: vec![0.0, 0.0],
                    },
                ],
            },
            "test",
        )
        .unwrap()
    }

    #[test]
    fn forward_pass_selects_class() {
        let net = network();
        let p = net
            .predict(&FeatureVector::from_dense(&[0.0, 1.0]).unwrap())
            .unwrap();
        assert_eq!(p.label, "Malaria");
        let expected = 1.0 / (1.0 + (-6f32).exp());
        assert!((p.confidence - expected).abs() < 1e-5);
    }

    #[test]
    fn relu_clips_negative_hidden_units() {
        let net = network();
        // Hidden = relu([-1, 0]) = [0, 0] → equal logits.
        let proba = net
            .predict_proba(&FeatureVector::from_dense(&[-1.0, 0.0]).unwrap())
            .unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn layer_width_mismatch_rejected() {
        let err = Mlp::from_artifact(
            MlpArtifact {
                classes: vec!["a".into(), "b".into()],
                activation: Activation::Tanh,
                layers: vec![
                    DenseLayer {
                        weights: vec![vec![1.0, 1.0]],
                        bias: vec![0.0],
                    },
                    DenseLayer {
                        weights: vec![vec![1.0, 1.0], vec![1.0, 1.0]],
                        bias: vec![0.0, 0.0],
                    },
                ],
            },
            "test",
        );
        assert!(err.is_err());
    }
}
