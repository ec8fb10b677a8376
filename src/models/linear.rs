//! Linear text classifier (multinomial logistic regression).

use serde::{Deserialize, Serialize};

use super::normalize::{sigmoid, softmax, top_of_probabilities};
use super::{Classifier, ModelFamily};
use crate::Result;
use crate::artifact;
use crate::types::{FeatureVector, LabelPrediction};

/// Exported coefficients of a linear model.
///
/// `coef` has one row per class, or a single row for binary models
/// (the row scores `classes[1]`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub classes: Vec<String>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
}

/// Validated linear decision function shared by logistic regression and SVM.
#[derive(Debug, Clone)]
pub(crate) struct LinearModel {
    classes: Vec<String>,
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
    width: usize,
}

impl LinearModel {
    pub(crate) fn from_artifact(a: LinearArtifact, origin: &str) -> Result<Self> {
        if a.classes.len() < 2 {
            return Err(artifact::invalid(origin, "need at least two classes"));
        }
        let rows = a.coef.len();
        let binary = a.classes.len() == 2 && rows == 1;
        if rows != a.classes.len() && !binary {
            return Err(artifact::invalid(
                origin,
                format!("{rows} coefficient rows for {} classes", a.classes.len()),
            ));
        }
        if a.intercept.len() != rows {
            return Err(artifact::invalid(
                origin,
                format!("{} intercepts for {rows} rows", a.intercept.len()),
            ));
        }
        let width = a.coef[0].len();
        if width == 0 || a.coef.iter().any(|row| row.len() != width) {
            return Err(artifact::invalid(origin, "ragged or empty coefficient matrix"));
        }

        Ok(Self {
            classes: a.classes,
            coef: a.coef,
            intercept: a.intercept,
            width,
        })
    }

    pub(crate) fn classes(&self) -> &[String] {
        &self.classes
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn is_binary(&self) -> bool {
        self.coef.len() == 1
    }

    /// `coef · x + intercept` per row.
    pub(crate) fn decision(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        features.check_dimension(self.width)?;
        Ok(self
            .coef
            .iter()
            .zip(&self.intercept)
            .map(|(row, b)| features.dot(row) + b)
            .collect())
    }
}

/// Multinomial logistic regression over TF-IDF features.
#[derive(Debug, Clone)]
pub struct LogisticRegression {
    model: LinearModel,
}

impl LogisticRegression {
    pub fn from_artifact(artifact: LinearArtifact, origin: &str) -> Result<Self> {
        Ok(Self {
            model: LinearModel::from_artifact(artifact, origin)?,
        })
    }

    /// Class probabilities in `classes()` order.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let logits = self.model.decision(features)?;
        if self.model.is_binary() {
            let p = sigmoid(logits[0]);
            Ok(vec![1.0 - p, p])
        } else {
            Ok(softmax(&logits))
        }
    }
}

impl Classifier for LogisticRegression {
    fn family(&self) -> ModelFamily {
        ModelFamily::LogisticRegression
    }

    fn classes(&self) -> &[String] {
        self.model.classes()
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.model.width())
    }

    fn predict(&self, features: &FeatureVector) -> Result<LabelPrediction> {
        let probabilities = self.predict_proba(features)?;
        top_of_probabilities(self.family(), self.model.classes(), &probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DhakhtarError;

    fn three_class() -> LogisticRegression {
        LogisticRegression::from_artifact(
            LinearArtifact {
                classes: vec!["Malaria".into(), "Migraine".into(), "Common Cold".into()],
                coef: vec![
                    vec![2.0, 0.0, 0.0],
                    vec![0.0, 2.0, 0.0],
                    vec![0.0, 0.0, 2.0],
                ],
                intercept: vec![0.0, 0.0, 0.0],
            },
            "test",
        )
        .unwrap()
    }

    #[test]
    fn picks_highest_logit() {
        let model = three_class();
        let x = FeatureVector::from_dense(&[0.0, 1.0, 0.0]).unwrap();
        let p = model.predict(&x).unwrap();
        assert_eq!(p.label, "Migraine");
        let expected = 2f32.exp() / (2f32.exp() + 2.0);
        assert!((p.confidence - expected).abs() < 1e-5);
    }

    #[test]
    fn binary_uses_sigmoid() {
        let model = LogisticRegression::from_artifact(
            LinearArtifact {
                classes: vec!["no".into(), "yes".into()],
                coef: vec![vec![1.0, -1.0]],
                intercept: vec![0.0],
            },
            "test",
        )
        .unwrap();
        let proba = model
            .predict_proba(&FeatureVector::from_dense(&[3.0, 0.0]).unwrap())
            .unwrap();
        assert!((proba[1] - sigmoid(3.0)).abs() < 1e-6);
        assert!((proba[0] + proba[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn wrong_width_is_shape_mismatch() {
        let model = three_class();
        let err = model.predict(&FeatureVector::zeros(5)).unwrap_err();
        assert!(matches!(
            err,
            DhakhtarError::ShapeMismatch {
                expected: 3,
                actual: 5
            }
        ));
    }

    #[test]
    fn mismatched_rows_rejected() {
        let err = LogisticRegression::from_artifact(
            LinearArtifact {
                classes: vec!["a".into(), "b".into(), "c".into()],
                coef: vec![vec![1.0], vec![1.0]],
                intercept: vec![0.0, 0.0],
            },
            "bad.json",
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
