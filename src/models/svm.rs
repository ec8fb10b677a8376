//! Linear support vector machine (one-vs-rest margins).

use super::linear::{LinearArtifact, LinearModel};
use super::normalize::top_of_scores;
use super::{Classifier, ModelFamily};
use crate::Result;
use crate::types::{FeatureVector, LabelPrediction};

/// Linear SVM. Native output is an uncalibrated margin per class, so the
/// adapter maps margins to a confidence with softmax.
#[derive(Debug, Clone)]
pub struct LinearSvm {
    model: LinearModel,
}

impl LinearSvm {
    pub fn from_artifact(artifact: LinearArtifact, origin: &str) -> Result<Self> {
        Ok(Self {
            model: LinearModel::from_artifact(artifact, origin)?,
        })
    }

    /// Raw margins in `classes()` order.
    ///
    /// Binary models have a single margin `z` for `classes[1]`; it is
    /// expanded to `[-z, z]`.
    pub fn decision_function(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        let scores = self.model.decision(features)?;
        if self.model.is_binary() {
            Ok(vec![-scores[0], scores[0]])
        } else {
            Ok(scores)
        }
    }
}

impl Classifier for LinearSvm {
    fn family(&self) -> ModelFamily {
        ModelFamily::LinearSvm
    }

    fn classes(&self) -> &[String] {
        self.model.classes()
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.model.width())
    }

    fn predict(&self, features: &FeatureVector) -> Result<LabelPrediction> {
        let scores = self.decision_function(features)?;
        top_of_scores(self.family(), self.model.classes(), &scores)
    }
}
