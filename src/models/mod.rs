//! Classifier families and the model pool.
//!
//! Each family (logistic regression, random forest, linear SVM, MLP) is an
//! adapter implementing [`Classifier`]. Artifacts on disk are JSON documents
//! tagged with a `family` field and loaded through [`load_classifier`].

pub mod forest;
pub mod linear;
pub mod mlp;
pub mod normalize;
pub mod pool;
pub mod svm;
pub mod traits;

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

pub use forest::{ForestArtifact, RandomForest, TreeArtifact};
pub use linear::{LinearArtifact, LogisticRegression};
pub use mlp::{Activation, DenseLayer, Mlp, MlpArtifact};
pub use pool::{ModelEntry, ModelPool, ModelPoolBuilder, ModelSpec};
pub use svm::LinearSvm;
pub use traits::{Classifier, ModelFamily};

use crate::{Result, artifact};

/// A classifier artifact of any supported family.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelArtifact {
    LogisticRegression(LinearArtifact),
    RandomForest(ForestArtifact),
    LinearSvm(LinearArtifact),
    Mlp(MlpArtifact),
}

impl ModelArtifact {
    /// Validate and build the matching adapter.
    pub fn into_classifier(self, origin: &str) -> Result<Arc<dyn Classifier>> {
        Ok(match self {
            Self::LogisticRegression(a) => Arc::new(LogisticRegression::from_artifact(a, origin)?),
            Self::RandomForest(a) => Arc::new(RandomForest::from_artifact(a, origin)?),
            Self::LinearSvm(a) => Arc::new(LinearSvm::from_artifact(a, origin)?),
            Self::Mlp(a) => Arc::new(Mlp::from_artifact(a, origin)?),
        })
    }
}

/// Load a classifier artifact from disk.
pub fn load_classifier(path: &Path) -> Result<Arc<dyn Classifier>> {
    let artifact: ModelArtifact = artifact::load_json(path)?;
    let classifier = artifact.into_classifier(&path.display().to_string())?;
    debug!(
        path = %path.display(),
        family = %classifier.family(),
        classes = classifier.classes().len(),
        "loaded classifier"
    );
    Ok(classifier)
}
