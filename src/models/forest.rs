//! Random forest over array-encoded decision trees.

use serde::{Deserialize, Serialize};

use super::normalize::top_of_probabilities;
use super::{Classifier, ModelFamily};
use crate::artifact;
use crate::types::{FeatureVector, LabelPrediction};
use crate::{DhakhtarError, Result};

/// Marker for "no child" in `children_left` / `children_right`.
const LEAF: i64 = -1;

/// One tree in the flat layout used by the training toolkit.
///
/// Node `i` is a leaf when `children_left[i] == -1`. Otherwise samples with
/// `x[feature[i]] <= threshold[i]` go left. `value[i]` holds per-class
/// weights (counts or fractions) for the node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeArtifact {
    pub children_left: Vec<i64>,
    pub children_right: Vec<i64>,
    pub feature: Vec<i64>,
    pub threshold: Vec<f32>,
    pub value: Vec<Vec<f32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestArtifact {
    pub classes: Vec<String>,
    pub n_features: usize,
    pub trees: Vec<TreeArtifact>,
}

#[derive(Debug, Clone)]
struct Tree {
    nodes: Vec<Node>,
}

#[derive(Debug, Clone)]
enum Node {
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
    },
    Leaf {
        distribution: Vec<f32>,
    },
}

impl Tree {
    fn from_artifact(
        t: TreeArtifact,
        n_classes: usize,
        n_features: usize,
        origin: &str,
    ) -> Result<Self> {
        let n = t.children_left.len();
        if n == 0
            || t.children_right.len() != n
            || t.feature.len() != n
            || t.threshold.len() != n
            || t.value.len() != n
        {
            return Err(artifact::invalid(origin, "tree arrays differ in length"));
        }

        let child = |c: i64| -> Result<usize> {
            usize::try_from(c)
                .ok()
                .filter(|c| *c < n)
                .ok_or_else(|| artifact::invalid(origin, format!("child index {c} out of range")))
        };

        let mut nodes = Vec::with_capacity(n);
        for i in 0..n {
            if t.children_left[i] == LEAF {
                let value = &t.value[i];
                if value.len() != n_classes {
                    return Err(artifact::invalid(
                        origin,
                        format!("leaf {i} has {} values for {n_classes} classes", value.len()),
                    ));
                }
                let total: f32 = value.iter().sum();
                if !(total.is_finite() && total > 0.0) {
                    return Err(artifact::invalid(origin, format!("leaf {i} is empty")));
                }
                nodes.push(Node::Leaf {
                    distribution: value.iter().map(|v| v / total).collect(),
                });
            } else {
                let feature = usize::try_from(t.feature[i])
                    .ok()
                    .filter(|f| *f < n_features)
                    .ok_or_else(|| {
                        artifact::invalid(origin, format!("node {i} splits on invalid feature"))
                    })?;
                nodes.push(Node::Split {
                    feature,
                    threshold: t.threshold[i],
                    left: child(t.children_left[i])?,
                    right: child(t.children_right[i])?,
                });
            }
        }
        Ok(Self { nodes })
    }

    /// Walk from the root to a leaf.
    ///
    /// A well-formed tree reaches a leaf in fewer steps than it has nodes;
    /// anything longer means the child links form a cycle.
    fn leaf(&self, features: &FeatureVector) -> Result<&[f32]> {
        let mut idx = 0;
        for _ in 0..=self.nodes.len() {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return Ok(distribution.as_slice()),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if features.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
        Err(DhakhtarError::Classifier {
            model: ModelFamily::RandomForest.to_string(),
            reason: "tree traversal did not terminate".into(),
        })
    }
}

/// Bagged decision trees; class probability is the mean leaf distribution.
#[derive(Debug, Clone)]
pub struct RandomForest {
    classes: Vec<String>,
    n_features: usize,
    trees: Vec<Tree>,
}

impl RandomForest {
    pub fn from_artifact(a: ForestArtifact, origin: &str) -> Result<Self> {
        if a.classes.len() < 2 {
            return Err(artifact::invalid(origin, "need at least two classes"));
        }
        if a.trees.is_empty() {
            return Err(artifact::invalid(origin, "forest has no trees"));
        }
        let n_classes = a.classes.len();
        let trees = a
            .trees
            .into_iter()
            .map(|t| Tree::from_artifact(t, n_classes, a.n_features, origin))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            classes: a.classes,
            n_features: a.n_features,
            trees,
        })
    }

    /// Mean class distribution across trees.
    pub fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f32>> {
        features.check_dimension(self.n_features)?;
        let mut sum = vec![0.0; self.classes.len()];
        for tree in &self.trees {
            for (acc, p) in sum.iter_mut().zip(tree.leaf(features)?) {
                *acc += p;
            }
        }
        let n = self.trees.len() as f32;
        Ok(sum.into_iter().map(|s| s / n).collect())
    }
}

impl Classifier for RandomForest {
    fn family(&self) -> ModelFamily {
        ModelFamily::RandomForest
    }

    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn input_dimension(&self) -> Option<usize> {
        Some(self.n_features)
    }

    fn predict(&self, features: &FeatureVector) -> Result<LabelPrediction> {
        let probabilities = self.predict_proba(features)?;
        top_of_probabilities(self.family(), &self.classes, &probabilities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Root splits on feature 0 at 0.5: left leaf favours class 0, right class 1.
    fn stump(left: [f32; 2], right: [f32; 2]) -> TreeArtifact {
        TreeArtifact {
            children_left: vec![1, LEAF, LEAF],
            children_right: vec![2, LEAF, LEAF],
            feature: vec![0, -2, -2],
            threshold: vec![0.5, -2.0, -2.0],
            value: vec![vec![1.0, 1.0], left.to_vec(), right.to_vec()],
        }
    }

    fn forest() -> RandomForest {
        RandomForest::from_artifact(
            ForestArtifact {
                classes: vec!["Malaria".into(), "Typhoid".into()],
                n_features: 2,
                trees: vec![stump([8.0, 2.0], [1.0, 9.0]), stump([6.0, 4.0], [3.0, 7.0])],
            },
            "test",
        )
        .unwrap()
    }

    #[test]
    fn averages_leaf_distributions() {
        let f = forest();
        let right = f
            .predict(&FeatureVector::from_dense(&[1.0, 0.0]).unwrap())
            .unwrap();
        assert_eq!(right.label, "Typhoid");
        assert!((right.confidence - 0.8).abs() < 1e-6);

        let left = f.predict(&FeatureVector::zeros(2)).unwrap();
        assert_eq!(left.label, "Malaria");
        assert!((left.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn cyclic_tree_fails_at_predict_time() {
        let tree = Tree {
            nodes: vec![Node::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 0,
            }],
        };
        assert!(tree.leaf(&FeatureVector::zeros(1)).is_err());
    }

    #[test]
    fn out_of_range_child_rejected() {
        let mut t = stump([1.0, 0.0], [0.0, 1.0]);
        t.children_right[0] = 7;
        let err = RandomForest::from_artifact(
            ForestArtifact {
                classes: vec!["a".into(), "b".into()],
                n_features: 2,
                trees: vec![t],
            },
            "test",
        );
        assert!(err.is_err());
    }
}
