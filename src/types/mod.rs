//! Public types for the Dhakhtar API.

mod features;
mod language;
mod prediction;

pub use features::FeatureVector;
pub use language::{Language, LanguageHint};
pub use prediction::{
    EnsembleResult, LabelPrediction, LabelTally, ModelFailure, ModelOutcome, ModelPrediction,
};
