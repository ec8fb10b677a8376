//! Dhakhtar - symptom to disease prediction with weighted ensemble voting
//!
//! Free-text symptoms (English or Somali) are vectorized, scored by a pool
//! of independently trained classifiers and combined by weighted plurality
//! vote. Confident answers come back with precautionary advice, localized
//! to the caller's language.
//!
//! ```text
//! symptoms ─► LanguagePipeline ─► Vectorizer ─► ModelPool ─► aggregate ─► ConfidenceGate
//!                  (to English)                 (per model)   (vote)          │
//!                                                                             ▼
//!                   PredictionStore ◄── LanguagePipeline ◄── PrecautionBook lookup
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use dhakhtar::{
//!     DiagnoseRequest, DiagnosisOutcome, Dhakhtar, ModelPool, ModelSpec, TfidfVectorizer,
//!     Vectorizer,
//! };
//!
//! #[tokio::main]
//! async fn main() -> dhakhtar::Result<()> {
//!     let vectorizer = TfidfVectorizer::load(Path::new("artifacts/vectorizer.json"))?;
//!     let specs = [
//!         ModelSpec { name: "logreg".into(), path: "artifacts/logreg.json".into(), weight: 0.4 },
//!         ModelSpec { name: "forest".into(), path: "artifacts/forest.json".into(), weight: 0.3 },
//!         ModelSpec { name: "svm".into(), path: "artifacts/svm.json".into(), weight: 0.3 },
//!     ];
//!     let pool = ModelPool::from_artifacts(&specs, vectorizer.dimension())?;
//!
//!     let service = Dhakhtar::builder()
//!         .vectorizer(Arc::new(vectorizer))
//!         .pool(Arc::new(pool))
//!         .build()?;
//!
//!     match service.diagnose(DiagnoseRequest::new("fever, chills and sweating")).await? {
//!         DiagnosisOutcome::Diagnosed(d) => println!("{} ({:.2})", d.disease, d.confidence),
//!         DiagnosisOutcome::Unclear { confidence, .. } => println!("unclear ({confidence:.2})"),
//!     }
//!     Ok(())
//! }
//! ```

mod artifact;
pub mod ensemble;
pub mod error;
pub mod models;
pub mod precautions;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod store;
pub mod telemetry;
pub mod translate;
pub mod types;
pub mod vectorizer;
pub mod version;

// Re-export main types at crate root
pub use error::{DhakhtarError, Result};
pub use version::{BuildInfo, PKG_VERSION};

pub use ensemble::{ConfidenceGate, GateDecision, GateMetric, aggregate};
pub use models::{Classifier, ModelFamily, ModelPool, ModelSpec, load_classifier};
pub use precautions::{MatchKind, PrecautionBook, PrecautionEntry};
pub use service::{
    DiagnoseRequest, Diagnosis, DiagnosisOutcome, DiagnosisService, Dhakhtar, DhakhtarBuilder,
};
pub use store::{JsonlStore, MemoryStore, PredictionId, PredictionRecord, PredictionStore};
pub use translate::{LanguagePipeline, Translator};
pub use types::{
    EnsembleResult, FeatureVector, LabelPrediction, Language, LanguageHint, ModelOutcome,
    ModelPrediction,
};
pub use vectorizer::{TfidfVectorizer, Vectorizer};
