//! A small text classification service: TF-IDF features, multinomial Naive Bayes,
//! and an actix-web endpoint in front of them.
//!
//! # Basic Usage
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use text_classifier::{Classifier, ClassDefinition};
//!
//! let classifier = Classifier::builder()
//!     .add_class(
//!         ClassDefinition::new("positif", "Sentimen positif")
//!             .with_examples(vec!["produk ini sangat bagus", "pelayanan yang memuaskan"])
//!     )?
//!     .add_class(
//!         ClassDefinition::new("negatif", "Sentimen negatif")
//!             .with_examples(vec!["pelayanan yang buruk", "pengalaman yang mengecewakan"])
//!     )?
//!     .build()?;
//!
//! let prediction = classifier.predict("produk bagus")?;
//! println!("Predicted class: {} ({:.2})", prediction.predicted_class, prediction.confidence);
//! # Ok(())
//! # }
//! ```
//!
//! # Persistence
//!
//! [`ModelManager`] decides at startup whether to train on the built-in corpus
//! or load a previously saved model and vectorizer:
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use text_classifier::ModelManager;
//!
//! let manager = ModelManager::new("model/");
//! let classifier = manager.bootstrap()?;
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod corpus;
pub mod model_manager;
mod runtime;
pub mod server;

pub use classifier::{
    ClassDefinition, Classifier, ClassifierBuilder, ClassifierError, ClassifierInfo, MultinomialNb,
    Prediction, TfIdfVectorizer,
};
pub use model_manager::{Bootstrap, ModelError, ModelManager};
pub use runtime::RuntimeConfig;
pub use server::{ApiError, Server};

pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}
