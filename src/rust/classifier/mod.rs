use std::collections::HashMap;
use std::sync::Arc;

mod error;
mod utils;
pub mod builder;
#[allow(clippy::module_inception)]
pub mod classifier;
pub mod naive_bayes;
pub mod vectorizer;

pub use error::ClassifierError;
pub use classifier::{Classifier, Prediction};
pub use builder::{ClassifierBuilder, ClassDefinition};
pub use naive_bayes::MultinomialNb;
pub use vectorizer::TfIdfVectorizer;

/// Information about the current state and configuration of a classifier
#[derive(Debug, Clone)]
pub struct ClassifierInfo {
    /// Number of classes the classifier is trained on
    pub num_classes: usize,
    /// Labels of the classes, in class index order
    pub class_labels: Vec<String>,
    /// Descriptions of the classes
    pub class_descriptions: Arc<HashMap<String, String>>,
    /// Number of vectorizer features
    pub vocabulary_size: usize,
    /// Fingerprint of the vectorizer the model was trained with
    pub fingerprint: String,
}
