use std::collections::HashMap;
use std::sync::Arc;

use ndarray::Array1;
use serde::Serialize;

use super::error::ClassifierError;
use super::naive_bayes::MultinomialNb;
use super::vectorizer::TfIdfVectorizer;

/// The outcome of classifying one text. Serialized as the `/predict` response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub text: String,
    pub predicted_class: String,
    pub confidence: f64,
}

/// A thread-safe text classifier: TF-IDF features fed to multinomial Naive Bayes.
///
/// # Thread Safety
///
/// All fitted state sits behind `Arc` and is never mutated after construction,
/// so a `Classifier` can be cloned cheaply and shared between HTTP workers.
///
/// ```rust
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use text_classifier::corpus;
///
/// let classifier = corpus::train()?;
/// let prediction = classifier.predict("pelayanan yang buruk")?;
/// assert_eq!(prediction.predicted_class, "negatif");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Classifier {
    labels: Arc<Vec<String>>,
    class_descriptions: Arc<HashMap<String, String>>,
    vectorizer: Arc<TfIdfVectorizer>,
    model: Arc<MultinomialNb>,
}

// Compile-time verification of thread-safety
const _: () = {
    fn assert_send_sync<T: Send + Sync>() {}
    fn verify_thread_safety() {
        assert_send_sync::<Classifier>();
    }
};

impl Classifier {
    /// Creates a new ClassifierBuilder for fluent construction
    pub fn builder() -> super::builder::ClassifierBuilder {
        super::builder::ClassifierBuilder::new()
    }

    /// Assembles a classifier from already fitted parts.
    ///
    /// The label count must match the model's class count. The vectorizer is not
    /// checked against the model here; a pair with different feature spaces fails
    /// at prediction time.
    pub fn from_parts(
        labels: Vec<String>,
        class_descriptions: HashMap<String, String>,
        vectorizer: Arc<TfIdfVectorizer>,
        model: Arc<MultinomialNb>,
    ) -> Result<Self, ClassifierError> {
        if labels.len() != model.n_classes() {
            return Err(ClassifierError::ModelError(format!(
                "Model has {} classes but {} labels were given",
                model.n_classes(),
                labels.len()
            )));
        }
        Ok(Self {
            labels: Arc::new(labels),
            class_descriptions: Arc::new(class_descriptions),
            vectorizer,
            model,
        })
    }

    /// Returns information about the classifier's current state
    pub fn info(&self) -> super::ClassifierInfo {
        super::ClassifierInfo {
            num_classes: self.labels.len(),
            class_labels: self.labels.to_vec(),
            class_descriptions: Arc::clone(&self.class_descriptions),
            vocabulary_size: self.vectorizer.n_features(),
            fingerprint: self.vectorizer.fingerprint(),
        }
    }

    /// Class labels, indexed by class
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn class_descriptions(&self) -> &HashMap<String, String> {
        &self.class_descriptions
    }

    pub fn vectorizer(&self) -> &Arc<TfIdfVectorizer> {
        &self.vectorizer
    }

    pub fn model(&self) -> &Arc<MultinomialNb> {
        &self.model
    }

    /// Maps text into the vectorizer's feature space.
    pub fn transform(&self, text: &str) -> Result<Array1<f64>, ClassifierError> {
        let batch = self.vectorizer.transform_batch(&[text]);
        batch
            .outer_iter()
            .next()
            .map(|row| row.to_owned())
            .ok_or_else(|| {
                ClassifierError::PredictionError("Vectorizer returned an empty batch".into())
            })
    }

    /// Returns the most probable class index and its probability.
    pub fn classify(&self, features: &Array1<f64>) -> Result<(usize, f64), ClassifierError> {
        self.model.predict(features.view())
    }

    /// Label for a class index
    pub fn label(&self, index: usize) -> Result<&str, ClassifierError> {
        self.labels
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| {
                ClassifierError::PredictionError(format!("Class index {} has no label", index))
            })
    }

    /// Classifies `text` end to end.
    ///
    /// # Returns
    /// A [`Prediction`] holding the input text, the predicted label and the
    /// maximum class probability as confidence (0.0 to 1.0).
    pub fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        let features = self.transform(text)?;
        let (index, confidence) = self.classify(&features)?;
        Ok(Prediction {
            text: text.to_string(),
            predicted_class: self.label(index)?.to_string(),
            confidence,
        })
    }
}
