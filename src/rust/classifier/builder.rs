use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};

use super::classifier::Classifier;
use super::error::ClassifierError;
use super::naive_bayes::MultinomialNb;
use super::vectorizer::TfIdfVectorizer;

/// Represents a class definition with required label, description and training examples
#[derive(Debug, Clone)]
pub struct ClassDefinition {
    /// The label returned for predictions of this class
    pub label: String,
    /// A short description of what this class represents.
    /// Reported by the service info endpoint.
    pub description: String,
    /// Example texts that belong to this class. They form the training corpus.
    pub examples: Option<Vec<String>>,
}

impl ClassDefinition {
    /// Creates a new class definition with required label and description
    ///
    /// # Example
    /// ```
    /// use text_classifier::ClassDefinition;
    ///
    /// let class = ClassDefinition::new("positif", "Kalimat dengan sentimen positif");
    /// ```
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
            examples: None,
        }
    }

    /// Adds training examples to the class definition
    ///
    /// # Example
    /// ```
    /// use text_classifier::ClassDefinition;
    ///
    /// let class = ClassDefinition::new("positif", "Positive sentiment")
    ///     .with_examples(vec!["produk ini sangat bagus", "pelayanan yang memuaskan"]);
    /// ```
    pub fn with_examples(mut self, examples: Vec<impl Into<String>>) -> Self {
        self.examples = Some(examples.into_iter().map(Into::into).collect());
        self
    }
}

/// A builder that fits a [`Classifier`] from labelled examples.
///
/// Class indices follow the order in which classes are added.
#[derive(Debug)]
pub struct ClassifierBuilder {
    labels: Vec<String>,
    class_examples: Vec<Vec<String>>,
    class_descriptions: HashMap<String, String>,
    alpha: f64,
}

impl Default for ClassifierBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierBuilder {
    /// Creates an empty builder with the default smoothing
    ///
    /// # Example
    /// ```
    /// use text_classifier::ClassifierBuilder;
    ///
    /// let builder = ClassifierBuilder::new();
    /// ```
    pub fn new() -> Self {
        Self {
            labels: Vec::new(),
            class_examples: Vec::new(),
            class_descriptions: HashMap::new(),
            alpha: MultinomialNb::DEFAULT_ALPHA,
        }
    }

    /// Sets the additive smoothing used when fitting the Naive Bayes model.
    ///
    /// Checked in [`ClassifierBuilder::build`]: must be finite and positive.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Validates class data according to the following rules:
    /// - Label must not be empty
    /// - Description must not be empty and must not exceed 1000 characters
    /// - Must have at least one example
    /// - No example text can be empty
    fn validate_class_data(
        label: &str,
        description: &str,
        examples: &[impl AsRef<str>],
    ) -> Result<(), ClassifierError> {
        const MAX_DESCRIPTION_LENGTH: usize = 1000;

        if label.is_empty() {
            return Err(ClassifierError::ValidationError("Class label cannot be empty".into()));
        }
        if description.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Class description cannot be empty".into(),
            ));
        }
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(ClassifierError::ValidationError(format!(
                "Class description is too long ({} chars, max is {})",
                description.chars().count(),
                MAX_DESCRIPTION_LENGTH
            )));
        }
        if examples.is_empty() {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' must have at least one example",
                label
            )));
        }
        if let Some(pos) = examples.iter().position(|e| e.as_ref().trim().is_empty()) {
            return Err(ClassifierError::ValidationError(format!(
                "Example {} of class '{}' cannot be empty",
                pos + 1,
                label
            )));
        }
        Ok(())
    }

    /// Adds a class with its label, description and training examples
    ///
    /// # Errors
    /// `ValidationError` if the label is empty or already used, the description is
    /// empty or too long, no examples are given, an example is blank, or more than
    /// 100 classes would be defined.
    ///
    /// # Example
    /// ```
    /// use text_classifier::{ClassifierBuilder, ClassDefinition};
    ///
    /// let builder = ClassifierBuilder::new()
    ///     .add_class(
    ///         ClassDefinition::new("netral", "Neutral sentiment")
    ///             .with_examples(vec!["standar saja"])
    ///     );
    /// assert!(builder.is_ok());
    /// ```
    pub fn add_class(mut self, class: ClassDefinition) -> Result<Self, ClassifierError> {
        const MAX_CLASSES: usize = 100;

        let examples = class.examples.unwrap_or_default();
        Self::validate_class_data(&class.label, &class.description, &examples)?;

        if self.labels.contains(&class.label) {
            return Err(ClassifierError::ValidationError(format!(
                "Class '{}' is already defined",
                class.label
            )));
        }
        if self.labels.len() >= MAX_CLASSES {
            return Err(ClassifierError::ValidationError(format!(
                "Maximum number of classes ({}) exceeded",
                MAX_CLASSES
            )));
        }

        self.labels.push(class.label.clone());
        self.class_examples.push(examples);
        self.class_descriptions.insert(class.label, class.description);
        Ok(self)
    }

    /// Fits the vectorizer on every example, then the model on the resulting matrix
    ///
    /// # Errors
    /// - `BuildError` if no class was added or the examples yield no vocabulary
    /// - `ValidationError` if the smoothing parameter is invalid
    ///
    /// # Example
    /// ```
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// use text_classifier::{ClassifierBuilder, ClassDefinition};
    ///
    /// let classifier = ClassifierBuilder::new()
    ///     .add_class(ClassDefinition::new("positif", "Positive").with_examples(vec!["bagus"]))?
    ///     .add_class(ClassDefinition::new("negatif", "Negative").with_examples(vec!["buruk"]))?
    ///     .build()?;
    /// assert_eq!(classifier.predict("buruk")?.predicted_class, "negatif");
    /// # Ok(())
    /// # }
    /// ```
    pub fn build(self) -> Result<Classifier, ClassifierError> {
        if self.labels.is_empty() {
            return Err(ClassifierError::BuildError("At least one class must be added".to_string()));
        }

        let mut texts: Vec<&str> = Vec::new();
        let mut targets: Vec<usize> = Vec::new();
        for (index, examples) in self.class_examples.iter().enumerate() {
            debug!("Class '{}' has {} examples", self.labels[index], examples.len());
            texts.extend(examples.iter().map(String::as_str));
            targets.extend(std::iter::repeat(index).take(examples.len()));
        }

        let vectorizer = TfIdfVectorizer::fit(&texts)?;
        info!(
            "Vectorizer fitted on {} documents ({} features)",
            texts.len(),
            vectorizer.n_features()
        );

        let features = vectorizer.transform_batch(&texts);
        let model = MultinomialNb::fit(features.view(), &targets, self.labels.len(), self.alpha)?;
        info!("Naive Bayes fitted on {} classes (alpha = {})", model.n_classes(), model.alpha());

        Classifier::from_parts(
            self.labels,
            self.class_descriptions,
            Arc::new(vectorizer),
            Arc::new(model),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_classes() -> Result<ClassifierBuilder, ClassifierError> {
        ClassifierBuilder::new()
            .add_class(ClassDefinition::new("a", "First").with_examples(vec!["alpha beta"]))?
            .add_class(ClassDefinition::new("b", "Second").with_examples(vec!["gamma delta"]))
    }

    #[test]
    fn test_class_validation() {
        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("", "Empty label").with_examples(vec!["x y"]))
            .is_err());

        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("label", "").with_examples(vec!["x y"]))
            .is_err());

        assert!(ClassifierBuilder::new()
            .add_class(ClassDefinition::new("label", "No examples"))
            .is_err());

        let result = ClassifierBuilder::new()
            .add_class(ClassDefinition::new("label", "Blank example").with_examples(vec!["  "]));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));

        let result = ClassifierBuilder::new()
            .add_class(ClassDefinition::new("label", "a".repeat(1001)).with_examples(vec!["x y"]));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
    }

    #[test]
    fn test_duplicate_class() -> Result<(), ClassifierError> {
        let result = two_classes()?
            .add_class(ClassDefinition::new("a", "Again").with_examples(vec!["epsilon"]));
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
        Ok(())
    }

    #[test]
    fn test_too_many_classes() -> Result<(), ClassifierError> {
        let mut builder = ClassifierBuilder::new();
        for i in 0..100 {
            let class = ClassDefinition::new(format!("class_{}", i), "Generated");
            builder = builder.add_class(class.with_examples(vec!["text"]))?;
        }
        let overflow = ClassDefinition::new("overflow", "One too many");
        let result = builder.add_class(overflow.with_examples(vec!["text"]));
        assert!(result.is_err());
        Ok(())
    }

    #[test]
    fn test_build_requires_classes() {
        let result = ClassifierBuilder::new().build();
        assert!(matches!(result, Err(ClassifierError::BuildError(_))));
    }

    #[test]
    fn test_build_rejects_invalid_alpha() -> Result<(), ClassifierError> {
        let result = two_classes()?.with_alpha(-1.0).build();
        assert!(matches!(result, Err(ClassifierError::ValidationError(_))));
        Ok(())
    }

    #[test]
    fn test_class_order_defines_indices() -> Result<(), ClassifierError> {
        let classifier = two_classes()?.build()?;
        assert_eq!(classifier.labels(), &["a".to_string(), "b".to_string()]);
        let features = classifier.transform("gamma")?;
        let (index, _) = classifier.classify(&features)?;
        assert_eq!(index, 1);
        Ok(())
    }
}
