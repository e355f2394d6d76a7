/// Errors raised while building the classifier or serving a prediction.
///
/// Every variant carries a human readable message; the HTTP layer exposes
/// the `Display` form verbatim, so messages should make sense on their own.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    /// Invalid class definition or builder parameter
    #[error("Validation error: {0}")]
    ValidationError(String),
    /// Fitting the vectorizer or the model failed
    #[error("Build error: {0}")]
    BuildError(String),
    /// Fitted state is internally inconsistent
    #[error("Model error: {0}")]
    ModelError(String),
    /// Transform or classify failed for a given input
    #[error("Prediction error: {0}")]
    PredictionError(String),
}
