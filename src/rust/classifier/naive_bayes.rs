use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use super::error::ClassifierError;
use super::utils::{argmax, log_sum_exp};

/// Multinomial Naive Bayes over non-negative feature vectors.
///
/// Parameters are stored in log space:
/// - `class_log_prior[c] = ln(count_c / n)`
/// - `feature_log_prob[c, j] = ln((fc[c, j] + alpha) / (sum_j fc[c, j] + alpha * n_features))`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultinomialNb {
    alpha: f64,
    class_log_prior: Array1<f64>,
    feature_log_prob: Array2<f64>,
}

impl MultinomialNb {
    pub const DEFAULT_ALPHA: f64 = 1.0;

    /// Fits the model on a `(samples, features)` matrix and one label per row.
    ///
    /// Labels must lie in `0..n_classes` and every class needs at least one sample.
    pub fn fit(
        features: ArrayView2<f64>,
        labels: &[usize],
        n_classes: usize,
        alpha: f64,
    ) -> Result<Self, ClassifierError> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ClassifierError::ValidationError(format!(
                "Smoothing parameter alpha must be finite and positive, got {}",
                alpha
            )));
        }
        if features.nrows() == 0 {
            return Err(ClassifierError::BuildError("Cannot fit on zero samples".into()));
        }
        if features.nrows() != labels.len() {
            return Err(ClassifierError::BuildError(format!(
                "Found {} samples but {} labels",
                features.nrows(),
                labels.len()
            )));
        }
        if let Some(&label) = labels.iter().find(|&&label| label >= n_classes) {
            return Err(ClassifierError::BuildError(format!(
                "Label {} is out of range for {} classes",
                label, n_classes
            )));
        }
        if features.iter().any(|&x| !x.is_finite() || x < 0.0) {
            return Err(ClassifierError::BuildError(
                "Feature values must be finite and non-negative".into(),
            ));
        }

        let n_features = features.ncols();
        let mut class_count = Array1::<f64>::zeros(n_classes);
        let mut feature_count = Array2::<f64>::zeros((n_classes, n_features));
        for (row, &label) in features.outer_iter().zip(labels) {
            class_count[label] += 1.0;
            feature_count.row_mut(label).scaled_add(1.0, &row);
        }

        if let Some(empty) = class_count.iter().position(|&count| count == 0.0) {
            return Err(ClassifierError::BuildError(format!(
                "Class {} has no training samples",
                empty
            )));
        }

        let total = labels.len() as f64;
        let class_log_prior = class_count.mapv(|count| (count / total).ln());

        let smoothed = feature_count.mapv(|count| count + alpha);
        let totals = smoothed.sum_axis(Axis(1));
        let mut feature_log_prob = smoothed.mapv(f64::ln);
        for (mut row, total) in feature_log_prob.outer_iter_mut().zip(totals.iter()) {
            let log_total = total.ln();
            row.mapv_inplace(|v| v - log_total);
        }

        Ok(Self {
            alpha,
            class_log_prior,
            feature_log_prob,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.class_log_prior.len()
    }

    pub fn n_features(&self) -> usize {
        self.feature_log_prob.ncols()
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Unnormalized log posterior of each class for one sample.
    pub fn joint_log_likelihood(
        &self,
        features: ArrayView1<f64>,
    ) -> Result<Array1<f64>, ClassifierError> {
        if features.len() != self.n_features() {
            return Err(ClassifierError::PredictionError(format!(
                "Input has {} features, but the model is expecting {} features",
                features.len(),
                self.n_features()
            )));
        }
        Ok(self.feature_log_prob.dot(&features) + &self.class_log_prior)
    }

    /// Posterior probability of each class; sums to 1.
    pub fn predict_proba(&self, features: ArrayView1<f64>) -> Result<Array1<f64>, ClassifierError> {
        let jll = self.joint_log_likelihood(features)?;
        let log_norm = log_sum_exp(jll.view());
        let proba = jll.mapv(|v| (v - log_norm).exp());
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(ClassifierError::PredictionError(
                "Class probabilities are not finite".into(),
            ));
        }
        Ok(proba)
    }

    /// Most probable class and its probability.
    pub fn predict(&self, features: ArrayView1<f64>) -> Result<(usize, f64), ClassifierError> {
        let proba = self.predict_proba(features)?;
        let index = argmax(proba.view())
            .ok_or_else(|| ClassifierError::ModelError("Model has no classes".into()))?;
        Ok((index, proba[index]))
    }
}
