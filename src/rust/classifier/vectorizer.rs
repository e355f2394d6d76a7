use std::collections::{BTreeMap, BTreeSet};

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::ClassifierError;
use super::utils::normalize_vector;

/// Converts raw text into L2-normalized TF-IDF feature vectors.
///
/// The feature space is fixed at fit time:
/// 1. Text is lowercased and split into runs of word characters
/// 2. Runs shorter than two characters are dropped
/// 3. Each vocabulary term gets a column, in sorted term order
/// 4. Counts are weighted by the smoothed inverse document frequency
///    `ln((1 + n) / (1 + df)) + 1`
///
/// Terms never seen during fitting are ignored by [`TfIdfVectorizer::transform`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    vocabulary: BTreeMap<String, usize>,
    idf: Array1<f64>,
}

impl TfIdfVectorizer {
    /// Learns the vocabulary and IDF weights from a corpus.
    ///
    /// # Errors
    /// - `ValidationError` if the corpus is empty
    /// - `BuildError` if no document contains a usable token
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self, ClassifierError> {
        if documents.is_empty() {
            return Err(ClassifierError::ValidationError(
                "Cannot fit a vectorizer on an empty corpus".into(),
            ));
        }

        let tokenized: Vec<BTreeSet<String>> = documents
            .iter()
            .map(|doc| tokenize(doc.as_ref()).into_iter().collect())
            .collect();

        let terms: BTreeSet<&String> = tokenized.iter().flatten().collect();
        if terms.is_empty() {
            return Err(ClassifierError::BuildError(
                "Empty vocabulary; the documents contain no tokens of two or more characters"
                    .into(),
            ));
        }

        let vocabulary: BTreeMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(index, term)| (term.clone(), index))
            .collect();

        let mut document_frequency = Array1::<f64>::zeros(vocabulary.len());
        for doc_terms in &tokenized {
            for term in doc_terms {
                document_frequency[vocabulary[term]] += 1.0;
            }
        }

        let n = documents.len() as f64;
        let idf = document_frequency.mapv(|df| ((1.0 + n) / (1.0 + df)).ln() + 1.0);

        Ok(Self { vocabulary, idf })
    }

    /// Maps a single text into the fitted feature space.
    pub fn transform(&self, text: &str) -> Array1<f64> {
        let mut counts = Array1::<f64>::zeros(self.n_features());
        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                counts[index] += 1.0;
            }
        }
        normalize_vector(&(counts * &self.idf))
    }

    /// Maps a batch of texts into a `(documents, features)` matrix.
    pub fn transform_batch<S: AsRef<str>>(&self, documents: &[S]) -> Array2<f64> {
        let mut matrix = Array2::<f64>::zeros((documents.len(), self.n_features()));
        for (mut row, doc) in matrix.outer_iter_mut().zip(documents) {
            row.assign(&self.transform(doc.as_ref()));
        }
        matrix
    }

    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &BTreeMap<String, usize> {
        &self.vocabulary
    }

    pub fn idf(&self) -> &Array1<f64> {
        &self.idf
    }

    /// SHA-256 over the vocabulary in column order, hex encoded.
    ///
    /// Two vectorizers share a fingerprint exactly when their feature columns
    /// mean the same terms, which is what a model trained on one of them needs.
    pub fn fingerprint(&self) -> String {
        let mut columns: Vec<(&usize, &String)> =
            self.vocabulary.iter().map(|(term, index)| (index, term)).collect();
        columns.sort();

        let mut hasher = Sha256::new();
        for (_, term) in columns {
            hasher.update(term.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Lowercases `text` and returns every run of word characters of length two or more.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| token.chars().count() >= 2)
        .map(str::to_string)
        .collect()
}
