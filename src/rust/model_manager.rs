use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::classifier::{Classifier, ClassifierError, MultinomialNb, TfIdfVectorizer};
use crate::corpus;

/// Environment variable naming the artifact directory
pub const MODEL_PATH_ENV: &str = "MODEL_PATH";
/// Artifact directory used when `MODEL_PATH` is unset
pub const DEFAULT_MODEL_PATH: &str = "model/";

const MODEL_FILE: &str = "model.joblib";
const VECTORIZER_FILE: &str = "vectorizer.joblib";
const FORMAT_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Artifact serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error(transparent)]
    ClassifierError(#[from] ClassifierError),
    #[error("Unsupported {file_type} artifact format version {found} (expected {expected})")]
    UnsupportedFormat {
        file_type: String,
        found: u32,
        expected: u32,
    },
    #[error(
        "Artifact mismatch: model was trained with vectorizer {expected}, found vectorizer {actual}"
    )]
    FingerprintMismatch { expected: String, actual: String },
}

/// How the classifier will be obtained at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// At least one artifact is missing: train on the built-in corpus and persist
    /// the pair
    TrainFresh,
    /// Both artifacts exist: load them
    LoadExisting,
}

#[derive(Serialize, Deserialize)]
struct ModelArtifact {
    format_version: u32,
    vectorizer_fingerprint: String,
    labels: Vec<String>,
    class_descriptions: HashMap<String, String>,
    model: MultinomialNb,
}

#[derive(Serialize, Deserialize)]
struct VectorizerArtifact {
    format_version: u32,
    fingerprint: String,
    vectorizer: TfIdfVectorizer,
}

/// Owns the artifact directory and the train-or-load decision.
#[derive(Debug, Clone)]
pub struct ModelManager {
    models_dir: PathBuf,
}

impl ModelManager {
    /// The directory is only created when a fresh model is saved.
    pub fn new<P: AsRef<Path>>(models_dir: P) -> Self {
        Self {
            models_dir: models_dir.as_ref().to_path_buf(),
        }
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn get_model_path(&self) -> PathBuf {
        self.models_dir.join(MODEL_FILE)
    }

    pub fn get_vectorizer_path(&self) -> PathBuf {
        self.models_dir.join(VECTORIZER_FILE)
    }

    pub fn is_model_saved(&self) -> bool {
        let model_path = self.get_model_path();
        let vectorizer_path = self.get_vectorizer_path();
        let model_exists = model_path.exists();
        let vectorizer_exists = vectorizer_path.exists();
        log::info!("Checking for saved model:");
        log::info!("  Model path: {:?} (exists: {})", model_path, model_exists);
        log::info!("  Vectorizer path: {:?} (exists: {})", vectorizer_path, vectorizer_exists);
        model_exists && vectorizer_exists
    }

    /// Decides between training and loading with a single existence check.
    pub fn plan(&self) -> Bootstrap {
        if self.is_model_saved() {
            Bootstrap::LoadExisting
        } else {
            Bootstrap::TrainFresh
        }
    }

    /// Produces the classifier to serve, training and persisting it if needed.
    ///
    /// Any failure here is fatal for the service: a corrupt or mismatched pair is
    /// reported, never repaired.
    pub fn bootstrap(&self) -> Result<Classifier, ModelError> {
        self.execute(self.plan())
    }

    /// Carries out a decision taken earlier by [`ModelManager::plan`].
    pub fn execute(&self, plan: Bootstrap) -> Result<Classifier, ModelError> {
        match plan {
            Bootstrap::TrainFresh => {
                log::info!("No saved model found, training on the built-in corpus...");
                let classifier = corpus::train()?;
                self.save(&classifier)?;
                Ok(classifier)
            }
            Bootstrap::LoadExisting => {
                log::info!("Saved model found, loading...");
                self.load()
            }
        }
    }

    /// Writes both artifacts. The vectorizer goes first so that a partial write
    /// never leaves a model without its vectorizer looking complete.
    pub fn save(&self, classifier: &Classifier) -> Result<(), ModelError> {
        log::info!("Creating model directory at {:?}", self.models_dir);
        fs::create_dir_all(&self.models_dir)?;

        let fingerprint = classifier.vectorizer().fingerprint();
        let vectorizer = VectorizerArtifact {
            format_version: FORMAT_VERSION,
            fingerprint: fingerprint.clone(),
            vectorizer: classifier.vectorizer().as_ref().clone(),
        };
        let model = ModelArtifact {
            format_version: FORMAT_VERSION,
            vectorizer_fingerprint: fingerprint,
            labels: classifier.labels().to_vec(),
            class_descriptions: classifier.class_descriptions().clone(),
            model: classifier.model().as_ref().clone(),
        };

        Self::write_artifact(&self.get_vectorizer_path(), &vectorizer)?;
        Self::write_artifact(&self.get_model_path(), &model)?;
        log::info!("Model and vectorizer saved to {:?}", self.models_dir);
        Ok(())
    }

    /// Reads both artifacts and checks that they belong together.
    pub fn load(&self) -> Result<Classifier, ModelError> {
        let vectorizer: VectorizerArtifact = Self::read_artifact(&self.get_vectorizer_path())?;
        Self::check_format("vectorizer", vectorizer.format_version)?;
        let model: ModelArtifact = Self::read_artifact(&self.get_model_path())?;
        Self::check_format("model", model.format_version)?;

        let actual = vectorizer.vectorizer.fingerprint();
        if actual != vectorizer.fingerprint || actual != model.vectorizer_fingerprint {
            log::error!(
                "Vectorizer fingerprint {} does not match the model's {}",
                actual,
                model.vectorizer_fingerprint
            );
            return Err(ModelError::FingerprintMismatch {
                expected: model.vectorizer_fingerprint,
                actual,
            });
        }

        let classifier = Classifier::from_parts(
            model.labels,
            model.class_descriptions,
            Arc::new(vectorizer.vectorizer),
            Arc::new(model.model),
        )?;
        log::info!(
            "Loaded model with {} classes and {} features",
            classifier.labels().len(),
            classifier.vectorizer().n_features()
        );
        Ok(classifier)
    }

    pub fn remove_saved(&self) -> Result<(), ModelError> {
        let model_path = self.get_model_path();
        let vectorizer_path = self.get_vectorizer_path();

        if model_path.exists() {
            fs::remove_file(&model_path)?;
        }
        if vectorizer_path.exists() {
            fs::remove_file(&vectorizer_path)?;
        }
        Ok(())
    }

    fn check_format(file_type: &str, found: u32) -> Result<(), ModelError> {
        if found != FORMAT_VERSION {
            return Err(ModelError::UnsupportedFormat {
                file_type: file_type.to_string(),
                found,
                expected: FORMAT_VERSION,
            });
        }
        Ok(())
    }

    fn write_artifact<T: Serialize>(path: &Path, artifact: &T) -> Result<(), ModelError> {
        let bytes = serde_json::to_vec(artifact)?;
        let tmp_path = path.with_extension("joblib.tmp");
        log::info!("Writing {} bytes to {:?}", bytes.len(), path);
        fs::write(&tmp_path, &bytes)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn read_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
        log::info!("Reading artifact {:?}", path);
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            log::error!("Failed to deserialize {:?}: {}", path, e);
            ModelError::from(e)
        })
    }
}
