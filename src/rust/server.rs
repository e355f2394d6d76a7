use actix_web::error::InternalError;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::ResponseError;
use serde::Deserialize;
use serde::Serialize;

use crate::classifier::{Classifier, ClassifierError, Prediction};
use crate::runtime::RuntimeConfig;

pub const TITLE: &str = "Klasifikasi Teks API";
pub const DESCRIPTION: &str = "API untuk klasifikasi teks sederhana";

/// Largest accepted JSON body. Bigger bodies get 413 Payload Too Large.
pub const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct PredictionRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassResponse {
    pub index: usize,
    pub label: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InfoResponse {
    pub title: String,
    pub description: String,
    pub version: String,
    pub classes: Vec<ClassResponse>,
    pub vocabulary_size: usize,
    pub fingerprint: String,
}

/// Failures while serving a prediction. All of them become a 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}

pub struct Server;

impl Server {
    pub async fn run(classifier: Classifier, config: RuntimeConfig) -> Result<(), std::io::Error> {
        let classifier = web::Data::new(classifier);
        let address = config.bind_address();
        log::info!("starting HTTP server on {}", address);
        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .app_data(classifier.clone())
                .configure(configure)
        });
        if config.workers > 0 {
            server = server.workers(config.workers);
        }
        server.bind(address)?.run().await
    }
}

/// Registers every route. Expects `web::Data<Classifier>` in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default()
        .limit(MAX_PAYLOAD_BYTES)
        .error_handler(|err, _req| {
            let status = match err {
                JsonPayloadError::Overflow { .. }
                | JsonPayloadError::OverflowKnownLength { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let detail = err.to_string();
            log::debug!("rejecting request body ({}): {}", status, detail);
            let response = HttpResponse::build(status).json(ErrorResponse { detail });
            InternalError::from_response(err, response).into()
        });
    cfg.app_data(json_config)
        .route("/health", web::get().to(health))
        .route("/predict", web::post().to(predict))
        .route("/info", web::get().to(info));
}

// Route handlers
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
    })
}

async fn predict(
    classifier: web::Data<Classifier>,
    request: web::Json<PredictionRequest>,
) -> Result<web::Json<Prediction>, ApiError> {
    let prediction = classifier.predict(&request.text).map_err(|e| {
        log::error!("prediction failed: {}", e);
        e
    })?;
    log::debug!(
        "predicted {} ({:.3}) for {:?}",
        prediction.predicted_class,
        prediction.confidence,
        prediction.text
    );
    Ok(web::Json(prediction))
}

async fn info(classifier: web::Data<Classifier>) -> HttpResponse {
    let info = classifier.info();
    let classes = info
        .class_labels
        .iter()
        .enumerate()
        .map(|(index, label)| ClassResponse {
            index,
            label: label.clone(),
            description: info.class_descriptions.get(label).cloned().unwrap_or_default(),
        })
        .collect();
    HttpResponse::Ok().json(InfoResponse {
        title: TITLE.to_string(),
        description: DESCRIPTION.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        classes,
        vocabulary_size: info.vocabulary_size,
        fingerprint: info.fingerprint,
    })
}
