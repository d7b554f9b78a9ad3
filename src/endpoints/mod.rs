use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use chrono::{NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::catalog::{Catalog, CatalogError};

pub mod index_resource;
pub mod playlist_resource;
pub mod sound_resource;

/// Handles shared by every actix worker.
#[derive(Clone)]
pub struct SharedHandles {
    pub catalog: Arc<Catalog>,
    pub qty_workers: usize,
    pub started_at: NaiveDateTime,
}

impl SharedHandles {
    pub fn new(catalog: Arc<Catalog>, qty_workers: usize) -> Self {
        SharedHandles {
            catalog,
            qty_workers,
            started_at: Utc::now().naive_utc(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DataEnvelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct CreateRequest<T> {
    pub data: Vec<T>,
}

impl<T> CreateRequest<T> {
    /// The payload of a create request must not be empty.
    pub fn into_non_empty(self) -> Result<Vec<T>, CatalogError> {
        if self.data.is_empty() {
            return Err(CatalogError::InvalidInput {
                issues: vec!["data: must contain at least 1 element(s)".to_string()],
            });
        }
        Ok(self.data)
    }
}

impl ResponseError for CatalogError {
    fn status_code(&self) -> StatusCode {
        match self {
            CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
            CatalogError::InvalidInput { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            CatalogError::NotFound { .. } => json!({
                "message": self.to_string(),
                "name": "NotFoundError",
            }),
            CatalogError::InvalidInput { issues } => json!({
                "message": "Invalid input",
                "name": "InvalidInput",
                "issues": issues,
            }),
            CatalogError::Store(err) => {
                tracing::error!(error = %err, "Error while processing request");
                json!({
                    "message": "Internal server error",
                    "name": "InternalServerError",
                })
            }
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

/// Malformed JSON bodies are reported like any other invalid input.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        CatalogError::InvalidInput {
            issues: vec![err.to_string()],
        }
        .into()
    })
}

/// Missing or malformed query parameters are reported as invalid input.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        CatalogError::InvalidInput {
            issues: vec![err.to_string()],
        }
        .into()
    })
}

/// Registers all API routes. `/sounds/recommended` has to precede `/sounds/{id}`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(sound_resource::list_sounds)
        .service(sound_resource::recommended_sounds)
        .service(sound_resource::get_sound)
        .service(sound_resource::add_sounds)
        .service(playlist_resource::list_playlists)
        .service(playlist_resource::add_playlists)
        .service(index_resource::ping)
        .service(index_resource::internal);
}
