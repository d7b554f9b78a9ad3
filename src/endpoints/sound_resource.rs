use actix_web::{get, post, web, HttpResponse};
use serde::Deserialize;

use crate::catalog::CatalogError;
use crate::domain::{Sound, SoundCreation};
use crate::endpoints::{CreateRequest, DataEnvelope, SharedHandles};

#[derive(Debug, Deserialize)]
pub struct RecommendationQueryParams {
    #[serde(rename = "playlistId")]
    playlist_id: String,
}

#[get("/sounds")]
pub async fn list_sounds(data: web::Data<SharedHandles>) -> Result<HttpResponse, CatalogError> {
    let sounds = data.catalog.all_sounds()?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: sounds }))
}

// Sounds most similar to the sounds of a playlist, best match first.
// Scores stay internal, the response only carries the sounds.
#[get("/sounds/recommended")]
pub async fn recommended_sounds(
    data: web::Data<SharedHandles>,
    query: web::Query<RecommendationQueryParams>,
) -> Result<HttpResponse, CatalogError> {
    let recommended: Vec<Sound> = data
        .catalog
        .recommendations_for_playlist(&query.playlist_id)?
        .into_iter()
        .map(|(_score, sound)| sound)
        .collect();
    Ok(HttpResponse::Ok().json(DataEnvelope { data: recommended }))
}

#[get("/sounds/{id}")]
pub async fn get_sound(
    data: web::Data<SharedHandles>,
    sound_id: web::Path<String>,
) -> Result<HttpResponse, CatalogError> {
    let sound = data.catalog.find_sound(&sound_id)?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: sound }))
}

#[post("/admin/sounds")]
pub async fn add_sounds(
    data: web::Data<SharedHandles>,
    body: web::Json<CreateRequest<SoundCreation>>,
) -> Result<HttpResponse, CatalogError> {
    let creations = body.into_inner().into_non_empty()?;
    let sounds = data.catalog.create_sounds(creations)?;
    Ok(HttpResponse::Created().json(DataEnvelope { data: sounds }))
}
