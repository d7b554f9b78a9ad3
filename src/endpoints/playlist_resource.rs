use actix_web::{get, post, web, HttpResponse};

use crate::catalog::CatalogError;
use crate::domain::PlaylistCreation;
use crate::endpoints::{CreateRequest, DataEnvelope, SharedHandles};

#[get("/playlists")]
pub async fn list_playlists(
    data: web::Data<SharedHandles>,
) -> Result<HttpResponse, CatalogError> {
    let playlists = data.catalog.all_playlists()?;
    Ok(HttpResponse::Ok().json(DataEnvelope { data: playlists }))
}

#[post("/playlists")]
pub async fn add_playlists(
    data: web::Data<SharedHandles>,
    body: web::Json<CreateRequest<PlaylistCreation>>,
) -> Result<HttpResponse, CatalogError> {
    let creations = body.into_inner().into_non_empty()?;
    let playlists = data.catalog.create_playlists(creations)?;
    Ok(HttpResponse::Created().json(DataEnvelope { data: playlists }))
}
