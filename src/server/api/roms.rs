use axum::{
    Extension, Json,
    extract::Path,
    http::StatusCode,
    response::IntoResponse,
};

use crate::auth::RequireAdmin;
use crate::gateway::Gateway;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation::{JsonBody, parse_id};
use crate::types::RomInput;

const INVALID_ROM_ID: &str = "Invalid ROM ID";
const ROM_NOT_FOUND: &str = "ROM not found";

pub async fn list_roms(Extension(gateway): Extension<Gateway>) -> impl IntoResponse {
    let roms = gateway.list_roms().await.map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(roms))
}

pub async fn update_rom(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<RomInput>,
) -> impl IntoResponse {
    let id = parse_id(&id, INVALID_ROM_ID)?;
    let rom = gateway
        .update_rom(id, input)
        .await
        .or_not_found(ROM_NOT_FOUND)?;
    Ok::<_, ApiError>(Json(rom))
}

pub async fn delete_rom(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, INVALID_ROM_ID)?;
    gateway.delete_rom(id).await.or_not_found(ROM_NOT_FOUND)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// Public download counter.
pub async fn record_download(
    Extension(gateway): Extension<Gateway>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&id, INVALID_ROM_ID)?;
    let rom = gateway.record_download(id).await.or_not_found(ROM_NOT_FOUND)?;
    Ok::<_, ApiError>(Json(rom))
}
