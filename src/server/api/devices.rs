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
use crate::types::{DeviceInput, RomInput};

const INVALID_DEVICE_ID: &str = "Device ID must be numeric";
const DEVICE_NOT_FOUND: &str = "Device not found";

pub async fn list_devices(Extension(gateway): Extension<Gateway>) -> impl IntoResponse {
    let devices = gateway.list_devices().await.map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(devices))
}

pub async fn get_device(
    Extension(gateway): Extension<Gateway>,
    Path(device): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&device, INVALID_DEVICE_ID)?;
    let device = gateway.get_device(id).await.or_not_found(DEVICE_NOT_FOUND)?;
    Ok::<_, ApiError>(Json(device))
}

pub async fn create_device(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    JsonBody(input): JsonBody<DeviceInput>,
) -> impl IntoResponse {
    let device = gateway.create_device(input).await.map_err(ApiError::from)?;
    Ok::<_, ApiError>((StatusCode::CREATED, Json(device)))
}

pub async fn update_device(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(device): Path<String>,
    JsonBody(input): JsonBody<DeviceInput>,
) -> impl IntoResponse {
    let id = parse_id(&device, INVALID_DEVICE_ID)?;
    let device = gateway
        .update_device(id, input)
        .await
        .or_not_found(DEVICE_NOT_FOUND)?;
    Ok::<_, ApiError>(Json(device))
}

pub async fn delete_device(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(device): Path<String>,
) -> impl IntoResponse {
    let id = parse_id(&device, INVALID_DEVICE_ID)?;
    gateway
        .delete_device(id)
        .await
        .or_not_found(DEVICE_NOT_FOUND)?;
    Ok::<_, ApiError>(StatusCode::NO_CONTENT)
}

/// ROMs for a device, addressed by codename. An unknown codename yields an
/// empty list.
pub async fn list_device_roms(
    Extension(gateway): Extension<Gateway>,
    Path(codename): Path<String>,
) -> impl IntoResponse {
    let roms = gateway.device_roms(codename).await.map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(roms))
}

pub async fn create_device_rom(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    Path(codename): Path<String>,
    JsonBody(input): JsonBody<RomInput>,
) -> impl IntoResponse {
    let rom = gateway
        .create_rom(codename, input)
        .await
        .or_not_found(DEVICE_NOT_FOUND)?;
    Ok::<_, ApiError>((StatusCode::CREATED, Json(rom)))
}
