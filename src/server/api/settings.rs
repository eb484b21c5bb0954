use axum::{Extension, Json, response::IntoResponse};

use crate::auth::RequireAdmin;
use crate::gateway::Gateway;
use crate::server::response::ApiError;
use crate::server::validation::JsonBody;
use crate::types::SiteSettings;

/// Always answers with a settings object, falling back to the defaults.
pub async fn get_settings(Extension(gateway): Extension<Gateway>) -> Json<SiteSettings> {
    Json(gateway.get_settings().await)
}

pub async fn save_settings(
    _admin: RequireAdmin,
    Extension(gateway): Extension<Gateway>,
    JsonBody(settings): JsonBody<SiteSettings>,
) -> impl IntoResponse {
    let settings = gateway.save_settings(settings).await.map_err(ApiError::from)?;
    Ok::<_, ApiError>(Json(settings))
}
