mod applications;
mod auth;
mod changelogs;
mod devices;
mod roms;
mod settings;
mod user;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::server::AppState;

/// Routes served under `/api`. A `{device}` segment is a numeric id when it
/// stands alone and a codename when followed by `/roms`.
pub fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Device routes
        .route(
            "/devices",
            get(devices::list_devices).post(devices::create_device),
        )
        .route(
            "/devices/{device}",
            get(devices::get_device)
                .put(devices::update_device)
                .delete(devices::delete_device),
        )
        .route(
            "/devices/{device}/roms",
            get(devices::list_device_roms).post(devices::create_device_rom),
        )
        // ROM routes
        .route("/roms", get(roms::list_roms))
        .route(
            "/roms/{id}",
            put(roms::update_rom).delete(roms::delete_rom),
        )
        .route("/roms/{id}/downloads", post(roms::record_download))
        // Application routes
        .route(
            "/applications",
            get(applications::list_applications).post(applications::create_application),
        )
        .route("/applications/{id}", put(applications::update_application))
        // Changelog routes
        .route(
            "/changelogs",
            get(changelogs::list_changelogs).post(changelogs::create_changelog),
        )
        .route(
            "/changelogs/{id}",
            put(changelogs::update_changelog).delete(changelogs::delete_changelog),
        )
        // Settings and account routes
        .route(
            "/settings",
            get(settings::get_settings)
                .put(settings::save_settings)
                .post(settings::save_settings),
        )
        .route("/user", get(user::get_user).put(user::update_user))
        // Session routes
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
}
