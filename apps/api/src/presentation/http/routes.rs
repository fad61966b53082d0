use super::{
    handlers::{health, upload},
    middleware::{logging::logging_middleware, request_id::request_id_middleware},
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;

pub fn create_router(state: AppState) -> Router {
    let config = &state.config;

    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(config.max_upload_bytes)),
        );

    // Local targets serve their own files; an absolute prefix means something else does.
    if config.storage_target.is_local() && config.public_upload_url_prefix.starts_with('/') {
        let files = ServeDir::new(&config.public_upload_dir);
        router = router.nest_service(&config.public_upload_url_prefix, files);
    } else if config.storage_target.is_local() && config.public_upload_url_prefix.is_empty() {
        router = router.fallback_service(ServeDir::new(&config.public_upload_dir));
    }

    router
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}
