mod cors;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;
use turnstile_core::AppError;

use crate::handlers;
use crate::state::AppState;

pub fn build_router(
    app_state: AppState,
    cors_allowed_origin: Option<&str>,
) -> Result<Router, AppError> {
    let user_routes = Router::new()
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        .route(
            "/api/users/save-or-update",
            post(handlers::users::upsert_user_handler),
        )
        .route(
            "/api/users/{user_id}",
            get(handlers::users::get_user_handler)
                .put(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(user_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(cors_allowed_origin)?)
        .with_state(app_state))
}
