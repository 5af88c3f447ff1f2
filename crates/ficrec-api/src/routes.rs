//! Route table
//!
//! Read endpoints are public; every mutation (plus the profile pair) sits
//! behind the bearer-token middleware. Public and protected routers share
//! paths with disjoint methods and are merged into one tree.

use crate::auth::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Liveness probe.
async fn root() -> Json<Value> {
    Json(json!({ "is_root": true }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new();
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(parsed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/token", post(handlers::auth::token))
        .route("/recommendations", get(handlers::recommendations::list))
        .route("/recommendations/:id", get(handlers::recommendations::get))
        .route(
            "/recommendations/:recommendation_id/comments",
            get(handlers::comments::list),
        )
        .route(
            "/recommendations/:recommendation_id/comments/:comment_id",
            get(handlers::comments::get),
        )
        .route(
            "/recommendations/:recommendation_id/reactions",
            get(handlers::reactions::list),
        )
        .route(
            "/recommendations/:recommendation_id/reactions/:reaction_id",
            get(handlers::reactions::get),
        );

    let protected = Router::new()
        .route(
            "/auth/users/me",
            get(handlers::auth::me).patch(handlers::auth::update_me),
        )
        .route("/recommendations", post(handlers::recommendations::create))
        .route(
            "/recommendations/:id",
            patch(handlers::recommendations::update)
                .delete(handlers::recommendations::delete),
        )
        .route(
            "/recommendations/:recommendation_id/comments",
            post(handlers::comments::create),
        )
        .route(
            "/recommendations/:recommendation_id/comments/:comment_id",
            put(handlers::comments::update).delete(handlers::comments::delete),
        )
        .route(
            "/recommendations/:recommendation_id/reactions",
            post(handlers::reactions::create),
        )
        .route(
            "/recommendations/:recommendation_id/reactions/:reaction_id",
            put(handlers::reactions::update).delete(handlers::reactions::delete),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.server.cors_origins))
        .with_state(state)
}
