use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::AppState;
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;

pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/api/ai", ai_routes())
        .nest("/api/user", user_routes())
        .layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Public
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(protected)
        // Uploads are size-checked by the handlers, not by the transport
        .layer(DefaultBodyLimit::max(state.body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors_layer(&state.cors_origins)),
        )
        .with_state(state)
}

fn ai_routes() -> Router<AppState> {
    use protected::ai;

    Router::new()
        .route("/generate-article", post(ai::generate_article))
        .route("/generate-blog-title", post(ai::generate_blog_title))
        .route("/generate-image", post(ai::generate_image))
        .route("/remove-image-background", post(ai::remove_image_background))
        .route("/remove-image-object", post(ai::remove_image_object))
        .route("/review-resume", post(ai::review_resume))
}

fn user_routes() -> Router<AppState> {
    use protected::user;

    Router::new()
        .route("/user-creations", get(user::user_creations))
        .route("/published-creations", get(user::published_creations))
        .route("/toggle-like", post(user::toggle_like))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
