use crate::errors::AppError;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const BODY_LIMIT: usize = 64 * 1024;
const API_KEY_HEADER: &str = "x-api-key";

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/fasting", get(handlers::list_fasting).post(handlers::update_fasting))
        .route("/fasting/:date", get(handlers::get_fasting))
        .route("/jedlo", get(handlers::list_meals).post(handlers::add_meal))
        .route("/statistiky", get(handlers::get_stats))
        .route("/analytics/tyzdenne", get(handlers::get_weekly))
        .route("/analytics/mesacne", get(handlers::get_monthly))
        .route("/analytics/hmotnost", get(handlers::get_weight_trend))
        .route("/dnes", get(handlers::get_today))
        .route("/oznac-den", post(handlers::mark_day))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(RequestBodyLimitLayer::new(BODY_LIMIT))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Static key check over everything under `/api`, active only when an API key
/// is configured.
async fn require_api_key(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.api_key {
        let authorized = request
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|key| key == expected.expose_secret());
        if !authorized {
            return AppError::Unauthorized.into_response();
        }
    }
    next.run(request).await
}
