use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        // Public endpoints (no auth required)
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler)
                .layer(middleware::from_fn(handlers::metrics_auth_middleware)),
        )
        .nest("/api/teams", team_routes())
        .nest("/api/round1", round1_routes())
        .nest("/api/round2", round2_routes())
        .nest("/api/round3", round3_routes(app_state.clone()))
        .nest("/api/admin", admin_routes(app_state.clone()))
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn team_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::teams::register))
        .route("/", get(handlers::teams::list_teams))
        .route("/{team_id}", get(handlers::teams::get_team))
        .route("/name/{team_name}", get(handlers::teams::get_team_by_name))
}

fn round1_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quiz", get(handlers::round1::get_quiz))
        .route("/quiz/validate", post(handlers::round1::validate_answer))
        .route("/quiz/submit", post(handlers::round1::submit_quiz))
        .route("/components", get(handlers::round1::get_components))
        .route("/purchase", post(handlers::round1::purchase_components))
        .route("/team/{team_id}", get(handlers::round1::get_round1))
}

fn round2_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submit", post(handlers::round2::submit_schematic))
        .route("/team/{team_id}", get(handlers::round2::get_round2))
        .route("/correct-flow", get(handlers::round2::get_correct_flow))
        .route("/sector-info/{team_id}", get(handlers::round2::get_sector_info))
}

fn round3_routes(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public_routes = Router::new()
        .route("/challenge/{team_id}", get(handlers::round3::get_challenge))
        .route("/submit", post(handlers::round3::submit_round3))
        .route("/team/{team_id}", get(handlers::round3::get_round3));

    let admin_only = Router::new()
        .route("/verify/{team_id}", put(handlers::round3::verify_round3))
        .route_layer(middleware::from_fn(
            middlewares::auth::admin_guard_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            middlewares::auth::auth_middleware,
        ));

    public_routes.merge(admin_only)
}

fn admin_routes(app_state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/teams", get(handlers::admin::list_teams))
        .route(
            "/teams/{team_id}",
            delete(handlers::admin::delete_team).layer(middleware::from_fn(
                middlewares::auth::super_admin_guard_middleware,
            )),
        )
        .route("/leaderboard", get(handlers::admin::leaderboard))
        .route("/stats", get(handlers::admin::event_stats))
        .route(
            "/round3/time/{team_id}",
            put(handlers::admin::override_round3),
        )
        .route_layer(middleware::from_fn(
            middlewares::auth::admin_guard_middleware,
        ))
        .route_layer(middleware::from_fn_with_state(
            app_state,
            middlewares::auth::auth_middleware,
        ))
}
