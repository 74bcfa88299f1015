use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod insights;
pub mod models;
pub mod store;
pub mod weather;

use config::Config;
use store::MoodStore;
use weather::{WeatherClient, WeatherError};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: MoodStore,
    pub weather: WeatherClient,
}

impl AppState {
    pub fn new(config: Arc<Config>) -> Result<Self, WeatherError> {
        Ok(Self {
            store: MoodStore::new(config.data_file.clone()),
            weather: WeatherClient::from_config(&config)?,
            config,
        })
    }
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/mood", post(handlers::moods::create_mood))
        .route("/api/moods", get(handlers::moods::list_moods))
        .route("/api/insights", get(handlers::insights::get_insights));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz));

    // index.html at "/", plus styles and scripts
    let frontend = ServeDir::new(&state.config.frontend_dir);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(cors_layer(&state.config)),
        )
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}
