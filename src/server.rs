use crate::config::{Config, SAMPLE_IMAGE};
use crate::contact::{ContactForm, ContactRecorder};
use crate::error::AppError;
use crate::pages;
use crate::portfolio::{projects, ContextResponse, OpenMeteo, WeatherSource};
use crate::preprocessing::Pipeline;
use crate::storage::{sanitize_filename, ImageStore};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Query, State},
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Pipeline,
    pub store: Arc<ImageStore>,
    pub contact: Arc<ContactRecorder>,
    pub weather: Arc<dyn WeatherSource>,
    /// Bounds how many cleanups occupy the blocking pool at once
    pub cleanup_permits: Arc<Semaphore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, weather: Arc<dyn WeatherSource>) -> Self {
        Self {
            pipeline: Pipeline::new(),
            store: Arc::new(ImageStore::new(&config.paths, config.max_pixels)),
            contact: Arc::new(ContactRecorder::new(config.paths.contact_file())),
            weather,
            cleanup_permits: Arc::new(Semaphore::new(config.max_concurrent_cleanups)),
            config: Arc::new(config),
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Visitor location posted by the frontend
#[derive(Debug, Deserialize)]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
}

/// Plain acknowledgement
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SentimentQuery {
    pub text: String,
}

/// Sentiment analysis is disabled; every text is reported as neutral
#[derive(Serialize)]
pub struct SentimentResponse {
    pub sentiment: String,
    pub confidence: f32,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let weather: Arc<dyn WeatherSource> = Arc::new(OpenMeteo::new(config.weather_url.clone()));
    tracing::info!("Using {} for weather lookups", weather.name());

    let app = router(AppState::new(config, weather));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let paths = &state.config.paths;
    let frontend = ServeDir::new(&paths.frontend_dir).fallback(ServeFile::new(paths.frontend_index()));

    Router::new()
        .route("/health", get(handle_health))
        .route("/projects", get(handle_projects))
        .route("/get-context/", post(handle_context))
        .route("/send-email/", post(handle_send_email))
        .route("/analyze-sentiment/", post(handle_sentiment))
        .route("/denoise-demo/", get(handle_denoise_demo))
        .route("/upload_and_denoise/", post(handle_upload_and_denoise))
        .route("/upload_and_denoise_sample/", post(handle_denoise_sample))
        .nest_service("/static/uploaded_images", ServeDir::new(&paths.uploaded_dir))
        .nest_service("/static/cleaned_images", ServeDir::new(&paths.cleaned_dir))
        .fallback_service(frontend)
        .layer(DefaultBodyLimit::max(state.config.max_file_size))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn handle_projects() -> impl IntoResponse {
    Json(projects::all())
}

/// Theme the site after the visitor's current weather
async fn handle_context(
    State(state): State<AppState>,
    Json(location): Json<LocationData>,
) -> Result<Json<ContextResponse>, AppError> {
    let weather = state.weather.clone();
    let current = tokio::task::spawn_blocking(move || {
        weather.current(location.latitude, location.longitude)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Weather task failed: {}", e)))??;

    let response = ContextResponse::from_weather(&current);
    tracing::info!("Resolved context {}", response.context.as_str());
    Ok(Json(response))
}

/// Record a contact form submission
async fn handle_send_email(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<MessageResponse>, AppError> {
    let contact = state.contact.clone();
    tokio::task::spawn_blocking(move || contact.record(&form))
        .await
        .map_err(|e| AppError::Internal(format!("Contact task failed: {}", e)))??;

    Ok(Json(MessageResponse {
        message: "Message saved successfully!".to_string(),
    }))
}

async fn handle_sentiment(Query(query): Query<SentimentQuery>) -> impl IntoResponse {
    tracing::debug!("Sentiment requested for {} chars", query.text.len());
    Json(SentimentResponse {
        sentiment: "neutral".to_string(),
        confidence: 0.0,
    })
}

async fn handle_denoise_demo() -> Html<&'static str> {
    Html(pages::upload_page())
}

/// Clean an uploaded scan and show it next to the original
async fn handle_upload_and_denoise(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    let mut file_data: Option<Bytes> = None;
    let mut file_name: Option<String> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        file_name = field.file_name().map(|s| s.to_string());
        file_data = Some(field.bytes().await.map_err(|e| {
            AppError::InvalidRequest(format!("Failed to read file data: {}", e))
        })?);
    }

    let data = file_data.ok_or(AppError::MissingFile)?;
    if data.is_empty() {
        return Err(AppError::MissingFile);
    }
    if data.len() > state.config.max_file_size {
        return Err(AppError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let name = sanitize_filename(file_name.as_deref().unwrap_or_default());
    let cleaned = clean_and_store(&state, name.clone(), data, true).await?;

    Ok(Html(pages::result_page(&name, &cleaned)))
}

/// Clean the bundled sample scan
async fn handle_denoise_sample(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let store = state.store.clone();
    let data = tokio::task::spawn_blocking(move || store.load_sample())
        .await
        .map_err(|e| AppError::Internal(format!("Sample task failed: {}", e)))??;

    let cleaned = clean_and_store(&state, SAMPLE_IMAGE.to_string(), data.into(), false).await?;

    Ok(Html(pages::result_page(SAMPLE_IMAGE, &cleaned)))
}

/// Decode, optionally keep the original, run the pipeline and store the result.
/// Returns the file name of the cleaned image.
async fn clean_and_store(
    state: &AppState,
    name: String,
    data: Bytes,
    keep_original: bool,
) -> Result<String, AppError> {
    let store = state.store.clone();
    let pipeline = state.pipeline;
    let permit = state
        .cleanup_permits
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| AppError::Internal(format!("Cleanup queue closed: {}", e)))?;

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let start = Instant::now();
        let image = store.decode(&data)?;
        if keep_original {
            store.save_upload(&name, &data)?;
        }

        let (width, height) = image.dimensions();
        let result = pipeline.process(image);
        let cleaned = store.save_cleaned(&name, &result.image)?;

        tracing::info!(
            "Cleaned {} ({}x{} -> {}x{}) in {}ms, pipeline {}ms",
            name,
            width,
            height,
            result.image.width(),
            result.image.height(),
            start.elapsed().as_millis(),
            result.total_time_ms
        );
        for stage in &result.stages {
            tracing::debug!(stage = stage.name, time_ms = stage.time_ms, "Stage timing");
        }

        Ok(cleaned)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Cleanup task failed: {}", e)))?
}
