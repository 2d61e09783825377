//! JSON endpoints under `/api` and the `/generate` handler

mod error;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{Method, header},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::generation::GenerationOutcome;
use crate::models::Generation;
use crate::prayer_times::IftarTimes;
use crate::state::AppState;

pub use error::ApiError;

/// Gallery size returned by `/api/generations`
const RECENT_GENERATIONS: usize = 12;

const MISSING_BODY: &str = "لم يتم استلام البيانات";

/// Success envelope: `{success: true, ...payload}`
#[derive(Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

impl<T> Success<T> {
    fn new(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
        })
    }
}

#[derive(Serialize)]
pub struct GenerationList {
    generations: Vec<Generation>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Routes mounted under `/api`
pub fn router() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/iftar-times", get(get_iftar_times))
        .route("/generations", get(recent_generations))
        .layer(cors)
}

pub async fn get_iftar_times(
    State(state): State<AppState>,
) -> Result<Json<Success<IftarTimes>>, ApiError> {
    let range = state.date_range()?;
    info!(
        start = %range.start,
        end = %range.end,
        days = range.dates.len(),
        "Fetching iftar times"
    );
    let times = state.aggregator.fetch_range(&state.countries, &range).await?;
    Ok(Success::new(times))
}

pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<Success<GenerationOutcome>>, ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::bad_request(MISSING_BODY))?;
    let outcome = state.generation.generate(&request.prompt).await?;
    Ok(Success::new(outcome))
}

pub async fn recent_generations(State(state): State<AppState>) -> Json<Success<GenerationList>> {
    let generations = state.generation.recent(RECENT_GENERATIONS).await;
    Success::new(GenerationList { generations })
}
