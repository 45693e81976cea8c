//! HTTP entry points for harvesting, unification and export.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::country::CountryTable;
use crate::export::{ExportSummary, Exporter};
use crate::history::HistorySource;
use crate::layout::{Layout, YearRange};
use crate::model::PlayerSighting;
use crate::process::TransferHarvester;
use crate::scrape::Scraper;
use crate::unify::{HistoryUnifier, UnifySummary};
use crate::{Error, Result};

/// Year used when a query leaves `from` or `to` out.
const DEFAULT_YEAR: i32 = 2023;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub countries: Arc<CountryTable>,
    pub layout: Arc<Layout>,
    pub scraper: Arc<dyn Scraper>,
    pub history: Arc<dyn HistorySource>,
}

#[derive(Debug, Deserialize)]
pub struct HarvestQuery {
    pub country: u32,
    pub from: Option<i32>,
    pub to: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct UnifyQuery {
    pub country: u32,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub from: i32,
    pub to: i32,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "request failed");
        let status = match self {
            Error::InvalidYearRange { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/transfers", get(harvest))
        .route("/unify", get(unify))
        .route("/export", get(export))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health
async fn health_check() -> &'static str {
    "ok"
}

/// GET /transfers?country=<id>&from=<year>&to=<year>
async fn harvest(
    State(state): State<AppState>,
    Query(query): Query<HarvestQuery>,
) -> Result<Json<Vec<PlayerSighting>>> {
    let harvester = TransferHarvester::new(&state.countries, &state.layout, state.scraper.as_ref());
    let players = harvester
        .harvest(
            query.country,
            query.from.unwrap_or(DEFAULT_YEAR),
            query.to.unwrap_or(DEFAULT_YEAR),
        )
        .await?;
    Ok(Json(players))
}

/// GET /unify?country=<id>
async fn unify(
    State(state): State<AppState>,
    Query(query): Query<UnifyQuery>,
) -> Result<Json<UnifySummary>> {
    let unifier = HistoryUnifier::new(&state.countries, &state.layout, state.history.as_ref());
    let summary = unifier.unify(query.country).await?;
    Ok(Json(summary))
}

/// GET /export?from=<year>&to=<year>
async fn export(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Json<ExportSummary>> {
    let years = YearRange::new(query.from, query.to)?;
    let summary = Exporter::new(&state.countries, &state.layout)
        .export(years)
        .await?;
    Ok(Json(summary))
}
