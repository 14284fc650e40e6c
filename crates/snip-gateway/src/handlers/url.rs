use crate::error::{AppError, Result};
use crate::model::{CreateUrlRequest, CreateUrlResponse, UrlStatsResponse};
use crate::state::AppState;
use crate::validation::is_valid_url;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use snip_core::{NewUrl, ShortCode, UrlRecord};
use tracing::{debug, info};

pub async fn create_url_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<Json<CreateUrlResponse>> {
    let Json(request) = payload?;

    if !is_valid_url(&request.long_url) {
        debug!(long_url = %request.long_url, "rejected invalid URL");
        return Err(AppError::InvalidUrl);
    }

    let record = state
        .store()
        .store(NewUrl {
            long_url: request.long_url,
            expiration_date: request.expiration_date,
        })
        .await?;

    info!(code = %record.short_code, "created short URL");
    Ok(Json(CreateUrlResponse {
        short_url: record.short_code.to_url(state.base_url()),
    }))
}

pub async fn redirect_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    let record = lookup(&state, short_code).await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, record.long_url)]).into_response())
}

pub async fn url_stats_handler(
    Path(short_code): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UrlStatsResponse>> {
    let record = lookup(&state, short_code).await?;
    Ok(Json(record.into()))
}

/// Resolves a path segment to a live record. Codes that could never have been
/// issued are reported as not found without touching the store.
async fn lookup(state: &AppState, short_code: String) -> Result<UrlRecord> {
    let code = ShortCode::new(short_code).map_err(|e| {
        debug!(error = %e, "malformed short code");
        AppError::NotFound
    })?;

    Ok(state.store().get(&code).await?)
}
