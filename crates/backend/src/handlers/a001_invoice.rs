use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceDto, InvoiceId};
use contracts::domain::a001_invoice::api::{InvoiceListQuery, InvoiceListResponse};
use contracts::domain::common::{ActionResult, AggregateId};

use crate::domain::a001_invoice::service;
use crate::routes::AppState;
use crate::system::auth::extractor::CurrentSession;

fn parse_id(id: &str) -> Result<InvoiceId, StatusCode> {
    InvoiceId::from_string(id).map_err(|_| StatusCode::BAD_REQUEST)
}

/// GET /api/a001/invoices
pub async fn list(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Query(query): Query<InvoiceListQuery>,
) -> Json<ActionResult<InvoiceListResponse>> {
    Json(service::list(state.store.as_ref(), &session, query).await)
}

/// GET /api/a001/invoices/:id
pub async fn get_by_id(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<Invoice>>, StatusCode> {
    let id = parse_id(&id)?;
    Ok(Json(service::get(state.store.as_ref(), &session, id).await))
}

/// POST /api/a001/invoices
pub async fn create(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Json(dto): Json<InvoiceDto>,
) -> Json<ActionResult<Invoice>> {
    Json(service::create(state.store.as_ref(), state.cache.as_ref(), &session, dto).await)
}

/// PUT /api/a001/invoices/:id
pub async fn update(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
    Json(dto): Json<InvoiceDto>,
) -> Result<Json<ActionResult<Invoice>>, StatusCode> {
    let id = parse_id(&id)?;
    Ok(Json(
        service::update(state.store.as_ref(), state.cache.as_ref(), &session, id, dto).await,
    ))
}

/// DELETE /api/a001/invoices/:id
pub async fn delete(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<String>>, StatusCode> {
    let id = parse_id(&id)?;
    Ok(Json(
        service::delete(state.store.as_ref(), state.cache.as_ref(), &session, id).await,
    ))
}

/// POST /api/a001/invoices/:id/duplicate
pub async fn duplicate(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<Invoice>>, StatusCode> {
    let id = parse_id(&id)?;
    Ok(Json(
        service::duplicate(state.store.as_ref(), state.cache.as_ref(), &session, id).await,
    ))
}
