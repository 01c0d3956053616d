use axum::{
    extract::{Path, State},
    Json,
};
use contracts::domain::a001_invoice::api::PageRevision;

use crate::routes::AppState;
use crate::system::auth::extractor::CurrentSession;

/// GET /api/system/revisions/:page_key
///
/// Revision of the page for the caller's tenant.
pub async fn get_revision(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    Path(page_key): Path<String>,
) -> Json<PageRevision> {
    Json(PageRevision {
        revision: state.cache.revision(&session.tenant_id, &page_key),
    })
}
