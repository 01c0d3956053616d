use crate::shared::api_utils::{api_url, auth_header, read_action, with_query};
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceStatus};
use contracts::domain::a001_invoice::api::{InvoiceListResponse, PageRevision, INVOICES_PAGE_KEY};
use gloo_net::http::Request;

/// Every invoice of the tenant, optionally by status.
///
/// Search, sort and paging happen in the grid on the client.
pub async fn fetch_invoices(status: Option<InvoiceStatus>) -> Result<InvoiceListResponse, String> {
    let url = with_query(
        "/api/a001/invoices",
        &[
            (
                "status",
                status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            ),
            ("sort_by", "issue_date".to_string()),
            ("sort_desc", "true".to_string()),
        ],
    );
    let response = Request::get(&api_url(&url))
        .header("Authorization", &auth_header()?)
        .header("Cache-Control", "no-cache, no-store, must-revalidate")
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    read_action::<InvoiceListResponse>(response)
        .await?
        .into_result()
}

pub async fn delete_invoice(id: &str) -> Result<String, String> {
    let response = Request::delete(&api_url(&format!("/api/a001/invoices/{}", id)))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    read_action::<String>(response).await?.into_result()
}

pub async fn duplicate_invoice(id: &str) -> Result<Invoice, String> {
    let response = Request::post(&api_url(&format!("/api/a001/invoices/{}/duplicate", id)))
        .header("Authorization", &auth_header()?)
        .send()
        .await
        .map_err(|e| format!("Failed to send request: {}", e))?;

    read_action::<Invoice>(response).await?.into_result()
}

/// Current cache revision of the invoice page.
pub async fn fetch_revision() -> Result<u64, String> {
    let response = Request::get(&api_url(&format!(
        "/api/system/revisions/{}",
        INVOICES_PAGE_KEY
    )))
    .header("Authorization", &auth_header()?)
    .send()
    .await
    .map_err(|e| format!("Failed to send request: {}", e))?;

    if !response.ok() {
        return Err(format!("HTTP {}", response.status()));
    }
    response
        .json::<PageRevision>()
        .await
        .map(|r| r.revision)
        .map_err(|e| format!("Failed to parse response: {}", e))
}
